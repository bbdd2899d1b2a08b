//! Adapters Layer (Driven Adapters)
//!
//! ## Adapters
//!
//! - `FileFilterStore` - atomic on-disk persistence
//! - `InMemoryFilterStore` - byte buffer store for tests and embedding

pub mod file_store;
pub mod memory_store;

pub use file_store::FileFilterStore;
pub use memory_store::InMemoryFilterStore;
