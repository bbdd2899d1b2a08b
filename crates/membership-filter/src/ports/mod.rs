//! Ports Layer
//!
//! Driven ports the filter depends on. Persistence is the only one: the
//! domain encodes itself to bytes and a [`FilterStore`] decides where those
//! bytes live.

pub mod outbound;

pub use outbound::FilterStore;
