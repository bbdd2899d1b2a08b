//! Error types for the membership filter

use thiserror::Error;

/// Errors surfaced by filter construction, decoding and persistence
#[derive(Debug, Error)]
pub enum FilterError {
    #[error(
        "Invalid capacity: {expected_items} expected items (must be > 0 and need at most 2^32 bits)"
    )]
    InvalidCapacity { expected_items: u64 },

    #[error("Invalid false positive rate: {rate} (must be strictly between 0 and 1)")]
    InvalidRate { rate: f64 },

    #[error("Deserialization error: {0}")]
    Deserialize(#[from] DecodeError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(#[from] serde_json::Error),
}

impl FilterError {
    /// True for storage failures that may succeed on retry
    pub fn is_io(&self) -> bool {
        matches!(self, FilterError::Io(_))
    }

    /// True when persisted bytes are malformed
    pub fn is_format(&self) -> bool {
        matches!(self, FilterError::Deserialize(_))
    }
}

/// Reasons a persisted filter blob is rejected
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    #[error("Truncated input while reading {field}")]
    Truncated { field: &'static str },

    #[error("Unknown format marker: {found:02x?}")]
    UnknownFormat { found: [u8; 4] },

    #[error("Unsupported serial version: expected {expected}, found {found}")]
    UnsupportedVersion { expected: u8, found: u8 },

    #[error("Invalid flags byte: {flags:#04x}")]
    InvalidFlags { flags: u8 },

    #[error("Invalid filter parameters: {0}")]
    InvalidParameters(String),

    #[error("Bitmap length mismatch: expected {expected} bytes, found {found}")]
    LengthMismatch { expected: u64, found: u64 },

    #[error("Padding bits in final bitmap byte are not zero")]
    NonZeroPadding,

    #[error("Empty flag disagrees with bitmap contents")]
    EmptyFlagMismatch,

    #[error("Checksum mismatch: stored {expected:#010x}, computed {found:#010x}")]
    ChecksumMismatch { expected: u32, found: u32 },

    #[error("{count} unexpected trailing bytes")]
    TrailingBytes { count: usize },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_error_converts_to_format_error() {
        let err: FilterError = DecodeError::NonZeroPadding.into();
        assert!(err.is_format());
        assert!(!err.is_io());
    }

    #[test]
    fn test_io_error_is_distinct_from_format_error() {
        let err: FilterError =
            std::io::Error::new(std::io::ErrorKind::NotFound, "missing").into();
        assert!(err.is_io());
        assert!(!err.is_format());
    }

    #[test]
    fn test_messages_carry_context() {
        let err = FilterError::InvalidRate { rate: 1.0 };
        assert!(err.to_string().contains("1"));

        let err = DecodeError::Truncated { field: "bit_count" };
        assert_eq!(err.to_string(), "Truncated input while reading bit_count");
    }
}
