//! Versioned binary layout for persisted filters
//!
//! All integers are little-endian.
//!
//! ```text
//! offset  size        field
//! 0       4           magic "MBFL"
//! 4       1           serial version (1)
//! 5       1           flags (bit 0: no bit set)
//! 6       2           reserved, zero
//! 8       8           bit_count (u64)
//! 16      8           expected_items (u64)
//! 24      8           target false positive rate (f64)
//! 32      4           hash_count (u32)
//! 36      4 * k       hash seeds (u32 each)
//! ..      4           bitmap length in bytes (u32) == ceil(bit_count / 8)
//! ..      len         bitmap, LSB-first, final byte zero-padded
//! ..      4           CRC-32 of all preceding bytes
//! ```

mod decode;
mod encode;

pub use decode::FilterReader;
pub use encode::FilterWriter;

use std::collections::HashSet;

use bitvec::prelude::*;
use tracing::{debug, warn};

use crate::domain::parameters::MAX_BIT_COUNT;
use crate::domain::MembershipFilter;
use crate::error::DecodeError;

/// Format marker at offset 0
pub const MAGIC: [u8; 4] = *b"MBFL";
/// Current layout version
pub const SERIAL_VERSION: u8 = 1;
/// Flag bit set when no bit of the bitmap is set
pub const EMPTY_FLAG_MASK: u8 = 1;

/// Size of the fixed part of the header (through `hash_count`)
pub const HEADER_BYTES: usize = 36;

/// Decoded, validated contents of a blob
pub(crate) struct FilterParts {
    pub bit_count: u64,
    pub expected_items: u64,
    pub target_false_positive_rate: f64,
    pub seeds: Vec<u32>,
    pub bits: BitVec<u8, Lsb0>,
}

/// Bytes needed to pack `bit_count` bits
pub fn bitmap_len(bit_count: u64) -> u64 {
    bit_count.div_ceil(8)
}

/// Serialize `filter` into the version 1 layout
pub(crate) fn encode(filter: &MembershipFilter) -> Vec<u8> {
    let bitmap = filter.raw_bitmap();
    let seeds = filter.hash_seeds();
    let capacity = HEADER_BYTES + seeds.len() * 4 + 4 + bitmap.len() + 4;
    let mut bytes = FilterWriter::with_capacity(capacity);

    bytes.write(&MAGIC);
    bytes.write_u8(SERIAL_VERSION);
    bytes.write_u8(if filter.is_empty() { EMPTY_FLAG_MASK } else { 0 });
    bytes.write_u16_le(0); // reserved

    bytes.write_u64_le(filter.bit_count());
    bytes.write_u64_le(filter.expected_items());
    bytes.write_f64_le(filter.target_false_positive_rate());
    bytes.write_u32_le(filter.hash_count());
    for &seed in seeds {
        bytes.write_u32_le(seed);
    }

    // bit_count <= 2^32, so the byte length always fits in u32
    bytes.write_u32_le(bitmap.len() as u32);
    bytes.write(bitmap);

    let checksum = crc32fast::hash(bytes.as_slice());
    bytes.write_u32_le(checksum);

    bytes.into_bytes()
}

/// Parse and validate a version 1 blob
pub(crate) fn decode(bytes: &[u8]) -> Result<FilterParts, DecodeError> {
    let result = decode_parts(bytes);
    match &result {
        Ok(parts) => debug!(
            bit_count = parts.bit_count,
            hash_count = parts.seeds.len(),
            "Decoded filter blob"
        ),
        Err(err) => warn!(len = bytes.len(), error = %err, "Rejected filter blob"),
    }
    result
}

fn decode_parts(bytes: &[u8]) -> Result<FilterParts, DecodeError> {
    let mut cursor = FilterReader::new(bytes);

    let mut magic = [0u8; 4];
    magic.copy_from_slice(cursor.read_slice(4, "magic")?);
    if magic != MAGIC {
        return Err(DecodeError::UnknownFormat { found: magic });
    }

    let version = cursor.read_u8("serial_version")?;
    if version != SERIAL_VERSION {
        return Err(DecodeError::UnsupportedVersion {
            expected: SERIAL_VERSION,
            found: version,
        });
    }

    let flags = cursor.read_u8("flags")?;
    if flags & !EMPTY_FLAG_MASK != 0 {
        return Err(DecodeError::InvalidFlags { flags });
    }
    let reserved = cursor.read_u16_le("reserved")?;
    if reserved != 0 {
        return Err(DecodeError::InvalidParameters(format!(
            "reserved header bytes must be zero, found {:#06x}",
            reserved
        )));
    }

    let bit_count = cursor.read_u64_le("bit_count")?;
    if bit_count == 0 || bit_count > MAX_BIT_COUNT {
        return Err(DecodeError::InvalidParameters(format!(
            "bit_count {} outside 1..={}",
            bit_count, MAX_BIT_COUNT
        )));
    }

    let expected_items = cursor.read_u64_le("expected_items")?;
    if expected_items == 0 {
        return Err(DecodeError::InvalidParameters(
            "expected_items cannot be 0".to_string(),
        ));
    }

    let target_false_positive_rate = cursor.read_f64_le("target_false_positive_rate")?;
    if !(target_false_positive_rate > 0.0 && target_false_positive_rate < 1.0) {
        return Err(DecodeError::InvalidParameters(format!(
            "target false positive rate {} outside (0, 1)",
            target_false_positive_rate
        )));
    }

    let hash_count = cursor.read_u32_le("hash_count")?;
    if hash_count == 0 {
        return Err(DecodeError::InvalidParameters(
            "hash_count cannot be 0".to_string(),
        ));
    }

    // Capacity bounded by the input so a forged hash_count cannot force a huge allocation
    let mut seeds = Vec::with_capacity((hash_count as usize).min(cursor.remaining() / 4));
    for _ in 0..hash_count {
        seeds.push(cursor.read_u32_le("hash_seeds")?);
    }

    let expected_len = bitmap_len(bit_count);
    let declared_len = cursor.read_u32_le("bitmap_len")? as u64;
    if declared_len != expected_len {
        return Err(DecodeError::LengthMismatch {
            expected: expected_len,
            found: declared_len,
        });
    }
    let bitmap = cursor.read_slice(declared_len as usize, "bitmap")?;

    let computed = crc32fast::hash(cursor.consumed());
    let stored = cursor.read_u32_le("checksum")?;
    if stored != computed {
        return Err(DecodeError::ChecksumMismatch {
            expected: stored,
            found: computed,
        });
    }

    if cursor.remaining() != 0 {
        return Err(DecodeError::TrailingBytes {
            count: cursor.remaining(),
        });
    }

    let unique: HashSet<u32> = seeds.iter().copied().collect();
    if unique.len() != seeds.len() {
        return Err(DecodeError::InvalidParameters(
            "hash seeds must be distinct".to_string(),
        ));
    }

    let tail_bits = (bit_count % 8) as u32;
    if tail_bits != 0 {
        let last = bitmap[bitmap.len() - 1];
        if last >> tail_bits != 0 {
            return Err(DecodeError::NonZeroPadding);
        }
    }

    let is_empty = bitmap.iter().all(|&b| b == 0);
    if is_empty != (flags & EMPTY_FLAG_MASK != 0) {
        return Err(DecodeError::EmptyFlagMismatch);
    }

    let mut bits = BitVec::<u8, Lsb0>::from_vec(bitmap.to_vec());
    bits.truncate(bit_count as usize);

    Ok(FilterParts {
        bit_count,
        expected_items,
        target_false_positive_rate,
        seeds,
        bits,
    })
}
