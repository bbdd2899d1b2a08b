//! Little-endian byte reader over a borrowed slice

use crate::error::DecodeError;

/// Cursor over a byte slice; every read names the field it is decoding so
/// truncation errors say where the blob ended
pub struct FilterReader<'a> {
    bytes: &'a [u8],
    position: usize,
}

impl<'a> FilterReader<'a> {
    pub fn new(bytes: &'a [u8]) -> Self {
        Self { bytes, position: 0 }
    }

    /// Current offset from the start of the slice
    pub fn position(&self) -> usize {
        self.position
    }

    /// Bytes not yet consumed
    pub fn remaining(&self) -> usize {
        self.bytes.len() - self.position
    }

    /// Everything consumed so far
    pub fn consumed(&self) -> &'a [u8] {
        &self.bytes[..self.position]
    }

    /// Borrow the next `len` bytes
    pub fn read_slice(&mut self, len: usize, field: &'static str) -> Result<&'a [u8], DecodeError> {
        if len > self.remaining() {
            return Err(DecodeError::Truncated { field });
        }
        let slice = &self.bytes[self.position..self.position + len];
        self.position += len;
        Ok(slice)
    }

    fn read_array<const N: usize>(&mut self, field: &'static str) -> Result<[u8; N], DecodeError> {
        let mut buf = [0u8; N];
        buf.copy_from_slice(self.read_slice(N, field)?);
        Ok(buf)
    }

    pub fn read_u8(&mut self, field: &'static str) -> Result<u8, DecodeError> {
        Ok(self.read_array::<1>(field)?[0])
    }

    pub fn read_u16_le(&mut self, field: &'static str) -> Result<u16, DecodeError> {
        self.read_array(field).map(u16::from_le_bytes)
    }

    pub fn read_u32_le(&mut self, field: &'static str) -> Result<u32, DecodeError> {
        self.read_array(field).map(u32::from_le_bytes)
    }

    pub fn read_u64_le(&mut self, field: &'static str) -> Result<u64, DecodeError> {
        self.read_array(field).map(u64::from_le_bytes)
    }

    pub fn read_f64_le(&mut self, field: &'static str) -> Result<f64, DecodeError> {
        self.read_array(field).map(f64::from_le_bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reads_little_endian() {
        let bytes = [0xAB, 0x02, 0x01, 0x06, 0x05, 0x04, 0x03];
        let mut reader = FilterReader::new(&bytes);

        assert_eq!(reader.read_u8("a").unwrap(), 0xAB);
        assert_eq!(reader.read_u16_le("b").unwrap(), 0x0102);
        assert_eq!(reader.read_u32_le("c").unwrap(), 0x0304_0506);
        assert_eq!(reader.remaining(), 0);
        assert_eq!(reader.consumed(), &bytes[..]);
    }

    #[test]
    fn test_truncation_names_field() {
        let mut reader = FilterReader::new(&[1, 2, 3]);
        assert_eq!(
            reader.read_u32_le("hash_count"),
            Err(DecodeError::Truncated { field: "hash_count" })
        );
        // A failed read consumes nothing
        assert_eq!(reader.position(), 0);
    }
}
