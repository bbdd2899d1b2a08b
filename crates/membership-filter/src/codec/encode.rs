//! Little-endian byte writer

/// Growable buffer with typed little-endian writes
pub struct FilterWriter {
    bytes: Vec<u8>,
}

impl FilterWriter {
    /// Constructs an empty writer with at least the specified capacity.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            bytes: Vec::with_capacity(capacity),
        }
    }

    /// Bytes written so far
    pub fn as_slice(&self) -> &[u8] {
        &self.bytes
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }

    pub fn write(&mut self, buf: &[u8]) {
        self.bytes.extend_from_slice(buf);
    }

    pub fn write_u8(&mut self, n: u8) {
        self.bytes.push(n);
    }

    pub fn write_u16_le(&mut self, n: u16) {
        self.write(&n.to_le_bytes());
    }

    pub fn write_u32_le(&mut self, n: u32) {
        self.write(&n.to_le_bytes());
    }

    pub fn write_u64_le(&mut self, n: u64) {
        self.write(&n.to_le_bytes());
    }

    /// Writes the IEEE-754 bit pattern of `n`
    pub fn write_f64_le(&mut self, n: f64) {
        self.write(&n.to_le_bytes());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_writes_little_endian() {
        let mut writer = FilterWriter::with_capacity(16);
        writer.write_u8(0xAB);
        writer.write_u16_le(0x0102);
        writer.write_u32_le(0x0304_0506);
        writer.write_u64_le(1);

        assert_eq!(
            writer.into_bytes(),
            vec![0xAB, 0x02, 0x01, 0x06, 0x05, 0x04, 0x03, 1, 0, 0, 0, 0, 0, 0, 0]
        );
    }
}
