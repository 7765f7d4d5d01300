//! Minimal big-endian wire codec for atomic transactions
//!
//! The ledger's serialization format: fixed-width big-endian integers,
//! 32-byte identifiers, and u32-length-prefixed arrays.

/// Append-only byte writer
#[derive(Debug, Default)]
pub struct Writer {
    buf: Vec<u8>,
}

impl Writer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn u16(&mut self, v: u16) {
        self.buf.extend_from_slice(&v.to_be_bytes());
    }

    pub fn u32(&mut self, v: u32) {
        self.buf.extend_from_slice(&v.to_be_bytes());
    }

    pub fn u64(&mut self, v: u64) {
        self.buf.extend_from_slice(&v.to_be_bytes());
    }

    pub fn bytes(&mut self, v: &[u8]) {
        self.buf.extend_from_slice(v);
    }

    /// u32 length prefix followed by the raw bytes
    pub fn var_bytes(&mut self, v: &[u8]) {
        self.u32(v.len() as u32);
        self.bytes(v);
    }

    /// u32 element count, then each element via the closure
    pub fn array<T>(&mut self, items: &[T], mut write: impl FnMut(&mut Self, &T)) {
        self.u32(items.len() as u32);
        for item in items {
            write(self, item);
        }
    }

    pub fn finish(self) -> Vec<u8> {
        self.buf
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_writer_layout() {
        let mut w = Writer::new();
        w.u16(0);
        w.u32(1);
        w.u64(2);
        w.var_bytes(b"ab");
        assert_eq!(
            w.finish(),
            vec![0, 0, 0, 0, 0, 1, 0, 0, 0, 0, 0, 0, 0, 2, 0, 0, 0, 2, b'a', b'b']
        );
    }

    #[test]
    fn test_array_prefix() {
        let mut w = Writer::new();
        w.array(&[7u8, 9u8], |w, v| w.u64(*v as u64));
        let out = w.finish();
        assert_eq!(&out[..4], &[0, 0, 0, 2]);
        assert_eq!(out.len(), 4 + 16);
    }
}
