use bytes::Buf;

use crate::error::{ParseError, Result};

/// Bounded big-endian cursor over a borrowed byte slice.
///
/// Every read checks the remaining length first; a short read fails with
/// [`ParseError::TruncatedInput`] and leaves the cursor where it was.
#[derive(Debug, Clone)]
pub struct ByteReader<'a> {
    buf: &'a [u8],
    consumed: usize,
}

impl<'a> ByteReader<'a> {
    pub fn new(buf: &'a [u8]) -> Self {
        Self { buf, consumed: 0 }
    }

    /// Bytes not yet consumed.
    pub fn remaining(&self) -> usize {
        self.buf.remaining()
    }

    /// Bytes consumed so far.
    pub fn position(&self) -> usize {
        self.consumed
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    pub fn read_u8(&mut self) -> Result<u8> {
        self.ensure(1)?;
        self.consumed += 1;
        Ok(self.buf.get_u8())
    }

    pub fn read_i8(&mut self) -> Result<i8> {
        self.ensure(1)?;
        self.consumed += 1;
        Ok(self.buf.get_i8())
    }

    pub fn read_u16(&mut self) -> Result<u16> {
        self.ensure(2)?;
        self.consumed += 2;
        Ok(self.buf.get_u16())
    }

    pub fn read_u32(&mut self) -> Result<u32> {
        self.ensure(4)?;
        self.consumed += 4;
        Ok(self.buf.get_u32())
    }

    pub fn read_i32(&mut self) -> Result<i32> {
        self.ensure(4)?;
        self.consumed += 4;
        Ok(self.buf.get_i32())
    }

    pub fn read_u64(&mut self) -> Result<u64> {
        self.ensure(8)?;
        self.consumed += 8;
        Ok(self.buf.get_u64())
    }

    /// Borrow the next `len` bytes.
    pub fn read_bytes(&mut self, len: usize) -> Result<&'a [u8]> {
        self.ensure(len)?;
        let (head, tail) = self.buf.split_at(len);
        self.buf = tail;
        self.consumed += len;
        Ok(head)
    }

    /// Read exactly `N` bytes into an array.
    pub fn read_array<const N: usize>(&mut self) -> Result<[u8; N]> {
        let bytes = self.read_bytes(N)?;
        let mut out = [0u8; N];
        out.copy_from_slice(bytes);
        Ok(out)
    }

    /// Read a `u16` length prefix followed by that many UTF-8 bytes.
    pub fn read_str_u16(&mut self) -> Result<&'a str> {
        let checkpoint = self.clone();
        let len = usize::from(self.read_u16()?);
        let bytes = match self.read_bytes(len) {
            Ok(bytes) => bytes,
            Err(err) => {
                *self = checkpoint;
                return Err(err);
            }
        };
        std::str::from_utf8(bytes)
            .map_err(|err| ParseError::malformed(format!("invalid UTF-8 string: {err}")))
    }

    /// Fail if any bytes are left unread.
    pub fn finish(&self) -> Result<()> {
        if self.buf.is_empty() {
            Ok(())
        } else {
            Err(ParseError::malformed(format!(
                "{} trailing bytes after offset {}",
                self.buf.len(),
                self.consumed
            )))
        }
    }

    fn ensure(&self, needed: usize) -> Result<()> {
        if self.buf.len() < needed {
            return Err(ParseError::TruncatedInput {
                needed,
                available: self.buf.len(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_big_endian_fields() {
        let bytes = [0x01, 0xff, 0x00, 0x00, 0x01, 0x00, 0, 0, 0, 0, 0, 0, 0, 0x2a];
        let mut reader = ByteReader::new(&bytes);

        assert_eq!(reader.read_u8().unwrap(), 1);
        assert_eq!(reader.read_i8().unwrap(), -1);
        assert_eq!(reader.read_u32().unwrap(), 256);
        assert_eq!(reader.read_u64().unwrap(), 42);
        assert_eq!(reader.position(), bytes.len());
        assert!(reader.finish().is_ok());
    }

    #[test]
    fn short_read_is_truncated_and_does_not_advance() {
        let bytes = [0x00, 0x00, 0x01];
        let mut reader = ByteReader::new(&bytes);

        let err = reader.read_u32().unwrap_err();
        assert_eq!(
            err,
            ParseError::TruncatedInput {
                needed: 4,
                available: 3
            }
        );
        assert_eq!(reader.position(), 0);
        assert_eq!(reader.remaining(), 3);
    }

    #[test]
    fn read_bytes_rejects_oversized_length() {
        let mut reader = ByteReader::new(b"abc");
        assert!(matches!(
            reader.read_bytes(usize::MAX),
            Err(ParseError::TruncatedInput { .. })
        ));
        assert_eq!(reader.read_bytes(3).unwrap(), b"abc");
    }

    #[test]
    fn read_array_copies() {
        let mut reader = ByteReader::new(&[1, 2, 3, 4, 5]);
        let head: [u8; 4] = reader.read_array().unwrap();
        assert_eq!(head, [1, 2, 3, 4]);
        assert_eq!(reader.remaining(), 1);
    }

    #[test]
    fn str_with_short_body_rewinds() {
        let bytes = [0x00, 0x05, b'a', b'b'];
        let mut reader = ByteReader::new(&bytes);
        assert!(matches!(
            reader.read_str_u16(),
            Err(ParseError::TruncatedInput { .. })
        ));
        assert_eq!(reader.position(), 0);
    }

    #[test]
    fn str_rejects_invalid_utf8() {
        let bytes = [0x00, 0x02, 0xc3, 0x28];
        let mut reader = ByteReader::new(&bytes);
        assert!(matches!(reader.read_str_u16(), Err(ParseError::Malformed(_))));
    }

    #[test]
    fn finish_reports_trailing_bytes() {
        let mut reader = ByteReader::new(&[1, 2]);
        reader.read_u8().unwrap();
        assert!(matches!(reader.finish(), Err(ParseError::Malformed(_))));
    }
}
