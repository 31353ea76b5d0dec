use std::io::{self, Error as IoError, ErrorKind, Read};

/// Little-endian read helpers shared by the format decoders.
///
/// Every multi-byte integer in the supported formats is little-endian, so
/// the decoders read through this trait instead of juggling intermediate
/// buffers themselves.
pub(crate) trait ReadLeExt: Read {
    fn read_u16_le(&mut self) -> io::Result<u16>
    where
        Self: Sized,
    {
        Ok(u16::from_le_bytes(self.read_array()?))
    }

    fn read_u32_le(&mut self) -> io::Result<u32>
    where
        Self: Sized,
    {
        Ok(u32::from_le_bytes(self.read_array()?))
    }

    fn read_i32_le(&mut self) -> io::Result<i32>
    where
        Self: Sized,
    {
        Ok(i32::from_le_bytes(self.read_array()?))
    }

    fn read_f32_le(&mut self) -> io::Result<f32>
    where
        Self: Sized,
    {
        Ok(f32::from_le_bytes(self.read_array()?))
    }

    fn read_array<const N: usize>(&mut self) -> io::Result<[u8; N]>
    where
        Self: Sized,
    {
        let mut buf = [0; N];
        self.read_exact(&mut buf)?;
        Ok(buf)
    }

    /// Reads exactly `len` bytes without trusting `len` for the initial
    /// allocation, so a corrupt length field fails with `UnexpectedEof`
    /// instead of an oversized allocation.
    fn read_vec(&mut self, len: usize) -> io::Result<Vec<u8>>
    where
        Self: Sized,
    {
        let mut buf = Vec::new();
        self.take(len as u64).read_to_end(&mut buf)?;
        if buf.len() < len {
            return Err(IoError::new(
                ErrorKind::UnexpectedEof,
                "failed to fill whole buffer",
            ));
        }
        Ok(buf)
    }

    /// Consumes and discards exactly `n` bytes.
    fn skip(&mut self, n: u64) -> io::Result<()>
    where
        Self: Sized,
    {
        let copied = io::copy(&mut self.by_ref().take(n), &mut io::sink())?;
        if copied < n {
            return Err(IoError::new(
                ErrorKind::UnexpectedEof,
                "failed to fill whole buffer",
            ));
        }
        Ok(())
    }
}

impl<R: Read> ReadLeExt for R {}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io::Cursor;

    #[test]
    fn test_read_primitives() {
        let mut cursor = Cursor::new(vec![0x01, 0x02, 0xFF, 0xFF, 0xFF, 0xFF]);
        assert_eq!(cursor.read_u16_le().unwrap(), 0x0201);
        assert_eq!(cursor.read_i32_le().unwrap(), -1);
    }

    #[test]
    fn test_read_vec_truncated() {
        let mut cursor = Cursor::new(vec![1, 2, 3]);
        let err = cursor.read_vec(4).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnexpectedEof);
    }

    #[test]
    fn test_skip() {
        let mut cursor = Cursor::new(vec![1, 2, 3, 4]);
        cursor.skip(3).unwrap();
        assert_eq!(cursor.read_array::<1>().unwrap(), [4]);
        assert_eq!(
            cursor.skip(1).unwrap_err().kind(),
            ErrorKind::UnexpectedEof
        );
    }
}
