use std::{
    fmt,
    io::{Error as IoError, ErrorKind, Read, Seek},
};

use super::*;
use crate::reader::ReadLeExt;

#[derive(Debug)]
pub enum DecodeError {
    IoError(IoError),
    Truncated,
    InvalidSignature,
    InvalidTileCount {
        width: u32,
        height: u32,
        actual: usize,
    },
    OutOfBounds {
        x: u32,
        y: u32,
    },
}

impl std::error::Error for DecodeError {}

impl From<IoError> for DecodeError {
    fn from(error: IoError) -> Self {
        if error.kind() == ErrorKind::UnexpectedEof {
            DecodeError::Truncated
        } else {
            DecodeError::IoError(error)
        }
    }
}

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DecodeError::IoError(e) => write!(f, "IO error: {e}"),
            DecodeError::Truncated => write!(f, "unexpected end of data"),
            DecodeError::InvalidSignature => write!(f, "invalid signature"),
            DecodeError::InvalidTileCount {
                width,
                height,
                actual,
            } => write!(
                f,
                "tile data length {actual} does not match a {width}x{height} grid"
            ),
            DecodeError::OutOfBounds { x, y } => {
                write!(f, "tile coordinates ({x}, {y}) are out of bounds")
            }
        }
    }
}

pub struct Decoder<R>
where
    R: Read + Seek,
{
    reader: R,
}

impl<R: Read + Seek> Decoder<R> {
    pub fn new(reader: R) -> Self {
        Decoder { reader }
    }

    pub fn decode(&mut self) -> Result<Gat, DecodeError> {
        let signature: [u8; 6] = self.reader.read_array()?;
        if &signature != SIGNATURE {
            return Err(DecodeError::InvalidSignature);
        }

        let width = self.reader.read_u32_le()?;
        let height = self.reader.read_u32_le()?;

        let mut tiles = Vec::new();
        self.reader.read_to_end(&mut tiles)?;

        let expected = (width as usize)
            .checked_mul(height as usize)
            .and_then(|count| count.checked_mul(TILE_SIZE_BYTES));
        if expected != Some(tiles.len()) {
            return Err(DecodeError::InvalidTileCount {
                width,
                height,
                actual: tiles.len(),
            });
        }

        Ok(Gat::new(width, height, tiles))
    }
}

pub(crate) fn decode_tile(record: &[u8; TILE_SIZE_BYTES]) -> Tile {
    // Heights are stored on an inverted scale.
    let height = |offset: usize| {
        -f32::from_le_bytes([
            record[offset],
            record[offset + 1],
            record[offset + 2],
            record[offset + 3],
        ])
    };

    let bottom_left = height(0);
    let bottom_right = height(4);
    let top_left = height(8);
    let top_right = height(12);
    let typ = u32::from_le_bytes([record[16], record[17], record[18], record[19]]);
    let altitude = (bottom_left + bottom_right + top_left + top_right) / 4.0;

    Tile {
        bottom_left,
        bottom_right,
        top_left,
        top_right,
        typ,
        altitude,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io::Cursor;

    fn gat_bytes(width: u32, height: u32, tile_count: usize) -> Vec<u8> {
        let mut bytes = Vec::new();
        bytes.extend_from_slice(SIGNATURE);
        bytes.extend_from_slice(&width.to_le_bytes());
        bytes.extend_from_slice(&height.to_le_bytes());
        for _ in 0..tile_count {
            bytes.extend_from_slice(&[0; TILE_SIZE_BYTES]);
        }
        bytes
    }

    #[test]
    fn test_decode() {
        let gat = Decoder::new(Cursor::new(gat_bytes(4, 3, 12)))
            .decode()
            .unwrap();
        assert_eq!(gat.size(), (4, 3));
    }

    #[test]
    fn test_decode_invalid_signature() {
        let mut bytes = gat_bytes(1, 1, 1);
        bytes[0] = b'X';

        let result = Decoder::new(Cursor::new(bytes)).decode();
        assert!(matches!(result, Err(DecodeError::InvalidSignature)));
    }

    #[test]
    fn test_decode_truncated_header() {
        let result = Decoder::new(Cursor::new(&b"GRAT\x01\x02\x01"[..])).decode();
        assert!(matches!(result, Err(DecodeError::Truncated)));
    }

    #[test]
    fn test_decode_invalid_tile_count() {
        let result = Decoder::new(Cursor::new(gat_bytes(4, 3, 11))).decode();
        assert!(matches!(
            result,
            Err(DecodeError::InvalidTileCount {
                width: 4,
                height: 3,
                actual,
            }) if actual == 11 * TILE_SIZE_BYTES
        ));
    }

    #[test]
    fn test_decode_tile_type() {
        let mut record = [0; TILE_SIZE_BYTES];
        record[16..20].copy_from_slice(&5u32.to_le_bytes());

        let tile = decode_tile(&record);
        assert_eq!(tile.typ, 5);
        assert_eq!(tile.altitude, 0.0);
    }
}
