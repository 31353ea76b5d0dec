use std::{
    fmt,
    io::{Error as IoError, ErrorKind, Read, Seek},
};

use super::*;
use crate::reader::ReadLeExt;

pub(crate) const SUPPORTED_VERSIONS: [u16; 4] = [0x100, 0x101, 0x200, 0x201];

const PALETTE_SIZE_BYTES: usize = 1024;

#[derive(Debug)]
pub enum DecodeError {
    IoError(IoError),
    Truncated,
    InvalidSignature,
    UnsupportedVersion(u16),
    NoPalette,
    OutOfBounds(isize),
    RunLengthMismatch { expected: usize, actual: usize },
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
            DecodeError::UnsupportedVersion(v) => write!(f, "unsupported version: 0x{v:X}"),
            DecodeError::NoPalette => {
                write!(f, "version 0x100 sprites have no embedded palette")
            }
            DecodeError::OutOfBounds(index) => write!(f, "image index {index} is out of bounds"),
            DecodeError::RunLengthMismatch { expected, actual } => write!(
                f,
                "run-length data expanded to {actual} bytes, expected {expected}"
            ),
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

    pub fn decode(&mut self) -> Result<Spr, DecodeError> {
        let signature: [u8; 2] = self.reader.read_array()?;
        if &signature != b"SP" {
            return Err(DecodeError::InvalidSignature);
        }

        let version = self.reader.read_u16_le()?;
        if !SUPPORTED_VERSIONS.contains(&version) {
            return Err(DecodeError::UnsupportedVersion(version));
        }

        let pal_count = self.reader.read_u16_le()?;
        // Direct-color images arrived in 0x200, and with them a second count.
        let rgb_count = if version >= 0x200 {
            self.reader.read_u16_le()?
        } else {
            0
        };

        let mut frames = Vec::new();
        self.reader.read_to_end(&mut frames)?;

        // From 0x101 on, the last 1024 bytes of the file are the palette.
        let palette = if version >= 0x101 {
            if frames.len() < PALETTE_SIZE_BYTES {
                return Err(DecodeError::Truncated);
            }
            let at = frames.len() - PALETTE_SIZE_BYTES;
            let palette = decode_palette(&frames[at..]);
            frames.truncate(at);
            Some(Box::new(palette))
        } else {
            None
        };

        Ok(Spr::new(version, pal_count, rgb_count, palette, frames))
    }
}

/// Decodes the 256-entry palette from its 1024-byte tail record.
///
/// Entry 0 is the background and is forced fully transparent; every other
/// entry is fully opaque. The stored fourth byte of each entry is ignored.
fn decode_palette(data: &[u8]) -> Palette {
    let mut palette = [Color::default(); 256];
    for (index, entry) in data.chunks_exact(4).enumerate() {
        let alpha = if index == 0 { 0 } else { 255 };
        palette[index] = Color::new(entry[0], entry[1], entry[2], alpha);
    }
    palette
}
