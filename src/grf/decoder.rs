use std::{
    fmt,
    io::{Error as IoError, ErrorKind, Read, Seek, SeekFrom},
};

use flate2::read::ZlibDecoder;
use indexmap::IndexMap;

use super::*;
use crate::reader::ReadLeExt;

pub(crate) const HEADER_SIZE_BYTES: usize = 46;
pub(crate) const FILE_HEADER_SIZE_BYTES: usize = 17;

const SIGNATURE: &[u8; 15] = b"Master of Magic";
const ENCRYPTION_ALLOW: [u8; 15] = [0, 1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12, 13, 14];
const ENCRYPTION_DENY: [u8; 15] = [0; 15];

pub(crate) const SUPPORTED_VERSIONS: [u16; 1] = [0x0200];

#[derive(Debug)]
pub enum ArchiveError {
    IoError(IoError),
    Truncated,
    InvalidSignature,
    InvalidEncryption,
    InvalidFileCount(i64),
    UnsupportedVersion(u16),
    NotFound(String),
    Corrupt(String),
    Closed,
    Act(crate::act::DecodeError),
    Gat(crate::gat::DecodeError),
    Sprite(crate::sprite::DecodeError),
}

impl std::error::Error for ArchiveError {}

impl From<IoError> for ArchiveError {
    fn from(error: IoError) -> Self {
        if error.kind() == ErrorKind::UnexpectedEof {
            ArchiveError::Truncated
        } else {
            ArchiveError::IoError(error)
        }
    }
}

impl From<crate::act::DecodeError> for ArchiveError {
    fn from(error: crate::act::DecodeError) -> Self {
        ArchiveError::Act(error)
    }
}

impl From<crate::gat::DecodeError> for ArchiveError {
    fn from(error: crate::gat::DecodeError) -> Self {
        ArchiveError::Gat(error)
    }
}

impl From<crate::sprite::DecodeError> for ArchiveError {
    fn from(error: crate::sprite::DecodeError) -> Self {
        ArchiveError::Sprite(error)
    }
}

impl fmt::Display for ArchiveError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArchiveError::IoError(e) => write!(f, "IO error: {e}"),
            ArchiveError::Truncated => write!(f, "unexpected end of data"),
            ArchiveError::InvalidSignature => {
                write!(f, "invalid signature: missing Master of Magic")
            }
            ArchiveError::InvalidEncryption => write!(f, "invalid encryption flag"),
            ArchiveError::InvalidFileCount(count) => write!(f, "invalid file count: {count}"),
            ArchiveError::UnsupportedVersion(v) => write!(f, "unsupported version: 0x{v:04X}"),
            ArchiveError::NotFound(name) => write!(f, "file not found in archive: {name}"),
            ArchiveError::Corrupt(reason) => write!(f, "corrupt archive: {reason}"),
            ArchiveError::Closed => write!(f, "archive is closed"),
            ArchiveError::Act(e) => write!(f, "ACT payload: {e}"),
            ArchiveError::Gat(e) => write!(f, "GAT payload: {e}"),
            ArchiveError::Sprite(e) => write!(f, "SPR payload: {e}"),
        }
    }
}

pub(crate) fn decode_header<R: Read>(reader: &mut R) -> Result<Header, ArchiveError> {
    let buf: [u8; HEADER_SIZE_BYTES] = reader.read_array()?;

    if &buf[0..15] != SIGNATURE {
        return Err(ArchiveError::InvalidSignature);
    }

    let allow_encryption = if buf[15..30] == ENCRYPTION_ALLOW {
        true
    } else if buf[15..30] == ENCRYPTION_DENY {
        false
    } else {
        return Err(ArchiveError::InvalidEncryption);
    };

    // The stored offset does not include the fixed header.
    let stored_offset = u32::from_le_bytes([buf[30], buf[31], buf[32], buf[33]]);
    let index_offset = stored_offset
        .checked_add(HEADER_SIZE_BYTES as u32)
        .ok_or_else(|| ArchiveError::Corrupt("file list offset overflows".into()))?;

    // The file count is split over two integers, with a constant bias.
    let b = u32::from_le_bytes([buf[34], buf[35], buf[36], buf[37]]);
    let a = u32::from_le_bytes([buf[38], buf[39], buf[40], buf[41]]);
    let file_count = a as i64 - b as i64 - 7;
    if file_count < 0 {
        return Err(ArchiveError::InvalidFileCount(file_count));
    }

    // Only the major byte of the version is meaningful.
    let version = (u32::from_le_bytes([buf[42], buf[43], buf[44], buf[45]]) & 0xFF00) as u16;
    if !SUPPORTED_VERSIONS.contains(&version) {
        return Err(ArchiveError::UnsupportedVersion(version));
    }

    Ok(Header {
        allow_encryption,
        index_offset,
        file_count: file_count as u32,
        version,
    })
}

fn decode_file_header(record: &[u8; FILE_HEADER_SIZE_BYTES]) -> Result<FileHeader, ArchiveError> {
    let compressed_size = u32::from_le_bytes([record[0], record[1], record[2], record[3]]);
    let archived_size = u32::from_le_bytes([record[4], record[5], record[6], record[7]]);
    let real_size = u32::from_le_bytes([record[8], record[9], record[10], record[11]]);
    let flags = FileFlags::from_bits_retain(record[12]);

    // Stored relative to the end of the fixed header.
    let position = u32::from_le_bytes([record[13], record[14], record[15], record[16]])
        .checked_add(HEADER_SIZE_BYTES as u32)
        .ok_or_else(|| ArchiveError::Corrupt("file position overflows".into()))?;

    Ok(FileHeader {
        compressed_size,
        archived_size,
        real_size,
        flags,
        position,
    })
}

/// The archive's file list.
///
/// The zlib-deflated list is decompressed up front, but its records are
/// only parsed as names are looked up or enumerated. Entries keep their
/// on-disk order.
pub(crate) struct Index {
    blob: Vec<u8>,
    pos: usize,
    remaining: u32,
    entries: IndexMap<String, FileHeader>,
}

impl Index {
    pub(crate) fn decode<R: Read + Seek>(
        reader: &mut R,
        header: &Header,
    ) -> Result<Self, ArchiveError> {
        reader.seek(SeekFrom::Start(header.index_offset as u64))?;
        let compressed_len = reader.read_u32_le()? as usize;
        let real_len = reader.read_u32_le()? as usize;
        let compressed = reader.read_vec(compressed_len)?;

        let mut blob = Vec::new();
        ZlibDecoder::new(compressed.as_slice())
            .read_to_end(&mut blob)
            .map_err(|e| ArchiveError::Corrupt(format!("file list: {e}")))?;
        if blob.len() != real_len {
            return Err(ArchiveError::Corrupt(format!(
                "file list decompressed to {} bytes, expected {real_len}",
                blob.len()
            )));
        }

        Ok(Index {
            blob,
            pos: 0,
            remaining: header.file_count,
            entries: IndexMap::new(),
        })
    }

    /// Returns the file header for `name`, parsing further records until it
    /// turns up or the list is exhausted.
    pub(crate) fn get(&mut self, name: &str) -> Result<&FileHeader, ArchiveError> {
        while !self.entries.contains_key(name) {
            if self.parse_next()?.is_none() {
                return Err(ArchiveError::NotFound(name.to_owned()));
            }
        }
        Ok(&self.entries[name])
    }

    pub(crate) fn parse_all(&mut self) -> Result<(), ArchiveError> {
        while self.parse_next()?.is_some() {}
        Ok(())
    }

    pub(crate) fn names(&self) -> impl Iterator<Item = &str> + '_ {
        self.entries.keys().map(String::as_str)
    }

    fn parse_next(&mut self) -> Result<Option<()>, ArchiveError> {
        if self.remaining == 0 || self.pos >= self.blob.len() {
            return Ok(None);
        }

        let rest = &self.blob[self.pos..];
        let nul = rest
            .iter()
            .position(|&byte| byte == 0)
            .ok_or(ArchiveError::Truncated)?;
        let name = name::decode_path(&rest[..nul]);

        let record: &[u8; FILE_HEADER_SIZE_BYTES] = rest
            .get(nul + 1..nul + 1 + FILE_HEADER_SIZE_BYTES)
            .and_then(|record| record.try_into().ok())
            .ok_or(ArchiveError::Truncated)?;
        let file_header = decode_file_header(record)?;

        self.pos += nul + 1 + FILE_HEADER_SIZE_BYTES;
        self.remaining -= 1;
        self.entries.insert(name, file_header);

        Ok(Some(()))
    }
}
