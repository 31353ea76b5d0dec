mod decoder;
mod name;
#[cfg(test)]
pub(crate) mod testutil;

use std::{
    fs,
    io::{Cursor, Read, Seek, SeekFrom},
    path::{Path, PathBuf},
};

use bitflags::bitflags;
use flate2::read::ZlibDecoder;
use serde::{Deserialize, Serialize};

use crate::{act, gat, reader::ReadLeExt, sprite};

pub use decoder::ArchiveError;

/// The fixed 46-byte archive header.
#[derive(Clone, Copy, Debug, Serialize)]
pub struct Header {
    pub allow_encryption: bool,
    /// Absolute offset of the file list within the archive.
    pub index_offset: u32,
    pub file_count: u32,
    pub version: u16,
}

bitflags! {
    #[repr(transparent)]
    #[derive(Clone, Copy, Debug, Default, Deserialize, Eq, Hash, PartialEq, Serialize)]
    pub struct FileFlags: u8 {
        /// Set for files, clear for directories.
        const FILE = 0x01;
        /// The file uses mixed encryption.
        const MIXED_ENCRYPTION = 0x02;
        /// Only the first 0x14 bytes are encrypted.
        const HEADER_ENCRYPTED = 0x04;
    }
}

/// The per-file record from the archive's file list.
///
/// The encryption flags are read but never acted on; no decryption is
/// performed.
#[derive(Clone, Copy, Debug, Serialize)]
pub struct FileHeader {
    pub compressed_size: u32,
    pub archived_size: u32,
    pub real_size: u32,
    pub flags: FileFlags,
    /// Absolute offset of the file data within the archive.
    pub position: u32,
}

impl FileHeader {
    pub fn is_file(&self) -> bool {
        self.flags.contains(FileFlags::FILE)
    }

    pub fn is_dir(&self) -> bool {
        !self.is_file()
    }
}

/// A file read out of an archive.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Payload {
    /// The decoded logical filename.
    pub name: String,
    /// The decompressed file contents.
    pub data: Vec<u8>,
}

/// A payload decoded into one of the known embedded formats.
#[derive(Debug)]
pub enum Asset {
    Act(act::Act),
    Gat(gat::Gat),
    Sprite(sprite::Spr),
    Raw(Vec<u8>),
}

impl Payload {
    /// Decodes the payload according to its leading signature bytes.
    ///
    /// Payloads with no known signature come back as `Asset::Raw`; only the
    /// signature gates the dispatch, full validation happens in the chosen
    /// decoder.
    pub fn decode(&self) -> Result<Asset, ArchiveError> {
        if self.data.starts_with(b"AC") {
            Ok(Asset::Act(
                act::Decoder::new(Cursor::new(&self.data)).decode()?,
            ))
        } else if self.data.starts_with(b"SP") {
            Ok(Asset::Sprite(
                sprite::Decoder::new(Cursor::new(&self.data)).decode()?,
            ))
        } else if self.data.starts_with(gat::SIGNATURE) {
            Ok(Asset::Gat(
                gat::Decoder::new(Cursor::new(&self.data)).decode()?,
            ))
        } else {
            Ok(Asset::Raw(self.data.clone()))
        }
    }
}

/// A GRF container archive.
///
/// The archive owns its byte source until [`close`](Archive::close) is
/// called. The file list is decompressed when the archive opens but its
/// records are parsed lazily as names are looked up or enumerated.
pub struct Archive<R>
where
    R: Read + Seek,
{
    reader: Option<R>,
    header: Header,
    index: decoder::Index,
}

impl<R: Read + Seek> Archive<R> {
    /// Reads the archive header and file list from `reader`.
    pub fn from_reader(mut reader: R) -> Result<Self, ArchiveError> {
        let header = decoder::decode_header(&mut reader)?;
        let index = decoder::Index::decode(&mut reader, &header)?;

        Ok(Archive {
            reader: Some(reader),
            header,
            index,
        })
    }

    pub fn header(&self) -> &Header {
        &self.header
    }

    pub fn version(&self) -> u16 {
        self.header.version
    }

    pub fn allow_encryption(&self) -> bool {
        self.header.allow_encryption
    }

    /// Returns the number of files the archive header declares.
    pub fn len(&self) -> usize {
        self.header.file_count as usize
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns every logical filename, in on-disk order.
    ///
    /// Repeated enumerations yield the same sequence.
    pub fn files(&mut self) -> Result<impl Iterator<Item = &str> + '_, ArchiveError> {
        self.index.parse_all()?;
        Ok(self.index.names())
    }

    /// Returns the file list record for `name`.
    pub fn file_header(&mut self, name: &str) -> Result<FileHeader, ArchiveError> {
        self.index.get(name).copied()
    }

    /// Reads and decompresses the file stored under `name`.
    pub fn open(&mut self, name: &str) -> Result<Payload, ArchiveError> {
        if self.reader.is_none() {
            return Err(ArchiveError::Closed);
        }
        let file_header = *self.index.get(name)?;
        let reader = self.reader.as_mut().ok_or(ArchiveError::Closed)?;

        let data = if file_header.real_size == 0 {
            Vec::new()
        } else {
            reader.seek(SeekFrom::Start(file_header.position as u64))?;
            let compressed = reader.read_vec(file_header.archived_size as usize)?;

            let mut data = Vec::new();
            ZlibDecoder::new(compressed.as_slice())
                .read_to_end(&mut data)
                .map_err(|e| ArchiveError::Corrupt(format!("{name}: {e}")))?;
            if data.len() != file_header.real_size as usize {
                return Err(ArchiveError::Corrupt(format!(
                    "{name} decompressed to {} bytes, expected {}",
                    data.len(),
                    file_header.real_size
                )));
            }
            data
        };

        Ok(Payload {
            name: name.to_owned(),
            data,
        })
    }

    /// Writes the file stored under `name` to `dest_dir/data/<name>`,
    /// creating parent directories and overwriting an existing file.
    ///
    /// Returns the path of the written file.
    pub fn extract(
        &mut self,
        name: &str,
        dest_dir: impl AsRef<Path>,
    ) -> Result<PathBuf, ArchiveError> {
        let payload = self.open(name)?;

        let target = dest_dir.as_ref().join("data").join(&payload.name);
        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&target, &payload.data)?;

        Ok(target)
    }

    /// Releases the underlying byte source.
    ///
    /// Subsequent reads fail with `ArchiveError::Closed`. Closing an
    /// already closed archive does nothing.
    pub fn close(&mut self) {
        self.reader = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use super::testutil::ArchiveBuilder;

    fn archive(bytes: Vec<u8>) -> Archive<Cursor<Vec<u8>>> {
        Archive::from_reader(Cursor::new(bytes)).unwrap()
    }

    #[test]
    fn test_single_file_archive() {
        let mut archive = archive(
            ArchiveBuilder::new()
                .allow_encryption(true)
                .file("a.txt", b"hello grf")
                .build(),
        );

        assert_eq!(archive.version(), 0x0200);
        assert!(archive.allow_encryption());
        assert_eq!(archive.len(), 1);

        let payload = archive.open("a.txt").unwrap();
        assert_eq!(payload.name, "a.txt");
        assert_eq!(payload.data, b"hello grf");
    }

    #[test]
    fn test_open_is_idempotent() {
        let mut archive = archive(ArchiveBuilder::new().file("a.txt", b"hello").build());
        assert_eq!(archive.open("a.txt").unwrap(), archive.open("a.txt").unwrap());
    }

    #[test]
    fn test_open_not_found() {
        let mut archive = archive(ArchiveBuilder::new().file("a.txt", b"hello").build());
        let result = archive.open("b.txt");
        assert!(matches!(result, Err(ArchiveError::NotFound(name)) if name == "b.txt"));
    }

    #[test]
    fn test_open_empty_file() {
        let mut archive = archive(ArchiveBuilder::new().file("empty.txt", b"").build());
        assert_eq!(archive.open("empty.txt").unwrap().data, b"");
    }

    #[test]
    fn test_open_real_size_mismatch() {
        let mut archive = archive(
            ArchiveBuilder::new()
                .file_with_real_size("a.txt", b"hello", 3)
                .build(),
        );

        let result = archive.open("a.txt");
        assert!(matches!(result, Err(ArchiveError::Corrupt(_))));
    }

    #[test]
    fn test_files_order_is_stable() {
        let bytes = ArchiveBuilder::new()
            .file("a.txt", b"first")
            .file("b.dat", b"second")
            .file("c.bin", b"third")
            .build();

        let mut archive = archive(bytes.clone());
        let first: Vec<String> = archive.files().unwrap().map(str::to_owned).collect();
        let second: Vec<String> = archive.files().unwrap().map(str::to_owned).collect();
        assert_eq!(first, vec!["a.txt", "b.dat", "c.bin"]);
        assert_eq!(first, second);

        // A fresh archive over the same bytes enumerates in the same order,
        // even after an interleaved lookup.
        let mut other = self::archive(bytes);
        other.file_header("b.dat").unwrap();
        let third: Vec<String> = other.files().unwrap().map(str::to_owned).collect();
        assert_eq!(first, third);
    }

    #[test]
    fn test_file_header_fields() {
        let mut archive = archive(ArchiveBuilder::new().file("a.txt", b"hello").build());

        let header = archive.file_header("a.txt").unwrap();
        assert_eq!(header.real_size, 5);
        assert!(header.is_file());
        assert!(!header.is_dir());
    }

    #[test]
    fn test_close() {
        let mut archive = archive(ArchiveBuilder::new().file("a.txt", b"hello").build());
        archive.close();

        let result = archive.open("a.txt");
        assert!(matches!(result, Err(ArchiveError::Closed)));
    }

    #[test]
    fn test_extract() {
        let bytes = ArchiveBuilder::new()
            .file("a.txt", b"first")
            .file_raw(b"data\\texture\\b.bmp", b"second")
            .build();
        let mut archive = archive(bytes);
        let dest = tempfile::tempdir().unwrap();

        let target = archive.extract("a.txt", dest.path()).unwrap();
        assert_eq!(target, dest.path().join("data").join("a.txt"));
        assert_eq!(fs::read(&target).unwrap(), b"first");

        let name = ["texture", "b.bmp"].join(std::path::MAIN_SEPARATOR_STR);
        let target = archive.extract(&name, dest.path()).unwrap();
        assert_eq!(
            target,
            dest.path().join("data").join("texture").join("b.bmp")
        );
        assert_eq!(fs::read(&target).unwrap(), b"second");
    }

    #[test]
    fn test_payload_decode_dispatch() {
        let mut gat_bytes = Vec::new();
        gat_bytes.extend_from_slice(gat::SIGNATURE);
        gat_bytes.extend_from_slice(&1u32.to_le_bytes());
        gat_bytes.extend_from_slice(&1u32.to_le_bytes());
        gat_bytes.extend_from_slice(&[0; 20]);

        let mut act_bytes = Vec::new();
        act_bytes.extend_from_slice(b"AC");
        act_bytes.extend_from_slice(&0x200u16.to_le_bytes());
        act_bytes.extend_from_slice(&0u16.to_le_bytes());
        act_bytes.extend_from_slice(&[0; 10]);

        let mut spr_bytes = Vec::new();
        spr_bytes.extend_from_slice(b"SP");
        spr_bytes.extend_from_slice(&0x100u16.to_le_bytes());
        spr_bytes.extend_from_slice(&0u16.to_le_bytes());

        let mut archive = archive(
            ArchiveBuilder::new()
                .file("map.gat", &gat_bytes)
                .file("anim.act", &act_bytes)
                .file("image.spr", &spr_bytes)
                .file("notes.txt", b"plain text")
                .build(),
        );

        assert!(matches!(
            archive.open("map.gat").unwrap().decode().unwrap(),
            Asset::Gat(gat) if gat.size() == (1, 1)
        ));
        assert!(matches!(
            archive.open("anim.act").unwrap().decode().unwrap(),
            Asset::Act(act) if act.version == 0x200
        ));
        assert!(matches!(
            archive.open("image.spr").unwrap().decode().unwrap(),
            Asset::Sprite(spr) if spr.version() == 0x100
        ));
        assert!(matches!(
            archive.open("notes.txt").unwrap().decode().unwrap(),
            Asset::Raw(data) if data == b"plain text"
        ));
    }
}
