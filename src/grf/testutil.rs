use std::io::Write as _;

use flate2::{write::ZlibEncoder, Compression};

/// Assembles archives byte by byte for the decoder tests.
pub(crate) struct ArchiveBuilder {
    allow_encryption: bool,
    version: u32,
    files: Vec<(Vec<u8>, Vec<u8>, Option<u32>)>,
    file_count_raw: Option<(u32, u32)>,
}

impl ArchiveBuilder {
    pub(crate) fn new() -> Self {
        ArchiveBuilder {
            allow_encryption: false,
            version: 0x0200,
            files: Vec::new(),
            file_count_raw: None,
        }
    }

    pub(crate) fn allow_encryption(mut self, allow: bool) -> Self {
        self.allow_encryption = allow;
        self
    }

    pub(crate) fn version(mut self, version: u32) -> Self {
        self.version = version;
        self
    }

    /// Overrides the two raw integers the file count is derived from.
    pub(crate) fn file_count_raw(mut self, b: u32, a: u32) -> Self {
        self.file_count_raw = Some((b, a));
        self
    }

    pub(crate) fn file(self, name: &str, data: &[u8]) -> Self {
        self.file_raw(name.as_bytes(), data)
    }

    pub(crate) fn file_raw(mut self, name: &[u8], data: &[u8]) -> Self {
        self.files.push((name.to_vec(), data.to_vec(), None));
        self
    }

    /// Adds a file whose stored real size disagrees with its data.
    pub(crate) fn file_with_real_size(mut self, name: &str, data: &[u8], real_size: u32) -> Self {
        self.files
            .push((name.as_bytes().to_vec(), data.to_vec(), Some(real_size)));
        self
    }

    pub(crate) fn build(self) -> Vec<u8> {
        let mut body = Vec::new();
        let mut records = Vec::new();
        for (name, data, real_size) in &self.files {
            let position = body.len() as u32;
            let compressed = zlib_compress(data);
            let real_size = real_size.unwrap_or(data.len() as u32);
            if real_size > 0 {
                body.extend_from_slice(&compressed);
            }

            records.extend_from_slice(name);
            records.push(0);
            records.extend_from_slice(&(compressed.len() as u32).to_le_bytes());
            records.extend_from_slice(&(compressed.len() as u32).to_le_bytes());
            records.extend_from_slice(&real_size.to_le_bytes());
            records.push(0x01);
            records.extend_from_slice(&position.to_le_bytes());
        }

        let index_offset = body.len() as u32;
        let compressed_records = zlib_compress(&records);
        let (b, a) = self
            .file_count_raw
            .unwrap_or((0, self.files.len() as u32 + 7));

        let mut bytes = Vec::new();
        bytes.extend_from_slice(b"Master of Magic");
        if self.allow_encryption {
            bytes.extend_from_slice(&[0, 1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12, 13, 14]);
        } else {
            bytes.extend_from_slice(&[0; 15]);
        }
        bytes.extend_from_slice(&index_offset.to_le_bytes());
        bytes.extend_from_slice(&b.to_le_bytes());
        bytes.extend_from_slice(&a.to_le_bytes());
        bytes.extend_from_slice(&self.version.to_le_bytes());
        bytes.extend_from_slice(&body);
        bytes.extend_from_slice(&(compressed_records.len() as u32).to_le_bytes());
        bytes.extend_from_slice(&(records.len() as u32).to_le_bytes());
        bytes.extend_from_slice(&compressed_records);
        bytes
    }
}

fn zlib_compress(data: &[u8]) -> Vec<u8> {
    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(data).unwrap();
    encoder.finish().unwrap()
}
