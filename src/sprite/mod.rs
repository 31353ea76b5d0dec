mod decoder;
mod zeroruns;

use std::io::Cursor;

use crate::{
    graphics::{Color, Image},
    reader::ReadLeExt,
};

pub use decoder::{DecodeError, Decoder};

/// The 256-entry color palette embedded at the end of a sprite file.
pub type Palette = [Color; 256];

/// A sprite image collection.
///
/// Images are stored back to back with variable record sizes, palette
/// images first and direct-color images after. Records are decoded on
/// access by walking the preceding record sizes.
#[derive(Clone, Debug)]
pub struct Spr {
    version: u16,
    pal_count: u16,
    rgb_count: u16,
    palette: Option<Box<Palette>>,
    frames: Vec<u8>,
}

impl Spr {
    pub fn version(&self) -> u16 {
        self.version
    }

    /// Returns the number of palette-indexed images.
    pub fn pal_count(&self) -> u16 {
        self.pal_count
    }

    /// Returns the number of direct-color images.
    pub fn rgb_count(&self) -> u16 {
        self.rgb_count
    }

    /// Returns the total number of images, palette-indexed and direct-color
    /// combined.
    pub fn len(&self) -> usize {
        self.pal_count as usize + self.rgb_count as usize
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the embedded palette, absent in version 0x100 files.
    pub fn palette(&self) -> Option<&Palette> {
        self.palette.as_deref()
    }

    /// Returns the image at `index`.
    ///
    /// Negative indices count back from the end of the collection, so `-1`
    /// is the last image.
    ///
    /// # Errors
    ///
    /// Returns `DecodeError::OutOfBounds` if the index falls outside the
    /// collection and `DecodeError::NoPalette` when a palette-indexed image
    /// is requested from a version 0x100 file.
    pub fn get(&self, index: isize) -> Result<Image, DecodeError> {
        let len = self.len() as isize;
        let resolved = if index < 0 { index + len } else { index };
        if !(0..len).contains(&resolved) {
            return Err(DecodeError::OutOfBounds(index));
        }
        let resolved = resolved as usize;

        let mut cursor = Cursor::new(self.frames.as_slice());
        for record in 0..resolved {
            self.skip_record(&mut cursor, record)?;
        }
        self.decode_record(&mut cursor, resolved)
    }

    fn skip_record(&self, cursor: &mut Cursor<&[u8]>, record: usize) -> Result<(), DecodeError> {
        let width = cursor.read_u16_le()? as u64;
        let height = cursor.read_u16_le()? as u64;

        let data_len = if record < self.pal_count as usize {
            if self.version >= 0x201 {
                cursor.read_u16_le()? as u64
            } else {
                width * height
            }
        } else {
            4 * width * height
        };
        cursor.skip(data_len)?;

        Ok(())
    }

    fn decode_record(
        &self,
        cursor: &mut Cursor<&[u8]>,
        record: usize,
    ) -> Result<Image, DecodeError> {
        let width = cursor.read_u16_le()? as u32;
        let height = cursor.read_u16_le()? as u32;
        let pixel_count = width as usize * height as usize;

        let pixels = if record < self.pal_count as usize {
            let indices = if self.version >= 0x201 {
                let stored = cursor.read_u16_le()? as usize;
                let data = cursor.read_vec(stored)?;
                let expanded = zeroruns::expand(&data).ok_or(DecodeError::Truncated)?;
                if expanded.len() != pixel_count {
                    return Err(DecodeError::RunLengthMismatch {
                        expected: pixel_count,
                        actual: expanded.len(),
                    });
                }
                expanded
            } else {
                cursor.read_vec(pixel_count)?
            };

            let palette = self.palette.as_deref().ok_or(DecodeError::NoPalette)?;
            indices
                .iter()
                .map(|&index| palette[index as usize])
                .collect()
        } else {
            // Direct-color images are stored bottom-up; flip the rows so the
            // exposed order matches palette images.
            let mut rows = Vec::with_capacity(height as usize);
            for _ in 0..height {
                let mut row = Vec::with_capacity(width as usize);
                for _ in 0..width {
                    row.push(Color::from_rgba32(cursor.read_u32_le()?));
                }
                rows.push(row);
            }
            rows.into_iter().rev().flatten().collect()
        };

        Ok(Image {
            width,
            height,
            pixels,
        })
    }

    pub(crate) fn new(
        version: u16,
        pal_count: u16,
        rgb_count: u16,
        palette: Option<Box<Palette>>,
        frames: Vec<u8>,
    ) -> Self {
        Spr {
            version,
            pal_count,
            rgb_count,
            palette,
            frames,
        }
    }
}
