mod decoder;

use serde::Serialize;

pub use decoder::{DecodeError, Decoder};

pub(crate) const SIGNATURE: &[u8; 6] = b"GRAT\x01\x02";
pub(crate) const TILE_SIZE_BYTES: usize = 20;

/// A ground altitude map.
///
/// Tiles are decoded on access; the raw tile records are kept as read from
/// the file.
#[derive(Clone, Debug)]
pub struct Gat {
    width: u32,
    height: u32,
    tiles: Vec<u8>,
}

/// A single ground tile.
///
/// The four corner heights are sign-inverted relative to their on-disk
/// values, so a higher value means a higher altitude. `typ` is the raw type
/// flag; its meaning depends on the map's water level, which lives outside
/// this file format.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct Tile {
    pub bottom_left: f32,
    pub bottom_right: f32,
    pub top_left: f32,
    pub top_right: f32,
    pub typ: u32,
    pub altitude: f32,
}

impl Gat {
    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Returns the tile at `(x, y)`.
    ///
    /// # Errors
    ///
    /// Returns `DecodeError::OutOfBounds` if the coordinates fall outside
    /// the map.
    pub fn get(&self, x: u32, y: u32) -> Result<Tile, DecodeError> {
        if x >= self.width || y >= self.height {
            return Err(DecodeError::OutOfBounds { x, y });
        }

        let index = y as usize + x as usize * self.width as usize;
        let offset = index * TILE_SIZE_BYTES;
        let record: &[u8; TILE_SIZE_BYTES] = self
            .tiles
            .get(offset..offset + TILE_SIZE_BYTES)
            .and_then(|record| record.try_into().ok())
            .ok_or(DecodeError::OutOfBounds { x, y })?;

        Ok(decoder::decode_tile(record))
    }

    pub(crate) fn new(width: u32, height: u32, tiles: Vec<u8>) -> Self {
        Gat {
            width,
            height,
            tiles,
        }
    }
}
