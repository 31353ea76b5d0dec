use std::{
    fmt,
    io::{Error as IoError, ErrorKind, Read, Seek},
    ops::RangeInclusive,
    string::FromUtf8Error,
};

use glam::{IVec2, Vec2};

use super::*;
use crate::reader::ReadLeExt;

pub(crate) const SUPPORTED_VERSIONS: RangeInclusive<u16> = 0x200..=0x205;

#[derive(Debug)]
pub enum DecodeError {
    IoError(IoError),
    Truncated,
    InvalidSignature,
    UnsupportedVersion(u16),
    InvalidCount(i32),
    InvalidTrigger(FromUtf8Error),
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
            DecodeError::InvalidCount(count) => write!(f, "invalid count: {count}"),
            DecodeError::InvalidTrigger(e) => write!(f, "trigger is not valid UTF-8: {e}"),
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

    pub fn decode(&mut self) -> Result<Act, DecodeError> {
        let signature: [u8; 2] = self.reader.read_array()?;
        if &signature != b"AC" {
            return Err(DecodeError::InvalidSignature);
        }

        let version = self.reader.read_u16_le()?;
        if !SUPPORTED_VERSIONS.contains(&version) {
            return Err(DecodeError::UnsupportedVersion(version));
        }

        let animation_count = self.reader.read_u16_le()?;
        self.reader.skip(10)?; // reserved

        let mut animations = Vec::with_capacity(animation_count as usize);
        for _ in 0..animation_count {
            animations.push(self.read_animation(version)?);
        }

        let triggers = if version >= 0x201 {
            self.read_triggers()?
        } else {
            Vec::new()
        };

        if version >= 0x202 {
            self.read_intervals(&mut animations)?;
        }

        Ok(Act {
            version,
            animations,
            triggers,
        })
    }

    fn read_animation(&mut self, version: u16) -> Result<Animation, DecodeError> {
        let frame_count = self.reader.read_u32_le()?;

        let mut frames = Vec::new();
        for _ in 0..frame_count {
            frames.push(self.read_frame(version)?);
        }

        Ok(Animation {
            frames,
            ..Animation::default()
        })
    }

    fn read_frame(&mut self, version: u16) -> Result<Frame, DecodeError> {
        self.reader.skip(32)?; // two range rects, unused

        let layer_count = self.reader.read_i32_le()?;
        if layer_count < 0 {
            return Err(DecodeError::InvalidCount(layer_count));
        }

        let mut layers = Vec::new();
        for _ in 0..layer_count {
            layers.push(self.read_layer(version)?);
        }

        let trigger = if version >= 0x200 {
            self.reader.read_i32_le()?
        } else {
            -1
        };

        // Anchor data has no known use, so it is consumed and dropped.
        if version >= 0x203 {
            let anchor_count = self.reader.read_i32_le()?;
            if anchor_count < 0 {
                return Err(DecodeError::InvalidCount(anchor_count));
            }
            self.reader.skip(16 * anchor_count as u64)?;
        }

        Ok(Frame { layers, trigger })
    }

    fn read_layer(&mut self, version: u16) -> Result<Layer, DecodeError> {
        let x = self.reader.read_i32_le()?;
        let y = self.reader.read_i32_le()?;
        let sprite_index = self.reader.read_u32_le()?;
        let flags = self.reader.read_u32_le()?;

        let mut layer = Layer {
            offset: IVec2::new(x, y),
            sprite_index,
            flipped: flags & 1 != 0,
            ..Layer::default()
        };

        if version >= 0x200 {
            // The four bytes are assigned to the channels in file order.
            let [r, g, b, a] = self.reader.read_array()?;
            layer.color = Color::new(r, g, b, a);
        }

        if version >= 0x204 {
            let zoom_x = self.reader.read_f32_le()?;
            let zoom_y = self.reader.read_f32_le()?;
            layer.zoom = Vec2::new(zoom_x, zoom_y);
        } else if version >= 0x200 {
            layer.zoom = Vec2::splat(self.reader.read_f32_le()?);
        }

        if version >= 0x200 {
            layer.angle = self.reader.read_f32_le()?;
        }

        if version >= 0x205 {
            self.reader.skip(12)?;
        } else if version >= 0x200 {
            self.reader.skip(4)?;
        }

        Ok(layer)
    }

    fn read_triggers(&mut self) -> Result<Vec<String>, DecodeError> {
        let count = self.reader.read_i32_le()?;
        if count < 0 {
            return Err(DecodeError::InvalidCount(count));
        }

        let mut triggers = Vec::new();
        for _ in 0..count {
            let record: [u8; 40] = self.reader.read_array()?;
            let end = record.iter().position(|&b| b == 0).unwrap_or(record.len());
            let name =
                String::from_utf8(record[..end].to_vec()).map_err(DecodeError::InvalidTrigger)?;
            triggers.push(name);
        }

        Ok(triggers)
    }

    /// Replaces each animation's default interval with the matching float
    /// from the file tail. Extra floats are ignored; animations beyond the
    /// table keep the default.
    fn read_intervals(&mut self, animations: &mut [Animation]) -> Result<(), DecodeError> {
        let mut tail = Vec::new();
        self.reader.read_to_end(&mut tail)?;

        for (animation, chunk) in animations.iter_mut().zip(tail.chunks_exact(4)) {
            animation.interval = f32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]);
        }

        Ok(())
    }
}
