mod decoder;

use glam::{IVec2, Vec2};
use serde::Serialize;

use crate::graphics::Color;

pub use decoder::{DecodeError, Decoder};

/// The animation interval used until the interval table at the end of the
/// file overrides it.
pub const DEFAULT_INTERVAL: f32 = 4.0;

/// A layered sprite animation set.
#[derive(Clone, Debug, Serialize)]
pub struct Act {
    pub version: u16,
    pub animations: Vec<Animation>,
    /// Named events referenced by frame triggers, sound file names in
    /// practice.
    pub triggers: Vec<String>,
}

#[derive(Clone, Debug, Serialize)]
pub struct Animation {
    pub frames: Vec<Frame>,
    pub interval: f32,
}

impl Default for Animation {
    fn default() -> Self {
        Animation {
            frames: Vec::new(),
            interval: DEFAULT_INTERVAL,
        }
    }
}

#[derive(Clone, Debug, Serialize)]
pub struct Frame {
    pub layers: Vec<Layer>,
    /// Index into the trigger table, or -1 for none.
    pub trigger: i32,
}

impl Default for Frame {
    fn default() -> Self {
        Frame {
            layers: Vec::new(),
            trigger: -1,
        }
    }
}

/// A single sprite placement within a frame.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Layer {
    /// Offset from the center of the frame.
    pub offset: IVec2,
    /// Index of the image in the companion sprite file.
    pub sprite_index: u32,
    pub flipped: bool,
    pub color: Color,
    pub zoom: Vec2,
    pub angle: f32,
}

impl Default for Layer {
    fn default() -> Self {
        Layer {
            offset: IVec2::ZERO,
            sprite_index: 0,
            flipped: false,
            color: Color::WHITE,
            zoom: Vec2::ONE,
            angle: 0.0,
        }
    }
}
