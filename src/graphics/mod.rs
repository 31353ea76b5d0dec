use serde::{Deserialize, Serialize};

/// An RGBA color with 8 bits per channel.
#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, Hash, PartialEq, Serialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const WHITE: Color = Color::new(255, 255, 255, 255);

    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Color { r, g, b, a }
    }

    /// Unpacks a 32-bit integer with byte order R (high) to A (low).
    pub const fn from_rgba32(value: u32) -> Self {
        Color {
            r: (value >> 24) as u8,
            g: (value >> 16) as u8,
            b: (value >> 8) as u8,
            a: value as u8,
        }
    }

    /// Packs the color into a 32-bit integer with byte order R (high) to A
    /// (low).
    pub const fn to_rgba32(self) -> u32 {
        (self.r as u32) << 24 | (self.g as u32) << 16 | (self.b as u32) << 8 | self.a as u32
    }
}

/// A decoded image with its pixels in row-major order, top row first.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Image {
    pub width: u32,
    pub height: u32,
    #[serde(skip)]
    pub pixels: Vec<Color>,
}

impl Image {
    pub fn to_rgba_image(&self) -> image::RgbaImage {
        let mut buf = Vec::with_capacity(self.pixels.len() * 4);
        for pixel in &self.pixels {
            buf.extend_from_slice(&[pixel.r, pixel.g, pixel.b, pixel.a]);
        }

        image::RgbaImage::from_vec(self.width, self.height, buf)
            .expect("pixel count should match image dimensions")
    }
}
