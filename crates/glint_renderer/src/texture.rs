//! Texel storage for image-backed materials and environment lighting.
//!
//! Decoding files is the loader's job. This module only takes pixels that
//! are already in memory, either as raw linear colors or as `image` buffers.

use glint_math::{Color, Vec3};
use std::f32::consts::PI;
use thiserror::Error;

/// Errors that can occur while building a texture.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum TextureError {
    #[error("texture has zero size ({width}x{height})")]
    Empty { width: u32, height: u32 },

    #[error("expected {expected} texels for a {width}x{height} texture, got {actual}")]
    SizeMismatch {
        width: u32,
        height: u32,
        expected: usize,
        actual: usize,
    },
}

pub type TextureResult<T> = Result<T, TextureError>;

/// A grid of linear RGB texels, row-major, origin at the top-left.
#[derive(Clone, Debug)]
pub struct Texture {
    width: u32,
    height: u32,
    texels: Vec<Color>,
}

impl Texture {
    /// Create a texture from row-major texels.
    pub fn new(width: u32, height: u32, texels: Vec<Color>) -> TextureResult<Self> {
        if width == 0 || height == 0 {
            return Err(TextureError::Empty { width, height });
        }
        let expected = width as usize * height as usize;
        if texels.len() != expected {
            return Err(TextureError::SizeMismatch {
                width,
                height,
                expected,
                actual: texels.len(),
            });
        }
        Ok(Self {
            width,
            height,
            texels,
        })
    }

    /// Create a 1x1 texture.
    pub fn solid(color: Color) -> Self {
        Self {
            width: 1,
            height: 1,
            texels: vec![color],
        }
    }

    /// Convert an 8-bit image. Channel values are scaled to [0, 1] with no
    /// gamma curve applied, matching palette-indexed source art.
    pub fn from_rgb8(image: &image::RgbImage) -> TextureResult<Self> {
        let texels = image
            .pixels()
            .map(|p| Vec3::new(p[0] as f32, p[1] as f32, p[2] as f32) / 255.0)
            .collect();
        Self::new(image.width(), image.height(), texels)
    }

    /// Convert a floating point image, e.g. a decoded HDR environment.
    pub fn from_rgb32f(image: &image::Rgb32FImage) -> TextureResult<Self> {
        let texels = image.pixels().map(|p| Vec3::new(p[0], p[1], p[2])).collect();
        Self::new(image.width(), image.height(), texels)
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Texel at integer coordinates, wrapping in both directions.
    pub fn wrapped(&self, x: i64, y: i64) -> Color {
        let x = x.rem_euclid(self.width as i64) as usize;
        let y = y.rem_euclid(self.height as i64) as usize;
        self.texels[y * self.width as usize + x]
    }
}

/// Equirectangular (latitude/longitude) sky lookup.
#[derive(Clone, Debug)]
pub struct EnvironmentMap {
    texture: Texture,
}

impl EnvironmentMap {
    pub fn new(texture: Texture) -> Self {
        Self { texture }
    }

    /// Radiance arriving from `direction` (unit length).
    ///
    /// +Z maps to the horizontal center of the image and +Y to the top row.
    pub fn sample(&self, direction: Vec3) -> Color {
        let w = self.texture.width() as f32;
        let h = self.texture.height() as f32;
        let x = w / 2.0 + direction.x.atan2(direction.z) / PI * w * 0.5;
        let y = (1.0 - direction.y.clamp(-1.0, 1.0).asin() / PI * 2.0) * h * 0.5;
        self.texture.wrapped(x.floor() as i64, y.floor() as i64)
    }
}
