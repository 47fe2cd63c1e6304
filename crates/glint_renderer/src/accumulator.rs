//! Progressive radiance accumulation buffer.

use glint_math::Color;

/// Per-pixel radiance sums over a number of completed passes.
///
/// Row-major, row 0 at the top. The average of a pixel is its sum divided by
/// [`Accumulator::passes`].
#[derive(Debug, Clone, PartialEq)]
pub struct Accumulator {
    width: u32,
    height: u32,
    sums: Vec<Color>,
    passes: u32,
}

impl Accumulator {
    /// Create a buffer filled with black.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            sums: vec![Color::ZERO; width as usize * height as usize],
            passes: 0,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Number of completed passes.
    pub fn passes(&self) -> u32 {
        self.passes
    }

    /// Raw sums, row-major.
    pub fn sums(&self) -> &[Color] {
        &self.sums
    }

    pub(crate) fn sums_mut(&mut self) -> &mut [Color] {
        &mut self.sums
    }

    pub(crate) fn finish_pass(&mut self) {
        self.passes += 1;
    }

    /// Zero every sum and the pass count.
    pub fn clear(&mut self) {
        self.sums.fill(Color::ZERO);
        self.passes = 0;
    }

    /// Sum at pixel (x, y).
    ///
    /// # Panics
    ///
    /// Panics if (x, y) lies outside the image.
    pub fn get(&self, x: u32, y: u32) -> Color {
        assert!(
            x < self.width && y < self.height,
            "pixel ({x}, {y}) outside {}x{} image",
            self.width,
            self.height
        );
        self.sums[(y as usize) * self.width as usize + x as usize]
    }

    /// Mean radiance at pixel (x, y); black before the first pass.
    ///
    /// # Panics
    ///
    /// Panics if (x, y) lies outside the image.
    pub fn average(&self, x: u32, y: u32) -> Color {
        let sum = self.get(x, y);
        if self.passes == 0 {
            return Color::ZERO;
        }
        sum / self.passes as f32
    }

    /// Mean radiance of every pixel as a floating point image.
    pub fn to_image(&self) -> image::Rgb32FImage {
        image::Rgb32FImage::from_fn(self.width, self.height, |x, y| {
            let c = self.average(x, y);
            image::Rgb([c.x, c.y, c.z])
        })
    }
}
