//! Matrix surface abstraction
//!
//! Elements render straight into a [`MatrixSurface`]. The crate ships a plain
//! [`FrameBuffer`] implementation; hardware backends may implement the trait
//! directly on top of their own pixel storage.

use crate::color::{Color, Rgb};

/// Pixel and text primitives an element can draw with
pub trait MatrixSurface {
    /// Number of columns
    fn width(&self) -> i32;

    /// Number of rows
    fn height(&self) -> i32;

    /// Set a single pixel
    ///
    /// Coordinates outside the surface are ignored.
    fn set_pixel(&mut self, x: i32, y: i32, color: Color);

    /// Blend `color` over the current pixel by its alpha
    ///
    /// Surfaces that can't read back their pixels just set them.
    fn overlay_pixel(&mut self, x: i32, y: i32, color: Color) {
        self.set_pixel(x, y, color);
    }

    /// Blit a string with the surface's font
    ///
    /// Surfaces without a glyph renderer ignore text.
    fn draw_text(
        &mut self,
        _text: &[u8],
        _x: f32,
        _y: f32,
        _glyph_width: u8,
        _glyph_height: u8,
        _color: Color,
    ) {
    }
}

/// Row-major RGB frame buffer of `W` x `H` pixels
#[derive(Debug, Clone)]
pub struct FrameBuffer<const W: usize, const H: usize> {
    rows: [[Rgb; W]; H],
}

impl<const W: usize, const H: usize> FrameBuffer<W, H> {
    pub const fn new() -> Self {
        Self {
            rows: [[Rgb { r: 0, g: 0, b: 0 }; W]; H],
        }
    }

    /// Reset every pixel to black
    pub fn clear(&mut self) {
        for row in &mut self.rows {
            row.fill(Rgb::default());
        }
    }

    /// Get a pixel, `None` when out of bounds
    pub fn pixel(&self, x: usize, y: usize) -> Option<Rgb> {
        self.rows.get(y).and_then(|row| row.get(x)).copied()
    }

    pub const fn rows(&self) -> &[[Rgb; W]; H] {
        &self.rows
    }

    /// All pixels, row after row
    pub fn pixels(&self) -> &[Rgb] {
        self.rows.as_flattened()
    }

    fn pixel_mut(&mut self, x: i32, y: i32) -> Option<&mut Rgb> {
        let (Ok(x), Ok(y)) = (usize::try_from(x), usize::try_from(y)) else {
            return None;
        };
        self.rows.get_mut(y).and_then(|row| row.get_mut(x))
    }
}

impl<const W: usize, const H: usize> Default for FrameBuffer<W, H> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const W: usize, const H: usize> MatrixSurface for FrameBuffer<W, H> {
    fn width(&self) -> i32 {
        i32::try_from(W).unwrap_or(i32::MAX)
    }

    fn height(&self) -> i32 {
        i32::try_from(H).unwrap_or(i32::MAX)
    }

    fn set_pixel(&mut self, x: i32, y: i32, color: Color) {
        if let Some(pixel) = self.pixel_mut(x, y) {
            *pixel = color.to_rgb();
        }
    }

    fn overlay_pixel(&mut self, x: i32, y: i32, color: Color) {
        if let Some(pixel) = self.pixel_mut(x, y) {
            let mut blended = Color::from(*pixel);
            blended.merge_transition(Color { alpha: 1.0, ..color }, color.alpha);
            *pixel = blended.to_rgb();
        }
    }
}
