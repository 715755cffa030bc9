mod utils;

use smart_leds::RGB8;
pub use utils::{lerp, quantize, rgb_from_u32};

pub type Rgb = RGB8;

/// Animated color with alpha
///
/// Channels are kept as floats (0-255) so that slow per-frame transitions
/// don't stall on 8-bit rounding. Alpha is 0.0-1.0.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub alpha: f32,
}

impl Color {
    pub const BLACK: Self = Self::new(0.0, 0.0, 0.0, 1.0);
    pub const TRANSPARENT: Self = Self::new(0.0, 0.0, 0.0, 0.0);

    pub const fn new(r: f32, g: f32, b: f32, alpha: f32) -> Self {
        Self { r, g, b, alpha }
    }

    /// Create an opaque color from a `0xRRGGBB` value
    #[allow(clippy::cast_lossless)]
    pub const fn from_u32(color: u32) -> Self {
        let rgb = rgb_from_u32(color);
        Self::new(rgb.r as f32, rgb.g as f32, rgb.b as f32, 1.0)
    }

    /// Create a color from a `0xAARRGGBB` value
    #[allow(clippy::cast_lossless, clippy::cast_possible_truncation)]
    pub const fn from_argb(color: u32) -> Self {
        let alpha = ((color >> 24) & 0xFF) as u8;
        let mut out = Self::from_u32(color);
        out.alpha = alpha as f32 / 255.0;
        out
    }

    /// Copy of this color with its intensity scaled by `coverage` (0.0-1.0)
    ///
    /// Used for the partially covered boundary rows of anti-aliased shapes.
    #[must_use]
    pub fn brightness_mod(self, coverage: f32) -> Self {
        let coverage = coverage.clamp(0.0, 1.0);
        Self {
            r: self.r * coverage,
            g: self.g * coverage,
            b: self.b * coverage,
            alpha: self.alpha,
        }
    }

    /// Move every channel towards `target` by `factor` (0.0-1.0)
    pub fn merge_transition(&mut self, target: Self, factor: f32) {
        let factor = factor.clamp(0.0, 1.0);
        self.r = lerp(self.r, target.r, factor);
        self.g = lerp(self.g, target.g, factor);
        self.b = lerp(self.b, target.b, factor);
        self.alpha = lerp(self.alpha, target.alpha, factor);
    }

    /// Output color with alpha applied
    pub fn to_rgb(self) -> Rgb {
        let alpha = self.alpha.clamp(0.0, 1.0);
        Rgb {
            r: quantize(self.r * alpha),
            g: quantize(self.g * alpha),
            b: quantize(self.b * alpha),
        }
    }
}

impl From<Rgb> for Color {
    fn from(rgb: Rgb) -> Self {
        Self::new(f32::from(rgb.r), f32::from(rgb.g), f32::from(rgb.b), 1.0)
    }
}
