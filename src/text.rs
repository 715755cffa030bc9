//! Scrolling text element
//!
//! Positions a string on the matrix and optionally scrolls it horizontally.
//! Once the text has fully left the surface it re-enters from the opposite
//! edge, one text width plus one surface width further along. Glyph rendering
//! is up to the surface.

use heapless::String;

use crate::color::Color;
use crate::element::{Element, Frame};
use crate::id::AttributeId;
use crate::surface::MatrixSurface;

/// Maximum text length in bytes
pub const TEXT_CAPACITY: usize = 64;

pub const POS_X_ATTRIBUTE: AttributeId = 1;
pub const POS_Y_ATTRIBUTE: AttributeId = 2;
pub const ALIGNMENT_ATTRIBUTE: AttributeId = 3;
pub const SCROLL_SPEED_ATTRIBUTE: AttributeId = 4;

pub const TEXT_COLOR_ATTRIBUTE: AttributeId = 0;

const GLYPH_WIDTH: u8 = 6;
const GLYPH_HEIGHT: u8 = 8;

/// Scroll speeds below this keep the text still
const MIN_SCROLL_SPEED: f32 = 0.1;

/// Configuration for the text element
#[derive(Debug, Clone, Copy)]
pub struct TextConfig {
    pub pos_x: f32,
    pub pos_y: f32,
    /// 0.0 anchors the left edge at `pos_x`, 1.0 the right edge
    pub alignment: f32,
    /// Columns per second, positive scrolls left
    pub scroll_speed: f32,
    pub color: Color,
}

impl Default for TextConfig {
    fn default() -> Self {
        Self {
            pos_x: 0.0,
            pos_y: 8.0,
            alignment: 0.0,
            scroll_speed: 0.0,
            color: Color::BLACK,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ScrollingText {
    text: String<TEXT_CAPACITY>,
    pos_x: f32,
    pos_y: f32,
    alignment: f32,
    scroll_speed: f32,
    color: Color,
}

impl Default for ScrollingText {
    fn default() -> Self {
        Self::new(&TextConfig::default())
    }
}

impl ScrollingText {
    pub fn new(config: &TextConfig) -> Self {
        Self {
            text: String::new(),
            pos_x: config.pos_x,
            pos_y: config.pos_y,
            alignment: config.alignment,
            scroll_speed: config.scroll_speed,
            color: config.color,
        }
    }

    #[must_use]
    pub fn with_text(mut self, text: &str) -> Self {
        Element::set_text(&mut self, text);
        self
    }

    pub fn text(&self) -> &str {
        self.text.as_str()
    }

    pub const fn pos_x(&self) -> f32 {
        self.pos_x
    }

    /// Rendered width of the current text in columns
    ///
    /// The surface receives the text as bytes and draws one glyph per byte.
    #[allow(clippy::cast_precision_loss)]
    fn text_width(&self) -> f32 {
        self.text.len() as f32 * f32::from(GLYPH_WIDTH)
    }
}

impl Element for ScrollingText {
    fn float_attr(&mut self, id: AttributeId) -> Option<&mut f32> {
        match id {
            POS_X_ATTRIBUTE => Some(&mut self.pos_x),
            POS_Y_ATTRIBUTE => Some(&mut self.pos_y),
            ALIGNMENT_ATTRIBUTE => Some(&mut self.alignment),
            SCROLL_SPEED_ATTRIBUTE => Some(&mut self.scroll_speed),
            _ => None,
        }
    }

    fn color_attr(&mut self, id: AttributeId) -> Option<&mut Color> {
        match id {
            TEXT_COLOR_ATTRIBUTE => Some(&mut self.color),
            _ => None,
        }
    }

    /// Replace the text, truncated to [`TEXT_CAPACITY`] on a char boundary
    fn set_text(&mut self, text: &str) {
        self.text.clear();
        for ch in text.chars() {
            if self.text.push(ch).is_err() {
                break;
            }
        }
    }

    #[allow(clippy::cast_precision_loss)]
    fn advance<S: MatrixSurface>(&mut self, frame: &Frame, surface: &mut S) {
        let width = self.text_width();

        if libm::fabsf(self.scroll_speed) > MIN_SCROLL_SPEED && !self.text.is_empty() {
            self.pos_x -= self.scroll_speed * frame.delta_time;

            let surface_width = surface.width() as f32;
            let left = self.pos_x - self.alignment * width;
            if self.scroll_speed > 0.0 && left + width < 0.0 {
                self.pos_x += width + surface_width;
            } else if self.scroll_speed < 0.0 && left > surface_width {
                self.pos_x -= width + surface_width;
            }
        }

        surface.draw_text(
            self.text.as_bytes(),
            self.pos_x - self.alignment * width,
            self.pos_y,
            GLYPH_WIDTH,
            GLYPH_HEIGHT,
            self.color,
        );
    }
}
