//! Rotated box element
//!
//! Fills a rectangle spanned around a center point and rotated about it.
//! The box is alpha-overlaid onto whatever was drawn before it.

use crate::color::Color;
use crate::element::{Element, Frame};
use crate::id::AttributeId;
use crate::surface::MatrixSurface;

/// Rotation in radians
pub const ROTATION_ATTRIBUTE: AttributeId = 0x000;
pub const UP_ATTRIBUTE: AttributeId = 0x001;
pub const DOWN_ATTRIBUTE: AttributeId = 0x002;
pub const LEFT_ATTRIBUTE: AttributeId = 0x003;
pub const RIGHT_ATTRIBUTE: AttributeId = 0x004;
/// Alpha channel of the box color
pub const ALPHA_ATTRIBUTE: AttributeId = 0xA000;
pub const CENTER_X_ATTRIBUTE: AttributeId = 0xC200;
pub const CENTER_Y_ATTRIBUTE: AttributeId = 0xC201;

pub const BOX_COLOR_ATTRIBUTE: AttributeId = 0;

/// Configuration for the box element
///
/// Extents are measured from the center, in pixels, before rotation.
#[derive(Debug, Clone, Copy)]
pub struct BoxConfig {
    pub center_x: f32,
    pub center_y: f32,
    pub rotation: f32,
    pub up: f32,
    pub down: f32,
    pub left: f32,
    pub right: f32,
    pub color: Color,
}

impl Default for BoxConfig {
    fn default() -> Self {
        Self {
            center_x: 0.0,
            center_y: 0.0,
            rotation: 0.0,
            up: 0.0,
            down: 0.0,
            left: 0.0,
            right: 0.0,
            color: Color::BLACK,
        }
    }
}

#[derive(Debug, Clone)]
pub struct BoxElement {
    center_x: f32,
    center_y: f32,
    rotation: f32,
    up: f32,
    down: f32,
    left: f32,
    right: f32,
    color: Color,
}

impl Default for BoxElement {
    fn default() -> Self {
        Self::new(&BoxConfig::default())
    }
}

impl BoxElement {
    pub const fn new(config: &BoxConfig) -> Self {
        Self {
            center_x: config.center_x,
            center_y: config.center_y,
            rotation: config.rotation,
            up: config.up,
            down: config.down,
            left: config.left,
            right: config.right,
            color: config.color,
        }
    }

    #[must_use]
    pub const fn with_color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }

    #[must_use]
    pub const fn with_rotation(mut self, rotation: f32) -> Self {
        self.rotation = rotation;
        self
    }

    /// Whether the point `(dx, dy)`, relative to the center with y pointing
    /// up, lies inside the box
    pub fn covers(&self, dx: f32, dy: f32) -> bool {
        self.covers_rotated(libm::sinf(self.rotation), libm::cosf(self.rotation), dx, dy)
    }

    #[allow(clippy::neg_cmp_op_on_partial_ord, clippy::nonminimal_bool)]
    fn covers_rotated(&self, sin: f32, cos: f32, dx: f32, dy: f32) -> bool {
        let rx = cos * dx + sin * dy;
        let ry = cos * dy - sin * dx;
        !(rx > self.right || rx < -self.left || ry > self.up || ry < -self.down)
    }
}

impl Element for BoxElement {
    fn float_attr(&mut self, id: AttributeId) -> Option<&mut f32> {
        match id {
            ROTATION_ATTRIBUTE => Some(&mut self.rotation),
            UP_ATTRIBUTE => Some(&mut self.up),
            DOWN_ATTRIBUTE => Some(&mut self.down),
            LEFT_ATTRIBUTE => Some(&mut self.left),
            RIGHT_ATTRIBUTE => Some(&mut self.right),
            ALPHA_ATTRIBUTE => Some(&mut self.color.alpha),
            CENTER_X_ATTRIBUTE => Some(&mut self.center_x),
            CENTER_Y_ATTRIBUTE => Some(&mut self.center_y),
            _ => None,
        }
    }

    fn color_attr(&mut self, id: AttributeId) -> Option<&mut Color> {
        match id {
            BOX_COLOR_ATTRIBUTE => Some(&mut self.color),
            _ => None,
        }
    }

    #[allow(clippy::cast_precision_loss)]
    fn advance<S: MatrixSurface>(&mut self, _frame: &Frame, surface: &mut S) {
        let (sin, cos) = (libm::sinf(self.rotation), libm::cosf(self.rotation));
        for y in 0..surface.height() {
            let dy = self.center_y - y as f32;
            for x in 0..surface.width() {
                if self.covers_rotated(sin, cos, x as f32 - self.center_x, dy) {
                    surface.overlay_pixel(x, y, self.color);
                }
            }
        }
    }
}
