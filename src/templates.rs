//! Eye shape templates
//!
//! Every shape is 11 columns of `(top, bottom)` boundaries, measured in
//! fractional pixel rows from the top of the eye area. A column is only drawn
//! while `top < bottom`. Column 0 is the inner corner of the eye.

/// Number of display columns covered by one eye
pub const EYE_COLUMNS: usize = 11;

/// Interleaved `(top, bottom)` boundaries for every column
pub type EyeShape = [f32; EYE_COLUMNS * 2];

/// Near zero-height start point of every blend
#[rustfmt::skip]
pub const CLOSED_EYE: EyeShape = [
    0.01, -0.01,
    0.1, -0.1, 0.1, -0.1, 0.1, -0.1, 0.1, -0.1, 0.1, -0.1,
    0.1, -0.1, 0.1, -0.1, 0.1, -0.1, 0.1, -0.1, 0.1, -0.1,
];

/// Neutral almond, fills whatever weight the emotions leave over
#[rustfmt::skip]
pub const RELAXED_EYE: EyeShape = [
    4.5, 5.5,
    3.2, 6.2,
    2.4, 6.6,
    1.9, 6.8,
    1.6, 6.9,
    1.5, 6.9,
    1.6, 6.8,
    1.9, 6.6,
    2.5, 6.2,
    3.3, 5.6,
    4.4, 4.9,
];

/// Lid slanting down towards the inner corner
#[rustfmt::skip]
pub const ANGRY_EYE: EyeShape = [
    5.2, 5.8,
    4.6, 6.3,
    4.0, 6.7,
    3.4, 6.9,
    2.9, 7.0,
    2.4, 7.0,
    2.0, 6.9,
    1.7, 6.6,
    1.6, 6.2,
    1.8, 5.6,
    2.4, 4.8,
];

/// Upward arc, squinting from below
#[rustfmt::skip]
pub const HAPPY_EYE: EyeShape = [
    5.5, 6.5,
    4.2, 5.8,
    3.2, 5.0,
    2.5, 4.4,
    2.1, 4.0,
    2.0, 3.9,
    2.1, 4.0,
    2.5, 4.4,
    3.2, 5.0,
    4.2, 5.8,
    5.5, 6.5,
];

#[rustfmt::skip]
pub const HEART_EYE: EyeShape = [
    2.5, 4.0,
    1.5, 5.0,
    1.2, 6.0,
    1.5, 7.0,
    2.2, 7.8,
    3.0, 8.5,
    2.2, 7.8,
    1.5, 7.0,
    1.2, 6.0,
    1.5, 5.0,
    2.5, 4.0,
];

/// Wide open, almost round
#[rustfmt::skip]
pub const SURPRISED_EYE: EyeShape = [
    3.5, 5.5,
    2.0, 7.0,
    1.2, 7.8,
    0.7, 8.3,
    0.4, 8.6,
    0.3, 8.7,
    0.4, 8.6,
    0.7, 8.3,
    1.2, 7.8,
    2.0, 7.0,
    3.5, 5.5,
];

/// Narrow and lowered
#[rustfmt::skip]
pub const SHY_EYE: EyeShape = [
    5.8, 6.4,
    5.0, 7.0,
    4.5, 7.3,
    4.2, 7.5,
    4.0, 7.6,
    4.0, 7.6,
    4.1, 7.5,
    4.4, 7.3,
    4.8, 7.0,
    5.4, 6.6,
    6.0, 6.2,
];
