//! Eyes element
//!
//! Every frame the eye outline is rebuilt from scratch:
//! 1. the weighted emotion templates are blended into one shape,
//!    with the relaxed template filling up any missing weight;
//! 2. a periodic blink pulls the boundaries together;
//! 3. the column under the iris is cut down to a thin notch;
//! 4. every column is rasterized with anti-aliased boundary rows.
//!
//! Nothing but the emotion weights, colors and iris position is retained
//! between frames.

use crate::color::Color;
use crate::element::{Element, Frame};
use crate::id::AttributeId;
use crate::surface::MatrixSurface;
use crate::templates::{
    ANGRY_EYE, CLOSED_EYE, EYE_COLUMNS, EyeShape, HAPPY_EYE, HEART_EYE, RELAXED_EYE,
    SHY_EYE, SURPRISED_EYE,
};

const EMOTION_NAME_ANGRY: &str = "angry";
const EMOTION_NAME_HAPPY: &str = "happy";
const EMOTION_NAME_HEART: &str = "heart";
const EMOTION_NAME_SURPRISED: &str = "surprised";
const EMOTION_NAME_SHY: &str = "shy";

const EMOTION_ID_ANGRY: u8 = 0;
const EMOTION_ID_HAPPY: u8 = 1;
const EMOTION_ID_HEART: u8 = 2;
const EMOTION_ID_SURPRISED: u8 = 3;
const EMOTION_ID_SHY: u8 = 4;

pub const EMOTION_COUNT: usize = 5;

/// Float attribute holding the iris column
pub const IRIS_ATTRIBUTE: AttributeId = 0x000;
/// First emotion weight attribute, the others follow in [`Emotion`] order
pub const EMOTION_ATTRIBUTE_BASE: AttributeId = 0x100;

pub const OUTER_COLOR_ATTRIBUTE: AttributeId = 0;
pub const INNER_COLOR_ATTRIBUTE: AttributeId = 1;
pub const BLUSH_COLOR_ATTRIBUTE: AttributeId = 2;

/// Templates blended in with less weight than this are skipped
const MIN_BLEND_WEIGHT: f32 = 0.1;

const BLINK_PERIOD: f32 = 10.0;
const BLINK_PEAK: f32 = 1.3;
const BLINK_SHARPNESS: f32 = 15.0;
const BLINK_TOP_TRAVEL: f32 = 0.7;
const BLINK_BOTTOM_TRAVEL: f32 = 0.3;

/// Height of the slit left in the iris column
const IRIS_NOTCH: f32 = 0.1;

const BLUSH_MIN_ALPHA: f32 = 0.1;
const BLUSH_DOTS: i32 = 5;
const BLUSH_ROWS: i32 = 3;
const BLUSH_SPACING: i32 = 3;
// Blush origin relative to the eye origin
const BLUSH_OFFSET_X: i32 = -1;
const BLUSH_OFFSET_Y: i32 = 8;

const DEFAULT_OUTER_COLOR: u32 = 0x99_00AA;
const DEFAULT_BLUSH_COLOR: u32 = 0xFF_60A0;
const DEFAULT_IRIS_POSITION: f32 = 3.0;
const DEFAULT_ORIGIN_X: i32 = 18;
const DEFAULT_ORIGIN_Y: i32 = 1;

/// Emotions that can be blended into the eye shape
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u8)]
pub enum Emotion {
    Angry = EMOTION_ID_ANGRY,
    Happy = EMOTION_ID_HAPPY,
    Heart = EMOTION_ID_HEART,
    Surprised = EMOTION_ID_SURPRISED,
    Shy = EMOTION_ID_SHY,
}

impl Emotion {
    pub const ALL: [Self; EMOTION_COUNT] = [
        Self::Angry,
        Self::Happy,
        Self::Heart,
        Self::Surprised,
        Self::Shy,
    ];

    pub fn from_raw(value: u8) -> Option<Self> {
        Some(match value {
            EMOTION_ID_ANGRY => Self::Angry,
            EMOTION_ID_HAPPY => Self::Happy,
            EMOTION_ID_HEART => Self::Heart,
            EMOTION_ID_SURPRISED => Self::Surprised,
            EMOTION_ID_SHY => Self::Shy,
            _ => return None,
        })
    }

    /// Map a float attribute id onto the emotion it weights
    pub fn from_attribute(id: AttributeId) -> Option<Self> {
        let offset = id.checked_sub(EMOTION_ATTRIBUTE_BASE)?;
        u8::try_from(offset).ok().and_then(Self::from_raw)
    }

    pub const fn index(self) -> usize {
        self as usize
    }

    /// Float attribute id of this emotion's weight
    pub const fn attribute(self) -> AttributeId {
        EMOTION_ATTRIBUTE_BASE + self as AttributeId
    }

    pub const fn template(self) -> &'static EyeShape {
        match self {
            Self::Angry => &ANGRY_EYE,
            Self::Happy => &HAPPY_EYE,
            Self::Heart => &HEART_EYE,
            Self::Surprised => &SURPRISED_EYE,
            Self::Shy => &SHY_EYE,
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Angry => EMOTION_NAME_ANGRY,
            Self::Happy => EMOTION_NAME_HAPPY,
            Self::Heart => EMOTION_NAME_HEART,
            Self::Surprised => EMOTION_NAME_SURPRISED,
            Self::Shy => EMOTION_NAME_SHY,
        }
    }

    pub fn parse_from_str(s: &str) -> Option<Self> {
        match s {
            EMOTION_NAME_ANGRY => Some(Self::Angry),
            EMOTION_NAME_HAPPY => Some(Self::Happy),
            EMOTION_NAME_HEART => Some(Self::Heart),
            EMOTION_NAME_SURPRISED => Some(Self::Surprised),
            EMOTION_NAME_SHY => Some(Self::Shy),
            _ => None,
        }
    }
}

/// One emotion template and its live weight
#[derive(Debug, Clone, Copy)]
pub struct EmotionRecord {
    pub shape: &'static EyeShape,
    /// Conventionally 0.0-1.0, but not clamped
    pub expressiveness: f32,
}

/// Effective template weights after normalization
///
/// For non-negative inputs the relaxed and emotion weights always add up to 1.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BlendWeights {
    pub relaxed: f32,
    pub emotions: [f32; EMOTION_COUNT],
}

impl BlendWeights {
    pub fn new(expressiveness: &[f32; EMOTION_COUNT]) -> Self {
        let expression_sum: f32 = expressiveness.iter().map(|weight| weight.max(0.0)).sum();
        let divisor = expression_sum.max(1.0);
        Self {
            relaxed: (1.0 - expression_sum).max(0.0),
            emotions: expressiveness.map(|weight| weight / divisor),
        }
    }

    pub fn total(&self) -> f32 {
        self.relaxed + self.emotions.iter().sum::<f32>()
    }
}

/// Add `shape` scaled by `factor` onto the accumulator
///
/// Factors below 0.1 are skipped.
pub fn add_shape(accumulator: &mut EyeShape, shape: &EyeShape, factor: f32) {
    if factor < MIN_BLEND_WEIGHT {
        return;
    }
    for (boundary, value) in accumulator.iter_mut().zip(shape) {
        *boundary += value * factor;
    }
}

/// Blend the relaxed template and all emotion templates into one shape
pub fn blend_shape(emotions: &[EmotionRecord; EMOTION_COUNT]) -> EyeShape {
    let expressiveness = core::array::from_fn(|i| emotions[i].expressiveness);
    let weights = BlendWeights::new(&expressiveness);

    let mut shape = CLOSED_EYE;
    add_shape(&mut shape, &RELAXED_EYE, weights.relaxed);
    for (emotion, weight) in emotions.iter().zip(weights.emotions) {
        add_shape(&mut shape, emotion.shape, weight);
    }
    shape
}

/// How far the eye is closed at `clock`
///
/// Triangle wave over a 10 second period, only positive for a short moment
/// around the middle of the period.
pub fn blink_factor(clock: f32) -> f32 {
    let phase = libm::fmodf(clock, BLINK_PERIOD) - BLINK_PERIOD / 2.0;
    BLINK_PEAK - libm::fabsf(phase) * BLINK_SHARPNESS
}

/// Pull the top and bottom boundaries together according to [`blink_factor`]
pub fn apply_blink(shape: &mut EyeShape, clock: f32) {
    let close_factor = blink_factor(clock);
    if close_factor <= 0.0 {
        return;
    }

    let top_keep = 1.0 - BLINK_TOP_TRAVEL * close_factor;
    let top_follow = BLINK_TOP_TRAVEL * close_factor;
    let bottom_follow = BLINK_BOTTOM_TRAVEL * close_factor;
    let bottom_keep = 1.0 - BLINK_TOP_TRAVEL * close_factor;

    for column in shape.chunks_exact_mut(2) {
        column[0] = column[0] * top_keep + column[1] * top_follow;
        // Bottom follows the already lowered top
        column[1] = column[0] * bottom_follow + column[1] * bottom_keep;
    }
}

/// Cut the column under the iris down to a thin notch
///
/// Positions that don't round onto a column are ignored.
#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_precision_loss
)]
pub fn clip_iris(shape: &mut EyeShape, iris_position: f32) {
    let column = libm::roundf(iris_position);
    if !(0.0..EYE_COLUMNS as f32).contains(&column) {
        return;
    }
    let top = column as usize * 2;
    shape[top] = shape[top].max(shape[top + 1] - IRIS_NOTCH);
}

/// Rasterize one column spanning the fractional rows `top..bottom`
///
/// Fully covered rows get `color`, the two boundary rows get `color` scaled by
/// their coverage. Every row is painted at most once and rows without
/// coverage are left untouched.
#[allow(
    clippy::cast_possible_truncation,
    clippy::float_cmp,
    clippy::neg_cmp_op_on_partial_ord
)]
pub fn rasterize_column<S: MatrixSurface>(
    surface: &mut S,
    x: i32,
    origin_y: i32,
    top: f32,
    bottom: f32,
    color: Color,
) {
    if !(top < bottom) {
        return;
    }

    let top_row = libm::floorf(top);
    let bottom_row = libm::floorf(bottom);

    let mut paint = |row: f32, coverage: f32| {
        if coverage > 0.0 {
            surface.set_pixel(x, origin_y + row as i32, color.brightness_mod(coverage));
        }
    };

    if top_row == bottom_row {
        paint(top_row, bottom - top);
        return;
    }

    paint(top_row, 1.0 - (top - top_row));
    let mut row = top_row + 1.0;
    while row < bottom_row {
        paint(row, 1.0);
        row += 1.0;
    }
    paint(bottom_row, bottom - bottom_row);
}

/// Configuration for the eyes element
#[derive(Debug, Clone, Copy)]
pub struct EyesConfig {
    pub outer_color: Color,
    pub inner_color: Color,
    pub blush_color: Color,
    /// Iris column (0-10)
    pub iris_position: f32,
    /// Surface column of the first eye column
    pub origin_x: i32,
    /// Surface row of eye row 0
    pub origin_y: i32,
}

impl Default for EyesConfig {
    fn default() -> Self {
        Self {
            outer_color: Color::from_u32(DEFAULT_OUTER_COLOR),
            inner_color: Color::BLACK,
            blush_color: Color::from_u32(DEFAULT_BLUSH_COLOR),
            iris_position: DEFAULT_IRIS_POSITION,
            origin_x: DEFAULT_ORIGIN_X,
            origin_y: DEFAULT_ORIGIN_Y,
        }
    }
}

/// Expressive eyes blended from emotion templates
#[derive(Debug, Clone)]
pub struct Eyes {
    outer_color: Color,
    /// Reserved for an iris fill, settable but not drawn yet
    inner_color: Color,
    blush_color: Color,
    iris_position: f32,
    origin_x: i32,
    origin_y: i32,
    emotions: [EmotionRecord; EMOTION_COUNT],
}

impl Default for Eyes {
    fn default() -> Self {
        Self::new(&EyesConfig::default())
    }
}

impl Eyes {
    pub fn new(config: &EyesConfig) -> Self {
        Self {
            outer_color: config.outer_color,
            inner_color: config.inner_color,
            blush_color: config.blush_color,
            iris_position: config.iris_position,
            origin_x: config.origin_x,
            origin_y: config.origin_y,
            emotions: Emotion::ALL.map(|emotion| EmotionRecord {
                shape: emotion.template(),
                expressiveness: 0.0,
            }),
        }
    }

    /// Start with an emotion already expressed
    #[must_use]
    pub fn with_expression(mut self, emotion: Emotion, weight: f32) -> Self {
        self.set_expressiveness(emotion, weight);
        self
    }

    pub fn expressiveness(&self, emotion: Emotion) -> f32 {
        self.emotions[emotion.index()].expressiveness
    }

    pub fn set_expressiveness(&mut self, emotion: Emotion, weight: f32) {
        self.emotions[emotion.index()].expressiveness = weight;
    }

    pub const fn iris_position(&self) -> f32 {
        self.iris_position
    }

    pub const fn emotions(&self) -> &[EmotionRecord; EMOTION_COUNT] {
        &self.emotions
    }

    /// Final eye outline at `clock`: blended, blinked and iris-clipped
    pub fn shape(&self, clock: f32) -> EyeShape {
        let mut shape = blend_shape(&self.emotions);
        apply_blink(&mut shape, clock);
        clip_iris(&mut shape, self.iris_position);
        shape
    }

    fn draw_blush<S: MatrixSurface>(&self, surface: &mut S) {
        if self.blush_color.alpha < BLUSH_MIN_ALPHA {
            return;
        }

        let origin_x = self.origin_x + BLUSH_OFFSET_X;
        let origin_y = self.origin_y + BLUSH_OFFSET_Y;
        for y in 0..BLUSH_ROWS {
            for dot in 0..BLUSH_DOTS {
                surface.set_pixel(
                    origin_x + BLUSH_SPACING * dot - y,
                    origin_y + y,
                    self.blush_color,
                );
            }
        }
    }
}

impl Element for Eyes {
    fn float_attr(&mut self, id: AttributeId) -> Option<&mut f32> {
        if let Some(emotion) = Emotion::from_attribute(id) {
            return Some(&mut self.emotions[emotion.index()].expressiveness);
        }
        match id {
            IRIS_ATTRIBUTE => Some(&mut self.iris_position),
            _ => None,
        }
    }

    fn color_attr(&mut self, id: AttributeId) -> Option<&mut Color> {
        match id {
            OUTER_COLOR_ATTRIBUTE => Some(&mut self.outer_color),
            INNER_COLOR_ATTRIBUTE => Some(&mut self.inner_color),
            BLUSH_COLOR_ATTRIBUTE => Some(&mut self.blush_color),
            _ => None,
        }
    }

    fn advance<S: MatrixSurface>(&mut self, frame: &Frame, surface: &mut S) {
        let shape = self.shape(frame.clock);
        for (column, bounds) in (0..).zip(shape.chunks_exact(2)) {
            rasterize_column(
                surface,
                self.origin_x + column,
                self.origin_y,
                bounds[0],
                bounds[1],
                self.outer_color,
            );
        }

        self.draw_blush(surface);
    }
}
