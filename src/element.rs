//! Animation elements with compile-time known variants
//!
//! All elements are stored in an enum to avoid heap allocations.
//! Each element implements the `Element` trait.

use crate::r#box::BoxElement;
use crate::color::Color;
use crate::eyes::Eyes;
use crate::id::AttributeId;
use crate::surface::MatrixSurface;
use crate::text::ScrollingText;

/// Timing of the frame being rendered
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Frame {
    /// Seconds since the previous tick
    pub delta_time: f32,
    /// Synchronized clock, already advanced by `delta_time`
    pub clock: f32,
}

pub trait Element {
    /// Resolve a float attribute by id
    fn float_attr(&mut self, id: AttributeId) -> Option<&mut f32>;

    /// Resolve a color attribute by id
    fn color_attr(&mut self, id: AttributeId) -> Option<&mut Color>;

    /// Replace the element's text, if it displays any
    fn set_text(&mut self, _text: &str) {}

    /// Advance internal state and render into the surface
    fn advance<S: MatrixSurface>(&mut self, frame: &Frame, surface: &mut S);
}

/// Element slot - enum containing all possible elements
#[derive(Debug, Clone)]
pub enum ElementSlot {
    Eyes(Eyes),
    Text(ScrollingText),
    Box(BoxElement),
}

impl Element for ElementSlot {
    fn float_attr(&mut self, id: AttributeId) -> Option<&mut f32> {
        match self {
            Self::Eyes(element) => element.float_attr(id),
            Self::Text(element) => element.float_attr(id),
            Self::Box(element) => element.float_attr(id),
        }
    }

    fn color_attr(&mut self, id: AttributeId) -> Option<&mut Color> {
        match self {
            Self::Eyes(element) => element.color_attr(id),
            Self::Text(element) => element.color_attr(id),
            Self::Box(element) => element.color_attr(id),
        }
    }

    fn set_text(&mut self, text: &str) {
        match self {
            Self::Eyes(element) => Element::set_text(element, text),
            Self::Text(element) => Element::set_text(element, text),
            Self::Box(element) => Element::set_text(element, text),
        }
    }

    fn advance<S: MatrixSurface>(&mut self, frame: &Frame, surface: &mut S) {
        match self {
            Self::Eyes(element) => element.advance(frame, surface),
            Self::Text(element) => element.advance(frame, surface),
            Self::Box(element) => element.advance(frame, surface),
        }
    }
}

impl From<Eyes> for ElementSlot {
    fn from(element: Eyes) -> Self {
        Self::Eyes(element)
    }
}

impl From<ScrollingText> for ElementSlot {
    fn from(element: ScrollingText) -> Self {
        Self::Text(element)
    }
}

impl From<BoxElement> for ElementSlot {
    fn from(element: BoxElement) -> Self {
        Self::Box(element)
    }
}
