//! Standing value links
//!
//! A [`CopyOp`] continuously copies a float attribute (or a constant) into
//! another attribute, optionally smoothed by a speed limited follower.
//! A [`ColorOp`] continuously fades a color attribute towards a target,
//! optionally through an intermediate color.
//!
//! Links address both ends by [`GlobalAddress`] and are resolved again every
//! tick, so they never hold on to element storage.

use crate::color::Color;
use crate::id::GlobalAddress;

/// Below this, easing distance and time count as "not set"
const EASING_EPSILON: f32 = 0.01;

/// Second order follower state
///
/// - `distance` below 0.01: no smoothing, the value jumps to the target.
/// - `time` below 0.01: first order approach, `distance` is the time constant.
/// - otherwise the approach speed itself eases in over `time`.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Easing {
    pub distance: f32,
    pub time: f32,
    pub speed: f32,
}

impl Easing {
    /// Unsmoothed passthrough
    pub const IMMEDIATE: Self = Self {
        distance: 0.0,
        time: 0.0,
        speed: 0.0,
    };

    pub const fn new(distance: f32, time: f32) -> Self {
        Self {
            distance,
            time,
            speed: 0.0,
        }
    }

    pub fn is_immediate(&self) -> bool {
        self.distance < EASING_EPSILON
    }

    /// Advance `current` towards `target` over `delta_time` seconds
    pub fn step(&mut self, current: f32, target: f32, delta_time: f32) -> f32 {
        if self.is_immediate() {
            return target;
        }
        if self.time < EASING_EPSILON {
            return current + delta_time * (target - current) / self.distance;
        }

        let target_speed = (target - current) / self.distance;
        self.speed += delta_time * (target_speed - self.speed) / self.time;
        current + delta_time * self.speed
    }
}

/// Standing float link
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CopyOp {
    /// Attribute to read, a missing source reads as 0
    pub source: Option<GlobalAddress>,
    pub destination: GlobalAddress,
    pub add_offset: f32,
    /// 0 leaves the source unscaled
    pub mult_offset: f32,
    pub easing: Easing,
}

impl CopyOp {
    /// Plain copy from `source` into `destination`
    pub const fn new(source: Option<GlobalAddress>, destination: GlobalAddress) -> Self {
        Self {
            source,
            destination,
            add_offset: 0.0,
            mult_offset: 1.0,
            easing: Easing::IMMEDIATE,
        }
    }

    #[must_use]
    pub const fn with_offsets(mut self, add_offset: f32, mult_offset: f32) -> Self {
        self.add_offset = add_offset;
        self.mult_offset = mult_offset;
        self
    }

    #[must_use]
    pub const fn with_easing(mut self, easing: Easing) -> Self {
        self.easing = easing;
        self
    }

    /// Value the destination is driven towards
    #[allow(clippy::float_cmp)]
    pub fn target(&self, source_value: f32) -> f32 {
        let mult = if self.mult_offset == 0.0 {
            1.0
        } else {
            self.mult_offset
        };
        source_value * mult + self.add_offset
    }

    /// Drive `destination` one tick towards the transformed source value
    pub fn apply(&mut self, source_value: f32, destination: &mut f32, delta_time: f32) {
        let target = self.target(source_value);
        *destination = self.easing.step(*destination, target, delta_time);
    }
}

/// Standing color fade
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColorOp {
    pub destination: GlobalAddress,
    pub target: Color,
    /// Chases `target` at `f1`, the destination chases it at `f2`
    pub intermediate: Color,
    pub f1: f32,
    /// 0 fades the destination straight to `target`
    pub f2: f32,
}

impl ColorOp {
    pub const fn new(destination: GlobalAddress, target: Color, f1: f32) -> Self {
        Self {
            destination,
            target,
            intermediate: target,
            f1,
            f2: 0.0,
        }
    }

    /// Two stage fade: `intermediate` chases `target` at `f1`, the destination
    /// chases `intermediate` at `f2`
    #[must_use]
    pub const fn through(mut self, intermediate: Color, f2: f32) -> Self {
        self.intermediate = intermediate;
        self.f2 = f2;
        self
    }

    #[allow(clippy::float_cmp)]
    pub fn apply(&mut self, destination: &mut Color, delta_time: f32) {
        if self.f2 == 0.0 {
            destination.merge_transition(self.target, delta_time * self.f1);
        } else {
            self.intermediate
                .merge_transition(self.target, delta_time * self.f1);
            destination.merge_transition(self.intermediate, delta_time * self.f2);
        }
    }
}
