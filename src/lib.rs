#![no_std]

pub mod r#box;
pub mod color;
pub mod command;
pub mod element;
pub mod eyes;
pub mod frame_scheduler;
pub mod id;
pub mod link;
pub mod server;
pub mod shared;
pub mod surface;
pub mod templates;
pub mod text;

pub use r#box::{BoxConfig, BoxElement};
pub use color::{Color, Rgb};
pub use command::{Command, ColorCommand, FloatCommand, Topic};
pub use element::{Element, ElementSlot, Frame};
pub use eyes::{Emotion, Eyes, EyesConfig};
pub use frame_scheduler::{FrameResult, FrameScheduler};
pub use id::{AttributeId, ElementId, GlobalAddress};
pub use link::{ColorOp, CopyOp, Easing};
pub use server::{AnimationServer, Lifetime};
pub use shared::SharedServer;
pub use surface::{FrameBuffer, MatrixSurface};
pub use text::{ScrollingText, TextConfig};
pub use embassy_time::{Duration, Instant};

/// Abstract LED matrix driver trait
///
/// Implement this trait to support different hardware platforms.
/// The frame scheduler is generic over this trait.
pub trait OutputDriver {
    /// Write the frame, row by row, to the matrix
    fn write(&mut self, pixels: &[Rgb]);
}
