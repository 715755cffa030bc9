//! Frame scheduling and timing utilities.
//!
//! Provides portable frame pacing without async/await or platform-specific timers.
//! The caller is responsible for sleeping/waiting between frames.

use embassy_time::{Duration, Instant};

use crate::OutputDriver;
use crate::shared::SharedServer;
use crate::surface::FrameBuffer;

/// Default target frame rate (50 FPS).
pub const DEFAULT_FPS: u32 = 50;

/// Default frame duration based on target FPS.
pub const DEFAULT_FRAME_DURATION: Duration = Duration::from_millis(1000 / DEFAULT_FPS as u64);

/// Longest time step passed to the server in a single frame, in seconds.
///
/// A stall longer than this is absorbed instead of making links overshoot.
pub const MAX_DELTA: f32 = 0.25;

/// Result of a frame tick operation.
#[derive(Debug, Clone, Copy)]
pub struct FrameResult {
    /// The deadline for the next frame.
    pub next_deadline: Instant,
    /// How long to wait until the next frame (may be zero if behind schedule).
    pub sleep_duration: Duration,
    /// Time step the server was advanced by, in seconds.
    pub delta_time: f32,
}

/// Portable frame scheduler that manages timing without async.
///
/// This scheduler:
/// - Tracks frame timing with drift correction
/// - Ticks the shared server into its frame buffer
/// - Presents the frame through the output driver
///
/// # Usage
///
/// ```ignore
/// static SERVER: SharedServer<8, 16> = SharedServer::new();
///
/// let mut scheduler = FrameScheduler::<_, 32, 16, 8, 16>::new(&SERVER, driver);
///
/// loop {
///     let result = scheduler.tick(Instant::now());
///
///     // Platform-specific sleep
///     sleep_ms(result.sleep_duration.as_millis() as u64);
/// }
/// ```
pub struct FrameScheduler<
    'a,
    O: OutputDriver,
    const W: usize,
    const H: usize,
    const MAX_ELEMENTS: usize,
    const MAX_LINKS: usize,
> {
    output: O,
    server: &'a SharedServer<MAX_ELEMENTS, MAX_LINKS>,
    frame: FrameBuffer<W, H>,
    last_tick: Option<Instant>,
    next_frame: Instant,
    frame_duration: Duration,
}

impl<
    'a,
    O: OutputDriver,
    const W: usize,
    const H: usize,
    const MAX_ELEMENTS: usize,
    const MAX_LINKS: usize,
> FrameScheduler<'a, O, W, H, MAX_ELEMENTS, MAX_LINKS>
{
    /// Create a new frame scheduler.
    ///
    /// Uses `DEFAULT_FRAME_DURATION` (50 FPS) for frame timing.
    pub fn new(server: &'a SharedServer<MAX_ELEMENTS, MAX_LINKS>, driver: O) -> Self {
        Self::with_frame_duration(server, driver, DEFAULT_FRAME_DURATION)
    }

    /// Create a new frame scheduler with custom frame duration.
    pub fn with_frame_duration(
        server: &'a SharedServer<MAX_ELEMENTS, MAX_LINKS>,
        driver: O,
        frame_duration: Duration,
    ) -> Self {
        Self {
            output: driver,
            server,
            frame: FrameBuffer::new(),
            last_tick: None,
            next_frame: Instant::from_millis(0),
            frame_duration,
        }
    }

    /// Process one frame and return timing information.
    ///
    /// This method:
    /// 1. Applies drift correction if we've fallen too far behind
    /// 2. Ticks the server with the time elapsed since the previous frame
    /// 3. Writes the frame buffer to the output driver
    /// 4. Returns the deadline for the next frame
    ///
    /// The first call advances the server by zero seconds.
    pub fn tick(&mut self, now: Instant) -> FrameResult {
        // Skip the backlog after long stalls instead of bursting
        let max_drift = self.frame_duration * 2;
        if now > self.next_frame + max_drift {
            self.next_frame = now;
        }

        let delta_time = self
            .last_tick
            .map_or(0.0, |last| delta_seconds(now.saturating_duration_since(last)));
        self.last_tick = Some(now);

        self.frame.clear();
        self.server.tick(delta_time, &mut self.frame);
        self.output.write(self.frame.pixels());

        self.next_frame += self.frame_duration;
        let sleep_duration = self.next_frame.saturating_duration_since(now);

        FrameResult {
            next_deadline: self.next_frame,
            sleep_duration,
            delta_time,
        }
    }

    /// Last rendered frame.
    pub const fn frame(&self) -> &FrameBuffer<W, H> {
        &self.frame
    }

    pub const fn output(&self) -> &O {
        &self.output
    }

    pub const fn server(&self) -> &'a SharedServer<MAX_ELEMENTS, MAX_LINKS> {
        self.server
    }
}

#[allow(clippy::cast_precision_loss)]
fn delta_seconds(elapsed: Duration) -> f32 {
    (elapsed.as_micros() as f32 / 1_000_000.0).min(MAX_DELTA)
}
