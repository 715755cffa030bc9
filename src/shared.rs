//! Animation server shared between the frame loop and command handlers.
//!
//! Wraps [`AnimationServer`] in a `critical-section` mutex so it can live in a
//! `static` and be reached from the render loop, network callbacks and
//! interrupts alike. Every access, structural or not, takes the same lock.

use core::cell::RefCell;

use critical_section::Mutex;

use crate::element::ElementSlot;
use crate::id::ElementId;
use crate::server::AnimationServer;
use crate::surface::MatrixSurface;

/// Interrupt safe handle to an [`AnimationServer`]
pub struct SharedServer<const MAX_ELEMENTS: usize, const MAX_LINKS: usize> {
    inner: Mutex<RefCell<AnimationServer<MAX_ELEMENTS, MAX_LINKS>>>,
}

impl<const MAX_ELEMENTS: usize, const MAX_LINKS: usize> SharedServer<MAX_ELEMENTS, MAX_LINKS> {
    /// Create an empty server, usable in a `static`.
    pub const fn new() -> Self {
        Self {
            inner: Mutex::new(RefCell::new(AnimationServer::new())),
        }
    }

    /// Run `f` with exclusive access to the server.
    ///
    /// `f` runs inside a critical section, keep it short.
    pub fn with<R>(&self, f: impl FnOnce(&mut AnimationServer<MAX_ELEMENTS, MAX_LINKS>) -> R) -> R {
        critical_section::with(|cs| {
            let mut server = self.inner.borrow(cs).borrow_mut();
            f(&mut server)
        })
    }

    /// Register an element, see [`AnimationServer::insert_at_depth`].
    pub fn insert(
        &self,
        id: ElementId,
        z: i8,
        element: impl Into<ElementSlot>,
    ) -> Result<(), ElementSlot> {
        self.with(|server| server.insert_at_depth(id, z, element))
    }

    /// Decode and apply a textual command.
    ///
    /// Returns `false` for an unknown topic.
    pub fn parse_command(&self, topic: &str, payload: &str) -> bool {
        self.with(|server| server.parse_command(topic, payload))
    }

    /// Process one frame into `surface`.
    pub fn tick<S: MatrixSurface>(&self, delta_time: f32, surface: &mut S) {
        self.with(|server| server.tick(delta_time, surface));
    }

    /// Current synchronized clock in seconds.
    pub fn clock(&self) -> f32 {
        self.with(|server| server.clock())
    }
}

impl<const MAX_ELEMENTS: usize, const MAX_LINKS: usize> Default
    for SharedServer<MAX_ELEMENTS, MAX_LINKS>
{
    fn default() -> Self {
        Self::new()
    }
}
