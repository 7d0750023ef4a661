//! Frame scheduling seam.
//!
//! The engine never sleeps or reads a clock. When it needs another animation
//! frame it asks the host through [`FrameScheduler`]; the host later calls
//! `tick(now_ms)` with its own timestamp (e.g. from `requestAnimationFrame`).

use std::cell::Cell;
use std::rc::Rc;

/// Host-provided frame requester.
pub trait FrameScheduler {
    /// Ask for one more call to `tick`.
    fn request_frame(&mut self);
}

/// Scheduler that ignores requests; the host ticks on its own cadence.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopScheduler;

impl FrameScheduler for NoopScheduler {
    fn request_frame(&mut self) {}
}

/// Scheduler that counts requests, for driving the engine with a virtual clock.
#[derive(Debug, Default, Clone)]
pub struct ManualScheduler {
    requests: Rc<Cell<u32>>,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Handle that observes the request count after the scheduler is moved
    /// into an engine.
    pub fn counter(&self) -> Rc<Cell<u32>> {
        Rc::clone(&self.requests)
    }

    pub fn requests(&self) -> u32 {
        self.requests.get()
    }
}

impl FrameScheduler for ManualScheduler {
    fn request_frame(&mut self) {
        self.requests.set(self.requests.get() + 1);
    }
}
