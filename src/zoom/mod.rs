//! Zoom navigation: focus state machine, tweens and frame scheduling.

pub mod focus;
pub mod scheduler;
pub mod tween;

pub use focus::{FocusState, ScaleParams, TickOutcome, Transition, Zoom, ZoomState};
pub use scheduler::{FrameScheduler, ManualScheduler, NoopScheduler};
pub use tween::{Lerp, Tween};
