//! Interpolation primitives.
//!
//! The tween engine owns no clock. It only knows how to turn a progress value
//! `t` in `[0, 1]` into an intermediate state; the focus state machine feeds
//! it `t` from host-supplied frame timestamps.

use crate::config::Easing;
use crate::hierarchy::Interval;

/// Component-wise linear interpolation.
pub trait Lerp: Copy {
    fn lerp(self, to: Self, t: f64) -> Self;
}

impl Lerp for f64 {
    #[inline]
    fn lerp(self, to: Self, t: f64) -> Self {
        self + (to - self) * t
    }
}

impl Lerp for [f64; 2] {
    #[inline]
    fn lerp(self, to: Self, t: f64) -> Self {
        [self[0].lerp(to[0], t), self[1].lerp(to[1], t)]
    }
}

impl Lerp for Interval {
    fn lerp(self, to: Self, t: f64) -> Self {
        Interval {
            x0: self.x0.lerp(to.x0, t),
            x1: self.x1.lerp(to.x1, t),
            y0: self.y0.lerp(to.y0, t),
            y1: self.y1.lerp(to.y1, t),
        }
    }
}

/// A start/end pair sampled by progress.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tween<T> {
    start: T,
    end: T,
}

impl<T: Lerp> Tween<T> {
    pub fn new(start: T, end: T) -> Self {
        Self { start, end }
    }

    pub fn end(&self) -> T {
        self.end
    }

    /// Value at progress `t`. Returns the endpoints exactly at `t <= 0` and
    /// `t >= 1`, so a finished tween carries no interpolation error.
    pub fn at(&self, t: f64) -> T {
        if t <= 0.0 {
            self.start
        } else if t >= 1.0 {
            self.end
        } else {
            self.start.lerp(self.end, t)
        }
    }
}

impl Easing {
    /// Map linear time progress onto eased progress. Both ends are fixed.
    pub fn apply(self, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Easing::Linear => t,
            Easing::CubicInOut => {
                let t2 = t * 2.0;
                if t2 <= 1.0 {
                    t2 * t2 * t2 / 2.0
                } else {
                    let u = t2 - 2.0;
                    (u * u * u + 2.0) / 2.0
                }
            }
        }
    }
}

/// Linear time progress of a transition that started at `start_ms`.
pub fn time_progress(start_ms: f64, now_ms: f64, duration_ms: f64) -> f64 {
    if duration_ms <= 0.0 {
        return 1.0;
    }
    ((now_ms - start_ms) / duration_ms).clamp(0.0, 1.0)
}
