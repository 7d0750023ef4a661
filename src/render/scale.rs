//! Angle and radius scales.
//!
//! Two independent 1-D mappings from normalized layout space to screen space.
//! Zooming to a node is nothing more than re-parameterizing these: the angle
//! domain becomes the node's `[x0, x1]` and the radius domain `[y0, 1]`.

use std::f64::consts::TAU;

use crate::config::RadiusMode;

/// Maps `v` from `domain` onto `[0, 1]` after `transform`.
///
/// A degenerate domain maps everything to the midpoint.
#[inline]
fn normalize(v: f64, domain: [f64; 2], transform: fn(f64) -> f64) -> f64 {
    let a = transform(domain[0]);
    let b = transform(domain[1]);
    let span = b - a;
    if span == 0.0 {
        0.5
    } else {
        (transform(v) - a) / span
    }
}

#[inline]
fn lerp(range: [f64; 2], t: f64) -> f64 {
    range[0] + (range[1] - range[0]) * t
}

#[inline]
fn identity(v: f64) -> f64 {
    v
}

#[inline]
fn signed_sqrt(v: f64) -> f64 {
    if v < 0.0 { -(-v).sqrt() } else { v.sqrt() }
}

/// Normalized angular position to radians, clamped to the range.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AngleScale {
    domain: [f64; 2],
    range: [f64; 2],
}

impl AngleScale {
    /// Identity domain `[0, 1]` onto the full circle.
    pub fn new() -> Self {
        Self {
            domain: [0.0, 1.0],
            range: [0.0, TAU],
        }
    }

    pub fn domain(&self) -> [f64; 2] {
        self.domain
    }

    pub fn set_domain(&mut self, domain: [f64; 2]) {
        self.domain = domain;
    }

    pub fn range(&self) -> [f64; 2] {
        self.range
    }

    pub fn apply(&self, x: f64) -> f64 {
        let t = normalize(x, self.domain, identity).clamp(0.0, 1.0);
        lerp(self.range, t)
    }

    /// Whether `[x0, x1]` lies inside the current domain.
    pub fn contains(&self, x0: f64, x1: f64) -> bool {
        x0 >= self.domain[0] && x1 <= self.domain[1]
    }
}

impl Default for AngleScale {
    fn default() -> Self {
        Self::new()
    }
}

/// Normalized depth to pixels, linear or square-root.
///
/// Unclamped: depths above the domain start map below the inner radius,
/// which arc generation collapses to zero.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RadiusScale {
    mode: RadiusMode,
    domain: [f64; 2],
    range: [f64; 2],
}

impl RadiusScale {
    pub fn new(mode: RadiusMode, outer_radius: f64) -> Self {
        Self {
            mode,
            domain: [0.0, 1.0],
            range: [0.0, outer_radius],
        }
    }

    pub fn mode(&self) -> RadiusMode {
        self.mode
    }

    pub fn domain(&self) -> [f64; 2] {
        self.domain
    }

    pub fn set_domain(&mut self, domain: [f64; 2]) {
        self.domain = domain;
    }

    pub fn range(&self) -> [f64; 2] {
        self.range
    }

    pub fn set_range(&mut self, range: [f64; 2]) {
        self.range = range;
    }

    pub fn apply(&self, y: f64) -> f64 {
        let transform: fn(f64) -> f64 = match self.mode {
            RadiusMode::Linear => identity,
            RadiusMode::Sqrt => signed_sqrt,
        };
        lerp(self.range, normalize(y, self.domain, transform))
    }
}
