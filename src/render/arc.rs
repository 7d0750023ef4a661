//! Arc geometry generation.
//!
//! Turns a node interval plus the current scales into drawing commands for
//! the host's 2-D surface. Angles follow the chart convention: 0 at twelve
//! o'clock, increasing clockwise, so a point is `(r sin a, -r cos a)` in a
//! y-down coordinate system centered on the chart.

use std::f64::consts::{FRAC_PI_2, PI, TAU};
use std::fmt;

use serde::Serialize;

use super::scale::{AngleScale, RadiusScale};
use crate::hierarchy::Interval;

const EPSILON: f64 = 1e-12;

/// A single drawing primitive, in SVG path semantics.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "cmd", rename_all = "camelCase")]
pub enum PathCommand {
    MoveTo { x: f64, y: f64 },
    LineTo { x: f64, y: f64 },
    /// Circular arc from the current point to `(x, y)`.
    #[serde(rename_all = "camelCase")]
    Arc {
        radius: f64,
        large_arc: bool,
        sweep: bool,
        x: f64,
        y: f64,
    },
    Close,
}

/// Ordered drawing commands for one shape.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(transparent)]
pub struct PathDescriptor {
    commands: Vec<PathCommand>,
}

impl PathDescriptor {
    pub fn commands(&self) -> &[PathCommand] {
        &self.commands
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}

/// SVG path data, numbers rounded to three fractional digits.
impl fmt::Display for PathDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for command in &self.commands {
            match *command {
                PathCommand::MoveTo { x, y } => write!(f, "M{},{}", fmt_path(x), fmt_path(y))?,
                PathCommand::LineTo { x, y } => write!(f, "L{},{}", fmt_path(x), fmt_path(y))?,
                PathCommand::Arc {
                    radius,
                    large_arc,
                    sweep,
                    x,
                    y,
                } => {
                    let r = fmt_path(radius);
                    write!(
                        f,
                        "A{r},{r},0,{},{},{},{}",
                        u8::from(large_arc),
                        u8::from(sweep),
                        fmt_path(x),
                        fmt_path(y)
                    )?
                }
                PathCommand::Close => f.write_str("Z")?,
            }
        }
        Ok(())
    }
}

fn fmt_path(v: f64) -> String {
    if !v.is_finite() || v.abs() < 0.0005 {
        return "0".to_string();
    }
    let r = (v * 1000.0 + 0.5).floor() / 1000.0;
    if r.abs() < 0.0005 {
        return "0".to_string();
    }
    let mut s = format!("{r:.3}");
    while s.ends_with('0') {
        s.pop();
    }
    if s.ends_with('.') {
        s.pop();
    }
    s
}

/// Incremental path writer with d3-path arc semantics (math angles, y down).
#[derive(Default)]
struct PathBuilder {
    commands: Vec<PathCommand>,
    start: Option<(f64, f64)>,
    current: Option<(f64, f64)>,
}

impl PathBuilder {
    fn move_to(&mut self, x: f64, y: f64) {
        self.commands.push(PathCommand::MoveTo { x, y });
        self.start = Some((x, y));
        self.current = Some((x, y));
    }

    fn line_to(&mut self, x: f64, y: f64) {
        self.commands.push(PathCommand::LineTo { x, y });
        self.current = Some((x, y));
    }

    fn close(&mut self) {
        if self.start.is_some() {
            self.commands.push(PathCommand::Close);
            self.current = self.start;
        }
    }

    /// Arc around the origin from math angle `a0` to `a1`.
    fn arc(&mut self, r: f64, a0: f64, a1: f64, ccw: bool) {
        let (x0, y0) = (r * a0.cos(), r * a0.sin());
        let sweep = !ccw;
        let mut da = if ccw { a0 - a1 } else { a1 - a0 };

        match self.current {
            None => self.move_to(x0, y0),
            Some((cx, cy)) if (cx - x0).abs() > EPSILON || (cy - y0).abs() > EPSILON => {
                self.line_to(x0, y0)
            }
            Some(_) => {}
        }

        if r <= 0.0 {
            return;
        }
        if da < 0.0 {
            da = da % TAU + TAU;
        }

        if da > TAU - EPSILON {
            // A full circle needs two half arcs.
            self.commands.push(PathCommand::Arc {
                radius: r,
                large_arc: true,
                sweep,
                x: -x0,
                y: -y0,
            });
            self.commands.push(PathCommand::Arc {
                radius: r,
                large_arc: true,
                sweep,
                x: x0,
                y: y0,
            });
            self.current = Some((x0, y0));
        } else if da > EPSILON {
            let (x1, y1) = (r * a1.cos(), r * a1.sin());
            self.commands.push(PathCommand::Arc {
                radius: r,
                large_arc: da >= PI,
                sweep,
                x: x1,
                y: y1,
            });
            self.current = Some((x1, y1));
        }
    }

    fn finish(self) -> PathDescriptor {
        PathDescriptor {
            commands: self.commands,
        }
    }
}

/// Screen-space extent of a node under the current scales.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ArcAngles {
    pub start_angle: f64,
    pub end_angle: f64,
    pub inner_radius: f64,
    pub outer_radius: f64,
}

impl ArcAngles {
    pub fn new(start_angle: f64, end_angle: f64, inner_radius: f64, outer_radius: f64) -> Self {
        Self {
            start_angle,
            end_angle,
            inner_radius,
            outer_radius,
        }
    }

    /// Project a normalized interval; angles clamp to `[0, 2pi]`, radii to `>= 0`.
    pub fn project(interval: &Interval, x: &AngleScale, y: &RadiusScale) -> Self {
        Self {
            start_angle: x.apply(interval.x0).clamp(0.0, TAU),
            end_angle: x.apply(interval.x1).clamp(0.0, TAU),
            inner_radius: y.apply(interval.y0).max(0.0),
            outer_radius: y.apply(interval.y1).max(0.0),
        }
    }

    #[inline]
    pub fn span(&self) -> f64 {
        self.end_angle - self.start_angle
    }

    #[inline]
    pub fn mid_radius(&self) -> f64 {
        (self.inner_radius + self.outer_radius) / 2.0
    }

    /// Rendered length of the arc through the middle of the ring.
    #[inline]
    pub fn mid_arc_length(&self) -> f64 {
        self.span() * self.mid_radius()
    }

    /// Whether the slice is worth drawing at all.
    pub fn is_visible(&self, radian_cutoff: f64) -> bool {
        self.span() > radian_cutoff && self.outer_radius > 0.0
    }
}

/// Annular sector path for a slice.
pub fn arc_path(arc: &ArcAngles) -> PathDescriptor {
    let mut path = PathBuilder::default();
    let (mut r0, mut r1) = (arc.inner_radius, arc.outer_radius);
    if r1 < r0 {
        std::mem::swap(&mut r0, &mut r1);
    }

    let a0 = arc.start_angle - FRAC_PI_2;
    let a1 = arc.end_angle - FRAC_PI_2;
    let da = (a1 - a0).abs();
    let clockwise = a1 > a0;

    if r1 <= EPSILON {
        path.move_to(0.0, 0.0);
    } else if da > TAU - EPSILON {
        path.move_to(r1 * a0.cos(), r1 * a0.sin());
        path.arc(r1, a0, a1, !clockwise);
        if r0 > EPSILON {
            path.move_to(r0 * a1.cos(), r0 * a1.sin());
            path.arc(r0, a1, a0, clockwise);
        }
    } else {
        path.move_to(r1 * a0.cos(), r1 * a0.sin());
        path.arc(r1, a0, a1, !clockwise);
        if r0 > EPSILON {
            path.arc(r0, a1, a0, clockwise);
        } else {
            path.line_to(0.0, 0.0);
        }
    }

    path.close();
    path.finish()
}

/// Invisible guide path through the middle of a slice for curved labels.
///
/// When the slice's middle falls in the lower half of the circle the path
/// runs counter-clockwise, so text laid along it reads upright.
pub fn middle_arc_line(arc: &ArcAngles) -> PathDescriptor {
    let mut a0 = arc.start_angle - FRAC_PI_2;
    let mut a1 = arc.end_angle - FRAC_PI_2;
    let r = arc.mid_radius().max(0.0);

    let middle = (a0 + a1) / 2.0;
    let invert = middle > 0.0 && middle < PI;
    if invert {
        std::mem::swap(&mut a0, &mut a1);
    }

    let mut path = PathBuilder::default();
    path.arc(r, a0, a1, invert);
    path.finish()
}
