//! Screen-space rendering helpers.
//!
//! Everything here is a pure function of layout output plus the current
//! scales; the engine calls these per frame (geometry) or per rebuild
//! (colors, labels).

pub mod arc;
pub mod color;
pub mod label;
pub mod scale;

pub use arc::{arc_path, middle_arc_line, ArcAngles, PathCommand, PathDescriptor};
pub use color::{colorize, colorize_all, Color, ColorOverride, ColorParams};
pub use label::{label_fits, label_for, LabelFn};
pub use scale::{AngleScale, RadiusScale};
