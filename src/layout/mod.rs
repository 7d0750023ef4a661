//! Layout algorithms for sunburst charts.
//!
//! Layout produces static, normalized intervals only. Screen placement is the
//! job of the scales in [`crate::render`], which can be re-parameterized during
//! zoom without re-running layout.

pub mod partition;

pub use partition::partition;
