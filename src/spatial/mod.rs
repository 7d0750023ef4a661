//! Spatial indexing for O(log n) hit testing.
//!
//! This module provides an R-tree over the polar bounding boxes of rendered
//! slices, used to map pointer positions back to nodes.

mod rtree;

pub use rtree::{to_polar, ArcBox, SpatialIndex};
