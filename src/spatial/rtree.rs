//! R-tree based hit testing using the rstar crate.
//!
//! Rendered slices are indexed by their bounding box in polar space
//! `(angle, radius)`, where an annular sector is exactly a rectangle. A
//! pointer position is converted to polar coordinates and located in O(log n).

use std::f64::consts::TAU;

use rstar::{RTree, RTreeObject, AABB};

use crate::hierarchy::NodeId;
use crate::render::ArcAngles;

/// A rendered slice in polar space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ArcBox {
    /// The node identifier.
    pub id: NodeId,
    /// Depth, used to prefer the outer ring on shared boundaries.
    pub depth: u32,
    pub arc: ArcAngles,
}

impl ArcBox {
    pub fn new(id: NodeId, depth: u32, arc: ArcAngles) -> Self {
        Self { id, depth, arc }
    }

    fn contains(&self, angle: f64, radius: f64) -> bool {
        angle >= self.arc.start_angle
            && angle <= self.arc.end_angle
            && radius >= self.arc.inner_radius
            && radius <= self.arc.outer_radius
    }
}

impl RTreeObject for ArcBox {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        AABB::from_corners(
            [self.arc.start_angle, self.arc.inner_radius],
            [self.arc.end_angle, self.arc.outer_radius],
        )
    }
}

/// Convert a point relative to the chart center (y down) into
/// `(angle, radius)` with angle 0 at twelve o'clock, clockwise, in `[0, 2pi)`.
pub fn to_polar(x: f64, y: f64) -> (f64, f64) {
    let mut angle = x.atan2(-y);
    if angle < 0.0 {
        angle += TAU;
    }
    (angle, x.hypot(y))
}

/// Spatial index over the slices of the last rendered frame.
pub struct SpatialIndex {
    tree: RTree<ArcBox>,
}

impl SpatialIndex {
    /// Create a new empty spatial index.
    pub fn new() -> Self {
        Self { tree: RTree::new() }
    }

    /// Replace the index contents in one bulk load.
    pub fn rebuild(&mut self, arcs: Vec<ArcBox>) {
        self.tree = RTree::bulk_load(arcs);
    }

    /// Deepest slice under the point `(x, y)`.
    pub fn hit(&self, x: f64, y: f64) -> Option<NodeId> {
        let (angle, radius) = to_polar(x, y);
        self.tree
            .locate_in_envelope_intersecting(&AABB::from_point([angle, radius]))
            .filter(|arc| arc.contains(angle, radius))
            .max_by_key(|arc| (arc.depth, std::cmp::Reverse(arc.id)))
            .map(|arc| arc.id)
    }

    pub fn len(&self) -> usize {
        self.tree.size()
    }

    pub fn is_empty(&self) -> bool {
        self.tree.size() == 0
    }
}

impl Default for SpatialIndex {
    fn default() -> Self {
        Self::new()
    }
}
