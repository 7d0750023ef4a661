//! Layout node type and related structures.
//!
//! Each input record becomes one `LayoutNode` stored in a flat arena. Nodes
//! refer to each other by `NodeId`, so the parent back-reference is a plain
//! index and never controls lifetime.

use std::fmt;

use serde::Serialize;

use crate::render::color::Color;

/// Arena index of a node.
///
/// Ids are assigned breadth-first, so the root is always `NodeId(0)` and a
/// parent's id is always smaller than its children's. Ids are only valid for
/// the hierarchy they came from; use the node key to re-resolve across rebuilds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct NodeId(pub u32);

impl NodeId {
    pub const ROOT: NodeId = NodeId(0);

    #[inline]
    pub fn new(id: u32) -> Self {
        Self(id)
    }

    #[inline]
    pub fn raw(self) -> u32 {
        self.0
    }

    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Node({})", self.0)
    }
}

impl From<u32> for NodeId {
    #[inline]
    fn from(id: u32) -> Self {
        Self(id)
    }
}

impl From<NodeId> for u32 {
    #[inline]
    fn from(id: NodeId) -> Self {
        id.0
    }
}

/// Normalized angular (`x`) and depth (`y`) extent of a node.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct Interval {
    pub x0: f64,
    pub x1: f64,
    pub y0: f64,
    pub y1: f64,
}

impl Interval {
    /// The whole chart; also the root focus.
    pub const FULL: Interval = Interval {
        x0: 0.0,
        x1: 1.0,
        y0: 0.0,
        y1: 1.0,
    };

    pub fn new(x0: f64, x1: f64, y0: f64, y1: f64) -> Self {
        Self { x0, x1, y0, y1 }
    }

    #[inline]
    pub fn width(&self) -> f64 {
        self.x1 - self.x0
    }

    /// Zero angular width at `x`, keeping this interval's depth band.
    pub fn collapsed_at(&self, x: f64) -> Self {
        Self {
            x0: x,
            x1: x,
            ..*self
        }
    }
}

/// One entry per input tree node.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutNode {
    pub id: NodeId,
    /// Stable key from the key field, or the breadth-first index.
    pub key: String,
    /// The input record without its children field.
    pub data: serde_json::Value,
    /// Leaf weight, or the sum of descendant leaf weights.
    pub weight: f64,
    pub depth: u32,
    pub parent: Option<NodeId>,
    #[serde(skip)]
    pub children: Vec<NodeId>,
    #[serde(flatten)]
    pub interval: Interval,
    /// Resolved display color, cached until the color parameters change.
    pub color: Option<Color>,
    /// Resolved label for the current scales.
    pub label: Option<String>,
}

impl LayoutNode {
    pub(crate) fn new(id: NodeId, key: String, data: serde_json::Value, depth: u32, parent: Option<NodeId>) -> Self {
        Self {
            id,
            key,
            data,
            weight: 0.0,
            depth,
            parent,
            children: Vec::new(),
            interval: Interval::default(),
            color: None,
            label: None,
        }
    }

    #[inline]
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    #[inline]
    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }

    #[inline]
    pub fn x0(&self) -> f64 {
        self.interval.x0
    }

    #[inline]
    pub fn x1(&self) -> f64 {
        self.interval.x1
    }

    #[inline]
    pub fn y0(&self) -> f64 {
        self.interval.y0
    }

    #[inline]
    pub fn y1(&self) -> f64 {
        self.interval.y1
    }
}
