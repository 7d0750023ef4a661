//! Hierarchy - flat arena of layout nodes.
//!
//! Nodes are stored breadth-first: index order is a valid top-down traversal
//! and reverse index order a valid bottom-up one, which is what weight rollup,
//! partitioning and color propagation rely on.

use std::collections::HashMap;

use super::node::{LayoutNode, NodeId};

/// An immutable-shape tree of layout nodes.
///
/// The shape never changes after construction; a data change builds a new
/// `Hierarchy`. Only per-node annotations (interval, color, label) are written
/// in place.
#[derive(Debug, Clone)]
pub struct Hierarchy {
    nodes: Vec<LayoutNode>,
    /// Map from node key to arena index (first node wins on duplicates)
    key_index: HashMap<String, NodeId>,
    /// Largest depth in the tree (0 for a lone root)
    height: u32,
}

impl Hierarchy {
    pub(crate) fn from_nodes(nodes: Vec<LayoutNode>, key_index: HashMap<String, NodeId>) -> Self {
        let height = nodes.iter().map(|n| n.depth).max().unwrap_or(0);
        Self {
            nodes,
            key_index,
            height,
        }
    }

    pub fn root(&self) -> &LayoutNode {
        &self.nodes[0]
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Largest node depth.
    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn get(&self, id: NodeId) -> Option<&LayoutNode> {
        self.nodes.get(id.index())
    }

    pub(crate) fn get_mut(&mut self, id: NodeId) -> Option<&mut LayoutNode> {
        self.nodes.get_mut(id.index())
    }

    /// Resolve a key through the secondary index built with the tree.
    pub fn find_by_key(&self, key: &str) -> Option<&LayoutNode> {
        self.key_index.get(key).and_then(|&id| self.get(id))
    }

    /// All nodes in breadth-first order.
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &LayoutNode> + ExactSizeIterator {
        self.nodes.iter()
    }

    pub(crate) fn iter_mut(&mut self) -> impl Iterator<Item = &mut LayoutNode> {
        self.nodes.iter_mut()
    }

    pub fn children(&self, id: NodeId) -> impl Iterator<Item = &LayoutNode> {
        self.get(id)
            .into_iter()
            .flat_map(|node| node.children.iter())
            .filter_map(|&child| self.get(child))
    }

    pub fn parent(&self, id: NodeId) -> Option<&LayoutNode> {
        self.get(id)?.parent.and_then(|p| self.get(p))
    }
}
