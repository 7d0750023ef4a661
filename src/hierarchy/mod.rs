//! Hierarchy data structures.
//!
//! The raw tree is converted into a flat arena of [`LayoutNode`]s with
//! breadth-first ids, integer parent links and aggregated weights.

pub mod builder;
mod node;
mod tree;

pub use builder::{build_hierarchy, build_hierarchy_with, BuildOptions};
pub use node::{Interval, LayoutNode, NodeId};
pub use tree::Hierarchy;
