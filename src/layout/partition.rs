//! Radial partition layout.
//!
//! Assigns every node a normalized angular interval `[x0, x1]` proportional to
//! its weight among its siblings, and a normalized depth band
//! `[depth / levels, (depth + 1) / levels]`. Output is always linear in depth;
//! any non-linear radial compression belongs to the radius scale.
//!
//! # Algorithm
//!
//! 1. The root spans the full circle `[0, 1]`.
//! 2. **Top-down dice:** walking nodes breadth-first, each parent's interval is
//!    sliced among its children in input order, width proportional to weight.
//!    A zero-weight parent gives every child a zero-width interval at its `x0`.
//! 3. The last child with positive weight is snapped to the parent's `x1`, so
//!    sibling intervals tile the parent exactly. Zero-weight children always
//!    get `x0 == x1`.

use crate::hierarchy::{Hierarchy, Interval, NodeId};

/// Annotate every node of `tree` with its normalized interval.
///
/// Deterministic: re-running on an unchanged tree yields bit-identical
/// intervals.
pub fn partition(tree: &mut Hierarchy) {
    if tree.is_empty() {
        return;
    }

    let dy = 1.0 / (f64::from(tree.height()) + 1.0);
    let band = |depth: u32| (f64::from(depth) * dy, f64::from(depth + 1) * dy);

    if let Some(root) = tree.get_mut(NodeId::ROOT) {
        let (y0, y1) = band(0);
        root.interval = Interval::new(0.0, 1.0, y0, y1);
    }

    for i in 0..tree.len() {
        let id = NodeId(i as u32);
        let Some(parent) = tree.get(id) else {
            continue;
        };
        if parent.children.is_empty() {
            continue;
        }

        let Interval { x0, x1, .. } = parent.interval;
        let k = if parent.weight > 0.0 {
            (x1 - x0) / parent.weight
        } else {
            0.0
        };
        let children = parent.children.clone();
        let last_weighted = children
            .iter()
            .rposition(|&c| tree.get(c).is_some_and(|child| child.weight > 0.0));

        let mut x = x0;
        for (n, child_id) in children.into_iter().enumerate() {
            let Some(child) = tree.get_mut(child_id) else {
                continue;
            };
            let start = x;
            let end = if child.weight <= 0.0 || k <= 0.0 {
                start
            } else if Some(n) == last_weighted {
                x1
            } else {
                start + child.weight * k
            };
            x = end;
            let (y0, y1) = band(child.depth);
            child.interval = Interval::new(start, end, y0, y1);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Diagnostics;
    use crate::hierarchy::{build_hierarchy, BuildOptions};
    use proptest::prelude::*;
    use serde_json::{json, Value};

    fn laid_out(data: &Value) -> Hierarchy {
        let mut diagnostics = Diagnostics::new();
        let mut tree = build_hierarchy(data, &BuildOptions::new("size"), &mut diagnostics).unwrap();
        partition(&mut tree);
        tree
    }

    #[test]
    fn test_two_leaves_proportional() {
        let tree = laid_out(&json!({
            "key": "root",
            "children": [ { "key": "A", "size": 1 }, { "key": "B", "size": 3 } ]
        }));

        let a = tree.find_by_key("A").unwrap();
        let b = tree.find_by_key("B").unwrap();
        assert_eq!(a.x0(), 0.0);
        assert_eq!(a.x1(), 0.25);
        assert_eq!(b.x0(), 0.25);
        assert_eq!(b.x1(), 1.0);
    }

    #[test]
    fn test_depth_bands() {
        let tree = laid_out(&json!({
            "children": [ { "children": [ { "size": 1 } ] }, { "size": 1 } ]
        }));

        // Three levels: bands of 1/3.
        let root = tree.root();
        assert_eq!(root.interval, Interval::new(0.0, 1.0, 0.0, 1.0 / 3.0));
        for node in tree.iter() {
            let expected = f64::from(node.depth) / 3.0;
            assert!((node.y0() - expected).abs() < 1e-12, "node {} y0 {}", node.key, node.y0());
        }
    }

    #[test]
    fn test_zero_weight_leaf_has_zero_width() {
        let tree = laid_out(&json!({
            "children": [ { "key": "a", "size": 2 }, { "key": "missing" }, { "key": "c", "size": 2 } ]
        }));
        let missing = tree.find_by_key("missing").unwrap();
        assert_eq!(missing.x0(), 0.5);
        assert_eq!(missing.x1(), missing.x0());
    }

    #[test]
    fn test_trailing_zero_weight_leaf_stays_collapsed() {
        for a in 1..60 {
            for b in 1..60 {
                let tree = laid_out(&json!({
                    "children": [
                        { "key": "a", "size": f64::from(a) / 10.0 },
                        { "key": "b", "size": f64::from(b) / 10.0 },
                        { "key": "missing" }
                    ]
                }));
                let weighted = tree.find_by_key("b").unwrap();
                let missing = tree.find_by_key("missing").unwrap();
                assert_eq!(weighted.x1(), 1.0, "a={a} b={b}: last weighted child ends at the parent's x1");
                assert_eq!(missing.x0(), missing.x1(), "a={a} b={b}: {:?}", missing.interval);
            }
        }
    }

    #[test]
    fn test_all_zero_weights() {
        let tree = laid_out(&json!({ "children": [ { "size": 0 }, { "size": 0 } ] }));
        for child in tree.children(NodeId::ROOT) {
            assert_eq!(child.interval.width(), 0.0);
            assert_eq!(child.x0(), 0.0);
        }
    }

    #[test]
    fn test_single_node() {
        let tree = laid_out(&json!({ "size": 1 }));
        assert_eq!(tree.root().interval, Interval::FULL);
    }

    #[test]
    fn test_input_order_preserved() {
        let tree = laid_out(&json!({
            "children": [ { "key": "big", "size": 10 }, { "key": "small", "size": 1 } ]
        }));
        assert_eq!(tree.find_by_key("big").unwrap().x0(), 0.0);
        assert!(tree.find_by_key("small").unwrap().x0() > 0.9);
    }

    /// Build a nested tree from `(parent_selector, weight)` pairs: node `i`
    /// hangs under node `selector % i`.
    fn tree_json(shape: &[(usize, f64)]) -> Value {
        let n = shape.len() + 1;
        let mut children: Vec<Vec<usize>> = vec![Vec::new(); n];
        for (i, &(selector, _)) in shape.iter().enumerate() {
            let node = i + 1;
            children[selector % node].push(node);
        }

        fn emit(node: usize, children: &[Vec<usize>], shape: &[(usize, f64)]) -> Value {
            let weight = if node == 0 { 1.0 } else { shape[node - 1].1 };
            if children[node].is_empty() {
                json!({ "key": node.to_string(), "size": weight })
            } else {
                let kids: Vec<Value> = children[node].iter().map(|&c| emit(c, children, shape)).collect();
                json!({ "key": node.to_string(), "children": kids })
            }
        }
        emit(0, &children, shape)
    }

    proptest! {
        #[test]
        fn children_tile_parent(shape in prop::collection::vec((0usize..64, 0.0f64..100.0), 1..40)) {
            let tree = laid_out(&tree_json(&shape));
            prop_assert_eq!(tree.root().x0(), 0.0);
            prop_assert_eq!(tree.root().x1(), 1.0);

            for node in tree.iter().filter(|n| !n.is_leaf()) {
                let kids: Vec<_> = tree.children(node.id).collect();
                let sum: f64 = kids.iter().map(|c| c.interval.width()).sum();
                if node.weight > 0.0 {
                    prop_assert!((sum - node.interval.width()).abs() < 1e-9);
                }
                let mut cursor = node.x0();
                for kid in kids {
                    prop_assert!((kid.x0() - cursor).abs() < 1e-12);
                    prop_assert!(kid.x1() >= kid.x0());
                    cursor = kid.x1();
                }
            }
        }

        #[test]
        fn rings_are_contiguous(shape in prop::collection::vec((0usize..64, 0.1f64..10.0), 1..40)) {
            let tree = laid_out(&tree_json(&shape));
            for node in tree.iter() {
                if let Some(parent) = tree.parent(node.id) {
                    prop_assert_eq!(node.depth, parent.depth + 1);
                    prop_assert_eq!(node.y0(), parent.y1());
                }
            }
        }

        #[test]
        fn layout_is_idempotent(shape in prop::collection::vec((0usize..64, 0.0f64..10.0), 1..40)) {
            let mut tree = laid_out(&tree_json(&shape));
            let first: Vec<Interval> = tree.iter().map(|n| n.interval).collect();
            partition(&mut tree);
            let second: Vec<Interval> = tree.iter().map(|n| n.interval).collect();
            for (a, b) in first.iter().zip(&second) {
                prop_assert_eq!(a.x0.to_bits(), b.x0.to_bits());
                prop_assert_eq!(a.x1.to_bits(), b.x1.to_bits());
                prop_assert_eq!(a.y0.to_bits(), b.y0.to_bits());
                prop_assert_eq!(a.y1.to_bits(), b.y1.to_bits());
            }
        }
    }
}
