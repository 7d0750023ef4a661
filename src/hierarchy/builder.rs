//! Hierarchy construction from raw JSON records.
//!
//! Walks the input tree breadth-first, assigns ids, depths and parent links,
//! extracts leaf weights and rolls them up so every internal node carries the
//! sum of its descendant leaves.

use std::collections::{HashMap, VecDeque};

use serde_json::Value;

use super::node::{LayoutNode, NodeId};
use super::tree::Hierarchy;
use crate::config::SunburstConfig;
use crate::error::{Diagnostics, Error, Result};

/// Field names used to read the raw tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildOptions {
    pub weight_field: String,
    pub children_field: String,
    pub key_field: String,
}

impl BuildOptions {
    pub fn new(weight_field: impl Into<String>) -> Self {
        Self {
            weight_field: weight_field.into(),
            children_field: "children".to_string(),
            key_field: "key".to_string(),
        }
    }
}

impl From<&SunburstConfig> for BuildOptions {
    fn from(config: &SunburstConfig) -> Self {
        Self {
            weight_field: config.weight_field.clone(),
            children_field: config.children_field.clone(),
            key_field: config.key_field.clone(),
        }
    }
}

/// Build a hierarchy reading leaf weights from `options.weight_field`.
pub fn build_hierarchy(
    data: &Value,
    options: &BuildOptions,
    diagnostics: &mut Diagnostics,
) -> Result<Hierarchy> {
    let field = options.weight_field.as_str();
    build_hierarchy_with(
        data,
        options,
        |record| record.get(field).and_then(Value::as_f64),
        diagnostics,
    )
}

/// Build a hierarchy with a custom leaf weight accessor.
///
/// `weight_fn` is only called for leaves (no children field, or an empty
/// one). A leaf whose accessor yields nothing usable contributes 0 and is
/// reported as [`Error::MissingWeight`].
pub fn build_hierarchy_with<F>(
    data: &Value,
    options: &BuildOptions,
    weight_fn: F,
    diagnostics: &mut Diagnostics,
) -> Result<Hierarchy>
where
    F: Fn(&Value) -> Option<f64>,
{
    if !data.is_object() {
        return Err(Error::EmptyData);
    }

    let mut nodes: Vec<LayoutNode> = Vec::new();
    let mut key_index: HashMap<String, NodeId> = HashMap::new();
    let mut queue: VecDeque<(&Value, Option<NodeId>, u32)> = VecDeque::new();
    queue.push_back((data, None, 0));

    while let Some((record, parent, depth)) = queue.pop_front() {
        let id = NodeId(nodes.len() as u32);

        let children: &[Value] = record
            .get(&options.children_field)
            .and_then(Value::as_array)
            .map(Vec::as_slice)
            .unwrap_or(&[]);

        let key = record
            .get(&options.key_field)
            .and_then(key_string)
            .unwrap_or_else(|| id.0.to_string());

        match key_index.get(&key) {
            Some(_) => diagnostics.report(Error::DuplicateKey { key: key.clone() }),
            None => {
                key_index.insert(key.clone(), id);
            }
        }

        let mut node = LayoutNode::new(id, key, strip_children(record, &options.children_field), depth, parent);

        if children.is_empty() {
            node.weight = match weight_fn(&node.data) {
                Some(w) if w.is_finite() && w >= 0.0 => w,
                _ => {
                    diagnostics.report(Error::MissingWeight {
                        key: node.key.clone(),
                        field: options.weight_field.clone(),
                    });
                    0.0
                }
            };
        }

        if let Some(p) = parent {
            nodes[p.index()].children.push(id);
        }
        nodes.push(node);

        for child in children {
            // Non-object entries carry no fields; they become weightless leaves.
            queue.push_back((child, Some(id), depth + 1));
        }
    }

    // Bottom-up rollup: children always have larger ids than their parent.
    for i in (1..nodes.len()).rev() {
        if let Some(p) = nodes[i].parent {
            let weight = nodes[i].weight;
            nodes[p.index()].weight += weight;
        }
    }

    tracing::debug!(nodes = nodes.len(), "built hierarchy");
    Ok(Hierarchy::from_nodes(nodes, key_index))
}

fn key_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn strip_children(record: &Value, children_field: &str) -> Value {
    match record {
        Value::Object(map) => Value::Object(
            map.iter()
                .filter(|(k, _)| k.as_str() != children_field)
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect(),
        ),
        other => other.clone(),
    }
}
