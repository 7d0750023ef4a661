//! Label fit policy.
//!
//! A label is accepted only if its estimated rendered width is shorter than
//! the slice's arc length through the middle of the ring.

use unicode_width::UnicodeWidthStr;

use super::arc::ArcAngles;
use crate::hierarchy::LayoutNode;

/// Caller hook producing label text for a node.
pub type LabelFn = dyn Fn(&LayoutNode) -> Option<String>;

/// Whether `label` fits along `arc` at `glyph_width` pixels per column.
pub fn label_fits(label: &str, arc: &ArcAngles, glyph_width: f64) -> bool {
    if label.is_empty() {
        return false;
    }
    (label.width() as f64) * glyph_width < arc.mid_arc_length()
}

/// Pick the primary label if it fits, else the condensed one, else nothing.
pub fn label_for(
    node: &LayoutNode,
    arc: &ArcAngles,
    glyph_width: f64,
    primary: Option<&LabelFn>,
    condensed: Option<&LabelFn>,
) -> Option<String> {
    [primary, condensed]
        .into_iter()
        .flatten()
        .filter_map(|f| f(node))
        .find(|label| label_fits(label, arc, glyph_width))
}
