//! SunburstEngine - the chart's single owner of layout and navigation state.
//!
//! The engine turns a raw JSON tree into a laid-out [`Hierarchy`], keeps the
//! zoom state machine and its scales, resolves colors and labels, and emits
//! per-frame arc geometry for a host rendering surface. Everything outside
//! of that (DOM creation, tooltips, event wiring) belongs to the host.

use std::sync::atomic::{AtomicU32, Ordering};

use serde::Serialize;
use serde_json::Value;

use crate::config::SunburstConfig;
use crate::error::{Diagnostics, Error, Result};
use crate::hierarchy::{build_hierarchy, BuildOptions, Hierarchy, Interval, LayoutNode, NodeId};
use crate::layout::partition;
use crate::render::{
    arc_path, colorize_all, label_for, middle_arc_line, ArcAngles, Color, ColorOverride, ColorParams, LabelFn,
    PathDescriptor,
};
use crate::spatial::{ArcBox, SpatialIndex};
use crate::zoom::{FocusState, FrameScheduler, NoopScheduler, TickOutcome, Tween, Zoom, ZoomState};

/// Monotonic counter for generated surface ids.
static NEXT_SURFACE_ID: AtomicU32 = AtomicU32::new(0);

/// Handler receiving a resolved node.
pub type NodeCallback = dyn Fn(&LayoutNode);

/// Behavioral hooks supplied by the host.
#[derive(Default)]
pub struct Callbacks {
    pub color_override: Option<Box<ColorOverride>>,
    pub primary_label: Option<Box<LabelFn>>,
    pub condensed_label: Option<Box<LabelFn>>,
    pub on_click: Option<Box<NodeCallback>>,
    pub on_hover_enter: Option<Box<NodeCallback>>,
    pub on_hover_exit: Option<Box<NodeCallback>>,
}

/// Inputs compared by [`SunburstEngine::rebuild_with`].
#[derive(Debug, Clone, Copy)]
pub struct Inputs<'a> {
    pub data: &'a Value,
    pub config: &'a SunburstConfig,
}

/// Default rebuild comparison: deep equality of data and config.
pub fn same_inputs(previous: &Inputs<'_>, next: &Inputs<'_>) -> bool {
    previous.data == next.data && previous.config == next.config
}

/// Drawing instructions for one visible slice.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ArcFrame {
    pub id: NodeId,
    pub key: String,
    /// Element id for the slice path, `mainArc-<key>`.
    pub dom_id: String,
    pub depth: u32,
    pub color: Color,
    #[serde(flatten)]
    pub arc: ArcAngles,
    pub path: PathDescriptor,
    /// SVG path data of `path`.
    pub d: String,
    /// Guide path for a curved label, present when labels are configured.
    pub label_path: Option<PathDescriptor>,
    /// Label text; hidden while a transition is running.
    pub label: Option<String>,
}

/// Everything the host needs to draw the current state.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Frame {
    pub surface_id: String,
    /// `[min_x, min_y, width, height]`, centered on the chart.
    pub view_box: [f64; 4],
    pub state: ZoomState,
    pub arcs: Vec<ArcFrame>,
}

/// Layout plus navigation state for one dataset.
struct Surface {
    tree: Hierarchy,
    zoom: Zoom,
}

/// The sunburst engine.
///
/// This struct manages:
/// - The laid-out hierarchy (replaced wholesale on every rebuild)
/// - Zoom state and the angle/radius scales
/// - Cached colors and labels
/// - Hit testing via a polar spatial index
/// - The diagnostic channel for non-fatal conditions
pub struct SunburstEngine {
    config: SunburstConfig,
    /// Data of the last build, for rebuild comparison
    data: Option<Value>,
    surface: Option<Surface>,
    callbacks: Callbacks,
    scheduler: Box<dyn FrameScheduler>,
    diagnostics: Diagnostics,
    /// Spatial index for hit testing
    spatial: SpatialIndex,
    /// Whether the spatial index needs rebuilding
    spatial_dirty: bool,
    hovered: Option<NodeId>,
    surface_id: String,
}

impl SunburstEngine {
    /// Create an engine. Fails fast on an invalid config.
    pub fn new(config: SunburstConfig) -> Result<Self> {
        config.validate()?;
        let surface_id = config.dom_id.clone().unwrap_or_else(|| {
            let n = NEXT_SURFACE_ID.fetch_add(1, Ordering::Relaxed);
            format!("sunburst-{n}")
        });
        Ok(Self {
            config,
            data: None,
            surface: None,
            callbacks: Callbacks::default(),
            scheduler: Box::new(NoopScheduler),
            diagnostics: Diagnostics::new(),
            spatial: SpatialIndex::new(),
            spatial_dirty: false,
            hovered: None,
            surface_id,
        })
    }

    /// Use `scheduler` to request animation frames.
    pub fn with_scheduler(mut self, scheduler: Box<dyn FrameScheduler>) -> Self {
        self.scheduler = scheduler;
        self
    }

    pub fn set_scheduler(&mut self, scheduler: Box<dyn FrameScheduler>) {
        self.scheduler = scheduler;
    }

    pub fn config(&self) -> &SunburstConfig {
        &self.config
    }

    pub fn surface_id(&self) -> &str {
        &self.surface_id
    }

    // =========================================================================
    // Callbacks
    // =========================================================================

    /// Replace the color override and recolor.
    pub fn set_color_override(&mut self, f: Option<Box<ColorOverride>>) {
        self.callbacks.color_override = f;
        self.update_color();
    }

    /// Replace the label functions and relabel.
    pub fn set_label_fns(&mut self, primary: Option<Box<LabelFn>>, condensed: Option<Box<LabelFn>>) {
        self.callbacks.primary_label = primary;
        self.callbacks.condensed_label = condensed;
        self.refresh_labels();
    }

    pub fn set_on_click(&mut self, f: Option<Box<NodeCallback>>) {
        self.callbacks.on_click = f;
    }

    pub fn set_on_hover_enter(&mut self, f: Option<Box<NodeCallback>>) {
        self.callbacks.on_hover_enter = f;
    }

    pub fn set_on_hover_exit(&mut self, f: Option<Box<NodeCallback>>) {
        self.callbacks.on_hover_exit = f;
    }

    // =========================================================================
    // Build
    // =========================================================================

    /// Lay out `data` from scratch, focused on the root, with no animation.
    ///
    /// Missing data is reported as [`Error::EmptyData`] and leaves nothing
    /// rendered; it is not an error for the caller.
    pub fn build(&mut self, data: &Value) -> Result<()> {
        self.hover(None);
        self.surface = None;
        self.data = Some(data.clone());
        self.spatial_dirty = true;

        let Some(tree) = self.layout(data) else {
            return Ok(());
        };
        let mut zoom = Zoom::new(&self.config, tree.root());
        zoom.reset(FocusState::of(tree.root()));
        self.surface = Some(Surface { tree, zoom });

        self.update_color();
        self.refresh_labels();
        tracing::debug!(surface = %self.surface_id, "built sunburst");
        Ok(())
    }

    /// Rebuild when `data` or `config` differ from the last build.
    ///
    /// Returns whether a rebuild happened.
    pub fn rebuild(&mut self, data: &Value, config: SunburstConfig) -> Result<bool> {
        self.rebuild_with(data, config, same_inputs)
    }

    /// Rebuild unless `same` reports the inputs unchanged.
    ///
    /// The new config is validated before anything changes. When a layout
    /// already exists, the focus is re-resolved by key (falling back to the
    /// root) and the change is animated from the current state.
    pub fn rebuild_with<F>(&mut self, data: &Value, config: SunburstConfig, same: F) -> Result<bool>
    where
        F: FnOnce(&Inputs<'_>, &Inputs<'_>) -> bool,
    {
        config.validate()?;

        if let Some(previous) = self.data.as_ref() {
            let before = Inputs {
                data: previous,
                config: &self.config,
            };
            let after = Inputs { data, config: &config };
            if same(&before, &after) {
                return Ok(false);
            }
        }

        if config.dom_id.is_some() && config.dom_id != self.config.dom_id {
            self.surface_id = config.dom_id.clone().unwrap_or_default();
        }
        self.config = config;

        self.hover(None);
        let Some(previous) = self.surface.take() else {
            self.build(data)?;
            return Ok(true);
        };

        self.data = Some(data.clone());
        self.spatial_dirty = true;

        let Some(tree) = self.layout(data) else {
            return Ok(true);
        };

        let Surface {
            tree: old_tree,
            mut zoom,
        } = previous;
        zoom.reconfigure(&self.config);

        let focus = tree
            .find_by_key(&zoom.focus().key)
            .map(FocusState::of)
            .unwrap_or_else(|| FocusState::of(tree.root()));

        let tweens = self
            .config
            .animate_data_changes
            .then(|| data_tweens(&old_tree, &zoom, &tree));
        zoom.retarget(focus, tweens);
        self.surface = Some(Surface { tree, zoom });
        self.scheduler.request_frame();

        self.update_color();
        self.refresh_labels();
        tracing::debug!(surface = %self.surface_id, "rebuilt sunburst");
        Ok(true)
    }

    /// Build and partition a hierarchy, reporting everything non-fatal.
    fn layout(&mut self, data: &Value) -> Option<Hierarchy> {
        match build_hierarchy(data, &BuildOptions::from(&self.config), &mut self.diagnostics) {
            Ok(mut tree) => {
                partition(&mut tree);
                Some(tree)
            }
            Err(error) => {
                self.diagnostics.report(error);
                None
            }
        }
    }

    // =========================================================================
    // Navigation
    // =========================================================================

    /// Zoom to the node carrying `key`.
    ///
    /// An unknown key leaves the focus unchanged, is reported as a
    /// diagnostic, and is returned as [`Error::NotFound`].
    pub fn select(&mut self, key: &str) -> Result<()> {
        let found = self
            .surface
            .as_ref()
            .and_then(|s| s.tree.find_by_key(key))
            .map(|node| node.id);

        match found {
            Some(id) => {
                self.select_node(id);
                Ok(())
            }
            None => {
                let error = Error::NotFound { key: key.to_string() };
                self.diagnostics.report(error.clone());
                Err(error)
            }
        }
    }

    /// Zoom to `id`. Returns `false` if the node is unknown or the request
    /// duplicates the running transition.
    pub fn select_node(&mut self, id: NodeId) -> bool {
        let Some(surface) = self.surface.as_mut() else {
            return false;
        };
        let Some(node) = surface.tree.get(id) else {
            return false;
        };
        if !surface.zoom.select(node) {
            return false;
        }
        tracing::debug!(node = %id, key = %node.key, "zoom requested");
        self.scheduler.request_frame();
        true
    }

    /// Notify the click handler, then zoom to the node.
    pub fn click(&mut self, id: NodeId) {
        if let (Some(node), Some(f)) = (self.node(id), self.callbacks.on_click.as_ref()) {
            f(node);
        }
        self.select_node(id);
    }

    /// Move the hover to `id` (or clear it), firing exit then enter handlers.
    pub fn hover(&mut self, id: Option<NodeId>) {
        if self.hovered == id {
            return;
        }
        let exit = self.callbacks.on_hover_exit.as_ref();
        if let (Some(old), Some(f)) = (self.hovered.and_then(|h| self.node(h)), exit) {
            f(old);
        }
        self.hovered = id.filter(|&i| self.node(i).is_some());
        let enter = self.callbacks.on_hover_enter.as_ref();
        if let (Some(new), Some(f)) = (self.hovered.and_then(|h| self.node(h)), enter) {
            f(new);
        }
    }

    pub fn hovered(&self) -> Option<NodeId> {
        self.hovered
    }

    /// Node under a point in view-box coordinates (origin at the center).
    pub fn hit_test(&mut self, x: f64, y: f64) -> Option<NodeId> {
        if self.spatial_dirty {
            self.rebuild_spatial_index();
        }
        self.spatial.hit(x, y)
    }

    /// Click whatever lies under the point.
    pub fn click_at(&mut self, x: f64, y: f64) -> Option<NodeId> {
        let id = self.hit_test(x, y)?;
        self.click(id);
        Some(id)
    }

    /// Hover whatever lies under the point, clearing the hover on a miss.
    pub fn hover_at(&mut self, x: f64, y: f64) -> Option<NodeId> {
        let id = self.hit_test(x, y);
        self.hover(id);
        id
    }

    fn rebuild_spatial_index(&mut self) {
        let arcs = self
            .visible_arcs()
            .into_iter()
            .map(|(node, arc)| ArcBox::new(node.id, node.depth, arc))
            .collect();
        self.spatial.rebuild(arcs);
        self.spatial_dirty = false;
    }

    // =========================================================================
    // Animation
    // =========================================================================

    /// Advance any running transition to `now_ms`.
    ///
    /// Returns `true` while more frames are needed.
    pub fn tick(&mut self, now_ms: f64) -> bool {
        let Some(surface) = self.surface.as_mut() else {
            return false;
        };
        match surface.zoom.tick(now_ms) {
            TickOutcome::Idle => false,
            TickOutcome::Running => {
                self.spatial_dirty = true;
                self.scheduler.request_frame();
                true
            }
            TickOutcome::Finished => {
                self.spatial_dirty = true;
                self.refresh_labels();
                false
            }
        }
    }

    pub fn state(&self) -> ZoomState {
        self.surface.as_ref().map_or(ZoomState::Idle, |s| s.zoom.state())
    }

    pub fn focus(&self) -> Option<&FocusState> {
        self.surface.as_ref().map(|s| s.zoom.focus())
    }

    pub fn zoom(&self) -> Option<&Zoom> {
        self.surface.as_ref().map(|s| &s.zoom)
    }

    // =========================================================================
    // Colors and labels
    // =========================================================================

    /// Recompute every node's color without re-running layout.
    pub fn update_color(&mut self) {
        let Some(surface) = self.surface.as_mut() else {
            return;
        };
        let params = ColorParams::from(&self.config);
        let colors = colorize_all(&surface.tree, &params, self.callbacks.color_override.as_deref());
        for (node, color) in surface.tree.iter_mut().zip(colors) {
            node.color = Some(color);
        }
    }

    /// Recompute every node's label for the current scales.
    fn refresh_labels(&mut self) {
        let Some(surface) = self.surface.as_mut() else {
            return;
        };

        let field_primary = field_label_fn(self.config.label_field.as_deref());
        let field_condensed = field_label_fn(self.config.condensed_label_field.as_deref());
        let primary = self.callbacks.primary_label.as_deref().or(field_primary.as_deref());
        let condensed = self.callbacks.condensed_label.as_deref().or(field_condensed.as_deref());

        let zoom = &surface.zoom;
        let labels: Vec<Option<String>> = surface
            .tree
            .iter()
            .map(|node| {
                let arc = ArcAngles::project(&zoom.node_interval(node), zoom.angle(), zoom.radius());
                label_for(node, &arc, self.config.font_size_px, primary, condensed)
            })
            .collect();

        for (node, label) in surface.tree.iter_mut().zip(labels) {
            node.label = label;
        }
    }

    fn has_labels(&self) -> bool {
        self.callbacks.primary_label.is_some()
            || self.callbacks.condensed_label.is_some()
            || self.config.label_field.is_some()
            || self.config.condensed_label_field.is_some()
    }

    // =========================================================================
    // Queries
    // =========================================================================

    pub fn hierarchy(&self) -> Option<&Hierarchy> {
        self.surface.as_ref().map(|s| &s.tree)
    }

    pub fn node(&self, id: NodeId) -> Option<&LayoutNode> {
        self.hierarchy()?.get(id)
    }

    pub fn find(&self, key: &str) -> Option<&LayoutNode> {
        self.hierarchy()?.find_by_key(key)
    }

    /// Whether the node lies entirely inside the current angle domain.
    pub fn in_domain(&self, id: NodeId) -> bool {
        let Some(surface) = self.surface.as_ref() else {
            return false;
        };
        surface
            .tree
            .get(id)
            .is_some_and(|node| surface.zoom.angle().contains(node.x0(), node.x1()))
    }

    /// Drain non-fatal conditions reported so far.
    pub fn take_diagnostics(&mut self) -> Vec<Error> {
        self.diagnostics.take()
    }

    pub fn diagnostics(&self) -> &Diagnostics {
        &self.diagnostics
    }

    // =========================================================================
    // Frame output
    // =========================================================================

    /// Slices wider than the radian cutoff under the current scales.
    fn visible_arcs(&self) -> Vec<(&LayoutNode, ArcAngles)> {
        let Some(surface) = self.surface.as_ref() else {
            return Vec::new();
        };
        let zoom = &surface.zoom;
        surface
            .tree
            .iter()
            .map(|node| {
                let interval: Interval = zoom.node_interval(node);
                (node, ArcAngles::project(&interval, zoom.angle(), zoom.radius()))
            })
            .filter(|(_, arc)| arc.is_visible(self.config.radian_cutoff))
            .collect()
    }

    /// Geometry for every visible slice at the current animation state.
    pub fn frame(&self) -> Frame {
        let (w, h) = (self.config.width_px, self.config.height_px);
        let state = self.state();
        let labelled = self.has_labels();

        let arcs = self
            .visible_arcs()
            .into_iter()
            .map(|(node, arc)| {
                let path = arc_path(&arc);
                ArcFrame {
                    id: node.id,
                    key: node.key.clone(),
                    dom_id: format!("mainArc-{}", node.key),
                    depth: node.depth,
                    color: node.color.unwrap_or_else(Color::root),
                    arc,
                    d: path.to_string(),
                    path,
                    label_path: labelled.then(|| middle_arc_line(&arc)),
                    label: match state {
                        ZoomState::Idle => node.label.clone(),
                        ZoomState::Transitioning => None,
                    },
                }
            })
            .collect();

        Frame {
            surface_id: self.surface_id.clone(),
            view_box: [-w / 2.0, -h / 2.0, w, h],
            state,
            arcs,
        }
    }
}

/// Start intervals for animating from `old_tree` to `new_tree`.
///
/// Nodes present before (matched by key) start where they were drawn; new
/// nodes start collapsed at their parent's start position, so they grow into
/// place.
fn data_tweens(old_tree: &Hierarchy, old_zoom: &Zoom, new_tree: &Hierarchy) -> Vec<Tween<Interval>> {
    let mut starts: Vec<Interval> = Vec::with_capacity(new_tree.len());
    for node in new_tree.iter() {
        let start = match old_tree.find_by_key(&node.key) {
            Some(old) => old_zoom.node_interval(old),
            None => match node.parent {
                Some(p) => {
                    let parent_start = starts[p.index()];
                    node.interval.collapsed_at(parent_start.x0)
                }
                None => node.interval,
            },
        };
        starts.push(start);
    }

    starts
        .into_iter()
        .zip(new_tree.iter())
        .map(|(start, node)| Tween::new(start, node.interval))
        .collect()
}

/// Label function reading a data field.
fn field_label_fn(field: Option<&str>) -> Option<Box<LabelFn>> {
    let field = field?.to_string();
    Some(Box::new(move |node: &LayoutNode| match node.data.get(&field)? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::zoom::ManualScheduler;
    use serde_json::json;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn config() -> SunburstConfig {
        SunburstConfig {
            easing: crate::config::Easing::Linear,
            ..SunburstConfig::new(400.0, 400.0, "size")
        }
    }

    fn data() -> Value {
        json!({
            "key": "root",
            "name": "root",
            "children": [
                { "key": "A", "name": "Alpha", "size": 1 },
                { "key": "B", "name": "Beta", "children": [
                    { "key": "B1", "name": "B one", "size": 1 },
                    { "key": "B2", "name": "B two", "size": 2 }
                ] }
            ]
        })
    }

    fn engine() -> SunburstEngine {
        let mut engine = SunburstEngine::new(config()).unwrap();
        engine.build(&data()).unwrap();
        engine
    }

    #[test]
    fn test_invalid_config_fails_fast() {
        let err = SunburstEngine::new(SunburstConfig::default()).err().unwrap();
        assert!(err.is_fatal());
    }

    #[test]
    fn test_build_colors_every_node() {
        let engine = engine();
        let tree = engine.hierarchy().unwrap();
        assert_eq!(tree.len(), 5);
        assert!(tree.iter().all(|n| n.color.is_some()));
        assert_eq!(tree.root().color, Some(Color::root()));
    }

    #[test]
    fn test_empty_data_renders_nothing() {
        let mut engine = SunburstEngine::new(config()).unwrap();
        engine.build(&Value::Null).unwrap();
        assert!(engine.frame().arcs.is_empty());
        assert_eq!(engine.take_diagnostics(), vec![Error::EmptyData]);
    }

    #[test]
    fn test_frame_view_box_and_ids() {
        let engine = engine();
        let frame = engine.frame();
        assert_eq!(frame.view_box, [-200.0, -200.0, 400.0, 400.0]);
        assert_eq!(frame.arcs.len(), 5);
        assert_eq!(frame.arcs[1].dom_id, "mainArc-A");
        assert_eq!(frame.arcs[1].d, frame.arcs[1].path.to_string());
        assert!(frame.arcs.iter().all(|a| a.label_path.is_none()));
    }

    #[test]
    fn test_select_requests_frames_until_done() {
        let scheduler = ManualScheduler::new();
        let requests = scheduler.counter();
        let mut engine = engine().with_scheduler(Box::new(scheduler));

        engine.select("B").unwrap();
        assert_eq!(requests.get(), 1);
        assert!(engine.tick(0.0));
        assert!(engine.tick(250.0));
        assert_eq!(requests.get(), 3);
        assert!(!engine.tick(500.0));
        assert_eq!(requests.get(), 3, "no request after the final frame");
        assert_eq!(engine.state(), ZoomState::Idle);
        assert_eq!(engine.zoom().unwrap().angle().domain(), [0.25, 1.0]);
    }

    #[test]
    fn test_zoom_hides_nodes_outside_focus() {
        let mut engine = engine();
        engine.select("B").unwrap();
        engine.tick(0.0);
        engine.tick(1000.0);

        let keys: Vec<_> = engine.frame().arcs.into_iter().map(|a| a.key).collect();
        assert!(!keys.contains(&"A".to_string()), "A is outside the focus: {keys:?}");
        assert!(keys.contains(&"B1".to_string()));
        assert!(engine.in_domain(engine.find("B2").unwrap().id));
        assert!(!engine.in_domain(engine.find("A").unwrap().id));
    }

    #[test]
    fn test_labels_hidden_during_transition() {
        let mut engine = SunburstEngine::new(SunburstConfig {
            label_field: Some("name".into()),
            ..config()
        })
        .unwrap();
        engine.build(&data()).unwrap();

        let beta = |frame: &Frame| frame.arcs.iter().find(|a| a.key == "B").unwrap().label.clone();
        assert_eq!(beta(&engine.frame()).as_deref(), Some("Beta"));

        engine.select("B2").unwrap();
        engine.tick(0.0);
        assert_eq!(beta(&engine.frame()), None);
        engine.tick(500.0);
        assert!(engine.frame().arcs.iter().all(|a| a.label_path.is_some()));
        assert_eq!(engine.find("B2").unwrap().label.as_deref(), Some("B two"));
    }

    #[test]
    fn test_label_fn_overrides_field() {
        let mut engine = engine();
        engine.set_label_fns(Some(Box::new(|node: &LayoutNode| Some(node.key.to_lowercase()))), None);
        assert_eq!(engine.find("B").unwrap().label.as_deref(), Some("b"));
    }

    #[test]
    fn test_color_override_and_update() {
        let mut engine = engine();
        let before = engine.find("A").unwrap().color;
        engine.set_color_override(Some(Box::new(|_: &LayoutNode, _: Color| Color::from_rgb(1, 2, 3))));
        assert_eq!(engine.find("A").unwrap().color, Some(Color::from_rgb(1, 2, 3)));
        assert_eq!(engine.hierarchy().unwrap().root().color, Some(Color::root()));

        engine.set_color_override(None);
        assert_eq!(engine.find("A").unwrap().color, before);
    }

    #[test]
    fn test_click_notifies_then_zooms() {
        let clicked = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&clicked);
        let mut engine = engine();
        engine.set_on_click(Some(Box::new(move |node: &LayoutNode| sink.borrow_mut().push(node.key.clone()))));

        let b = engine.find("B").unwrap().id;
        engine.click(b);
        assert_eq!(clicked.borrow().as_slice(), ["B".to_string()]);
        assert_eq!(engine.focus().unwrap().key, "B");
    }

    #[test]
    fn test_hit_and_hover() {
        let events = Rc::new(RefCell::new(Vec::new()));
        let enter = Rc::clone(&events);
        let exit = Rc::clone(&events);
        let mut engine = engine();
        engine.set_on_hover_enter(Some(Box::new(move |n: &LayoutNode| {
            enter.borrow_mut().push(format!("enter {}", n.key))
        })));
        engine.set_on_hover_exit(Some(Box::new(move |n: &LayoutNode| {
            exit.borrow_mut().push(format!("exit {}", n.key))
        })));

        // A covers the first quarter; with sqrt radii depth 1 spans ~115..163px.
        let a = engine.hover_at(100.0, -80.0);
        assert_eq!(a, engine.find("A").map(|n| n.id));
        engine.hover_at(0.0, 0.0);
        engine.hover_at(500.0, 0.0);

        assert_eq!(
            events.borrow().as_slice(),
            ["enter A", "exit A", "enter root", "exit root"].map(String::from)
        );
        assert_eq!(engine.hovered(), None);
    }

    #[test]
    fn test_rebuild_ends_hover() {
        let exits = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&exits);
        let mut engine = engine();
        engine.set_on_hover_exit(Some(Box::new(move |n: &LayoutNode| sink.borrow_mut().push(n.key.clone()))));

        let a = engine.find("A").map(|n| n.id);
        engine.hover(a);
        let mut changed = data();
        changed["children"][0]["size"] = json!(5);
        engine.rebuild(&changed, config()).unwrap();
        assert_eq!(exits.borrow().as_slice(), ["A".to_string()]);
        assert_eq!(engine.hovered(), None);

        let b = engine.find("B").map(|n| n.id);
        engine.hover(b);
        engine.build(&data()).unwrap();
        assert_eq!(exits.borrow().as_slice(), ["A".to_string(), "B".to_string()]);
    }

    #[test]
    fn test_rebuild_skips_identical_inputs() {
        let mut engine = engine();
        assert!(!engine.rebuild(&data(), config()).unwrap());
        let mut changed = data();
        changed["children"][0]["size"] = json!(5);
        assert!(engine.rebuild(&changed, config()).unwrap());
        assert_eq!(engine.find("A").unwrap().weight, 5.0);
    }

    #[test]
    fn test_rebuild_with_custom_comparison() {
        let mut engine = engine();
        let mut changed = data();
        changed["children"][0]["size"] = json!(5);
        assert!(!engine.rebuild_with(&changed, config(), |_, _| true).unwrap());
        assert_eq!(engine.find("A").unwrap().weight, 1.0);
    }

    #[test]
    fn test_rebuild_invalid_config_changes_nothing() {
        let mut engine = engine();
        let err = engine.rebuild(&data(), SunburstConfig::default()).unwrap_err();
        assert!(err.is_fatal());
        assert_eq!(engine.config().width_px, 400.0);
        assert_eq!(engine.hierarchy().unwrap().len(), 5);
    }

    #[test]
    fn test_rebuild_keeps_focus_by_key_and_grows_new_nodes() {
        let mut engine = engine();
        engine.select("B").unwrap();
        engine.tick(0.0);
        engine.tick(500.0);

        let mut changed = data();
        changed["children"][1]["children"]
            .as_array_mut()
            .unwrap()
            .push(json!({ "key": "B3", "size": 1 }));
        assert!(engine.rebuild(&changed, config()).unwrap());

        assert_eq!(engine.focus().unwrap().key, "B");
        assert_eq!(engine.state(), ZoomState::Transitioning);

        engine.tick(1000.0);
        let b3 = engine.find("B3").unwrap().id;
        let zoom = engine.zoom().unwrap();
        let start = zoom.node_interval(engine.node(b3).unwrap());
        assert_eq!(start.width(), 0.0, "new node starts collapsed");

        engine.tick(1500.0);
        let node = engine.node(b3).unwrap();
        assert_eq!(engine.zoom().unwrap().node_interval(node), node.interval);
    }

    #[test]
    fn test_rebuild_drops_vanished_focus_to_root() {
        let mut engine = engine();
        engine.select("B").unwrap();
        engine.tick(0.0);
        engine.tick(500.0);

        let replaced = json!({ "key": "root", "children": [ { "key": "C", "size": 1 } ] });
        engine.rebuild(&replaced, config()).unwrap();
        assert_eq!(engine.focus().unwrap().key, "root");
        engine.tick(600.0);
        engine.tick(1100.0);
        assert_eq!(engine.zoom().unwrap().angle().domain(), [0.0, 1.0]);
    }
}
