//! Zoom/focus state machine.
//!
//! Owns the two scales and mediates every change to them:
//!
//! - `Idle --select(node)--> Transitioning`: the current scale parameters
//!   become the tween start, the node's interval defines the end.
//! - `Transitioning --select(same node)-->` ignored (duplicate event).
//! - `Transitioning --select(other node)--> Transitioning`: preempt, restarting
//!   from the current mid-flight parameters.
//! - `Transitioning --tick(t = 1)--> Idle`: parameters pinned to the target.

use serde::Serialize;

use super::tween::{time_progress, Lerp, Tween};
use crate::config::{Easing, SunburstConfig};
use crate::hierarchy::{Interval, LayoutNode, NodeId};
use crate::render::{AngleScale, RadiusScale};

/// The node currently zoomed to fill the view.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FocusState {
    pub node: NodeId,
    /// Key used to re-resolve the focus after a rebuild.
    pub key: String,
    #[serde(flatten)]
    pub interval: Interval,
}

impl FocusState {
    pub fn of(node: &LayoutNode) -> Self {
        Self {
            node: node.id,
            key: node.key.clone(),
            interval: node.interval,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum ZoomState {
    Idle,
    Transitioning,
}

/// What a call to [`Zoom::tick`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Nothing was animating.
    Idle,
    /// An intermediate frame was applied; another is needed.
    Running,
    /// The final frame was applied and the transition torn down.
    Finished,
}

/// Scale parameters that a zoom animates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScaleParams {
    pub x_domain: [f64; 2],
    pub y_domain: [f64; 2],
    pub y_range: [f64; 2],
}

impl ScaleParams {
    /// Parameters that make `focus` fill the view.
    ///
    /// The inner radius is 0 only for a focus on the innermost ring; otherwise
    /// a small inset keeps the focused ring visible as a clickable band.
    pub fn for_focus(focus: &Interval, outer_radius: f64, inset: f64) -> Self {
        Self {
            x_domain: [focus.x0, focus.x1],
            y_domain: [focus.y0, 1.0],
            y_range: [if focus.y0 > 0.0 { inset } else { 0.0 }, outer_radius],
        }
    }
}

impl Lerp for ScaleParams {
    fn lerp(self, to: Self, t: f64) -> Self {
        Self {
            x_domain: self.x_domain.lerp(to.x_domain, t),
            y_domain: self.y_domain.lerp(to.y_domain, t),
            y_range: self.y_range.lerp(to.y_range, t),
        }
    }
}

/// One in-flight animation. Dropped on completion or preemption.
#[derive(Debug, Clone)]
pub struct Transition {
    scales: Tween<ScaleParams>,
    /// Per-node interval tweens, indexed by `NodeId`, after a data change.
    nodes: Option<Vec<Tween<Interval>>>,
    /// Node this transition was requested for, used to drop duplicates.
    target: Option<NodeId>,
    start_ms: Option<f64>,
    duration_ms: f64,
    easing: Easing,
    /// Eased progress of the most recent tick.
    progress: f64,
}

impl Transition {
    pub fn target(&self) -> Option<NodeId> {
        self.target
    }

    pub fn progress(&self) -> f64 {
        self.progress
    }

    /// The first tick stamps the start time, so the tween starts at `t = 0`
    /// whenever the host gets around to rendering it.
    fn advance(&mut self, now_ms: f64) -> f64 {
        let start = *self.start_ms.get_or_insert(now_ms);
        let linear = time_progress(start, now_ms, self.duration_ms);
        self.progress = if linear >= 1.0 { 1.0 } else { self.easing.apply(linear) };
        self.progress
    }

    fn node_interval(&self, id: NodeId) -> Option<Interval> {
        self.nodes
            .as_ref()
            .and_then(|tweens| tweens.get(id.index()))
            .map(|tween| tween.at(self.progress))
    }
}

/// Scale owner and focus state machine.
#[derive(Debug, Clone)]
pub struct Zoom {
    angle: AngleScale,
    radius: RadiusScale,
    focus: FocusState,
    transition: Option<Transition>,
    outer_radius: f64,
    inset: f64,
    duration_ms: f64,
    easing: Easing,
}

impl Zoom {
    pub fn new(config: &SunburstConfig, root: &LayoutNode) -> Self {
        let outer_radius = config.radius();
        Self {
            angle: AngleScale::new(),
            radius: RadiusScale::new(config.radius_mode, outer_radius),
            focus: FocusState::of(root),
            transition: None,
            outer_radius,
            inset: config.focus_inset_px,
            duration_ms: config.transition_duration_ms,
            easing: config.easing,
        }
    }

    pub fn angle(&self) -> &AngleScale {
        &self.angle
    }

    pub fn radius(&self) -> &RadiusScale {
        &self.radius
    }

    pub fn focus(&self) -> &FocusState {
        &self.focus
    }

    pub fn state(&self) -> ZoomState {
        if self.transition.is_some() {
            ZoomState::Transitioning
        } else {
            ZoomState::Idle
        }
    }

    pub fn transition(&self) -> Option<&Transition> {
        self.transition.as_ref()
    }

    /// Current (possibly mid-flight) scale parameters.
    pub fn params(&self) -> ScaleParams {
        ScaleParams {
            x_domain: self.angle.domain(),
            y_domain: self.radius.domain(),
            y_range: self.radius.range(),
        }
    }

    fn apply(&mut self, params: ScaleParams) {
        self.angle.set_domain(params.x_domain);
        self.radius.set_domain(params.y_domain);
        self.radius.set_range(params.y_range);
    }

    /// Adopt new config values that affect geometry or timing.
    ///
    /// A change of radius mode takes effect immediately; the scale parameters
    /// themselves are left for the next transition to move.
    pub fn reconfigure(&mut self, config: &SunburstConfig) {
        self.outer_radius = config.radius();
        self.inset = config.focus_inset_px;
        self.duration_ms = config.transition_duration_ms;
        self.easing = config.easing;
        if self.radius.mode() != config.radius_mode {
            let mut radius = RadiusScale::new(config.radius_mode, self.outer_radius);
            radius.set_domain(self.radius.domain());
            radius.set_range(self.radius.range());
            self.radius = radius;
        }
    }

    /// Start zooming to `node`.
    ///
    /// Returns `false` when the request duplicates the target of the running
    /// transition and was dropped.
    pub fn select(&mut self, node: &LayoutNode) -> bool {
        if self.transition.as_ref().and_then(Transition::target) == Some(node.id) {
            tracing::debug!(node = %node.id, "ignoring duplicate zoom request");
            return false;
        }

        let nodes = self.rebase_node_tweens();
        let end = ScaleParams::for_focus(&node.interval, self.outer_radius, self.inset);
        self.focus = FocusState::of(node);
        self.begin(end, nodes, Some(node.id));
        true
    }

    /// Move to `focus` after the tree was rebuilt, optionally tweening every
    /// node from its previous interval.
    pub fn retarget(&mut self, focus: FocusState, nodes: Option<Vec<Tween<Interval>>>) {
        let end = ScaleParams::for_focus(&focus.interval, self.outer_radius, self.inset);
        self.focus = focus;
        self.begin(end, nodes, None);
    }

    /// Jump straight to `focus` with no animation.
    pub fn reset(&mut self, focus: FocusState) {
        let end = ScaleParams::for_focus(&focus.interval, self.outer_radius, self.inset);
        self.transition = None;
        self.focus = focus;
        self.apply(end);
    }

    fn begin(&mut self, end: ScaleParams, nodes: Option<Vec<Tween<Interval>>>, target: Option<NodeId>) {
        self.transition = Some(Transition {
            scales: Tween::new(self.params(), end),
            nodes,
            target,
            start_ms: None,
            duration_ms: self.duration_ms,
            easing: self.easing,
            progress: 0.0,
        });
    }

    /// Keep a preempted data tween continuous: its current values become the
    /// new start.
    fn rebase_node_tweens(&mut self) -> Option<Vec<Tween<Interval>>> {
        let previous = self.transition.take()?;
        let t = previous.progress;
        previous
            .nodes
            .map(|tweens| tweens.into_iter().map(|tw| Tween::new(tw.at(t), tw.end())).collect())
    }

    /// Apply the frame at `now_ms`.
    pub fn tick(&mut self, now_ms: f64) -> TickOutcome {
        let Some(transition) = self.transition.as_mut() else {
            return TickOutcome::Idle;
        };

        let t = transition.advance(now_ms);
        let params = transition.scales.at(t);
        if t >= 1.0 {
            self.transition = None;
            self.apply(params);
            tracing::debug!(focus = %self.focus.node, "zoom transition finished");
            TickOutcome::Finished
        } else {
            self.apply(params);
            TickOutcome::Running
        }
    }

    /// Interval to draw for a node this frame.
    pub fn node_interval(&self, node: &LayoutNode) -> Interval {
        self.transition
            .as_ref()
            .and_then(|tr| tr.node_interval(node.id))
            .unwrap_or(node.interval)
    }
}
