//! Sunburst - WASM Module
//!
//! Radial partition layout and zoom-transition engine for sunburst charts.
//! It is compiled to WebAssembly and exposes a JavaScript-friendly API via
//! wasm-bindgen; the host owns the drawing surface and the animation clock.
//!
//! # Architecture
//!
//! - `hierarchy`: Flat node arena built from a raw JSON tree
//! - `layout`: Weighted radial partition into normalized intervals
//! - `render`: Scales, arc paths, colors and label fitting
//! - `zoom`: Focus state machine, tweens and frame scheduling
//! - `spatial`: R-tree hit testing in polar space
//! - `engine`: Ties the above together behind one owner

use js_sys::Function;
use serde::Serialize;
use wasm_bindgen::prelude::*;

pub mod config;
pub mod engine;
pub mod error;
pub mod hierarchy;
pub mod layout;
pub mod render;
pub mod spatial;
pub mod zoom;

pub use config::SunburstConfig;
pub use engine::SunburstEngine;
pub use error::{Error, Result};

use hierarchy::{LayoutNode, NodeId};
use render::Color;
use zoom::{FrameScheduler, ZoomState};

/// Initialize the WASM module.
#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
}

fn to_js_error(error: Error) -> JsValue {
    JsError::new(&error.to_string()).into()
}

/// Maps (flattened structs, JSON payloads) become plain objects.
const SERIALIZER: serde_wasm_bindgen::Serializer = serde_wasm_bindgen::Serializer::json_compatible();

fn to_js<T: Serialize + ?Sized>(value: &T) -> std::result::Result<JsValue, JsValue> {
    value.serialize(&SERIALIZER).map_err(|e| JsError::new(&e.to_string()).into())
}

fn node_to_js(node: &LayoutNode) -> JsValue {
    to_js(node).unwrap_or(JsValue::NULL)
}

/// Log a failed host callback without interrupting the engine.
fn report_callback_error(result: std::result::Result<JsValue, JsValue>) -> Option<JsValue> {
    match result {
        Ok(value) => Some(value),
        Err(err) => {
            web_sys::console::error_2(&JsValue::from_str("sunburst callback failed:"), &err);
            None
        }
    }
}

fn parse_config(config: JsValue) -> Result<SunburstConfig> {
    serde_wasm_bindgen::from_value(config).map_err(|e| Error::invalid_config("config", e.to_string()))
}

fn parse_data(data: JsValue) -> std::result::Result<serde_json::Value, JsValue> {
    if data.is_undefined() || data.is_null() {
        return Ok(serde_json::Value::Null);
    }
    serde_wasm_bindgen::from_value(data).map_err(|e| JsError::new(&e.to_string()).into())
}

/// Frame scheduler that calls a JS function, typically wrapping
/// `requestAnimationFrame`.
struct JsFrameScheduler {
    callback: Function,
}

impl FrameScheduler for JsFrameScheduler {
    fn request_frame(&mut self) {
        report_callback_error(self.callback.call0(&JsValue::NULL));
    }
}

fn js_node_callback(f: Function) -> Box<engine::NodeCallback> {
    Box::new(move |node: &LayoutNode| {
        report_callback_error(f.call1(&JsValue::NULL, &node_to_js(node)));
    })
}

fn js_label_fn(f: Function) -> Box<render::LabelFn> {
    Box::new(move |node: &LayoutNode| {
        report_callback_error(f.call1(&JsValue::NULL, &node_to_js(node)))?.as_string()
    })
}

/// Main entry point for the sunburst engine.
///
/// This struct wraps the internal SunburstEngine and provides the public API
/// exposed to JavaScript.
#[wasm_bindgen]
pub struct SunburstWasm {
    engine: SunburstEngine,
    /// Diagnostics already forwarded to the console
    forwarded: usize,
}

#[wasm_bindgen]
impl SunburstWasm {
    /// Create an engine from a config object. Throws on an invalid config.
    #[wasm_bindgen(constructor)]
    pub fn new(config: JsValue) -> std::result::Result<SunburstWasm, JsValue> {
        let config = parse_config(config).map_err(to_js_error)?;
        let engine = SunburstEngine::new(config).map_err(to_js_error)?;
        Ok(Self { engine, forwarded: 0 })
    }

    /// Element id of this chart's surface.
    #[wasm_bindgen(js_name = surfaceId)]
    pub fn surface_id(&self) -> String {
        self.engine.surface_id().to_string()
    }

    // =========================================================================
    // Build
    // =========================================================================

    /// Lay out `data` from scratch. Missing data renders nothing.
    pub fn build(&mut self, data: JsValue) -> std::result::Result<(), JsValue> {
        let data = parse_data(data)?;
        let result = self.engine.build(&data).map_err(to_js_error);
        self.forward_diagnostics();
        result
    }

    /// Rebuild when data or config changed; animates from the current state.
    ///
    /// Returns whether a rebuild happened.
    pub fn rebuild(&mut self, data: JsValue, config: JsValue) -> std::result::Result<bool, JsValue> {
        let data = parse_data(data)?;
        let config = parse_config(config).map_err(to_js_error)?;
        let result = self.engine.rebuild(&data, config).map_err(to_js_error);
        self.forward_diagnostics();
        result
    }

    /// Recolor every slice without re-running layout.
    #[wasm_bindgen(js_name = updateColor)]
    pub fn update_color(&mut self) {
        self.engine.update_color();
    }

    // =========================================================================
    // Navigation
    // =========================================================================

    /// Zoom to the node with the given key. Returns false if none matched.
    pub fn select(&mut self, key: &str) -> bool {
        let found = self.engine.select(key).is_ok();
        self.forward_diagnostics();
        found
    }

    /// Zoom to a node by id.
    #[wasm_bindgen(js_name = selectNode)]
    pub fn select_node(&mut self, node_id: u32) -> bool {
        self.engine.select_node(NodeId(node_id))
    }

    /// Click the slice under a point relative to the chart center.
    #[wasm_bindgen(js_name = clickAt)]
    pub fn click_at(&mut self, x: f64, y: f64) -> Option<u32> {
        self.engine.click_at(x, y).map(NodeId::raw)
    }

    /// Hover the slice under a point relative to the chart center.
    #[wasm_bindgen(js_name = hoverAt)]
    pub fn hover_at(&mut self, x: f64, y: f64) -> Option<u32> {
        self.engine.hover_at(x, y).map(NodeId::raw)
    }

    /// Slice under a point, without side effects on hover or focus.
    #[wasm_bindgen(js_name = hitTest)]
    pub fn hit_test(&mut self, x: f64, y: f64) -> Option<u32> {
        self.engine.hit_test(x, y).map(NodeId::raw)
    }

    /// Key of the focused node.
    #[wasm_bindgen(js_name = focusKey)]
    pub fn focus_key(&self) -> Option<String> {
        self.engine.focus().map(|f| f.key.clone())
    }

    /// Whether a node lies entirely inside the current angular view.
    #[wasm_bindgen(js_name = inDomain)]
    pub fn in_domain(&self, node_id: u32) -> bool {
        self.engine.in_domain(NodeId(node_id))
    }

    /// Resolved node by key, or `null`.
    #[wasm_bindgen(js_name = getNode)]
    pub fn get_node(&self, key: &str) -> JsValue {
        self.engine.find(key).map_or(JsValue::NULL, node_to_js)
    }

    // =========================================================================
    // Animation
    // =========================================================================

    /// Advance the running transition. Returns true while more frames are
    /// needed.
    pub fn tick(&mut self, now_ms: f64) -> bool {
        self.engine.tick(now_ms)
    }

    #[wasm_bindgen(js_name = isTransitioning)]
    pub fn is_transitioning(&self) -> bool {
        self.engine.state() == ZoomState::Transitioning
    }

    /// Drawing instructions for the current state.
    pub fn frame(&self) -> std::result::Result<JsValue, JsValue> {
        to_js(&self.engine.frame())
    }

    // =========================================================================
    // Host callbacks
    // =========================================================================

    /// Function called whenever the engine needs another `tick`.
    #[wasm_bindgen(js_name = setFrameScheduler)]
    pub fn set_frame_scheduler(&mut self, callback: Function) {
        self.engine.set_scheduler(Box::new(JsFrameScheduler { callback }));
    }

    /// `(node, cssColor) => cssColor`; return a hex string to substitute.
    #[wasm_bindgen(js_name = setColorOverride)]
    pub fn set_color_override(&mut self, callback: Option<Function>) {
        let f = callback.map(|f| -> Box<render::ColorOverride> {
            Box::new(move |node: &LayoutNode, color: Color| {
                report_callback_error(f.call2(&JsValue::NULL, &node_to_js(node), &JsValue::from_str(&color.to_hex())))
                    .and_then(|v| v.as_string())
                    .and_then(|s| Color::from_hex(&s))
                    .unwrap_or(color)
            })
        });
        self.engine.set_color_override(f);
    }

    /// `node => string | null` for the primary and condensed labels.
    #[wasm_bindgen(js_name = setLabelFns)]
    pub fn set_label_fns(&mut self, primary: Option<Function>, condensed: Option<Function>) {
        self.engine
            .set_label_fns(primary.map(js_label_fn), condensed.map(js_label_fn));
    }

    #[wasm_bindgen(js_name = setOnClick)]
    pub fn set_on_click(&mut self, callback: Option<Function>) {
        self.engine.set_on_click(callback.map(js_node_callback));
    }

    #[wasm_bindgen(js_name = setOnHoverEnter)]
    pub fn set_on_hover_enter(&mut self, callback: Option<Function>) {
        self.engine.set_on_hover_enter(callback.map(js_node_callback));
    }

    #[wasm_bindgen(js_name = setOnHoverExit)]
    pub fn set_on_hover_exit(&mut self, callback: Option<Function>) {
        self.engine.set_on_hover_exit(callback.map(js_node_callback));
    }

    // =========================================================================
    // Diagnostics
    // =========================================================================

    /// Drain non-fatal diagnostics as messages.
    #[wasm_bindgen(js_name = takeDiagnostics)]
    pub fn take_diagnostics(&mut self) -> Vec<String> {
        self.forwarded = 0;
        self.engine.take_diagnostics().iter().map(ToString::to_string).collect()
    }

    fn forward_diagnostics(&mut self) {
        for error in self.engine.diagnostics().iter().skip(self.forwarded) {
            web_sys::console::warn_1(&JsValue::from_str(&error.to_string()));
        }
        self.forwarded = self.engine.diagnostics().len();
    }
}
