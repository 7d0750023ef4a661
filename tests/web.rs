//! Browser tests for the JS-facing wrapper. Run with `wasm-pack test --headless --chrome`.

#![cfg(target_arch = "wasm32")]

use js_sys::{Array, Function, Reflect};
use serde::Serialize;
use serde_json::json;
use sunburst_wasm::SunburstWasm;
use wasm_bindgen::JsValue;
use wasm_bindgen_test::*;

wasm_bindgen_test_configure!(run_in_browser);

/// Plain JS objects, as a host would pass them.
fn to_js(value: serde_json::Value) -> JsValue {
    value.serialize(&serde_wasm_bindgen::Serializer::json_compatible()).unwrap()
}

fn get(target: &JsValue, key: &str) -> JsValue {
    Reflect::get(target, &JsValue::from_str(key)).unwrap()
}

fn chart() -> SunburstWasm {
    let mut chart = SunburstWasm::new(to_js(json!({ "widthPx": 400, "heightPx": 400, "weightField": "size" }))).unwrap();
    chart
        .build(to_js(json!({
            "key": "root",
            "children": [ { "key": "A", "name": "Alpha", "size": 1 }, { "key": "B", "size": 3 } ]
        })))
        .unwrap();
    chart
}

#[wasm_bindgen_test]
fn constructor_rejects_missing_extent() {
    assert!(SunburstWasm::new(to_js(json!({ "weightField": "size" }))).is_err());
}

#[wasm_bindgen_test]
fn select_and_tick_to_idle() {
    let mut chart = chart();
    assert!(chart.select("B"));
    assert!(chart.is_transitioning());
    let mut now = 0.0;
    while chart.tick(now) {
        now += 16.0;
    }
    assert_eq!(chart.focus_key().as_deref(), Some("B"));
    assert!(!chart.select("nonexistent"));
    assert_eq!(chart.take_diagnostics().len(), 1);
}

#[wasm_bindgen_test]
fn frame_arcs_are_plain_objects() {
    let chart = chart();
    let frame = chart.frame().unwrap();
    let arcs = Array::from(&get(&frame, "arcs"));
    assert_eq!(arcs.length(), 3);

    let root = arcs.get(0);
    assert_eq!(get(&root, "domId").as_string().as_deref(), Some("mainArc-root"));
    assert!(get(&root, "d").as_string().is_some_and(|d| d.starts_with('M')));
    assert_eq!(get(&root, "color").as_string().as_deref(), Some("rgb(51, 204, 204)"));
    assert!(get(&root, "startAngle").as_f64().is_some());
}

#[wasm_bindgen_test]
fn nodes_carry_interval_and_payload() {
    let chart = chart();
    let node = chart.get_node("A");
    assert_eq!(get(&node, "x0").as_f64(), Some(0.0));
    assert_eq!(get(&node, "x1").as_f64(), Some(0.25));
    assert_eq!(get(&node, "depth").as_f64(), Some(1.0));
    assert!(get(&node, "color").as_string().is_some());
    assert_eq!(get(&get(&node, "data"), "name").as_string().as_deref(), Some("Alpha"));
}

#[wasm_bindgen_test]
fn click_callback_receives_resolved_node() {
    let mut chart = chart();
    let seen = Array::new();
    let record = Function::new_with_args("seen, node", "seen.push(node.key + ':' + node.depth + ':' + node.data.name)");
    chart.set_on_click(Some(record.bind1(&JsValue::NULL, &seen)));

    // A covers the first quarter at depth 1.
    assert!(chart.click_at(100.0, -80.0).is_some());
    assert_eq!(seen.get(0).as_string().as_deref(), Some("A:1:Alpha"));
}
