//! Chart configuration.
//!
//! `SunburstConfig` is plain data so a JS host can hand over an options object
//! through `serde-wasm-bindgen`. Behavioral hooks (label functions, color
//! override, event handlers) live in [`crate::engine::Callbacks`] instead.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// How normalized depth maps onto screen radius.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RadiusMode {
    /// Equal ring thickness.
    Linear,
    /// Radius proportional to the square root of depth, so ring areas stay
    /// proportional to weight.
    Sqrt,
}

/// Time-to-progress curve applied before interpolation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Easing {
    Linear,
    CubicInOut,
}

/// Options recognized by the engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SunburstConfig {
    /// Viewport width. Required.
    pub width_px: f64,
    /// Viewport height. Required.
    pub height_px: f64,
    /// Data field holding a leaf's weight. Required.
    pub weight_field: String,
    /// Data field holding a node's children.
    pub children_field: String,
    /// Data field holding a node's stable key.
    pub key_field: String,
    /// Smallest rendered angular width, in radians after scaling.
    pub radian_cutoff: f64,
    /// Zoom animation length.
    pub transition_duration_ms: f64,
    pub easing: Easing,
    /// Base saturation of depth-1 slices.
    pub saturation: f32,
    /// Base lightness of depth-1 slices.
    pub lightness: f32,
    /// Brighten exponent applied from parent to child.
    pub child_brightness: f32,
    /// Average glyph width used when checking whether a label fits.
    pub font_size_px: f64,
    pub radius_mode: RadiusMode,
    /// Inner radius of the focused ring when the focus is not the root.
    pub focus_inset_px: f64,
    /// Tween node intervals from the previous layout on rebuild.
    pub animate_data_changes: bool,
    /// Surface identifier; generated when absent.
    pub dom_id: Option<String>,
    /// Data field used as the primary label when no label function is set.
    pub label_field: Option<String>,
    /// Data field used as the condensed label when no function is set.
    pub condensed_label_field: Option<String>,
}

impl Default for SunburstConfig {
    fn default() -> Self {
        Self {
            width_px: 0.0,
            height_px: 0.0,
            weight_field: String::new(),
            children_field: "children".to_string(),
            key_field: "key".to_string(),
            radian_cutoff: 0.001,
            transition_duration_ms: 500.0,
            easing: Easing::CubicInOut,
            saturation: 0.5,
            lightness: 0.5,
            child_brightness: 0.5,
            font_size_px: 12.0,
            radius_mode: RadiusMode::Sqrt,
            focus_inset_px: 20.0,
            animate_data_changes: true,
            dom_id: None,
            label_field: None,
            condensed_label_field: None,
        }
    }
}

impl SunburstConfig {
    /// Convenience constructor with the three required options.
    pub fn new(width_px: f64, height_px: f64, weight_field: impl Into<String>) -> Self {
        Self {
            width_px,
            height_px,
            weight_field: weight_field.into(),
            ..Default::default()
        }
    }

    /// Parse from a JSON options object, mapping shape errors to `InvalidConfig`.
    pub fn from_json(value: serde_json::Value) -> Result<Self> {
        serde_json::from_value(value).map_err(|e| Error::invalid_config("config", e.to_string()))
    }

    /// Outer radius of the chart.
    pub fn radius(&self) -> f64 {
        self.width_px.min(self.height_px) / 2.0
    }

    /// Fail fast on anything geometry cannot be computed without.
    pub fn validate(&self) -> Result<()> {
        positive("widthPx", self.width_px)?;
        positive("heightPx", self.height_px)?;
        positive("fontSizePx", self.font_size_px)?;

        if self.weight_field.is_empty() {
            return Err(Error::invalid_config("weightField", "required"));
        }
        if self.children_field.is_empty() {
            return Err(Error::invalid_config("childrenField", "must not be empty"));
        }
        if !self.radian_cutoff.is_finite() || self.radian_cutoff < 0.0 {
            return Err(Error::invalid_config(
                "radianCutoff",
                format!("expected a non-negative number, got {}", self.radian_cutoff),
            ));
        }
        if !self.transition_duration_ms.is_finite() || self.transition_duration_ms < 0.0 {
            return Err(Error::invalid_config(
                "transitionDurationMs",
                format!("expected a non-negative number, got {}", self.transition_duration_ms),
            ));
        }
        if !self.focus_inset_px.is_finite() || self.focus_inset_px < 0.0 {
            return Err(Error::invalid_config(
                "focusInsetPx",
                format!("expected a non-negative number, got {}", self.focus_inset_px),
            ));
        }
        unit("saturation", self.saturation)?;
        unit("lightness", self.lightness)?;
        if !self.child_brightness.is_finite() {
            return Err(Error::invalid_config("childBrightness", "must be finite"));
        }
        Ok(())
    }
}

fn positive(field: &str, value: f64) -> Result<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else if value == 0.0 {
        Err(Error::invalid_config(field, "required"))
    } else {
        Err(Error::invalid_config(
            field,
            format!("expected a positive number, got {value}"),
        ))
    }
}

fn unit(field: &str, value: f32) -> Result<()> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(Error::invalid_config(
            field,
            format!("expected a value in [0, 1], got {value}"),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_defaults_match_component() {
        let config = SunburstConfig::default();
        assert_eq!(config.radian_cutoff, 0.001);
        assert_eq!(config.transition_duration_ms, 500.0);
        assert_eq!(config.font_size_px, 12.0);
        assert_eq!(config.key_field, "key");
        assert_eq!(config.radius_mode, RadiusMode::Sqrt);
    }

    #[test]
    fn test_missing_viewport_is_invalid() {
        let err = SunburstConfig {
            weight_field: "size".into(),
            ..Default::default()
        }
        .validate()
        .unwrap_err();
        assert!(err.is_fatal());
        assert!(matches!(err, Error::InvalidConfig { ref field, .. } if field == "widthPx"));
    }

    #[test]
    fn test_missing_weight_field_is_invalid() {
        let err = SunburstConfig::new(100.0, 100.0, "").validate().unwrap_err();
        assert!(matches!(err, Error::InvalidConfig { ref field, .. } if field == "weightField"));
    }

    #[test]
    fn test_out_of_range_saturation_is_invalid() {
        let config = SunburstConfig {
            saturation: 1.5,
            ..SunburstConfig::new(100.0, 100.0, "size")
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_from_json_camel_case() {
        let config = SunburstConfig::from_json(json!({
            "widthPx": 880,
            "heightPx": 600,
            "weightField": "size",
            "radiusMode": "linear",
            "easing": "linear",
            "transitionDurationMs": 750
        }))
        .unwrap();

        assert_eq!(config.width_px, 880.0);
        assert_eq!(config.radius_mode, RadiusMode::Linear);
        assert_eq!(config.easing, Easing::Linear);
        assert_eq!(config.transition_duration_ms, 750.0);
        assert_eq!(config.radius(), 300.0);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_from_json_wrong_shape() {
        let err = SunburstConfig::from_json(json!({ "widthPx": "wide" })).unwrap_err();
        assert!(err.is_fatal());
    }
}
