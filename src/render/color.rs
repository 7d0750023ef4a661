//! Slice color propagation.
//!
//! Colors fan out from the depth-1 sectors: each depth-1 node takes its hue
//! from its angular position, and every deeper node brightens its parent's
//! base color and rotates the hue by a quarter of its own position.

use std::fmt;

use palette::{FromColor, Hsl, Srgb};
use serde::{Serialize, Serializer};

use crate::config::SunburstConfig;
use crate::hierarchy::{Hierarchy, LayoutNode};

/// Per-step lightness multiplier of [`Color::brighter`].
const BRIGHTER: f32 = 1.0 / 0.7;

/// An HSL color. Lightness may exceed 1 after brightening; conversion to RGB
/// clamps.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color(Hsl);

impl Color {
    /// Fill of the center disc.
    pub fn root() -> Self {
        Self::from_rgb(0x33, 0xcc, 0xcc)
    }

    pub fn hsl(hue_degrees: f32, saturation: f32, lightness: f32) -> Self {
        Self(Hsl::new(hue_degrees, saturation, lightness))
    }

    pub fn from_rgb(r: u8, g: u8, b: u8) -> Self {
        Self(Hsl::from_color(Srgb::<u8>::new(r, g, b).into_format::<f32>()))
    }

    /// Parse `#rrggbb` or `#rgb`.
    pub fn from_hex(hex: &str) -> Option<Self> {
        let rgb: Srgb<u8> = hex.trim().parse().ok()?;
        Some(Self::from_rgb(rgb.red, rgb.green, rgb.blue))
    }

    pub fn hue(&self) -> f32 {
        self.0.hue.into_positive_degrees()
    }

    pub fn saturation(&self) -> f32 {
        self.0.saturation
    }

    pub fn lightness(&self) -> f32 {
        self.0.lightness
    }

    /// Scale lightness by `(1 / 0.7)^k`.
    pub fn brighter(&self, k: f32) -> Self {
        Self::hsl(self.hue(), self.saturation(), self.lightness() * BRIGHTER.powf(k))
    }

    pub fn shift_hue(&self, degrees: f32) -> Self {
        Self::hsl(self.hue() + degrees, self.saturation(), self.lightness())
    }

    pub fn to_rgb(&self) -> (u8, u8, u8) {
        let rgb: Srgb<u8> = Srgb::<f32>::from_color(self.0).into_format();
        (rgb.red, rgb.green, rgb.blue)
    }

    pub fn to_hex(&self) -> String {
        let (r, g, b) = self.to_rgb();
        format!("#{r:02x}{g:02x}{b:02x}")
    }
}

/// CSS `rgb(r, g, b)` form.
impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (r, g, b) = self.to_rgb();
        write!(f, "rgb({r}, {g}, {b})")
    }
}

impl Serialize for Color {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Color inputs taken from the config.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColorParams {
    pub saturation: f32,
    pub lightness: f32,
    pub child_brightness: f32,
}

impl From<&SunburstConfig> for ColorParams {
    fn from(config: &SunburstConfig) -> Self {
        Self {
            saturation: config.saturation,
            lightness: config.lightness,
            child_brightness: config.child_brightness,
        }
    }
}

/// Hue position of a node: `x0` mapped onto `[0, 360)`.
#[inline]
fn hue_position(node: &LayoutNode) -> f32 {
    (node.x0() * 360.0) as f32
}

/// Color of one node given its parent's base color.
///
/// Returns `(base, display)`: `base` is what children inherit from, `display`
/// is what gets drawn before any override. A pure function of the node's
/// position and its ancestors.
pub fn colorize(node: &LayoutNode, parent_base: Option<Color>, params: &ColorParams) -> (Color, Color) {
    match (node.depth, parent_base) {
        (0, _) | (_, None) => {
            let root = Color::root();
            (root, root)
        }
        (1, _) => {
            let color = Color::hsl(hue_position(node), params.saturation, params.lightness);
            (color, color)
        }
        (_, Some(parent)) => {
            let base = parent.brighter(params.child_brightness);
            (base, base.shift_hue(hue_position(node) / 4.0))
        }
    }
}

/// Caller hook that may substitute a computed color.
pub type ColorOverride = dyn Fn(&LayoutNode, Color) -> Color;

/// Resolve the display color of every node, top-down.
///
/// The override sees every non-root node together with its computed color.
pub fn colorize_all(tree: &Hierarchy, params: &ColorParams, color_override: Option<&ColorOverride>) -> Vec<Color> {
    let mut bases: Vec<Color> = Vec::with_capacity(tree.len());
    let mut display: Vec<Color> = Vec::with_capacity(tree.len());

    for node in tree.iter() {
        let parent_base = node.parent.map(|p| bases[p.index()]);
        let (base, mut color) = colorize(node, parent_base, params);
        if node.depth > 0 {
            if let Some(f) = color_override {
                color = f(node, color);
            }
        }
        bases.push(base);
        display.push(color);
    }
    display
}
