//! Per-layer color palettes used by frame templates.

use super::Context;
use crate::model::Layer;
use serde::{Deserialize, Serialize};

/// Accent colors for one category tag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Palette {
    pub primary: String,
    pub dark: String,
    pub light: String,
    pub name: String,
}

impl Palette {
    pub fn new(primary: &str, dark: &str, light: &str, name: &str) -> Self {
        Self {
            primary: primary.to_string(),
            dark: dark.to_string(),
            light: light.to_string(),
            name: name.to_string(),
        }
    }

    /// Built-in palette of a layer.
    pub fn for_layer(layer: Layer) -> Self {
        match layer {
            Layer::L1 => Self::new("#4472C4", "#2E5C9A", "#8FAADC", "Blue"),
            Layer::L2 => Self::new("#70AD47", "#548235", "#A9D18E", "Green"),
            Layer::L3 => Self::new("#9B59B6", "#7D3C98", "#D2B4DE", "Purple"),
            Layer::L4 => Self::new("#ED7D31", "#C65911", "#F4B084", "Orange"),
        }
    }

    /// Frame variables derived from the palette.
    pub fn context(&self) -> Context {
        Context::new()
            .with("accent_color", self.primary.as_str())
            .with("accent_bg", self.primary.as_str())
            .with("accent_border", self.primary.as_str())
            .with("accent_dark", self.dark.as_str())
            .with("accent_light", self.light.as_str())
            .with("layer_name", self.name.as_str())
    }
}
