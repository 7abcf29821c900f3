//! Pedagogical layers (L1 foundation through L4 capstone).

use super::Metadata;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Pedagogical layer of a lesson. The layer code doubles as the frame
/// (category) tag when rendering units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Layer {
    /// Manual foundation
    #[default]
    L1,
    /// Collaboration
    L2,
    /// Intelligence
    L3,
    /// Technical capstone
    L4,
}

impl Layer {
    pub const ALL: [Layer; 4] = [Layer::L1, Layer::L2, Layer::L3, Layer::L4];

    /// Short code, e.g. "L1".
    pub fn code(&self) -> &'static str {
        match self {
            Layer::L1 => "L1",
            Layer::L2 => "L2",
            Layer::L3 => "L3",
            Layer::L4 => "L4",
        }
    }

    /// Parse a layer code ("L3", case-insensitive).
    pub fn from_code(code: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|l| l.code().eq_ignore_ascii_case(code.trim()))
    }

    /// Layer number (1-4).
    pub fn number(&self) -> u8 {
        match self {
            Layer::L1 => 1,
            Layer::L2 => 2,
            Layer::L3 => 3,
            Layer::L4 => 4,
        }
    }

    /// Whether this is the foundational layer.
    pub fn is_foundational(&self) -> bool {
        matches!(self, Layer::L1)
    }

    /// Metadata flag that marks a lesson as belonging to this layer.
    fn flag_key(&self) -> &'static str {
        match self {
            Layer::L1 => "layer_1_foundation",
            Layer::L2 => "layer_2_collaboration",
            Layer::L3 => "layer_3_intelligence",
            Layer::L4 => "layer_4_capstone",
        }
    }

    /// Read the layer declared in a metadata record.
    ///
    /// Checks `primary_layer` ("Layer 2: Collaboration") first, then the
    /// per-layer boolean flags. Returns `None` when nothing is declared.
    pub fn from_metadata(metadata: &Metadata) -> Option<Self> {
        if let Some(primary) = metadata.get("primary_layer") {
            let primary = primary.to_string().to_lowercase();
            if let Some(layer) = Self::ALL
                .into_iter()
                .find(|l| primary.contains(&format!("layer {}", l.number())))
            {
                return Some(layer);
            }
            if let Some(layer) = Self::from_code(&primary) {
                return Some(layer);
            }
        }

        Self::ALL.into_iter().find(|l| {
            metadata
                .get(l.flag_key())
                .map(|v| v.is_truthy())
                .unwrap_or(false)
        })
    }
}

impl fmt::Display for Layer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}
