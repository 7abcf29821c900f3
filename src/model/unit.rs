//! Output unit types.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Closed set of slide unit types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnitKind {
    Title,
    Hook,
    Concept,
    Comparison,
    Process,
    Example,
    Decision,
    Evidence,
    Business,
    Prompt,
    Summary,
    Assessment,
}

impl UnitKind {
    /// All unit kinds in deck order.
    pub const ALL: [UnitKind; 12] = [
        UnitKind::Title,
        UnitKind::Hook,
        UnitKind::Concept,
        UnitKind::Comparison,
        UnitKind::Process,
        UnitKind::Example,
        UnitKind::Decision,
        UnitKind::Evidence,
        UnitKind::Business,
        UnitKind::Prompt,
        UnitKind::Summary,
        UnitKind::Assessment,
    ];

    /// Template/distribution key for this kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            UnitKind::Title => "title",
            UnitKind::Hook => "hook",
            UnitKind::Concept => "concept",
            UnitKind::Comparison => "comparison",
            UnitKind::Process => "process",
            UnitKind::Example => "example",
            UnitKind::Decision => "decision",
            UnitKind::Evidence => "evidence",
            UnitKind::Business => "business",
            UnitKind::Prompt => "prompt",
            UnitKind::Summary => "summary",
            UnitKind::Assessment => "assessment",
        }
    }

    /// Human-readable name.
    pub fn display_name(&self) -> &'static str {
        match self {
            UnitKind::Title => "Title",
            UnitKind::Hook => "Hook",
            UnitKind::Concept => "Concept",
            UnitKind::Comparison => "Comparison",
            UnitKind::Process => "Process",
            UnitKind::Example => "Example",
            UnitKind::Decision => "Decision",
            UnitKind::Evidence => "Evidence",
            UnitKind::Business => "Business",
            UnitKind::Prompt => "Try It",
            UnitKind::Summary => "Summary",
            UnitKind::Assessment => "Assessment",
        }
    }
}

impl fmt::Display for UnitKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for UnitKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim().to_lowercase().replace('-', "_");
        if key == "try_with_ai" {
            return Ok(UnitKind::Prompt);
        }
        Self::ALL
            .into_iter()
            .find(|k| k.as_str() == key)
            .ok_or_else(|| format!("unknown unit type: {}", s))
    }
}

/// Where a unit came from.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Provenance {
    pub document_id: String,
    pub title: String,
    pub layer: String,
    pub lesson_number: u32,
    pub chapter_number: u32,
}

/// Final rendered output for one unit.
///
/// `index` and `total` are zero until the orchestrator's stamping pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderedUnit {
    /// Stable identifier, e.g. `01-intro:s2`
    pub id: String,

    /// Unit type
    pub kind: UnitKind,

    /// Frame tag the unit was rendered with
    pub category_tag: String,

    /// Rendered markup
    pub content: String,

    /// 1-based position in the final sequence
    pub index: usize,

    /// Total number of units in the sequence
    pub total: usize,

    /// Originating document
    pub provenance: Provenance,

    /// Speaker notes, when generated
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl RenderedUnit {
    /// Create an unstamped unit.
    pub fn new(
        id: impl Into<String>,
        kind: UnitKind,
        category_tag: impl Into<String>,
        content: String,
        provenance: Provenance,
    ) -> Self {
        Self {
            id: id.into(),
            kind,
            category_tag: category_tag.into(),
            content,
            index: 0,
            total: 0,
            provenance,
            notes: None,
        }
    }

    /// Whether the stamping pass has run.
    pub fn is_stamped(&self) -> bool {
        self.index > 0 && self.total >= self.index
    }
}
