//! Section types.

use super::UnitKind;
use serde::{Deserialize, Serialize};

/// A second-level section of a lesson.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Section {
    /// Heading text (without the `##` marker)
    pub heading: String,

    /// Body text up to the next section heading
    pub body: String,

    /// Structural content type
    pub kind: ContentKind,

    /// Suggested unit type for rendering
    pub hint: UnitKind,
}

impl Section {
    /// Create a section with an explicit content type and hint.
    pub fn new(
        heading: impl Into<String>,
        body: impl Into<String>,
        kind: ContentKind,
        hint: UnitKind,
    ) -> Self {
        Self {
            heading: heading.into(),
            body: body.into(),
            kind,
            hint,
        }
    }

    /// Check if the section has no body text.
    pub fn is_empty(&self) -> bool {
        self.body.trim().is_empty()
    }
}

/// Closed set of structural content types, in detection priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContentKind {
    /// Markdown table
    Table,
    /// Fenced code block
    Code,
    /// Numbered list
    List,
    /// Interactive prompt section
    Prompt,
    /// Plain prose
    Text,
}

impl ContentKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ContentKind::Table => "table",
            ContentKind::Code => "code",
            ContentKind::List => "list",
            ContentKind::Prompt => "prompt",
            ContentKind::Text => "text",
        }
    }
}
