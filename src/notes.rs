//! Speaker notes derived from lesson metadata.

use crate::model::{Document, UnitKind};
use serde::Serialize;
use std::fmt::Write as _;

const DEFAULT_NEW_CONCEPTS: u32 = 3;
const MAX_KEY_POINTS: usize = 5;

/// An anticipated learner question with a suggested answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QuestionAnswer {
    pub question: String,
    pub answer: String,
}

/// Presenter notes for one unit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SpeakerNotes {
    pub unit_id: String,
    pub timing_minutes: u32,
    pub key_points: Vec<String>,
    pub anticipated_qa: Vec<QuestionAnswer>,
    pub extension: Option<String>,
    pub remedial: Option<String>,
}

impl SpeakerNotes {
    /// Build notes for a unit of `doc`.
    ///
    /// Timing is half a minute per new concept (`new_concepts` metadata,
    /// default 3), rounded down. Key points come from
    /// `learning_objectives`; differentiation from
    /// `extension_for_advanced` and `remedial_for_struggling`.
    pub fn generate(unit_id: &str, kind: UnitKind, unit_title: &str, doc: &Document) -> Self {
        let new_concepts = doc
            .metadata
            .get_u32("new_concepts")
            .unwrap_or(DEFAULT_NEW_CONCEPTS);

        let mut key_points: Vec<String> = doc
            .metadata
            .get("learning_objectives")
            .map(|v| v.as_list())
            .unwrap_or_default()
            .into_iter()
            .filter(|p| !p.trim().is_empty())
            .take(MAX_KEY_POINTS)
            .collect();
        if key_points.is_empty() {
            key_points = vec![
                format!("Understand: {}", unit_title),
                "Answer student questions".to_string(),
                "Connect to prior knowledge".to_string(),
            ];
        }

        let text = |key: &str| {
            doc.metadata
                .get(key)
                .map(|v| v.to_string())
                .filter(|s| !s.trim().is_empty())
        };

        Self {
            unit_id: unit_id.to_string(),
            timing_minutes: new_concepts / 2,
            key_points,
            anticipated_qa: anticipated_qa(kind),
            extension: text("extension_for_advanced"),
            remedial: text("remedial_for_struggling"),
        }
    }

    /// "1 minute" / "2 minutes".
    pub fn timing(&self) -> String {
        let plural = if self.timing_minutes == 1 { "" } else { "s" };
        format!("{} minute{}", self.timing_minutes, plural)
    }

    /// Plain-text rendering for presenter view.
    pub fn format(&self) -> String {
        let mut out = format!("TIMING: {}\n\nKEY POINTS:\n", self.timing());
        for point in &self.key_points {
            let _ = writeln!(out, "  • {}", point);
        }

        if !self.anticipated_qa.is_empty() {
            out.push_str("\nANTICIPATED Q&A:\n");
            for qa in &self.anticipated_qa {
                let _ = writeln!(out, "  Q: {}", qa.question);
                let _ = writeln!(out, "  A: {}", qa.answer);
            }
        }

        if self.extension.is_some() || self.remedial.is_some() {
            out.push_str("\nDIFFERENTIATION:\n");
            if let Some(extension) = &self.extension {
                let _ = writeln!(out, "  Extension: {}", extension);
            }
            if let Some(remedial) = &self.remedial {
                let _ = writeln!(out, "  Remedial: {}", remedial);
            }
        }

        out.trim_end().to_string()
    }
}

fn anticipated_qa(kind: UnitKind) -> Vec<QuestionAnswer> {
    let (question, answer) = match kind {
        UnitKind::Concept => (
            "What's a real-world example of this?",
            "See the example units or the Try It sections for practical applications.",
        ),
        UnitKind::Process => (
            "What happens if I skip a step?",
            "Each step builds on the previous ones. Skipping may cause errors or incomplete results.",
        ),
        UnitKind::Example => (
            "Can I modify this code for my use case?",
            "Yes. Identify the key parameters and adjust them to your specific needs.",
        ),
        UnitKind::Prompt => (
            "What should I look for in the response?",
            "Check for correct structure, relevant details and a clear explanation.",
        ),
        UnitKind::Comparison => (
            "When should I use one option over the other?",
            "It depends on your requirements. Consider the factors shown in the table.",
        ),
        _ => return Vec::new(),
    };
    vec![QuestionAnswer {
        question: question.to_string(),
        answer: answer.to_string(),
    }]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::LessonParser;

    #[test]
    fn test_notes_from_metadata() {
        let doc = LessonParser::default().parse_str(
            "01-agents",
            "---\nnew_concepts: 5\nlearning_objectives: [Define agents, Compare agents]\nextension_for_advanced: Build a planner\n---\n## A\nx\n",
        );
        let notes = SpeakerNotes::generate("01-agents:s1", UnitKind::Process, "A", &doc);

        assert_eq!(notes.timing_minutes, 2);
        assert_eq!(notes.timing(), "2 minutes");
        assert_eq!(notes.key_points, vec!["Define agents", "Compare agents"]);
        assert_eq!(notes.anticipated_qa.len(), 1);
        assert_eq!(notes.extension.as_deref(), Some("Build a planner"));
        assert!(notes.remedial.is_none());

        let text = notes.format();
        assert!(text.starts_with("TIMING: 2 minutes"));
        assert!(text.contains("  • Compare agents"));
        assert!(text.contains("Q: What happens if I skip a step?"));
        assert!(text.contains("Extension: Build a planner"));
        assert!(!text.contains("Remedial"));
    }

    #[test]
    fn test_notes_defaults() {
        let doc = LessonParser::default().parse_str("x", "## Loops\nRepeat.\n");
        let notes = SpeakerNotes::generate("x:title", UnitKind::Title, "Loops", &doc);
        assert_eq!(notes.timing(), "1 minute");
        assert_eq!(notes.key_points[0], "Understand: Loops");
        assert!(notes.anticipated_qa.is_empty());
        assert!(!notes.format().contains("ANTICIPATED"));
    }
}
