//! Post-generation checks on a rendered unit sequence.
//!
//! Three groups of checks run over the final sequence: structure (count,
//! ordering, ids), accessibility (font sizes, image alt text, layer
//! colors) and consistency (layer tags, chapters).

use crate::model::{Layer, RenderedUnit, UnitKind};
use crate::pipeline::Severity;
use crate::render::Palette;
use regex::Regex;
use serde::Serialize;
use std::collections::{BTreeSet, HashSet};
use std::fmt;

/// Rendered text shorter than this is not expected to carry a layer color.
const COLOR_CHECK_MIN_LEN: usize = 500;

/// Check group a finding belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CheckCategory {
    Structure,
    Accessibility,
    Consistency,
}

impl fmt::Display for CheckCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            CheckCategory::Structure => "structure",
            CheckCategory::Accessibility => "accessibility",
            CheckCategory::Consistency => "consistency",
        })
    }
}

/// One validation finding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Finding {
    pub level: Severity,
    pub category: CheckCategory,
    pub message: String,
    /// Unit the finding is about, if any
    pub unit_id: Option<String>,
}

impl Finding {
    fn new(level: Severity, category: CheckCategory, message: impl Into<String>) -> Self {
        Self {
            level,
            category,
            message: message.into(),
            unit_id: None,
        }
    }

    fn on(mut self, unit_id: &str) -> Self {
        self.unit_id = Some(unit_id.to_string());
        self
    }
}

impl fmt::Display for Finding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.category, self.message)?;
        if let Some(id) = &self.unit_id {
            write!(f, " ({})", id)?;
        }
        Ok(())
    }
}

/// Findings of one validation run.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ValidationReport {
    pub findings: Vec<Finding>,
}

impl ValidationReport {
    /// No error-level findings.
    pub fn passed(&self) -> bool {
        self.errors().next().is_none()
    }

    pub fn errors(&self) -> impl Iterator<Item = &Finding> {
        self.at(Severity::Error)
    }

    pub fn warnings(&self) -> impl Iterator<Item = &Finding> {
        self.at(Severity::Warning)
    }

    pub fn at(&self, level: Severity) -> impl Iterator<Item = &Finding> {
        self.findings.iter().filter(move |f| f.level == level)
    }

    pub fn in_category(&self, category: CheckCategory) -> impl Iterator<Item = &Finding> {
        self.findings.iter().filter(move |f| f.category == category)
    }
}

/// Expectations to validate against.
#[derive(Debug, Clone)]
pub struct ValidationOptions {
    /// Estimated unit count; the count check is skipped when unset
    pub expected_count: Option<usize>,
    /// Relative deviation from `expected_count` tolerated before warning
    pub count_tolerance: f64,
    /// Chapter every unit should belong to
    pub expected_chapter: Option<u32>,
    /// Distinct layers tolerated before an info finding
    pub max_layers: usize,
}

impl ValidationOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_expected_count(mut self, count: usize) -> Self {
        self.expected_count = Some(count);
        self
    }

    pub fn with_expected_chapter(mut self, chapter: u32) -> Self {
        self.expected_chapter = Some(chapter);
        self
    }

    pub fn with_count_tolerance(mut self, tolerance: f64) -> Self {
        self.count_tolerance = tolerance;
        self
    }
}

impl Default for ValidationOptions {
    fn default() -> Self {
        Self {
            expected_count: None,
            count_tolerance: 0.2,
            expected_chapter: None,
            max_layers: 2,
        }
    }
}

/// Validates rendered unit sequences.
pub struct Validator {
    options: ValidationOptions,
    small_font: Regex,
    layer_colors: Vec<String>,
}

impl Validator {
    pub fn new(options: ValidationOptions) -> Self {
        Self {
            options,
            small_font: Regex::new(r"(?i)font-size:\s*[89]pt").expect("static pattern"),
            layer_colors: Layer::ALL
                .into_iter()
                .map(|layer| Palette::for_layer(layer).primary.to_lowercase())
                .collect(),
        }
    }

    /// Run every check over `units`.
    pub fn validate(&self, units: &[RenderedUnit]) -> ValidationReport {
        let mut findings = self.structure(units);
        if !units.is_empty() {
            findings.extend(self.accessibility(units));
            findings.extend(self.consistency(units));
        }
        log::debug!("validation produced {} findings", findings.len());
        ValidationReport { findings }
    }

    fn structure(&self, units: &[RenderedUnit]) -> Vec<Finding> {
        let mut findings = Vec::new();
        let (Some(first), Some(last)) = (units.first(), units.last()) else {
            findings.push(Finding::new(
                Severity::Error,
                CheckCategory::Structure,
                "no units generated",
            ));
            return findings;
        };

        if let Some(expected) = self.options.expected_count.filter(|&n| n > 0) {
            let variance = (units.len() as f64 - expected as f64).abs() / expected as f64;
            if variance > self.options.count_tolerance {
                findings.push(Finding::new(
                    Severity::Warning,
                    CheckCategory::Structure,
                    format!(
                        "unit count ({}) differs from estimate ({}) by {:.0}%",
                        units.len(),
                        expected,
                        variance * 100.0
                    ),
                ));
            }
        }

        if first.kind != UnitKind::Title {
            findings.push(
                Finding::new(
                    Severity::Warning,
                    CheckCategory::Structure,
                    "first unit should be a title unit",
                )
                .on(&first.id),
            );
        }

        if !matches!(last.kind, UnitKind::Summary | UnitKind::Assessment) {
            findings.push(
                Finding::new(
                    Severity::Info,
                    CheckCategory::Structure,
                    format!("last unit is {}, ideally summary or assessment", last.kind.as_str()),
                )
                .on(&last.id),
            );
        }

        let mut seen = HashSet::new();
        let duplicates: BTreeSet<&str> = units
            .iter()
            .map(|u| u.id.as_str())
            .filter(|id| !seen.insert(*id))
            .collect();
        if !duplicates.is_empty() {
            let ids: Vec<&str> = duplicates.into_iter().collect();
            findings.push(Finding::new(
                Severity::Error,
                CheckCategory::Structure,
                format!("duplicate unit ids: {}", ids.join(", ")),
            ));
        }

        findings
    }

    fn accessibility(&self, units: &[RenderedUnit]) -> Vec<Finding> {
        let mut findings = Vec::new();
        for unit in units {
            let html = &unit.content;

            if self.small_font.is_match(html) {
                findings.push(
                    Finding::new(
                        Severity::Warning,
                        CheckCategory::Accessibility,
                        "very small font (8-9pt)",
                    )
                    .on(&unit.id),
                );
            }

            if html.len() > COLOR_CHECK_MIN_LEN {
                let lower = html.to_lowercase();
                if !self.layer_colors.iter().any(|c| lower.contains(c.as_str())) {
                    findings.push(
                        Finding::new(
                            Severity::Info,
                            CheckCategory::Accessibility,
                            "no layer color found",
                        )
                        .on(&unit.id),
                    );
                }
            }

            if html.contains("<img") && !html.contains("alt=") {
                findings.push(
                    Finding::new(
                        Severity::Warning,
                        CheckCategory::Accessibility,
                        "image without alt text",
                    )
                    .on(&unit.id),
                );
            }
        }
        findings
    }

    fn consistency(&self, units: &[RenderedUnit]) -> Vec<Finding> {
        let mut findings = Vec::new();
        let mut layers = BTreeSet::new();

        for unit in units {
            layers.insert(unit.category_tag.as_str());

            if Layer::from_code(&unit.category_tag).is_none() {
                findings.push(
                    Finding::new(
                        Severity::Warning,
                        CheckCategory::Consistency,
                        format!("unknown layer tag '{}'", unit.category_tag),
                    )
                    .on(&unit.id),
                );
            }

            if let Some(expected) = self.options.expected_chapter {
                let chapter = unit.provenance.chapter_number;
                if chapter != expected {
                    findings.push(
                        Finding::new(
                            Severity::Warning,
                            CheckCategory::Consistency,
                            format!("chapter mismatch: unit is chapter {}, expected {}", chapter, expected),
                        )
                        .on(&unit.id),
                    );
                }
            }
        }

        if layers.len() > self.options.max_layers {
            let found: Vec<&str> = layers.into_iter().collect();
            findings.push(Finding::new(
                Severity::Info,
                CheckCategory::Consistency,
                format!("{} layers found: {}", found.len(), found.join(", ")),
            ));
        }

        findings
    }
}

impl Default for Validator {
    fn default() -> Self {
        Self::new(ValidationOptions::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Provenance;

    fn unit(id: &str, kind: UnitKind, tag: &str, content: &str) -> RenderedUnit {
        RenderedUnit::new(id, kind, tag, content.to_string(), Provenance::default())
    }

    fn deck() -> Vec<RenderedUnit> {
        vec![
            unit("a:title", UnitKind::Title, "L1", "<h1>A</h1>"),
            unit("a:s1", UnitKind::Concept, "L1", "<p>idea</p>"),
            unit("a:summary", UnitKind::Summary, "L1", "<ul></ul>"),
        ]
    }

    #[test]
    fn test_clean_deck_passes() {
        let report = Validator::default().validate(&deck());
        assert!(report.passed());
        assert!(report.findings.is_empty(), "{:?}", report.findings);
    }

    #[test]
    fn test_empty_deck_fails() {
        let report = Validator::default().validate(&[]);
        assert!(!report.passed());
        assert_eq!(report.findings.len(), 1);
    }

    #[test]
    fn test_structure_checks() {
        let mut units = deck();
        units.swap(0, 2);
        units.push(unit("a:s1", UnitKind::Example, "L1", ""));

        let report = Validator::new(ValidationOptions::new().with_expected_count(10)).validate(&units);
        let messages: Vec<String> = report
            .in_category(CheckCategory::Structure)
            .map(|f| f.message.clone())
            .collect();

        assert!(messages.iter().any(|m| m.contains("differs from estimate (10) by 60%")));
        assert!(messages.iter().any(|m| m.contains("first unit")));
        assert!(messages.iter().any(|m| m.contains("last unit is example")));
        assert!(messages.iter().any(|m| m == "duplicate unit ids: a:s1"));
        assert!(!report.passed());
    }

    #[test]
    fn test_count_within_tolerance() {
        let report = Validator::new(ValidationOptions::new().with_expected_count(3)).validate(&deck());
        assert!(report.warnings().next().is_none());
    }

    #[test]
    fn test_accessibility_checks() {
        let mut units = deck();
        units[1].content = format!(
            "<p style=\"font-size: 9pt\">tiny</p><img src=\"x.png\">{}",
            "x".repeat(COLOR_CHECK_MIN_LEN)
        );
        units[2].content = format!("<div style=\"color: #4472c4\">{}</div>", "y".repeat(600));

        let report = Validator::default().validate(&units);
        let found: Vec<(Severity, &str)> = report
            .in_category(CheckCategory::Accessibility)
            .map(|f| (f.level, f.unit_id.as_deref().unwrap_or("")))
            .collect();
        assert_eq!(
            found,
            vec![
                (Severity::Warning, "a:s1"),
                (Severity::Info, "a:s1"),
                (Severity::Warning, "a:s1"),
            ]
        );
    }

    #[test]
    fn test_consistency_checks() {
        let mut units = deck();
        units[0].category_tag = "L2".into();
        units[1].category_tag = "L3".into();
        units[2].category_tag = "L9".into();
        units[2].provenance.chapter_number = 4;

        let report = Validator::new(ValidationOptions::new().with_expected_chapter(4)).validate(&units);
        let consistency: Vec<&Finding> = report.in_category(CheckCategory::Consistency).collect();

        assert!(consistency.iter().any(|f| f.message == "unknown layer tag 'L9'"));
        assert_eq!(
            consistency
                .iter()
                .filter(|f| f.message.starts_with("chapter mismatch"))
                .count(),
            2
        );
        assert!(consistency
            .iter()
            .any(|f| f.level == Severity::Info && f.message == "3 layers found: L2, L3, L9"));
    }
}
