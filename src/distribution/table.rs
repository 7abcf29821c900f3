//! Distribution tables: category label to per-unit-type allocation rules.

use super::AllocatorConfig;
use crate::error::{Error, Result};
use crate::model::Category;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt::Write as _;

/// Allocation rule for one unit type.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawSlot", into = "RawSlot")]
pub enum Slot {
    /// Exactly one unit, independent of scale
    Fixed,
    /// Fractional share of the allocatable budget
    Share(f64),
}

impl Slot {
    pub fn is_fixed(&self) -> bool {
        matches!(self, Slot::Fixed)
    }

    /// Share value, `None` for fixed slots.
    pub fn share(&self) -> Option<f64> {
        match self {
            Slot::Fixed => None,
            Slot::Share(s) => Some(*s),
        }
    }
}

/// Wire form: a number, or the string `"fixed"`.
#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum RawSlot {
    Share(f64),
    Marker(String),
}

impl TryFrom<RawSlot> for Slot {
    type Error = String;

    fn try_from(raw: RawSlot) -> std::result::Result<Self, Self::Error> {
        match raw {
            RawSlot::Share(s) => Ok(Slot::Share(s)),
            RawSlot::Marker(m) if m.eq_ignore_ascii_case("fixed") => Ok(Slot::Fixed),
            RawSlot::Marker(m) => Err(format!("expected a share or \"fixed\", got \"{}\"", m)),
        }
    }
}

impl From<Slot> for RawSlot {
    fn from(slot: Slot) -> Self {
        match slot {
            Slot::Fixed => RawSlot::Marker("fixed".to_string()),
            Slot::Share(s) => RawSlot::Share(s),
        }
    }
}

/// One named entry of a distribution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DistributionEntry {
    pub unit: String,
    pub slot: Slot,
}

/// Ordered mapping from unit-type name to slot.
///
/// Entry order is significant: it is the tie-break order for leftover
/// redistribution.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Distribution {
    entries: Vec<DistributionEntry>,
}

impl Distribution {
    /// Create an empty distribution.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a fixed slot.
    pub fn with_fixed(self, unit: impl Into<String>) -> Self {
        self.with_slot(unit, Slot::Fixed)
    }

    /// Append a proportional share.
    pub fn with_share(self, unit: impl Into<String>, share: f64) -> Self {
        self.with_slot(unit, Slot::Share(share))
    }

    /// Append or replace an entry.
    pub fn with_slot(mut self, unit: impl Into<String>, slot: Slot) -> Self {
        let unit = unit.into();
        match self.entries.iter_mut().find(|e| e.unit == unit) {
            Some(entry) => entry.slot = slot,
            None => self.entries.push(DistributionEntry { unit, slot }),
        }
        self
    }

    pub fn entries(&self) -> &[DistributionEntry] {
        &self.entries
    }

    pub fn get(&self, unit: &str) -> Option<Slot> {
        self.entries.iter().find(|e| e.unit == unit).map(|e| e.slot)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of fixed slots.
    pub fn fixed_count(&self) -> usize {
        self.entries.iter().filter(|e| e.slot.is_fixed()).count()
    }

    /// Sum of the non-fixed shares.
    pub fn share_sum(&self) -> f64 {
        self.entries.iter().filter_map(|e| e.slot.share()).sum()
    }

    /// Non-fixed entry with the largest positive share; first in table
    /// order on ties.
    pub fn largest_share(&self) -> Option<&str> {
        let mut best: Option<(&str, f64)> = None;
        for entry in &self.entries {
            if let Slot::Share(s) = entry.slot {
                if s > 0.0 && best.map_or(true, |(_, top)| s > top) {
                    best = Some((&entry.unit, s));
                }
            }
        }
        best.map(|(unit, _)| unit)
    }

    /// Check load-time invariants.
    ///
    /// Shares outside `[0, 1]` and more fixed slots than the configured
    /// ceiling are hard errors. A share sum outside the tolerance is only
    /// returned as a warning.
    pub fn validate(&self, config: &AllocatorConfig) -> Result<Vec<String>> {
        let mut warnings = Vec::new();

        for entry in &self.entries {
            if let Slot::Share(s) = entry.slot {
                if !(0.0..=1.0).contains(&s) {
                    return Err(Error::InvalidDistribution(format!(
                        "share for '{}' must be within [0, 1], got {}",
                        entry.unit, s
                    )));
                }
            }
        }

        let fixed = self.fixed_count();
        if fixed > config.fixed_ceiling {
            return Err(Error::InvalidDistribution(format!(
                "{} fixed slots exceed the ceiling of {}",
                fixed, config.fixed_ceiling
            )));
        }

        let sum = self.share_sum();
        if (sum - 1.0).abs() > config.share_tolerance + 1e-9 {
            warnings.push(format!(
                "non-fixed shares sum to {:.3}, expected 1.0 ± {}",
                sum, config.share_tolerance
            ));
        }

        Ok(warnings)
    }

    /// Human-readable listing, largest share first, fixed slots on top.
    pub fn describe(&self, title: &str) -> String {
        let mut sorted: Vec<&DistributionEntry> = self.entries.iter().collect();
        sorted.sort_by(|a, b| sort_key(b.slot).total_cmp(&sort_key(a.slot)));

        let mut out = format!("{}\n{}\n", title, "-".repeat(40));
        for entry in sorted {
            let _ = writeln!(out, "  {:<24}{}", entry.unit, format_slot(entry.slot));
        }
        out
    }
}

fn sort_key(slot: Slot) -> f64 {
    slot.share().unwrap_or(f64::INFINITY)
}

fn format_slot(slot: Slot) -> String {
    match slot {
        Slot::Fixed => "fixed".to_string(),
        Slot::Share(s) => format!("{:5.1}%", s * 100.0),
    }
}

/// Table family: slide decks or question sets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TableFamily {
    Slides,
    Questions,
}

impl TableFamily {
    pub fn as_str(&self) -> &'static str {
        match self {
            TableFamily::Slides => "slides",
            TableFamily::Questions => "questions",
        }
    }
}

/// Result of a table lookup by label.
#[derive(Debug, Clone)]
pub struct Selection<'a> {
    /// Category whose table was selected
    pub category: Category,
    pub distribution: &'a Distribution,
    /// Set when the requested label had no table and `mixed` was used
    pub warning: Option<String>,
}

/// All distribution tables, keyed by category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DistributionTables {
    pub slides: BTreeMap<Category, Distribution>,
    pub questions: BTreeMap<Category, Distribution>,
}

impl DistributionTables {
    /// Tables of one family.
    pub fn family(&self, family: TableFamily) -> &BTreeMap<Category, Distribution> {
        match family {
            TableFamily::Slides => &self.slides,
            TableFamily::Questions => &self.questions,
        }
    }

    /// Look up a table by label, falling back to `mixed`.
    ///
    /// Unknown labels never fail; the returned selection carries a
    /// warning instead. Fails only if the family has no `mixed` table.
    pub fn select(&self, family: TableFamily, label: &str) -> Result<Selection<'_>> {
        let tables = self.family(family);
        if let Ok(category) = label.parse::<Category>() {
            if let Some(distribution) = tables.get(&category) {
                return Ok(Selection {
                    category,
                    distribution,
                    warning: None,
                });
            }
        }

        let distribution = tables.get(&Category::Mixed).ok_or_else(|| {
            Error::InvalidDistribution(format!("no 'mixed' {} table", family.as_str()))
        })?;
        let warning = format!(
            "unknown category '{}' for {} table, using 'mixed'",
            label,
            family.as_str()
        );
        log::warn!("{}", warning);

        Ok(Selection {
            category: Category::Mixed,
            distribution,
            warning: Some(warning),
        })
    }

    /// Validate every table; a family without `mixed` is invalid.
    pub fn validate(&self, config: &AllocatorConfig) -> Result<Vec<String>> {
        let mut warnings = Vec::new();
        for family in [TableFamily::Slides, TableFamily::Questions] {
            let tables = self.family(family);
            if !tables.contains_key(&Category::Mixed) {
                return Err(Error::InvalidDistribution(format!(
                    "no 'mixed' {} table",
                    family.as_str()
                )));
            }
            for (category, table) in tables {
                for warning in table.validate(config)? {
                    warnings.push(format!("{} {}: {}", category, family.as_str(), warning));
                }
            }
        }
        for warning in &warnings {
            log::warn!("{}", warning);
        }
        Ok(warnings)
    }

    /// Describe one category's table.
    pub fn describe(&self, family: TableFamily, label: &str) -> Result<String> {
        let selection = self.select(family, label)?;
        let title = format!(
            "{} {} distribution",
            capitalize(selection.category.as_str()),
            family.as_str()
        );
        Ok(selection.distribution.describe(&title))
    }

    /// All categories side by side.
    pub fn compare(&self, family: TableFamily) -> String {
        let tables = self.family(family);
        let units: BTreeSet<&str> = tables
            .values()
            .flat_map(|d| d.entries().iter().map(|e| e.unit.as_str()))
            .collect();

        let mut out = format!("{} distribution comparison\n", capitalize(family.as_str()));
        let _ = write!(out, "{:<24}", "unit");
        for category in tables.keys() {
            let _ = write!(out, " {:>12}", category.as_str());
        }
        out.push('\n');
        out.push_str(&"-".repeat(24 + 13 * tables.len()));
        out.push('\n');

        for unit in units {
            let _ = write!(out, "{:<24}", unit);
            for table in tables.values() {
                let cell = table.get(unit).map_or("-".to_string(), format_slot);
                let _ = write!(out, " {:>12}", cell);
            }
            out.push('\n');
        }
        out
    }
}

impl Default for DistributionTables {
    fn default() -> Self {
        let slides = [
            (Category::Conceptual, [0.10, 0.40, 0.15, 0.05, 0.10, 0.05, 0.05, 0.05, 0.03, 0.01]),
            (Category::Procedural, [0.05, 0.20, 0.10, 0.25, 0.20, 0.05, 0.02, 0.02, 0.10, 0.01]),
            (Category::Coding, [0.02, 0.15, 0.10, 0.20, 0.30, 0.05, 0.01, 0.01, 0.15, 0.01]),
            (Category::Mixed, [0.08, 0.30, 0.12, 0.15, 0.18, 0.05, 0.03, 0.03, 0.05, 0.01]),
        ];
        let questions = [
            (Category::Conceptual, [12.0, 22.0, 10.0, 10.0, 5.0, 18.0, 10.0, 7.0, 6.0]),
            (Category::Procedural, [10.0, 12.0, 13.0, 13.0, 12.0, 12.0, 11.0, 8.0, 8.0]),
            (Category::Coding, [8.0, 10.0, 15.0, 15.0, 18.0, 8.0, 10.0, 7.0, 9.0]),
            (Category::Mixed, [10.0, 15.0, 12.5, 12.5, 10.0, 12.5, 10.0, 7.5, 10.0]),
        ];

        Self {
            slides: slides
                .into_iter()
                .map(|(category, shares)| (category, slide_table(shares)))
                .collect(),
            questions: questions
                .into_iter()
                .map(|(category, percents)| (category, question_table(percents)))
                .collect(),
        }
    }
}

const SLIDE_SHARE_UNITS: [&str; 10] = [
    "hook",
    "concept",
    "comparison",
    "process",
    "example",
    "decision",
    "evidence",
    "business",
    "prompt",
    "assessment",
];

/// Question types, in table order.
pub const QUESTION_TYPES: [&str; 9] = [
    "precision_recall",
    "conceptual_distinction",
    "decision_matrix",
    "architecture_analysis",
    "specification_design",
    "critical_evaluation",
    "strategic_synthesis",
    "research_extension",
    "economic_quantitative",
];

fn slide_table(shares: [f64; 10]) -> Distribution {
    let mut table = Distribution::new().with_fixed("title");
    for (unit, share) in SLIDE_SHARE_UNITS.iter().zip(shares) {
        if *unit == "assessment" {
            table = table.with_fixed("summary");
        }
        table = table.with_share(*unit, share);
    }
    table
}

fn question_table(percents: [f64; 9]) -> Distribution {
    QUESTION_TYPES
        .iter()
        .zip(percents)
        .fold(Distribution::new(), |table, (unit, pct)| {
            table.with_share(*unit, pct / 100.0)
        })
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
