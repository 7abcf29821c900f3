//! Run manifest and diagnostics.

use crate::classify::Indicators;
use crate::distribution::Allocation;
use crate::model::{Category, Provenance, RenderedUnit, Scores, UnitKind};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt;

/// Diagnostic severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Warning,
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Severity::Info => "info",
            Severity::Warning => "warning",
            Severity::Error => "error",
        })
    }
}

/// Pipeline stage a diagnostic was raised in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Stage {
    Load,
    Parse,
    Classify,
    Aggregate,
    Plan,
    Generate,
    Stamp,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Stage::Load => "load",
            Stage::Parse => "parse",
            Stage::Classify => "classify",
            Stage::Aggregate => "aggregate",
            Stage::Plan => "plan",
            Stage::Generate => "generate",
            Stage::Stamp => "stamp",
        })
    }
}

/// One skip, fallback or failure recorded during a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    pub severity: Severity,
    pub stage: Stage,
    /// Document or unit id the diagnostic is about (empty for run-level)
    pub subject: String,
    pub message: String,
}

impl Diagnostic {
    pub fn new(
        severity: Severity,
        stage: Stage,
        subject: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            severity,
            stage,
            subject: subject.into(),
            message: message.into(),
        }
    }

    pub fn info(stage: Stage, subject: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(Severity::Info, stage, subject, message)
    }

    pub fn warning(stage: Stage, subject: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(Severity::Warning, stage, subject, message)
    }

    pub fn error(stage: Stage, subject: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(Severity::Error, stage, subject, message)
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.subject.is_empty() {
            write!(f, "[{}] {}: {}", self.severity, self.stage, self.message)
        } else {
            write!(
                f,
                "[{}] {} '{}': {}",
                self.severity, self.stage, self.subject, self.message
            )
        }
    }
}

/// Manifest line for one produced unit.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ManifestEntry {
    pub id: String,
    pub kind: UnitKind,
    pub category_tag: String,
    pub index: usize,
    pub provenance: Provenance,
}

impl From<&RenderedUnit> for ManifestEntry {
    fn from(unit: &RenderedUnit) -> Self {
        Self {
            id: unit.id.clone(),
            kind: unit.kind,
            category_tag: unit.category_tag.clone(),
            index: unit.index,
            provenance: unit.provenance.clone(),
        }
    }
}

/// Summary of a generation run.
#[derive(Debug, Clone, Serialize)]
pub struct Manifest {
    pub generated_at: DateTime<Utc>,
    /// Documents that were parsed and contributed units
    pub document_count: usize,
    /// Documents excluded from the run
    pub skipped_documents: usize,
    pub unit_count: usize,
    pub label: Category,
    pub confidence: f64,
    pub scores: Scores,
    pub indicator_totals: Indicators,
    pub foundational_documents: usize,
    /// Allocation of the planning total over the selected table
    pub planned: Allocation,
    /// Units actually produced per unit type
    pub produced: Allocation,
    pub entries: Vec<ManifestEntry>,
    pub diagnostics: Vec<Diagnostic>,
}

impl Manifest {
    /// Diagnostics at `severity`.
    pub fn diagnostics_at(&self, severity: Severity) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics.iter().filter(move |d| d.severity == severity)
    }

    pub fn has_errors(&self) -> bool {
        self.diagnostics_at(Severity::Error).next().is_some()
    }
}

/// Everything a run produced.
#[derive(Debug, Clone, Serialize)]
pub struct GenerationOutput {
    pub units: Vec<RenderedUnit>,
    pub manifest: Manifest,
}

/// Count produced units per kind, in deck order, omitting absent kinds.
pub(crate) fn produced_mix(units: &[RenderedUnit]) -> Allocation {
    UnitKind::ALL
        .into_iter()
        .map(|kind| {
            let n = units.iter().filter(|u| u.kind == kind).count();
            (kind.as_str().to_string(), n)
        })
        .filter(|(_, n)| *n > 0)
        .collect()
}
