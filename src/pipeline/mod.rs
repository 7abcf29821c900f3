//! Pipeline orchestration.
//!
//! A run moves every document through load → parse → classify, labels
//! the set, plans an allocation, generates units per document and finally
//! stamps running indices. Per-document and per-unit failures become
//! [`Diagnostic`]s; only configuration errors abort construction.

mod manifest;
mod stage;
mod units;

pub use manifest::{Diagnostic, GenerationOutput, Manifest, ManifestEntry, Severity, Stage};
pub use stage::StageOutcome;
pub use units::{escape_html, UnitContexts};

use crate::classify::{Classification, Classifier, DocumentClassification};
use crate::config::Config;
use crate::distribution::{allocate, Allocation, TableFamily};
use crate::error::Result;
use crate::model::{Document, RenderedUnit, UnitKind};
use crate::notes::SpeakerNotes;
use crate::parser::{LessonParser, ParseOptions, RawDocument};
use crate::render::template::token;
use crate::render::{Context, TemplateEngine, TemplateSet};
use chrono::Utc;
use rayon::prelude::*;

/// Tokens resolved by the stamping pass rather than by rendering.
const STAMP_TOKENS: [&str; 2] = ["unit_index", "unit_total"];

/// Options controlling a pipeline run.
#[derive(Debug, Clone)]
pub struct PipelineOptions {
    /// Process documents on the rayon thread pool
    pub parallel: bool,

    /// Attach speaker notes to every unit
    pub speaker_notes: bool,

    /// Planning total; estimated from word count when unset
    pub target_total: Option<usize>,

    /// Record unresolved placeholders as info diagnostics
    pub report_unresolved: bool,

    /// Options passed to the lesson parser
    pub parse: ParseOptions,
}

impl PipelineOptions {
    /// Create new pipeline options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Process documents on the calling thread only.
    pub fn sequential(mut self) -> Self {
        self.parallel = false;
        self
    }

    pub fn with_speaker_notes(mut self, enabled: bool) -> Self {
        self.speaker_notes = enabled;
        self
    }

    pub fn with_target_total(mut self, total: usize) -> Self {
        self.target_total = Some(total);
        self
    }

    pub fn with_unresolved_reporting(mut self, enabled: bool) -> Self {
        self.report_unresolved = enabled;
        self
    }

    pub fn with_parse_options(mut self, parse: ParseOptions) -> Self {
        self.parse = parse;
        self
    }
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self {
            parallel: true,
            speaker_notes: false,
            target_total: None,
            report_unresolved: true,
            parse: ParseOptions::default(),
        }
    }
}

/// Parsed and classified documents of a run.
#[derive(Debug, Clone)]
pub struct Analysis {
    /// Documents that were read and parsed, in input order
    pub documents: Vec<Document>,
    /// Per-document classifications, parallel to `documents`
    pub classifications: Vec<DocumentClassification>,
    /// Aggregate classification of the set
    pub classification: Classification,
    /// Inputs that could not be loaded
    pub skipped: usize,
    pub diagnostics: Vec<Diagnostic>,
}

/// The generation pipeline.
///
/// Holds immutable configuration only; one pipeline can run any number
/// of batches.
pub struct Pipeline {
    config: Config,
    options: PipelineOptions,
    parser: LessonParser,
    classifier: Classifier,
    engine: TemplateEngine,
    contexts: UnitContexts,
    setup: Vec<Diagnostic>,
}

impl Pipeline {
    /// Build a pipeline, validating the configuration.
    ///
    /// Fails on invalid distribution tables or classifier settings.
    /// Share-sum warnings are kept and reported with every run.
    pub fn new(config: Config, templates: TemplateSet, options: PipelineOptions) -> Result<Self> {
        let warnings = config.tables.validate(&config.allocator)?;
        let classifier = Classifier::new(config.classifier.clone())?;
        let setup = warnings
            .into_iter()
            .map(|w| Diagnostic::warning(Stage::Plan, "", w))
            .collect();

        Ok(Self {
            parser: LessonParser::new(options.parse.clone()),
            classifier,
            engine: TemplateEngine::new(templates),
            contexts: UnitContexts::new(),
            config,
            options,
            setup,
        })
    }

    /// Pipeline with the default configuration and built-in templates.
    pub fn builtin(options: PipelineOptions) -> Result<Self> {
        Self::new(Config::default(), TemplateSet::builtin(), options)
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn options(&self) -> &PipelineOptions {
        &self.options
    }

    pub fn classifier(&self) -> &Classifier {
        &self.classifier
    }

    pub fn engine(&self) -> &TemplateEngine {
        &self.engine
    }

    /// Load, parse and classify a batch without generating units.
    pub fn analyze(&self, inputs: &[RawDocument]) -> Analysis {
        let mut diagnostics = self.setup.clone();
        let outcomes = self.map_ordered(inputs, |raw| self.prepare(raw));

        let mut documents = Vec::with_capacity(outcomes.len());
        let mut classifications = Vec::with_capacity(outcomes.len());
        let mut skipped = 0;
        for outcome in outcomes {
            match outcome {
                StageOutcome::Done((doc, classification)) => {
                    if classification.degenerate {
                        diagnostics.push(Diagnostic::info(
                            Stage::Classify,
                            &doc.id,
                            "no indicators found, used the fallback split",
                        ));
                    }
                    documents.push(doc);
                    classifications.push(classification);
                }
                StageOutcome::Skipped(diagnostic) => {
                    skipped += 1;
                    diagnostics.push(diagnostic);
                }
            }
        }

        let classification = self.classifier.classify_set(&classifications);
        log::debug!(
            "aggregate label {} ({:.1}) over {} documents",
            classification.label,
            classification.confidence,
            classification.document_count
        );

        Analysis {
            documents,
            classifications,
            classification,
            skipped,
            diagnostics,
        }
    }

    /// Run the full pipeline over a batch.
    ///
    /// Always returns whatever units were produced; every skip, fallback
    /// and failure is listed in the manifest's diagnostics.
    pub fn run(&self, inputs: &[RawDocument]) -> GenerationOutput {
        let Analysis {
            documents,
            classification,
            skipped,
            mut diagnostics,
            ..
        } = self.analyze(inputs);

        let planned = self.plan(&classification, &documents, &mut diagnostics);

        let generated = self.map_ordered(&documents, |doc| self.generate(doc));
        let mut units = Vec::new();
        for (doc_units, doc_diagnostics) in generated {
            units.extend(doc_units);
            diagnostics.extend(doc_diagnostics);
        }

        stamp(&mut units);

        let manifest = Manifest {
            generated_at: Utc::now(),
            document_count: documents.len(),
            skipped_documents: skipped,
            unit_count: units.len(),
            label: classification.label,
            confidence: classification.rounded_confidence(),
            scores: classification.scores.rounded(),
            indicator_totals: classification.totals,
            foundational_documents: classification.foundational_documents,
            planned,
            produced: manifest::produced_mix(&units),
            entries: units.iter().map(ManifestEntry::from).collect(),
            diagnostics,
        };

        GenerationOutput { units, manifest }
    }

    fn map_ordered<T, U, F>(&self, items: &[T], f: F) -> Vec<U>
    where
        T: Sync,
        U: Send,
        F: Fn(&T) -> U + Sync + Send,
    {
        if self.options.parallel {
            items.par_iter().map(f).collect()
        } else {
            items.iter().map(f).collect()
        }
    }

    fn prepare(&self, raw: &RawDocument) -> StageOutcome<(Document, DocumentClassification)> {
        StageOutcome::from_result(raw.read(), Stage::Load, &raw.id)
            .map(|text| self.parser.parse_str(&raw.id, &text))
            .map(|doc| {
                let classification = self.classifier.classify(&doc);
                (doc, classification)
            })
    }

    fn plan(
        &self,
        classification: &Classification,
        documents: &[Document],
        diagnostics: &mut Vec<Diagnostic>,
    ) -> Allocation {
        let label = classification.label.as_str();
        let selection = match self.config.tables.select(TableFamily::Slides, label) {
            Ok(selection) => selection,
            Err(err) => {
                diagnostics.push(Diagnostic::error(Stage::Plan, label, err.to_string()));
                return Allocation::default();
            }
        };
        if let Some(warning) = &selection.warning {
            diagnostics.push(Diagnostic::warning(Stage::Plan, label, warning));
        }

        let words: usize = documents.iter().map(Document::word_count).sum();
        let total = self
            .options
            .target_total
            .unwrap_or_else(|| self.config.recommend.estimate_unit_count(words))
            .max(selection.distribution.fixed_count());

        match allocate(total, selection.distribution) {
            Ok(allocation) => {
                log::debug!("planned {} units over the {} slide table", total, selection.category);
                allocation
            }
            Err(err) => {
                log::warn!("planning failed: {}", err);
                diagnostics.push(Diagnostic::error(Stage::Plan, label, err.to_string()));
                Allocation::default()
            }
        }
    }

    /// Title, one unit per non-empty section, summary.
    fn generate(&self, doc: &Document) -> (Vec<RenderedUnit>, Vec<Diagnostic>) {
        let mut units = Vec::new();
        let mut diagnostics = Vec::new();
        let mut emit = |id: String, kind: UnitKind, title: &str, ctx: Context| {
            if let Some(unit) = self.render_unit(doc, id, kind, title, &ctx, &mut diagnostics) {
                units.push(unit);
            }
        };

        emit(
            format!("{}:title", doc.id),
            UnitKind::Title,
            &doc.title,
            self.contexts.title(doc),
        );
        for (i, section) in doc.sections.iter().enumerate() {
            if section.is_empty() {
                log::debug!("skipping empty section '{}' in '{}'", section.heading, doc.id);
                continue;
            }
            emit(
                format!("{}:s{}", doc.id, i + 1),
                section.hint,
                &section.heading,
                self.contexts.section(doc, section),
            );
        }
        emit(
            format!("{}:summary", doc.id),
            UnitKind::Summary,
            &doc.title,
            self.contexts.summary(doc),
        );

        (units, diagnostics)
    }

    fn render_unit(
        &self,
        doc: &Document,
        id: String,
        kind: UnitKind,
        title: &str,
        ctx: &Context,
        diagnostics: &mut Vec<Diagnostic>,
    ) -> Option<RenderedUnit> {
        let tag = doc.layer().code();
        let rendition = match self.engine.render(kind.as_str(), tag, ctx) {
            Ok(rendition) => rendition,
            Err(err) => {
                log::warn!("dropping unit '{}': {}", id, err);
                diagnostics.push(Diagnostic::error(Stage::Generate, id, err.to_string()));
                return None;
            }
        };

        for fallback in [&rendition.unit_fallback, &rendition.frame_fallback]
            .into_iter()
            .flatten()
        {
            diagnostics.push(Diagnostic::warning(Stage::Generate, &id, fallback));
        }
        if self.options.report_unresolved {
            let names: Vec<&str> = rendition
                .unresolved
                .iter()
                .map(String::as_str)
                .filter(|name| !STAMP_TOKENS.contains(name))
                .collect();
            if !names.is_empty() {
                diagnostics.push(Diagnostic::info(
                    Stage::Generate,
                    &id,
                    format!("unresolved placeholders: {}", names.join(", ")),
                ));
            }
        }

        let mut unit = RenderedUnit::new(id, kind, tag, rendition.text, doc.provenance());
        if self.options.speaker_notes {
            unit.notes = Some(SpeakerNotes::generate(&unit.id, kind, title, doc).format());
        }
        Some(unit)
    }
}

/// Assign 1-based indices and the final total, resolving the stamping
/// tokens left in rendered text.
fn stamp(units: &mut [RenderedUnit]) {
    let total = units.len();
    let index_token = token(STAMP_TOKENS[0]);
    let total_token = token(STAMP_TOKENS[1]);
    for (i, unit) in units.iter_mut().enumerate() {
        unit.index = i + 1;
        unit.total = total;
        unit.content = unit
            .content
            .replace(&index_token, &unit.index.to_string())
            .replace(&total_token, &total.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Category;

    const CODING: &str = "---
title: Loops in Python
chapter: 2
---
# Loops in Python

Loops repeat work.

## Example

```python
for i in range(3):
    print(i)
```

```python
while True:
    break
```

Use `range`, `print`, `while` and `break` to iterate.

## Empty

## How to Write a Loop

1. Pick a sequence
2. Write the body
";

    fn sequential() -> Pipeline {
        Pipeline::builtin(PipelineOptions::new().sequential()).unwrap()
    }

    #[test]
    fn test_run_orders_title_sections_summary() {
        let output = sequential().run(&[RawDocument::from_text("02-loops", CODING)]);
        let ids: Vec<&str> = output.units.iter().map(|u| u.id.as_str()).collect();
        assert_eq!(
            ids,
            vec!["02-loops:title", "02-loops:s1", "02-loops:s3", "02-loops:summary"]
        );
        assert_eq!(output.units[1].kind, UnitKind::Example);
        assert_eq!(output.units[2].kind, UnitKind::Process);
    }

    #[test]
    fn test_stamping() {
        let output = sequential().run(&[
            RawDocument::from_text("01-a", "## A\nText one.\n"),
            RawDocument::from_text("02-b", "## B\nText two.\n"),
        ]);
        assert_eq!(output.units.len(), 6);
        for (i, unit) in output.units.iter().enumerate() {
            assert_eq!(unit.index, i + 1);
            assert_eq!(unit.total, 6);
            assert!(unit.is_stamped());
            assert!(!unit.content.contains("{{unit_index}}"));
            assert!(!unit.content.contains("{{unit_total}}"));
        }
        assert!(output.units[5].content.contains("6 / 6"));
    }

    #[test]
    fn test_unreadable_document_is_skipped() {
        let output = sequential().run(&[
            RawDocument::from_text("01-ok", "## A\nFine.\n"),
            RawDocument::from_bytes("02-bad", vec![0xFF, 0xFE]),
        ]);
        let manifest = &output.manifest;
        assert_eq!(manifest.document_count, 1);
        assert_eq!(manifest.skipped_documents, 1);
        assert!(output.units.iter().all(|u| u.provenance.document_id == "01-ok"));

        let errors: Vec<&Diagnostic> = manifest.diagnostics_at(Severity::Error).collect();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].stage, Stage::Load);
        assert_eq!(errors[0].subject, "02-bad");
    }

    #[test]
    fn test_missing_template_drops_only_that_unit() {
        let templates = TemplateSet::empty()
            .with_frame("L1", "<div>{{SLIDE_CONTENT}}</div>")
            .with_unit("title", "<h1>{{slide_title}}</h1>")
            .with_unit("summary", "<p>{{summary_title}}</p>");
        let pipeline = Pipeline::new(
            Config::default(),
            templates,
            PipelineOptions::new().sequential(),
        )
        .unwrap();

        let output = pipeline.run(&[RawDocument::from_text("a", "# T\n\n## Idea\nText.\n")]);
        let kinds: Vec<UnitKind> = output.units.iter().map(|u| u.kind).collect();
        assert_eq!(kinds, vec![UnitKind::Title, UnitKind::Summary]);
        assert_eq!(output.units[0].content, "<div><h1>T</h1></div>");

        let error = output.manifest.diagnostics_at(Severity::Error).next().unwrap();
        assert_eq!(error.subject, "a:s1");
        assert_eq!(error.stage, Stage::Generate);
    }

    #[test]
    fn test_unresolved_placeholders_reported() {
        let templates = TemplateSet::empty()
            .with_frame("L1", "{{SLIDE_CONTENT}} {{unit_index}}")
            .with_unit("concept", "{{missing}}");
        let pipeline = Pipeline::new(
            Config::default(),
            templates,
            PipelineOptions::new().sequential(),
        )
        .unwrap();

        let output = pipeline.run(&[RawDocument::from_text("a", "## Idea\nText.\n")]);
        // title and summary fall back to the concept template
        assert_eq!(output.units.len(), 3);
        assert_eq!(output.units[0].content, "{{missing}} 1");

        let infos: Vec<&Diagnostic> = output
            .manifest
            .diagnostics_at(Severity::Info)
            .filter(|d| d.stage == Stage::Generate)
            .collect();
        assert_eq!(infos.len(), 3);
        assert!(infos[0].message.contains("missing"));
        assert!(!infos[0].message.contains("unit_index"));
        assert_eq!(output.manifest.diagnostics_at(Severity::Warning).count(), 2);
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let inputs: Vec<RawDocument> = (1..=6)
            .map(|i| RawDocument::from_text(format!("{:02}-doc", i), CODING))
            .collect();
        let parallel = Pipeline::builtin(PipelineOptions::new()).unwrap().run(&inputs);
        let sequential = sequential().run(&inputs);

        assert_eq!(parallel.units, sequential.units);
        assert_eq!(parallel.manifest.diagnostics, sequential.manifest.diagnostics);
    }

    #[test]
    fn test_manifest_statistics() {
        let output = Pipeline::builtin(PipelineOptions::new().sequential().with_target_total(20))
            .unwrap()
            .run(&[RawDocument::from_text("02-loops", CODING)]);
        let manifest = &output.manifest;

        assert_eq!(manifest.label, Category::Coding);
        assert_eq!(manifest.unit_count, 4);
        assert_eq!(manifest.entries.len(), 4);
        assert_eq!(manifest.planned.total(), 20);
        assert_eq!(manifest.planned.get("title"), 1);
        assert_eq!(manifest.produced.get("example"), 1);
        assert_eq!(manifest.produced.total(), 4);
        assert_eq!(manifest.indicator_totals.code_blocks, 2);
    }

    #[test]
    fn test_empty_batch() {
        let output = sequential().run(&[]);
        assert!(output.units.is_empty());
        assert_eq!(output.manifest.label, Category::Mixed);
        assert_eq!(output.manifest.confidence, 0.0);
        assert_eq!(output.manifest.planned.total(), 2);
    }

    #[test]
    fn test_speaker_notes_attached() {
        let pipeline =
            Pipeline::builtin(PipelineOptions::new().sequential().with_speaker_notes(true)).unwrap();
        let output = pipeline.run(&[RawDocument::from_text("a", "## Idea\nText.\n")]);
        let notes = output.units[0].notes.as_deref().unwrap();
        assert!(notes.starts_with("TIMING: 1 minute"));
    }

    #[test]
    fn test_degenerate_document_noted() {
        let analysis = sequential().analyze(&[RawDocument::from_text("plain", "Nothing here.")]);
        assert_eq!(analysis.classification.label, Category::Mixed);
        assert!(analysis
            .diagnostics
            .iter()
            .any(|d| d.stage == Stage::Classify && d.subject == "plain"));
    }

    #[test]
    fn test_prose_how_to_section_keeps_body() {
        let output = sequential().run(&[RawDocument::from_text(
            "agents",
            "## How to Think About Agents\nAgents observe, decide and act in a loop.\n",
        )]);
        let unit = &output.units[1];
        assert_eq!(unit.kind, UnitKind::Process);
        assert!(unit.content.contains("<li>Agents observe, decide and act in a loop</li>"));
        assert!(!unit.content.contains("<ol></ol>"));
    }
}
