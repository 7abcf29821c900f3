//! # lessonkit
//!
//! Turns batches of structured lesson documents into learning artifacts
//! (slide decks, question-set plans).
//!
//! Each document is parsed into metadata and sections, classified by its
//! dominant content type, and rendered unit by unit through two-level
//! HTML templates. A distribution table per content type decides the
//! target mix of unit types for the batch.
//!
//! ## Quick Start
//!
//! ```no_run
//! use lessonkit::{export, generate_from_dir, JsonFormat};
//!
//! fn main() -> lessonkit::Result<()> {
//!     let output = generate_from_dir("chapter-02")?;
//!     println!(
//!         "{} units, label {} ({:.1}%)",
//!         output.manifest.unit_count, output.manifest.label, output.manifest.confidence
//!     );
//!
//!     let json = export::to_json(&output, JsonFormat::Pretty)?;
//!     std::fs::write("deck.json", json)?;
//!     Ok(())
//! }
//! ```
//!
//! ## Features
//!
//! - **Heuristic classification**: weighted structural and lexical indicators
//! - **Conserving allocation**: fixed slots, proportional shares, remainder redistribution
//! - **Two-level templates**: scalar tokens, repeated blocks over lists and records
//! - **Partial failure**: unreadable documents and broken units become diagnostics
//! - **Parallel processing**: uses Rayon across documents
//! - **Speaker notes and validation** of the generated sequence

pub mod classify;
pub mod config;
pub mod distribution;
pub mod error;
pub mod export;
pub mod model;
pub mod notes;
pub mod parser;
pub mod pipeline;
pub mod render;
pub mod validate;

// Re-export commonly used types
pub use classify::{Classification, Classifier, ClassifierConfig, DocumentClassification};
pub use config::Config;
pub use distribution::{
    allocate, Allocation, AllocatorConfig, Distribution, DistributionTables, RecommendConfig,
    Recommendation, Slot, TableFamily,
};
pub use error::{Error, Result};
pub use export::JsonFormat;
pub use model::{
    Category, ContentKind, Document, Layer, MetaValue, Metadata, Provenance, RenderedUnit,
    Scores, Section, UnitKind,
};
pub use notes::SpeakerNotes;
pub use parser::{LessonParser, ParseOptions, RawDocument};
pub use pipeline::{
    Analysis, Diagnostic, GenerationOutput, Manifest, Pipeline, PipelineOptions, Severity, Stage,
};
pub use render::{Context, Element, Palette, Scalar, TemplateEngine, TemplateSet, Value};
pub use validate::{ValidationOptions, ValidationReport, Validator};

use std::path::{Path, PathBuf};

/// Parse lesson text into a document.
///
/// # Example
///
/// ```
/// let doc = lessonkit::parse_text("01-intro", "# Intro\n\n## What is a Loop?\nRepetition.");
/// assert_eq!(doc.title, "Intro");
/// assert_eq!(doc.sections.len(), 1);
/// ```
pub fn parse_text(id: &str, text: &str) -> Document {
    LessonParser::default().parse_str(id, text)
}

/// Read and parse a lesson file; the id is the file stem.
pub fn parse_file<P: AsRef<Path>>(path: P) -> Result<Document> {
    LessonParser::default().parse(&RawDocument::from_path(path))
}

/// Classify a set of lesson texts given as `(id, text)` pairs.
///
/// # Example
///
/// ```
/// use lessonkit::{classify_texts, Category};
///
/// let lesson = "## Example\n```rust\nfn main() {}\n```\nCall `main` via `cargo run`.";
/// let classification = classify_texts(&[("01-hello", lesson)])?;
/// assert_eq!(classification.label, Category::Coding);
/// # Ok::<(), lessonkit::Error>(())
/// ```
pub fn classify_texts(texts: &[(&str, &str)]) -> Result<Classification> {
    let parser = LessonParser::default();
    let classifier = Classifier::new(ClassifierConfig::default())?;
    let documents: Vec<DocumentClassification> = texts
        .iter()
        .map(|(id, text)| classifier.classify(&parser.parse_str(id, text)))
        .collect();
    Ok(classifier.classify_set(&documents))
}

/// Run the default pipeline over raw documents.
pub fn generate(inputs: &[RawDocument]) -> Result<GenerationOutput> {
    Ok(Pipeline::builtin(PipelineOptions::default())?.run(inputs))
}

/// Run the default pipeline over the `*.md` files of a directory.
///
/// # Example
///
/// ```no_run
/// let output = lessonkit::generate_from_dir("chapter-02").unwrap();
/// for unit in &output.units {
///     println!("{:>3}/{} {}", unit.index, unit.total, unit.id);
/// }
/// ```
pub fn generate_from_dir<P: AsRef<Path>>(dir: P) -> Result<GenerationOutput> {
    generate(&parser::load_dir(dir)?)
}

/// Builder for configuring and running the generation pipeline.
///
/// # Example
///
/// ```no_run
/// use lessonkit::{JsonFormat, Lessonkit};
///
/// let json = Lessonkit::new()
///     .with_template_dir("templates")
///     .with_speaker_notes()
///     .sequential()
///     .run_dir("chapter-02")?
///     .to_json(JsonFormat::Pretty)?;
/// # Ok::<(), lessonkit::Error>(())
/// ```
pub struct Lessonkit {
    config: Config,
    template_dir: Option<PathBuf>,
    options: PipelineOptions,
}

impl Lessonkit {
    /// Create a new builder with the default configuration.
    pub fn new() -> Self {
        Self {
            config: Config::default(),
            template_dir: None,
            options: PipelineOptions::default(),
        }
    }

    /// Use a custom configuration.
    pub fn with_config(mut self, config: Config) -> Self {
        self.config = config;
        self
    }

    /// Overlay templates from a directory onto the built-in set.
    pub fn with_template_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.template_dir = Some(dir.into());
        self
    }

    /// Attach speaker notes to every unit.
    pub fn with_speaker_notes(mut self) -> Self {
        self.options = self.options.with_speaker_notes(true);
        self
    }

    /// Set the planning total instead of estimating it.
    pub fn with_target_total(mut self, total: usize) -> Self {
        self.options = self.options.with_target_total(total);
        self
    }

    /// Set parse options.
    pub fn with_parse_options(mut self, options: ParseOptions) -> Self {
        self.options = self.options.with_parse_options(options);
        self
    }

    /// Stop reporting unresolved placeholders.
    pub fn quiet_placeholders(mut self) -> Self {
        self.options = self.options.with_unresolved_reporting(false);
        self
    }

    /// Disable parallel processing.
    pub fn sequential(mut self) -> Self {
        self.options = self.options.sequential();
        self
    }

    /// Build the pipeline, loading templates and validating configuration.
    pub fn build(self) -> Result<Pipeline> {
        let templates = match &self.template_dir {
            Some(dir) => TemplateSet::from_dir(dir)?,
            None => TemplateSet::builtin(),
        };
        Pipeline::new(self.config, templates, self.options)
    }

    /// Run over raw documents.
    pub fn run(self, inputs: &[RawDocument]) -> Result<LessonkitResult> {
        let pipeline = self.build()?;
        let output = pipeline.run(inputs);
        Ok(LessonkitResult { output })
    }

    /// Run over the `*.md` files of a directory.
    pub fn run_dir<P: AsRef<Path>>(self, dir: P) -> Result<LessonkitResult> {
        let inputs = parser::load_dir(dir)?;
        self.run(&inputs)
    }
}

impl Default for Lessonkit {
    fn default() -> Self {
        Self::new()
    }
}

/// Result of a pipeline run.
pub struct LessonkitResult {
    /// Units and manifest
    pub output: GenerationOutput,
}

impl LessonkitResult {
    pub fn units(&self) -> &[RenderedUnit] {
        &self.output.units
    }

    pub fn manifest(&self) -> &Manifest {
        &self.output.manifest
    }

    /// Convert to JSON.
    pub fn to_json(&self, format: JsonFormat) -> Result<String> {
        export::to_json(&self.output, format)
    }

    /// Concatenated HTML deck.
    pub fn to_html(&self) -> String {
        export::to_html(&self.output)
    }

    /// Validate against the planned unit count.
    pub fn validate(&self) -> ValidationReport {
        let options =
            ValidationOptions::new().with_expected_count(self.output.manifest.planned.total());
        Validator::new(options).validate(&self.output.units)
    }

    /// Write units, manifest and deck into `dir`.
    pub fn write<P: AsRef<Path>>(&self, dir: P, format: JsonFormat) -> Result<Vec<PathBuf>> {
        export::write_output(dir, &self.output, format)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lessonkit_builder() {
        let builder = Lessonkit::new()
            .with_speaker_notes()
            .with_target_total(30)
            .quiet_placeholders()
            .sequential();

        assert!(builder.options.speaker_notes);
        assert_eq!(builder.options.target_total, Some(30));
        assert!(!builder.options.report_unresolved);
        assert!(!builder.options.parallel);
    }

    #[test]
    fn test_lessonkit_builder_default() {
        let builder = Lessonkit::default();
        assert!(builder.options.parallel);
        assert!(builder.template_dir.is_none());
    }

    #[test]
    fn test_missing_template_dir_fails_build() {
        let result = Lessonkit::new().with_template_dir("/definitely/not/here").build();
        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[test]
    fn test_run_and_validate() {
        let result = Lessonkit::new()
            .sequential()
            .with_target_total(3)
            .run(&[RawDocument::from_text("01-a", "# A\n\n## What is X?\nX is a thing.\n")])
            .unwrap();

        assert_eq!(result.units().len(), 3);
        assert_eq!(result.manifest().unit_count, 3);
        let report = result.validate();
        assert!(report.passed());
        assert!(report.warnings().next().is_none(), "{:?}", report.findings);
    }

    #[test]
    fn test_classify_texts_empty() {
        let classification = classify_texts(&[]).unwrap();
        assert_eq!(classification.label, Category::Mixed);
        assert_eq!(classification.confidence, 0.0);
    }

    #[test]
    fn test_generate_from_missing_dir() {
        assert!(generate_from_dir("/definitely/not/here").is_err());
    }
}
