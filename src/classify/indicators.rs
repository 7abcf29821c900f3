//! Structural and lexical indicators measured on a lesson body.

use super::ClassifierConfig;
use crate::error::{Error, Result};
use regex::Regex;
use serde::Serialize;

/// Raw indicator counts for one document (or summed over a set).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Indicators {
    pub code_blocks: usize,
    pub inline_code: usize,
    pub table_rows: usize,
    pub numbered_items: usize,
    pub prompt_headings: usize,
    pub how_to_headings: usize,
    pub keyword_hits: usize,
    pub word_count: usize,
    /// Document explicitly declares the foundational layer
    pub foundational: bool,
}

impl Indicators {
    /// Inline code spans per word.
    pub fn code_density(&self) -> f64 {
        self.inline_code as f64 / self.word_count.max(1) as f64
    }

    /// Named values, in a fixed order, for reporting.
    pub fn entries(&self) -> Vec<(&'static str, f64)> {
        vec![
            ("code_blocks", self.code_blocks as f64),
            ("inline_code", self.inline_code as f64),
            ("table_rows", self.table_rows as f64),
            ("numbered_items", self.numbered_items as f64),
            ("prompt_headings", self.prompt_headings as f64),
            ("how_to_headings", self.how_to_headings as f64),
            ("keyword_hits", self.keyword_hits as f64),
            ("word_count", self.word_count as f64),
            ("code_density", self.code_density()),
            ("foundational", if self.foundational { 1.0 } else { 0.0 }),
        ]
    }

    /// Add another document's counts into this one.
    pub fn accumulate(&mut self, other: &Indicators) {
        self.code_blocks += other.code_blocks;
        self.inline_code += other.inline_code;
        self.table_rows += other.table_rows;
        self.numbered_items += other.numbered_items;
        self.prompt_headings += other.prompt_headings;
        self.how_to_headings += other.how_to_headings;
        self.keyword_hits += other.keyword_hits;
        self.word_count += other.word_count;
        self.foundational |= other.foundational;
    }
}

/// Compiled indicator patterns.
pub struct IndicatorPatterns {
    code_block: Regex,
    inline_code: Regex,
    table_row: Regex,
    numbered_item: Regex,
    prompt_heading: Regex,
    how_to_heading: Regex,
    keyword: Option<Regex>,
}

impl IndicatorPatterns {
    /// Compile the patterns for a classifier configuration.
    ///
    /// Fails with [`Error::Config`] when a configured heading pattern is
    /// not a valid regular expression.
    pub fn new(config: &ClassifierConfig) -> Result<Self> {
        let keyword = if config.vocabulary.is_empty() {
            None
        } else {
            let words: Vec<String> = config
                .vocabulary
                .iter()
                .map(|w| regex::escape(w.trim()))
                .filter(|w| !w.is_empty())
                .collect();
            Some(compile(&format!(r"(?i)\b(?:{})s?\b", words.join("|")))?)
        };

        Ok(Self {
            code_block: Regex::new(r"(?s)```.*?```").expect("static pattern"),
            inline_code: Regex::new(r"`[^`\n]+`").expect("static pattern"),
            table_row: Regex::new(r"(?m)^\|[\s\-\w]+\|").expect("static pattern"),
            numbered_item: Regex::new(r"(?m)^\d+\.\s+").expect("static pattern"),
            prompt_heading: compile(&config.prompt_heading_pattern)?,
            how_to_heading: compile(&config.how_to_heading_pattern)?,
            keyword,
        })
    }

    /// Measure a document body.
    pub fn measure(&self, body: &str, foundational: bool) -> Indicators {
        let without_fences = self.code_block.replace_all(body, "\n");

        Indicators {
            code_blocks: self.code_block.find_iter(body).count(),
            inline_code: self.inline_code.find_iter(&without_fences).count(),
            table_rows: self.table_row.find_iter(body).count(),
            numbered_items: self.numbered_item.find_iter(body).count(),
            prompt_headings: self.prompt_heading.find_iter(body).count(),
            how_to_headings: self.how_to_heading.find_iter(body).count(),
            keyword_hits: self
                .keyword
                .as_ref()
                .map_or(0, |re| re.find_iter(body).count()),
            word_count: body.split_whitespace().count(),
            foundational,
        }
    }
}

fn compile(pattern: &str) -> Result<Regex> {
    Regex::new(pattern).map_err(|e| Error::Config(format!("invalid pattern '{}': {}", pattern, e)))
}
