//! Lesson document parser.

use crate::error::Result;
use crate::model::{ContentKind, Document, Section, UnitKind};
use regex::Regex;
use unicode_normalization::UnicodeNormalization;

use super::frontmatter::split_frontmatter;
use super::{ParseOptions, RawDocument};

/// Parses lesson text into a [`Document`].
///
/// Parsing is a pure function of the input text: the only failure mode
/// is an unreadable source, reported by [`LessonParser::parse`].
pub struct LessonParser {
    options: ParseOptions,
    table_regex: Regex,
    numbered_regex: Regex,
}

impl LessonParser {
    /// Create a parser with the given options.
    pub fn new(options: ParseOptions) -> Self {
        Self {
            options,
            table_regex: Regex::new(r"\|.*\|.*\|").expect("static pattern"),
            numbered_regex: Regex::new(r"(?m)^\d+\.\s+").expect("static pattern"),
        }
    }

    /// Parser options in effect.
    pub fn options(&self) -> &ParseOptions {
        &self.options
    }

    /// Read and parse a raw document.
    pub fn parse(&self, raw: &RawDocument) -> Result<Document> {
        let text = raw.read()?;
        Ok(self.parse_str(&raw.id, &text))
    }

    /// Parse already-decoded text.
    pub fn parse_str(&self, id: &str, text: &str) -> Document {
        let text = self.normalize(text);
        let (metadata, body) = split_frontmatter(&text);

        let mut doc = Document::new(id);
        doc.body = body.to_string();

        let mut preamble: Vec<&str> = Vec::new();
        let mut h1_title: Option<String> = None;
        let mut current: Option<(String, Vec<&str>)> = None;
        let mut raw_sections: Vec<(String, Vec<&str>)> = Vec::new();
        let mut in_fence = false;

        for line in body.lines() {
            if is_fence(line) {
                in_fence = !in_fence;
            }
            let fenced = in_fence && self.options.fence_aware;

            if !fenced {
                if let Some(heading) = h2_heading(line) {
                    if let Some(section) = current.take() {
                        raw_sections.push(section);
                    }
                    current = Some((heading.to_string(), Vec::new()));
                    continue;
                }
            }

            match current.as_mut() {
                Some((_, lines)) => lines.push(line),
                None => {
                    if h1_title.is_none() && !fenced {
                        if let Some(title) = line.strip_prefix("# ") {
                            h1_title = Some(title.trim().to_string());
                        }
                    }
                    preamble.push(line);
                }
            }
        }
        if let Some(section) = current.take() {
            raw_sections.push(section);
        }

        doc.title = metadata
            .get("title")
            .map(|v| v.to_string())
            .filter(|t| !t.trim().is_empty())
            .or(h1_title)
            .unwrap_or_else(|| id.to_string());
        doc.opening = opening_paragraph(&preamble);
        doc.sections = raw_sections
            .into_iter()
            .map(|(heading, lines)| self.build_section(heading, lines.join("\n").trim()))
            .collect();
        doc.metadata = metadata;

        log::debug!(
            "parsed '{}': {} sections, {} metadata keys",
            doc.id,
            doc.sections.len(),
            doc.metadata.len()
        );
        doc
    }

    fn normalize(&self, text: &str) -> String {
        let text = text.replace("\r\n", "\n");
        if self.options.normalize_unicode {
            text.nfc().collect()
        } else {
            text
        }
    }

    fn build_section(&self, heading: String, body: &str) -> Section {
        let kind = self.content_kind(&heading, body);
        let hint = unit_hint(&heading, kind);
        Section::new(heading, body, kind, hint)
    }

    /// Classify section content: table, then code, then numbered list,
    /// then prompt heading, else plain text.
    pub fn content_kind(&self, heading: &str, body: &str) -> ContentKind {
        let content = format!("{}\n{}", heading, body);
        if self.table_regex.is_match(&content) {
            ContentKind::Table
        } else if content.contains("```") {
            ContentKind::Code
        } else if self.numbered_regex.is_match(&content) {
            ContentKind::List
        } else if collapse_whitespace(heading)
            .to_lowercase()
            .contains(&self.options.prompt_marker)
        {
            ContentKind::Prompt
        } else {
            ContentKind::Text
        }
    }
}

impl Default for LessonParser {
    fn default() -> Self {
        Self::new(ParseOptions::default())
    }
}

/// Derive the unit-type hint from the content type and heading keywords.
pub fn unit_hint(heading: &str, kind: ContentKind) -> UnitKind {
    match kind {
        ContentKind::Table => return UnitKind::Comparison,
        ContentKind::Code => return UnitKind::Example,
        ContentKind::Prompt => return UnitKind::Prompt,
        ContentKind::List | ContentKind::Text => {}
    }

    let lower = heading.to_lowercase();
    let words: Vec<&str> = lower
        .split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
        .collect();
    let has_stem = |stems: &[&str]| words.iter().any(|w| stems.iter().any(|s| w.starts_with(s)));

    if lower.contains("how to") || has_stem(&["step"]) {
        UnitKind::Process
    } else if lower.contains("what is") || has_stem(&["definition"]) {
        UnitKind::Concept
    } else if lower.contains("when to") || words.contains(&"use") {
        UnitKind::Decision
    } else if has_stem(&["roi", "business", "value", "strateg", "benefit"]) {
        UnitKind::Business
    } else if has_stem(&["data", "research", "stud", "evidence", "stat"]) {
        UnitKind::Evidence
    } else if kind == ContentKind::List {
        UnitKind::Process
    } else {
        UnitKind::Concept
    }
}

/// Runs of whitespace become a single space.
fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn is_fence(line: &str) -> bool {
    line.trim_start().starts_with("```")
}

fn h2_heading(line: &str) -> Option<&str> {
    let rest = line.strip_prefix("##")?;
    if !rest.starts_with([' ', '\t']) {
        return None;
    }
    let heading = rest.trim();
    (!heading.is_empty()).then_some(heading)
}

/// First paragraph of the text before the first section, headings excluded.
fn opening_paragraph(preamble: &[&str]) -> Option<String> {
    let paragraph: Vec<&str> = preamble
        .iter()
        .map(|l| l.trim())
        .filter(|l| !l.starts_with('#'))
        .skip_while(|l| l.is_empty())
        .take_while(|l| !l.is_empty())
        .collect();

    (!paragraph.is_empty()).then(|| paragraph.join("\n"))
}
