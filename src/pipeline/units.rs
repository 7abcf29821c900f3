//! Render contexts for title, section and summary units.

use crate::model::{ContentKind, Document, Section, UnitKind};
use crate::render::Context;
use regex::Regex;

const MAX_POINTS: usize = 5;
const CODE_FALLBACK_CHARS: usize = 500;
const PROMPT_FALLBACK_CHARS: usize = 200;
const DEFINITION_FALLBACK_CHARS: usize = 300;
const CONTEXT_CHARS: usize = 200;

/// Builds render contexts from parsed lessons.
pub struct UnitContexts {
    code_block: Regex,
    bullet: Regex,
    numbered: Regex,
    prompt: Regex,
    learning_goal: Regex,
}

impl UnitContexts {
    pub fn new() -> Self {
        Self {
            code_block: Regex::new(r"(?s)```([\w+#-]*)[^\n]*\n(.*?)\n?```").expect("static pattern"),
            bullet: Regex::new(r"(?m)^\s*[•\-\*]\s+(.+)$").expect("static pattern"),
            numbered: Regex::new(r"(?m)^\s*\d+\.\s+(.+)$").expect("static pattern"),
            prompt: Regex::new(r"(?s)> (.*?)(?:\n\n|$)").expect("static pattern"),
            learning_goal: Regex::new(r"(?i)(?:What you're learning|Learning goal)[:\s]+([^\n]*)")
                .expect("static pattern"),
        }
    }

    /// Variables shared by every unit of a document.
    pub fn base(&self, doc: &Document) -> Context {
        Context::new()
            .with("lesson_title", escape_html(&doc.title))
            .with("chapter_number", doc.chapter_number())
            .with("lesson_number", doc.lesson_number())
            .with("proficiency_level", escape_html(&doc.proficiency_level()))
            .with("duration_minutes", doc.duration_minutes())
            .with("layer", doc.layer().code())
    }

    /// Title unit context.
    pub fn title(&self, doc: &Document) -> Context {
        let opening: Vec<String> = doc.opening.iter().map(|o| escape_html(o)).collect();
        self.base(doc)
            .with("slide_title", escape_html(&doc.title))
            .with(
                "chapter_context",
                format!(
                    "Chapter {}, Lesson {}",
                    doc.chapter_number(),
                    doc.lesson_number()
                ),
            )
            .with("opening", opening)
    }

    /// Section unit context; the fields depend on the section's hint.
    pub fn section(&self, doc: &Document, section: &Section) -> Context {
        let heading = escape_html(&section.heading);
        let mut ctx = self
            .base(doc)
            .with("slide_title", heading.as_str())
            .with("section_title", heading.as_str());

        let body = section.body.as_str();
        match section.hint {
            UnitKind::Comparison => {
                let (headers, rows) = parse_table(body);
                ctx.insert("headers", headers);
                ctx.insert("rows", rows);
            }
            UnitKind::Example => {
                let (language, code) = self.code_block(body);
                ctx.insert("code_language", escape_html(&language));
                ctx.insert("code_text", escape_html(&code));
                ctx.insert("explanation", escape_all(explanation(body)));
            }
            UnitKind::Prompt => {
                ctx.insert("prompt_text", escape_html(&self.prompt_text(body)));
                ctx.insert("learning_explanation", escape_html(&self.learning_goal(body)));
            }
            UnitKind::Process if section.kind == ContentKind::List => {
                ctx.insert("steps", escape_all(self.steps(body)));
            }
            _ => {
                let key_points = self.key_points(body);
                let mut steps = self.steps(body);
                // prose under a "how to" heading: its sentences become the steps
                if steps.is_empty() && section.hint == UnitKind::Process {
                    steps = key_points.clone();
                }
                ctx.insert("definition_text", escape_html(&definition(body)));
                ctx.insert("key_points", escape_all(key_points));
                ctx.insert("additional_context", escape_html(&additional_context(body)));
                ctx.insert("steps", escape_all(steps));
            }
        }
        ctx
    }

    /// Summary unit context: learning objectives, else section headings.
    pub fn summary(&self, doc: &Document) -> Context {
        self.base(doc)
            .with("slide_title", format!("{} - Summary", escape_html(&doc.title)))
            .with("summary_title", "Key Takeaways")
            .with("key_takeaways", escape_all(takeaways(doc)))
    }

    /// Language tag and code of the first fenced block, else the first
    /// characters of the body.
    pub fn code_block(&self, body: &str) -> (String, String) {
        match self.code_block.captures(body) {
            Some(caps) => (
                caps.get(1).map_or("", |m| m.as_str()).to_string(),
                caps.get(2).map_or("", |m| m.as_str()).to_string(),
            ),
            None => (String::new(), truncate(body, CODE_FALLBACK_CHARS)),
        }
    }

    /// Quoted prompt text, else the first characters of the body.
    pub fn prompt_text(&self, body: &str) -> String {
        self.prompt
            .captures(body)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str().trim().to_string())
            .unwrap_or_else(|| truncate(body, PROMPT_FALLBACK_CHARS))
    }

    pub fn learning_goal(&self, body: &str) -> String {
        self.learning_goal
            .captures(body)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str().trim().to_string())
            .filter(|goal| !goal.is_empty())
            .unwrap_or_else(|| "Practice using AI with this prompt".to_string())
    }

    /// Bullet items, else the first sentences.
    pub fn key_points(&self, body: &str) -> Vec<String> {
        let bullets: Vec<String> = self
            .bullet
            .captures_iter(body)
            .filter_map(|caps| caps.get(1))
            .map(|m| m.as_str().trim().to_string())
            .take(MAX_POINTS)
            .collect();
        if !bullets.is_empty() {
            return bullets;
        }
        body.split('.')
            .take(MAX_POINTS)
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(String::from)
            .collect()
    }

    /// Numbered list items.
    pub fn steps(&self, body: &str) -> Vec<String> {
        self.numbered
            .captures_iter(body)
            .filter_map(|caps| caps.get(1))
            .map(|m| m.as_str().trim().to_string())
            .collect()
    }
}

impl Default for UnitContexts {
    fn default() -> Self {
        Self::new()
    }
}

/// Escape text for inclusion in HTML.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

fn escape_all(items: Vec<String>) -> Vec<String> {
    items.iter().map(|s| escape_html(s)).collect()
}

fn truncate(text: &str, max_chars: usize) -> String {
    text.chars().take(max_chars).collect()
}

/// Non-empty lines outside fence markers, at most five.
fn explanation(body: &str) -> Vec<String> {
    let mut in_fence = false;
    let mut points = Vec::new();
    for line in body.lines() {
        let trimmed = line.trim();
        if trimmed.starts_with("```") {
            in_fence = !in_fence;
            continue;
        }
        if in_fence || trimmed.is_empty() {
            continue;
        }
        points.push(trimmed.to_string());
        if points.len() == MAX_POINTS {
            break;
        }
    }
    points
}

/// First line that is neither a fence nor a table row.
fn definition(body: &str) -> String {
    body.lines()
        .map(str::trim)
        .find(|l| !l.is_empty() && !l.starts_with("```") && !l.starts_with('|'))
        .map(String::from)
        .unwrap_or_else(|| truncate(body, DEFINITION_FALLBACK_CHARS))
}

fn additional_context(body: &str) -> String {
    if body.chars().count() > CONTEXT_CHARS {
        format!("{}...", truncate(body, CONTEXT_CHARS))
    } else {
        body.to_string()
    }
}

/// Header cells and data rows of the first markdown table in `body`.
/// Separator rows (`|---|:--:|`) are dropped.
fn parse_table(body: &str) -> (Vec<String>, Vec<Context>) {
    let mut headers: Option<Vec<String>> = None;
    let mut rows = Vec::new();

    for line in body.lines().map(str::trim) {
        if !line.starts_with('|') {
            if headers.is_some() {
                break;
            }
            continue;
        }
        let cells: Vec<String> = line
            .trim_matches('|')
            .split('|')
            .map(|c| c.trim().to_string())
            .collect();
        let is_separator = cells
            .iter()
            .all(|c| !c.is_empty() && c.chars().all(|ch| matches!(ch, '-' | ':' | ' ')));
        if is_separator {
            continue;
        }
        let cells = escape_all(cells);
        match headers {
            None => headers = Some(cells),
            Some(_) => rows.push(Context::new().with("cells", cells)),
        }
    }

    (headers.unwrap_or_default(), rows)
}

fn takeaways(doc: &Document) -> Vec<String> {
    let objectives: Vec<String> = doc
        .metadata
        .get("learning_objectives")
        .map(|v| v.as_list())
        .unwrap_or_default()
        .into_iter()
        .filter(|o| !o.trim().is_empty())
        .take(MAX_POINTS)
        .collect();
    if !objectives.is_empty() {
        return objectives;
    }
    doc.sections
        .iter()
        .take(MAX_POINTS)
        .map(|s| s.heading.clone())
        .collect()
}
