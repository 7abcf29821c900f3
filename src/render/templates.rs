//! Unit and frame template sets.

use crate::error::{Error, Result};
use crate::model::{Layer, UnitKind};
use std::collections::BTreeMap;
use std::path::Path;

/// Default content placeholder in frame templates.
pub const CONTENT_TOKEN: &str = "SLIDE_CONTENT";

const TITLE: &str = r#"<section class="unit title">
<h1>{{slide_title}}</h1>
<p class="subtitle">{{chapter_context}}</p>
<p class="meta">{{duration_minutes}} min · Level {{proficiency_level}}</p>
{{#opening}}<p class="opening">{{.}}</p>{{/opening}}
</section>"#;

const HOOK: &str = r#"<section class="unit hook">
<h1>{{section_title}}</h1>
<blockquote>{{definition_text}}</blockquote>
</section>"#;

const CONCEPT: &str = r#"<section class="unit concept">
<h1>{{section_title}}</h1>
<p class="definition">{{definition_text}}</p>
<ul>{{#key_points}}<li>{{.}}</li>{{/key_points}}</ul>
<p class="context">{{additional_context}}</p>
</section>"#;

const COMPARISON: &str = r#"<section class="unit comparison">
<h1>{{section_title}}</h1>
<table>
<thead><tr>{{#headers}}<th>{{.}}</th>{{/headers}}</tr></thead>
<tbody>{{#rows}}<tr>{{#cells}}<td>{{.}}</td>{{/cells}}</tr>{{/rows}}</tbody>
</table>
</section>"#;

const PROCESS: &str = r#"<section class="unit process">
<h1>{{section_title}}</h1>
<ol>{{#steps}}<li>{{.}}</li>{{/steps}}</ol>
</section>"#;

const EXAMPLE: &str = r#"<section class="unit example">
<h1>{{section_title}}</h1>
<pre><code class="language-{{code_language}}">{{code_text}}</code></pre>
<ul>{{#explanation}}<li>{{.}}</li>{{/explanation}}</ul>
</section>"#;

const DECISION: &str = r#"<section class="unit decision">
<h1>{{section_title}}</h1>
<p class="question">{{definition_text}}</p>
<ul class="criteria">{{#key_points}}<li>{{.}}</li>{{/key_points}}</ul>
</section>"#;

const EVIDENCE: &str = r#"<section class="unit evidence">
<h1>{{section_title}}</h1>
<p class="finding">{{definition_text}}</p>
<ul>{{#key_points}}<li>{{.}}</li>{{/key_points}}</ul>
<p class="source">{{additional_context}}</p>
</section>"#;

const BUSINESS: &str = r#"<section class="unit business">
<h1>{{section_title}}</h1>
<p class="value">{{definition_text}}</p>
<ul>{{#key_points}}<li>{{.}}</li>{{/key_points}}</ul>
</section>"#;

const PROMPT: &str = r#"<section class="unit prompt">
<h1>{{section_title}}</h1>
<div class="prompt-box">{{prompt_text}}</div>
<p class="goal">{{learning_explanation}}</p>
</section>"#;

const SUMMARY: &str = r#"<section class="unit summary">
<h1>{{summary_title}}</h1>
<p class="subtitle">{{slide_title}}</p>
<ul>{{#key_takeaways}}<li>{{.}}</li>{{/key_takeaways}}</ul>
</section>"#;

const ASSESSMENT: &str = r#"<section class="unit assessment">
<h1>{{section_title}}</h1>
<p>{{definition_text}}</p>
<ol>{{#key_points}}<li>{{.}}</li>{{/key_points}}</ol>
</section>"#;

fn builtin_unit(kind: UnitKind) -> &'static str {
    match kind {
        UnitKind::Title => TITLE,
        UnitKind::Hook => HOOK,
        UnitKind::Concept => CONCEPT,
        UnitKind::Comparison => COMPARISON,
        UnitKind::Process => PROCESS,
        UnitKind::Example => EXAMPLE,
        UnitKind::Decision => DECISION,
        UnitKind::Evidence => EVIDENCE,
        UnitKind::Business => BUSINESS,
        UnitKind::Prompt => PROMPT,
        UnitKind::Summary => SUMMARY,
        UnitKind::Assessment => ASSESSMENT,
    }
}

fn builtin_frame(layer: Layer) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>{{{{slide_title}}}}</title>
<style>
body {{ width: 720pt; height: 405pt; margin: 0; font-family: Arial, sans-serif; }}
.accent-bar {{ background: {{{{accent_bg}}}}; height: 8pt; }}
.content {{ padding: 24pt 36pt; font-size: 16pt; }}
h1 {{ color: {{{{accent_dark}}}}; font-size: 28pt; }}
.prompt-box {{ border-left: 4pt solid {{{{accent_border}}}}; background: {{{{accent_light}}}}; padding: 8pt; }}
footer {{ border-top: 2pt solid {{{{accent_color}}}}; font-size: 11pt; padding: 4pt 36pt; }}
</style>
</head>
<body class="layer-{code}">
<div class="accent-bar"></div>
<div class="content">
{{{{{content}}}}}
</div>
<footer>Chapter {{{{chapter_number}}}} · Lesson {{{{lesson_number}}}} · {{{{layer_name}}}} · {{{{unit_index}}}} / {{{{unit_total}}}}</footer>
</body>
</html>
"#,
        code = layer.code(),
        content = CONTENT_TOKEN,
    )
}

/// Unit templates by unit type and frame templates by category tag.
#[derive(Debug, Clone)]
pub struct TemplateSet {
    units: BTreeMap<String, String>,
    frames: BTreeMap<String, String>,
    default_unit: String,
    default_frame: String,
    content_token: String,
}

impl TemplateSet {
    /// A set with no templates and the standard fallbacks.
    pub fn empty() -> Self {
        Self {
            units: BTreeMap::new(),
            frames: BTreeMap::new(),
            default_unit: UnitKind::Concept.as_str().to_string(),
            default_frame: Layer::L1.code().to_string(),
            content_token: CONTENT_TOKEN.to_string(),
        }
    }

    /// Built-in HTML templates: one unit template per unit type and one
    /// frame per layer.
    pub fn builtin() -> Self {
        let mut set = Self::empty();
        for kind in UnitKind::ALL {
            set.units
                .insert(kind.as_str().to_string(), builtin_unit(kind).to_string());
        }
        for layer in Layer::ALL {
            set.frames
                .insert(layer.code().to_string(), builtin_frame(layer));
        }
        set
    }

    /// Built-in templates overlaid with `units/*.html` and
    /// `frames/*.html` from `dir`.
    pub fn from_dir(dir: impl AsRef<Path>) -> Result<Self> {
        Self::builtin().load_dir(dir)
    }

    /// Overlay templates from a directory.
    ///
    /// Unit file stems may carry an ordering prefix (`03-concept.html`)
    /// and dashes (`10-try-with-ai.html`). Frame file stems are taken up
    /// to the first dash (`L2-green-master.html` is frame `L2`).
    pub fn load_dir(mut self, dir: impl AsRef<Path>) -> Result<Self> {
        let dir = dir.as_ref();
        if !dir.is_dir() {
            return Err(Error::Config(format!(
                "template directory not found: {}",
                dir.display()
            )));
        }

        for (name, text) in read_html_files(&dir.join("units"))? {
            let name = unit_name(&name);
            log::debug!("loaded unit template '{}'", name);
            self.units.insert(name, text);
        }
        for (name, text) in read_html_files(&dir.join("frames"))? {
            let name = name.split('-').next().unwrap_or(&name).to_string();
            log::debug!("loaded frame template '{}'", name);
            self.frames.insert(name, text);
        }
        Ok(self)
    }

    pub fn with_unit(mut self, name: impl Into<String>, template: impl Into<String>) -> Self {
        self.units.insert(name.into(), template.into());
        self
    }

    pub fn with_frame(mut self, tag: impl Into<String>, template: impl Into<String>) -> Self {
        self.frames.insert(tag.into(), template.into());
        self
    }

    /// Unit type used when the requested one has no template.
    pub fn with_default_unit(mut self, name: impl Into<String>) -> Self {
        self.default_unit = name.into();
        self
    }

    /// Category tag used when the requested one has no frame.
    pub fn with_default_frame(mut self, tag: impl Into<String>) -> Self {
        self.default_frame = tag.into();
        self
    }

    /// Placeholder name (without braces) the frame's content goes into.
    pub fn with_content_token(mut self, name: impl Into<String>) -> Self {
        self.content_token = name.into();
        self
    }

    pub fn unit(&self, name: &str) -> Option<&str> {
        self.units.get(name).map(String::as_str)
    }

    pub fn frame(&self, tag: &str) -> Option<&str> {
        self.frames.get(tag).map(String::as_str)
    }

    pub fn default_unit(&self) -> &str {
        &self.default_unit
    }

    pub fn default_frame(&self) -> &str {
        &self.default_frame
    }

    pub fn content_token(&self) -> &str {
        &self.content_token
    }

    pub fn unit_names(&self) -> impl Iterator<Item = &str> {
        self.units.keys().map(String::as_str)
    }

    pub fn frame_names(&self) -> impl Iterator<Item = &str> {
        self.frames.keys().map(String::as_str)
    }
}

impl Default for TemplateSet {
    fn default() -> Self {
        Self::builtin()
    }
}

fn unit_name(stem: &str) -> String {
    let trimmed = stem.trim_start_matches(|c: char| c.is_ascii_digit());
    let trimmed = trimmed.strip_prefix('-').unwrap_or(trimmed);
    let name = if trimmed.is_empty() { stem } else { trimmed };
    match name.parse::<UnitKind>() {
        Ok(kind) => kind.as_str().to_string(),
        Err(_) => name.replace('-', "_"),
    }
}

fn read_html_files(dir: &Path) -> Result<Vec<(String, String)>> {
    if !dir.is_dir() {
        log::debug!("no template directory at {}", dir.display());
        return Ok(Vec::new());
    }

    let mut files = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        if path.extension().and_then(|e| e.to_str()) != Some("html") {
            continue;
        }
        let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
            continue;
        };
        files.push((stem.to_string(), std::fs::read_to_string(&path)?));
    }
    files.sort();
    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_builtin_set() {
        let set = TemplateSet::builtin();
        assert_eq!(set.unit_names().count(), 12);
        assert_eq!(set.frame_names().collect::<Vec<_>>(), vec!["L1", "L2", "L3", "L4"]);
        assert_eq!(set.default_unit(), "concept");
        assert_eq!(set.default_frame(), "L1");

        let frame = set.frame("L3").unwrap();
        assert!(frame.contains("{{SLIDE_CONTENT}}"));
        assert!(frame.contains("{{accent_color}}"));
        assert!(frame.contains("layer-L3"));
        assert!(!frame.contains("{{{"));
    }

    #[test]
    fn test_unit_name_normalization() {
        assert_eq!(unit_name("03-concept"), "concept");
        assert_eq!(unit_name("10-try-with-ai"), "prompt");
        assert_eq!(unit_name("custom-quiz"), "custom_quiz");
        assert_eq!(unit_name("42"), "42");
    }

    #[test]
    fn test_load_dir_overlays_builtin() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("units")).unwrap();
        fs::create_dir(dir.path().join("frames")).unwrap();
        fs::write(dir.path().join("units/03-concept.html"), "<p>{{section_title}}</p>").unwrap();
        fs::write(dir.path().join("units/notes.txt"), "ignored").unwrap();
        fs::write(dir.path().join("frames/L2-green-master.html"), "<main>{{SLIDE_CONTENT}}</main>")
            .unwrap();

        let set = TemplateSet::from_dir(dir.path()).unwrap();
        assert_eq!(set.unit("concept"), Some("<p>{{section_title}}</p>"));
        assert_eq!(set.frame("L2"), Some("<main>{{SLIDE_CONTENT}}</main>"));
        assert!(set.unit("example").is_some());
        assert!(set.unit("notes").is_none());
    }

    #[test]
    fn test_missing_dir() {
        assert!(matches!(
            TemplateSet::from_dir("/no/such/templates"),
            Err(Error::Config(_))
        ));
    }
}
