//! Serialization of generation output.

use crate::error::{Error, Result};
use crate::model::RenderedUnit;
use crate::pipeline::{escape_html, GenerationOutput, Manifest};
use serde::Serialize;
use std::fmt::Write as _;
use std::path::{Path, PathBuf};

/// JSON output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JsonFormat {
    /// Pretty-printed JSON with indentation
    #[default]
    Pretty,
    /// Compact JSON without extra whitespace
    Compact,
}

fn serialize<T: Serialize + ?Sized>(value: &T, format: JsonFormat) -> Result<String> {
    let result = match format {
        JsonFormat::Pretty => serde_json::to_string_pretty(value),
        JsonFormat::Compact => serde_json::to_string(value),
    };

    result.map_err(|e| Error::Serialize(format!("JSON serialization error: {}", e)))
}

/// Units and manifest as one JSON document.
pub fn to_json(output: &GenerationOutput, format: JsonFormat) -> Result<String> {
    serialize(output, format)
}

/// Units only, as a JSON array.
pub fn units_to_json(units: &[RenderedUnit], format: JsonFormat) -> Result<String> {
    serialize(units, format)
}

pub fn manifest_to_json(manifest: &Manifest, format: JsonFormat) -> Result<String> {
    serialize(manifest, format)
}

/// Concatenate rendered units into one HTML deck.
///
/// Each unit is wrapped in an `<article>` carrying its id, type and
/// index; speaker notes, when present, follow as an `<aside>`.
pub fn to_html(output: &GenerationOutput) -> String {
    let manifest = &output.manifest;
    let mut html = String::from("<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n");
    let _ = writeln!(
        html,
        "<title>{} units ({})</title>",
        manifest.unit_count, manifest.label
    );
    html.push_str("</head>\n<body>\n");

    for unit in &output.units {
        let _ = writeln!(
            html,
            "<article id=\"{}\" data-kind=\"{}\" data-index=\"{}\">",
            escape_html(&unit.id),
            unit.kind.as_str(),
            unit.index
        );
        html.push_str(&unit.content);
        if !unit.content.ends_with('\n') {
            html.push('\n');
        }
        if let Some(notes) = &unit.notes {
            let _ = writeln!(html, "<aside class=\"notes\"><pre>{}</pre></aside>", escape_html(notes));
        }
        html.push_str("</article>\n");
    }

    html.push_str("</body>\n</html>\n");
    html
}

/// Write `units.json`, `manifest.json` and `deck.html` into `dir`.
pub fn write_output(
    dir: impl AsRef<Path>,
    output: &GenerationOutput,
    format: JsonFormat,
) -> Result<Vec<PathBuf>> {
    let dir = dir.as_ref();
    std::fs::create_dir_all(dir)?;

    let files = [
        ("units.json", units_to_json(&output.units, format)?),
        ("manifest.json", manifest_to_json(&output.manifest, format)?),
        ("deck.html", to_html(output)),
    ];

    let mut written = Vec::with_capacity(files.len());
    for (name, content) in files {
        let path = dir.join(name);
        std::fs::write(&path, content)?;
        log::debug!("wrote {}", path.display());
        written.push(path);
    }
    Ok(written)
}
