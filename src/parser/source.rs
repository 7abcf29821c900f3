//! Raw document inputs.

use crate::error::{Error, Result};
use std::path::{Path, PathBuf};

/// Where a raw document's text comes from.
#[derive(Debug, Clone)]
pub enum Source {
    /// Already-decoded text
    Text(String),
    /// Undecoded bytes (expected UTF-8)
    Bytes(Vec<u8>),
    /// File read lazily by [`RawDocument::read`]
    Path(PathBuf),
}

/// One input document, identified by a caller-chosen id.
#[derive(Debug, Clone)]
pub struct RawDocument {
    pub id: String,
    pub source: Source,
}

impl RawDocument {
    /// Document backed by in-memory text.
    pub fn from_text(id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            source: Source::Text(text.into()),
        }
    }

    /// Document backed by raw bytes.
    pub fn from_bytes(id: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            id: id.into(),
            source: Source::Bytes(bytes.into()),
        }
    }

    /// Document backed by a file; the id is the file stem.
    pub fn from_path(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        let id = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        Self {
            id,
            source: Source::Path(path.to_path_buf()),
        }
    }

    /// Read and decode the document text.
    ///
    /// Read and decoding failures are reported as
    /// [`Error::UnreadableDocument`] so callers can skip just this document.
    pub fn read(&self) -> Result<String> {
        match &self.source {
            Source::Text(text) => Ok(text.clone()),
            Source::Bytes(bytes) => decode(&self.id, bytes.clone()),
            Source::Path(path) => {
                let bytes = std::fs::read(path).map_err(|e| Error::unreadable(&self.id, e))?;
                decode(&self.id, bytes)
            }
        }
    }
}

/// Markdown files (`*.md`) directly inside `dir`, sorted by file name.
pub fn load_dir(dir: impl AsRef<Path>) -> Result<Vec<RawDocument>> {
    let dir = dir.as_ref();
    if !dir.is_dir() {
        return Err(Error::Config(format!("not a directory: {}", dir.display())));
    }

    let mut paths: Vec<PathBuf> = std::fs::read_dir(dir)?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| path.is_file() && path.extension().is_some_and(|ext| ext == "md"))
        .collect();
    paths.sort();

    log::debug!("found {} documents in {}", paths.len(), dir.display());
    Ok(paths.into_iter().map(RawDocument::from_path).collect())
}

fn decode(id: &str, bytes: Vec<u8>) -> Result<String> {
    String::from_utf8(bytes).map_err(|e| Error::unreadable(id, e.utf8_error()))
}
