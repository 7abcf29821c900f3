//! Document-level types.

use super::{Layer, Provenance, Section};
use serde::ser::{Serialize, Serializer};
use std::fmt;

/// A parsed lesson document. Immutable once the parser hands it out.
#[derive(Debug, Clone, serde::Serialize)]
pub struct Document {
    /// Caller-supplied identifier (usually the file stem)
    pub id: String,

    /// Metadata block (title, layer, objectives, etc.)
    pub metadata: Metadata,

    /// Resolved lesson title
    pub title: String,

    /// First paragraph before the first section heading
    pub opening: Option<String>,

    /// Second-level sections in document order
    pub sections: Vec<Section>,

    /// Normalized body text with the metadata block removed
    #[serde(skip)]
    pub body: String,
}

impl Document {
    /// Create an empty document with the given id.
    pub fn new(id: impl Into<String>) -> Self {
        let id = id.into();
        Self {
            title: id.clone(),
            id,
            metadata: Metadata::default(),
            opening: None,
            sections: Vec::new(),
            body: String::new(),
        }
    }

    /// Layer explicitly declared in the metadata, if any.
    pub fn declared_layer(&self) -> Option<Layer> {
        Layer::from_metadata(&self.metadata)
    }

    /// Layer used for theming; documents without a declaration are L1.
    pub fn layer(&self) -> Layer {
        self.declared_layer().unwrap_or_default()
    }

    /// Lesson number from metadata, else the leading digits of the id.
    pub fn lesson_number(&self) -> u32 {
        if let Some(n) = self.metadata.get_u32("lesson_number") {
            return n;
        }
        let name = self.id.rsplit(['/', '\\']).next().unwrap_or(&self.id);
        let digits: String = name.chars().take_while(|c| c.is_ascii_digit()).collect();
        digits.parse().unwrap_or(0)
    }

    /// Chapter number from metadata (`chapter_number` or `chapter`).
    pub fn chapter_number(&self) -> u32 {
        self.metadata
            .get_u32("chapter_number")
            .or_else(|| self.metadata.get_u32("chapter"))
            .unwrap_or(0)
    }

    /// CEFR-style proficiency level, `A2` when absent.
    pub fn proficiency_level(&self) -> String {
        self.metadata
            .get("proficiency_level")
            .map(|v| v.to_string())
            .unwrap_or_else(|| "A2".to_string())
    }

    /// Lesson duration in minutes, 15 when absent or malformed.
    pub fn duration_minutes(&self) -> u32 {
        self.metadata.get_u32("duration_minutes").unwrap_or(15)
    }

    /// Whitespace-separated word count of the body.
    pub fn word_count(&self) -> usize {
        self.body.split_whitespace().count()
    }

    /// Sections that carry body text.
    pub fn content_sections(&self) -> impl Iterator<Item = &Section> {
        self.sections.iter().filter(|s| !s.is_empty())
    }

    /// Provenance record stamped onto every unit generated from this document.
    pub fn provenance(&self) -> Provenance {
        Provenance {
            document_id: self.id.clone(),
            title: self.title.clone(),
            layer: self.layer().code().to_string(),
            lesson_number: self.lesson_number(),
            chapter_number: self.chapter_number(),
        }
    }
}

/// A metadata value: lists, booleans and integers are recognized,
/// everything else stays text.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(untagged)]
pub enum MetaValue {
    Bool(bool),
    Integer(i64),
    List(Vec<String>),
    Text(String),
}

impl MetaValue {
    /// Borrow as text, if this is a text value.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            MetaValue::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Integer value, also accepting digit-only text.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            MetaValue::Integer(n) => Some(*n),
            MetaValue::Text(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            MetaValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// List items; a scalar is treated as a one-element list.
    pub fn as_list(&self) -> Vec<String> {
        match self {
            MetaValue::List(items) => items.clone(),
            other => vec![other.to_string()],
        }
    }

    /// Whether the value counts as "set" (non-empty, non-false, non-zero).
    pub fn is_truthy(&self) -> bool {
        match self {
            MetaValue::Bool(b) => *b,
            MetaValue::Integer(n) => *n != 0,
            MetaValue::List(items) => !items.is_empty(),
            MetaValue::Text(s) => !s.is_empty(),
        }
    }
}

impl fmt::Display for MetaValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MetaValue::Bool(b) => write!(f, "{}", b),
            MetaValue::Integer(n) => write!(f, "{}", n),
            MetaValue::List(items) => write!(f, "{}", items.join(", ")),
            MetaValue::Text(s) => f.write_str(s),
        }
    }
}

/// Ordered key/value metadata record.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Metadata {
    entries: Vec<(String, MetaValue)>,
}

impl Metadata {
    /// Create an empty record.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a value, replacing an existing key in place.
    pub fn insert(&mut self, key: impl Into<String>, value: MetaValue) {
        let key = key.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((key, value)),
        }
    }

    pub fn get(&self, key: &str) -> Option<&MetaValue> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(MetaValue::as_str)
    }

    /// Non-negative integer lookup.
    pub fn get_u32(&self, key: &str) -> Option<u32> {
        self.get(key)
            .and_then(MetaValue::as_i64)
            .and_then(|n| u32::try_from(n).ok())
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate entries in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &MetaValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }
}

impl Serialize for Metadata {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_map(self.entries.iter().map(|(k, v)| (k, v)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_new() {
        let doc = Document::new("03-tools");
        assert_eq!(doc.title, "03-tools");
        assert_eq!(doc.lesson_number(), 3);
        assert_eq!(doc.layer(), Layer::L1);
        assert!(doc.declared_layer().is_none());
    }

    #[test]
    fn test_lesson_number_prefers_metadata() {
        let mut doc = Document::new("chapter/07-loops");
        assert_eq!(doc.lesson_number(), 7);
        doc.metadata.insert("lesson_number", MetaValue::Integer(12));
        assert_eq!(doc.lesson_number(), 12);
    }

    #[test]
    fn test_defaults() {
        let doc = Document::new("intro");
        assert_eq!(doc.lesson_number(), 0);
        assert_eq!(doc.proficiency_level(), "A2");
        assert_eq!(doc.duration_minutes(), 15);
    }

    #[test]
    fn test_metadata_insert_keeps_order() {
        let mut meta = Metadata::new();
        meta.insert("title", MetaValue::Text("A".into()));
        meta.insert("draft", MetaValue::Bool(true));
        meta.insert("title", MetaValue::Text("B".into()));

        let keys: Vec<&str> = meta.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["title", "draft"]);
        assert_eq!(meta.get_str("title"), Some("B"));
    }

    #[test]
    fn test_metadata_serializes_as_map() {
        let mut meta = Metadata::new();
        meta.insert("duration_minutes", MetaValue::Integer(20));
        meta.insert("tags", MetaValue::List(vec!["a".into(), "b".into()]));
        let json = serde_json::to_string(&meta).unwrap();
        assert_eq!(json, r#"{"duration_minutes":20,"tags":["a","b"]}"#);
    }
}
