//! Minimal `key: value` metadata block extraction.
//!
//! Only flat records are supported: bracketed lists, booleans and digit
//! strings are recognized, everything else is text. Anything malformed
//! yields an empty record rather than an error.

use crate::model::{MetaValue, Metadata};

const DELIMITER: &str = "---";

/// Split a metadata block off the front of `text`.
///
/// Returns the parsed record and the remaining body. When the text does
/// not open with a delimiter line, or the block is never closed, the
/// record is empty and the body is the whole input.
pub fn split_frontmatter(text: &str) -> (Metadata, &str) {
    if !text.starts_with(DELIMITER) {
        return (Metadata::new(), text);
    }

    let mut offset = 0;
    let mut block_lines = Vec::new();
    let mut body_start = None;

    for (i, line) in text.split_inclusive('\n').enumerate() {
        let start = offset;
        offset += line.len();
        if i == 0 {
            continue;
        }
        if line.starts_with(DELIMITER) {
            body_start = Some(offset);
            break;
        }
        block_lines.push(&text[start..offset]);
    }

    let Some(body_start) = body_start else {
        log::debug!("metadata block never closed, treating as body");
        return (Metadata::new(), text);
    };

    let mut metadata = Metadata::new();
    for line in block_lines {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let Some((key, value)) = line.split_once(':') else {
            continue;
        };
        let key = key.trim().to_lowercase();
        if key.is_empty() {
            continue;
        }
        metadata.insert(key, parse_value(value));
    }

    (metadata, &text[body_start..])
}

/// Interpret a raw metadata value.
pub fn parse_value(raw: &str) -> MetaValue {
    let value = raw.trim();

    if value.len() >= 2 && value.starts_with('[') && value.ends_with(']') {
        let items = value[1..value.len() - 1]
            .split(',')
            .map(|item| unquote(item.trim()).to_string())
            .filter(|item| !item.is_empty())
            .collect();
        return MetaValue::List(items);
    }

    if value.eq_ignore_ascii_case("true") {
        return MetaValue::Bool(true);
    }
    if value.eq_ignore_ascii_case("false") {
        return MetaValue::Bool(false);
    }

    if !value.is_empty() && value.bytes().all(|b| b.is_ascii_digit()) {
        if let Ok(n) = value.parse::<i64>() {
            return MetaValue::Integer(n);
        }
    }

    MetaValue::Text(unquote(value).to_string())
}

fn unquote(s: &str) -> &str {
    for quote in ['"', '\''] {
        if s.len() >= 2 && s.starts_with(quote) && s.ends_with(quote) {
            return &s[1..s.len() - 1];
        }
    }
    s
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_frontmatter() {
        let text = "---\ntitle: \"Agents 101\"\nduration_minutes: 20\ndraft: TRUE\nskills: [prompting, 'review' , ]\n---\n# Body\n";
        let (meta, body) = split_frontmatter(text);

        assert_eq!(meta.get_str("title"), Some("Agents 101"));
        assert_eq!(meta.get("duration_minutes"), Some(&MetaValue::Integer(20)));
        assert_eq!(meta.get("draft"), Some(&MetaValue::Bool(true)));
        assert_eq!(
            meta.get("skills"),
            Some(&MetaValue::List(vec!["prompting".into(), "review".into()]))
        );
        assert_eq!(body, "# Body\n");
    }

    #[test]
    fn test_no_frontmatter() {
        let (meta, body) = split_frontmatter("# Just a heading\n");
        assert!(meta.is_empty());
        assert_eq!(body, "# Just a heading\n");
    }

    #[test]
    fn test_unterminated_frontmatter() {
        let text = "---\ntitle: Lost\n# Heading\n";
        let (meta, body) = split_frontmatter(text);
        assert!(meta.is_empty());
        assert_eq!(body, text);
    }

    #[test]
    fn test_skips_comments_and_malformed_lines() {
        let text = "---\n# comment\nno colon here\n: empty key\nTitle: Keys Lowercase\n---\n";
        let (meta, body) = split_frontmatter(text);
        assert_eq!(meta.len(), 1);
        assert_eq!(meta.get_str("title"), Some("Keys Lowercase"));
        assert_eq!(body, "");
    }

    #[test]
    fn test_value_splits_on_first_colon() {
        let (meta, _) = split_frontmatter("---\nprimary_layer: Layer 2: Collaboration\n---\n");
        assert_eq!(meta.get_str("primary_layer"), Some("Layer 2: Collaboration"));
    }

    #[test]
    fn test_parse_value_kinds() {
        assert_eq!(parse_value(" 42 "), MetaValue::Integer(42));
        assert_eq!(parse_value("-3"), MetaValue::Text("-3".into()));
        assert_eq!(parse_value("[]"), MetaValue::List(vec![]));
        assert_eq!(parse_value("false"), MetaValue::Bool(false));
        assert_eq!(parse_value(""), MetaValue::Text(String::new()));
    }
}
