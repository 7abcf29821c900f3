//! Parsing options and configuration.

/// Options for parsing lesson documents.
#[derive(Debug, Clone)]
pub struct ParseOptions {
    /// Normalize Unicode to NFC before parsing
    pub normalize_unicode: bool,

    /// Ignore `##` lines inside fenced code blocks when splitting sections
    pub fence_aware: bool,

    /// Heading phrase that marks an interactive-prompt section (lowercase)
    pub prompt_marker: String,
}

impl ParseOptions {
    /// Create new parse options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable or disable Unicode normalization.
    pub fn with_unicode_normalization(mut self, normalize: bool) -> Self {
        self.normalize_unicode = normalize;
        self
    }

    /// Enable or disable fence-aware section splitting.
    pub fn with_fence_awareness(mut self, aware: bool) -> Self {
        self.fence_aware = aware;
        self
    }

    /// Set the interactive-prompt heading marker.
    pub fn with_prompt_marker(mut self, marker: impl Into<String>) -> Self {
        self.prompt_marker = marker
            .into()
            .split_whitespace()
            .collect::<Vec<_>>()
            .join(" ")
            .to_lowercase();
        self
    }
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            normalize_unicode: true,
            fence_aware: true,
            prompt_marker: "try with ai".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_options_builder() {
        let options = ParseOptions::new()
            .with_unicode_normalization(false)
            .with_fence_awareness(false)
            .with_prompt_marker("  Practice   Prompt ");

        assert!(!options.normalize_unicode);
        assert!(!options.fence_aware);
        assert_eq!(options.prompt_marker, "practice prompt");
    }

    #[test]
    fn test_default_options() {
        let options = ParseOptions::default();
        assert!(options.normalize_unicode);
        assert!(options.fence_aware);
        assert_eq!(options.prompt_marker, "try with ai");
    }
}
