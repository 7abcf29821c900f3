//! Classifier configuration.

use crate::model::{Category, Scores};
use serde::{Deserialize, Serialize};

/// Weights of each indicator in its category's raw score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IndicatorWeights {
    /// Coding: per fenced code block
    pub code_block: f64,
    /// Coding: per unit of inline-code density (spans per word)
    pub code_density: f64,
    /// Coding: per inline code span
    pub inline_code: f64,
    /// Procedural: per interactive-prompt heading
    pub prompt_heading: f64,
    /// Procedural: per "how to" heading
    pub how_to_heading: f64,
    /// Procedural: per numbered list item
    pub numbered_item: f64,
    /// Conceptual: per table row
    pub table_row: f64,
    /// Conceptual: flat boost for documents declared foundational
    pub foundational: f64,
    /// Conceptual: per vocabulary hit
    pub keyword: f64,
}

impl Default for IndicatorWeights {
    fn default() -> Self {
        Self {
            code_block: 2.0,
            code_density: 50.0,
            inline_code: 0.5,
            prompt_heading: 5.0,
            how_to_heading: 3.0,
            numbered_item: 2.0,
            table_row: 3.0,
            foundational: 20.0,
            keyword: 0.5,
        }
    }
}

/// Configuration for the content classifier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassifierConfig {
    pub weights: IndicatorWeights,

    /// Conceptual vocabulary; matched as whole words, singular or plural
    pub vocabulary: Vec<String>,

    /// Tie-break order for the argmax, earliest wins
    pub priority: Vec<Category>,

    /// Scores used when every raw score is zero; must sum to 100
    pub fallback: Scores,

    /// Pattern counting interactive-prompt headings
    pub prompt_heading_pattern: String,

    /// Pattern counting "how to" headings
    pub how_to_heading_pattern: String,
}

impl ClassifierConfig {
    /// Create a configuration with the authored defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the indicator weights.
    pub fn with_weights(mut self, weights: IndicatorWeights) -> Self {
        self.weights = weights;
        self
    }

    /// Replace the conceptual vocabulary.
    pub fn with_vocabulary<I, S>(mut self, words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.vocabulary = words.into_iter().map(Into::into).collect();
        self
    }

    /// Replace the tie-break priority order.
    pub fn with_priority(mut self, priority: Vec<Category>) -> Self {
        self.priority = priority;
        self
    }
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            weights: IndicatorWeights::default(),
            vocabulary: [
                "strategy",
                "framework",
                "model",
                "paradigm",
                "concept",
                "theory",
                "principle",
                "pattern",
                "architecture",
                "design",
                "methodology",
                "approach",
                "foundation",
                "thesis",
            ]
            .into_iter()
            .map(String::from)
            .collect(),
            priority: Category::SCORED.to_vec(),
            fallback: Scores::new(33.3, 33.3, 33.4),
            prompt_heading_pattern: r"(?i)##\s*Try\s+With\s+AI".to_string(),
            how_to_heading_pattern: r"(?im)^##\s+How\s+to".to_string(),
        }
    }
}
