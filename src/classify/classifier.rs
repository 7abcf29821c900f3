//! Document and document-set classification.

use super::{ClassifierConfig, IndicatorPatterns, Indicators};
use crate::error::{Error, Result};
use crate::model::{Category, Document, Layer, Scores};
use serde::Serialize;

/// Classification of a single document.
#[derive(Debug, Clone, Serialize)]
pub struct DocumentClassification {
    pub document_id: String,
    pub indicators: Indicators,
    /// Normalized scores (sum to 100)
    pub scores: Scores,
    pub label: Category,
    /// Winning score
    pub confidence: f64,
    /// Every raw score was zero and the fallback split was used
    pub degenerate: bool,
}

/// Aggregate classification of a document set.
#[derive(Debug, Clone, Serialize)]
pub struct Classification {
    /// Mean of the per-document normalized scores
    pub scores: Scores,
    pub label: Category,
    pub confidence: f64,
    pub document_count: usize,
    /// Indicator counts summed over the set
    pub totals: Indicators,
    /// Documents that received the foundational boost
    pub foundational_documents: usize,
}

impl Classification {
    /// Confidence rounded to one decimal place.
    pub fn rounded_confidence(&self) -> f64 {
        (self.confidence * 10.0).round() / 10.0
    }
}

/// Heuristic content classifier.
pub struct Classifier {
    config: ClassifierConfig,
    patterns: IndicatorPatterns,
}

impl Classifier {
    /// Create a classifier, compiling its indicator patterns.
    pub fn new(config: ClassifierConfig) -> Result<Self> {
        if (config.fallback.total() - 100.0).abs() > 1e-6 {
            return Err(Error::Config(format!(
                "fallback scores must sum to 100, got {}",
                config.fallback.total()
            )));
        }
        let patterns = IndicatorPatterns::new(&config)?;
        Ok(Self { config, patterns })
    }

    pub fn config(&self) -> &ClassifierConfig {
        &self.config
    }

    /// Measure indicators on a parsed document.
    pub fn measure(&self, doc: &Document) -> Indicators {
        let foundational = doc.declared_layer() == Some(Layer::L1);
        self.patterns.measure(&doc.body, foundational)
    }

    /// Weighted raw score per category.
    pub fn raw_scores(&self, ind: &Indicators) -> Scores {
        let w = &self.config.weights;
        let coding = ind.code_blocks as f64 * w.code_block
            + ind.code_density() * w.code_density
            + ind.inline_code as f64 * w.inline_code;
        let procedural = ind.prompt_headings as f64 * w.prompt_heading
            + ind.how_to_headings as f64 * w.how_to_heading
            + ind.numbered_items as f64 * w.numbered_item;
        let conceptual = ind.table_rows as f64 * w.table_row
            + if ind.foundational { w.foundational } else { 0.0 }
            + ind.keyword_hits as f64 * w.keyword;
        Scores::new(conceptual, procedural, coding)
    }

    /// Classify measured indicators.
    pub fn classify_indicators(&self, id: &str, indicators: Indicators) -> DocumentClassification {
        let raw = self.raw_scores(&indicators);
        let (scores, degenerate) = match raw.normalized() {
            Some(scores) => (scores, false),
            None => (self.config.fallback, true),
        };

        let (label, confidence) = if degenerate {
            let winner = scores.argmax(&self.config.priority);
            (Category::Mixed, scores.get(winner))
        } else {
            let winner = scores.argmax(&self.config.priority);
            (winner, scores.get(winner))
        };

        log::debug!(
            "classified '{}': {} ({:.1}) from {:?}",
            id,
            label,
            confidence,
            indicators
        );

        DocumentClassification {
            document_id: id.to_string(),
            indicators,
            scores,
            label,
            confidence,
            degenerate,
        }
    }

    /// Classify one document.
    pub fn classify(&self, doc: &Document) -> DocumentClassification {
        self.classify_indicators(&doc.id, self.measure(doc))
    }

    /// Aggregate per-document classifications.
    ///
    /// Scores are the arithmetic mean of each document's normalized
    /// scores. An empty set yields the fallback split, label `mixed` and
    /// zero confidence. A set made only of degenerate documents is
    /// labelled `mixed`, like each of its members.
    pub fn classify_set(&self, documents: &[DocumentClassification]) -> Classification {
        if documents.is_empty() {
            return Classification {
                scores: self.config.fallback,
                label: Category::Mixed,
                confidence: 0.0,
                document_count: 0,
                totals: Indicators::default(),
                foundational_documents: 0,
            };
        }

        let n = documents.len() as f64;
        let mut sums = Scores::default();
        let mut totals = Indicators::default();
        let mut foundational_documents = 0;

        for doc in documents {
            for category in Category::SCORED {
                sums.set(category, sums.get(category) + doc.scores.get(category));
            }
            totals.accumulate(&doc.indicators);
            if doc.indicators.foundational {
                foundational_documents += 1;
            }
        }

        let scores = Scores::new(sums.conceptual / n, sums.procedural / n, sums.coding / n);
        let winner = scores.argmax(&self.config.priority);
        let label = if documents.iter().all(|doc| doc.degenerate) {
            Category::Mixed
        } else {
            winner
        };

        log::debug!(
            "set of {} documents: {} ({:.1}), {} foundational",
            documents.len(),
            label,
            scores.get(winner),
            foundational_documents
        );

        Classification {
            scores,
            label,
            confidence: scores.get(winner),
            document_count: documents.len(),
            totals,
            foundational_documents,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::LessonParser;

    fn classifier() -> Classifier {
        Classifier::new(ClassifierConfig::default()).unwrap()
    }

    #[test]
    fn test_coding_heavy_indicators() {
        let ind = Indicators {
            code_blocks: 5,
            inline_code: 40,
            word_count: 200,
            ..Default::default()
        };
        let result = classifier().classify_indicators("code", ind);

        assert_eq!(result.label, Category::Coding);
        assert!(result.scores.coding > result.scores.conceptual);
        assert!(result.scores.coding > result.scores.procedural);
        assert!((result.scores.total() - 100.0).abs() < 1e-9);
        assert!(!result.degenerate);
    }

    #[test]
    fn test_degenerate_document() {
        let result = classifier().classify_indicators("empty", Indicators::default());
        assert!(result.degenerate);
        assert_eq!(result.label, Category::Mixed);
        assert_eq!(result.scores, Scores::new(33.3, 33.3, 33.4));
        assert!((result.scores.total() - 100.0).abs() < 1e-9);
        assert!((result.confidence - 33.4).abs() < 1e-9);
    }

    #[test]
    fn test_tie_uses_priority() {
        let ind = Indicators {
            table_rows: 1,
            how_to_headings: 1,
            ..Default::default()
        };
        let c = classifier();
        assert_eq!(c.classify_indicators("tie", ind).label, Category::Conceptual);

        let c = Classifier::new(
            ClassifierConfig::default().with_priority(vec![Category::Procedural]),
        )
        .unwrap();
        assert_eq!(c.classify_indicators("tie", ind).label, Category::Procedural);
    }

    #[test]
    fn test_foundational_boost_requires_declaration() {
        let c = classifier();
        let declared = LessonParser::default()
            .parse_str("a", "---\nprimary_layer: Layer 1\n---\n## Intro\nPlain words.\n");
        let undeclared = LessonParser::default().parse_str("b", "## Intro\nPlain words.\n");

        assert_eq!(c.classify(&declared).label, Category::Conceptual);
        assert!(c.classify(&undeclared).degenerate);
    }

    #[test]
    fn test_set_uses_mean_of_normalized_scores() {
        let c = classifier();
        let coding = c.classify_indicators(
            "a",
            Indicators {
                code_blocks: 1,
                ..Default::default()
            },
        );
        let procedural = c.classify_indicators(
            "b",
            Indicators {
                numbered_items: 100,
                ..Default::default()
            },
        );
        let set = c.classify_set(&[coding, procedural]);

        assert!((set.scores.coding - 50.0).abs() < 1e-9);
        assert!((set.scores.procedural - 50.0).abs() < 1e-9);
        assert_eq!(set.label, Category::Procedural);
        assert_eq!(set.document_count, 2);
        assert_eq!(set.totals.numbered_items, 100);
    }

    #[test]
    fn test_single_document_set_keeps_document_label() {
        let c = classifier();
        let coding = Indicators {
            code_blocks: 3,
            inline_code: 10,
            word_count: 100,
            ..Default::default()
        };
        for indicators in [Indicators::default(), coding] {
            let doc = c.classify_indicators("one", indicators);
            let set = c.classify_set(std::slice::from_ref(&doc));
            assert_eq!(set.label, doc.label);
            assert!((set.confidence - doc.confidence).abs() < 1e-9);
        }

        let plain = c.classify_indicators("plain", Indicators::default());
        let set = c.classify_set(&[plain.clone(), plain]);
        assert_eq!(set.label, Category::Mixed);
    }

    #[test]
    fn test_empty_set() {
        let set = classifier().classify_set(&[]);
        assert_eq!(set.label, Category::Mixed);
        assert_eq!(set.confidence, 0.0);
        assert!((set.scores.total() - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_invalid_fallback_rejected() {
        let mut config = ClassifierConfig::default();
        config.fallback = Scores::new(10.0, 10.0, 10.0);
        assert!(matches!(Classifier::new(config), Err(Error::Config(_))));
    }
}
