//! Heuristic content classification.
//!
//! Each document is measured on a fixed set of structural and lexical
//! indicators. Weighted sums of those indicators give a raw score per
//! category, normalized to percentages; a document set is labelled by the
//! mean of its documents' percentages.

mod classifier;
mod config;
mod indicators;

pub use classifier::{Classification, Classifier, DocumentClassification};
pub use config::{ClassifierConfig, IndicatorWeights};
pub use indicators::{IndicatorPatterns, Indicators};
