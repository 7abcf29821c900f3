//! Run configuration.
//!
//! Every authored constant the engine depends on lives in one of the
//! sections below. Sections missing from a JSON file keep their defaults.

use crate::classify::{Classifier, ClassifierConfig};
use crate::distribution::{AllocatorConfig, DistributionTables, RecommendConfig};
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Complete configuration for a run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub classifier: ClassifierConfig,
    pub allocator: AllocatorConfig,
    pub recommend: RecommendConfig,
    pub tables: DistributionTables,
}

impl Config {
    /// Create a configuration with the authored defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse and validate a JSON configuration.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Config =
            serde_json::from_str(json).map_err(|e| Error::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a JSON configuration file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        log::debug!("loading configuration from {}", path.display());
        Self::from_json_str(&json)
    }

    pub fn with_classifier(mut self, classifier: ClassifierConfig) -> Self {
        self.classifier = classifier;
        self
    }

    pub fn with_allocator(mut self, allocator: AllocatorConfig) -> Self {
        self.allocator = allocator;
        self
    }

    pub fn with_recommend(mut self, recommend: RecommendConfig) -> Self {
        self.recommend = recommend;
        self
    }

    pub fn with_tables(mut self, tables: DistributionTables) -> Self {
        self.tables = tables;
        self
    }

    /// Check every invariant that would make a run meaningless.
    ///
    /// Returns non-fatal warnings (share sums outside tolerance). Fails on
    /// invalid tables, an unusable classifier section or an inverted clamp
    /// range.
    pub fn validate(&self) -> Result<Vec<String>> {
        Classifier::new(self.classifier.clone())?;
        if self.recommend.min_total > self.recommend.max_total {
            return Err(Error::Config(format!(
                "recommend.min_total {} exceeds max_total {}",
                self.recommend.min_total, self.recommend.max_total
            )));
        }
        self.tables.validate(&self.allocator)
    }

    /// Serialize as pretty JSON.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::distribution::{Distribution, TableFamily};
    use crate::model::Category;

    #[test]
    fn test_default_config_is_valid() {
        let warnings = Config::default().validate().unwrap();
        assert!(warnings.is_empty(), "{:?}", warnings);
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config = Config::from_json_str(r#"{"allocator": {"fixed_ceiling": 3}}"#).unwrap();
        assert_eq!(config.allocator.fixed_ceiling, 3);
        assert_eq!(config.allocator.share_tolerance, 0.05);
        assert_eq!(config.recommend.max_total, 120);
        assert!(config.tables.slides.contains_key(&Category::Coding));
    }

    #[test]
    fn test_json_roundtrip_through_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("lessonkit.json");
        std::fs::write(&path, Config::default().to_json().unwrap()).unwrap();

        let loaded = Config::from_file(&path).unwrap();
        assert_eq!(loaded, Config::default());
    }

    #[test]
    fn test_too_many_fixed_slots_rejected() {
        let mut table = Distribution::new();
        for unit in ["a", "b", "c", "d", "e", "f"] {
            table = table.with_fixed(unit);
        }
        let mut tables = DistributionTables::default();
        tables.slides.insert(Category::Mixed, table);

        let err = Config::default().with_tables(tables).validate().unwrap_err();
        assert!(matches!(err, Error::InvalidDistribution(_)));
    }

    #[test]
    fn test_share_sum_is_warning() {
        let mut tables = DistributionTables::default();
        tables.questions.insert(
            Category::Coding,
            Distribution::new().with_share("mcq", 0.5).with_share("code", 0.3),
        );
        let warnings = Config::default().with_tables(tables.clone()).validate().unwrap();
        assert_eq!(warnings.len(), 1);
        assert!(tables.select(TableFamily::Questions, "coding").is_ok());
    }

    #[test]
    fn test_invalid_json_is_config_error() {
        assert!(matches!(
            Config::from_json_str("{not json"),
            Err(Error::Config(_))
        ));
    }

    #[test]
    fn test_inverted_clamp_rejected() {
        let json = r#"{"recommend": {"min_total": 200, "max_total": 100}}"#;
        assert!(matches!(Config::from_json_str(json), Err(Error::Config(_))));
    }
}
