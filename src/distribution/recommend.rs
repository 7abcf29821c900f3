//! Count recommendation: sizing a question set or deck from content size.

use super::{allocate, Allocation, DistributionTables, TableFamily};
use crate::error::Result;
use crate::model::Category;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Constants for the recommendation mode.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RecommendConfig {
    /// Per-category multiplier on the concept count
    pub multipliers: BTreeMap<Category, f64>,
    pub min_total: usize,
    pub max_total: usize,
    /// Concepts assumed per lesson when no concept count is given
    pub concepts_per_lesson: usize,
    /// Per-category minutes needed per question
    pub minutes_per_question: BTreeMap<Category, f64>,
    /// Buffer added to the estimate for the maximum time
    pub buffer_minutes: usize,
    /// Hard cap on the maximum time
    pub max_minutes: usize,
    /// Reading speed used to estimate unit counts from word counts
    pub words_per_minute: f64,
    /// Units presented per minute of reading time
    pub units_per_minute: f64,
}

impl Default for RecommendConfig {
    fn default() -> Self {
        Self {
            multipliers: [
                (Category::Conceptual, 1.2),
                (Category::Procedural, 1.05),
                (Category::Coding, 1.15),
                (Category::Mixed, 1.0),
            ]
            .into_iter()
            .collect(),
            min_total: 25,
            max_total: 120,
            concepts_per_lesson: 5,
            minutes_per_question: [
                (Category::Conceptual, 1.2),
                (Category::Procedural, 1.1),
                (Category::Coding, 1.3),
                (Category::Mixed, 1.0),
            ]
            .into_iter()
            .collect(),
            buffer_minutes: 30,
            max_minutes: 180,
            words_per_minute: 125.0,
            units_per_minute: 1.2,
        }
    }
}

/// Estimated completion time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TimeEstimate {
    pub estimated_minutes: usize,
    pub max_minutes: usize,
}

/// A recommended total with its per-type breakdown.
#[derive(Debug, Clone, Serialize)]
pub struct Recommendation {
    pub category: Category,
    pub total: usize,
    pub allocation: Allocation,
    pub time: TimeEstimate,
}

impl RecommendConfig {
    fn multiplier(&self, category: Category) -> f64 {
        self.multipliers.get(&category).copied().unwrap_or(1.0)
    }

    /// Recommended total count for a content size.
    ///
    /// With zero concepts the base is `max(1, lessons * concepts_per_lesson)`.
    /// The scaled count is clamped into `min_total..=max_total`.
    pub fn recommend_total(&self, concepts: usize, lessons: usize, category: Category) -> usize {
        let base = if concepts == 0 {
            lessons.saturating_mul(self.concepts_per_lesson).max(1)
        } else {
            concepts
        };
        let scaled = (base as f64 * self.multiplier(category)).floor() as usize;
        scaled.clamp(self.min_total, self.max_total.max(self.min_total))
    }

    /// Estimated and capped maximum minutes for `count` questions.
    pub fn estimate_minutes(&self, count: usize, category: Category) -> TimeEstimate {
        let per_question = self
            .minutes_per_question
            .get(&category)
            .copied()
            .unwrap_or(1.0);
        let estimated = (count as f64 * per_question).floor() as usize;
        TimeEstimate {
            estimated_minutes: estimated,
            max_minutes: (estimated + self.buffer_minutes).min(self.max_minutes),
        }
    }

    /// Expected unit count for a body of `words` words.
    pub fn estimate_unit_count(&self, words: usize) -> usize {
        if self.words_per_minute <= 0.0 {
            return 0;
        }
        (words as f64 / self.words_per_minute * self.units_per_minute).floor() as usize
    }

    /// Recommend a question total and split it over the question table.
    pub fn recommend(
        &self,
        tables: &DistributionTables,
        concepts: usize,
        lessons: usize,
        label: &str,
    ) -> Result<Recommendation> {
        let selection = tables.select(TableFamily::Questions, label)?;
        let total = self.recommend_total(concepts, lessons, selection.category);
        let allocation = allocate(total, selection.distribution)?;
        Ok(Recommendation {
            category: selection.category,
            total,
            allocation,
            time: self.estimate_minutes(total, selection.category),
        })
    }
}
