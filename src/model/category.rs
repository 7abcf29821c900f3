//! Content category labels and per-category scores.

use crate::error::Error;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Pedagogical content category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Conceptual,
    Procedural,
    Coding,
    /// No dominant signal; also the default distribution table
    Mixed,
}

impl Category {
    /// Categories that receive a classifier score.
    pub const SCORED: [Category; 3] = [Category::Conceptual, Category::Procedural, Category::Coding];

    /// All labels, including `Mixed`.
    pub const ALL: [Category; 4] = [
        Category::Conceptual,
        Category::Procedural,
        Category::Coding,
        Category::Mixed,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Conceptual => "conceptual",
            Category::Procedural => "procedural",
            Category::Coding => "coding",
            Category::Mixed => "mixed",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let label = s.trim().to_lowercase();
        Self::ALL
            .into_iter()
            .find(|c| c.as_str() == label)
            .ok_or_else(|| Error::UnknownCategory(s.to_string()))
    }
}

/// Normalized per-category scores (percentages).
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Scores {
    pub conceptual: f64,
    pub procedural: f64,
    pub coding: f64,
}

impl Scores {
    pub fn new(conceptual: f64, procedural: f64, coding: f64) -> Self {
        Self {
            conceptual,
            procedural,
            coding,
        }
    }

    /// Score for a category; `Mixed` has none and reads as zero.
    pub fn get(&self, category: Category) -> f64 {
        match category {
            Category::Conceptual => self.conceptual,
            Category::Procedural => self.procedural,
            Category::Coding => self.coding,
            Category::Mixed => 0.0,
        }
    }

    pub fn set(&mut self, category: Category, value: f64) {
        match category {
            Category::Conceptual => self.conceptual = value,
            Category::Procedural => self.procedural = value,
            Category::Coding => self.coding = value,
            Category::Mixed => {}
        }
    }

    pub fn total(&self) -> f64 {
        self.conceptual + self.procedural + self.coding
    }

    /// Scale so the scores sum to 100. Returns `None` for an all-zero input.
    pub fn normalized(&self) -> Option<Scores> {
        let total = self.total();
        if total <= 0.0 {
            return None;
        }
        Some(Scores::new(
            self.conceptual / total * 100.0,
            self.procedural / total * 100.0,
            self.coding / total * 100.0,
        ))
    }

    /// Highest-scoring category; ties go to the earliest entry of `priority`.
    ///
    /// Categories missing from `priority` are considered after it in
    /// declaration order.
    pub fn argmax(&self, priority: &[Category]) -> Category {
        let order = priority
            .iter()
            .copied()
            .chain(Category::SCORED)
            .filter(|c| *c != Category::Mixed);

        let mut best: Option<(Category, f64)> = None;
        for category in order {
            let score = self.get(category);
            match best {
                Some((_, top)) if score <= top => {}
                _ => best = Some((category, score)),
            }
        }
        best.map(|(c, _)| c).unwrap_or(Category::Mixed)
    }

    /// Copy rounded to one decimal place, for display.
    pub fn rounded(&self) -> Scores {
        let r = |v: f64| (v * 10.0).round() / 10.0;
        Scores::new(r(self.conceptual), r(self.procedural), r(self.coding))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PRIORITY: [Category; 3] = Category::SCORED;

    #[test]
    fn test_category_parse() {
        assert_eq!("Coding".parse::<Category>().unwrap(), Category::Coding);
        assert!(matches!(
            "visual".parse::<Category>(),
            Err(Error::UnknownCategory(_))
        ));
    }

    #[test]
    fn test_normalized_sums_to_100() {
        let scores = Scores::new(3.0, 1.0, 6.0).normalized().unwrap();
        assert!((scores.total() - 100.0).abs() < 1e-9);
        assert!((scores.coding - 60.0).abs() < 1e-9);
    }

    #[test]
    fn test_normalized_all_zero() {
        assert!(Scores::default().normalized().is_none());
    }

    #[test]
    fn test_argmax_tie_break_follows_priority() {
        let scores = Scores::new(40.0, 40.0, 20.0);
        assert_eq!(scores.argmax(&PRIORITY), Category::Conceptual);
        assert_eq!(
            scores.argmax(&[Category::Procedural, Category::Conceptual]),
            Category::Procedural
        );
    }

    #[test]
    fn test_argmax_strict_winner() {
        let scores = Scores::new(10.0, 20.0, 70.0);
        assert_eq!(scores.argmax(&PRIORITY), Category::Coding);
    }

    #[test]
    fn test_rounded() {
        let scores = Scores::new(33.333, 33.333, 33.334).rounded();
        assert_eq!(scores, Scores::new(33.3, 33.3, 33.3));
    }
}
