//! Per-item stage outcomes.

use super::{Diagnostic, Severity, Stage};
use crate::error::Result;

/// Result of running one stage on one document or section.
#[derive(Debug, Clone)]
pub enum StageOutcome<T> {
    Done(T),
    /// The item is excluded from later stages
    Skipped(Diagnostic),
}

impl<T> StageOutcome<T> {
    /// Turn a fallible stage result into an outcome, recording the error
    /// against `subject`.
    pub fn from_result(result: Result<T>, stage: Stage, subject: &str) -> Self {
        match result {
            Ok(value) => StageOutcome::Done(value),
            Err(err) => {
                log::warn!("{} skipped '{}': {}", stage, subject, err);
                StageOutcome::Skipped(Diagnostic::new(
                    Severity::Error,
                    stage,
                    subject,
                    err.to_string(),
                ))
            }
        }
    }

    /// Chain the next stage.
    pub fn and_then<U>(self, f: impl FnOnce(T) -> StageOutcome<U>) -> StageOutcome<U> {
        match self {
            StageOutcome::Done(value) => f(value),
            StageOutcome::Skipped(diag) => StageOutcome::Skipped(diag),
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> StageOutcome<U> {
        self.and_then(|value| StageOutcome::Done(f(value)))
    }

    pub fn is_done(&self) -> bool {
        matches!(self, StageOutcome::Done(_))
    }

    /// Split into the value or the skip diagnostic.
    pub fn into_parts(self) -> (Option<T>, Option<Diagnostic>) {
        match self {
            StageOutcome::Done(value) => (Some(value), None),
            StageOutcome::Skipped(diag) => (None, Some(diag)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    #[test]
    fn test_from_result() {
        let done = StageOutcome::from_result(Ok(3), Stage::Parse, "a");
        assert!(done.is_done());

        let skipped: StageOutcome<i32> =
            StageOutcome::from_result(Err(Error::unreadable("b", "gone")), Stage::Load, "b");
        let (value, diag) = skipped.into_parts();
        assert!(value.is_none());
        let diag = diag.unwrap();
        assert_eq!(diag.stage, Stage::Load);
        assert_eq!(diag.subject, "b");
        assert_eq!(diag.severity, Severity::Error);
    }

    #[test]
    fn test_chaining_stops_at_skip() {
        let outcome = StageOutcome::Done(2)
            .map(|n| n * 10)
            .and_then(|n| {
                StageOutcome::<i32>::Skipped(Diagnostic::info(Stage::Generate, "x", format!("{}", n)))
            })
            .map(|n| n + 1);
        match outcome {
            StageOutcome::Skipped(d) => assert_eq!(d.message, "20"),
            StageOutcome::Done(_) => panic!("expected skip"),
        }
    }
}
