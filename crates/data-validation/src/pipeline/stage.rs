//! Validation stages and stage observers.
//!
//! A run moves through a fixed sequence of stages:
//!
//! ```text
//! Init -> StructuralCheck -> SchemaCheck -> Filter -> Report -> Done
//!                 |
//!                 +-> Aborted
//! ```
//!
//! `Aborted` is only reachable from `StructuralCheck`. Every transition is
//! checked by [`StageTracker`] and published to an optional
//! [`StageObserver`].
//!
//! # Example
//!
//! ```rust,ignore
//! use data_validation::Validator;
//!
//! let validator = Validator::builder()
//!     .rules(rules)
//!     .on_stage(|update| {
//!         println!("[{}] {}", update.stage.display_name(), update.message);
//!     })
//!     .build()?;
//! ```

use crate::error::{Result, ValidationError};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Stages of a validation run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValidationStage {
    /// Nothing has run yet
    Init,
    /// Checking file extension and column set
    StructuralCheck,
    /// Running column and table rules
    SchemaCheck,
    /// Removing rows in the drop set
    Filter,
    /// Writing the aggregated report
    Report,
    /// Run completed
    Done,
    /// A structural precondition failed
    Aborted,
}

impl ValidationStage {
    /// Returns a human-readable name for the stage.
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Init => "Initializing",
            Self::StructuralCheck => "Structural Check",
            Self::SchemaCheck => "Schema Check",
            Self::Filter => "Filtering Rows",
            Self::Report => "Reporting",
            Self::Done => "Done",
            Self::Aborted => "Aborted",
        }
    }

    /// Whether no further transition is possible.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Done | Self::Aborted)
    }

    /// Whether `self -> next` is an allowed transition.
    pub fn can_transition_to(&self, next: ValidationStage) -> bool {
        matches!(
            (self, next),
            (Self::Init, Self::StructuralCheck)
                | (Self::StructuralCheck, Self::SchemaCheck)
                | (Self::StructuralCheck, Self::Aborted)
                | (Self::SchemaCheck, Self::Filter)
                | (Self::Filter, Self::Report)
                | (Self::Report, Self::Done)
        )
    }
}

/// A stage transition as published to observers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StageUpdate {
    /// Stage that was left
    pub from: ValidationStage,

    /// Stage that was entered
    pub stage: ValidationStage,

    /// Human-readable message describing the transition
    pub message: String,
}

/// Receives stage transitions from a running validator.
///
/// Implementations must be `Send + Sync` so a validator can be moved to a
/// worker thread.
pub trait StageObserver: Send + Sync {
    /// Called once per transition, after it has been validated.
    fn on_stage(&self, update: StageUpdate);
}

/// Wrapper that implements [`StageObserver`] using a closure.
pub struct ClosureStageObserver<F>
where
    F: Fn(StageUpdate) + Send + Sync,
{
    callback: F,
}

impl<F> ClosureStageObserver<F>
where
    F: Fn(StageUpdate) + Send + Sync,
{
    /// Creates a new closure-based observer.
    pub fn new(callback: F) -> Self {
        Self { callback }
    }
}

impl<F> StageObserver for ClosureStageObserver<F>
where
    F: Fn(StageUpdate) + Send + Sync,
{
    fn on_stage(&self, update: StageUpdate) {
        (self.callback)(update);
    }
}

static_assertions::assert_impl_all!(StageUpdate: Send, Sync);

/// Current stage of one run, with transition checking.
pub(crate) struct StageTracker<'a> {
    current: ValidationStage,
    observer: Option<&'a Arc<dyn StageObserver>>,
}

impl<'a> StageTracker<'a> {
    pub(crate) fn new(observer: Option<&'a Arc<dyn StageObserver>>) -> Self {
        Self {
            current: ValidationStage::Init,
            observer,
        }
    }

    pub(crate) fn current(&self) -> ValidationStage {
        self.current
    }

    /// Move to `next`, or fail with an internal error if the move is illegal.
    pub(crate) fn advance(
        &mut self,
        next: ValidationStage,
        message: impl Into<String>,
    ) -> Result<()> {
        if !self.current.can_transition_to(next) {
            return Err(ValidationError::Internal(format!(
                "illegal stage transition {:?} -> {:?}",
                self.current, next
            )));
        }

        let from = self.current;
        self.current = next;
        if let Some(observer) = self.observer {
            observer.on_stage(StageUpdate {
                from,
                stage: next,
                message: message.into(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[test]
    fn test_happy_path_transitions() {
        let path = [
            ValidationStage::StructuralCheck,
            ValidationStage::SchemaCheck,
            ValidationStage::Filter,
            ValidationStage::Report,
            ValidationStage::Done,
        ];

        let mut tracker = StageTracker::new(None);
        for stage in path {
            tracker.advance(stage, "").unwrap();
        }
        assert_eq!(tracker.current(), ValidationStage::Done);
        assert!(tracker.current().is_terminal());
    }

    #[test]
    fn test_aborted_only_from_structural_check() {
        assert!(ValidationStage::StructuralCheck.can_transition_to(ValidationStage::Aborted));
        for stage in [
            ValidationStage::Init,
            ValidationStage::SchemaCheck,
            ValidationStage::Filter,
            ValidationStage::Report,
            ValidationStage::Done,
        ] {
            assert!(!stage.can_transition_to(ValidationStage::Aborted));
        }
    }

    #[test]
    fn test_illegal_transition_is_internal_error() {
        let mut tracker = StageTracker::new(None);
        let err = tracker
            .advance(ValidationStage::Filter, "skip ahead")
            .unwrap_err();
        assert_eq!(err.error_code(), "INTERNAL_ERROR");
        assert_eq!(tracker.current(), ValidationStage::Init);
    }

    #[test]
    fn test_observer_receives_transitions() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let observer: Arc<dyn StageObserver> = Arc::new(ClosureStageObserver::new(
            move |update: StageUpdate| sink.lock().unwrap().push((update.from, update.stage)),
        ));

        let mut tracker = StageTracker::new(Some(&observer));
        tracker
            .advance(ValidationStage::StructuralCheck, "checking")
            .unwrap();
        tracker.advance(ValidationStage::Aborted, "bad header").unwrap();

        assert_eq!(
            *seen.lock().unwrap(),
            vec![
                (ValidationStage::Init, ValidationStage::StructuralCheck),
                (ValidationStage::StructuralCheck, ValidationStage::Aborted),
            ]
        );
    }
}
