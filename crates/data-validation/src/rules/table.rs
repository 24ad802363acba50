//! Whole-table invariants.
//!
//! The set of rules is closed: each variant carries only its configuration
//! and is evaluated by a single `match` in
//! [`TableChecker`](crate::quality::TableChecker).

use crate::config::ConfigValidationError;
use crate::types::Check;
use serde::{Deserialize, Serialize};

/// Default maximum fraction of nulls allowed per column.
pub const DEFAULT_MISSING_THRESHOLD: f64 = 0.05;

/// Default minimum share each target category must hold.
pub const DEFAULT_MIN_CLASS_SHARE: f64 = 0.05;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "rule", rename_all = "snake_case")]
pub enum TableRule {
    /// No two rows may be identical across all declared columns.
    NoDuplicateRows,
    /// No row may be null in every declared column.
    NoEmptyRows,
    /// Per-column null fraction must not exceed `threshold`.
    MaxMissingFraction {
        #[serde(default = "default_missing_threshold")]
        threshold: f64,
    },
    /// Every observed category of `target` must hold at least `min_share`
    /// of the non-null rows.
    MinClassShare {
        target: String,
        #[serde(default = "default_min_class_share")]
        min_share: f64,
    },
    /// Every declared numeric column must have more than one distinct value.
    NoConstantColumns,
}

fn default_missing_threshold() -> f64 {
    DEFAULT_MISSING_THRESHOLD
}

fn default_min_class_share() -> f64 {
    DEFAULT_MIN_CLASS_SHARE
}

impl TableRule {
    /// Missingness rule with the default threshold.
    pub fn max_missing_fraction() -> Self {
        Self::MaxMissingFraction {
            threshold: DEFAULT_MISSING_THRESHOLD,
        }
    }

    /// Class-balance rule on `target` with the default minimum share.
    pub fn min_class_share(target: impl Into<String>) -> Self {
        Self::MinClassShare {
            target: target.into(),
            min_share: DEFAULT_MIN_CLASS_SHARE,
        }
    }

    /// The check identifier recorded on violations of this rule.
    pub fn check(&self) -> Check {
        match self {
            Self::NoDuplicateRows => Check::DuplicateRows,
            Self::NoEmptyRows => Check::EmptyRows,
            Self::MaxMissingFraction { .. } => Check::Missingness,
            Self::MinClassShare { .. } => Check::ClassBalance,
            Self::NoConstantColumns => Check::ConstantColumn,
        }
    }

    /// Validate thresholds. Column references are checked by the rule set.
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        let (field, value) = match self {
            Self::MaxMissingFraction { threshold } => {
                ("max_missing_fraction.threshold", *threshold)
            }
            Self::MinClassShare { min_share, .. } => ("min_class_share.min_share", *min_share),
            _ => return Ok(()),
        };

        if !(0.0..=1.0).contains(&value) {
            return Err(ConfigValidationError::InvalidThreshold {
                field: field.to_string(),
                value,
            });
        }
        Ok(())
    }
}
