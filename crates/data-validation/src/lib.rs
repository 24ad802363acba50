//! Data Quality Validation Library
//!
//! Validates a raw tabular dataset against declared column and table rules,
//! keeps the rows that pass and logs every failure.
//!
//! # Overview
//!
//! A run goes through three layers of checks:
//!
//! - **Structural**: file extension and exact column set. A failure is
//!   logged and aborts the run; no dataset is written.
//! - **Schema**: per-cell type, nullability, range and category rules.
//!   Failing rows are dropped.
//! - **Table**: duplicates, empty rows, missingness, class balance and
//!   constant columns. Only empty rows are dropped; duplicates and the
//!   remaining rules are reported without touching the data.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use data_validation::{RuleSet, ValidationConfig, Validator, run_validation};
//!
//! let config = ValidationConfig::builder()
//!     .raw_data("data/raw/maternal_health_risk.csv")
//!     .data_to("data/processed")
//!     .log_to("results/logs")
//!     .build()?;
//!
//! let validator = Validator::builder()
//!     .rules(RuleSet::maternal_health()?)
//!     .on_stage(|update| println!("[{}] {}", update.stage.display_name(), update.message))
//!     .build()?;
//!
//! let summary = run_validation(&config, &validator)?;
//! println!("{summary}");
//! ```
//!
//! # In-memory validation
//!
//! ```rust,ignore
//! use data_validation::{ErrorReporter, Validator};
//!
//! let mut reporter = ErrorReporter::new(Vec::new());
//! let outcome = Validator::new(rules).validate(df, &mut reporter)?;
//! for violation in outcome.report.schema_violations() {
//!     println!("{}", violation.message);
//! }
//! ```

pub mod config;
pub mod dataset;
pub mod error;
pub mod pipeline;
pub mod quality;
pub mod reporting;
pub mod rules;
pub mod types;
pub mod utils;

// Re-exports for convenient access
pub use config::{ConfigValidationError, ValidationConfig, ValidationConfigBuilder};
pub use error::{Result as ValidationResult, ResultExt, StructuralError, ValidationError};
pub use pipeline::{
    ClosureStageObserver, StageObserver, StageUpdate, ValidationStage, Validator,
    ValidatorBuilder, run_validation,
};
pub use quality::{ColumnChecker, TableChecker, TableVerdict};
pub use reporting::{ErrorReporter, ValidationSummary};
pub use rules::{ColumnRule, ColumnType, Constraint, RuleSet, RuleSetBuilder, TableRule};
pub use types::{
    Check, RuleVerdict, Scope, ValidationOutcome, ValidationReport, Violation, ViolationCategory,
    ViolationCounts,
};
