//! Validation log and run summary.
//!
//! [`ErrorReporter`] is the explicit, per-run writer of the validation log.
//! It is separate from the diagnostic `tracing` output: the log is an
//! artifact consumed downstream, tracing is for operators.
//!
//! # Example
//!
//! ```rust,ignore
//! use data_validation::reporting::ErrorReporter;
//!
//! let mut reporter = ErrorReporter::create(Path::new("logs/validation_errors.log"), false)?;
//! reporter.report(&outcome.report)?;
//! reporter.flush()?;
//! ```

mod error_reporter;
mod summary;

pub use error_reporter::ErrorReporter;
pub use summary::ValidationSummary;
