//! Error types for the validation engine.
//!
//! Only fatal conditions are errors here. Bad cells and failed table
//! invariants are not errors: they are recorded as
//! [`Violation`](crate::types::Violation)s and the run continues.
//!
//! Errors are serializable so the CLI can emit them as part of `--json`
//! output.

use crate::config::ConfigValidationError;
use serde::Serialize;
use serde::ser::SerializeStruct;
use thiserror::Error;

/// A failed structural precondition. Aborts the run before any row-level
/// check executes.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StructuralError {
    /// The input path does not carry the expected extension.
    #[error("Invalid file format. Expected '{expected}' file: {path}")]
    InvalidFileFormat { path: String, expected: String },

    /// Declared columns absent from the dataset header.
    #[error("Missing required columns: {}", .0.join(", "))]
    MissingColumns(Vec<String>),

    /// Header columns that were never declared.
    #[error("Unexpected extra columns found: {}", .0.join(", "))]
    ExtraColumns(Vec<String>),
}

impl StructuralError {
    /// Stable identifier used in log payloads.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::InvalidFileFormat { .. } => "invalid_file_format",
            Self::MissingColumns(_) => "missing_columns",
            Self::ExtraColumns(_) => "extra_columns",
        }
    }

    /// Columns implicated by the failure, empty for file-format failures.
    pub fn columns(&self) -> &[String] {
        match self {
            Self::InvalidFileFormat { .. } => &[],
            Self::MissingColumns(cols) | Self::ExtraColumns(cols) => cols,
        }
    }
}

/// The main error type for validation runs.
#[derive(Error, Debug)]
pub enum ValidationError {
    /// The rule set or run configuration is malformed.
    #[error("Invalid configuration: {0}")]
    Config(#[from] ConfigValidationError),

    /// A structural precondition failed; the run was aborted.
    #[error("Structural check failed: {0}")]
    Structural(#[from] StructuralError),

    /// A stage transition that the state machine does not allow.
    #[error("Internal error: {0}")]
    Internal(String),

    /// IO error wrapper.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Polars error wrapper (CSV parsing, casting, filtering).
    #[error("Polars error: {0}")]
    Polars(#[from] polars::error::PolarsError),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic error with context.
    #[error("{context}: {source}")]
    WithContext {
        context: String,
        #[source]
        source: Box<ValidationError>,
    },
}

impl ValidationError {
    /// Add context to an error.
    pub fn with_context(self, context: impl Into<String>) -> Self {
        ValidationError::WithContext {
            context: context.into(),
            source: Box::new(self),
        }
    }

    /// Get a stable error code for machine-readable output.
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Config(_) => "CONFIGURATION_ERROR",
            Self::Structural(_) => "STRUCTURAL_ERROR",
            Self::Internal(_) => "INTERNAL_ERROR",
            Self::Io(_) => "IO_ERROR",
            Self::Polars(_) => "POLARS_ERROR",
            Self::Json(_) => "JSON_ERROR",
            Self::WithContext { source, .. } => source.error_code(),
        }
    }

    /// Process exit status for this error.
    ///
    /// `2` for configuration errors, `3` for structural errors, `1` for
    /// everything else (IO and internal failures).
    pub fn exit_code(&self) -> u8 {
        match self {
            Self::Config(_) => 2,
            Self::Structural(_) => 3,
            Self::WithContext { source, .. } => source.exit_code(),
            _ => 1,
        }
    }

    /// Check if this error is a structural abort.
    pub fn is_structural(&self) -> bool {
        match self {
            Self::Structural(_) => true,
            Self::WithContext { source, .. } => source.is_structural(),
            _ => false,
        }
    }
}

impl Serialize for ValidationError {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        let mut state = serializer.serialize_struct("ValidationError", 2)?;
        state.serialize_field("code", &self.error_code())?;
        state.serialize_field("message", &self.to_string())?;
        state.end()
    }
}

/// Result type alias for validation operations.
pub type Result<T> = std::result::Result<T, ValidationError>;

/// Extension trait for adding context to Results.
pub trait ResultExt<T> {
    /// Add context to an error result.
    fn context(self, context: impl Into<String>) -> Result<T>;
}

impl<T> ResultExt<T> for Result<T> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| e.with_context(context))
    }
}

impl<T> ResultExt<T> for std::result::Result<T, polars::error::PolarsError> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| ValidationError::Polars(e).with_context(context))
    }
}

impl<T> ResultExt<T> for std::result::Result<T, std::io::Error> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| ValidationError::Io(e).with_context(context))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code() {
        let err = ValidationError::Structural(StructuralError::MissingColumns(vec![
            "Age".to_string(),
        ]));
        assert_eq!(err.error_code(), "STRUCTURAL_ERROR");
        assert_eq!(
            ValidationError::Config(ConfigValidationError::EmptyRuleSet).error_code(),
            "CONFIGURATION_ERROR"
        );
    }

    #[test]
    fn test_exit_codes() {
        assert_eq!(
            ValidationError::Config(ConfigValidationError::EmptyRuleSet).exit_code(),
            2
        );
        assert_eq!(
            ValidationError::Structural(StructuralError::ExtraColumns(vec![])).exit_code(),
            3
        );
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        assert_eq!(ValidationError::Io(io).exit_code(), 1);
    }

    #[test]
    fn test_structural_messages_name_columns() {
        let err = StructuralError::MissingColumns(vec!["BS".to_string(), "Age".to_string()]);
        assert_eq!(err.to_string(), "Missing required columns: BS, Age");
        assert_eq!(err.kind(), "missing_columns");
        assert_eq!(err.columns(), ["BS".to_string(), "Age".to_string()]);
    }

    #[test]
    fn test_error_serialization() {
        let error = ValidationError::Structural(StructuralError::InvalidFileFormat {
            path: "data.txt".to_string(),
            expected: ".csv".to_string(),
        });
        let json = serde_json::to_string(&error).unwrap();
        assert!(json.contains("STRUCTURAL_ERROR"));
        assert!(json.contains("data.txt"));
    }

    #[test]
    fn test_with_context_preserves_classification() {
        let error = ValidationError::Structural(StructuralError::ExtraColumns(vec![
            "Extra".to_string(),
        ]))
        .with_context("While validating raw.csv");
        assert!(error.to_string().contains("While validating raw.csv"));
        assert_eq!(error.error_code(), "STRUCTURAL_ERROR");
        assert_eq!(error.exit_code(), 3);
        assert!(error.is_structural());
    }
}
