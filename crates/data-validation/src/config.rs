//! Run configuration for the validation stage.
//!
//! [`ValidationConfig`] says where the raw dataset lives and where the two
//! artifacts go. The rules themselves live in [`crate::rules`]; both share
//! [`ConfigValidationError`] so that any malformed configuration surfaces
//! before data is read.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Default file name of the filtered dataset inside `data_to`.
pub const DEFAULT_VALIDATED_FILE_NAME: &str = "validated_data.csv";

/// Default file name of the error log inside `log_to`.
pub const DEFAULT_LOG_FILE_NAME: &str = "validation_errors.log";

/// Configuration for one validation run.
///
/// Use [`ValidationConfig::builder()`] to create a configuration with the
/// fluent API.
///
/// # Example
///
/// ```rust,ignore
/// use data_validation::config::ValidationConfig;
///
/// let config = ValidationConfig::builder()
///     .raw_data("data/raw/maternal_health_risk.csv")
///     .data_to("data/processed")
///     .log_to("results/logs")
///     .build()?;
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationConfig {
    /// Path to the raw CSV file.
    pub raw_data: PathBuf,

    /// Directory that receives the validated dataset. Created if absent.
    pub data_to: PathBuf,

    /// Directory that receives the validation log. Created if absent.
    pub log_to: PathBuf,

    /// File name of the validated dataset.
    /// Default: "validated_data.csv"
    pub validated_file_name: String,

    /// File name of the validation log.
    /// Default: "validation_errors.log"
    pub log_file_name: String,

    /// Append to an existing log instead of truncating it.
    /// Default: false
    pub append_log: bool,
}

impl ValidationConfig {
    /// Create a new configuration builder.
    pub fn builder() -> ValidationConfigBuilder {
        ValidationConfigBuilder::default()
    }

    /// Full path of the validated dataset artifact.
    pub fn validated_path(&self) -> PathBuf {
        self.data_to.join(&self.validated_file_name)
    }

    /// Full path of the validation log artifact.
    pub fn log_path(&self) -> PathBuf {
        self.log_to.join(&self.log_file_name)
    }

    /// Validate the configuration and return errors if invalid.
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        for (field, path) in [
            ("raw_data", &self.raw_data),
            ("data_to", &self.data_to),
            ("log_to", &self.log_to),
        ] {
            if path.as_os_str().is_empty() {
                return Err(ConfigValidationError::MissingField(field.to_string()));
            }
        }

        for (field, name) in [
            ("validated_file_name", &self.validated_file_name),
            ("log_file_name", &self.log_file_name),
        ] {
            if !is_plain_file_name(name) {
                return Err(ConfigValidationError::InvalidFileName {
                    field: field.to_string(),
                    value: name.clone(),
                });
            }
        }

        if self.raw_data == self.validated_path() {
            return Err(ConfigValidationError::OutputIsInput(self.raw_data.clone()));
        }

        Ok(())
    }
}

/// A file name with no directory components.
fn is_plain_file_name(name: &str) -> bool {
    !name.is_empty() && Path::new(name).file_name().is_some_and(|f| f == name)
}

/// Errors that can occur while validating run or rule configuration.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigValidationError {
    #[error("Missing required setting '{0}'")]
    MissingField(String),

    #[error("Invalid file name for '{field}': '{value}'")]
    InvalidFileName { field: String, value: String },

    #[error("Validated dataset path is the raw input: {}", .0.display())]
    OutputIsInput(PathBuf),

    #[error("Malformed rule declaration: {0}")]
    MalformedRules(String),

    #[error("Rule set declares no columns")]
    EmptyRuleSet,

    #[error("Column '{0}' is declared more than once")]
    DuplicateColumn(String),

    #[error("Column '{column}' has an invalid range [{min}, {max}]")]
    InvalidRange { column: String, min: f64, max: f64 },

    #[error("Column '{0}' declares an empty category set")]
    EmptyCategories(String),

    #[error("Column '{column}' pairs type '{dtype}' with a {constraint} constraint")]
    ConstraintMismatch {
        column: String,
        dtype: String,
        constraint: String,
    },

    #[error("Invalid threshold for '{field}': {value} (must be between 0.0 and 1.0)")]
    InvalidThreshold { field: String, value: f64 },

    #[error("Class-balance target '{0}' is not a declared column")]
    UnknownTargetColumn(String),

    #[error("Class-balance target '{0}' must be a text column")]
    TargetNotCategorical(String),

    #[error("Expected file extension must start with '.', got '{0}'")]
    InvalidExtension(String),
}

/// Builder for [`ValidationConfig`] with fluent API.
#[derive(Debug, Default)]
pub struct ValidationConfigBuilder {
    raw_data: Option<PathBuf>,
    data_to: Option<PathBuf>,
    log_to: Option<PathBuf>,
    validated_file_name: Option<String>,
    log_file_name: Option<String>,
    append_log: Option<bool>,
}

impl ValidationConfigBuilder {
    /// Set the raw CSV path.
    pub fn raw_data(mut self, path: impl Into<PathBuf>) -> Self {
        self.raw_data = Some(path.into());
        self
    }

    /// Set the directory for the validated dataset.
    pub fn data_to(mut self, path: impl Into<PathBuf>) -> Self {
        self.data_to = Some(path.into());
        self
    }

    /// Set the directory for the validation log.
    pub fn log_to(mut self, path: impl Into<PathBuf>) -> Self {
        self.log_to = Some(path.into());
        self
    }

    /// Override the validated dataset file name.
    pub fn validated_file_name(mut self, name: impl Into<String>) -> Self {
        self.validated_file_name = Some(name.into());
        self
    }

    /// Override the log file name.
    pub fn log_file_name(mut self, name: impl Into<String>) -> Self {
        self.log_file_name = Some(name.into());
        self
    }

    /// Append to an existing log instead of truncating it.
    pub fn append_log(mut self, append: bool) -> Self {
        self.append_log = Some(append);
        self
    }

    /// Build the configuration.
    ///
    /// All three paths are required; a missing one is reported as
    /// [`ConfigValidationError::MissingField`].
    pub fn build(self) -> Result<ValidationConfig, ConfigValidationError> {
        let config = ValidationConfig {
            raw_data: self
                .raw_data
                .ok_or_else(|| ConfigValidationError::MissingField("raw_data".to_string()))?,
            data_to: self
                .data_to
                .ok_or_else(|| ConfigValidationError::MissingField("data_to".to_string()))?,
            log_to: self
                .log_to
                .ok_or_else(|| ConfigValidationError::MissingField("log_to".to_string()))?,
            validated_file_name: self
                .validated_file_name
                .unwrap_or_else(|| DEFAULT_VALIDATED_FILE_NAME.to_string()),
            log_file_name: self
                .log_file_name
                .unwrap_or_else(|| DEFAULT_LOG_FILE_NAME.to_string()),
            append_log: self.append_log.unwrap_or(false),
        };

        config.validate()?;
        Ok(config)
    }
}
