//! File-to-file validation run.

use crate::config::ValidationConfig;
use crate::dataset;
use crate::error::{Result, ResultExt};
use crate::pipeline::Validator;
use crate::reporting::{ErrorReporter, ValidationSummary};
use std::fs;
use std::time::Instant;
use tracing::{debug, info, warn};

/// Validate `config.raw_data` and write both artifacts.
///
/// Output directories are created if absent. The log file is created before
/// any check runs, so it exists even when the run aborts or finds nothing.
/// A validated dataset left by an earlier run is removed first, so on any
/// failure no dataset remains; a structural error is returned after it has
/// been logged.
pub fn run_validation(
    config: &ValidationConfig,
    validator: &Validator,
) -> Result<ValidationSummary> {
    config.validate()?;
    let start_time = Instant::now();

    fs::create_dir_all(&config.data_to)
        .context(format!("Failed to create {}", config.data_to.display()))?;
    fs::create_dir_all(&config.log_to)
        .context(format!("Failed to create {}", config.log_to.display()))?;

    let log_path = config.log_path();
    let mut reporter = ErrorReporter::create(&log_path, config.append_log)?;

    let validated_path = config.validated_path();
    if validated_path.exists() {
        debug!("Removing previous {}", validated_path.display());
        fs::remove_file(&validated_path)
            .context(format!("Failed to remove {}", validated_path.display()))?;
    }

    info!("Validating {}", config.raw_data.display());
    let mut outcome = match validator.validate_file(&config.raw_data, &mut reporter) {
        Ok(outcome) => outcome,
        Err(err) => {
            if let Err(flush_err) = reporter.flush() {
                warn!("Failed to flush validation log: {}", flush_err);
            }
            return Err(err);
        }
    };

    dataset::write_csv(&mut outcome.validated, &validated_path)?;
    reporter.flush()?;

    Ok(ValidationSummary::new(
        &outcome,
        &config.raw_data,
        &validated_path,
        &log_path,
        reporter.entries_written(),
        start_time.elapsed(),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::{ColumnRule, RuleSet};

    fn validator() -> Validator {
        Validator::new(
            RuleSet::builder()
                .column("Age", ColumnRule::integer(10, 65))
                .build()
                .unwrap(),
        )
    }

    #[test]
    fn test_creates_missing_directories() {
        let dir = tempfile::tempdir().unwrap();
        let raw = dir.path().join("raw.csv");
        std::fs::write(&raw, "Age\n25\n99\n").unwrap();

        let config = ValidationConfig::builder()
            .raw_data(&raw)
            .data_to(dir.path().join("nested/processed"))
            .log_to(dir.path().join("nested/logs"))
            .build()
            .unwrap();

        let summary = run_validation(&config, &validator()).unwrap();
        assert_eq!(summary.rows_before, 2);
        assert_eq!(summary.rows_after, 1);
        assert_eq!(summary.log_entries, 1);
        assert!(config.validated_path().exists());
        assert!(config.log_path().exists());
    }

    #[test]
    fn test_abort_leaves_no_dataset() {
        let dir = tempfile::tempdir().unwrap();
        let raw = dir.path().join("raw.csv");
        std::fs::write(&raw, "Age,Notes\n25,x\n").unwrap();

        let config = ValidationConfig::builder()
            .raw_data(&raw)
            .data_to(dir.path().join("processed"))
            .log_to(dir.path().join("logs"))
            .build()
            .unwrap();

        let err = run_validation(&config, &validator()).unwrap_err();
        assert!(err.is_structural());
        assert!(!config.validated_path().exists());

        let log = std::fs::read_to_string(config.log_path()).unwrap();
        assert!(log.contains("Unexpected extra columns found: Notes"));
    }

    #[test]
    fn test_abort_removes_previous_dataset() {
        let dir = tempfile::tempdir().unwrap();
        let raw = dir.path().join("raw.csv");
        std::fs::write(&raw, "Age\n25\n40\n").unwrap();

        let config = ValidationConfig::builder()
            .raw_data(&raw)
            .data_to(dir.path().join("processed"))
            .log_to(dir.path().join("logs"))
            .build()
            .unwrap();

        run_validation(&config, &validator()).unwrap();
        assert!(config.validated_path().exists());

        std::fs::write(&raw, "Age,Notes\n25,x\n").unwrap();
        let err = run_validation(&config, &validator()).unwrap_err();
        assert!(err.is_structural());
        assert!(!config.validated_path().exists());
    }
}
