use crate::types::{RuleVerdict, ValidationOutcome, ViolationCounts};
use chrono::Local;
use serde::Serialize;
use std::fmt;
use std::path::Path;
use std::time::Duration;

/// What one file-to-file validation run did.
///
/// Printed by the CLI, human-readably or as JSON with `--json`.
#[derive(Debug, Clone, Serialize)]
pub struct ValidationSummary {
    /// Timestamp when the run finished
    pub generated_at: String,
    pub input_file: String,
    pub validated_file: String,
    pub log_file: String,
    pub rows_before: usize,
    pub rows_after: usize,
    /// Indices of removed rows, relative to the input
    pub dropped_rows: Vec<usize>,
    pub violations: ViolationCounts,
    /// Pass/fail per table rule
    pub table_rules: Vec<RuleVerdict>,
    /// Number of entries written to the log
    pub log_entries: usize,
    pub duration_ms: u64,
}

impl ValidationSummary {
    pub fn new(
        outcome: &ValidationOutcome,
        input: &Path,
        validated: &Path,
        log: &Path,
        log_entries: usize,
        duration: Duration,
    ) -> Self {
        Self {
            generated_at: Local::now().to_rfc3339(),
            input_file: input.display().to_string(),
            validated_file: validated.display().to_string(),
            log_file: log.display().to_string(),
            rows_before: outcome.rows_before(),
            rows_after: outcome.rows_after(),
            dropped_rows: outcome.dropped_rows.clone(),
            violations: ViolationCounts::from(&outcome.report),
            table_rules: outcome.report.verdicts.clone(),
            log_entries,
            duration_ms: u64::try_from(duration.as_millis()).unwrap_or(u64::MAX),
        }
    }
}

impl fmt::Display for ValidationSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Validation summary")?;
        writeln!(f, "  Input:      {}", self.input_file)?;
        writeln!(f, "  Validated:  {}", self.validated_file)?;
        writeln!(f, "  Log:        {}", self.log_file)?;
        writeln!(
            f,
            "  Rows:       {} -> {} ({} dropped)",
            self.rows_before,
            self.rows_after,
            self.dropped_rows.len()
        )?;
        writeln!(
            f,
            "  Violations: {} schema, {} table",
            self.violations.schema, self.violations.table
        )?;
        for verdict in &self.table_rules {
            writeln!(
                f,
                "    {:<16} {}",
                verdict.rule.as_str(),
                if verdict.passed { "passed" } else { "FAILED" }
            )?;
        }
        write!(f, "  Duration:   {} ms", self.duration_ms)
    }
}
