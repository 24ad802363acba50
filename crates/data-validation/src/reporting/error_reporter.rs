use crate::error::{Result, ResultExt, StructuralError};
use crate::types::{ValidationReport, ViolationCategory, ViolationCounts};
use chrono::Local;
use serde_json::{Value, json};
use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::Path;
use tracing::debug;

/// Timestamp format of log entries, millisecond precision.
const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S,%3f";

/// Writes validation failures to a log destination.
///
/// One entry per logical failure group: a structural failure, or the
/// aggregated schema and table violations of a run. Each entry is a
/// `<timestamp> - ERROR - <headline>` line followed by a pretty-printed JSON
/// payload. The reporter is scoped to one run and owned by the caller.
pub struct ErrorReporter<W: Write> {
    sink: W,
    entries: usize,
}

impl ErrorReporter<BufWriter<File>> {
    /// Open `path` as the log destination, creating it if needed.
    ///
    /// The file exists after this returns even if no entry is ever written.
    /// With `append == false` any previous content is discarded.
    pub fn create(path: &Path, append: bool) -> Result<Self> {
        let file = OpenOptions::new()
            .create(true)
            .write(true)
            .append(append)
            .truncate(!append)
            .open(path)
            .context(format!("Failed to open log file {}", path.display()))?;

        debug!("Validation log opened at {}", path.display());
        Ok(Self::new(BufWriter::new(file)))
    }
}

impl<W: Write> ErrorReporter<W> {
    pub fn new(sink: W) -> Self {
        Self { sink, entries: 0 }
    }

    /// Log a structural failure as a single entry.
    pub fn report_structural(&mut self, error: &StructuralError) -> Result<()> {
        let payload = json!({
            "kind": "structural",
            "error": error.kind(),
            "message": error.to_string(),
            "columns": error.columns(),
        });
        self.write_entry(&error.to_string(), &payload)
    }

    /// Log the schema and table violations of a run as one aggregated entry.
    ///
    /// Writes nothing when the report holds no violations.
    pub fn report(&mut self, report: &ValidationReport) -> Result<()> {
        if report.violations.is_empty() {
            return Ok(());
        }

        let totals = ViolationCounts::from(report);
        let payload = json!({
            "kind": "schema_and_table",
            "rows_checked": report.rows_checked,
            "totals": totals,
            "violations": report.violations,
        });
        let headline = format!(
            "{} schema violation(s), {} table violation(s)",
            report.count(ViolationCategory::Schema),
            report.count(ViolationCategory::Table)
        );
        self.write_entry(&headline, &payload)
    }

    /// Number of entries written so far.
    pub fn entries_written(&self) -> usize {
        self.entries
    }

    pub fn flush(&mut self) -> Result<()> {
        self.sink.flush().context("Failed to flush validation log")
    }

    /// Flush and return the underlying destination.
    pub fn into_inner(mut self) -> Result<W> {
        self.flush()?;
        Ok(self.sink)
    }

    fn write_entry(&mut self, headline: &str, payload: &Value) -> Result<()> {
        let timestamp = Local::now().format(TIMESTAMP_FORMAT);
        let body = serde_json::to_string_pretty(payload)?;
        writeln!(self.sink, "{timestamp} - ERROR - {headline}\n{body}")
            .context("Failed to write validation log entry")?;
        self.entries += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Check, Scope, Violation};

    fn read(reporter: ErrorReporter<Vec<u8>>) -> String {
        String::from_utf8(reporter.into_inner().unwrap()).unwrap()
    }

    fn payload(log: &str) -> Value {
        let start = log.find('{').unwrap();
        serde_json::from_str(&log[start..]).unwrap()
    }

    #[test]
    fn test_empty_report_writes_nothing() {
        let mut reporter = ErrorReporter::new(Vec::new());
        let report = ValidationReport {
            checks_ran: true,
            ..Default::default()
        };
        reporter.report(&report).unwrap();
        assert_eq!(reporter.entries_written(), 0);
        assert!(read(reporter).is_empty());
    }

    #[test]
    fn test_structural_entry() {
        let mut reporter = ErrorReporter::new(Vec::new());
        reporter
            .report_structural(&StructuralError::MissingColumns(vec![
                "HeartRate".to_string(),
            ]))
            .unwrap();
        assert_eq!(reporter.entries_written(), 1);

        let log = read(reporter);
        let first_line = log.lines().next().unwrap();
        assert!(first_line.contains(" - ERROR - Missing required columns: HeartRate"));

        let json = payload(&log);
        assert_eq!(json["kind"], "structural");
        assert_eq!(json["error"], "missing_columns");
        assert_eq!(json["columns"][0], "HeartRate");
    }

    #[test]
    fn test_aggregated_entry() {
        let report = ValidationReport {
            violations: vec![
                Violation::new(Check::InRange, Scope::column("Age"), "out of range")
                    .with_rows(vec![4])
                    .with_failure_case("200"),
                Violation::new(Check::DuplicateRows, Scope::Table, "dupes")
                    .with_rows(vec![1, 2]),
            ],
            verdicts: Vec::new(),
            checks_ran: true,
            rows_checked: 10,
        };

        let mut reporter = ErrorReporter::new(Vec::new());
        reporter.report(&report).unwrap();
        assert_eq!(reporter.entries_written(), 1);

        let json = payload(&read(reporter));
        assert_eq!(json["kind"], "schema_and_table");
        assert_eq!(json["rows_checked"], 10);
        assert_eq!(json["totals"]["schema"], 1);
        assert_eq!(json["totals"]["table"], 1);
        assert_eq!(json["violations"][0]["scope"], "Age");
        assert_eq!(json["violations"][0]["rows"][0], 4);
        assert_eq!(json["violations"][1]["check"], "duplicate_rows");
    }

    #[test]
    fn test_create_truncates_unless_appending() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("validation_errors.log");
        std::fs::write(&path, "stale\n").unwrap();

        ErrorReporter::create(&path, false)
            .unwrap()
            .flush()
            .unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "");

        std::fs::write(&path, "kept\n").unwrap();
        let mut reporter = ErrorReporter::create(&path, true).unwrap();
        reporter
            .report_structural(&StructuralError::ExtraColumns(vec!["Notes".to_string()]))
            .unwrap();
        reporter.flush().unwrap();

        let log = std::fs::read_to_string(&path).unwrap();
        assert!(log.starts_with("kept\n"));
        assert!(log.contains("Unexpected extra columns found: Notes"));
    }
}
