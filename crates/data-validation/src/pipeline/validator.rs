//! The validation orchestrator.

use crate::config::ConfigValidationError;
use crate::dataset;
use crate::error::{Result, StructuralError, ValidationError};
use crate::pipeline::stage::{
    ClosureStageObserver, StageObserver, StageTracker, StageUpdate, ValidationStage,
};
use crate::quality::{ColumnChecker, TableChecker, check_column_set, check_file_format};
use crate::reporting::ErrorReporter;
use crate::rules::RuleSet;
use crate::types::{ValidationOutcome, ValidationReport, Violation, ViolationCategory};
use polars::prelude::*;
use std::collections::BTreeSet;
use std::io::Write;
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

/// Runs the structural, schema and table checks of a [`RuleSet`] and
/// filters the rows that failed them.
///
/// # Example
///
/// ```rust,ignore
/// use data_validation::{ErrorReporter, RuleSet, Validator};
///
/// let validator = Validator::new(RuleSet::maternal_health()?);
/// let mut reporter = ErrorReporter::create(&log_path, false)?;
/// let outcome = validator.validate_file(&raw_path, &mut reporter)?;
/// println!("{} rows kept", outcome.rows_after());
/// ```
pub struct Validator {
    rules: RuleSet,
    observer: Option<Arc<dyn StageObserver>>,
}

// A validator can be handed to a worker thread.
static_assertions::assert_impl_all!(Validator: Send);

impl Validator {
    pub fn new(rules: RuleSet) -> Self {
        Self {
            rules,
            observer: None,
        }
    }

    pub fn builder() -> ValidatorBuilder {
        ValidatorBuilder::default()
    }

    pub fn rules(&self) -> &RuleSet {
        &self.rules
    }

    /// Validate the file at `path`.
    ///
    /// The extension is checked before the file is opened. A structural
    /// failure is logged through `reporter` and returned as
    /// [`ValidationError::Structural`]; no row-level check runs in that case.
    pub fn validate_file<W: Write>(
        &self,
        path: &Path,
        reporter: &mut ErrorReporter<W>,
    ) -> Result<ValidationOutcome> {
        let mut tracker = StageTracker::new(self.observer.as_ref());
        tracker.advance(
            ValidationStage::StructuralCheck,
            format!("Checking {}", path.display()),
        )?;

        if let Err(err) = check_file_format(path, self.rules.expected_extension()) {
            return Self::abort(&mut tracker, reporter, err);
        }

        let df = dataset::read_csv(path)?;
        self.run(&mut tracker, df, reporter)
    }

    /// Validate an in-memory frame.
    ///
    /// The file-format precondition does not apply; the column set is
    /// still checked.
    pub fn validate<W: Write>(
        &self,
        df: DataFrame,
        reporter: &mut ErrorReporter<W>,
    ) -> Result<ValidationOutcome> {
        let mut tracker = StageTracker::new(self.observer.as_ref());
        tracker.advance(ValidationStage::StructuralCheck, "Checking column set")?;
        self.run(&mut tracker, df, reporter)
    }

    fn run<W: Write>(
        &self,
        tracker: &mut StageTracker<'_>,
        df: DataFrame,
        reporter: &mut ErrorReporter<W>,
    ) -> Result<ValidationOutcome> {
        let header = dataset::column_names(&df);
        if let Err(err) = check_column_set(header.as_slice(), &self.rules) {
            return Self::abort(tracker, reporter, err);
        }

        tracker.advance(
            ValidationStage::SchemaCheck,
            format!("Checking {} rows", df.height()),
        )?;
        let report = self.check(&df)?;

        tracker.advance(ValidationStage::Filter, "Filtering rows")?;
        let dropped_rows = Self::drop_set(&report.violations);
        let validated = Self::filter(df, &dropped_rows)?;
        debug!(
            "Kept {} of {} rows",
            validated.height(),
            report.rows_checked
        );

        tracker.advance(ValidationStage::Report, "Writing validation log")?;
        if !report.violations.is_empty() {
            warn!(
                "Validation found {} schema and {} table violation(s)",
                report.count(ViolationCategory::Schema),
                report.count(ViolationCategory::Table)
            );
        }
        reporter.report(&report)?;

        tracker.advance(ValidationStage::Done, "Validation complete")?;
        info!(
            "Validation complete: {} rows in, {} rows out",
            report.rows_checked,
            validated.height()
        );

        Ok(ValidationOutcome {
            validated,
            report,
            dropped_rows,
        })
    }

    /// Run column and table checks; failures accumulate.
    fn check(&self, df: &DataFrame) -> Result<ValidationReport> {
        let mut violations = ColumnChecker::check(df, &self.rules)?;
        let table = TableChecker::check(df, &self.rules)?;

        let verdicts = table.iter().map(|v| v.to_rule_verdict()).collect();
        violations.extend(table.into_iter().flat_map(|v| v.violations));

        Ok(ValidationReport {
            violations,
            verdicts,
            checks_ran: true,
            rows_checked: df.height(),
        })
    }

    /// Union of rows implicated by row-filtering violations, ascending.
    fn drop_set(violations: &[Violation]) -> Vec<usize> {
        violations
            .iter()
            .filter(|v| v.filters_rows())
            .flat_map(|v| v.rows.iter().copied())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Remove `dropped` rows, keeping the order of the survivors.
    fn filter(df: DataFrame, dropped: &[usize]) -> Result<DataFrame> {
        if dropped.is_empty() {
            return Ok(df);
        }

        let dropped: BTreeSet<usize> = dropped.iter().copied().collect();
        let mask: BooleanChunked = (0..df.height())
            .map(|row| !dropped.contains(&row))
            .collect();
        Ok(df.filter(&mask)?)
    }

    fn abort<W: Write>(
        tracker: &mut StageTracker<'_>,
        reporter: &mut ErrorReporter<W>,
        err: StructuralError,
    ) -> Result<ValidationOutcome> {
        error!("{} failed: {}", tracker.current().display_name(), err);
        reporter.report_structural(&err)?;
        tracker.advance(ValidationStage::Aborted, err.to_string())?;
        Err(ValidationError::Structural(err))
    }
}

/// Builder for [`Validator`].
#[derive(Default)]
pub struct ValidatorBuilder {
    rules: Option<RuleSet>,
    observer: Option<Arc<dyn StageObserver>>,
}

static_assertions::assert_impl_all!(ValidatorBuilder: Send);

impl ValidatorBuilder {
    pub fn rules(mut self, rules: RuleSet) -> Self {
        self.rules = Some(rules);
        self
    }

    /// Set a stage observer.
    pub fn stage_observer(mut self, observer: Arc<dyn StageObserver>) -> Self {
        self.observer = Some(observer);
        self
    }

    /// Set a closure to receive stage transitions.
    pub fn on_stage<F>(self, callback: F) -> Self
    where
        F: Fn(StageUpdate) + Send + Sync + 'static,
    {
        self.stage_observer(Arc::new(ClosureStageObserver::new(callback)))
    }

    /// Build the validator. Fails if no rule set was given.
    pub fn build(self) -> Result<Validator> {
        let rules = self.rules.ok_or_else(|| {
            ValidationError::Config(ConfigValidationError::MissingField("rules".to_string()))
        })?;
        Ok(Validator {
            rules,
            observer: self.observer,
        })
    }
}
