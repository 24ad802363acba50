use polars::prelude::DataFrame;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of the check that produced a violation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Check {
    /// Value not representable as the declared column type.
    Dtype,
    /// Null in a non-nullable column.
    NotNullable,
    /// Numeric value outside the declared closed interval.
    InRange,
    /// Label outside the declared category set.
    Isin,
    DuplicateRows,
    EmptyRows,
    Missingness,
    ClassBalance,
    ConstantColumn,
}

impl Check {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Dtype => "dtype",
            Self::NotNullable => "not_nullable",
            Self::InRange => "in_range",
            Self::Isin => "isin",
            Self::DuplicateRows => "duplicate_rows",
            Self::EmptyRows => "empty_rows",
            Self::Missingness => "missingness",
            Self::ClassBalance => "class_balance",
            Self::ConstantColumn => "constant_column",
        }
    }

    pub fn category(&self) -> ViolationCategory {
        match self {
            Self::Dtype | Self::NotNullable | Self::InRange | Self::Isin => {
                ViolationCategory::Schema
            }
            _ => ViolationCategory::Table,
        }
    }

    /// Whether rows implicated by this check are removed from the output.
    ///
    /// Column-level checks and the empty-row rule filter; duplicate rows are
    /// reported but kept, and the remaining table rules are advisory.
    pub fn filters_rows(&self) -> bool {
        match self {
            Self::Dtype | Self::NotNullable | Self::InRange | Self::Isin | Self::EmptyRows => true,
            Self::DuplicateRows | Self::Missingness | Self::ClassBalance | Self::ConstantColumn => {
                false
            }
        }
    }
}

impl fmt::Display for Check {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ViolationCategory {
    /// Per-cell failure (type, nullability, range, category).
    Schema,
    /// Whole-table invariant failure.
    Table,
}

/// What a violation is attached to.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Scope {
    Column(String),
    Table,
}

impl Scope {
    pub fn column(name: impl Into<String>) -> Self {
        Self::Column(name.into())
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Column(name) => f.write_str(name),
            Self::Table => f.write_str("table"),
        }
    }
}

/// Serialized as the bare column name, or `"table"`.
impl Serialize for Scope {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.collect_str(self)
    }
}

/// One recorded failure of a column or table rule.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Violation {
    pub check: Check,
    pub category: ViolationCategory,
    pub scope: Scope,
    /// Implicated row indices, ascending. Empty for table-wide failures.
    pub rows: Vec<usize>,
    /// The offending value, when there is one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failure_case: Option<String>,
    pub message: String,
}

impl Violation {
    pub fn new(check: Check, scope: Scope, message: impl Into<String>) -> Self {
        Self {
            check,
            category: check.category(),
            scope,
            rows: Vec::new(),
            failure_case: None,
            message: message.into(),
        }
    }

    pub fn with_rows(mut self, rows: Vec<usize>) -> Self {
        self.rows = rows;
        self
    }

    pub fn with_failure_case(mut self, value: impl Into<String>) -> Self {
        self.failure_case = Some(value.into());
        self
    }

    pub fn filters_rows(&self) -> bool {
        self.check.filters_rows()
    }
}

/// Pass/fail outcome of one table rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RuleVerdict {
    pub rule: Check,
    pub passed: bool,
}

/// Everything one run found, in the order it was found.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ValidationReport {
    /// Column violations (row order) followed by table violations (rule order).
    pub violations: Vec<Violation>,
    /// One verdict per table rule, in declaration order.
    pub verdicts: Vec<RuleVerdict>,
    /// Set once schema and table checks have executed. A report with no
    /// violations and `checks_ran == false` means nothing was checked.
    pub checks_ran: bool,
    pub rows_checked: usize,
}

impl ValidationReport {
    /// True only when checks executed and found nothing.
    pub fn is_clean(&self) -> bool {
        self.checks_ran && self.violations.is_empty()
    }

    pub fn count(&self, category: ViolationCategory) -> usize {
        self.violations
            .iter()
            .filter(|v| v.category == category)
            .count()
    }

    pub fn schema_violations(&self) -> impl Iterator<Item = &Violation> {
        self.violations
            .iter()
            .filter(|v| v.category == ViolationCategory::Schema)
    }

    pub fn table_violations(&self) -> impl Iterator<Item = &Violation> {
        self.violations
            .iter()
            .filter(|v| v.category == ViolationCategory::Table)
    }

    pub fn by_check(&self, check: Check) -> impl Iterator<Item = &Violation> {
        self.violations.iter().filter(move |v| v.check == check)
    }
}

/// Violation totals by category.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViolationCounts {
    pub schema: usize,
    pub table: usize,
    pub total: usize,
}

impl From<&ValidationReport> for ViolationCounts {
    fn from(report: &ValidationReport) -> Self {
        let schema = report.count(ViolationCategory::Schema);
        let table = report.count(ViolationCategory::Table);
        Self {
            schema,
            table,
            total: schema + table,
        }
    }
}

/// Result of a validation run that reached `Done`.
#[derive(Debug, Clone)]
pub struct ValidationOutcome {
    /// Input rows minus the drop set, in input order.
    pub validated: DataFrame,
    pub report: ValidationReport,
    /// Sorted, de-duplicated indices removed from the input.
    pub dropped_rows: Vec<usize>,
}

impl ValidationOutcome {
    pub fn rows_before(&self) -> usize {
        self.report.rows_checked
    }

    pub fn rows_after(&self) -> usize {
        self.validated.height()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filtering_policy() {
        assert!(Check::InRange.filters_rows());
        assert!(Check::Isin.filters_rows());
        assert!(Check::EmptyRows.filters_rows());
        assert!(!Check::DuplicateRows.filters_rows());
        assert!(!Check::Missingness.filters_rows());
        assert!(!Check::ClassBalance.filters_rows());
        assert!(!Check::ConstantColumn.filters_rows());
    }

    #[test]
    fn test_categories() {
        assert_eq!(Check::Dtype.category(), ViolationCategory::Schema);
        assert_eq!(Check::EmptyRows.category(), ViolationCategory::Table);
    }

    #[test]
    fn test_violation_serialization() {
        let violation = Violation::new(Check::InRange, Scope::column("Age"), "out of range")
            .with_rows(vec![3])
            .with_failure_case("200");
        let json = serde_json::to_value(&violation).unwrap();
        assert_eq!(json["check"], "in_range");
        assert_eq!(json["category"], "schema");
        assert_eq!(json["scope"], "Age");
        assert_eq!(json["rows"][0], 3);
        assert_eq!(json["failure_case"], "200");

        let table = Violation::new(Check::DuplicateRows, Scope::Table, "dupes");
        let json = serde_json::to_value(&table).unwrap();
        assert_eq!(json["scope"], "table");
        assert!(json.get("failure_case").is_none());
    }

    #[test]
    fn test_empty_report_is_not_clean_until_checks_ran() {
        let mut report = ValidationReport::default();
        assert!(!report.is_clean());
        report.checks_ran = true;
        assert!(report.is_clean());
    }
}
