use crate::error::Result;
use crate::rules::{ColumnRule, ColumnType, Constraint, RuleSet};
use crate::types::{Check, Scope, Violation};
use crate::utils::{
    float_cells, format_number, is_numeric_dtype, is_whole_number, parse_number, text_cells,
};
use polars::prelude::*;
use tracing::debug;

/// A non-null cell as the checker sees it.
#[derive(Debug, Clone, PartialEq)]
enum Cell<'a> {
    Number(f64),
    Text(&'a str),
}

/// Evaluates per-column rules against every cell.
///
/// Bad data never produces an `Err`; only polars failures do.
pub struct ColumnChecker;

impl ColumnChecker {
    /// Check every declared column of `df`.
    ///
    /// Returns at most one violation per (row, column), sorted by row index
    /// and then by column declaration order. Columns absent from `df` are
    /// skipped; the structural check is responsible for them.
    pub fn check(df: &DataFrame, rules: &RuleSet) -> Result<Vec<Violation>> {
        let mut found: Vec<(usize, usize, Violation)> = Vec::new();

        for (position, spec) in rules.columns().iter().enumerate() {
            let Ok(column) = df.column(&spec.name) else {
                continue;
            };
            let series = column.as_materialized_series();
            let violations = Self::check_column(&spec.name, series, &spec.rule)?;

            debug!(
                "Column '{}': {} violation(s) across {} rows",
                spec.name,
                violations.len(),
                series.len()
            );

            found.extend(
                violations
                    .into_iter()
                    .map(|(row, violation)| (row, position, violation)),
            );
        }

        found.sort_by_key(|(row, position, _)| (*row, *position));
        Ok(found.into_iter().map(|(_, _, v)| v).collect())
    }

    /// Check one column, returning `(row, violation)` pairs in row order.
    fn check_column(
        name: &str,
        series: &Series,
        rule: &ColumnRule,
    ) -> Result<Vec<(usize, Violation)>> {
        let text = text_cells(series)?;
        let numbers = if rule.dtype.is_numeric() && is_numeric_dtype(series.dtype()) {
            Some(float_cells(series)?)
        } else {
            None
        };

        let mut violations = Vec::new();
        for (row, raw) in text.iter().enumerate() {
            let cell = match (&numbers, raw) {
                (_, None) => None,
                (Some(numbers), Some(_)) => numbers[row].map(Cell::Number),
                (None, Some(s)) => Some(Cell::Text(s.as_str())),
            };

            if let Some((check, message)) = Self::evaluate(cell.as_ref(), rule) {
                let mut violation = Violation::new(
                    check,
                    Scope::column(name),
                    format!("Row {row}, column '{name}': {message}"),
                )
                .with_rows(vec![row]);
                if let Some(value) = raw {
                    violation = violation.with_failure_case(value.clone());
                }
                violations.push((row, violation));
            }
        }

        Ok(violations)
    }

    /// Evaluate one cell. `None` means the cell is null.
    fn evaluate(cell: Option<&Cell<'_>>, rule: &ColumnRule) -> Option<(Check, String)> {
        let Some(cell) = cell else {
            return (!rule.nullable)
                .then(|| (Check::NotNullable, "null value in non-nullable column".to_string()));
        };

        match (&rule.constraint, cell) {
            (Constraint::Range { min, max }, cell) => {
                let value = match cell {
                    Cell::Number(n) => *n,
                    Cell::Text(s) => match parse_number(s) {
                        Some(n) => n,
                        None => {
                            return Some((
                                Check::Dtype,
                                format!("expected {} but found '{}'", rule.dtype, s),
                            ));
                        }
                    },
                };

                if rule.dtype == ColumnType::Integer && !value.is_nan() && !is_whole_number(value) {
                    return Some((
                        Check::Dtype,
                        format!("expected integer but found {}", format_number(value)),
                    ));
                }

                // NaN fails both comparisons and is reported as out of range
                if value >= *min && value <= *max {
                    None
                } else {
                    Some((
                        Check::InRange,
                        format!(
                            "{} is outside [{}, {}]",
                            format_number(value),
                            format_number(*min),
                            format_number(*max)
                        ),
                    ))
                }
            }
            (Constraint::Isin(categories), cell) => {
                let label = match cell {
                    Cell::Text(s) => (*s).to_string(),
                    Cell::Number(n) => format_number(*n),
                };
                if categories.iter().any(|c| *c == label) {
                    None
                } else {
                    Some((
                        Check::Isin,
                        format!("'{}' is not one of {:?}", label, categories),
                    ))
                }
            }
        }
    }
}
