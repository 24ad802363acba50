//! Whole-table invariant evaluation.

use crate::error::Result;
use crate::rules::{RuleSet, TableRule};
use crate::types::{Check, RuleVerdict, Scope, Violation};
use crate::utils::{format_number, parse_number, text_cells};
use polars::prelude::*;
use std::collections::{BTreeMap, HashMap};
use tracing::debug;

/// The outcome of one table rule.
#[derive(Debug, Clone, PartialEq)]
pub struct TableVerdict {
    pub rule: Check,
    pub violations: Vec<Violation>,
}

impl TableVerdict {
    pub fn passed(&self) -> bool {
        self.violations.is_empty()
    }

    pub fn to_rule_verdict(&self) -> RuleVerdict {
        RuleVerdict {
            rule: self.rule,
            passed: self.passed(),
        }
    }
}

/// Evaluates the rule set's table rules.
///
/// Every rule is evaluated; a failing rule never prevents the next one from
/// running. Rules see an empty frame like any other: it has no duplicates,
/// no empty rows and no missing values, but every numeric column is
/// constant.
pub struct TableChecker;

impl TableChecker {
    /// One verdict per table rule, in declaration order.
    pub fn check(df: &DataFrame, rules: &RuleSet) -> Result<Vec<TableVerdict>> {
        let cells = DeclaredCells::collect(df, rules)?;

        let mut verdicts = Vec::with_capacity(rules.table_rules().len());
        for rule in rules.table_rules() {
            let violations = Self::evaluate(rule, &cells, rules);
            debug!(
                "Table rule '{}': {}",
                rule.check(),
                if violations.is_empty() {
                    "passed".to_string()
                } else {
                    format!("{} violation(s)", violations.len())
                }
            );
            verdicts.push(TableVerdict {
                rule: rule.check(),
                violations,
            });
        }

        Ok(verdicts)
    }

    fn evaluate(rule: &TableRule, cells: &DeclaredCells, rules: &RuleSet) -> Vec<Violation> {
        match rule {
            TableRule::NoDuplicateRows => Self::duplicate_rows(cells),
            TableRule::NoEmptyRows => Self::empty_rows(cells),
            TableRule::MaxMissingFraction { threshold } => Self::missingness(cells, *threshold),
            TableRule::MinClassShare { target, min_share } => {
                Self::class_balance(cells, target, *min_share)
            }
            TableRule::NoConstantColumns => Self::constant_columns(cells, rules),
        }
    }

    fn duplicate_rows(cells: &DeclaredCells) -> Vec<Violation> {
        let mut groups: HashMap<Vec<Option<&str>>, Vec<usize>> = HashMap::new();
        for row in 0..cells.height {
            groups.entry(cells.row_key(row)).or_default().push(row);
        }

        let mut rows: Vec<usize> = groups
            .into_values()
            .filter(|group| group.len() > 1)
            .flatten()
            .collect();
        if rows.is_empty() {
            return Vec::new();
        }
        rows.sort_unstable();

        vec![
            Violation::new(
                Check::DuplicateRows,
                Scope::Table,
                format!("{} rows take part in duplicate groups", rows.len()),
            )
            .with_rows(rows),
        ]
    }

    fn empty_rows(cells: &DeclaredCells) -> Vec<Violation> {
        if cells.columns.is_empty() {
            return Vec::new();
        }
        let rows: Vec<usize> = (0..cells.height)
            .filter(|&row| cells.columns.iter().all(|(_, col)| col[row].is_none()))
            .collect();
        if rows.is_empty() {
            return Vec::new();
        }

        vec![
            Violation::new(
                Check::EmptyRows,
                Scope::Table,
                format!("{} row(s) are null in every column", rows.len()),
            )
            .with_rows(rows),
        ]
    }

    fn missingness(cells: &DeclaredCells, threshold: f64) -> Vec<Violation> {
        cells
            .columns
            .iter()
            .filter_map(|(name, col)| {
                let nulls = col.iter().filter(|v| v.is_none()).count();
                // A column without rows has nothing missing
                let fraction = if cells.height == 0 {
                    0.0
                } else {
                    nulls as f64 / cells.height as f64
                };
                (fraction > threshold).then(|| {
                    Violation::new(
                        Check::Missingness,
                        Scope::column(name.as_str()),
                        format!(
                            "Column '{}' is {:.1}% null (limit {:.1}%)",
                            name,
                            fraction * 100.0,
                            threshold * 100.0
                        ),
                    )
                    .with_failure_case(format_number(fraction))
                })
            })
            .collect()
    }

    fn class_balance(cells: &DeclaredCells, target: &str, min_share: f64) -> Vec<Violation> {
        let Some(col) = cells.column(target) else {
            return Vec::new();
        };

        // BTreeMap keeps the report order stable across runs
        let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
        for value in col.iter().flatten() {
            *counts.entry(value.as_str()).or_default() += 1;
        }
        let total: usize = counts.values().sum();
        if total == 0 {
            return Vec::new();
        }

        counts
            .into_iter()
            .filter_map(|(label, count)| {
                let share = count as f64 / total as f64;
                (share < min_share).then(|| {
                    Violation::new(
                        Check::ClassBalance,
                        Scope::column(target),
                        format!(
                            "Class '{}' holds {:.1}% of '{}' (minimum {:.1}%)",
                            label,
                            share * 100.0,
                            target,
                            min_share * 100.0
                        ),
                    )
                    .with_failure_case(label)
                })
            })
            .collect()
    }

    fn constant_columns(cells: &DeclaredCells, rules: &RuleSet) -> Vec<Violation> {
        rules
            .numeric_columns()
            .filter_map(|name| {
                let col = cells.column(name)?;
                let mut distinct: Vec<&str> = col.iter().flatten().map(String::as_str).collect();
                distinct.sort_unstable();
                distinct.dedup();
                (distinct.len() < 2).then(|| {
                    let mut violation = Violation::new(
                        Check::ConstantColumn,
                        Scope::column(name),
                        format!(
                            "Column '{}' has {} distinct non-null value(s)",
                            name,
                            distinct.len()
                        ),
                    );
                    if let Some(value) = distinct.first() {
                        violation = violation.with_failure_case(*value);
                    }
                    violation
                })
            })
            .collect()
    }
}

/// Text view of the declared columns present in the frame.
///
/// Cells of numeric columns that parse as numbers are stored in canonical
/// form, so `30`, ` 30 ` and `30.0` compare equal.
struct DeclaredCells {
    height: usize,
    columns: Vec<(String, Vec<Option<String>>)>,
}

impl DeclaredCells {
    fn collect(df: &DataFrame, rules: &RuleSet) -> Result<Self> {
        let mut columns = Vec::new();
        for name in rules.column_names() {
            let Ok(column) = df.column(name) else {
                continue;
            };
            let mut cells = text_cells(column.as_materialized_series())?;
            if rules.column(name).is_some_and(|rule| rule.dtype.is_numeric()) {
                for cell in cells.iter_mut().flatten() {
                    if let Some(value) = parse_number(cell) {
                        *cell = format_number(value);
                    }
                }
            }
            columns.push((name.to_string(), cells));
        }
        Ok(Self {
            height: df.height(),
            columns,
        })
    }

    fn column(&self, name: &str) -> Option<&[Option<String>]> {
        self.columns
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, col)| col.as_slice())
    }

    fn row_key(&self, row: usize) -> Vec<Option<&str>> {
        self.columns
            .iter()
            .map(|(_, col)| col[row].as_deref())
            .collect()
    }
}
