//! Hard preconditions checked before any row is inspected.

use crate::error::StructuralError;
use crate::rules::RuleSet;
use std::collections::HashSet;
use std::path::Path;

/// Fails unless `path` ends with `expected` (e.g. ".csv").
///
/// The comparison is case-sensitive, matching how the raw file is named by
/// the acquisition stage.
pub fn check_file_format(path: &Path, expected: &str) -> Result<(), StructuralError> {
    let name = path.to_string_lossy();
    if name.ends_with(expected) && name.len() > expected.len() {
        return Ok(());
    }
    Err(StructuralError::InvalidFileFormat {
        path: name.into_owned(),
        expected: expected.to_string(),
    })
}

/// Fails unless `actual` holds exactly the declared columns.
///
/// Missing columns are reported before extra ones; both lists keep the
/// order in which the columns were declared or appeared in the header.
pub fn check_column_set<S: AsRef<str>>(
    actual: &[S],
    rules: &RuleSet,
) -> Result<(), StructuralError> {
    let present: HashSet<&str> = actual.iter().map(|s| s.as_ref()).collect();
    let missing: Vec<String> = rules
        .column_names()
        .filter(|name| !present.contains(name))
        .map(str::to_string)
        .collect();
    if !missing.is_empty() {
        return Err(StructuralError::MissingColumns(missing));
    }

    let extra: Vec<String> = actual
        .iter()
        .map(|s| s.as_ref())
        .filter(|name| rules.column(name).is_none())
        .map(str::to_string)
        .collect();
    if !extra.is_empty() {
        return Err(StructuralError::ExtraColumns(extra));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::ColumnRule;

    fn rules() -> RuleSet {
        RuleSet::builder()
            .column("Age", ColumnRule::integer(10, 65))
            .column("RiskLevel", ColumnRule::categorical(["low risk"]))
            .build()
            .unwrap()
    }

    #[test]
    fn test_file_format() {
        assert!(check_file_format(Path::new("data/raw.csv"), ".csv").is_ok());
        assert!(matches!(
            check_file_format(Path::new("data/raw.txt"), ".csv"),
            Err(StructuralError::InvalidFileFormat { .. })
        ));
        assert!(check_file_format(Path::new("raw.csv.zip"), ".csv").is_err());
        assert!(check_file_format(Path::new(".csv"), ".csv").is_err());
    }

    #[test]
    fn test_exact_column_set_passes_in_any_order() {
        assert!(check_column_set(&["RiskLevel", "Age"], &rules()).is_ok());
    }

    #[test]
    fn test_missing_reported_before_extra() {
        let err = check_column_set(&["Age", "Extra"], &rules()).unwrap_err();
        assert_eq!(
            err,
            StructuralError::MissingColumns(vec!["RiskLevel".to_string()])
        );
    }

    #[test]
    fn test_extra_columns() {
        let err = check_column_set(&["Age", "RiskLevel", "Notes"], &rules()).unwrap_err();
        assert_eq!(err, StructuralError::ExtraColumns(vec!["Notes".to_string()]));
    }
}
