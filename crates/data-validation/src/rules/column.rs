//! Per-column rule declarations.

use crate::config::ConfigValidationError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Primitive type a column's non-null cells must have.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnType {
    /// Whole numbers. A fractional value is a type mismatch.
    Integer,
    /// Any finite or non-finite floating point number.
    Float,
    /// Free text, usually categorical labels.
    Text,
}

impl ColumnType {
    pub fn is_numeric(&self) -> bool {
        matches!(self, Self::Integer | Self::Float)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Integer => "integer",
            Self::Float => "float",
            Self::Text => "text",
        }
    }
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Value constraint attached to a column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Constraint {
    /// Closed numeric interval `[min, max]`.
    Range { min: f64, max: f64 },
    /// Finite set of allowed labels, compared exactly.
    Isin(Vec<String>),
}

impl Constraint {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Range { .. } => "range",
            Self::Isin(_) => "isin",
        }
    }
}

/// Declarative constraint attached to one column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnRule {
    pub dtype: ColumnType,
    #[serde(default = "default_nullable")]
    pub nullable: bool,
    pub constraint: Constraint,
}

fn default_nullable() -> bool {
    true
}

impl ColumnRule {
    /// Nullable integer column bounded by `[min, max]`.
    pub fn integer(min: i64, max: i64) -> Self {
        Self {
            dtype: ColumnType::Integer,
            nullable: true,
            constraint: Constraint::Range {
                min: min as f64,
                max: max as f64,
            },
        }
    }

    /// Nullable float column bounded by `[min, max]`.
    pub fn float(min: f64, max: f64) -> Self {
        Self {
            dtype: ColumnType::Float,
            nullable: true,
            constraint: Constraint::Range { min, max },
        }
    }

    /// Nullable text column restricted to `categories`.
    pub fn categorical<I, S>(categories: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            dtype: ColumnType::Text,
            nullable: true,
            constraint: Constraint::Isin(categories.into_iter().map(Into::into).collect()),
        }
    }

    /// Forbid nulls in this column.
    pub fn not_null(mut self) -> Self {
        self.nullable = false;
        self
    }

    /// Check the rule is internally consistent.
    pub fn validate(&self, column: &str) -> Result<(), ConfigValidationError> {
        match (&self.dtype, &self.constraint) {
            (dtype, Constraint::Range { min, max }) if dtype.is_numeric() => {
                if !min.is_finite() || !max.is_finite() || min > max {
                    return Err(ConfigValidationError::InvalidRange {
                        column: column.to_string(),
                        min: *min,
                        max: *max,
                    });
                }
                Ok(())
            }
            (ColumnType::Text, Constraint::Isin(categories)) => {
                if categories.is_empty() {
                    return Err(ConfigValidationError::EmptyCategories(column.to_string()));
                }
                Ok(())
            }
            (dtype, constraint) => Err(ConfigValidationError::ConstraintMismatch {
                column: column.to_string(),
                dtype: dtype.to_string(),
                constraint: constraint.kind().to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_integer_rule_is_valid() {
        let rule = ColumnRule::integer(10, 65);
        assert!(rule.nullable);
        assert!(rule.validate("Age").is_ok());
    }

    #[test]
    fn test_inverted_range_rejected() {
        let rule = ColumnRule::float(25.0, 1.0);
        assert!(matches!(
            rule.validate("BS"),
            Err(ConfigValidationError::InvalidRange { .. })
        ));
    }

    #[test]
    fn test_nan_bound_rejected() {
        let rule = ColumnRule::float(f64::NAN, 1.0);
        assert!(rule.validate("BS").is_err());
    }

    #[test]
    fn test_empty_categories_rejected() {
        let rule = ColumnRule::categorical(Vec::<String>::new());
        assert_eq!(
            rule.validate("RiskLevel"),
            Err(ConfigValidationError::EmptyCategories("RiskLevel".to_string()))
        );
    }

    #[test]
    fn test_text_with_range_rejected() {
        let rule = ColumnRule {
            dtype: ColumnType::Text,
            nullable: true,
            constraint: Constraint::Range { min: 0.0, max: 1.0 },
        };
        assert!(matches!(
            rule.validate("RiskLevel"),
            Err(ConfigValidationError::ConstraintMismatch { .. })
        ));
    }

    #[test]
    fn test_rule_from_json() {
        let json = r#"{"dtype": "integer", "constraint": {"range": {"min": 50, "max": 150}}}"#;
        let rule: ColumnRule = serde_json::from_str(json).unwrap();
        assert_eq!(rule, ColumnRule::integer(50, 150));

        let json = r#"{"dtype": "text", "nullable": false, "constraint": {"isin": ["a", "b"]}}"#;
        let rule: ColumnRule = serde_json::from_str(json).unwrap();
        assert_eq!(rule, ColumnRule::categorical(["a", "b"]).not_null());
    }
}
