use super::column::{ColumnRule, ColumnType};
use super::table::TableRule;
use crate::config::ConfigValidationError;
use crate::error::{Result, ResultExt};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;

/// One declared column, in header order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnSpec {
    pub name: String,
    #[serde(flatten)]
    pub rule: ColumnRule,
}

/// Serialized form of a [`RuleSet`].
///
/// Deserializing a `RuleSetConfig` does not validate it; go through
/// [`RuleSet::from_config`] for that.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuleSetConfig {
    #[serde(default = "default_extension")]
    pub expected_extension: String,
    pub columns: Vec<ColumnSpec>,
    #[serde(default)]
    pub table_rules: Vec<TableRule>,
}

fn default_extension() -> String {
    ".csv".to_string()
}

/// Immutable, validated set of column and table rules.
///
/// A `RuleSet` can only be obtained through [`RuleSet::builder`],
/// [`RuleSet::from_config`] or one of the loaders, all of which reject
/// incomplete or inconsistent declarations.
#[derive(Debug, Clone, PartialEq)]
pub struct RuleSet {
    expected_extension: String,
    columns: Vec<ColumnSpec>,
    table_rules: Vec<TableRule>,
}

impl RuleSet {
    pub fn builder() -> RuleSetBuilder {
        RuleSetBuilder::default()
    }

    /// Validate a deserialized configuration into a rule set.
    pub fn from_config(config: RuleSetConfig) -> std::result::Result<Self, ConfigValidationError> {
        let RuleSetConfig {
            expected_extension,
            columns,
            table_rules,
        } = config;

        if !expected_extension.starts_with('.') || expected_extension.len() < 2 {
            return Err(ConfigValidationError::InvalidExtension(expected_extension));
        }

        if columns.is_empty() {
            return Err(ConfigValidationError::EmptyRuleSet);
        }

        let mut seen = HashSet::new();
        for spec in &columns {
            if !seen.insert(spec.name.as_str()) {
                return Err(ConfigValidationError::DuplicateColumn(spec.name.clone()));
            }
            spec.rule.validate(&spec.name)?;
        }

        for rule in &table_rules {
            rule.validate()?;
            if let TableRule::MinClassShare { target, .. } = rule {
                let spec = columns
                    .iter()
                    .find(|c| &c.name == target)
                    .ok_or_else(|| ConfigValidationError::UnknownTargetColumn(target.clone()))?;
                if spec.rule.dtype != ColumnType::Text {
                    return Err(ConfigValidationError::TargetNotCategorical(target.clone()));
                }
            }
        }

        Ok(Self {
            expected_extension,
            columns,
            table_rules,
        })
    }

    /// Parse and validate a JSON rule declaration.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: RuleSetConfig = serde_json::from_str(json)
            .map_err(|e| ConfigValidationError::MalformedRules(e.to_string()))?;
        Ok(Self::from_config(config)?)
    }

    /// Load and validate a JSON rule file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .context(format!("Failed to read rule file {}", path.display()))?;
        Self::from_json_str(&content).context(format!("Invalid rule file {}", path.display()))
    }

    /// Serializable copy of this rule set.
    pub fn to_config(&self) -> RuleSetConfig {
        RuleSetConfig {
            expected_extension: self.expected_extension.clone(),
            columns: self.columns.clone(),
            table_rules: self.table_rules.clone(),
        }
    }

    pub fn expected_extension(&self) -> &str {
        &self.expected_extension
    }

    /// Declared columns in declaration order.
    pub fn columns(&self) -> &[ColumnSpec] {
        &self.columns
    }

    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|c| c.name.as_str())
    }

    /// Look up the rule declared for `name`.
    pub fn column(&self, name: &str) -> Option<&ColumnRule> {
        self.columns.iter().find(|c| c.name == name).map(|c| &c.rule)
    }

    /// Declared numeric columns in declaration order.
    pub fn numeric_columns(&self) -> impl Iterator<Item = &str> {
        self.columns
            .iter()
            .filter(|c| c.rule.dtype.is_numeric())
            .map(|c| c.name.as_str())
    }

    pub fn table_rules(&self) -> &[TableRule] {
        &self.table_rules
    }
}

/// Builder for [`RuleSet`].
#[derive(Debug, Default)]
pub struct RuleSetBuilder {
    expected_extension: Option<String>,
    columns: Vec<ColumnSpec>,
    table_rules: Vec<TableRule>,
}

impl RuleSetBuilder {
    /// Expected input file extension, including the dot. Default: ".csv".
    pub fn expected_extension(mut self, extension: impl Into<String>) -> Self {
        self.expected_extension = Some(extension.into());
        self
    }

    /// Declare a column. Declaration order is the expected header order.
    pub fn column(mut self, name: impl Into<String>, rule: ColumnRule) -> Self {
        self.columns.push(ColumnSpec {
            name: name.into(),
            rule,
        });
        self
    }

    /// Append a table rule. Rules are evaluated in insertion order.
    pub fn table_rule(mut self, rule: TableRule) -> Self {
        self.table_rules.push(rule);
        self
    }

    pub fn build(self) -> std::result::Result<RuleSet, ConfigValidationError> {
        RuleSet::from_config(RuleSetConfig {
            expected_extension: self.expected_extension.unwrap_or_else(default_extension),
            columns: self.columns,
            table_rules: self.table_rules,
        })
    }
}
