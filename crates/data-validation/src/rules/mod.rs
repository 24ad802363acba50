//! Declarative rule definitions.
//!
//! A [`RuleSet`] pairs one [`ColumnRule`] per declared column with an
//! ordered list of [`TableRule`]s. Rule sets are pure data: they are built
//! once per run, validated on construction and never mutated afterwards.
//!
//! # Example
//!
//! ```rust,ignore
//! use data_validation::rules::{ColumnRule, RuleSet, TableRule};
//!
//! let rules = RuleSet::builder()
//!     .column("Age", ColumnRule::integer(10, 65))
//!     .column("RiskLevel", ColumnRule::categorical(["low risk", "high risk"]))
//!     .table_rule(TableRule::NoDuplicateRows)
//!     .table_rule(TableRule::min_class_share("RiskLevel"))
//!     .build()?;
//! ```

mod column;
mod presets;
mod set;
mod table;

pub use column::{ColumnRule, ColumnType, Constraint};
pub use presets::{MATERNAL_HEALTH_COLUMNS, RISK_LEVELS};
pub use set::{ColumnSpec, RuleSet, RuleSetBuilder, RuleSetConfig};
pub use table::{DEFAULT_MIN_CLASS_SHARE, DEFAULT_MISSING_THRESHOLD, TableRule};
