//! Data quality checks.
//!
//! Three layers, run in order by the
//! [`Validator`](crate::pipeline::Validator):
//!
//! - [`structural`]: file extension and exact column set. Failures abort.
//! - [`ColumnChecker`]: per-cell type, nullability, range and category rules.
//! - [`TableChecker`]: whole-table invariants such as duplicates and
//!   class balance.
//!
//! The last two never fail on bad data; they return violations.

mod column_checker;
pub mod structural;
mod table_checker;

pub use column_checker::ColumnChecker;
pub use structural::{check_column_set, check_file_format};
pub use table_checker::{TableChecker, TableVerdict};
