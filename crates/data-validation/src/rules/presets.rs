use super::column::ColumnRule;
use super::set::RuleSet;
use super::table::TableRule;
use crate::config::ConfigValidationError;

/// Header of the maternal health risk dataset, in file order.
pub const MATERNAL_HEALTH_COLUMNS: [&str; 7] = [
    "Age",
    "SystolicBP",
    "DiastolicBP",
    "BS",
    "BodyTemp",
    "HeartRate",
    "RiskLevel",
];

/// Target labels of the maternal health risk dataset.
pub const RISK_LEVELS: [&str; 3] = ["low risk", "mid risk", "high risk"];

impl RuleSet {
    /// Rules for the UCI maternal health risk dataset.
    ///
    /// Ranges bound physiologically plausible values; every column is
    /// nullable so that missingness is judged by the table rule alone.
    pub fn maternal_health() -> Result<Self, ConfigValidationError> {
        RuleSet::builder()
            .column("Age", ColumnRule::integer(10, 65))
            .column("SystolicBP", ColumnRule::integer(60, 200))
            .column("DiastolicBP", ColumnRule::integer(40, 140))
            .column("BS", ColumnRule::float(1.0, 25.0))
            .column("BodyTemp", ColumnRule::float(95.0, 105.0))
            .column("HeartRate", ColumnRule::integer(50, 150))
            .column("RiskLevel", ColumnRule::categorical(RISK_LEVELS))
            .table_rule(TableRule::NoDuplicateRows)
            .table_rule(TableRule::NoEmptyRows)
            .table_rule(TableRule::max_missing_fraction())
            .table_rule(TableRule::min_class_share("RiskLevel"))
            .table_rule(TableRule::NoConstantColumns)
            .build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preset_declares_expected_header() {
        let rules = RuleSet::maternal_health().unwrap();
        assert_eq!(
            rules.column_names().collect::<Vec<_>>(),
            MATERNAL_HEALTH_COLUMNS.to_vec()
        );
        assert_eq!(rules.table_rules().len(), 5);
        assert_eq!(rules.numeric_columns().count(), 6);
    }

    #[test]
    fn test_shipped_json_matches_preset() {
        let json = include_str!("../../../../config/maternal_health_rules.json");
        let from_file = RuleSet::from_json_str(json).unwrap();
        assert_eq!(from_file, RuleSet::maternal_health().unwrap());
    }
}
