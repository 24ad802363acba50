//! Reading and writing delimited datasets.

use crate::error::{Result, ResultExt};
use polars::io::csv::read::{CsvReadOptions, NullValues};
use polars::prelude::*;
use std::fs::File;
use std::path::Path;
use tracing::{debug, info};

/// Field values read as null in addition to empty fields.
pub const NULL_TOKENS: [&str; 18] = [
    "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

/// Read a comma-delimited file with a header row.
///
/// The schema is inferred from every row rather than a prefix, so a column
/// whose only bad value sits near the end is still typed correctly. Empty
/// fields and the [`NULL_TOKENS`] become nulls.
pub fn read_csv(path: &Path) -> Result<DataFrame> {
    let null_values = NULL_TOKENS.iter().map(|token| PlSmallStr::from(*token)).collect();
    let parse_options = CsvParseOptions::default()
        .with_quote_char(Some(b'"'))
        .with_null_values(Some(NullValues::AllColumns(null_values)));

    let df = CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(None)
        .with_parse_options(parse_options)
        .try_into_reader_with_file_path(Some(path.to_path_buf()))
        .context(format!("Failed to open {}", path.display()))?
        .finish()
        .context(format!("Failed to parse {}", path.display()))?;

    debug!(
        "Loaded {} ({} rows x {} columns)",
        path.display(),
        df.height(),
        df.width()
    );
    Ok(df)
}

/// Write `df` as comma-delimited text with a header row, replacing `path`.
pub fn write_csv(df: &mut DataFrame, path: &Path) -> Result<()> {
    let mut file =
        File::create(path).context(format!("Failed to create {}", path.display()))?;

    CsvWriter::new(&mut file)
        .include_header(true)
        .with_separator(b',')
        .with_quote_char(b'"')
        .finish(df)
        .context(format!("Failed to write {}", path.display()))?;

    info!("Dataset saved: {}", path.display());
    Ok(())
}

/// Header names in file order.
pub fn column_names(df: &DataFrame) -> Vec<String> {
    df.get_column_names()
        .into_iter()
        .map(|name| name.to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_round_trip_keeps_nulls_and_order() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data.csv");
        std::fs::write(&path, "Age,BS,RiskLevel\n25,7.5,low risk\n,,\n40,15.0,high risk\n")
            .unwrap();

        let mut df = read_csv(&path).unwrap();
        assert_eq!(df.height(), 3);
        assert_eq!(column_names(&df), vec!["Age", "BS", "RiskLevel"]);
        assert_eq!(df.column("Age").unwrap().null_count(), 1);
        assert_eq!(df.column("Age").unwrap().dtype(), &DataType::Int64);

        let out = dir.path().join("out.csv");
        write_csv(&mut df, &out).unwrap();
        let again = read_csv(&out).unwrap();
        assert!(df.equals_missing(&again));
    }

    #[test]
    fn test_null_tokens_are_read_as_null() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tokens.csv");
        std::fs::write(
            &path,
            "Age,BS,RiskLevel\nNA,7.5,low risk\n30,N/A,null\n41,NaN,mid risk\n",
        )
        .unwrap();

        let df = read_csv(&path).unwrap();
        assert_eq!(df.column("Age").unwrap().dtype(), &DataType::Int64);
        assert_eq!(df.column("Age").unwrap().null_count(), 1);
        assert_eq!(df.column("BS").unwrap().dtype(), &DataType::Float64);
        assert_eq!(df.column("BS").unwrap().null_count(), 2);
        assert_eq!(df.column("RiskLevel").unwrap().null_count(), 1);
    }

    #[test]
    fn test_schema_inferred_from_whole_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("late.csv");
        let mut content = String::from("Age\n");
        for _ in 0..200 {
            content.push_str("30\n");
        }
        content.push_str("abc\n");
        std::fs::write(&path, content).unwrap();

        let df = read_csv(&path).unwrap();
        assert_eq!(df.column("Age").unwrap().dtype(), &DataType::String);
    }

    #[test]
    fn test_missing_file_is_io_level_error() {
        let err = read_csv(Path::new("/nonexistent/raw.csv")).unwrap_err();
        assert_ne!(err.exit_code(), 2);
        assert_ne!(err.exit_code(), 3);
    }
}
