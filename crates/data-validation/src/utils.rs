//! Shared helpers for the checkers.

use polars::prelude::*;

// =============================================================================
// Data Type Utilities
// =============================================================================

/// Check if a DataType is numeric (integer or float).
#[inline]
pub fn is_numeric_dtype(dtype: &DataType) -> bool {
    matches!(
        dtype,
        DataType::Int8
            | DataType::Int16
            | DataType::Int32
            | DataType::Int64
            | DataType::UInt8
            | DataType::UInt16
            | DataType::UInt32
            | DataType::UInt64
            | DataType::Float32
            | DataType::Float64
    )
}

// =============================================================================
// Cell Views
// =============================================================================

/// Render every cell of a column as text, `None` for nulls.
///
/// Used wherever values are compared or reported regardless of the
/// column's physical type.
pub fn text_cells(series: &Series) -> PolarsResult<Vec<Option<String>>> {
    let as_text = series.cast(&DataType::String)?;
    Ok(as_text
        .str()?
        .into_iter()
        .map(|v| v.map(str::to_owned))
        .collect())
}

/// Read every cell of a numeric column as `f64`, `None` for nulls.
pub fn float_cells(series: &Series) -> PolarsResult<Vec<Option<f64>>> {
    let as_float = series.cast(&DataType::Float64)?;
    Ok(as_float.f64()?.into_iter().collect())
}

// =============================================================================
// String Parsing Utilities
// =============================================================================

/// Parse a text cell as a number.
///
/// Only surrounding whitespace is tolerated; currency symbols, thousands
/// separators and units make the cell a type mismatch.
pub fn parse_number(s: &str) -> Option<f64> {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse::<f64>().ok()
}

/// Whether `value` has no fractional part.
#[inline]
pub fn is_whole_number(value: f64) -> bool {
    value.is_finite() && value.fract() == 0.0
}

/// Render a number the way it is reported in failure cases.
pub fn format_number(value: f64) -> String {
    format!("{}", value)
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_numeric_dtype() {
        assert!(is_numeric_dtype(&DataType::Int64));
        assert!(is_numeric_dtype(&DataType::Float64));
        assert!(!is_numeric_dtype(&DataType::String));
        assert!(!is_numeric_dtype(&DataType::Boolean));
    }

    #[test]
    fn test_parse_number() {
        assert_eq!(parse_number("42"), Some(42.0));
        assert_eq!(parse_number(" 98.6 "), Some(98.6));
        assert_eq!(parse_number("-3"), Some(-3.0));
        assert_eq!(parse_number(""), None);
        assert_eq!(parse_number("abc"), None);
        assert_eq!(parse_number("$100"), None);
    }

    #[test]
    fn test_is_whole_number() {
        assert!(is_whole_number(25.0));
        assert!(!is_whole_number(25.5));
        assert!(!is_whole_number(f64::NAN));
    }

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(200.0), "200");
        assert_eq!(format_number(98.6), "98.6");
    }

    #[test]
    fn test_text_cells_keeps_nulls() {
        let series = Series::new("test".into(), &[Some(1i64), None, Some(3)]);
        let cells = text_cells(&series).unwrap();
        assert_eq!(
            cells,
            vec![Some("1".to_string()), None, Some("3".to_string())]
        );
    }

    #[test]
    fn test_float_cells() {
        let series = Series::new("test".into(), &[Some(1i64), None]);
        assert_eq!(float_cells(&series).unwrap(), vec![Some(1.0), None]);
    }
}
