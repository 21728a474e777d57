//! Shared utilities for the cleaning pipeline.
//!
//! This module contains the cell-level value model and the tolerant numeric
//! parsing helpers used across multiple cleaning passes.

use polars::prelude::*;

// =============================================================================
// Cell Value Model
// =============================================================================

/// A single cell observed from the table, independent of column dtype.
///
/// Passes pattern-match on this instead of coercing whole columns, so a
/// number-typed cell can never be misread as a text date and a missing cell
/// never turns into the string `"nan"` halfway through a pass.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    /// Text content (string columns).
    Text(String),
    /// Numeric content (integer or float columns).
    Number(f64),
    /// Boolean content.
    Bool(bool),
    /// Null/absent.
    Missing,
}

impl CellValue {
    /// Check whether the cell is absent.
    pub fn is_missing(&self) -> bool {
        matches!(self, CellValue::Missing)
    }

    /// Borrow the text content, if this is a text cell.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            CellValue::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Render the cell the way it would appear in a report.
    ///
    /// Integral numbers drop the trailing `.0` and missing renders as
    /// `null`, matching the literal forms users see in the source file.
    pub fn render(&self) -> String {
        match self {
            CellValue::Text(s) => s.clone(),
            CellValue::Number(n) => format_compact_number(*n),
            CellValue::Bool(b) => b.to_string(),
            CellValue::Missing => "null".to_string(),
        }
    }
}

/// Extract every cell of a Series into the [`CellValue`] model.
pub fn column_cells(series: &Series) -> PolarsResult<Vec<CellValue>> {
    match series.dtype() {
        DataType::String => Ok(series
            .str()?
            .into_iter()
            .map(|v| match v {
                Some(s) => CellValue::Text(s.to_string()),
                None => CellValue::Missing,
            })
            .collect()),
        DataType::Boolean => Ok(series
            .bool()?
            .into_iter()
            .map(|v| match v {
                Some(b) => CellValue::Bool(b),
                None => CellValue::Missing,
            })
            .collect()),
        dtype if is_numeric_dtype(dtype) => {
            let floats = series.cast(&DataType::Float64)?;
            Ok(floats
                .f64()?
                .into_iter()
                .map(|v| match v {
                    Some(n) => CellValue::Number(n),
                    None => CellValue::Missing,
                })
                .collect())
        }
        _ => {
            let strings = series.cast(&DataType::String)?;
            Ok(strings
                .str()?
                .into_iter()
                .map(|v| match v {
                    Some(s) => CellValue::Text(s.to_string()),
                    None => CellValue::Missing,
                })
                .collect())
        }
    }
}

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
// Numeric Parsing Utilities
// =============================================================================

/// Formatting characters tolerated (and stripped) when parsing numbers.
pub const NUMERIC_FORMAT_CHARS: [char; 3] = [',', '$', ' '];

/// Clean a string for numeric parsing by removing formatting characters.
pub fn clean_numeric_string(s: &str) -> String {
    s.trim()
        .chars()
        .filter(|c| !NUMERIC_FORMAT_CHARS.contains(c))
        .collect()
}

/// Try to parse a string as a whole number.
///
/// Tolerates grouping commas, currency markers and surrounding whitespace
/// (`"1,234"` parses to `1234`). A fractional value is not a valid count and
/// yields `None` rather than being truncated.
pub fn parse_integer_cell(s: &str) -> Option<i64> {
    let cleaned = clean_numeric_string(s);
    if cleaned.is_empty() {
        return None;
    }
    if let Ok(n) = cleaned.parse::<i64>() {
        return Some(n);
    }
    match cleaned.parse::<f64>() {
        Ok(f) if f.fract() == 0.0 && f >= i64::MIN as f64 && f <= i64::MAX as f64 => {
            Some(f as i64)
        }
        _ => None,
    }
}

/// Try to parse a string as a float, with the same formatting tolerance.
pub fn parse_float_cell(s: &str) -> Option<f64> {
    let cleaned = clean_numeric_string(s);
    if cleaned.is_empty() {
        return None;
    }
    cleaned.parse::<f64>().ok()
}

/// Format a float without a trailing `.0` when it is integral.
///
/// Used when writing repaired values back into text columns so `100.0`
/// round-trips as `100`.
pub fn format_compact_number(n: f64) -> String {
    if n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        format!("{}", n)
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cell_value_render() {
        assert_eq!(CellValue::Text("True".to_string()).render(), "True");
        assert_eq!(CellValue::Number(1.0).render(), "1");
        assert_eq!(CellValue::Number(2.5).render(), "2.5");
        assert_eq!(CellValue::Bool(true).render(), "true");
        assert_eq!(CellValue::Missing.render(), "null");
    }

    #[test]
    fn test_column_cells_string() {
        let series = Series::new("email".into(), &[Some("a@b.com"), None]);
        let cells = column_cells(&series).unwrap();
        assert_eq!(cells[0], CellValue::Text("a@b.com".to_string()));
        assert_eq!(cells[1], CellValue::Missing);
    }

    #[test]
    fn test_column_cells_numeric() {
        let series = Series::new("likes".into(), &[Some(10i64), None, Some(42)]);
        let cells = column_cells(&series).unwrap();
        assert_eq!(cells[0], CellValue::Number(10.0));
        assert_eq!(cells[1], CellValue::Missing);
        assert_eq!(cells[2], CellValue::Number(42.0));
    }

    #[test]
    fn test_column_cells_boolean() {
        let series = Series::new("verified".into(), &[Some(true), Some(false), None]);
        let cells = column_cells(&series).unwrap();
        assert_eq!(cells[0], CellValue::Bool(true));
        assert_eq!(cells[2], CellValue::Missing);
    }

    #[test]
    fn test_clean_numeric_string() {
        assert_eq!(clean_numeric_string("1,234"), "1234");
        assert_eq!(clean_numeric_string("  42  "), "42");
        assert_eq!(clean_numeric_string("$1,000"), "1000");
        assert_eq!(clean_numeric_string("1 000"), "1000");
    }

    #[test]
    fn test_parse_integer_cell() {
        assert_eq!(parse_integer_cell("42"), Some(42));
        assert_eq!(parse_integer_cell("1,234"), Some(1234));
        assert_eq!(parse_integer_cell("-100"), Some(-100));
        assert_eq!(parse_integer_cell("1234.0"), Some(1234));
        assert_eq!(parse_integer_cell("12.5"), None);
        assert_eq!(parse_integer_cell(""), None);
        assert_eq!(parse_integer_cell("abc"), None);
    }

    #[test]
    fn test_parse_float_cell() {
        assert_eq!(parse_float_cell("3.14"), Some(3.14));
        assert_eq!(parse_float_cell("1,000.5"), Some(1000.5));
        assert_eq!(parse_float_cell("not a number"), None);
    }

    #[test]
    fn test_format_compact_number() {
        assert_eq!(format_compact_number(100.0), "100");
        assert_eq!(format_compact_number(-3.0), "-3");
        assert_eq!(format_compact_number(12.5), "12.5");
    }
}
