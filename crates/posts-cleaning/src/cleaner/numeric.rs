//! Numeric field normalization.

use anyhow::Result;
use polars::prelude::*;
use serde_json::json;
use tracing::debug;

use crate::reporting::{Issue, IssueCategory};
use crate::utils::{is_numeric_dtype, parse_integer_cell};

/// Count-like columns normalized to Int64.
pub const NUMERIC_COLUMNS: [&str; 5] = [
    "likes",
    "comments",
    "shares",
    "total_engagements",
    "author_follower_count",
];

/// Strip stray quote characters from the count columns and coerce them to
/// integers.
///
/// Cells that contain a quote (`"` or `'`) are counted per column before the
/// quotes are removed. Whatever remains is parsed with grouping-comma
/// tolerance; cells that still fail to parse become null.
pub fn clean_numeric_fields(df: &mut DataFrame) -> Result<Vec<Issue>> {
    let mut issues = Vec::new();

    for col_name in NUMERIC_COLUMNS {
        let Ok(column) = df.column(col_name) else {
            continue;
        };
        let series = column.as_materialized_series();

        if series.dtype() == &DataType::String {
            let (cleaned, quoted) = strip_quotes_and_parse(series)?;
            df.replace(col_name, cleaned)?;

            if quoted > 0 {
                debug!("Fixed {} quoted values in '{}'", quoted, col_name);
                issues.push(Issue::new(
                    IssueCategory::NumericQuoteIssues,
                    json!({"column": col_name, "count": quoted}),
                ));
            }
        } else if is_numeric_dtype(series.dtype()) && series.dtype() != &DataType::Int64 {
            let casted = series.cast(&DataType::Int64)?;
            df.replace(col_name, casted)?;
        }
    }

    Ok(issues)
}

/// Remove quote characters from every cell and parse the remainder as an
/// integer. Returns the parsed series and the number of cells that carried
/// quotes.
pub(crate) fn strip_quotes_and_parse(series: &Series) -> Result<(Series, usize)> {
    let str_series = series.str()?;
    let mut quoted = 0usize;
    let mut values: Vec<Option<i64>> = Vec::with_capacity(str_series.len());

    for opt_val in str_series.into_iter() {
        match opt_val {
            Some(val) => {
                if val.contains('"') || val.contains('\'') {
                    quoted += 1;
                }
                let stripped: String = val.chars().filter(|c| *c != '"' && *c != '\'').collect();
                values.push(parse_integer_cell(&stripped));
            }
            None => values.push(None),
        }
    }

    Ok((Series::new(series.name().clone(), values), quoted))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn int_at(series: &Series, idx: usize) -> Option<i64> {
        match series.get(idx).unwrap() {
            AnyValue::Int64(v) => Some(v),
            AnyValue::Null => None,
            other => panic!("Expected Int64, got {:?}", other),
        }
    }

    #[test]
    fn test_strips_quotes_and_parses() {
        let series = Series::new(
            "likes".into(),
            &[Some("\"1,234\""), Some("'42'"), Some("100"), None],
        );
        let (cleaned, quoted) = strip_quotes_and_parse(&series).unwrap();

        assert_eq!(quoted, 2);
        assert_eq!(cleaned.dtype(), &DataType::Int64);
        assert_eq!(int_at(&cleaned, 0), Some(1234));
        assert_eq!(int_at(&cleaned, 1), Some(42));
        assert_eq!(int_at(&cleaned, 2), Some(100));
        assert_eq!(int_at(&cleaned, 3), None);
    }

    #[test]
    fn test_unparseable_becomes_null() {
        let series = Series::new("shares".into(), &["12", "garbage", ""]);
        let (cleaned, quoted) = strip_quotes_and_parse(&series).unwrap();

        assert_eq!(quoted, 0);
        assert_eq!(int_at(&cleaned, 0), Some(12));
        assert_eq!(int_at(&cleaned, 1), None);
        assert_eq!(int_at(&cleaned, 2), None);
    }

    #[test]
    fn test_clean_numeric_fields_records_per_column() {
        let mut df = df!(
            "likes" => &["\"500\"", "10"],
            "comments" => &["3", "4"],
            "post_text" => &["hello", "world"],
        )
        .unwrap();

        let issues = clean_numeric_fields(&mut df).unwrap();

        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].category, IssueCategory::NumericQuoteIssues);
        assert_eq!(issues[0].details["column"], "likes");
        assert_eq!(issues[0].details["count"], 1);

        assert_eq!(df.column("likes").unwrap().dtype(), &DataType::Int64);
        assert_eq!(df.column("comments").unwrap().dtype(), &DataType::Int64);
        assert_eq!(df.column("post_text").unwrap().dtype(), &DataType::String);
    }

    #[test]
    fn test_missing_columns_are_skipped() {
        let mut df = df!("post_text" => &["only text"]).unwrap();
        let issues = clean_numeric_fields(&mut df).unwrap();
        assert!(issues.is_empty());
    }
}
