//! Boolean field normalization.

use anyhow::Result;
use polars::prelude::*;
use serde_json::json;
use tracing::debug;

use crate::reporting::{Issue, IssueCategory};
use crate::utils::{CellValue, column_cells};

/// Literal forms accepted without being flagged as inconsistent.
const CANONICAL_FORMS: [&str; 4] = ["true", "True", "false", "False"];

/// Normalize `author_verified` to a proper boolean column.
///
/// Heterogeneous literal forms (`"True"`, `"1"`, `1`, `"0"`, ...) are mapped
/// onto true/false; anything unrecognized, including missing, defaults to
/// false. The distinct original forms are recorded (in first-appearance
/// order) whenever a non-canonical form shows up or more than two distinct
/// forms exist.
pub fn clean_booleans(df: &mut DataFrame) -> Result<Vec<Issue>> {
    let mut issues = Vec::new();
    let Ok(column) = df.column("author_verified") else {
        return Ok(issues);
    };
    let cells = column_cells(column.as_materialized_series())?;

    let mut forms: Vec<String> = Vec::new();
    let mut has_non_canonical = false;
    let mut values: Vec<bool> = Vec::with_capacity(cells.len());

    for cell in &cells {
        let rendered = cell.render();
        if !forms.contains(&rendered) {
            if !CANONICAL_FORMS.contains(&rendered.as_str()) {
                has_non_canonical = true;
            }
            forms.push(rendered);
        }
        values.push(parse_boolean_cell(cell));
    }

    let series = Series::new("author_verified".into(), values);
    df.replace("author_verified", series)?;

    if has_non_canonical || forms.len() > 2 {
        debug!("Normalized boolean forms: {:?}", forms);
        issues.push(Issue::new(
            IssueCategory::BooleanInconsistencies,
            json!({"column": "author_verified", "original_values": forms}),
        ));
    }

    Ok(issues)
}

/// Map one cell onto a boolean. Unrecognized and missing values are false.
pub(crate) fn parse_boolean_cell(cell: &CellValue) -> bool {
    match cell {
        CellValue::Text(s) => matches!(s.as_str(), "true" | "True" | "1"),
        CellValue::Number(n) => *n == 1.0,
        CellValue::Bool(b) => *b,
        CellValue::Missing => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn bool_at(df: &DataFrame, idx: usize) -> bool {
        match df.column("author_verified").unwrap().get(idx).unwrap() {
            AnyValue::Boolean(b) => b,
            other => panic!("Expected boolean, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_boolean_cell() {
        assert!(parse_boolean_cell(&CellValue::Text("true".to_string())));
        assert!(parse_boolean_cell(&CellValue::Text("True".to_string())));
        assert!(parse_boolean_cell(&CellValue::Text("1".to_string())));
        assert!(!parse_boolean_cell(&CellValue::Text("false".to_string())));
        assert!(!parse_boolean_cell(&CellValue::Text("0".to_string())));
        assert!(!parse_boolean_cell(&CellValue::Text("TRUE".to_string())));
        assert!(!parse_boolean_cell(&CellValue::Text("maybe".to_string())));
        assert!(parse_boolean_cell(&CellValue::Number(1.0)));
        assert!(!parse_boolean_cell(&CellValue::Number(0.0)));
        assert!(!parse_boolean_cell(&CellValue::Number(2.0)));
        assert!(!parse_boolean_cell(&CellValue::Missing));
    }

    #[test]
    fn test_mixed_forms_are_normalized_and_recorded() {
        let mut df = df!(
            "author_verified" => &[Some("True"), Some("false"), Some("1"), Some("0"), None],
        )
        .unwrap();

        let issues = clean_booleans(&mut df).unwrap();

        assert_eq!(
            df.column("author_verified").unwrap().dtype(),
            &DataType::Boolean
        );
        assert!(bool_at(&df, 0));
        assert!(!bool_at(&df, 1));
        assert!(bool_at(&df, 2));
        assert!(!bool_at(&df, 3));
        assert!(!bool_at(&df, 4));

        assert_eq!(issues.len(), 1);
        let forms = issues[0].details["original_values"].as_array().unwrap();
        let forms: Vec<&str> = forms.iter().map(|v| v.as_str().unwrap()).collect();
        assert_eq!(forms, vec!["True", "false", "1", "0", "null"]);
    }

    #[test]
    fn test_clean_two_form_column_is_silent() {
        let mut df = df!("author_verified" => &["true", "false", "true"]).unwrap();
        let issues = clean_booleans(&mut df).unwrap();

        assert!(issues.is_empty());
        assert!(bool_at(&df, 0));
        assert!(!bool_at(&df, 1));
    }

    #[test]
    fn test_three_canonical_forms_still_flagged() {
        let mut df = df!("author_verified" => &["true", "True", "false"]).unwrap();
        let issues = clean_booleans(&mut df).unwrap();

        assert_eq!(issues.len(), 1);
    }

    #[test]
    fn test_already_boolean_column_passes_through() {
        let mut df = df!("author_verified" => &[true, false]).unwrap();
        let issues = clean_booleans(&mut df).unwrap();

        assert!(issues.is_empty());
        assert!(bool_at(&df, 0));
        assert!(!bool_at(&df, 1));
    }

    #[test]
    fn test_absent_column_is_skipped() {
        let mut df = df!("likes" => &[1i64]).unwrap();
        let issues = clean_booleans(&mut df).unwrap();
        assert!(issues.is_empty());
    }
}
