//! Missing SVG image normalization.

use anyhow::Result;
use polars::prelude::*;
use serde_json::json;
use tracing::debug;

use crate::reporting::{Issue, IssueCategory};

/// Normalize placeholder `post_image_svg` values to null.
///
/// Whitespace-only cells and the literal `nan` marker both mean "no image";
/// they are rewritten as null, which serializes to an empty CSV field. Cells
/// that are already null need no repair and are not counted, so a cleaned
/// file reports nothing on a second run.
pub fn clean_svg_placeholders(df: &mut DataFrame) -> Result<Vec<Issue>> {
    let mut issues = Vec::new();
    let Ok(column) = df.column("post_image_svg") else {
        return Ok(issues);
    };
    let series = column.as_materialized_series();
    if series.dtype() != &DataType::String {
        return Ok(issues);
    }

    let total_rows = series.len();
    let str_series = series.str()?;
    let mut missing = 0usize;
    let mut values: Vec<Option<String>> = Vec::with_capacity(total_rows);

    for opt_val in str_series.into_iter() {
        match opt_val {
            Some(val) if is_placeholder(val) => {
                missing += 1;
                values.push(None);
            }
            Some(val) => values.push(Some(val.to_string())),
            None => values.push(None),
        }
    }

    if missing > 0 {
        let normalized = Series::new("post_image_svg".into(), values);
        df.replace("post_image_svg", normalized)?;

        let percentage = if total_rows > 0 {
            ((missing as f64 / total_rows as f64) * 1000.0).round() / 10.0
        } else {
            0.0
        };
        debug!(
            "Standardized {} missing SVG images ({:.1}%)",
            missing, percentage
        );
        issues.push(Issue::new(
            IssueCategory::MissingSvgImages,
            json!({
                "count": missing,
                "percentage": percentage,
                "note": "Standardized to empty string (NULL in database)",
            }),
        ));
    }

    Ok(issues)
}

/// A cell that should be treated as "no image present".
fn is_placeholder(value: &str) -> bool {
    value.trim().is_empty() || value == "nan"
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_placeholders_become_null() {
        let mut df = df!(
            "post_image_svg" => &[
                Some("<svg>...</svg>"),
                Some("   "),
                Some("nan"),
                None,
            ],
        )
        .unwrap();

        let issues = clean_svg_placeholders(&mut df).unwrap();

        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].details["count"], 2);
        assert_eq!(issues[0].details["percentage"], 50.0);
        assert_eq!(
            issues[0].details["note"],
            "Standardized to empty string (NULL in database)"
        );

        let col = df.column("post_image_svg").unwrap();
        assert_eq!(col.null_count(), 3);
        assert_eq!(col.str().unwrap().get(0), Some("<svg>...</svg>"));
    }

    #[test]
    fn test_already_null_cells_not_counted() {
        let mut df = df!(
            "post_image_svg" => &[None::<&str>, Some("<svg/>")],
        )
        .unwrap();

        let issues = clean_svg_placeholders(&mut df).unwrap();
        assert!(issues.is_empty());
    }

    #[test]
    fn test_percentage_rounds_to_one_decimal() {
        let values: Vec<Option<&str>> = (0..3)
            .map(|i| if i == 0 { Some("   ") } else { Some("<svg/>") })
            .collect();
        let mut df = df!("post_image_svg" => &values).unwrap();

        let issues = clean_svg_placeholders(&mut df).unwrap();
        // 1 of 3 rows: 33.333...% rounds to 33.3.
        assert_eq!(issues[0].details["percentage"], 33.3);
    }
}
