//! Engagement total repair.
//!
//! Two passes touch `total_engagements`. The first only counts missing
//! values so the report reflects what the source file looked like; the
//! second replaces the whole column with `likes + comments`, which fixes
//! both the mismatched totals and the missing ones in a single rewrite.

use anyhow::Result;
use polars::prelude::*;
use serde_json::json;
use tracing::debug;

use crate::reporting::{Issue, IssueCategory};
use crate::utils::{CellValue, column_cells, parse_integer_cell};

/// Count missing `total_engagements` values before they are recomputed.
pub fn count_missing_engagements(df: &DataFrame) -> Result<Vec<Issue>> {
    let mut issues = Vec::new();
    let Ok(column) = df.column("total_engagements") else {
        return Ok(issues);
    };

    let missing = column.null_count();
    if missing > 0 {
        debug!("Found {} N/A values in total_engagements", missing);
        issues.push(Issue::new(
            IssueCategory::NaValues,
            json!({
                "column": "total_engagements",
                "count": missing,
            }),
        ));
    }

    Ok(issues)
}

/// Recompute `total_engagements` as `likes + comments`.
///
/// Missing likes or comments contribute zero, so the rewritten column
/// never carries nulls. Rows whose stored total disagreed with the sum
/// are reported as mismatches; rows with no stored total as N/A fills.
/// Skipped entirely when any of the three columns is absent.
pub fn recalculate_engagements(df: &mut DataFrame) -> Result<Vec<Issue>> {
    let mut issues = Vec::new();
    let (Ok(likes_col), Ok(comments_col), Ok(totals_col)) = (
        df.column("likes"),
        df.column("comments"),
        df.column("total_engagements"),
    ) else {
        return Ok(issues);
    };

    let likes = column_cells(likes_col.as_materialized_series())?;
    let comments = column_cells(comments_col.as_materialized_series())?;
    let totals = column_cells(totals_col.as_materialized_series())?;

    let mut calculated: Vec<i64> = Vec::with_capacity(totals.len());
    let mut mismatches = 0usize;
    let mut na_count = 0usize;

    for idx in 0..totals.len() {
        let expected =
            cell_to_i64(&likes[idx]).unwrap_or(0) + cell_to_i64(&comments[idx]).unwrap_or(0);
        match cell_to_i64(&totals[idx]) {
            Some(stored) if stored != expected => mismatches += 1,
            Some(_) => {}
            None => na_count += 1,
        }
        calculated.push(expected);
    }

    let recomputed = Series::new("total_engagements".into(), calculated);
    df.replace("total_engagements", recomputed)?;

    if mismatches > 0 || na_count > 0 {
        debug!(
            "Fixed {} incorrect calculations ({} mismatches, {} N/A)",
            mismatches + na_count,
            mismatches,
            na_count
        );
        issues.push(Issue::new(
            IssueCategory::CalculationErrors,
            json!({
                "column": "total_engagements",
                "mismatches": mismatches,
                "na_values": na_count,
            }),
        ));
    }

    Ok(issues)
}

/// Read a cell as a whole number, treating unparseable text as missing.
fn cell_to_i64(cell: &CellValue) -> Option<i64> {
    match cell {
        CellValue::Text(text) => parse_integer_cell(text),
        CellValue::Number(value) if value.fract() == 0.0 => Some(*value as i64),
        CellValue::Number(_) => None,
        CellValue::Bool(_) | CellValue::Missing => None,
    }
}
