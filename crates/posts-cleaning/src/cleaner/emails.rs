//! Email address repair.

use anyhow::Result;
use once_cell::sync::Lazy;
use polars::prelude::*;
use regex::Regex;
use serde_json::json;
use tracing::debug;

use crate::reporting::{Issue, IssueCategory};

static MULTI_AT: Lazy<Regex> =
    Lazy::new(|| Regex::new("@{2,}").expect("Invalid regex: repeated @"));
static MULTI_DOT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\.{2,}").expect("Invalid regex: repeated ."));

/// Outcome of repairing one email value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailRepair {
    pub repaired: String,
    pub had_double_at: bool,
    pub had_double_dots: bool,
}

/// Collapse repeated `@` and `.` runs in `author_email`.
///
/// Rows containing `@@` are counted, then rows still containing `..` after
/// the `@` repair. Each run collapses to a single character in one
/// substitution, so repairing an already-repaired value changes nothing.
pub fn clean_emails(df: &mut DataFrame) -> Result<Vec<Issue>> {
    let mut issues = Vec::new();
    let Ok(column) = df.column("author_email") else {
        return Ok(issues);
    };
    let series = column.as_materialized_series();
    if series.dtype() != &DataType::String {
        return Ok(issues);
    }

    let str_series = series.str()?;
    let mut double_at = 0usize;
    let mut double_dots = 0usize;
    let mut values: Vec<Option<String>> = Vec::with_capacity(str_series.len());

    for opt_val in str_series.into_iter() {
        match opt_val {
            Some(val) => {
                let repair = repair_email(val);
                if repair.had_double_at {
                    double_at += 1;
                }
                if repair.had_double_dots {
                    double_dots += 1;
                }
                values.push(Some(repair.repaired));
            }
            None => values.push(None),
        }
    }

    let total = double_at + double_dots;
    if total > 0 {
        let repaired = Series::new("author_email".into(), values);
        df.replace("author_email", repaired)?;
        debug!(
            "Repaired {} corrupted emails ({} double @, {} double .)",
            total, double_at, double_dots
        );
        issues.push(Issue::new(
            IssueCategory::EmailCorruption,
            json!({"double_at": double_at, "double_dots": double_dots, "total": total}),
        ));
    }

    Ok(issues)
}

/// Repair one email value, reporting which defects it carried.
pub fn repair_email(value: &str) -> EmailRepair {
    let had_double_at = value.contains("@@");
    let after_at = MULTI_AT.replace_all(value, "@");

    let had_double_dots = after_at.contains("..");
    let repaired = MULTI_DOT.replace_all(&after_at, ".").into_owned();

    EmailRepair {
        repaired,
        had_double_at,
        had_double_dots,
    }
}
