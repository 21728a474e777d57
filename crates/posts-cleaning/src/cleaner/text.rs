//! Text field cleanup: trailing corruption pattern and location placeholders.

use anyhow::Result;
use once_cell::sync::Lazy;
use polars::prelude::*;
use regex::Regex;
use serde_json::json;
use tracing::debug;

use crate::reporting::{Issue, IssueCategory};

static EXTRA_COMMAS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r",\s*extra,\s*commas\s*$").expect("Invalid regex: extra commas"));

/// Strip the trailing `, extra, commas` corruption from `post_text` and
/// normalize `location` placeholders to null.
///
/// Only the corruption repair is recorded; location cleanup is routine
/// tidying.
pub fn clean_text_fields(df: &mut DataFrame) -> Result<Vec<Issue>> {
    let mut issues = Vec::new();

    if let Ok(column) = df.column("post_text")
        && column.as_materialized_series().dtype() == &DataType::String
    {
        let str_series = column.as_materialized_series().str()?;
        let mut affected = 0usize;
        let mut values: Vec<Option<String>> = Vec::with_capacity(str_series.len());

        for opt_val in str_series.into_iter() {
            match opt_val {
                Some(val) => {
                    let repaired = strip_extra_commas(val);
                    if repaired != val {
                        affected += 1;
                    }
                    values.push(Some(repaired));
                }
                None => values.push(None),
            }
        }

        if affected > 0 {
            let repaired = Series::new("post_text".into(), values);
            df.replace("post_text", repaired)?;
            debug!("Removed corruption pattern from {} rows", affected);
            issues.push(Issue::new(
                IssueCategory::TextCorruption,
                json!({"pattern": "extra_commas", "count": affected}),
            ));
        }
    }

    if let Ok(column) = df.column("location")
        && column.as_materialized_series().dtype() == &DataType::String
    {
        let str_series = column.as_materialized_series().str()?;
        let mut changed = false;
        let mut values: Vec<Option<String>> = Vec::with_capacity(str_series.len());

        for opt_val in str_series.into_iter() {
            match opt_val {
                Some(val) => {
                    let normalized = normalize_location(val);
                    if normalized.as_deref() != Some(val) {
                        changed = true;
                    }
                    values.push(normalized);
                }
                None => values.push(None),
            }
        }

        if changed {
            let normalized = Series::new("location".into(), values);
            df.replace("location", normalized)?;
        }
    }

    Ok(issues)
}

/// Remove the end-anchored `, extra, commas` pattern, repeating in case the
/// corruption was appended more than once.
pub fn strip_extra_commas(value: &str) -> String {
    let mut out = value.to_string();
    while EXTRA_COMMAS.is_match(&out) {
        out = EXTRA_COMMAS.replace(&out, "").into_owned();
    }
    out
}

/// Trim a location value, mapping placeholder forms to null.
pub fn normalize_location(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() || trimmed == "nan" || trimmed == "None" {
        None
    } else {
        Some(trimmed.to_string())
    }
}
