//! Tag list deduplication and JSON formatting.

use anyhow::Result;
use polars::prelude::*;
use serde_json::{Value, json};
use tracing::debug;

use crate::reporting::{Issue, IssueCategory};

/// Outcome of rewriting a single tags cell.
struct RewrittenTags {
    formatted: String,
    duplicates_removed: usize,
}

/// Deduplicate and reformat the JSON tag lists in the `post_tags` column.
///
/// Each cell holds a JSON array of tag strings. Duplicate tags are dropped
/// while preserving first-appearance order, and every surviving cell is
/// re-serialized in one canonical shape (`["#tech", "#AI"]`, with a space
/// after each comma). Cells that do not parse as an array of strings are
/// left untouched.
pub fn clean_tags(df: &mut DataFrame) -> Result<Vec<Issue>> {
    let mut issues = Vec::new();
    let Ok(column) = df.column("post_tags") else {
        return Ok(issues);
    };
    let series = column.as_materialized_series();
    if series.dtype() != &DataType::String {
        return Ok(issues);
    }

    let str_series = series.str()?;
    let mut values: Vec<Option<String>> = Vec::with_capacity(str_series.len());
    let mut rows_with_duplicates = 0usize;
    let mut total_duplicates = 0usize;
    let mut rows_reformatted = 0usize;

    for opt_val in str_series.into_iter() {
        match opt_val {
            Some(raw) => match rewrite_tags(raw) {
                Some(rewritten) => {
                    if rewritten.duplicates_removed > 0 {
                        rows_with_duplicates += 1;
                        total_duplicates += rewritten.duplicates_removed;
                    } else if rewritten.formatted != raw {
                        rows_reformatted += 1;
                    }
                    values.push(Some(rewritten.formatted));
                }
                None => values.push(Some(raw.to_string())),
            },
            None => values.push(None),
        }
    }

    if rows_with_duplicates > 0 || rows_reformatted > 0 {
        let cleaned = Series::new("post_tags".into(), values);
        df.replace("post_tags", cleaned)?;
    }

    if rows_with_duplicates > 0 {
        debug!(
            "Removed {} duplicate tags from {} rows",
            total_duplicates, rows_with_duplicates
        );
        issues.push(Issue::new(
            IssueCategory::DuplicateTags,
            json!({
                "rows_affected": rows_with_duplicates,
                "total_duplicates_removed": total_duplicates,
                "note": "Deduplicated tags while preserving order",
            }),
        ));
    }
    if rows_reformatted > 0 {
        debug!("Standardized JSON formatting in {} rows", rows_reformatted);
        issues.push(Issue::new(
            IssueCategory::JsonFormatting,
            json!({
                "rows_reformatted": rows_reformatted,
                "format": "[\"#tech\", \"#AI\"]",
                "note": "Standardized to space after comma for consistency",
            }),
        ));
    }

    Ok(issues)
}

/// Parse a tags cell, drop duplicates, and render the canonical form.
///
/// Returns `None` when the cell is not a JSON array made entirely of
/// strings, in which case the caller keeps the original text.
fn rewrite_tags(raw: &str) -> Option<RewrittenTags> {
    let parsed: Value = serde_json::from_str(raw).ok()?;
    let items = parsed.as_array()?;

    let mut tags: Vec<&str> = Vec::with_capacity(items.len());
    for item in items {
        tags.push(item.as_str()?);
    }

    let mut seen: Vec<&str> = Vec::with_capacity(tags.len());
    for tag in tags {
        if !seen.contains(&tag) {
            seen.push(tag);
        }
    }
    let duplicates_removed = items.len() - seen.len();

    Some(RewrittenTags {
        formatted: format_tag_list(&seen),
        duplicates_removed,
    })
}

/// Render a tag list as a JSON array with a space after each comma.
fn format_tag_list(tags: &[&str]) -> String {
    let rendered: Vec<String> = tags
        .iter()
        .map(|tag| serde_json::to_string(tag).unwrap_or_else(|_| format!("\"{tag}\"")))
        .collect();
    format!("[{}]", rendered.join(", "))
}
