//! Column header normalization.

use anyhow::Result;
use polars::prelude::*;
use serde_json::json;
use tracing::debug;

use crate::reporting::{Issue, IssueCategory};

/// Strip surrounding whitespace from every column name.
///
/// Exports frequently arrive with trailing spaces in the header row, which
/// breaks column lookups in every later pass. Each rename is recorded with
/// the old and new name.
pub fn clean_headers(df: &mut DataFrame) -> Result<Vec<Issue>> {
    let mut issues = Vec::new();
    let column_names: Vec<String> = df
        .get_column_names()
        .into_iter()
        .map(|s| s.to_string())
        .collect();

    for name in &column_names {
        let fixed = name.trim();
        if fixed != name {
            df.rename(name, fixed.into())?;
            debug!("Renamed column '{}' to '{}'", name, fixed);
            issues.push(Issue::new(
                IssueCategory::HeaderIssues,
                json!({"column": name, "fixed": fixed}),
            ));
        }
    }

    Ok(issues)
}
