//! Free-text sanitization.
//!
//! Strips SQL injection fragments and control characters from the free-text
//! columns. The repair loops to a fixed point so removing one fragment (or a
//! control character inside it) can never leave another behind.

use anyhow::Result;
use polars::prelude::*;
use serde_json::json;
use tracing::debug;

use crate::reporting::{Issue, IssueCategory};

/// Free-text columns subject to sanitization, in processing order.
pub const SANITIZED_COLUMNS: [&str; 4] = [
    "author_bio",
    "post_text",
    "author_first_name",
    "author_last_name",
];

/// Injection fragments removed outright.
pub const INJECTION_PATTERNS: [&str; 2] = ["';--", "'OR'1'='1"];

/// Remove injection fragments and control characters from the free-text
/// columns. Returns one summary issue when any field changed.
pub fn sanitize_text_fields(df: &mut DataFrame) -> Result<Vec<Issue>> {
    let mut issues = Vec::new();
    let mut fields_sanitized = 0usize;

    for col_name in SANITIZED_COLUMNS {
        let Ok(column) = df.column(col_name) else {
            continue;
        };
        let series = column.as_materialized_series();
        if series.dtype() != &DataType::String {
            continue;
        }

        let str_series = series.str()?;
        let mut changed = 0usize;
        let mut values: Vec<Option<String>> = Vec::with_capacity(str_series.len());

        for opt_val in str_series.into_iter() {
            match opt_val {
                Some(val) => {
                    let sanitized = sanitize_text(val);
                    if sanitized != val {
                        changed += 1;
                    }
                    values.push(Some(sanitized));
                }
                None => values.push(None),
            }
        }

        if changed > 0 {
            debug!("Sanitized {} values in '{}'", changed, col_name);
            let sanitized = Series::new(col_name.into(), values);
            df.replace(col_name, sanitized)?;
            fields_sanitized += changed;
        }
    }

    if fields_sanitized > 0 {
        issues.push(Issue::new(
            IssueCategory::SpecialCharSanitization,
            json!({
                "fields_sanitized": fields_sanitized,
                "patterns_removed": ["';--", "'OR'1'='1", "\\n", "\\t", "\\r", "\\x00"],
                "note": "Removed SQL injection patterns and control characters for security",
            }),
        ));
    }

    Ok(issues)
}

/// Sanitize one text value.
///
/// Injection fragments are removed, newlines and tabs become single spaces,
/// and carriage returns and NUL bytes are dropped. The whole sequence
/// repeats until the value stops changing.
pub fn sanitize_text(value: &str) -> String {
    let mut out = value.to_string();
    loop {
        let mut next = out.clone();

        for pattern in INJECTION_PATTERNS {
            while next.contains(pattern) {
                next = next.replace(pattern, "");
            }
        }
        next = next.replace('\n', " ").replace('\t', " ");
        next.retain(|c| c != '\r' && c != '\0');

        if next == out {
            return next;
        }
        out = next;
    }
}
