use anyhow::Result;
use once_cell::sync::Lazy;
use polars::prelude::*;
use regex::Regex;
use serde_json::json;
use tracing::debug;

use crate::config::CleanerConfig;
use crate::reporting::{Issue, IssueCategory};
use crate::utils::{format_compact_number, parse_float_cell};

/// Shape every delivered email address must have.
static EMAIL_FORMAT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$")
        .expect("Invalid regex: email format")
});

/// Final consistency checks over the cleaned table.
///
/// Three checks run in order: email addresses that still fail the format
/// check are counted but left in place, negative follower counts are
/// clamped to zero, and engagement rates outside the configured bounds
/// are clamped to the nearest bound. A single summary record covers all
/// three when anything was found.
pub fn validate_data(df: &mut DataFrame, config: &CleanerConfig) -> Result<Vec<Issue>> {
    let mut issues = Vec::new();

    let invalid_emails = count_invalid_emails(df)?;
    let negative_followers = clamp_negative_followers(df)?;
    let out_of_range_rates = clamp_engagement_rates(df, config)?;

    let total_issues = invalid_emails + negative_followers + out_of_range_rates;
    if total_issues > 0 {
        debug!(
            "Validation found {} issues ({} emails, {} followers, {} rates)",
            total_issues, invalid_emails, negative_followers, out_of_range_rates
        );
        issues.push(Issue::new(
            IssueCategory::ValidationErrors,
            json!({
                "invalid_emails": invalid_emails,
                "negative_followers": negative_followers,
                "out_of_range_rates": out_of_range_rates,
                "total_issues": total_issues,
            }),
        ));
    }

    Ok(issues)
}

/// Count emails that still look malformed after repair. Report only.
fn count_invalid_emails(df: &DataFrame) -> Result<usize> {
    let Ok(column) = df.column("author_email") else {
        return Ok(0);
    };
    let series = column.as_materialized_series();
    if series.dtype() != &DataType::String {
        return Ok(0);
    }

    let mut invalid = 0usize;
    for opt_val in series.str()?.into_iter() {
        if let Some(val) = opt_val
            && !EMAIL_FORMAT.is_match(val)
        {
            invalid += 1;
        }
    }
    Ok(invalid)
}

/// Raise negative follower counts to zero.
fn clamp_negative_followers(df: &mut DataFrame) -> Result<usize> {
    let Ok(column) = df.column("author_follower_count") else {
        return Ok(0);
    };
    let series = column.as_materialized_series();
    if series.dtype() != &DataType::Int64 {
        return Ok(0);
    }

    let mut negative = 0usize;
    let mut values: Vec<Option<i64>> = Vec::with_capacity(series.len());
    for opt_val in series.i64()?.into_iter() {
        match opt_val {
            Some(count) if count < 0 => {
                negative += 1;
                values.push(Some(0));
            }
            other => values.push(other),
        }
    }

    if negative > 0 {
        let clamped = Series::new("author_follower_count".into(), values);
        df.replace("author_follower_count", clamped)?;
    }
    Ok(negative)
}

/// Pull engagement rates back inside the configured bounds.
///
/// The column stays textual; only cells that parse as a number and land
/// outside the bounds are rewritten, so unparseable entries and in-range
/// values keep their original formatting.
fn clamp_engagement_rates(df: &mut DataFrame, config: &CleanerConfig) -> Result<usize> {
    let Ok(column) = df.column("engagement_rate") else {
        return Ok(0);
    };
    let series = column.as_materialized_series();
    if series.dtype() != &DataType::String {
        return Ok(0);
    }

    let mut out_of_range = 0usize;
    let mut values: Vec<Option<String>> = Vec::with_capacity(series.len());
    for opt_val in series.str()?.into_iter() {
        match opt_val {
            Some(val) => match parse_float_cell(val) {
                Some(rate) if rate < config.rate_min || rate > config.rate_max => {
                    out_of_range += 1;
                    let clamped = rate.clamp(config.rate_min, config.rate_max);
                    values.push(Some(format_compact_number(clamped)));
                }
                _ => values.push(Some(val.to_string())),
            },
            None => values.push(None),
        }
    }

    if out_of_range > 0 {
        let clamped = Series::new("engagement_rate".into(), values);
        df.replace("engagement_rate", clamped)?;
    }
    Ok(out_of_range)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn rate_at(df: &DataFrame, idx: usize) -> String {
        df.column("engagement_rate")
            .unwrap()
            .str()
            .unwrap()
            .get(idx)
            .unwrap()
            .to_string()
    }

    #[test]
    fn test_invalid_emails_counted_but_kept() {
        let mut df = df!(
            "author_email" => &[
                Some("good@example.com"),
                Some("missing-domain@"),
                Some("no-at-sign.com"),
                None,
            ],
        )
        .unwrap();

        let issues = validate_data(&mut df, &CleanerConfig::default()).unwrap();

        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].details["invalid_emails"], 2);
        assert_eq!(issues[0].details["total_issues"], 2);
        // The malformed addresses survive untouched.
        let col = df.column("author_email").unwrap();
        assert_eq!(col.str().unwrap().get(1), Some("missing-domain@"));
    }

    #[test]
    fn test_negative_followers_clamped_to_zero() {
        let mut df = df!(
            "author_follower_count" => &[Some(100i64), Some(-50), None],
        )
        .unwrap();

        let issues = validate_data(&mut df, &CleanerConfig::default()).unwrap();

        assert_eq!(issues[0].details["negative_followers"], 1);
        let col = df.column("author_follower_count").unwrap();
        assert_eq!(col.i64().unwrap().get(0), Some(100));
        assert_eq!(col.i64().unwrap().get(1), Some(0));
        assert_eq!(col.null_count(), 1);
    }

    #[test]
    fn test_out_of_range_rates_clamped() {
        let mut df = df!(
            "engagement_rate" => &["4.5", "150.5", "-2", "not a number"],
        )
        .unwrap();

        let issues = validate_data(&mut df, &CleanerConfig::default()).unwrap();

        assert_eq!(issues[0].details["out_of_range_rates"], 2);
        assert_eq!(rate_at(&df, 0), "4.5");
        assert_eq!(rate_at(&df, 1), "100");
        assert_eq!(rate_at(&df, 2), "0");
        assert_eq!(rate_at(&df, 3), "not a number");
    }

    #[test]
    fn test_clean_table_reports_nothing() {
        let mut df = df!(
            "author_email" => &["a@example.com"],
            "author_follower_count" => &[10i64],
            "engagement_rate" => &["3.2"],
        )
        .unwrap();

        let issues = validate_data(&mut df, &CleanerConfig::default()).unwrap();
        assert!(issues.is_empty());
    }

    #[test]
    fn test_custom_rate_bounds() {
        let config = CleanerConfig::builder()
            .engagement_rate_bounds(0.0, 10.0)
            .build()
            .unwrap();
        let mut df = df!(
            "engagement_rate" => &["5.0", "12.5"],
        )
        .unwrap();

        let issues = validate_data(&mut df, &config).unwrap();

        assert_eq!(issues[0].details["out_of_range_rates"], 1);
        assert_eq!(rate_at(&df, 1), "10");
    }
}
