//! Date normalization with multi-strategy parsing.
//!
//! `post_date` arrives in a mix of SQL-style text dates, day-first European
//! dates, and raw Unix epoch seconds. Values are parsed in a fixed priority
//! order (text formats, then epoch, then a generic fallback) and rewritten as
//! `%Y-%m-%d %H:%M:%S` strings so a cleaned file re-parses under the first
//! strategy.

use anyhow::Result;
use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime};
use polars::prelude::*;
use serde_json::json;
use tracing::debug;

use crate::config::CleanerConfig;
use crate::reporting::{Issue, IssueCategory};
use crate::utils::{CellValue, column_cells};

/// Output format of the normalized column.
pub const DATE_OUTPUT_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Text formats tried in order. Day-first formats are tagged european so an
/// ambiguous `28/07/2024` is never read month-first.
const TEXT_FORMATS: [(&str, bool, DateStrategy); 7] = [
    ("%Y-%m-%d %H:%M:%S", true, DateStrategy::Standard),
    ("%d-%m-%Y %H:%M:%S", true, DateStrategy::European),
    ("%d/%m/%Y %H:%M:%S", true, DateStrategy::European),
    ("%Y-%m-%d", false, DateStrategy::Standard),
    ("%d-%m-%Y", false, DateStrategy::European),
    ("%d/%m/%Y %H:%M", true, DateStrategy::European),
    ("%d/%m/%Y", false, DateStrategy::European),
];

/// Last-resort formats for stragglers, tried after the epoch check.
const FALLBACK_FORMATS: [(&str, bool); 8] = [
    ("%Y-%m-%dT%H:%M:%S", true),
    ("%Y/%m/%d %H:%M:%S", true),
    ("%Y/%m/%d", false),
    ("%m/%d/%Y %H:%M:%S", true),
    ("%m/%d/%Y", false),
    ("%B %d, %Y", false),
    ("%d %B %Y", false),
    ("%b %d, %Y", false),
];

/// How a date value was recognized.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateStrategy {
    /// SQL-style `YYYY-MM-DD`, with or without a time.
    Standard,
    /// Day-first formats (`DD-MM-YYYY`, `DD/MM/YYYY`).
    European,
    /// Numeric epoch seconds.
    UnixTimestamp,
    /// Generic fallback formats.
    Other,
}

/// One parsed `post_date` cell.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedDate {
    pub value: NaiveDateTime,
    pub strategy: DateStrategy,
    /// True when no strategy matched and the configured fallback was
    /// substituted.
    pub defaulted: bool,
}

impl ParsedDate {
    fn defaulted(config: &CleanerConfig) -> Self {
        Self {
            value: config.fallback_datetime(),
            strategy: DateStrategy::Other,
            defaulted: true,
        }
    }
}

/// Per-strategy tally for one run over the column.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct DateParseStats {
    /// Total cells processed.
    pub parsed: usize,
    /// Cells no strategy matched, replaced with the fallback date.
    pub issues_fixed: usize,
    pub standard: usize,
    pub unix_timestamp: usize,
    pub european: usize,
    pub other: usize,
}

impl DateParseStats {
    fn tally(&mut self, strategy: DateStrategy) {
        match strategy {
            DateStrategy::Standard => self.standard += 1,
            DateStrategy::UnixTimestamp => self.unix_timestamp += 1,
            DateStrategy::European => self.european += 1,
            DateStrategy::Other => self.other += 1,
        }
    }

    /// An issue is recorded when anything other than plain standard text
    /// dates was encountered.
    pub fn needs_record(&self) -> bool {
        self.issues_fixed > 0 || self.unix_timestamp > 0 || self.european > 0
    }
}

/// Normalize `post_date` to `%Y-%m-%d %H:%M:%S` strings.
///
/// Returns the recorded issues plus parsing statistics, or `None` stats when
/// the column is absent.
pub fn clean_dates(
    df: &mut DataFrame,
    config: &CleanerConfig,
) -> Result<(Vec<Issue>, Option<DateParseStats>)> {
    let Ok(column) = df.column("post_date") else {
        return Ok((Vec::new(), None));
    };
    let cells = column_cells(column.as_materialized_series())?;

    let mut stats = DateParseStats {
        parsed: cells.len(),
        ..DateParseStats::default()
    };
    let mut values: Vec<String> = Vec::with_capacity(cells.len());

    for cell in &cells {
        let parsed = parse_post_date(cell, config);
        if parsed.defaulted {
            stats.issues_fixed += 1;
        } else {
            stats.tally(parsed.strategy);
        }
        values.push(parsed.value.format(DATE_OUTPUT_FORMAT).to_string());
    }

    let series = Series::new("post_date".into(), values);
    df.replace("post_date", series)?;

    debug!(
        "Parsed {} dates: {} standard, {} unix, {} european, {} other, {} defaulted",
        stats.parsed,
        stats.standard,
        stats.unix_timestamp,
        stats.european,
        stats.other,
        stats.issues_fixed
    );

    let mut issues = Vec::new();
    if stats.needs_record() {
        issues.push(Issue::new(
            IssueCategory::DateFormatIssues,
            json!({
                "column": "post_date",
                "issues_fixed": stats.issues_fixed,
                "format_breakdown": {
                    "standard": stats.standard,
                    "unix_timestamp": stats.unix_timestamp,
                    "european": stats.european,
                    "other": stats.other,
                },
                "note": "Two-pass parsing: text dates first, then Unix timestamps",
            }),
        ));
    }

    Ok((issues, Some(stats)))
}

/// Parse one `post_date` cell.
///
/// Text cells walk the exact formats, then the epoch range, then the
/// fallback formats. Number cells are only ever considered as epoch seconds.
/// Whatever remains gets the configured fallback date.
pub fn parse_post_date(cell: &CellValue, config: &CleanerConfig) -> ParsedDate {
    match cell {
        CellValue::Text(raw) => {
            let trimmed = raw.trim();
            if trimmed.is_empty() {
                return ParsedDate::defaulted(config);
            }

            for (fmt, has_time, strategy) in TEXT_FORMATS {
                if let Some(value) = parse_exact(trimmed, fmt, has_time) {
                    return ParsedDate {
                        value,
                        strategy,
                        defaulted: false,
                    };
                }
            }

            if let Ok(ts) = trimmed.parse::<f64>() {
                return match epoch_to_datetime(ts, config) {
                    Some(value) => ParsedDate {
                        value,
                        strategy: DateStrategy::UnixTimestamp,
                        defaulted: false,
                    },
                    None => ParsedDate::defaulted(config),
                };
            }

            if let Some(value) = parse_generic(trimmed) {
                return ParsedDate {
                    value,
                    strategy: DateStrategy::Other,
                    defaulted: false,
                };
            }

            ParsedDate::defaulted(config)
        }
        CellValue::Number(n) => match epoch_to_datetime(*n, config) {
            Some(value) => ParsedDate {
                value,
                strategy: DateStrategy::UnixTimestamp,
                defaulted: false,
            },
            None => ParsedDate::defaulted(config),
        },
        CellValue::Bool(_) | CellValue::Missing => ParsedDate::defaulted(config),
    }
}

fn parse_exact(value: &str, fmt: &str, has_time: bool) -> Option<NaiveDateTime> {
    if has_time {
        NaiveDateTime::parse_from_str(value, fmt).ok()
    } else {
        NaiveDate::parse_from_str(value, fmt)
            .ok()
            .map(|d| d.and_time(NaiveTime::MIN))
    }
}

fn epoch_to_datetime(ts: f64, config: &CleanerConfig) -> Option<NaiveDateTime> {
    if !ts.is_finite()
        || ts < config.epoch_min_seconds as f64
        || ts > config.epoch_max_seconds as f64
    {
        return None;
    }
    DateTime::from_timestamp(ts as i64, 0).map(|dt| dt.naive_utc())
}

fn parse_generic(value: &str) -> Option<NaiveDateTime> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.naive_utc());
    }
    for (fmt, has_time) in FALLBACK_FORMATS {
        if let Some(parsed) = parse_exact(value, fmt, has_time) {
            return Some(parsed);
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn config() -> CleanerConfig {
        CleanerConfig::default()
    }

    fn text(value: &str) -> CellValue {
        CellValue::Text(value.to_string())
    }

    fn formatted(cell: &CellValue) -> String {
        parse_post_date(cell, &config())
            .value
            .format(DATE_OUTPUT_FORMAT)
            .to_string()
    }

    #[test]
    fn test_standard_formats() {
        let parsed = parse_post_date(&text("2024-07-28 15:20:48"), &config());
        assert_eq!(parsed.strategy, DateStrategy::Standard);
        assert!(!parsed.defaulted);
        assert_eq!(formatted(&text("2024-07-28 15:20:48")), "2024-07-28 15:20:48");
        assert_eq!(formatted(&text("2025-05-13")), "2025-05-13 00:00:00");
    }

    #[test]
    fn test_european_formats_are_day_first() {
        let parsed = parse_post_date(&text("28/07/2024 15:20:48"), &config());
        assert_eq!(parsed.strategy, DateStrategy::European);
        assert_eq!(formatted(&text("28/07/2024 15:20:48")), "2024-07-28 15:20:48");
        assert_eq!(formatted(&text("13-05-2025")), "2025-05-13 00:00:00");
        assert_eq!(formatted(&text("19/08/2024 15:20")), "2024-08-19 15:20:00");
        assert_eq!(formatted(&text("30/05/2025")), "2025-05-30 00:00:00");
    }

    #[test]
    fn test_ambiguous_slash_date_never_reads_month_first() {
        // 03/05/2025 is 3 May, not 5 March.
        assert_eq!(formatted(&text("03/05/2025")), "2025-05-03 00:00:00");
    }

    #[test]
    fn test_unix_timestamp_strings() {
        let parsed = parse_post_date(&text("1700000000"), &config());
        assert_eq!(parsed.strategy, DateStrategy::UnixTimestamp);
        assert_eq!(formatted(&text("1700000000")), "2023-11-14 22:13:20");
    }

    #[test]
    fn test_unix_range_is_inclusive() {
        let low = parse_post_date(&text("1000000000"), &config());
        assert_eq!(low.strategy, DateStrategy::UnixTimestamp);
        assert_eq!(formatted(&text("1000000000")), "2001-09-09 01:46:40");

        let high = parse_post_date(&text("2000000000"), &config());
        assert_eq!(high.strategy, DateStrategy::UnixTimestamp);
    }

    #[test]
    fn test_numeric_out_of_range_is_defaulted() {
        let parsed = parse_post_date(&text("2500000000"), &config());
        assert!(parsed.defaulted);
        assert_eq!(formatted(&text("2500000000")), "2024-01-01 00:00:00");

        let parsed = parse_post_date(&CellValue::Number(999.0), &config());
        assert!(parsed.defaulted);
    }

    #[test]
    fn test_number_cells_take_epoch_branch() {
        let parsed = parse_post_date(&CellValue::Number(1_700_000_000.0), &config());
        assert_eq!(parsed.strategy, DateStrategy::UnixTimestamp);
        assert!(!parsed.defaulted);
    }

    #[test]
    fn test_generic_fallback_formats() {
        let parsed = parse_post_date(&text("2024-07-28T15:20:48"), &config());
        assert_eq!(parsed.strategy, DateStrategy::Other);
        assert!(!parsed.defaulted);

        let parsed = parse_post_date(&text("July 28, 2024"), &config());
        assert_eq!(parsed.strategy, DateStrategy::Other);
        assert_eq!(formatted(&text("July 28, 2024")), "2024-07-28 00:00:00");
    }

    #[test]
    fn test_unparseable_gets_fallback_and_counts_as_fixed() {
        let parsed = parse_post_date(&text("not-a-date"), &config());
        assert!(parsed.defaulted);
        assert_eq!(formatted(&text("not-a-date")), "2024-01-01 00:00:00");

        let parsed = parse_post_date(&CellValue::Missing, &config());
        assert!(parsed.defaulted);
    }

    #[test]
    fn test_custom_fallback_date() {
        let config = CleanerConfig::builder()
            .fallback_date(NaiveDate::from_ymd_opt(2023, 6, 1).unwrap())
            .build()
            .unwrap();
        let parsed = parse_post_date(&text("garbage"), &config);
        assert_eq!(
            parsed.value.format(DATE_OUTPUT_FORMAT).to_string(),
            "2023-06-01 00:00:00"
        );
    }

    #[test]
    fn test_clean_dates_pass_rewrites_column_and_records() {
        let mut df = df!(
            "post_date" => &["2024-07-28 15:20:48", "28/07/2024 15:20:48", "1700000000", "bad"],
        )
        .unwrap();

        let (issues, stats) = clean_dates(&mut df, &config()).unwrap();
        let stats = stats.unwrap();

        assert_eq!(stats.parsed, 4);
        assert_eq!(stats.standard, 1);
        assert_eq!(stats.european, 1);
        assert_eq!(stats.unix_timestamp, 1);
        assert_eq!(stats.other, 0);
        assert_eq!(stats.issues_fixed, 1);

        assert_eq!(issues.len(), 1);
        let breakdown = &issues[0].details["format_breakdown"];
        assert_eq!(breakdown["standard"], 1);
        assert_eq!(breakdown["unix_timestamp"], 1);
        assert_eq!(breakdown["european"], 1);
        assert_eq!(breakdown["other"], 0);
        assert_eq!(issues[0].details["issues_fixed"], 1);

        let col = df.column("post_date").unwrap();
        let values: Vec<&str> = col.str().unwrap().into_iter().flatten().collect();
        assert_eq!(
            values,
            vec![
                "2024-07-28 15:20:48",
                "2024-07-28 15:20:48",
                "2023-11-14 22:13:20",
                "2024-01-01 00:00:00",
            ]
        );
    }

    #[test]
    fn test_clean_dates_is_idempotent() {
        let mut df = df!(
            "post_date" => &["28/07/2024 15:20:48", "1700000000", "junk"],
        )
        .unwrap();
        clean_dates(&mut df, &config()).unwrap();

        let (issues, stats) = clean_dates(&mut df, &config()).unwrap();
        let stats = stats.unwrap();

        assert!(issues.is_empty());
        assert_eq!(stats.standard, 3);
        assert_eq!(stats.issues_fixed, 0);
    }

    #[test]
    fn test_absent_column_yields_no_stats() {
        let mut df = df!("likes" => &[1i64]).unwrap();
        let (issues, stats) = clean_dates(&mut df, &config()).unwrap();
        assert!(issues.is_empty());
        assert!(stats.is_none());
    }
}
