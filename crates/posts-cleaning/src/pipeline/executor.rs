//! Cleaning executor module.
//!
//! Contains the ordered execution of the in-memory repair passes and the
//! narration derived from their findings.

use anyhow::Result;
use polars::prelude::*;
use serde_json::Value;
use tracing::info;

use crate::cleaner::{
    clean_booleans, clean_dates, clean_emails, clean_headers, clean_numeric_fields,
    clean_svg_placeholders, clean_tags, clean_text_fields, count_missing_engagements,
    recalculate_engagements, sanitize_text_fields,
};
use crate::config::CleanerConfig;
use crate::pipeline::progress::{CleaningStage, ProgressReporter, ProgressUpdate};
use crate::quality::validate_data;
use crate::reporting::{IssueCategory, QualityReport};

/// Executes the repair passes in their fixed order.
pub struct CleaningExecutor;

impl CleaningExecutor {
    /// Run every in-memory pass over the table, steps 2 through 13.
    ///
    /// Findings are folded into `report` and narrated through `reporter` as
    /// they happen. The surrounding input read (step 1) and output write
    /// (step 14) belong to the caller.
    pub fn execute(
        &self,
        df: &mut DataFrame,
        config: &CleanerConfig,
        report: &mut QualityReport,
        reporter: Option<&dyn ProgressReporter>,
    ) -> Result<()> {
        info!("Running in-memory cleaning passes...");

        // Step 2: Column headers
        let stage = CleaningStage::CleaningHeaders;
        emit(reporter, ProgressUpdate::started(stage));
        let issues = clean_headers(df)?;
        if issues.is_empty() {
            emit(
                reporter,
                ProgressUpdate::success(stage, "All column headers are clean"),
            );
        } else {
            emit(
                reporter,
                ProgressUpdate::success(
                    stage,
                    format!(
                        "Fixed {} column headers with trailing spaces",
                        issues.len()
                    ),
                ),
            );
        }
        report.absorb(issues);

        // Step 3: Numeric fields
        let stage = CleaningStage::CleaningNumericFields;
        emit(reporter, ProgressUpdate::started(stage));
        let issues = clean_numeric_fields(df)?;
        for issue in &issues {
            emit(
                reporter,
                ProgressUpdate::success(
                    stage,
                    format!(
                        "Fixed {} quoted values in '{}'",
                        detail_u64(&issue.details, "count"),
                        detail_str(&issue.details, "column")
                    ),
                ),
            );
        }
        report.absorb(issues);

        // Step 4: Booleans
        let stage = CleaningStage::NormalizingBooleans;
        emit(reporter, ProgressUpdate::started(stage));
        let issues = clean_booleans(df)?;
        if let Some(issue) = issues.first() {
            let forms: Vec<&str> = issue.details["original_values"]
                .as_array()
                .map(|vals| vals.iter().filter_map(Value::as_str).collect())
                .unwrap_or_default();
            emit(
                reporter,
                ProgressUpdate::success(
                    stage,
                    format!("Normalized boolean values: {forms:?}"),
                ),
            );
        }
        report.absorb(issues);

        // Step 5: Dates
        let stage = CleaningStage::NormalizingDates;
        emit(reporter, ProgressUpdate::started(stage));
        let (issues, stats) = clean_dates(df, config)?;
        if let Some(stats) = &stats {
            emit(
                reporter,
                ProgressUpdate::success(
                    stage,
                    format!(
                        "Parsed {} dates, fixed {} problematic dates",
                        stats.parsed, stats.issues_fixed
                    ),
                ),
            );
            emit(
                reporter,
                ProgressUpdate::detail(stage, format!("Standard SQL format: {}", stats.standard)),
            );
            emit(
                reporter,
                ProgressUpdate::detail(stage, format!("Unix timestamps: {}", stats.unix_timestamp)),
            );
            emit(
                reporter,
                ProgressUpdate::detail(stage, format!("European format: {}", stats.european)),
            );
            if stats.other > 0 {
                emit(
                    reporter,
                    ProgressUpdate::detail(stage, format!("Other/fallback: {}", stats.other)),
                );
            }
        }
        report.absorb(issues);

        // Step 6: Emails
        let stage = CleaningStage::FixingEmails;
        emit(reporter, ProgressUpdate::started(stage));
        let issues = clean_emails(df)?;
        if df.column("author_email").is_ok() {
            match issues.first() {
                Some(issue) => emit(
                    reporter,
                    ProgressUpdate::success(
                        stage,
                        format!(
                            "Fixed {} corrupted emails ({} double @@, {} double ..)",
                            detail_u64(&issue.details, "total"),
                            detail_u64(&issue.details, "double_at"),
                            detail_u64(&issue.details, "double_dots")
                        ),
                    ),
                ),
                None => emit(
                    reporter,
                    ProgressUpdate::success(stage, "No email corruption found"),
                ),
            }
        }
        report.absorb(issues);

        // Step 7: Sanitization
        let stage = CleaningStage::SanitizingText;
        emit(reporter, ProgressUpdate::started(stage));
        let issues = sanitize_text_fields(df)?;
        match issues.first() {
            Some(issue) => emit(
                reporter,
                ProgressUpdate::success(
                    stage,
                    format!(
                        "Sanitized {} fields with special characters/injection attempts",
                        detail_u64(&issue.details, "fields_sanitized")
                    ),
                ),
            ),
            None => emit(
                reporter,
                ProgressUpdate::success(stage, "No dangerous special characters found"),
            ),
        }
        report.absorb(issues);

        // Step 8: Text fields
        let stage = CleaningStage::CleaningTextFields;
        emit(reporter, ProgressUpdate::started(stage));
        let issues = clean_text_fields(df)?;
        if let Some(issue) = issues.first() {
            emit(
                reporter,
                ProgressUpdate::success(
                    stage,
                    format!(
                        "Removed ', extra, commas' pattern from {} rows",
                        detail_u64(&issue.details, "count")
                    ),
                ),
            );
        }
        report.absorb(issues);

        // Step 9: SVG placeholders
        let stage = CleaningStage::HandlingSvgImages;
        emit(reporter, ProgressUpdate::started(stage));
        let issues = clean_svg_placeholders(df)?;
        if let Some(issue) = issues.first() {
            emit(
                reporter,
                ProgressUpdate::success(
                    stage,
                    format!(
                        "Standardized {} missing SVG images to NULL ({:.1}%)",
                        detail_u64(&issue.details, "count"),
                        issue.details["percentage"].as_f64().unwrap_or(0.0)
                    ),
                ),
            );
        }
        report.absorb(issues);

        // Step 10: Tags
        let stage = CleaningStage::DeduplicatingTags;
        emit(reporter, ProgressUpdate::started(stage));
        let issues = clean_tags(df)?;
        if df.column("post_tags").is_ok() {
            let duplicates = issues
                .iter()
                .find(|i| i.category == IssueCategory::DuplicateTags);
            match duplicates {
                Some(issue) => emit(
                    reporter,
                    ProgressUpdate::success(
                        stage,
                        format!(
                            "Removed {} duplicate tags from {} rows",
                            detail_u64(&issue.details, "total_duplicates_removed"),
                            detail_u64(&issue.details, "rows_affected")
                        ),
                    ),
                ),
                None => emit(
                    reporter,
                    ProgressUpdate::success(stage, "No duplicate tags found"),
                ),
            }
            if let Some(issue) = issues
                .iter()
                .find(|i| i.category == IssueCategory::JsonFormatting)
            {
                emit(
                    reporter,
                    ProgressUpdate::success(
                        stage,
                        format!(
                            "Standardized JSON formatting in {} rows",
                            detail_u64(&issue.details, "rows_reformatted")
                        ),
                    ),
                );
            }
        }
        report.absorb(issues);

        // Step 11: Missing engagement totals
        let stage = CleaningStage::CountingMissingValues;
        emit(reporter, ProgressUpdate::started(stage));
        let issues = count_missing_engagements(df)?;
        if let Some(issue) = issues.first() {
            emit(
                reporter,
                ProgressUpdate::success(
                    stage,
                    format!(
                        "Found {} N/A values in total_engagements",
                        detail_u64(&issue.details, "count")
                    ),
                ),
            );
        }
        report.absorb(issues);

        // Step 12: Engagement recalculation
        let stage = CleaningStage::RecalculatingEngagements;
        emit(reporter, ProgressUpdate::started(stage));
        let issues = recalculate_engagements(df)?;
        if let Some(issue) = issues.first() {
            let mismatches = detail_u64(&issue.details, "mismatches");
            let na_values = detail_u64(&issue.details, "na_values");
            emit(
                reporter,
                ProgressUpdate::success(
                    stage,
                    format!(
                        "Fixed {} incorrect calculations ({} mismatches, {} N/A)",
                        mismatches + na_values,
                        mismatches,
                        na_values
                    ),
                ),
            );
        }
        report.absorb(issues);

        // Step 13: Validation
        let stage = CleaningStage::Validating;
        emit(reporter, ProgressUpdate::started(stage));
        let issues = validate_data(df, config)?;
        if let Some(issue) = issues.first() {
            let invalid_emails = detail_u64(&issue.details, "invalid_emails");
            if invalid_emails > 0 {
                emit(
                    reporter,
                    ProgressUpdate::warning(
                        stage,
                        format!("Found {invalid_emails} potentially invalid email formats"),
                    ),
                );
            }
            let negative_followers = detail_u64(&issue.details, "negative_followers");
            if negative_followers > 0 {
                emit(
                    reporter,
                    ProgressUpdate::success(
                        stage,
                        format!("Fixed {negative_followers} negative follower counts"),
                    ),
                );
            }
            let out_of_range = detail_u64(&issue.details, "out_of_range_rates");
            if out_of_range > 0 {
                emit(
                    reporter,
                    ProgressUpdate::success(
                        stage,
                        format!("Fixed {out_of_range} out-of-range engagement rates"),
                    ),
                );
            }
        }
        report.absorb(issues);

        info!("All cleaning passes completed");
        Ok(())
    }
}

fn emit(reporter: Option<&dyn ProgressReporter>, update: ProgressUpdate) {
    if let Some(reporter) = reporter {
        reporter.report(update);
    }
}

fn detail_u64(details: &Value, key: &str) -> u64 {
    details[key].as_u64().unwrap_or(0)
}

fn detail_str<'a>(details: &'a Value, key: &str) -> &'a str {
    details[key].as_str().unwrap_or("")
}
