//! Quality report model for the cleaning pipeline.
//!
//! Passes return [`Issue`] records; the executor folds them into a
//! [`QualityReport`], which is finalized once and written as pretty-printed
//! JSON next to the cleaned CSV.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fs::{self, File};
use std::io::Write as _;
use std::path::Path;
use tracing::info;

use crate::error::{CleaningError, Result, ResultExt};

/// The fixed issue categories of the quality report.
///
/// Every defect a pass finds is filed under exactly one of these buckets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueCategory {
    HeaderIssues,
    DateFormatIssues,
    NumericQuoteIssues,
    BooleanInconsistencies,
    NaValues,
    TextCorruption,
    EmailCorruption,
    SpecialCharSanitization,
    MissingSvgImages,
    DuplicateTags,
    JsonFormatting,
    CalculationErrors,
    ValidationErrors,
}

impl IssueCategory {
    /// All categories in report serialization order.
    pub const ALL: [IssueCategory; 13] = [
        IssueCategory::HeaderIssues,
        IssueCategory::DateFormatIssues,
        IssueCategory::NumericQuoteIssues,
        IssueCategory::BooleanInconsistencies,
        IssueCategory::NaValues,
        IssueCategory::TextCorruption,
        IssueCategory::EmailCorruption,
        IssueCategory::SpecialCharSanitization,
        IssueCategory::MissingSvgImages,
        IssueCategory::DuplicateTags,
        IssueCategory::JsonFormatting,
        IssueCategory::CalculationErrors,
        IssueCategory::ValidationErrors,
    ];

    /// The JSON key this category serializes under.
    pub fn as_key(&self) -> &'static str {
        match self {
            IssueCategory::HeaderIssues => "header_issues",
            IssueCategory::DateFormatIssues => "date_format_issues",
            IssueCategory::NumericQuoteIssues => "numeric_quote_issues",
            IssueCategory::BooleanInconsistencies => "boolean_inconsistencies",
            IssueCategory::NaValues => "na_values",
            IssueCategory::TextCorruption => "text_corruption",
            IssueCategory::EmailCorruption => "email_corruption",
            IssueCategory::SpecialCharSanitization => "special_char_sanitization",
            IssueCategory::MissingSvgImages => "missing_svg_images",
            IssueCategory::DuplicateTags => "duplicate_tags",
            IssueCategory::JsonFormatting => "json_formatting",
            IssueCategory::CalculationErrors => "calculation_errors",
            IssueCategory::ValidationErrors => "validation_errors",
        }
    }
}

impl std::fmt::Display for IssueCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_key())
    }
}

/// One structured piece of evidence produced by a cleaning pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Issue {
    /// Bucket this evidence is filed under.
    pub category: IssueCategory,
    /// Free-form record, shaped per category.
    pub details: Value,
}

impl Issue {
    /// Create a new issue record.
    pub fn new(category: IssueCategory, details: Value) -> Self {
        Self { category, details }
    }
}

/// The data quality report written alongside the cleaned CSV.
///
/// Field declaration order is the serialization order, so the emitted JSON
/// always lists the thirteen categories first and the two counters last.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QualityReport {
    pub header_issues: Vec<Value>,
    pub date_format_issues: Vec<Value>,
    pub numeric_quote_issues: Vec<Value>,
    pub boolean_inconsistencies: Vec<Value>,
    pub na_values: Vec<Value>,
    pub text_corruption: Vec<Value>,
    pub email_corruption: Vec<Value>,
    pub special_char_sanitization: Vec<Value>,
    pub missing_svg_images: Vec<Value>,
    pub duplicate_tags: Vec<Value>,
    pub json_formatting: Vec<Value>,
    pub calculation_errors: Vec<Value>,
    pub validation_errors: Vec<Value>,

    /// Row count of the loaded table, set once at load time.
    pub total_rows_processed: usize,

    /// Number of categories with at least one recorded issue, set by
    /// [`QualityReport::finalize`].
    pub total_issue_categories_fixed: usize,
}

impl QualityReport {
    /// Create an empty report for a table with the given row count.
    pub fn new(total_rows: usize) -> Self {
        Self {
            total_rows_processed: total_rows,
            ..Self::default()
        }
    }

    /// File one issue under its category.
    pub fn record(&mut self, issue: Issue) {
        self.entries_mut(issue.category).push(issue.details);
    }

    /// Fold a pass's issues into the report.
    pub fn absorb(&mut self, issues: Vec<Issue>) {
        for issue in issues {
            self.record(issue);
        }
    }

    /// Entries recorded under a category.
    pub fn entries(&self, category: IssueCategory) -> &[Value] {
        match category {
            IssueCategory::HeaderIssues => &self.header_issues,
            IssueCategory::DateFormatIssues => &self.date_format_issues,
            IssueCategory::NumericQuoteIssues => &self.numeric_quote_issues,
            IssueCategory::BooleanInconsistencies => &self.boolean_inconsistencies,
            IssueCategory::NaValues => &self.na_values,
            IssueCategory::TextCorruption => &self.text_corruption,
            IssueCategory::EmailCorruption => &self.email_corruption,
            IssueCategory::SpecialCharSanitization => &self.special_char_sanitization,
            IssueCategory::MissingSvgImages => &self.missing_svg_images,
            IssueCategory::DuplicateTags => &self.duplicate_tags,
            IssueCategory::JsonFormatting => &self.json_formatting,
            IssueCategory::CalculationErrors => &self.calculation_errors,
            IssueCategory::ValidationErrors => &self.validation_errors,
        }
    }

    fn entries_mut(&mut self, category: IssueCategory) -> &mut Vec<Value> {
        match category {
            IssueCategory::HeaderIssues => &mut self.header_issues,
            IssueCategory::DateFormatIssues => &mut self.date_format_issues,
            IssueCategory::NumericQuoteIssues => &mut self.numeric_quote_issues,
            IssueCategory::BooleanInconsistencies => &mut self.boolean_inconsistencies,
            IssueCategory::NaValues => &mut self.na_values,
            IssueCategory::TextCorruption => &mut self.text_corruption,
            IssueCategory::EmailCorruption => &mut self.email_corruption,
            IssueCategory::SpecialCharSanitization => &mut self.special_char_sanitization,
            IssueCategory::MissingSvgImages => &mut self.missing_svg_images,
            IssueCategory::DuplicateTags => &mut self.duplicate_tags,
            IssueCategory::JsonFormatting => &mut self.json_formatting,
            IssueCategory::CalculationErrors => &mut self.calculation_errors,
            IssueCategory::ValidationErrors => &mut self.validation_errors,
        }
    }

    /// Number of categories with at least one recorded issue.
    pub fn categories_fixed(&self) -> usize {
        IssueCategory::ALL
            .iter()
            .filter(|c| !self.entries(**c).is_empty())
            .count()
    }

    /// True when no category holds any issue.
    pub fn is_clean(&self) -> bool {
        self.categories_fixed() == 0
    }

    /// Compute the category counter. Call once, after the last pass.
    pub fn finalize(&mut self) {
        self.total_issue_categories_fixed = self.categories_fixed();
    }

    /// Write the report as pretty-printed JSON.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }

        let json = serde_json::to_string_pretty(self)
            .map_err(|e| CleaningError::ReportGenerationFailed(e.to_string()))?;

        let mut file = File::create(path)?;
        file.write_all(json.as_bytes())
            .map_err(CleaningError::from)
            .context(format!("Writing quality report to '{}'", path.display()))?;

        info!("Quality report saved: {}", path.display());
        Ok(())
    }
}

// =============================================================================
// Tests
// =============================================================================
