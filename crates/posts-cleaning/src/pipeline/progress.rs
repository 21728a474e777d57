//! Progress reporting for the cleaning pipeline.
//!
//! The pipeline walks a fixed sequence of fourteen steps and announces each
//! one through a [`ProgressReporter`]. Embedding applications subscribe to
//! render progress bars or stream log lines; the bundled CLI turns these
//! updates into its console narration.
//!
//! # Example
//!
//! ```rust,ignore
//! use posts_cleaning::CleaningPipeline;
//!
//! let pipeline = CleaningPipeline::builder()
//!     .on_progress(|update| {
//!         println!("[{}/14] {}", update.stage.step_number(), update.message);
//!     })
//!     .build()?;
//! ```

use serde::{Deserialize, Serialize};

/// Steps of the cleaning pipeline, in execution order.
///
/// Each variant is one numbered step of the run. The numbering includes the
/// input read and the output write, so reporters can render a stable
/// `[step/14]` prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CleaningStage {
    /// Reading the raw CSV export
    ReadingInput,
    /// Trimming whitespace from column headers
    CleaningHeaders,
    /// Unquoting and typing numeric fields
    CleaningNumericFields,
    /// Normalizing boolean spellings
    NormalizingBooleans,
    /// Parsing and reformatting post dates
    NormalizingDates,
    /// Repairing corrupted email addresses
    FixingEmails,
    /// Removing injection patterns and control characters
    SanitizingText,
    /// Repairing corrupted free-text fields
    CleaningTextFields,
    /// Normalizing missing SVG image placeholders
    HandlingSvgImages,
    /// Deduplicating and reformatting tag lists
    DeduplicatingTags,
    /// Counting missing engagement totals
    CountingMissingValues,
    /// Recomputing engagement totals
    RecalculatingEngagements,
    /// Final consistency validation
    Validating,
    /// Writing the cleaned CSV and the quality report
    SavingOutput,
}

impl CleaningStage {
    /// Number of steps in a full run.
    pub const TOTAL_STEPS: usize = 14;

    /// Every stage in execution order.
    pub const ALL: [CleaningStage; Self::TOTAL_STEPS] = [
        Self::ReadingInput,
        Self::CleaningHeaders,
        Self::CleaningNumericFields,
        Self::NormalizingBooleans,
        Self::NormalizingDates,
        Self::FixingEmails,
        Self::SanitizingText,
        Self::CleaningTextFields,
        Self::HandlingSvgImages,
        Self::DeduplicatingTags,
        Self::CountingMissingValues,
        Self::RecalculatingEngagements,
        Self::Validating,
        Self::SavingOutput,
    ];

    /// One-based position of this stage in the run.
    pub fn step_number(&self) -> usize {
        match self {
            Self::ReadingInput => 1,
            Self::CleaningHeaders => 2,
            Self::CleaningNumericFields => 3,
            Self::NormalizingBooleans => 4,
            Self::NormalizingDates => 5,
            Self::FixingEmails => 6,
            Self::SanitizingText => 7,
            Self::CleaningTextFields => 8,
            Self::HandlingSvgImages => 9,
            Self::DeduplicatingTags => 10,
            Self::CountingMissingValues => 11,
            Self::RecalculatingEngagements => 12,
            Self::Validating => 13,
            Self::SavingOutput => 14,
        }
    }

    /// The announcement line printed when this stage begins.
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::ReadingInput => "Reading CSV file...",
            Self::CleaningHeaders => "Cleaning column headers...",
            Self::CleaningNumericFields => "Cleaning numeric fields...",
            Self::NormalizingBooleans => "Normalizing boolean fields...",
            Self::NormalizingDates => "Normalizing date formats...",
            Self::FixingEmails => "Fixing email address corruption...",
            Self::SanitizingText => "Sanitizing special characters...",
            Self::CleaningTextFields => "Cleaning text fields...",
            Self::HandlingSvgImages => "Handling missing SVG images...",
            Self::DeduplicatingTags => "Deduplicating and formatting tags...",
            Self::CountingMissingValues => "Handling N/A values...",
            Self::RecalculatingEngagements => "Recalculating total_engagements...",
            Self::Validating => "Validating data...",
            Self::SavingOutput => "Saving cleaned data...",
        }
    }
}

/// How a progress update should be rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UpdateKind {
    /// A stage is beginning; the message is its announcement line.
    Started,
    /// A stage finished and changed (or verified) something.
    Success,
    /// A stage found a problem it could not repair.
    Warning,
    /// Supplementary breakdown line under the preceding success.
    Detail,
}

/// A single progress event emitted by the pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProgressUpdate {
    /// Stage this update belongs to
    pub stage: CleaningStage,
    /// Rendering category
    pub kind: UpdateKind,
    /// Human-readable message
    pub message: String,
}

impl ProgressUpdate {
    /// Announce that a stage is starting.
    pub fn started(stage: CleaningStage) -> Self {
        Self {
            stage,
            kind: UpdateKind::Started,
            message: stage.display_name().to_string(),
        }
    }

    /// Report a completed repair or a clean check.
    pub fn success(stage: CleaningStage, message: impl Into<String>) -> Self {
        Self {
            stage,
            kind: UpdateKind::Success,
            message: message.into(),
        }
    }

    /// Report a finding the pipeline left in place.
    pub fn warning(stage: CleaningStage, message: impl Into<String>) -> Self {
        Self {
            stage,
            kind: UpdateKind::Warning,
            message: message.into(),
        }
    }

    /// Add a breakdown line under the current stage.
    pub fn detail(stage: CleaningStage, message: impl Into<String>) -> Self {
        Self {
            stage,
            kind: UpdateKind::Detail,
            message: message.into(),
        }
    }
}

/// Trait for receiving progress updates during cleaning.
///
/// Implementations must be `Send + Sync` so the pipeline can run on a
/// background thread while the subscriber lives on another.
pub trait ProgressReporter: Send + Sync {
    /// Called once per emitted update, in narration order.
    fn report(&self, update: ProgressUpdate);
}

/// Wrapper that implements [`ProgressReporter`] using a closure.
pub struct ClosureProgressReporter<F>
where
    F: Fn(ProgressUpdate) + Send + Sync,
{
    callback: F,
}

impl<F> ClosureProgressReporter<F>
where
    F: Fn(ProgressUpdate) + Send + Sync,
{
    /// Creates a new closure-based progress reporter.
    pub fn new(callback: F) -> Self {
        Self { callback }
    }
}

impl<F> ProgressReporter for ClosureProgressReporter<F>
where
    F: Fn(ProgressUpdate) + Send + Sync,
{
    fn report(&self, update: ProgressUpdate) {
        (self.callback)(update);
    }
}

static_assertions::assert_impl_all!(ProgressUpdate: Send, Sync);
static_assertions::assert_impl_all!(CleaningStage: Send, Sync);
