//! Pipeline module.
//!
//! This module provides the main cleaning pipeline and related components.

mod executor;
pub mod progress;

pub use executor::CleaningExecutor;
pub use progress::{
    CleaningStage, ClosureProgressReporter, ProgressReporter, ProgressUpdate, UpdateKind,
};

use crate::config::{CleanerConfig, ConfigValidationError};
use crate::reporting::QualityReport;
use anyhow::Result;
use polars::prelude::*;
use std::sync::Arc;
use tracing::info;

/// What a pipeline run produces.
#[derive(Debug, Clone)]
pub struct CleaningOutcome {
    /// The table after every repair pass.
    pub table: DataFrame,
    /// The finalized quality report.
    pub report: QualityReport,
}

/// The main cleaning pipeline.
///
/// Use [`CleaningPipeline::builder()`] to create a new pipeline with custom
/// configuration.
///
/// # Example
///
/// ```rust,ignore
/// use posts_cleaning::{CleaningPipeline, CleanerConfig};
///
/// let outcome = CleaningPipeline::builder()
///     .config(CleanerConfig::default())
///     .on_progress(|update| {
///         println!("[{}/14] {}", update.stage.step_number(), update.message);
///     })
///     .build()?
///     .run(dataframe)?;
///
/// outcome.report.save("data/data_quality_report.json".as_ref())?;
/// ```
pub struct CleaningPipeline {
    config: CleanerConfig,
    progress_reporter: Option<Arc<dyn ProgressReporter>>,
    executor: CleaningExecutor,
}

// The pipeline can be moved to a background thread by embedding applications.
static_assertions::assert_impl_all!(CleaningPipeline: Send);

impl CleaningPipeline {
    /// Create a new pipeline builder.
    pub fn builder() -> CleaningPipelineBuilder {
        CleaningPipelineBuilder::default()
    }

    /// Run every repair pass over a loaded table.
    ///
    /// Consumes the raw table and returns the cleaned one together with the
    /// finalized quality report. Reading the input file and writing the
    /// outputs stay with the caller, so the pipeline itself never touches
    /// the filesystem.
    pub fn run(&self, df: DataFrame) -> Result<CleaningOutcome> {
        let mut df = df;
        let mut report = QualityReport::new(df.height());

        info!(
            "Starting cleaning pipeline over {} rows, {} columns",
            df.height(),
            df.width()
        );

        self.executor.execute(
            &mut df,
            &self.config,
            &mut report,
            self.progress_reporter.as_deref(),
        )?;
        report.finalize();

        info!(
            "Cleaning pipeline finished: {} issue categories fixed",
            report.total_issue_categories_fixed
        );

        Ok(CleaningOutcome { table: df, report })
    }

    /// The configuration this pipeline runs with.
    pub fn config(&self) -> &CleanerConfig {
        &self.config
    }
}

/// Builder for creating a [`CleaningPipeline`] instance.
///
/// Use [`CleaningPipeline::builder()`] to get started.
#[derive(Default)]
pub struct CleaningPipelineBuilder {
    config: Option<CleanerConfig>,
    progress_reporter: Option<Arc<dyn ProgressReporter>>,
}

static_assertions::assert_impl_all!(CleaningPipelineBuilder: Send);

impl CleaningPipelineBuilder {
    /// Set the pipeline configuration.
    pub fn config(mut self, config: CleanerConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Set a progress reporter for receiving updates during cleaning.
    ///
    /// Use this when you need a custom reporter implementation. For simple
    /// cases, [`on_progress`](Self::on_progress) takes a closure directly.
    pub fn progress_reporter(mut self, reporter: Arc<dyn ProgressReporter>) -> Self {
        self.progress_reporter = Some(reporter);
        self
    }

    /// Set a progress callback closure.
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// let pipeline = CleaningPipeline::builder()
    ///     .on_progress(|update| {
    ///         println!("{:?}: {}", update.kind, update.message);
    ///     })
    ///     .build()?;
    /// ```
    pub fn on_progress<F>(mut self, callback: F) -> Self
    where
        F: Fn(ProgressUpdate) + Send + Sync + 'static,
    {
        self.progress_reporter = Some(Arc::new(ClosureProgressReporter::new(callback)));
        self
    }

    /// Build the pipeline.
    ///
    /// Returns an error if the configuration is invalid.
    pub fn build(self) -> std::result::Result<CleaningPipeline, ConfigValidationError> {
        let config = self.config.unwrap_or_default();
        config.validate()?;

        Ok(CleaningPipeline {
            config,
            progress_reporter: self.progress_reporter,
            executor: CleaningExecutor,
        })
    }
}
