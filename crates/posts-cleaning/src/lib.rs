//! Social Media Posts Cleaning Library
//!
//! A deterministic CSV cleaning pipeline built with Rust and Polars.
//!
//! # Overview
//!
//! This library repairs dirty exports of social media post data. It runs a
//! fixed sequence of column-level passes over the table:
//!
//! - **Headers**: trailing whitespace trimmed off column names
//! - **Numeric fields**: quoted counts unwrapped and typed as integers
//! - **Booleans**: mixed spellings of `author_verified` normalized
//! - **Dates**: multi-format `post_date` values rewritten as SQL-style text
//! - **Emails**: doubled `@@` and `..` corruption repaired
//! - **Free text**: injection patterns, control characters, and appended
//!   `, extra, commas` junk removed
//! - **Structure**: SVG placeholders nulled, tag lists deduplicated,
//!   engagement totals recomputed, final bounds validated
//!
//! Every repair is recorded in a [`QualityReport`] that serializes as JSON
//! next to the cleaned CSV, and the whole pipeline is idempotent: running it
//! over its own output finds nothing left to fix.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use posts_cleaning::{CleaningPipeline, CleanerConfig, io};
//! use std::path::Path;
//!
//! let df = io::read_table(Path::new("data/social_media_posts_data.csv"))?;
//!
//! let outcome = CleaningPipeline::builder()
//!     .config(CleanerConfig::default())
//!     .on_progress(|update| {
//!         println!("[{}/14] {}", update.stage.step_number(), update.message);
//!     })
//!     .build()?
//!     .run(df)?;
//!
//! let mut cleaned = outcome.table;
//! io::write_table(&mut cleaned, Path::new("data/social_media_posts_data_clean.csv"))?;
//! outcome.report.save(Path::new("data/data_quality_report.json"))?;
//! ```
//!
//! # Configuration
//!
//! Use [`CleanerConfig`] to customize the repair policies:
//!
//! ```rust,ignore
//! use posts_cleaning::CleanerConfig;
//! use chrono::NaiveDate;
//!
//! let config = CleanerConfig::builder()
//!     .fallback_date(NaiveDate::from_ymd_opt(2023, 6, 1).unwrap())
//!     .epoch_seconds_range(1_000_000_000, 2_000_000_000)
//!     .engagement_rate_bounds(0.0, 100.0)
//!     .build()?;
//! ```

pub mod cleaner;
pub mod config;
pub mod error;
pub mod io;
pub mod pipeline;
pub mod quality;
pub mod reporting;
pub mod utils;

// Re-exports for convenient access
pub use config::{CleanerConfig, CleanerConfigBuilder, ConfigValidationError};
pub use error::{CleaningError, Result as CleaningResult, ResultExt};
pub use pipeline::{
    CleaningExecutor, CleaningOutcome, CleaningPipeline, CleaningPipelineBuilder, CleaningStage,
    ClosureProgressReporter, ProgressReporter, ProgressUpdate, UpdateKind,
};
pub use quality::validate_data;
pub use reporting::{Issue, IssueCategory, QualityReport};
pub use utils::{
    CellValue, clean_numeric_string, column_cells, format_compact_number, is_numeric_dtype,
    parse_float_cell, parse_integer_cell,
};
