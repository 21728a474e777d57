//! Quality report module.
//!
//! This module provides the report model that the pipeline folds pass
//! results into, plus serialization to the pretty-printed JSON file written
//! next to the cleaned CSV.
//!
//! # Example
//!
//! ```rust,ignore
//! use posts_cleaning::reporting::{Issue, IssueCategory, QualityReport};
//! use serde_json::json;
//!
//! let mut report = QualityReport::new(df.height());
//! report.record(Issue::new(
//!     IssueCategory::NaValues,
//!     json!({"column": "total_engagements", "count": 3}),
//! ));
//! report.finalize();
//! report.save(Path::new("data/data_quality_report.json"))?;
//! ```

mod report;

pub use report::{Issue, IssueCategory, QualityReport};
