//! Column-by-column repair passes for social media post exports.
//!
//! This module provides functionality for:
//! - Trimming corrupted column headers
//! - Unquoting and typing numeric engagement fields
//! - Normalizing boolean and date representations
//! - Repairing corrupted email addresses
//! - Stripping injection patterns and control characters from free text
//! - Standardizing SVG placeholders, tag lists, and engagement totals
//!
//! Each pass takes a mutable [`DataFrame`](polars::prelude::DataFrame),
//! fixes one class of defect, and describes what it changed as
//! [`Issue`](crate::reporting::Issue) records for the quality report.
//! Passes are independent; the pipeline decides their order.

mod booleans;
mod dates;
mod emails;
mod engagement;
mod headers;
mod numeric;
mod sanitize;
mod svg;
mod tags;
mod text;

pub use booleans::clean_booleans;
pub use dates::{
    DATE_OUTPUT_FORMAT, DateParseStats, DateStrategy, ParsedDate, clean_dates, parse_post_date,
};
pub use emails::{EmailRepair, clean_emails, repair_email};
pub use engagement::{count_missing_engagements, recalculate_engagements};
pub use headers::clean_headers;
pub use numeric::{NUMERIC_COLUMNS, clean_numeric_fields};
pub use sanitize::{INJECTION_PATTERNS, SANITIZED_COLUMNS, sanitize_text, sanitize_text_fields};
pub use svg::clean_svg_placeholders;
pub use tags::clean_tags;
pub use text::{clean_text_fields, normalize_location, strip_extra_commas};
