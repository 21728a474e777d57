//! Configuration types for the cleaning pipeline.
//!
//! This module provides the repair policies that are tunable per run,
//! using the builder pattern for flexible and ergonomic setup.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};

/// Configuration for the cleaning pipeline.
///
/// Use [`CleanerConfig::builder()`] to create a new configuration with a
/// fluent API.
///
/// # Example
///
/// ```rust,ignore
/// use posts_cleaning::config::CleanerConfig;
/// use chrono::NaiveDate;
///
/// let config = CleanerConfig::builder()
///     .fallback_date(NaiveDate::from_ymd_opt(2023, 6, 1).unwrap())
///     .engagement_rate_bounds(0.0, 100.0)
///     .build();
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CleanerConfig {
    /// Date substituted when a `post_date` value cannot be parsed by any
    /// strategy. Stored at midnight.
    /// Default: 2024-01-01
    pub fallback_date: NaiveDate,

    /// Lower bound (inclusive) of the numeric range interpreted as Unix
    /// epoch seconds.
    /// Default: 1_000_000_000 (2001-09-09)
    pub epoch_min_seconds: i64,

    /// Upper bound (inclusive) of the numeric range interpreted as Unix
    /// epoch seconds.
    /// Default: 2_000_000_000 (2033-05-18)
    pub epoch_max_seconds: i64,

    /// Lower bound engagement rates are clamped to.
    /// Default: 0.0
    pub rate_min: f64,

    /// Upper bound engagement rates are clamped to.
    /// Default: 100.0
    pub rate_max: f64,
}

impl Default for CleanerConfig {
    fn default() -> Self {
        Self {
            fallback_date: NaiveDate::from_ymd_opt(2024, 1, 1)
                .unwrap_or(NaiveDate::MIN),
            epoch_min_seconds: 1_000_000_000,
            epoch_max_seconds: 2_000_000_000,
            rate_min: 0.0,
            rate_max: 100.0,
        }
    }
}

impl CleanerConfig {
    /// Create a new configuration builder.
    pub fn builder() -> CleanerConfigBuilder {
        CleanerConfigBuilder::default()
    }

    /// The fallback date as a full timestamp (midnight).
    pub fn fallback_datetime(&self) -> NaiveDateTime {
        self.fallback_date.and_time(NaiveTime::MIN)
    }

    /// Validate the configuration and return errors if invalid.
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        if self.epoch_min_seconds > self.epoch_max_seconds {
            return Err(ConfigValidationError::InvalidEpochRange {
                min: self.epoch_min_seconds,
                max: self.epoch_max_seconds,
            });
        }

        if !self.rate_min.is_finite() || !self.rate_max.is_finite() || self.rate_min >= self.rate_max
        {
            return Err(ConfigValidationError::InvalidRateBounds {
                min: self.rate_min,
                max: self.rate_max,
            });
        }

        Ok(())
    }
}

/// Errors that can occur during configuration validation.
#[derive(Debug, thiserror::Error)]
pub enum ConfigValidationError {
    #[error("Invalid epoch range: {min}..={max} (min must not exceed max)")]
    InvalidEpochRange { min: i64, max: i64 },

    #[error("Invalid engagement rate bounds: {min}..={max} (must be finite with min < max)")]
    InvalidRateBounds { min: f64, max: f64 },
}

/// Builder for [`CleanerConfig`] with fluent API.
#[derive(Debug, Default)]
pub struct CleanerConfigBuilder {
    fallback_date: Option<NaiveDate>,
    epoch_min_seconds: Option<i64>,
    epoch_max_seconds: Option<i64>,
    rate_min: Option<f64>,
    rate_max: Option<f64>,
}

impl CleanerConfigBuilder {
    /// Set the date substituted for unparseable `post_date` values.
    pub fn fallback_date(mut self, date: NaiveDate) -> Self {
        self.fallback_date = Some(date);
        self
    }

    /// Set the inclusive numeric range interpreted as Unix epoch seconds.
    pub fn epoch_seconds_range(mut self, min: i64, max: i64) -> Self {
        self.epoch_min_seconds = Some(min);
        self.epoch_max_seconds = Some(max);
        self
    }

    /// Set the bounds engagement rates are clamped into.
    pub fn engagement_rate_bounds(mut self, min: f64, max: f64) -> Self {
        self.rate_min = Some(min);
        self.rate_max = Some(max);
        self
    }

    /// Build the configuration.
    ///
    /// Returns a validated `CleanerConfig` or an error if validation fails.
    pub fn build(self) -> Result<CleanerConfig, ConfigValidationError> {
        let defaults = CleanerConfig::default();
        let config = CleanerConfig {
            fallback_date: self.fallback_date.unwrap_or(defaults.fallback_date),
            epoch_min_seconds: self.epoch_min_seconds.unwrap_or(defaults.epoch_min_seconds),
            epoch_max_seconds: self.epoch_max_seconds.unwrap_or(defaults.epoch_max_seconds),
            rate_min: self.rate_min.unwrap_or(defaults.rate_min),
            rate_max: self.rate_max.unwrap_or(defaults.rate_max),
        };

        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = CleanerConfig::default();
        assert_eq!(
            config.fallback_date,
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()
        );
        assert_eq!(config.epoch_min_seconds, 1_000_000_000);
        assert_eq!(config.epoch_max_seconds, 2_000_000_000);
        assert_eq!(config.rate_min, 0.0);
        assert_eq!(config.rate_max, 100.0);
    }

    #[test]
    fn test_builder_defaults() {
        let config = CleanerConfig::builder().build().unwrap();
        assert_eq!(config.epoch_min_seconds, 1_000_000_000);
        assert_eq!(config.rate_max, 100.0);
    }

    #[test]
    fn test_builder_custom_values() {
        let config = CleanerConfig::builder()
            .fallback_date(NaiveDate::from_ymd_opt(2020, 6, 15).unwrap())
            .epoch_seconds_range(900_000_000, 2_100_000_000)
            .engagement_rate_bounds(0.0, 50.0)
            .build()
            .unwrap();

        assert_eq!(config.fallback_date.to_string(), "2020-06-15");
        assert_eq!(config.epoch_min_seconds, 900_000_000);
        assert_eq!(config.epoch_max_seconds, 2_100_000_000);
        assert_eq!(config.rate_max, 50.0);
    }

    #[test]
    fn test_fallback_datetime_is_midnight() {
        let config = CleanerConfig::default();
        assert_eq!(
            config.fallback_datetime().format("%Y-%m-%d %H:%M:%S").to_string(),
            "2024-01-01 00:00:00"
        );
    }

    #[test]
    fn test_validation_invalid_epoch_range() {
        let result = CleanerConfig::builder()
            .epoch_seconds_range(2_000_000_000, 1_000_000_000)
            .build();

        assert!(result.is_err());
        assert!(matches!(
            result.unwrap_err(),
            ConfigValidationError::InvalidEpochRange { .. }
        ));
    }

    #[test]
    fn test_validation_invalid_rate_bounds() {
        let result = CleanerConfig::builder()
            .engagement_rate_bounds(100.0, 0.0)
            .build();

        assert!(result.is_err());
        assert!(matches!(
            result.unwrap_err(),
            ConfigValidationError::InvalidRateBounds { .. }
        ));
    }

    #[test]
    fn test_config_serialization() {
        let config = CleanerConfig::default();
        let json = serde_json::to_string(&config).unwrap();
        let deserialized: CleanerConfig = serde_json::from_str(&json).unwrap();

        assert_eq!(config.fallback_date, deserialized.fallback_date);
        assert_eq!(config.epoch_max_seconds, deserialized.epoch_max_seconds);
    }

    #[test]
    fn test_config_from_json() {
        let json = r#"{
            "fallback_date": "2023-12-31",
            "epoch_min_seconds": 1000000000,
            "epoch_max_seconds": 2000000000,
            "rate_min": 0.0,
            "rate_max": 100.0
        }"#;

        let config: CleanerConfig =
            serde_json::from_str(json).expect("Should deserialize from JSON");
        assert_eq!(
            config.fallback_date,
            NaiveDate::from_ymd_opt(2023, 12, 31).unwrap()
        );
    }
}
