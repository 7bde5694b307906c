//! Rule thresholds
//!
//! Loaded from an optional JSON file. Every field has a default, so an
//! empty object `{}` is a complete configuration.
//!
//! | field | default |
//! |---|---|
//! | `min_dose_span_decades` | 3.0 |
//! | `min_distinct_doses` | 6 |
//! | `min_replicates` | 2 |
//! | `plate_balance_tolerance` | 0.25 |
//! | `plate_format` | none |
//! | `require_metadata` | false |

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

/// Orders of magnitude a compound's doses must span
pub const DEFAULT_MIN_DOSE_SPAN_DECADES: f64 = 3.0;
/// Distinct dose count accepted in place of the span
pub const DEFAULT_MIN_DISTINCT_DOSES: usize = 6;
/// Non-sentinel wells required per condition
pub const DEFAULT_MIN_REPLICATES: usize = 2;
/// Allowed per-plate deviation from the mean well count, as a fraction
pub const DEFAULT_PLATE_BALANCE_TOLERANCE: f64 = 0.25;

/// Result type for configuration operations
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Configuration errors
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("Failed to read config: {0}")]
    Read(String),

    #[error("Invalid config JSON: {0}")]
    Parse(String),

    #[error("Invalid config value: {0}")]
    Invalid(String),
}

impl ConfigError {
    pub fn code(&self) -> &'static str {
        match self {
            ConfigError::Read(_) => "PLATECERT_CONFIG_READ",
            ConfigError::Parse(_) => "PLATECERT_CONFIG_PARSE",
            ConfigError::Invalid(_) => "PLATECERT_CONFIG_INVALID",
        }
    }
}

/// Physical plate layout
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlateFormat {
    pub rows: u16,
    pub columns: u16,
}

impl PlateFormat {
    pub const WELLS_96: PlateFormat = PlateFormat { rows: 8, columns: 12 };
    pub const WELLS_384: PlateFormat = PlateFormat { rows: 16, columns: 24 };

    /// Whether a 1-based position lies on the plate
    pub fn contains(&self, row: u16, column: u16) -> bool {
        (1..=self.rows).contains(&row) && (1..=self.columns).contains(&column)
    }
}

/// Thresholds used by the statistical rules
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuleConfig {
    #[serde(default = "default_min_dose_span_decades")]
    pub min_dose_span_decades: f64,

    #[serde(default = "default_min_distinct_doses")]
    pub min_distinct_doses: usize,

    #[serde(default = "default_min_replicates")]
    pub min_replicates: usize,

    #[serde(default = "default_plate_balance_tolerance")]
    pub plate_balance_tolerance: f64,

    /// Plate layout; position bounds are not checked without one
    #[serde(default)]
    pub plate_format: Option<PlateFormat>,

    /// Warn when a design arrives without metadata
    #[serde(default)]
    pub require_metadata: bool,
}

fn default_min_dose_span_decades() -> f64 {
    DEFAULT_MIN_DOSE_SPAN_DECADES
}
fn default_min_distinct_doses() -> usize {
    DEFAULT_MIN_DISTINCT_DOSES
}
fn default_min_replicates() -> usize {
    DEFAULT_MIN_REPLICATES
}
fn default_plate_balance_tolerance() -> f64 {
    DEFAULT_PLATE_BALANCE_TOLERANCE
}

impl Default for RuleConfig {
    fn default() -> Self {
        Self {
            min_dose_span_decades: DEFAULT_MIN_DOSE_SPAN_DECADES,
            min_distinct_doses: DEFAULT_MIN_DISTINCT_DOSES,
            min_replicates: DEFAULT_MIN_REPLICATES,
            plate_balance_tolerance: DEFAULT_PLATE_BALANCE_TOLERANCE,
            plate_format: None,
            require_metadata: false,
        }
    }
}

impl RuleConfig {
    /// Load configuration from file
    pub fn load(path: &Path) -> ConfigResult<Self> {
        let content = fs::read_to_string(path).map_err(|e| ConfigError::Read(e.to_string()))?;
        Self::from_json_str(&content)
    }

    /// Parse and validate configuration JSON
    pub fn from_json_str(content: &str) -> ConfigResult<Self> {
        let config: RuleConfig =
            serde_json::from_str(content).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Set the plate format
    pub fn with_plate_format(mut self, format: PlateFormat) -> Self {
        self.plate_format = Some(format);
        self
    }

    /// Require metadata on every design
    pub fn requiring_metadata(mut self) -> Self {
        self.require_metadata = true;
        self
    }

    /// Validate threshold values
    pub fn validate(&self) -> ConfigResult<()> {
        if !self.min_dose_span_decades.is_finite() || self.min_dose_span_decades < 0.0 {
            return Err(ConfigError::Invalid(format!(
                "min_dose_span_decades must be a non-negative number, got {}",
                self.min_dose_span_decades
            )));
        }
        if self.min_distinct_doses == 0 {
            return Err(ConfigError::Invalid("min_distinct_doses must be > 0".into()));
        }
        if self.min_replicates == 0 {
            return Err(ConfigError::Invalid("min_replicates must be > 0".into()));
        }
        if !self.plate_balance_tolerance.is_finite() || self.plate_balance_tolerance < 0.0 {
            return Err(ConfigError::Invalid(format!(
                "plate_balance_tolerance must be a non-negative number, got {}",
                self.plate_balance_tolerance
            )));
        }
        if let Some(format) = self.plate_format {
            if format.rows == 0 || format.columns == 0 {
                return Err(ConfigError::Invalid(
                    "plate_format rows and columns must be > 0".into(),
                ));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_object_yields_defaults() {
        let config = RuleConfig::from_json_str("{}").unwrap();
        assert_eq!(config, RuleConfig::default());
    }

    #[test]
    fn test_partial_override() {
        let config = RuleConfig::from_json_str(
            r#"{"min_replicates": 3, "plate_format": {"rows": 8, "columns": 12}}"#,
        )
        .unwrap();
        assert_eq!(config.min_replicates, 3);
        assert_eq!(config.plate_format, Some(PlateFormat::WELLS_96));
        assert_eq!(config.min_distinct_doses, DEFAULT_MIN_DISTINCT_DOSES);
    }

    #[test]
    fn test_invalid_values_rejected() {
        let err = RuleConfig::from_json_str(r#"{"min_replicates": 0}"#).unwrap_err();
        assert_eq!(err.code(), "PLATECERT_CONFIG_INVALID");

        assert!(RuleConfig::from_json_str(r#"{"plate_balance_tolerance": -0.1}"#).is_err());
        assert!(RuleConfig::from_json_str(r#"{"plate_format": {"rows": 0, "columns": 12}}"#).is_err());
    }

    #[test]
    fn test_malformed_json() {
        let err = RuleConfig::from_json_str("{not json").unwrap_err();
        assert_eq!(err.code(), "PLATECERT_CONFIG_PARSE");
    }

    #[test]
    fn test_plate_format_contains() {
        let format = PlateFormat::WELLS_96;
        assert!(format.contains(1, 1));
        assert!(format.contains(8, 12));
        assert!(!format.contains(9, 1));
        assert!(!format.contains(1, 13));
    }
}
