//! User settings for the expense tracker
//!
//! Stored as `config.json` in the base directory. Every field has a serde
//! default so older files keep loading as fields are added.

use chrono::format::{Item, StrftimeItems};
use serde::{Deserialize, Serialize};

use super::paths::TrackerPaths;
use crate::error::TrackerError;
use crate::models::Money;

/// User settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    /// Schema version for migration support
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,

    /// Currency symbol used in terminal output
    #[serde(default = "default_currency")]
    pub currency_symbol: String,

    /// Date format for terminal output (strftime)
    #[serde(default = "default_date_format")]
    pub date_format: String,

    /// Standard deviations above the mean a day must reach to be flagged
    #[serde(default = "default_anomaly_threshold")]
    pub anomaly_threshold: f64,

    /// Limit applied by `budget set` when none is given
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_weekly_limit: Option<Money>,
}

fn default_schema_version() -> u32 {
    1
}

fn default_currency() -> String {
    "₵".to_string()
}

fn default_date_format() -> String {
    "%Y-%m-%d".to_string()
}

fn default_anomaly_threshold() -> f64 {
    1.0
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            schema_version: default_schema_version(),
            currency_symbol: default_currency(),
            date_format: default_date_format(),
            anomaly_threshold: default_anomaly_threshold(),
            default_weekly_limit: None,
        }
    }
}

impl Settings {
    /// Load settings from disk, or return defaults if the file doesn't exist
    pub fn load_or_create(paths: &TrackerPaths) -> Result<Self, TrackerError> {
        let settings_path = paths.settings_file();

        if !settings_path.exists() {
            return Ok(Settings::default());
        }

        let contents = std::fs::read_to_string(&settings_path)
            .map_err(|e| TrackerError::Io(format!("Failed to read settings file: {}", e)))?;

        let settings: Settings = serde_json::from_str(&contents)
            .map_err(|e| TrackerError::Config(format!("Failed to parse settings file: {}", e)))?;

        settings.validate()?;
        Ok(settings)
    }

    /// Save settings to disk
    pub fn save(&self, paths: &TrackerPaths) -> Result<(), TrackerError> {
        paths.ensure_directories()?;

        let contents = serde_json::to_string_pretty(self)
            .map_err(|e| TrackerError::Config(format!("Failed to serialize settings: {}", e)))?;

        std::fs::write(paths.settings_file(), contents)
            .map_err(|e| TrackerError::Io(format!("Failed to write settings file: {}", e)))?;

        Ok(())
    }

    /// Check values that serde alone cannot enforce
    pub fn validate(&self) -> Result<(), TrackerError> {
        if !self.anomaly_threshold.is_finite() || self.anomaly_threshold < 0.0 {
            return Err(TrackerError::Config(format!(
                "anomaly_threshold must be a non-negative number (got {})",
                self.anomaly_threshold
            )));
        }
        if self.default_weekly_limit.is_some_and(|m| m.is_negative()) {
            return Err(TrackerError::Config(
                "default_weekly_limit must not be negative".into(),
            ));
        }
        if StrftimeItems::new(&self.date_format).any(|item| matches!(item, Item::Error)) {
            return Err(TrackerError::Config(format!(
                "date_format '{}' is not a valid strftime pattern",
                self.date_format
            )));
        }
        Ok(())
    }

    /// Format an amount with the configured symbol
    pub fn money(&self, amount: Money) -> String {
        amount.format_with_symbol(&self.currency_symbol)
    }
}
