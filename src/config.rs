//! Server configuration
//!
//! Loaded from an optional TOML file; every key has a default so an empty or
//! missing file is valid.
//!
//! ```toml
//! occurrence_lookahead = 10
//! default_alert_days = 7
//! default_alert_hours = 10.0
//! sync_git = false
//! ```

use crate::error::ConfigError;
use crate::schedule::{AlertThresholds, DEFAULT_ALERT_DAYS, DEFAULT_ALERT_HOURS, DEFAULT_OCCURRENCE_LOOKAHEAD};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HangarConfig {
    /// Future occurrences inspected when placing notifications on a calendar day
    pub occurrence_lookahead: u32,
    /// Warning window for date-based notifications without their own `alert_days`
    pub default_alert_days: i64,
    /// Warning window for counter-based notifications without their own `alert_hours`
    pub default_alert_hours: f64,
    /// Commit the data file to git on every save and push on shutdown
    pub sync_git: bool,
}

impl Default for HangarConfig {
    fn default() -> Self {
        Self {
            occurrence_lookahead: DEFAULT_OCCURRENCE_LOOKAHEAD,
            default_alert_days: DEFAULT_ALERT_DAYS,
            default_alert_hours: DEFAULT_ALERT_HOURS,
            sync_git: false,
        }
    }
}

impl HangarConfig {
    /// Load from `path`, or defaults when no path is given
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let config = match path {
            Some(p) => {
                let content = fs::read_to_string(p)?;
                Self::from_toml_str(&content)?
            }
            None => Self::default(),
        };
        Ok(config)
    }

    /// Parse and validate TOML text
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: HangarConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.occurrence_lookahead == 0 {
            return Err(ConfigError::InvalidValue {
                field: "occurrence_lookahead".to_string(),
                reason: "must be at least 1".to_string(),
            });
        }
        if self.default_alert_days < 0 {
            return Err(ConfigError::InvalidValue {
                field: "default_alert_days".to_string(),
                reason: "must not be negative".to_string(),
            });
        }
        if !self.default_alert_hours.is_finite() || self.default_alert_hours < 0.0 {
            return Err(ConfigError::InvalidValue {
                field: "default_alert_hours".to_string(),
                reason: "must be a non-negative number".to_string(),
            });
        }
        Ok(())
    }

    pub fn thresholds(&self) -> AlertThresholds {
        AlertThresholds {
            alert_days: self.default_alert_days,
            alert_hours: self.default_alert_hours,
        }
    }
}
