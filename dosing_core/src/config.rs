//! Configuration file support for Dosplan.
//!
//! Configuration is loaded from `$XDG_CONFIG_HOME/dosplan/config.toml`.
//! Stage periods and clock times are parsed while loading, so a malformed
//! `"1-3"` or `"8:00"` is reported here rather than during generation.

use crate::{default_dosage_stages, validate_stages, ClockTime, DosageStage, TherapySettings};
use crate::{Error, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Application configuration
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub therapy: TherapyConfig,

    #[serde(default = "default_stages")]
    pub stages: Vec<DosageStage>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            therapy: TherapyConfig::default(),
            stages: default_stages(),
        }
    }
}

/// Course parameters
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TherapyConfig {
    #[serde(default)]
    pub medication_name: String,

    #[serde(default = "default_total_days")]
    pub total_days: i64,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pills_in_package: Option<i64>,

    #[serde(default = "default_wake_time")]
    pub wake_time: ClockTime,

    #[serde(default = "default_sleep_time")]
    pub sleep_time: ClockTime,
}

impl Default for TherapyConfig {
    fn default() -> Self {
        Self {
            medication_name: String::new(),
            total_days: default_total_days(),
            pills_in_package: None,
            wake_time: default_wake_time(),
            sleep_time: default_sleep_time(),
        }
    }
}

// Default value functions
fn default_stages() -> Vec<DosageStage> {
    default_dosage_stages().to_vec()
}

fn default_total_days() -> i64 {
    25
}

fn default_wake_time() -> ClockTime {
    ClockTime::from_minute_of_day(8 * 60)
}

fn default_sleep_time() -> ClockTime {
    ClockTime::from_minute_of_day(22 * 60)
}

impl Config {
    /// Load configuration from the standard config path
    pub fn load() -> Result<Self> {
        let config_path = Self::default_config_path();
        if config_path.exists() {
            Self::load_from(&config_path)
        } else {
            tracing::info!(
                "No config file found at {:?}, using defaults",
                config_path
            );
            Ok(Self::default())
        }
    }

    /// Load configuration from a specific path
    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        config.validate()?;
        tracing::info!("Loaded config from {:?}", path);
        Ok(config)
    }

    /// Get the default config file path
    pub fn default_config_path() -> PathBuf {
        let base = dirs::config_dir().unwrap_or_else(|| PathBuf::from(".config"));
        base.join("dosplan").join("config.toml")
    }

    /// Save the current configuration to a specific path
    pub fn save_to(&self, path: &Path) -> Result<()> {
        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)
            .map_err(|e| Error::Config(format!("Failed to serialize config: {}", e)))?;
        std::fs::write(path, contents)?;
        tracing::info!("Saved config to {:?}", path);
        Ok(())
    }

    /// Reject stage tables the generator cannot use
    pub fn validate(&self) -> Result<()> {
        let errors = validate_stages(&self.stages);
        if errors.is_empty() {
            Ok(())
        } else {
            Err(Error::Config(errors.join("; ")))
        }
    }

    /// Build generation settings for a course starting on `start_date`
    pub fn to_settings(&self, start_date: NaiveDate) -> TherapySettings {
        TherapySettings {
            start_date,
            medication_name: self.therapy.medication_name.clone(),
            total_days: self.therapy.total_days,
            pills_in_package: self.therapy.pills_in_package,
            wake_time: self.therapy.wake_time,
            sleep_time: self.therapy.sleep_time,
            dosage_stages: self.stages.clone(),
        }
    }
}
