//! # Configuration
//!
//! `ParkConfig` is read from an optional YAML file, then overridden by
//! environment variables:
//!
//! - `PARK_STATE_PATH` (default: `park-state.json`)
//! - `PARK_COMPANY_NAME` (default: `TM Parking`)
//! - `PARK_UTC_OFFSET_MINUTES` (default: `0`)
//!
//! The layout fields only shape a fresh document. Once a document exists
//! its own spots and settings win.

use std::path::{Path, PathBuf};

use park_billing::LatenessPolicy;
use park_core::VehicleCategory;
use park_store::FreshLayout;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("invalid value for {var}: {value:?}")]
    InvalidEnv { var: &'static str, value: String },

    #[error("utc_offset_minutes out of range: {0}")]
    InvalidOffset(i32),

    #[error("invalid layout: {0}")]
    InvalidLayout(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ParkConfig {
    /// Lot document location.
    pub state_path: PathBuf,
    /// Company name written into a fresh document.
    pub company_name: String,
    /// Minutes east of UTC for calendar-day rules.
    pub utc_offset_minutes: i32,
    pub initial_spots: usize,
    /// The first N spots of a fresh lot are MOTO.
    pub moto_spots: usize,
    /// Category of spots appended by a resize.
    pub default_category: VehicleCategory,
}

impl Default for ParkConfig {
    fn default() -> Self {
        Self {
            state_path: PathBuf::from("park-state.json"),
            company_name: park_state::DEFAULT_COMPANY_NAME.to_string(),
            utc_offset_minutes: 0,
            initial_spots: 30,
            moto_spots: 5,
            default_category: VehicleCategory::Car,
        }
    }
}

impl ParkConfig {
    /// File (if any), then process environment.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let base = match path {
            Some(p) => Self::from_file(p)?,
            None => Self::default(),
        };
        let config = base.with_env(|var| std::env::var(var).ok())?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn from_yaml(text: &str) -> Result<Self, serde_yaml::Error> {
        if text.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(text)
    }

    /// Apply overrides from `lookup`, which maps a variable name to its value.
    pub fn with_env<F>(mut self, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(v) = lookup("PARK_STATE_PATH").filter(|v| !v.is_empty()) {
            self.state_path = PathBuf::from(v);
        }
        if let Some(v) = lookup("PARK_COMPANY_NAME").filter(|v| !v.trim().is_empty()) {
            self.company_name = v;
        }
        if let Some(v) = lookup("PARK_UTC_OFFSET_MINUTES") {
            self.utc_offset_minutes = v.trim().parse().map_err(|_| ConfigError::InvalidEnv {
                var: "PARK_UTC_OFFSET_MINUTES",
                value: v.clone(),
            })?;
        }
        Ok(self)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.initial_spots == 0 {
            return Err(ConfigError::InvalidLayout("initial_spots must be at least 1".into()));
        }
        if self.moto_spots > self.initial_spots {
            return Err(ConfigError::InvalidLayout(format!(
                "moto_spots ({}) exceeds initial_spots ({})",
                self.moto_spots, self.initial_spots
            )));
        }
        self.lateness_policy()?;
        Ok(())
    }

    pub fn lateness_policy(&self) -> Result<LatenessPolicy, ConfigError> {
        LatenessPolicy::from_offset_minutes(self.utc_offset_minutes)
            .ok_or(ConfigError::InvalidOffset(self.utc_offset_minutes))
    }

    pub fn fresh_layout(&self) -> FreshLayout {
        FreshLayout {
            spot_count: self.initial_spots,
            moto_count: self.moto_spots,
            company_name: self.company_name.clone(),
        }
    }
}
