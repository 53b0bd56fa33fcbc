//! Configuration for the churn CLI
//!
//! Paths to the model artifact and the historical dataset, plus report
//! tuning. Resolution order: an explicit `--config` path, then the
//! `CHURN_CONFIG` environment variable, then the per-user config file,
//! then built-in defaults. `CHURN_MODEL_PATH` and `CHURN_DATASET_PATH`
//! override the individual paths on top of whichever file was used.

use std::fs;
use std::path::{Path, PathBuf};

use churn_dataset::DEFAULT_TENURE_BINS;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Configuration loading or validation error
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Config file not found: {0}")]
    NotFound(PathBuf),

    #[error("Failed to read config {path}: {message}")]
    Unreadable { path: PathBuf, message: String },

    #[error("Invalid config {path}: {message}")]
    Parse { path: PathBuf, message: String },

    #[error("Value out of range: {0}")]
    OutOfRange(String),
}

/// CLI configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Path to the serialized model artifact
    pub model_path: PathBuf,
    /// Path to the historical dataset CSV
    pub dataset_path: PathBuf,
    /// Tenure histogram bin count for the report
    pub histogram_bins: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            model_path: PathBuf::from("churn_model.json"),
            dataset_path: PathBuf::from("ussd_dataset.csv"),
            histogram_bins: DEFAULT_TENURE_BINS,
        }
    }
}

impl AppConfig {
    /// Load configuration from a TOML string
    pub fn from_toml(toml_str: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(toml_str)
    }

    /// Serialize configuration to TOML
    pub fn to_toml(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }

    /// Load and validate a specific config file
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::NotFound(path.to_path_buf()));
        }
        let raw = fs::read_to_string(path).map_err(|e| ConfigError::Unreadable {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        let config = Self::from_toml(&raw).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Resolve configuration for this invocation
    ///
    /// An explicit path or `CHURN_CONFIG` must exist; the per-user file is
    /// optional and silently skipped when absent.
    pub fn resolve(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = if let Some(path) = explicit {
            Self::from_file(path)?
        } else if let Ok(path) = std::env::var("CHURN_CONFIG") {
            Self::from_file(Path::new(&path))?
        } else if let Some(path) = Self::user_config_path().filter(|p| p.exists()) {
            let config = Self::from_file(&path)?;
            tracing::debug!(path = %path.display(), "using per-user config");
            config
        } else {
            Self::default()
        };

        if let Ok(path) = std::env::var("CHURN_MODEL_PATH") {
            config.model_path = PathBuf::from(path);
        }
        if let Ok(path) = std::env::var("CHURN_DATASET_PATH") {
            config.dataset_path = PathBuf::from(path);
        }

        config.validate()?;
        Ok(config)
    }

    /// Default per-user config location
    pub fn user_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("churn").join("config.toml"))
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.histogram_bins == 0 {
            return Err(ConfigError::OutOfRange(
                "histogram_bins must be at least 1".to_string(),
            ));
        }
        if self.histogram_bins > 500 {
            return Err(ConfigError::OutOfRange(
                "histogram_bins must be at most 500".to_string(),
            ));
        }
        Ok(())
    }
}
