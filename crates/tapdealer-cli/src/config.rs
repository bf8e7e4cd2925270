//! Dealer configuration

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Environment variable naming the config file
pub const CONFIG_ENV: &str = "TAPDEALER_CONFIG";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Failed to write config: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("Invalid config value: {0}")]
    Invalid(String),
}

/// Dealer configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DealerConfig {
    /// Threshold used when `deal` is run without `--threshold`
    pub threshold: u16,

    /// Participant count used when `deal` is run without `--participants`
    pub participants: u16,

    /// How many ceremonies to attempt before giving up on retryable errors
    pub max_attempts: u32,

    /// Pretty-print JSON output files
    pub pretty: bool,

    /// Default tracing filter, overridden by `RUST_LOG`
    pub log_filter: String,
}

impl Default for DealerConfig {
    fn default() -> Self {
        Self {
            threshold: 2,
            participants: 3,
            max_attempts: 3,
            pretty: true,
            log_filter: "tapdealer=info,tapdealer_core=info".to_string(),
        }
    }
}

impl DealerConfig {
    /// Load configuration from file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to file
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Config file to use: explicit path first, then `TAPDEALER_CONFIG`
    pub fn locate(explicit: Option<&Path>) -> Option<PathBuf> {
        explicit
            .map(Path::to_path_buf)
            .or_else(|| std::env::var_os(CONFIG_ENV).map(PathBuf::from))
    }

    /// Load the located config
    ///
    /// An explicit path must exist. A `TAPDEALER_CONFIG` path that does not
    /// exist, or no path at all, gives the defaults.
    pub fn resolve(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(path) = explicit {
            return Self::load(path);
        }
        match Self::locate(None) {
            Some(path) if path.exists() => Self::load(&path),
            _ => Ok(Self::default()),
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_attempts == 0 {
            return Err(ConfigError::Invalid(
                "max_attempts must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}
