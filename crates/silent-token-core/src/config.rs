//! Configuration types and loading for silent-token.
//!
//! Configuration is read from `~/.config/silent-token/config.toml`.
//!
//! # Error Handling
//!
//! - If the config file doesn't exist, default values are returned.
//! - If the config file exists but is invalid, an error is returned (fail fast).
//!
//! # Example Configuration
//!
//! ```toml
//! [policy]
//! platform = "android"            # silent_only | android | desktop
//!
//! [cache]
//! cross_resource_fallback = true
//! expiration_margin_secs = 300    # 5 minutes
//! ```

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;

/// Errors that can occur when loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read the configuration file.
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    /// Failed to parse the configuration file.
    #[error("Failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Main configuration struct.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    /// Platform policy selection.
    pub policy: PolicyConfig,
    /// Cache lookup behavior.
    pub cache: CacheConfig,
}

/// Target platform whose request-shaping policy is composed into the client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Platform {
    /// Silent-only entry point: the cache may always be consulted.
    #[default]
    SilentOnly,
    Android,
    Desktop,
}

impl std::fmt::Display for Platform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Platform::SilentOnly => write!(f, "silent_only"),
            Platform::Android => write!(f, "android"),
            Platform::Desktop => write!(f, "desktop"),
        }
    }
}

/// Configuration for the platform policy.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct PolicyConfig {
    /// Which platform policy to use (default: silent_only).
    pub platform: Platform,
}

/// Configuration for cache lookups.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Whether a multi-resource refresh token stored for another resource may
    /// satisfy a lookup (default: true).
    pub cross_resource_fallback: bool,
    /// Access tokens expiring within this many seconds are treated as
    /// expired (default: 300 = 5 minutes).
    pub expiration_margin_secs: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            cross_resource_fallback: true,
            expiration_margin_secs: 300, // 5 minutes
        }
    }
}

impl CacheConfig {
    pub fn expiration_margin(&self) -> Duration {
        Duration::from_secs(self.expiration_margin_secs)
    }
}

impl Config {
    /// Returns the default configuration file path.
    ///
    /// Returns `~/.config/silent-token/config.toml` using `dirs::config_dir()`,
    /// or `None` if the config directory cannot be determined.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("silent-token").join("config.toml"))
    }

    /// Load configuration from the default path.
    ///
    /// - Returns `Ok(Config::default())` if no config file exists.
    /// - Returns `Err` if the file exists but cannot be read or parsed.
    pub fn load() -> Result<Self, ConfigError> {
        match Self::default_path() {
            Some(path) if path.exists() => Self::load_from(&path),
            _ => Ok(Self::default()),
        }
    }

    /// Load configuration from a specific path.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        Ok(config)
    }
}
