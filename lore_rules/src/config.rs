//! Transfer configuration.

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Configuration for the asymmetric transfer mechanic.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct TransferConfig {
    /// Percentage chance (0-100) that each loss-vulnerable entry held by the
    /// receiver is permanently lost when a transfer completes. Values at or
    /// below zero disable receiver loss entirely.
    pub receiver_loss_chance: f64,
}

impl Default for TransferConfig {
    fn default() -> Self {
        Self {
            receiver_loss_chance: 30.0,
        }
    }
}

impl TransferConfig {
    /// Per-entry Bernoulli probability derived from the configured
    /// percentage, clamped to `[0.0, 1.0]`.
    pub fn loss_probability(&self) -> f64 {
        (self.receiver_loss_chance / 100.0).clamp(0.0, 1.0)
    }
}

/// Root configuration file contents.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct LoreConfig {
    pub transfer: TransferConfig,
}

/// Errors raised while reading a configuration file.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read configuration: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse configuration: {0}")]
    Parse(#[from] toml::de::Error),
}

impl LoreConfig {
    /// Parse configuration from a TOML string.
    pub fn from_toml(input: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(input)?)
    }

    /// Load configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml(&contents)
    }

    /// Load configuration, falling back to defaults.
    ///
    /// A missing file yields defaults silently; an unreadable or malformed
    /// file yields defaults with a logged warning.
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        if !path.exists() {
            return Self::default();
        }
        match Self::load(path) {
            Ok(config) => config,
            Err(err) => {
                tracing::warn!(
                    path = %path.display(),
                    error = %err,
                    "ignoring malformed configuration, using defaults"
                );
                Self::default()
            }
        }
    }
}
