//! # Configuration Management
//!
//! Centralized configuration for the codec.
//!
//! This module holds the ceilings applied to untrusted input and the logging
//! setup for binaries embedding the crate.
//!
//! ## Configuration Sources
//! - TOML files via `from_file()`
//! - Direct instantiation with defaults
//! - Environment overrides via `from_env()` (`MCLB_PROTOCOL_*`)
//!
//! ## Security Considerations
//! - The default frame ceiling (2,097,151 bytes) is the largest value a 3-byte
//!   VarInt can declare; peers cannot send more in one frame
//! - Larger frames pin more memory per connection until they are decoded

use crate::error::{ProtocolError, Result};
use crate::utils::buffer_pool::{ScratchPool, DEFAULT_POOL_SIZE};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::Level;

/// Largest frame body: the biggest value a 3-byte VarInt can hold
pub const MAX_FRAME_LENGTH: usize = 2_097_151;

/// Bytes a frame length prefix may occupy
pub const MAX_FRAME_HEADER_BYTES: usize = 3;

/// Main configuration structure that contains all configurable settings
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct ProtocolConfig {
    /// Ceilings applied while decoding
    #[serde(default)]
    pub limits: LimitsConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl ProtocolConfig {
    /// Read and parse a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|e| {
            ProtocolError::ConfigError(format!("Cannot read {}: {e}", path.display()))
        })?;
        Self::from_toml(&contents)
    }

    /// Parse TOML; missing sections fall back to their defaults
    pub fn from_toml(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| ProtocolError::ConfigError(format!("Invalid TOML: {e}")))
    }

    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();

        if let Some(val) = env_usize("MCLB_PROTOCOL_MAX_FRAME_LENGTH") {
            config.limits.max_frame_length = val;
        }

        if let Some(val) = env_usize("MCLB_PROTOCOL_SCRATCH_POOL_SIZE") {
            config.limits.scratch_pool_size = val;
        }

        if let Ok(level) = std::env::var("MCLB_PROTOCOL_LOG_LEVEL") {
            config.logging.log_level = level.parse::<Level>().map_err(|_| {
                ProtocolError::ConfigError(format!("Invalid log level: {level}"))
            })?;
        }

        Ok(config)
    }

    /// Apply overrides to the default configuration
    pub fn default_with_overrides<F>(mutator: F) -> Self
    where
        F: FnOnce(&mut Self),
    {
        let mut config = Self::default();
        mutator(&mut config);
        config
    }

    /// The default configuration rendered as TOML
    pub fn example_config() -> String {
        toml::to_string_pretty(&Self::default()).unwrap_or_default()
    }

    /// Write this configuration as TOML
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let content = toml::to_string_pretty(self)
            .map_err(|e| ProtocolError::ConfigError(format!("Cannot encode config: {e}")))?;
        fs::write(path, content).map_err(|e| {
            ProtocolError::ConfigError(format!("Cannot write {}: {e}", path.display()))
        })
    }

    /// Validate the configuration for common issues and misconfigurations
    ///
    /// Returns a list of validation errors. Empty list means configuration is valid.
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();
        errors.extend(self.limits.validate());
        errors.extend(self.logging.validate());
        errors
    }

    /// [`validate`](Self::validate), with every problem folded into one error
    pub fn validate_strict(&self) -> Result<()> {
        match self.validate() {
            errors if errors.is_empty() => Ok(()),
            errors => Err(ProtocolError::ConfigError(errors.join("; "))),
        }
    }
}

fn env_usize(name: &str) -> Option<usize> {
    std::env::var(name).ok()?.parse::<usize>().ok()
}

/// Decode ceilings
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LimitsConfig {
    /// Largest frame body accepted or emitted by the frame codec
    pub max_frame_length: usize,

    /// Scratch buffers kept per pool
    pub scratch_pool_size: usize,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            max_frame_length: MAX_FRAME_LENGTH,
            scratch_pool_size: DEFAULT_POOL_SIZE,
        }
    }
}

impl LimitsConfig {
    /// Scratch pool sized for `write_length_prefixed_with`
    pub fn scratch_pool(&self) -> ScratchPool {
        ScratchPool::new(self.scratch_pool_size)
    }

    /// Validate decode ceilings
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        if self.max_frame_length == 0 {
            errors.push("Max frame length must be greater than 0".to_string());
        } else if self.max_frame_length > MAX_FRAME_LENGTH {
            errors.push(format!(
                "Max frame length too large: {} (a {MAX_FRAME_HEADER_BYTES}-byte prefix holds at most {MAX_FRAME_LENGTH})",
                self.max_frame_length
            ));
        }

        if self.scratch_pool_size > 1024 {
            errors.push(format!(
                "Scratch pool size very high: {} (maximum recommended: 1024)",
                self.scratch_pool_size
            ));
        }

        errors
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    /// Application name for logs
    pub app_name: String,

    /// Log level
    #[serde(with = "log_level_serde")]
    pub log_level: Level,

    /// Whether to use JSON formatting for logs
    pub json_format: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            app_name: String::from("mclb-protocol"),
            log_level: Level::INFO,
            json_format: false,
        }
    }
}

impl LoggingConfig {
    /// The app name is emitted as the `app` field of every startup event and
    /// must stay a single token in both fmt and JSON output.
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        if self.app_name.is_empty() {
            errors.push("Application name cannot be empty".to_string());
        } else if !self
            .app_name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
        {
            errors.push(format!(
                "Application name {:?} must only use ASCII letters, digits, '-', '_' or '.'",
                self.app_name
            ));
        }

        if self.json_format && self.log_level == Level::TRACE {
            errors.push(
                "TRACE with JSON output logs every packet field; use DEBUG or plain output"
                    .to_string(),
            );
        }

        errors
    }
}

/// Helper module for tracing::Level serialization/deserialization
mod log_level_serde {
    use serde::{de, Deserialize, Deserializer, Serializer};
    use tracing::Level;

    pub fn serialize<S: Serializer>(level: &Level, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&level.to_string().to_ascii_lowercase())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Level, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse::<Level>()
            .map_err(|_| de::Error::custom(format!("Invalid log level: {raw}")))
    }
}
