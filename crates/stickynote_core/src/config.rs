//! Canvas runtime configuration.
//!
//! # Invariants
//! - `save_debounce_ms` and `remote_fetch_timeout_ms` are strictly positive.
//! - `local_cache_key` is non-blank; one key holds the whole collection.

use serde::Deserialize;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::time::Duration;

pub const DEFAULT_SAVE_DEBOUNCE_MS: u64 = 300;
pub const DEFAULT_LOCAL_CACHE_KEY: &str = "notes";
pub const DEFAULT_REMOTE_FETCH_TIMEOUT_MS: u64 = 5_000;

#[derive(Debug)]
pub enum ConfigError {
    Parse(serde_json::Error),
    Invalid(String),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Parse(err) => write!(f, "invalid canvas config: {err}"),
            Self::Invalid(message) => write!(f, "invalid canvas config: {message}"),
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Parse(err) => Some(err),
            Self::Invalid(_) => None,
        }
    }
}

/// Persistence tuning for one canvas session.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CanvasConfig {
    /// Quiet period before the collection is written out.
    pub save_debounce_ms: u64,
    /// Local cache key for the serialized collection.
    pub local_cache_key: String,
    /// Initial remote fetch is abandoned after this long.
    pub remote_fetch_timeout_ms: u64,
}

impl Default for CanvasConfig {
    fn default() -> Self {
        Self {
            save_debounce_ms: DEFAULT_SAVE_DEBOUNCE_MS,
            local_cache_key: DEFAULT_LOCAL_CACHE_KEY.to_string(),
            remote_fetch_timeout_ms: DEFAULT_REMOTE_FETCH_TIMEOUT_MS,
        }
    }
}

impl CanvasConfig {
    /// Parses a JSON object; missing fields take their defaults.
    pub fn from_json_str(raw: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(raw).map_err(ConfigError::Parse)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.save_debounce_ms == 0 {
            return Err(ConfigError::Invalid(
                "save_debounce_ms must be greater than 0".to_string(),
            ));
        }
        if self.remote_fetch_timeout_ms == 0 {
            return Err(ConfigError::Invalid(
                "remote_fetch_timeout_ms must be greater than 0".to_string(),
            ));
        }
        if self.local_cache_key.trim().is_empty() {
            return Err(ConfigError::Invalid(
                "local_cache_key cannot be empty".to_string(),
            ));
        }
        Ok(())
    }

    pub fn save_debounce(&self) -> Duration {
        Duration::from_millis(self.save_debounce_ms)
    }

    pub fn remote_fetch_timeout(&self) -> Duration {
        Duration::from_millis(self.remote_fetch_timeout_ms)
    }
}
