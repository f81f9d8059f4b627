//! Runtime configuration.
//!
//! # Responsibility
//! - Resolve the data file, logging options, and narrative backend settings.
//! - Read overrides from the environment without touching global state in tests.
//!
//! # Invariants
//! - Narrative generation is configured only when an API key is present.
//! - API keys never appear in `Debug` output.

use crate::logging::default_log_level;
use std::error::Error;
use std::fmt::{Debug, Display, Formatter};
use std::path::PathBuf;

pub const ENV_DATA_FILE: &str = "RECAP_DATA_FILE";
pub const ENV_LOG_LEVEL: &str = "RECAP_LOG_LEVEL";
pub const ENV_LOG_DIR: &str = "RECAP_LOG_DIR";
pub const ENV_GENAI_API_KEY: &str = "RECAP_GENAI_API_KEY";
pub const ENV_GENAI_MODEL: &str = "RECAP_GENAI_MODEL";
pub const ENV_GENAI_ENDPOINT: &str = "RECAP_GENAI_ENDPOINT";
pub const ENV_GENAI_TIMEOUT_MS: &str = "RECAP_GENAI_TIMEOUT_MS";

pub const DEFAULT_DATA_FILE: &str = "data.json";
pub const DEFAULT_GENAI_MODEL: &str = "gemini-pro";
pub const DEFAULT_GENAI_ENDPOINT: &str = "https://generativelanguage.googleapis.com";
pub const DEFAULT_GENAI_TIMEOUT_MS: u64 = 20_000;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    InvalidValue {
        key: &'static str,
        value: String,
        reason: &'static str,
    },
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidValue { key, value, reason } => {
                write!(f, "invalid value `{value}` for {key}: {reason}")
            }
        }
    }
}

impl Error for ConfigError {}

/// Settings for the external text-generation backend.
#[derive(Clone, PartialEq, Eq)]
pub struct NarrativeConfig {
    pub api_key: String,
    pub model: String,
    /// Base URL; the model path is appended per request.
    pub endpoint: String,
    pub timeout_ms: u64,
}

impl Debug for NarrativeConfig {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NarrativeConfig")
            .field("api_key", &"<redacted>")
            .field("model", &self.model)
            .field("endpoint", &self.endpoint)
            .field("timeout_ms", &self.timeout_ms)
            .finish()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecapConfig {
    pub data_file: PathBuf,
    pub log_level: String,
    /// File logging is off when unset.
    pub log_dir: Option<PathBuf>,
    pub narrative: Option<NarrativeConfig>,
}

impl Default for RecapConfig {
    fn default() -> Self {
        Self {
            data_file: PathBuf::from(DEFAULT_DATA_FILE),
            log_level: default_log_level().to_string(),
            log_dir: None,
            narrative: None,
        }
    }
}

impl RecapConfig {
    /// Reads configuration from process environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads configuration through `lookup`; blank values count as unset.
    ///
    /// # Errors
    /// - Returns `ConfigError::InvalidValue` when the timeout is not a positive integer.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let defaults = Self::default();
        let narrative = match get(ENV_GENAI_API_KEY) {
            Some(api_key) => Some(NarrativeConfig {
                api_key,
                model: get(ENV_GENAI_MODEL).unwrap_or_else(|| DEFAULT_GENAI_MODEL.to_string()),
                endpoint: get(ENV_GENAI_ENDPOINT)
                    .unwrap_or_else(|| DEFAULT_GENAI_ENDPOINT.to_string()),
                timeout_ms: match get(ENV_GENAI_TIMEOUT_MS) {
                    Some(raw) => parse_timeout_ms(&raw)?,
                    None => DEFAULT_GENAI_TIMEOUT_MS,
                },
            }),
            None => None,
        };

        Ok(Self {
            data_file: get(ENV_DATA_FILE)
                .map(PathBuf::from)
                .unwrap_or(defaults.data_file),
            log_level: get(ENV_LOG_LEVEL).unwrap_or(defaults.log_level),
            log_dir: get(ENV_LOG_DIR).map(PathBuf::from),
            narrative,
        })
    }
}

fn parse_timeout_ms(raw: &str) -> Result<u64, ConfigError> {
    match raw.parse::<u64>() {
        Ok(0) => Err(ConfigError::InvalidValue {
            key: ENV_GENAI_TIMEOUT_MS,
            value: raw.to_string(),
            reason: "timeout must be > 0",
        }),
        Ok(value) => Ok(value),
        Err(_) => Err(ConfigError::InvalidValue {
            key: ENV_GENAI_TIMEOUT_MS,
            value: raw.to_string(),
            reason: "expected milliseconds as an integer",
        }),
    }
}
