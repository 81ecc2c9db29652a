//! Settings resolution
//!
//! Settings come from three layers: command-line flags (or their environment
//! variables), an optional TOML file, and built-in defaults. The first layer
//! that sets a value wins. Reading the file is the shell's job; everything
//! here works on strings and plain values.

use serde::Deserialize;
use std::time::Duration;

pub const DEFAULT_OLLAMA_URL: &str = "http://localhost:11434";
pub const DEFAULT_MODEL: &str = "llama3:8b";
pub const DEFAULT_TEMPERATURE: f64 = 0.8;
pub const DEFAULT_TIMEOUT_SECS: u64 = 120;

const TEMPERATURE_RANGE: std::ops::RangeInclusive<f64> = 0.0..=2.0;

/// One layer of optional settings, either from the CLI or from the config file.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PartialSettings {
    pub ollama_url: Option<String>,
    pub model: Option<String>,
    pub temperature: Option<f64>,
    pub timeout_secs: Option<u64>,
}

/// Fully resolved, process-wide settings for the model client.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub ollama_url: String,
    pub model: String,
    pub temperature: f64,
    pub timeout: Duration,
}

#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("Invalid config file: {0}")]
    Parse(String),

    #[error("Temperature must be between 0.0 and 2.0, got {0}")]
    InvalidTemperature(f64),

    #[error("Timeout must be greater than zero seconds")]
    InvalidTimeout,

    #[error("Setting '{0}' must not be empty")]
    Empty(&'static str),
}

/// Parse the contents of a TOML config file.
pub fn parse_config(text: &str) -> Result<PartialSettings, ConfigError> {
    toml::from_str(text).map_err(|e| ConfigError::Parse(e.to_string()))
}

/// Merge the CLI layer over the file layer over the defaults, then validate.
pub fn resolve_settings(
    cli: &PartialSettings,
    file: &PartialSettings,
) -> Result<Settings, ConfigError> {
    let ollama_url = cli
        .ollama_url
        .clone()
        .or_else(|| file.ollama_url.clone())
        .unwrap_or_else(|| DEFAULT_OLLAMA_URL.to_string());
    let model = cli
        .model
        .clone()
        .or_else(|| file.model.clone())
        .unwrap_or_else(|| DEFAULT_MODEL.to_string());
    let temperature = cli
        .temperature
        .or(file.temperature)
        .unwrap_or(DEFAULT_TEMPERATURE);
    let timeout_secs = cli
        .timeout_secs
        .or(file.timeout_secs)
        .unwrap_or(DEFAULT_TIMEOUT_SECS);

    if ollama_url.trim().is_empty() {
        return Err(ConfigError::Empty("ollama_url"));
    }

    if model.trim().is_empty() {
        return Err(ConfigError::Empty("model"));
    }

    if !TEMPERATURE_RANGE.contains(&temperature) {
        return Err(ConfigError::InvalidTemperature(temperature));
    }

    if timeout_secs == 0 {
        return Err(ConfigError::InvalidTimeout);
    }

    Ok(Settings {
        ollama_url: ollama_url.trim_end_matches('/').to_string(),
        model,
        temperature,
        timeout: Duration::from_secs(timeout_secs),
    })
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            ollama_url: DEFAULT_OLLAMA_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            temperature: DEFAULT_TEMPERATURE,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}
