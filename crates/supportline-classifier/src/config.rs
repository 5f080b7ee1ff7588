//! Classifier configuration

use serde::{Deserialize, Serialize};
use std::path::Path;
use supportline_core::{Error, Result};

/// Model used when none is configured
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";

/// Sampling temperature for the first attempt
pub const DEFAULT_TEMPERATURE: f32 = 0.2;

/// Sampling temperature for the corrective attempt
pub const CORRECTION_TEMPERATURE: f32 = 0.0;

/// Base URL of the Generative Language REST API
pub const DEFAULT_API_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Per-request timeout in seconds
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// Configuration for the classifier pipeline and its model client
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassifierConfig {
    /// Model identifier
    #[serde(default = "default_model")]
    pub model: String,

    /// Temperature for the first attempt
    #[serde(default = "default_temperature")]
    pub temperature: f32,

    /// Model API base URL
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,

    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Log raw model responses at debug level
    #[serde(default)]
    pub log_raw_responses: bool,
}

impl ClassifierConfig {
    /// Check values that serde cannot enforce
    pub fn validate(&self) -> Result<()> {
        if self.model.trim().is_empty() {
            return Err(Error::config("model identifier must not be empty"));
        }

        if !(0.0..=2.0).contains(&self.temperature) {
            return Err(Error::config(format!(
                "temperature must be within [0, 2], got {}",
                self.temperature
            )));
        }

        if self.timeout_secs == 0 {
            return Err(Error::config("timeout_secs must be greater than zero"));
        }

        if self.api_base_url.trim().is_empty() {
            return Err(Error::config("api_base_url must not be empty"));
        }

        Ok(())
    }

    /// Settings needed to build the model client
    pub fn model_settings(&self) -> ModelSettings {
        ModelSettings {
            api_base_url: self.api_base_url.clone(),
            timeout_secs: self.timeout_secs,
        }
    }
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            model: default_model(),
            temperature: default_temperature(),
            api_base_url: default_api_base_url(),
            timeout_secs: default_timeout_secs(),
            log_raw_responses: false,
        }
    }
}

/// Connection settings for the hosted model client
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelSettings {
    pub api_base_url: String,
    pub timeout_secs: u64,
}

impl Default for ModelSettings {
    fn default() -> Self {
        ClassifierConfig::default().model_settings()
    }
}

/// Load classifier configuration from a YAML file
pub fn load_config(path: impl AsRef<Path>) -> Result<ClassifierConfig> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path)?;

    let config: ClassifierConfig = serde_yaml::from_str(&content).map_err(|e| {
        Error::config(format!("Failed to parse {}: {}", path.display(), e))
    })?;
    config.validate()?;

    Ok(config)
}

fn default_model() -> String {
    DEFAULT_MODEL.to_string()
}

fn default_temperature() -> f32 {
    DEFAULT_TEMPERATURE
}

fn default_api_base_url() -> String {
    DEFAULT_API_BASE_URL.to_string()
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}
