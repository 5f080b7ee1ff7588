//! CLI configuration: file, then environment and flag overrides

use std::path::Path;
use supportline_classifier::{load_config, ClassifierConfig};

/// Values supplied on the command line or through the environment
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub model: Option<String>,
    pub temperature: Option<f32>,
}

/// Load configuration from file and apply overrides
///
/// A missing file is not an error; defaults are used instead.
pub fn load(config_path: &str, overrides: &Overrides) -> anyhow::Result<ClassifierConfig> {
    let mut config = if Path::new(config_path).exists() {
        load_config(config_path)?
    } else {
        tracing::debug!("No config file at {}, using defaults", config_path);
        ClassifierConfig::default()
    };

    if let Some(model) = &overrides.model {
        config.model = model.clone();
    }

    if let Some(temperature) = overrides.temperature {
        config.temperature = temperature;
    }

    config.validate()?;
    Ok(config)
}
