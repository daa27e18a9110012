use crate::constants;
use crate::error::{Result, ScraperError};
use serde::Deserialize;
use std::fs;
use std::path::Path;

/// Tunables loaded from `config.toml` in the working directory. The file is
/// optional; a present but unparseable file is a hard error.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub scraper: ScraperConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ScraperConfig {
    pub concurrency: usize,
    pub output_dir: String,
}

impl Default for ScraperConfig {
    fn default() -> Self {
        Self {
            concurrency: constants::DEFAULT_CONCURRENCY,
            output_dir: ".".to_string(),
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let config_path = "config.toml";
        if !Path::new(config_path).exists() {
            return Ok(Self { scraper: ScraperConfig::default() });
        }

        let config_content = fs::read_to_string(config_path).map_err(|e| {
            ScraperError::Config(format!("Failed to read config file '{}': {}", config_path, e))
        })?;

        let config: Config = toml::from_str(&config_content)?;
        Ok(config)
    }
}
