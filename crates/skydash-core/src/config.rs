use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::ConfigError;

const CONFIG_FILE: &str = "config.toml";
const SELECTION_DB_FILE: &str = "selection.db";

/// Default OpenWeatherMap API key; override via `OPENWEATHER_API_KEY` or the
/// config file.
const DEFAULT_API_KEY: &str = "d93b6e9e77fd1e5a83d594d0b1cc7bec";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Application configuration directory
    pub config_dir: PathBuf,

    /// Weather settings
    #[serde(default)]
    pub weather: WeatherConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeatherConfig {
    /// OpenWeatherMap API key
    #[serde(default = "default_api_key")]
    pub api_key: String,
}

fn default_api_key() -> String {
    std::env::var("OPENWEATHER_API_KEY").unwrap_or_else(|_| DEFAULT_API_KEY.to_string())
}

impl Default for WeatherConfig {
    fn default() -> Self {
        Self {
            api_key: default_api_key(),
        }
    }
}

impl WeatherConfig {
    /// Check if an API key is present
    pub fn is_configured(&self) -> bool {
        !self.api_key.is_empty()
    }
}

impl Default for Config {
    fn default() -> Self {
        let config_dir = dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("skydash");

        Self {
            config_dir,
            weather: WeatherConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration from the default directory, creating a default
    /// config file if it doesn't exist
    pub fn load() -> Result<Self, ConfigError> {
        let dir = dirs::config_dir()
            .ok_or(ConfigError::NoConfigDir)?
            .join("skydash");
        Self::load_from(&dir)
    }

    /// Load configuration from a specific directory
    pub fn load_from(dir: &Path) -> Result<Self, ConfigError> {
        let config_path = dir.join(CONFIG_FILE);

        if !config_path.exists() {
            let mut config = Self::default();
            config.config_dir = dir.to_path_buf();
            config.save()?;
            return Ok(config);
        }

        let contents = std::fs::read_to_string(&config_path)?;
        let config: Config = toml::from_str(&contents)?;

        Ok(config)
    }

    /// Save configuration to its config directory
    pub fn save(&self) -> Result<(), ConfigError> {
        std::fs::create_dir_all(&self.config_dir)?;
        let contents = toml::to_string_pretty(self)?;
        std::fs::write(self.config_dir.join(CONFIG_FILE), contents)?;
        Ok(())
    }

    /// Path of the SQLite database holding the persisted city selection
    pub fn selection_db_path(&self) -> PathBuf {
        self.config_dir.join(SELECTION_DB_FILE)
    }
}
