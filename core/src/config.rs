use crate::errors::{DorkError, DorkResult};
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const DEFAULT_MODEL: &str = "gemini-2.0-flash";
pub const DEFAULT_COMMENTARY_LANGUAGE: &str = "Russian";
pub const DEFAULT_SEARCH_ENGINE_URL: &str = "https://www.google.com/search";
pub const DEFAULT_LOG_LEVEL: &str = "warn";
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 60;

/// Configuration for dorkcraft
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
pub struct DorkConfig {
    pub api_key: Option<String>,
    pub model_name: Option<String>,
    pub enhancement_model: Option<String>,
    pub commentary_language: Option<String>,
    pub search_engine_url: Option<String>,
    pub log_level: Option<String>,
    pub temperature: Option<f32>,
    pub request_timeout_secs: Option<u64>,
}

impl DorkConfig {
    /// Loads configuration from a file if it exists, otherwise returns the default config
    pub fn load_from_file(path: &Path) -> DorkResult<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path).map_err(|e| {
            DorkError::ConfigError(format!("Failed to read config file: {}", e))
        })?;

        toml::from_str(&content)
            .map_err(|e| DorkError::ConfigError(format!("Failed to parse config file: {}", e)))
    }

    /// Saves configuration to a file
    pub fn save_to_file(&self, path: &Path) -> DorkResult<()> {
        let content = toml::to_string(self).map_err(|e| {
            DorkError::ConfigError(format!("Failed to serialize config: {}", e))
        })?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                DorkError::ConfigError(format!("Failed to create config directory: {}", e))
            })?;
        }

        fs::write(path, content)
            .map_err(|e| DorkError::ConfigError(format!("Failed to write config file: {}", e)))
    }

    /// Reads overrides from the process environment (and `.env`, if present)
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Builds the environment layer from a variable lookup. Blank values are
    /// treated as unset so they never shadow the config file.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_blank = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());

        Self {
            api_key: non_blank("GEMINI_API_KEY").or_else(|| non_blank("API_KEY")),
            model_name: non_blank("DORKCRAFT_MODEL"),
            ..Self::default()
        }
    }

    /// Defaults, then the config file, then the environment
    pub fn load(path: Option<&Path>) -> DorkResult<Self> {
        Ok(Self::load_file_layer(path)?.merge(&Self::from_env()))
    }

    fn load_file_layer(path: Option<&Path>) -> DorkResult<Self> {
        match path {
            Some(path) => Self::load_from_file(path),
            None => match get_default_config_file("dorkcraft") {
                Ok(default_path) => Self::load_from_file(&default_path),
                Err(_) => Ok(Self::default()),
            },
        }
    }

    /// Merges this config with another config, preferring values from the other config if present
    pub fn merge(&self, other: &Self) -> Self {
        Self {
            api_key: other.api_key.clone().or_else(|| self.api_key.clone()),
            model_name: other.model_name.clone().or_else(|| self.model_name.clone()),
            enhancement_model: other
                .enhancement_model
                .clone()
                .or_else(|| self.enhancement_model.clone()),
            commentary_language: other
                .commentary_language
                .clone()
                .or_else(|| self.commentary_language.clone()),
            search_engine_url: other
                .search_engine_url
                .clone()
                .or_else(|| self.search_engine_url.clone()),
            log_level: other.log_level.clone().or_else(|| self.log_level.clone()),
            temperature: other.temperature.or(self.temperature),
            request_timeout_secs: other.request_timeout_secs.or(self.request_timeout_secs),
        }
    }

    /// The credential for the AI boundary; blank keys count as missing
    pub fn credential(&self) -> Option<&str> {
        self.api_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty())
    }

    pub fn model(&self) -> &str {
        self.model_name.as_deref().unwrap_or(DEFAULT_MODEL)
    }

    pub fn enhancement_model(&self) -> &str {
        self.enhancement_model.as_deref().unwrap_or_else(|| self.model())
    }

    pub fn commentary_language(&self) -> &str {
        self.commentary_language
            .as_deref()
            .unwrap_or(DEFAULT_COMMENTARY_LANGUAGE)
    }

    pub fn search_engine_url(&self) -> &str {
        self.search_engine_url
            .as_deref()
            .unwrap_or(DEFAULT_SEARCH_ENGINE_URL)
    }

    pub fn log_level(&self) -> &str {
        self.log_level.as_deref().unwrap_or(DEFAULT_LOG_LEVEL)
    }

    /// Upper bound for one AI request, connect to last byte
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(
            self.request_timeout_secs
                .filter(|secs| *secs > 0)
                .unwrap_or(DEFAULT_REQUEST_TIMEOUT_SECS),
        )
    }
}

/// Helper function to get default config directory
pub fn get_default_config_dir(app_name: &str) -> DorkResult<PathBuf> {
    let home_dir = dirs::home_dir().ok_or_else(|| {
        DorkError::ConfigError("Could not determine home directory".to_string())
    })?;

    Ok(home_dir.join(".config").join(app_name))
}

/// Helper function to get default config file path
pub fn get_default_config_file(app_name: &str) -> DorkResult<PathBuf> {
    let config_dir = get_default_config_dir(app_name)?;
    Ok(config_dir.join("config.toml"))
}
