//! Configuration management for SymptomCheck
//!
//! TOML configuration with defaults and validation, plus the API credential
//! which is only ever read from the environment (optionally seeded from a
//! `.env` file). Location: ~/.symptomcheck/config.toml

use crate::errors::{CheckerError, Result};
use crate::repl::theme::Theme;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Environment variable holding the model API key
pub const API_KEY_ENV: &str = "GOOGLE_API_KEY";

/// Complete configuration for SymptomCheck
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub model: ModelConfig,
    #[serde(default)]
    pub dataset: DatasetConfig,
    #[serde(default)]
    pub display: DisplayConfig,
}

/// Language model endpoint configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    pub base_url: String,
    pub model: String,
    pub temperature: f32,
    pub timeout_secs: u64,
}

/// Dataset location
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DatasetConfig {
    pub path: PathBuf,
    /// Header prefix identifying symptom columns
    pub symptom_prefix: String,
}

/// Terminal presentation
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    pub theme: Theme,
    pub show_progress: bool,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            base_url: "https://generativelanguage.googleapis.com".to_string(),
            model: "gemini-1.5-flash".to_string(),
            temperature: 0.1,
            timeout_secs: 30,
        }
    }
}

impl Default for DatasetConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("dataset.csv"),
            symptom_prefix: crate::dataset::DEFAULT_SYMPTOM_PREFIX.to_string(),
        }
    }
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            theme: Theme::Light,
            show_progress: true,
        }
    }
}

impl ModelConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Config {
    /// Load configuration from file or use defaults
    pub fn load(path: Option<&Path>) -> Result<Self> {
        if let Some(config_path) = path {
            Self::load_from_file(config_path)
        } else {
            Self::load_default()
        }
    }

    /// Load configuration from specific file
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| CheckerError::Config(format!("Failed to read config {}: {}", path.display(), e)))?;

        let config: Config = toml::from_str(&contents)
            .map_err(|e| CheckerError::Config(format!("Failed to parse config: {}", e)))?;

        config.validate()?;
        Ok(config)
    }

    /// Load from the standard location, falling back to built-in defaults
    pub fn load_default() -> Result<Self> {
        if let Some(config_path) = Self::default_path() {
            if config_path.exists() {
                return Self::load_from_file(&config_path);
            }
        }

        Ok(Config::default())
    }

    /// ~/.symptomcheck/config.toml
    pub fn default_path() -> Option<PathBuf> {
        dirs::home_dir().map(|home| home.join(".symptomcheck").join("config.toml"))
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        if !(self.model.base_url.starts_with("http://") || self.model.base_url.starts_with("https://")) {
            return Err(CheckerError::Config(format!(
                "model.base_url must be an http(s) URL, got '{}'",
                self.model.base_url
            )));
        }

        if self.model.model.trim().is_empty() {
            return Err(CheckerError::Config("model.model must not be empty".to_string()));
        }

        if !(0.0..=2.0).contains(&self.model.temperature) {
            return Err(CheckerError::Config(
                "model.temperature must be between 0.0 and 2.0".to_string(),
            ));
        }

        if self.model.timeout_secs == 0 {
            return Err(CheckerError::Config(
                "model.timeout_secs must be greater than 0".to_string(),
            ));
        }

        if self.dataset.path.as_os_str().is_empty() {
            return Err(CheckerError::Config("dataset.path must not be empty".to_string()));
        }

        if self.dataset.symptom_prefix.trim().is_empty() {
            return Err(CheckerError::Config(
                "dataset.symptom_prefix must not be empty".to_string(),
            ));
        }

        Ok(())
    }

    /// Save configuration to file
    pub fn save(&self, path: &Path) -> Result<()> {
        let contents = toml::to_string_pretty(self)
            .map_err(|e| CheckerError::Config(format!("Failed to serialize config: {}", e)))?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| CheckerError::Config(format!("Failed to create config dir: {}", e)))?;
        }

        std::fs::write(path, contents)
            .map_err(|e| CheckerError::Config(format!("Failed to write config: {}", e)))?;

        Ok(())
    }
}

/// Model API credential; never printed in full
#[derive(Clone, PartialEq, Eq)]
pub struct ApiKey(String);

impl ApiKey {
    /// Wrap a key, rejecting blank values
    pub fn new(value: impl Into<String>) -> Result<Self> {
        let value = value.into().trim().to_string();
        if value.is_empty() {
            return Err(CheckerError::Config(format!("{} is empty", API_KEY_ENV)));
        }
        Ok(Self(value))
    }

    /// Read the key from `GOOGLE_API_KEY`.
    ///
    /// `.env` is not read here; the binary loads it once at startup.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Resolve the key through an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: FnOnce(&str) -> Option<String>,
    {
        match lookup(API_KEY_ENV) {
            Some(value) => Self::new(value),
            None => Err(CheckerError::Config(format!(
                "{} not found in environment or .env file",
                API_KEY_ENV
            ))),
        }
    }

    pub fn expose(&self) -> &str {
        &self.0
    }

    /// Last four characters, for diagnostics
    pub fn masked(&self) -> String {
        let tail: String = self.0.chars().rev().take(4).collect::<Vec<_>>().into_iter().rev().collect();
        format!("****{}", tail)
    }
}

impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ApiKey").field(&self.masked()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.model.model, "gemini-1.5-flash");
        assert_eq!(config.model.timeout(), Duration::from_secs(30));
        assert_eq!(config.dataset.path, PathBuf::from("dataset.csv"));
        assert_eq!(config.display.theme, Theme::Light);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_validation_temperature() {
        let mut config = Config::default();
        config.model.temperature = 2.5;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_validation_timeout() {
        let mut config = Config::default();
        config.model.timeout_secs = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_validation_base_url() {
        let mut config = Config::default();
        config.model.base_url = "generativelanguage.googleapis.com".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config: Config = toml::from_str("[display]\ntheme = \"dark\"\n").unwrap();
        assert_eq!(config.display.theme, Theme::Dark);
        assert!(config.display.show_progress);
        assert_eq!(config.model.temperature, 0.1);
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut config = Config::default();
        config.model.timeout_secs = 5;
        config.save(&path).unwrap();

        let loaded = Config::load(Some(path.as_path())).unwrap();
        assert_eq!(loaded.model.timeout_secs, 5);
    }

    #[test]
    fn test_load_invalid_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[model]\ntimeout_secs = 0\n").unwrap();
        assert!(matches!(Config::load(Some(path.as_path())), Err(CheckerError::Config(_))));
    }

    #[test]
    fn test_api_key_missing() {
        let err = ApiKey::from_lookup(|_| None).unwrap_err();
        assert!(err.is_fatal());
        assert!(err.to_string().contains(API_KEY_ENV));
    }

    #[test]
    fn test_api_key_blank() {
        assert!(ApiKey::from_lookup(|_| Some("   ".to_string())).is_err());
    }

    #[test]
    fn test_api_key_from_process_environment() {
        std::env::set_var(API_KEY_ENV, "  env-key-7788 ");
        let key = ApiKey::from_env();
        std::env::remove_var(API_KEY_ENV);

        assert_eq!(key.unwrap().expose(), "env-key-7788");
    }

    #[test]
    fn test_api_key_masked() {
        let key = ApiKey::from_lookup(|_| Some("abcdef123456".to_string())).unwrap();
        assert_eq!(key.expose(), "abcdef123456");
        assert_eq!(key.masked(), "****3456");
        assert!(!format!("{:?}", key).contains("abcdef"));
    }
}
