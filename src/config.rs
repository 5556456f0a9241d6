//! Configuration management

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;
use crate::Result;
use crate::error::Error;

/// Environment variable that overrides the configured API key
pub const API_KEY_ENV: &str = "DASHSCOPE_API_KEY";

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// API key sent as a Bearer token
    #[serde(default)]
    pub api_key: String,

    /// Base URL of the OpenAI-compatible API (without `/chat/completions`)
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Model to use
    #[serde(default = "default_model")]
    pub model: String,

    /// Maximum model rounds per conversation
    #[serde(default = "default_max_iterations")]
    pub max_iterations: usize,

    /// Optional system message placed before the user prompt
    #[serde(default)]
    pub system_prompt: Option<String>,

    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_secs: u64,

    /// Whole-request timeout
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

fn default_base_url() -> String {
    "https://dashscope.aliyuncs.com/compatible-mode/v1".to_string()
}

fn default_model() -> String {
    "qwen-plus".to_string()
}

fn default_max_iterations() -> usize {
    20
}

fn default_connect_timeout() -> u64 {
    10
}

fn default_timeout() -> u64 {
    60
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: default_base_url(),
            model: default_model(),
            max_iterations: default_max_iterations(),
            system_prompt: None,
            connect_timeout_secs: default_connect_timeout(),
            timeout_secs: default_timeout(),
        }
    }
}

impl Config {
    /// Apply environment overrides (currently only the API key)
    pub fn apply_env(&mut self) {
        self.apply_api_key(std::env::var(API_KEY_ENV).ok());
    }

    fn apply_api_key(&mut self, key: Option<String>) {
        if let Some(key) = key.filter(|k| !k.trim().is_empty()) {
            debug!("Using API key from {}", API_KEY_ENV);
            self.api_key = key.trim().to_string();
        }
    }

    /// Check that the configuration can reach the endpoint
    pub fn validate(&self) -> Result<()> {
        if self.api_key.trim().is_empty() {
            return Err(Error::Config(format!(
                "No API key. Set {} or run 'toolchat onboard'.",
                API_KEY_ENV
            )));
        }
        url::Url::parse(&self.base_url)
            .map_err(|e| Error::Config(format!("Invalid base_url {:?}: {}", self.base_url, e)))?;
        if self.max_iterations == 0 {
            return Err(Error::Config("max_iterations must be at least 1".to_string()));
        }
        Ok(())
    }
}

/// Get the config directory path
pub fn config_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".toolchat")
}

/// Get the config file path
pub fn config_path() -> PathBuf {
    config_dir().join("config.json")
}

/// Load configuration from the default location, then apply the environment
pub fn load() -> Result<Config> {
    let mut config = load_from(&config_path())?;
    config.apply_env();
    Ok(config)
}

/// Load configuration from a file; a missing file yields defaults
pub fn load_from(path: &Path) -> Result<Config> {
    if !path.exists() {
        debug!("No config at {:?}, using defaults", path);
        return Ok(Config::default());
    }

    let content = std::fs::read_to_string(path)?;
    let config: Config = serde_json::from_str(&content)?;
    Ok(config)
}

/// Save configuration to the default location
pub fn save(config: &Config) -> Result<()> {
    save_to(config, &config_path())
}

/// Save configuration to a file
pub fn save_to(config: &Config, path: &Path) -> Result<()> {
    // Create parent directory
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let content = serde_json::to_string_pretty(config)?;
    std::fs::write(path, content)?;
    Ok(())
}

/// Interactive setup: ask for the key and model, then save
pub fn onboard() -> Result<()> {
    use crate::ui;
    use inquire::{Confirm, Text};

    ui::print_header("Setup", "toolchat");
    println!("  Point toolchat at an OpenAI-compatible endpoint.\n");

    let mut config = load_from(&config_path())?;

    let key = Text::new("API key:")
        .with_help_message(&format!("Leave blank to rely on {}", API_KEY_ENV))
        .prompt()?;
    if !key.trim().is_empty() {
        config.api_key = key.trim().to_string();
    }

    config.model = Text::new("Model:").with_default(&config.model).prompt()?;

    let keep_endpoint = Confirm::new(&format!("Use endpoint {}?", config.base_url))
        .with_default(true)
        .prompt()?;
    if !keep_endpoint {
        config.base_url = Text::new("Base URL:").prompt()?;
    }

    url::Url::parse(&config.base_url)
        .map_err(|e| Error::Config(format!("Invalid base_url: {}", e)))?;

    ui::print_thinking("Saving configuration");
    save(&config)?;
    ui::print_success(&format!("Saved to {:?}", config_path()));

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.model, "qwen-plus");
        assert_eq!(config.max_iterations, 20);
        assert_eq!(config.connect_timeout_secs, 10);
        assert!(config.base_url.ends_with("/compatible-mode/v1"));
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let config: Config = serde_json::from_str(r#"{"api_key": "sk-1", "model": "qwen-max"}"#).unwrap();
        assert_eq!(config.api_key, "sk-1");
        assert_eq!(config.model, "qwen-max");
        assert_eq!(config.timeout_secs, 60);
        assert!(config.system_prompt.is_none());
    }

    #[test]
    fn test_save_and_load_round_trip() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("config.json");

        let mut config = Config::default();
        config.api_key = "sk-saved".to_string();
        config.system_prompt = Some("Be brief.".to_string());
        save_to(&config, &path).unwrap();

        let loaded = load_from(&path).unwrap();
        assert_eq!(loaded.api_key, "sk-saved");
        assert_eq!(loaded.system_prompt.as_deref(), Some("Be brief."));
    }

    #[test]
    fn test_missing_file_is_default() {
        let dir = TempDir::new().unwrap();
        let loaded = load_from(&dir.path().join("absent.json")).unwrap();
        assert_eq!(loaded.model, "qwen-plus");
    }

    #[test]
    fn test_malformed_file_is_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, "{ nope").unwrap();
        assert!(matches!(load_from(&path), Err(Error::Json(_))));
    }

    #[test]
    fn test_api_key_override() {
        let mut config = Config::default();
        config.api_key = "from-file".to_string();

        config.apply_api_key(Some("   ".to_string()));
        assert_eq!(config.api_key, "from-file");

        config.apply_api_key(Some(" sk-env ".to_string()));
        assert_eq!(config.api_key, "sk-env");
    }

    #[test]
    fn test_validate() {
        let mut config = Config::default();
        assert!(matches!(config.validate(), Err(Error::Config(_))));

        config.api_key = "sk".to_string();
        assert!(config.validate().is_ok());

        config.max_iterations = 0;
        assert!(config.validate().is_err());

        config.max_iterations = 5;
        config.base_url = "::".to_string();
        assert!(config.validate().is_err());
    }
}
