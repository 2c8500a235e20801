//! Configuration loading and management for precis.
//!
//! Loads settings from `precis.toml` with environment variable overrides for sensitive data.
//! Every section has defaults, so running without a config file is fine.

use crate::prompt::DEFAULT_MAX_CHARS;
use crate::summary::{ModelId, SummaryRequest, SummaryStyle};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Environment variable holding the Groq API key
pub const API_KEY_ENV: &str = "GROQ_API_KEY";

/// Environment variable pointing at an explicit config file
pub const CONFIG_PATH_ENV: &str = "PRECIS_CONFIG";

/// OpenAI-compatible base URL of the Groq API
pub const DEFAULT_ENDPOINT: &str = "https://api.groq.com/openai/v1";

const CONFIG_FILE_NAME: &str = "precis.toml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),
    #[error("failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),
    #[error("missing API key, set GROQ_API_KEY or api.groq_key")]
    MissingApiKey,
}

/// LLM provider configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AgentConfig {
    /// Model preselected in the menus
    pub model: ModelId,
    /// Summary style preselected in the menus
    pub style: SummaryStyle,
    /// Base URL of the OpenAI-compatible API
    pub endpoint: String,
    pub timeout_secs: u64,
    pub temperature: Option<f32>,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            model: ModelId::default(),
            style: SummaryStyle::default(),
            endpoint: DEFAULT_ENDPOINT.to_string(),
            timeout_secs: 60,
            temperature: None,
        }
    }
}

/// Which extraction implementation to use
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum ExtractorBackend {
    /// Readability article parsing
    #[default]
    Readability,
    /// CSS selector text extraction
    Selector,
}

/// Content extraction configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractorConfig {
    pub backend: ExtractorBackend,
    /// Characters of page text embedded in prompts; 0 means no limit
    pub max_chars: usize,
    pub timeout_secs: u64,
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            backend: ExtractorBackend::default(),
            max_chars: DEFAULT_MAX_CHARS,
            timeout_secs: 30,
        }
    }
}

impl ExtractorConfig {
    /// Prompt cap, or `None` when disabled
    pub fn prompt_cap(&self) -> Option<usize> {
        (self.max_chars > 0).then_some(self.max_chars)
    }
}

/// API keys configuration (loaded from environment)
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ApiConfig {
    #[serde(default)]
    pub groq_key: Option<String>,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// Filter used when `RUST_LOG` is unset
    pub level: String,
    /// Log file for the TUI; logs are dropped there when unset
    pub file: Option<PathBuf>,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
            file: None,
        }
    }
}

/// Root configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub agent: AgentConfig,
    #[serde(default)]
    pub extractor: ExtractorConfig,
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub log: LogConfig,
}

impl Config {
    /// Load configuration from the default location, falling back to defaults
    pub fn load() -> Result<Self, ConfigError> {
        match Self::find_config_file() {
            Some(path) => Self::load_from(&path),
            None => {
                let mut config = Config::default();
                config.apply_env();
                Ok(config)
            }
        }
    }

    /// Load configuration from a specific path
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let mut config: Config = toml::from_str(&content)?;
        config.apply_env();
        Ok(config)
    }

    /// Override API keys from environment variables
    fn apply_env(&mut self) {
        if let Ok(key) = std::env::var(API_KEY_ENV) {
            if !key.trim().is_empty() {
                self.api.groq_key = Some(key);
            }
        }
    }

    /// Find the config file in standard locations
    fn find_config_file() -> Option<PathBuf> {
        if let Ok(path) = std::env::var(CONFIG_PATH_ENV) {
            return Some(PathBuf::from(path));
        }

        // Check current directory first
        let local_config = PathBuf::from(CONFIG_FILE_NAME);
        if local_config.exists() {
            return Some(local_config);
        }

        // Check home directory
        let home_config = dirs::home_dir()?
            .join(".config")
            .join("precis")
            .join(CONFIG_FILE_NAME);
        home_config.exists().then_some(home_config)
    }

    /// Get the Groq API key
    pub fn api_key(&self) -> Result<&str, ConfigError> {
        self.api
            .groq_key
            .as_deref()
            .filter(|key| !key.trim().is_empty())
            .ok_or(ConfigError::MissingApiKey)
    }

    /// Menu selection the surfaces start from
    pub fn default_request(&self) -> SummaryRequest {
        SummaryRequest::new(self.agent.style, self.agent.model)
    }
}
