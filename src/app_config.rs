use anyhow::{Context, Result, anyhow};
use serde::{Deserialize, Serialize};
use std::default::Default;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use url::Url;

use crate::language_utils;

/// Application configuration module
/// This module handles loading, validating and saving configuration settings.
/// Everything the pipeline's collaborators need is carried here and handed
/// to their constructors; nothing is read from ambient process state.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Config {
    /// Content host (GraphQL) settings
    #[serde(default)]
    pub content_source: ContentSourceConfig,

    /// Localization engine settings
    #[serde(default)]
    pub engine: EngineConfig,

    /// Target languages a request may ask for
    #[serde(default = "language_utils::default_supported_languages")]
    pub supported_languages: Vec<String>,

    /// Run title and body detection/translation as joined concurrent tasks
    #[serde(default)]
    pub concurrent_detection: bool,

    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,
}

/// Content-hosting GraphQL endpoint configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ContentSourceConfig {
    /// GraphQL endpoint URL
    #[serde(default = "default_content_endpoint")]
    pub endpoint: String,

    /// Bearer token sent with every query
    #[serde(default = "String::new")]
    pub api_token: String,

    /// Request timeout in seconds
    #[serde(default = "default_content_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for ContentSourceConfig {
    fn default() -> Self {
        Self {
            endpoint: default_content_endpoint(),
            api_token: String::new(),
            timeout_secs: default_content_timeout_secs(),
        }
    }
}

/// Localization engine configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct EngineConfig {
    /// Engine base URL
    #[serde(default = "default_engine_endpoint")]
    pub endpoint: String,

    /// API key for the engine
    #[serde(default = "String::new")]
    pub api_key: String,

    /// Request timeout in seconds
    #[serde(default = "default_engine_timeout_secs")]
    pub timeout_secs: u64,

    /// Maximum number of keys sent in one localization chunk
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,

    /// Word count after which a localization chunk is closed
    #[serde(default = "default_ideal_batch_item_size")]
    pub ideal_batch_item_size: usize,

    /// Ask the engine for its fast mode when translating titles
    #[serde(default = "default_true")]
    pub fast_title: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            endpoint: default_engine_endpoint(),
            api_key: String::new(),
            timeout_secs: default_engine_timeout_secs(),
            batch_size: default_batch_size(),
            ideal_batch_item_size: default_ideal_batch_item_size(),
            fast_title: true,
        }
    }
}

/// Log verbosity level
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    pub fn to_level_filter(&self) -> log::LevelFilter {
        match self {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

fn default_content_endpoint() -> String {
    "https://gql.hashnode.com".to_string()
}

fn default_engine_endpoint() -> String {
    "https://engine.lingo.dev".to_string()
}

fn default_content_timeout_secs() -> u64 {
    30
}

fn default_engine_timeout_secs() -> u64 {
    60
}

fn default_batch_size() -> usize {
    25
}

fn default_ideal_batch_item_size() -> usize {
    250
}

fn default_true() -> bool {
    true
}

impl Config {
    /// Load a configuration file, or write and return the defaults if it does not exist
    pub fn load_or_create(path: &Path) -> Result<Self> {
        if path.exists() {
            let file = File::open(path)
                .context(format!("Failed to open config file: {}", path.display()))?;
            let reader = BufReader::new(file);
            let config: Config = serde_json::from_reader(reader)
                .context(format!("Failed to parse config file: {}", path.display()))?;
            return Ok(config);
        }

        log::warn!(
            "Config file not found at '{}', creating default config.",
            path.display()
        );
        let config = Config::default();
        let config_json = serde_json::to_string_pretty(&config)
            .context("Failed to serialize default config to JSON")?;
        std::fs::write(path, config_json).context(format!(
            "Failed to write default config to file: {}",
            path.display()
        ))?;

        Ok(config)
    }

    /// Validate the configuration for consistency and required values
    pub fn validate(&self) -> Result<()> {
        Url::parse(&self.content_source.endpoint).context(format!(
            "Invalid content source endpoint: {}",
            self.content_source.endpoint
        ))?;
        Url::parse(&self.engine.endpoint)
            .context(format!("Invalid engine endpoint: {}", self.engine.endpoint))?;

        if self.content_source.api_token.trim().is_empty() {
            return Err(anyhow!("Content source API token is required"));
        }
        if self.engine.api_key.trim().is_empty() {
            return Err(anyhow!("Localization engine API key is required"));
        }
        if self.content_source.timeout_secs == 0 || self.engine.timeout_secs == 0 {
            return Err(anyhow!("Timeouts must be greater than zero"));
        }
        if self.engine.batch_size == 0 || self.engine.ideal_batch_item_size == 0 {
            return Err(anyhow!("Engine batch sizes must be greater than zero"));
        }

        if self.supported_languages.is_empty() {
            return Err(anyhow!("At least one supported language is required"));
        }
        for code in &self.supported_languages {
            language_utils::validate_locale(code)
                .context(format!("Invalid supported language: {}", code))?;
        }

        Ok(())
    }
}

/// Default implementation for Config
impl Default for Config {
    fn default() -> Self {
        Config {
            content_source: ContentSourceConfig::default(),
            engine: EngineConfig::default(),
            supported_languages: language_utils::default_supported_languages(),
            concurrent_detection: false,
            log_level: LogLevel::default(),
        }
    }
}
