use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Application configuration module
/// This module handles the application configuration including loading,
/// validating and saving configuration settings.
/// Represents the application configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Config {
    /// Target language code (ISO 639-1) or English language name
    #[serde(default = "default_target_language")]
    pub target_language: String,

    /// Maximum characters per segment
    #[serde(default = "default_segment_max_chars")]
    pub segment_max_chars: usize,

    /// Pacing delay between completed segments, in milliseconds
    #[serde(default = "default_pacing_ms")]
    pub pacing_ms: u64,

    /// Engine chain configuration
    #[serde(default)]
    pub engines: EnginesConfig,

    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,
}

/// Configuration for the engine fallback chain
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct EnginesConfig {
    /// Groq engine (primary)
    #[serde(default = "EngineConfig::default_groq")]
    pub groq: EngineConfig,

    /// Gemini engine (fallback)
    #[serde(default = "EngineConfig::default_gemini")]
    pub gemini: EngineConfig,
}

impl Default for EnginesConfig {
    fn default() -> Self {
        Self {
            groq: EngineConfig::default_groq(),
            gemini: EngineConfig::default_gemini(),
        }
    }
}

/// Configuration for one translation engine
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct EngineConfig {
    /// API key
    #[serde(default = "String::new")]
    pub api_key: String,

    /// Service URL; empty means the public endpoint
    #[serde(default = "String::new")]
    pub endpoint: String,

    /// Ordered model identifiers to try
    #[serde(default)]
    pub models: Vec<String>,

    /// Chain position; lower values are tried first
    #[serde(default)]
    pub priority: u32,

    /// Maximum number of attempts per segment
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    /// Base backoff in milliseconds
    #[serde(default = "default_backoff_base_ms")]
    pub backoff_base_ms: u64,
}

impl EngineConfig {
    /// Default configuration for the Groq engine
    pub fn default_groq() -> Self {
        Self {
            api_key: String::new(),
            endpoint: String::new(),
            models: vec![
                "llama-3.3-70b-versatile".to_string(),
                "llama-3.1-8b-instant".to_string(),
            ],
            priority: 0,
            max_retries: default_max_retries(),
            backoff_base_ms: default_backoff_base_ms(),
        }
    }

    /// Default configuration for the Gemini engine
    pub fn default_gemini() -> Self {
        Self {
            api_key: String::new(),
            endpoint: String::new(),
            models: vec![
                "gemini-1.5-flash".to_string(),
                "gemini-1.5-flash-8b".to_string(),
            ],
            priority: 1,
            max_retries: default_max_retries(),
            backoff_base_ms: default_backoff_base_ms(),
        }
    }
}

/// Log level for the application
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Error level
    Error,
    /// Warning level
    Warn,
    /// Info level
    #[default]
    Info,
    /// Debug level
    Debug,
    /// Trace level
    Trace,
}

impl LogLevel {
    /// Convert to a log crate level filter
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

fn default_target_language() -> String {
    "es".to_string()
}

fn default_segment_max_chars() -> usize {
    2000
}

fn default_pacing_ms() -> u64 {
    500
}

fn default_max_retries() -> u32 {
    3
}

fn default_backoff_base_ms() -> u64 {
    1000
}

impl Default for Config {
    fn default() -> Self {
        Self {
            target_language: default_target_language(),
            segment_max_chars: default_segment_max_chars(),
            pacing_ms: default_pacing_ms(),
            engines: EnginesConfig::default(),
            log_level: LogLevel::default(),
        }
    }
}

impl Config {
    /// Create a default configuration
    pub fn default_config() -> Self {
        Self::default()
    }

    /// Load configuration from a JSON file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(|e| {
            anyhow!(
                "Failed to read config file {}: {}",
                path.as_ref().display(),
                e
            )
        })?;
        let config: Config = serde_json::from_str(&content)
            .map_err(|e| anyhow!("Failed to parse config file: {}", e))?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to a JSON file
    pub fn to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(&path, content).map_err(|e| {
            anyhow!(
                "Failed to write config file {}: {}",
                path.as_ref().display(),
                e
            )
        })?;
        Ok(())
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.segment_max_chars == 0 {
            return Err(anyhow!("segment_max_chars must be greater than zero"));
        }
        if self.target_language.trim().is_empty() {
            return Err(anyhow!("target_language must not be empty"));
        }
        if self.engines.groq.models.is_empty() && self.engines.gemini.models.is_empty() {
            return Err(anyhow!("at least one engine must have a model configured"));
        }
        Ok(())
    }

    /// Fill in missing credentials from the environment.
    ///
    /// `GROQ_API_KEY` and `GEMINI_API_KEY` are consulted only when the config
    /// file left the corresponding key empty, so explicit configuration wins.
    pub fn apply_env_credentials(&mut self) {
        if self.engines.groq.api_key.is_empty() {
            if let Ok(key) = std::env::var("GROQ_API_KEY") {
                self.engines.groq.api_key = key;
            }
        }
        if self.engines.gemini.api_key.is_empty() {
            if let Ok(key) = std::env::var("GEMINI_API_KEY") {
                self.engines.gemini.api_key = key;
            }
        }
    }

    /// Resolve the configured target language to an English display name.
    ///
    /// Accepts an ISO 639-1 code ("es"), an ISO 639-3 code ("spa") or an
    /// English name ("Spanish"); the display name is what the engines see in
    /// their prompts.
    pub fn target_language_name(&self) -> Result<String> {
        let raw = self.target_language.trim();

        let language = match raw.len() {
            2 => isolang::Language::from_639_1(&raw.to_lowercase()),
            3 => isolang::Language::from_639_3(&raw.to_lowercase()),
            _ => isolang::Language::from_name(raw),
        };

        language
            .map(|l| l.to_name().to_string())
            .ok_or_else(|| anyhow!("Unknown target language: {}", raw))
    }
}
