use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::llm::{LLMConfig, LLMProvider};
use crate::playlist::DEFAULT_PLAYLIST_KEY;
use crate::search::MAX_RESULTS_LIMIT;

/// Configuration for StreamVerse
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    /// Where the playlist is persisted
    pub storage: StorageConfig,

    /// YouTube Data API search settings
    pub search: SearchConfig,

    /// Generative-text backend used by the AI helpers
    pub llm: LLMConfig,

    /// Local HTTP API settings
    pub server: ServerConfig,

    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Directory holding one JSON file per storage key
    pub data_dir: PathBuf,

    /// Key the playlist array is stored under
    pub playlist_key: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("./data"),
            playlist_key: DEFAULT_PLAYLIST_KEY.to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// YouTube Data API key; search is unavailable without it
    pub api_key: Option<String>,

    /// API root, overridable for tests and proxies
    pub base_url: String,

    /// Results requested when the caller does not say
    pub max_results: u32,

    pub timeout_seconds: u64,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: "https://www.googleapis.com/youtube/v3".to_string(),
            max_results: 10,
            timeout_seconds: 30,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 9002,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default filter when `RUST_LOG` is unset
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from file, falling back to the environment
    pub fn load() -> Result<Self> {
        let config_paths = ["streamverse.toml", "config/streamverse.toml"];

        for path in &config_paths {
            if let Ok(config_str) = std::fs::read_to_string(path) {
                match toml::from_str::<Config>(&config_str) {
                    Ok(mut config) => {
                        tracing::info!("📄 Loaded configuration from: {}", path);
                        config.apply_overrides(|key| std::env::var(key).ok());
                        return Ok(config);
                    }
                    Err(e) => {
                        tracing::warn!("Failed to parse config file {}: {}", path, e);
                    }
                }
            }
        }

        Self::from_env()
    }

    /// Load configuration from a specific file
    pub fn load_from(path: &str) -> Result<Self> {
        let config_str = std::fs::read_to_string(path)
            .map_err(|e| anyhow!("Cannot read config file {}: {}", path, e))?;
        let mut config: Config = toml::from_str(&config_str)?;
        config.apply_overrides(|key| std::env::var(key).ok());
        tracing::info!("📄 Loaded configuration from: {}", path);
        Ok(config)
    }

    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();
        config.apply_overrides(|key| std::env::var(key).ok());
        Ok(config)
    }

    /// Apply environment-style overrides from `lookup`
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(api_key) = lookup("YOUTUBE_API_KEY") {
            self.search.api_key = Some(api_key);
        }

        if let Some(data_dir) = lookup("STREAMVERSE_DATA_DIR") {
            self.storage.data_dir = PathBuf::from(data_dir);
        }

        if let Some(api_key) =
            lookup("STREAMVERSE_LLM_API_KEY").or_else(|| lookup("GEMINI_API_KEY"))
        {
            self.llm.api_key = Some(api_key);
        }

        if let Some(port) = lookup("STREAMVERSE_PORT") {
            match port.parse() {
                Ok(port) => self.server.port = port,
                Err(_) => tracing::warn!("Ignoring invalid STREAMVERSE_PORT '{}'", port),
            }
        }

        if let Some(level) = lookup("STREAMVERSE_LOG_LEVEL") {
            self.logging.level = level;
        }
    }

    /// Save configuration to file
    pub fn save(&self, path: &str) -> Result<()> {
        let config_str = toml::to_string_pretty(self)?;
        std::fs::write(path, config_str)?;
        tracing::info!("💾 Configuration saved to: {}", path);
        Ok(())
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        let key = &self.storage.playlist_key;
        let valid_char = |c: char| c.is_ascii_alphanumeric() || c == '-' || c == '_';
        if key.is_empty() || !key.chars().all(valid_char) {
            return Err(anyhow!(
                "playlist_key '{}' must be non-empty and contain only letters, digits, '-' or '_'",
                key
            ));
        }

        if self.search.max_results == 0 || self.search.max_results > MAX_RESULTS_LIMIT {
            return Err(anyhow!("search.max_results must be between 1 and {}", MAX_RESULTS_LIMIT));
        }

        url::Url::parse(&self.search.base_url)
            .map_err(|e| anyhow!("search.base_url is not a valid URL: {}", e))?;

        if self.server.port == 0 {
            return Err(anyhow!("server.port must be greater than 0"));
        }

        if !self.storage.data_dir.exists() {
            if let Err(e) = std::fs::create_dir_all(&self.storage.data_dir) {
                return Err(anyhow!("Cannot create data directory: {}", e));
            }
        }

        if self.search.api_key.is_none() {
            tracing::warn!("YouTube API key not set; search and playlist generation are disabled");
        }
        if self.llm.provider != LLMProvider::LMStudio && self.llm.api_key.is_none() {
            tracing::warn!(
                "No {:?} API key set; AI helpers will answer with fallbacks",
                self.llm.provider
            );
        }

        tracing::info!("✅ Configuration validation passed");
        Ok(())
    }

    /// Get runtime configuration summary
    pub fn summary(&self) -> String {
        format!(
            "StreamVerse Configuration:\n\
            - Data Directory: {}\n\
            - Playlist Key: {}\n\
            - YouTube Search: {}\n\
            - LLM Provider: {:?} ({})\n\
            - Server: {}:{}\n\
            - Log Level: {}",
            self.storage.data_dir.display(),
            self.storage.playlist_key,
            if self.search.api_key.is_some() { "enabled" } else { "disabled" },
            self.llm.provider,
            self.llm.model,
            self.server.host,
            self.server.port,
            self.logging.level
        )
    }
}

/// Configuration builder for programmatic config creation
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    pub fn new() -> Self {
        Self {
            config: Config::default(),
        }
    }

    pub fn with_data_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config.storage.data_dir = dir.into();
        self
    }

    pub fn with_playlist_key(mut self, key: impl Into<String>) -> Self {
        self.config.storage.playlist_key = key.into();
        self
    }

    pub fn with_youtube_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.config.search.api_key = Some(api_key.into());
        self
    }

    pub fn with_search_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.config.search.base_url = base_url.into();
        self
    }

    pub fn with_llm(mut self, llm: LLMConfig) -> Self {
        self.config.llm = llm;
        self
    }

    pub fn with_port(mut self, port: u16) -> Self {
        self.config.server.port = port;
        self
    }

    pub fn build(self) -> Config {
        self.config
    }
}

impl Default for ConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.storage.playlist_key, "playlist");
        assert_eq!(config.search.max_results, 10);
        assert!(config.search.api_key.is_none());
        assert_eq!(config.llm.provider, LLMProvider::Gemini);
    }

    #[test]
    fn test_config_builder() {
        let config = ConfigBuilder::new()
            .with_data_dir("/tmp/sv")
            .with_youtube_api_key("yt-key")
            .with_port(8080)
            .build();

        assert_eq!(config.storage.data_dir, PathBuf::from("/tmp/sv"));
        assert_eq!(config.search.api_key.as_deref(), Some("yt-key"));
        assert_eq!(config.server.port, 8080);
    }

    #[test]
    fn test_config_validation() {
        let dir = tempfile::tempdir().unwrap();
        let config = ConfigBuilder::new().with_data_dir(dir.path().join("data")).build();
        assert!(config.validate().is_ok());
        assert!(dir.path().join("data").exists());

        let bad = ConfigBuilder::new()
            .with_data_dir(dir.path())
            .with_playlist_key("../escape")
            .build();
        assert!(bad.validate().is_err());
    }

    #[test]
    fn test_env_overrides() {
        let env: HashMap<&str, &str> = [
            ("YOUTUBE_API_KEY", "yt"),
            ("GEMINI_API_KEY", "gem"),
            ("STREAMVERSE_PORT", "not-a-port"),
            ("STREAMVERSE_LOG_LEVEL", "debug"),
        ]
        .into_iter()
        .collect();

        let mut config = Config::default();
        config.apply_overrides(|key| env.get(key).map(|v| v.to_string()));

        assert_eq!(config.search.api_key.as_deref(), Some("yt"));
        assert_eq!(config.llm.api_key.as_deref(), Some("gem"));
        assert_eq!(config.server.port, 9002);
        assert_eq!(config.logging.level, "debug");
    }

    #[test]
    fn test_partial_toml_fills_defaults() {
        let config: Config = toml::from_str("[server]\nport = 7000\n").unwrap();
        assert_eq!(config.server.port, 7000);
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.search.max_results, 10);
    }
}
