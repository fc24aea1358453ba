//! Configuration management.
//!
//! Configuration is read from a TOML file and `DOCSEARCH_*` environment
//! variables, with every value falling back to a default.
//!
//! # Configuration File Format
//!
//! ```toml
//! [backend]
//! host = "localhost"
//! port = 12345
//! read_buffer_size = 4096
//! connect_timeout_secs = 10
//! framing = "short-read"   # or "until-close"
//! max_query_bytes = 1024
//!
//! [results]
//! page_size = 100
//!
//! [artifacts]
//! base_dir = "/srv/search"
//!
//! [logging]
//! level = "info"
//! format = "json"
//! ```
//!
//! Nested keys map to environment variables with a double underscore, e.g.
//! `DOCSEARCH_BACKEND__PORT=9000`.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::models::DEFAULT_PAGE_SIZE;
use crate::transport::Framing;

/// Application configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Search backend endpoint and wire settings
    #[serde(default)]
    pub backend: BackendConfig,

    /// Result pagination
    #[serde(default)]
    pub results: ResultsConfig,

    /// Artifact retrieval
    #[serde(default)]
    pub artifacts: ArtifactsConfig,

    /// Logging
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Backend endpoint configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BackendConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    /// Size of each read from the connection (in bytes)
    #[serde(default = "default_read_buffer_size")]
    pub read_buffer_size: usize,

    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_secs: u64,

    /// How the end of a response is detected
    #[serde(default)]
    pub framing: Framing,

    /// Longest query the backend reads in one go; longer queries are still
    /// sent, with a warning
    #[serde(default = "default_max_query_bytes")]
    pub max_query_bytes: usize,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            read_buffer_size: default_read_buffer_size(),
            connect_timeout_secs: default_connect_timeout(),
            framing: Framing::default(),
            max_query_bytes: default_max_query_bytes(),
        }
    }
}

impl BackendConfig {
    /// `host:port` string used to connect
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }
}

fn default_host() -> String {
    "localhost".to_string()
}

fn default_port() -> u16 {
    12345
}

fn default_read_buffer_size() -> usize {
    4096
}

fn default_connect_timeout() -> u64 {
    10
}

fn default_max_query_bytes() -> usize {
    1024
}

/// Result pagination configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultsConfig {
    #[serde(default = "default_page_size")]
    pub page_size: usize,
}

impl Default for ResultsConfig {
    fn default() -> Self {
        Self {
            page_size: default_page_size(),
        }
    }
}

fn default_page_size() -> usize {
    DEFAULT_PAGE_SIZE
}

/// Artifact retrieval configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ArtifactsConfig {
    /// Directory that relative result entries are resolved against
    #[serde(default)]
    pub base_dir: Option<PathBuf>,
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,

    /// `"json"` for structured output, plain text otherwise
    #[serde(default)]
    pub format: Option<String>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: None,
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Config {
    /// Check values that would make the client unusable.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.results.page_size == 0 {
            return Err(ConfigError::Invalid(
                "results.page_size must be at least 1".to_string(),
            ));
        }
        if self.backend.read_buffer_size == 0 {
            return Err(ConfigError::Invalid(
                "backend.read_buffer_size must be at least 1".to_string(),
            ));
        }
        if self.backend.max_query_bytes == 0 {
            return Err(ConfigError::Invalid(
                "backend.max_query_bytes must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    /// Render the configuration as TOML
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::Serialize(e.to_string()))
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Load error: {0}")]
    Load(#[from] config::ConfigError),

    #[error("Invalid configuration: {0}")]
    Invalid(String),

    #[error("Serialize error: {0}")]
    Serialize(String),
}

fn env_source() -> config::Environment {
    config::Environment::with_prefix("DOCSEARCH")
        .prefix_separator("_")
        .separator("__")
        .try_parsing(true)
}

/// Load configuration from a file, with environment overrides
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    let settings = config::Config::builder()
        .add_source(config::File::from(path))
        .add_source(env_source())
        .build()?;

    let config: Config = settings.try_deserialize()?;
    config.validate()?;
    Ok(config)
}

/// Get configuration from environment variables and defaults only
pub fn get_config() -> Result<Config, ConfigError> {
    let settings = config::Config::builder()
        .add_source(env_source())
        .build()?;

    let config: Config = settings.try_deserialize()?;
    config.validate()?;
    Ok(config)
}

/// Find a configuration file in the default locations.
///
/// Checks `./docsearch.toml`, then `<config dir>/docsearch/config.toml`.
pub fn find_config_file() -> Option<PathBuf> {
    let local = PathBuf::from("docsearch.toml");
    if local.is_file() {
        return Some(local);
    }

    dirs::config_dir()
        .map(|dir| dir.join("docsearch").join("config.toml"))
        .filter(|path| path.is_file())
}
