//! TOML Configuration File Support
//!
//! Configuration loading for the chatbot, supporting a TOML file at
//! `~/.config/basava-chat/config.toml`.
//!
//! # Configuration Priority
//!
//! Configuration values are loaded with the following priority (highest first):
//! 1. CLI arguments (via [`ConfigOverrides`])
//! 2. Environment variables
//! 3. TOML configuration file
//! 4. Default values
//!
//! The API key is never read from the file; it only comes from the
//! environment (see [`crate::backend::API_KEY_VARS`]).
//!
//! # Example Configuration
//!
//! ```toml
//! [model]
//! id = "gemini-2.5-flash"
//! greeting = "Namaskara! Ask me about Basavanna."
//!
//! [provider]
//! base_url = "https://generativelanguage.googleapis.com/v1beta"
//! request_timeout_secs = 60
//! ```

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::backend::{DEFAULT_BASE_URL, DEFAULT_REQUEST_TIMEOUT};
use crate::session::SessionConfig;

// =============================================================================
// Error Types
// =============================================================================

/// Errors that can occur when loading configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read config file
    #[error("Failed to read config file at {path}: {source}")]
    ReadError {
        /// The path that was attempted
        path: PathBuf,
        /// The underlying IO error
        source: std::io::Error,
    },

    /// Failed to parse TOML
    #[error("Failed to parse TOML config: {0}")]
    ParseError(#[from] toml::de::Error),

    /// Invalid configuration value
    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

// =============================================================================
// Configuration Source Tracking
// =============================================================================

/// Tracks where a configuration value came from
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConfigSource {
    /// Value from command-line argument
    Cli,
    /// Value from environment variable
    Env,
    /// Value from TOML configuration file
    File,
    /// Default value
    Default,
}

impl std::fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Cli => write!(f, "CLI"),
            Self::Env => write!(f, "environment"),
            Self::File => write!(f, "config file"),
            Self::Default => write!(f, "default"),
        }
    }
}

// =============================================================================
// TOML Configuration Structures
// =============================================================================

/// Model section of the TOML configuration
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelToml {
    /// Model identifier
    pub id: Option<String>,

    /// System instruction replacing the built-in persona
    pub system_instruction: Option<String>,

    /// Seed greeting
    pub greeting: Option<String>,
}

/// Provider section of the TOML configuration
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderToml {
    /// API root URL
    pub base_url: Option<String>,

    /// HTTP request timeout in seconds
    pub request_timeout_secs: Option<u64>,
}

/// Top-level TOML configuration structure
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ChatbotToml {
    /// Model configuration section
    pub model: ModelToml,

    /// Provider configuration section
    pub provider: ProviderToml,
}

// =============================================================================
// Main Configuration Struct
// =============================================================================

/// Resolved configuration for the chatbot
#[derive(Clone, Debug)]
pub struct ChatbotConfig {
    /// What each chat session is opened with
    pub session: SessionConfig,

    /// Provider API root
    pub base_url: String,

    /// HTTP request timeout
    pub request_timeout: Duration,

    /// Path to the config file that was loaded (if any)
    pub config_file_path: Option<PathBuf>,

    /// Source of configuration values
    source: ConfigSource,
}

impl Default for ChatbotConfig {
    fn default() -> Self {
        Self {
            session: SessionConfig::default(),
            base_url: DEFAULT_BASE_URL.to_string(),
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            config_file_path: None,
            source: ConfigSource::Default,
        }
    }
}

impl ChatbotConfig {
    /// Create a new configuration with default values
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the highest-priority source that contributed a value
    #[must_use]
    pub fn source(&self) -> ConfigSource {
        self.source
    }

    /// Check the resolved values
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ValidationError`] for an empty model id, a
    /// non-HTTP base URL or a zero timeout.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.session.chat.model.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "model id must not be empty".to_string(),
            ));
        }
        if !(self.base_url.starts_with("http://") || self.base_url.starts_with("https://")) {
            return Err(ConfigError::ValidationError(format!(
                "base_url must be an http(s) URL, got {:?}",
                self.base_url
            )));
        }
        if self.request_timeout.is_zero() {
            return Err(ConfigError::ValidationError(
                "request timeout must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}

// =============================================================================
// Configuration Loading
// =============================================================================

/// Get the default configuration file path
///
/// Returns `$XDG_CONFIG_HOME/basava-chat/config.toml` or
/// `~/.config/basava-chat/config.toml` if `XDG_CONFIG_HOME` is not set.
#[must_use]
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("basava-chat").join("config.toml"))
}

/// Load configuration from all sources with proper priority
///
/// # Errors
///
/// Returns an error if the config file exists but cannot be parsed.
/// A missing config file is not an error (defaults are used).
pub fn load_config() -> Result<ChatbotConfig, ConfigError> {
    load_config_from_path(default_config_path())
}

/// Load configuration from a specific path plus the process environment
///
/// # Errors
///
/// Returns an error if the specified config file cannot be read or parsed.
pub fn load_config_from_path(path: Option<PathBuf>) -> Result<ChatbotConfig, ConfigError> {
    load_config_with(path, |name| std::env::var(name).ok())
}

/// Load configuration from a specific path and a custom variable lookup
///
/// # Errors
///
/// Returns an error if the specified config file cannot be read or parsed.
pub fn load_config_with<F>(path: Option<PathBuf>, env: F) -> Result<ChatbotConfig, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let mut config = ChatbotConfig::default();

    if let Some(ref config_path) = path {
        if config_path.exists() {
            let toml_content =
                std::fs::read_to_string(config_path).map_err(|e| ConfigError::ReadError {
                    path: config_path.clone(),
                    source: e,
                })?;

            let toml_config: ChatbotToml = toml::from_str(&toml_content)?;
            apply_toml_config(&mut config, &toml_config);
            config.config_file_path = Some(config_path.clone());
            config.source = ConfigSource::File;

            tracing::info!(
                path = %config_path.display(),
                "Loaded configuration from file"
            );
        } else {
            tracing::debug!(
                path = %config_path.display(),
                "Config file not found, using defaults"
            );
        }
    }

    apply_env_config(&mut config, env);

    Ok(config)
}

/// Apply TOML configuration values to the config struct
fn apply_toml_config(config: &mut ChatbotConfig, toml: &ChatbotToml) {
    if let Some(ref id) = toml.model.id {
        config.session.chat.model = id.clone();
    }
    if let Some(ref instruction) = toml.model.system_instruction {
        config.session.chat.system_instruction = instruction.clone();
    }
    if let Some(ref greeting) = toml.model.greeting {
        config.session.greeting = greeting.clone();
    }

    if let Some(ref url) = toml.provider.base_url {
        config.base_url = url.trim_end_matches('/').to_string();
    }
    if let Some(secs) = toml.provider.request_timeout_secs {
        config.request_timeout = Duration::from_secs(secs);
    }
}

/// Apply environment variable overrides to the config
fn apply_env_config<F>(config: &mut ChatbotConfig, env: F)
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(model) = env("BASAVA_MODEL") {
        config.session.chat.model = model;
        config.source = ConfigSource::Env;
    }
    if let Some(url) = env("BASAVA_BASE_URL") {
        config.base_url = url.trim_end_matches('/').to_string();
        config.source = ConfigSource::Env;
    }
    if let Some(timeout) = env("BASAVA_REQUEST_TIMEOUT") {
        match timeout.parse::<u64>() {
            Ok(secs) => {
                config.request_timeout = Duration::from_secs(secs);
                config.source = ConfigSource::Env;
            }
            Err(_) => {
                tracing::warn!(value = %timeout, "Ignoring unparsable BASAVA_REQUEST_TIMEOUT");
            }
        }
    }
}

// =============================================================================
// CLI Override Support
// =============================================================================

/// Builder for applying CLI overrides to configuration
///
/// Use this after [`load_config`] to apply command-line argument overrides.
#[derive(Clone, Debug, Default)]
pub struct ConfigOverrides {
    /// Model id override
    pub model: Option<String>,

    /// Base URL override
    pub base_url: Option<String>,

    /// Request timeout override (seconds)
    pub request_timeout_secs: Option<u64>,
}

impl ConfigOverrides {
    /// Create a new empty set of overrides
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set model override
    #[must_use]
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    /// Set base URL override
    #[must_use]
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Set request timeout override
    #[must_use]
    pub fn with_request_timeout_secs(mut self, secs: u64) -> Self {
        self.request_timeout_secs = Some(secs);
        self
    }

    /// Apply overrides to a configuration
    pub fn apply(&self, config: &mut ChatbotConfig) {
        if self.model.is_some() || self.base_url.is_some() || self.request_timeout_secs.is_some()
        {
            config.source = ConfigSource::Cli;
        }

        if let Some(ref model) = self.model {
            config.session.chat.model = model.clone();
        }

        if let Some(ref url) = self.base_url {
            config.base_url = url.trim_end_matches('/').to_string();
        }

        if let Some(secs) = self.request_timeout_secs {
            config.request_timeout = Duration::from_secs(secs);
        }
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;
    use tempfile::NamedTempFile;

    use crate::persona::{DEFAULT_MODEL, GREETING};

    fn no_env(_: &str) -> Option<String> {
        None
    }

    fn env_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    fn write_config(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "{content}").unwrap();
        file
    }

    #[test]
    fn test_default_config() {
        let config = ChatbotConfig::default();

        assert_eq!(config.session.chat.model, DEFAULT_MODEL);
        assert_eq!(config.session.greeting, GREETING);
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.request_timeout, Duration::from_secs(120));
        assert_eq!(config.source(), ConfigSource::Default);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let path = PathBuf::from("/nonexistent/basava-chat/config.toml");
        let config = load_config_with(Some(path), no_env).unwrap();

        assert_eq!(config.source(), ConfigSource::Default);
        assert!(config.config_file_path.is_none());
    }

    #[test]
    fn test_file_values_applied() {
        let file = write_config(
            r#"
[model]
id = "gemini-2.0-flash"
greeting = "Namaskara!"

[provider]
base_url = "http://localhost:8080/v1beta/"
request_timeout_secs = 30
"#,
        );

        let config = load_config_with(Some(file.path().to_path_buf()), no_env).unwrap();

        assert_eq!(config.session.chat.model, "gemini-2.0-flash");
        assert_eq!(config.session.greeting, "Namaskara!");
        // Untouched keys keep their defaults
        assert!(config.session.chat.system_instruction.contains("Basavanna"));
        assert_eq!(config.base_url, "http://localhost:8080/v1beta");
        assert_eq!(config.request_timeout, Duration::from_secs(30));
        assert_eq!(config.source(), ConfigSource::File);
        assert_eq!(config.config_file_path.as_deref(), Some(file.path()));
    }

    #[test]
    fn test_env_overrides_file() {
        let file = write_config("[model]\nid = \"from-file\"\n");
        let env = env_from(&[("BASAVA_MODEL", "from-env"), ("BASAVA_REQUEST_TIMEOUT", "5")]);

        let config = load_config_with(Some(file.path().to_path_buf()), env).unwrap();

        assert_eq!(config.session.chat.model, "from-env");
        assert_eq!(config.request_timeout, Duration::from_secs(5));
        assert_eq!(config.source(), ConfigSource::Env);
    }

    #[test]
    fn test_unparsable_env_timeout_ignored() {
        let env = env_from(&[("BASAVA_REQUEST_TIMEOUT", "soon")]);
        let config = load_config_with(None, env).unwrap();

        assert_eq!(config.request_timeout, DEFAULT_REQUEST_TIMEOUT);
        assert_eq!(config.source(), ConfigSource::Default);
    }

    #[test]
    fn test_cli_overrides_env() {
        let env = env_from(&[("BASAVA_MODEL", "from-env")]);
        let mut config = load_config_with(None, env).unwrap();

        ConfigOverrides::new()
            .with_model("from-cli")
            .with_base_url("http://127.0.0.1:1234/")
            .apply(&mut config);

        assert_eq!(config.session.chat.model, "from-cli");
        assert_eq!(config.base_url, "http://127.0.0.1:1234");
        assert_eq!(config.source(), ConfigSource::Cli);
    }

    #[test]
    fn test_empty_overrides_keep_source() {
        let mut config = ChatbotConfig::default();
        ConfigOverrides::new().apply(&mut config);
        assert_eq!(config.source(), ConfigSource::Default);
    }

    #[test]
    fn test_invalid_toml() {
        let file = write_config("[model\nid = ");
        let result = load_config_with(Some(file.path().to_path_buf()), no_env);
        assert!(matches!(result, Err(ConfigError::ParseError(_))));
    }

    #[test]
    fn test_validation() {
        let mut config = ChatbotConfig::default();
        config.session.chat.model = "  ".to_string();
        assert!(config.validate().is_err());

        let mut config = ChatbotConfig::default();
        config.base_url = "generativelanguage.googleapis.com".to_string();
        assert!(config.validate().is_err());

        let mut config = ChatbotConfig::default();
        ConfigOverrides::new()
            .with_request_timeout_secs(0)
            .apply(&mut config);
        assert!(matches!(
            config.validate(),
            Err(ConfigError::ValidationError(_))
        ));
    }

    #[test]
    fn test_config_source_display() {
        assert_eq!(ConfigSource::Cli.to_string(), "CLI");
        assert_eq!(ConfigSource::File.to_string(), "config file");
    }
}
