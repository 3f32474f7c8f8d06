//! Configuration management for codingops.
//!
//! Two layers live here:
//!
//! - [`Config`]: the optional TOML file stored in a platform-specific
//!   location (`~/.config/codingops/config.toml` on Linux,
//!   `%APPDATA%\codingops\config.toml` on Windows).
//! - [`CodingConfig`]: the validated, immutable settings a connection is
//!   built from. It is resolved from explicit overrides, then environment
//!   variables, then the file, then defaults.
//!
//! # Example
//!
//! ```ignore
//! use codingops_core::config::{CodingConfig, Config, ConfigOverrides};
//!
//! let file = Config::load()?;
//! let config = CodingConfig::resolve(&ConfigOverrides::default(), &file)?;
//! ```

use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// Config file name.
const CONFIG_FILE_NAME: &str = "config.toml";

/// Config directory name.
const CONFIG_DIR_NAME: &str = "codingops";

/// Default CODING open API endpoint.
pub const DEFAULT_API_URL: &str = "https://e.coding.net/open-api";

/// Default per-request timeout.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Environment variable holding the personal access token.
pub const ENV_TOKEN: &str = "CODING_TOKEN";
/// Environment variable overriding the API endpoint.
pub const ENV_API_URL: &str = "CODING_API_URL";
/// Environment variable setting the base working directory.
pub const ENV_WORKING_DIRECTORY: &str = "CODING_WORKING_DIRECTORY";
/// Environment variable overriding the request timeout (seconds).
pub const ENV_TIMEOUT_SECS: &str = "CODING_TIMEOUT_SECS";

// =============================================================================
// File configuration
// =============================================================================

/// Contents of the configuration file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// CODING DevOps settings
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub coding: Option<CodingFileConfig>,
}

/// `[coding]` section of the configuration file. Every field is optional;
/// missing values fall through to defaults.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CodingFileConfig {
    /// Personal access token
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
    /// Open API endpoint
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_url: Option<String>,
    /// Base directory for resolving relative working directories
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub working_directory: Option<PathBuf>,
    /// Per-request timeout in seconds
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,
}

impl Config {
    /// Get the configuration directory path.
    pub fn config_dir() -> Result<PathBuf> {
        dirs::config_dir()
            .map(|p| p.join(CONFIG_DIR_NAME))
            .ok_or_else(|| Error::Config("Could not determine config directory".to_string()))
    }

    /// Get the configuration file path.
    pub fn config_path() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join(CONFIG_FILE_NAME))
    }

    /// Load configuration from the default location.
    ///
    /// Returns a default (empty) config if the file doesn't exist.
    pub fn load() -> Result<Self> {
        let path = Self::config_path()?;
        Self::load_from(&path)
    }

    /// Load configuration from a specific path.
    ///
    /// Returns a default (empty) config if the file doesn't exist.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            debug!(path = ?path, "Config file does not exist, using defaults");
            return Ok(Self::default());
        }

        debug!(path = ?path, "Loading config");

        let contents = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("Failed to read config file: {}", e)))?;

        let config: Config = toml::from_str(&contents)
            .map_err(|e| Error::Config(format!("Failed to parse config file: {}", e)))?;

        info!(path = ?path, "Config loaded successfully");
        Ok(config)
    }

    /// Save configuration to the default location.
    pub fn save(&self) -> Result<()> {
        let path = Self::config_path()?;
        self.save_to(&path)
    }

    /// Save configuration to a specific path.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| Error::Config(format!("Failed to create config directory: {}", e)))?;
        }

        debug!(path = ?path, "Saving config");

        let contents = toml::to_string_pretty(self)
            .map_err(|e| Error::Config(format!("Failed to serialize config: {}", e)))?;

        std::fs::write(path, contents)
            .map_err(|e| Error::Config(format!("Failed to write config file: {}", e)))?;

        info!(path = ?path, "Config saved successfully");
        Ok(())
    }

    /// Set a configuration value by key path.
    ///
    /// Key format: `section.field` (e.g., `coding.api_url`)
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let (section, field) = split_key(key)?;

        match section {
            "coding" => {
                let config = self.coding.get_or_insert_with(CodingFileConfig::default);
                match field {
                    "token" => config.token = Some(value.to_string()),
                    "api_url" | "url" => config.api_url = Some(value.to_string()),
                    "working_directory" | "dir" => {
                        config.working_directory = Some(PathBuf::from(value))
                    }
                    "timeout_secs" | "timeout" => {
                        config.timeout_secs = Some(parse_timeout(value)?);
                    }
                    _ => {
                        return Err(Error::Config(format!(
                            "Unknown coding config field: {}",
                            field
                        )))
                    }
                }
            }
            _ => {
                return Err(Error::Config(format!("Unknown section: {}", section)));
            }
        }

        Ok(())
    }

    /// Get a configuration value by key path.
    ///
    /// Key format: `section.field` (e.g., `coding.api_url`)
    pub fn get(&self, key: &str) -> Result<Option<String>> {
        let (section, field) = split_key(key)?;

        match section {
            "coding" => {
                let Some(config) = &self.coding else {
                    return Ok(None);
                };
                match field {
                    "token" => Ok(config.token.clone()),
                    "api_url" | "url" => Ok(config.api_url.clone()),
                    "working_directory" | "dir" => Ok(config
                        .working_directory
                        .as_ref()
                        .map(|p| p.display().to_string())),
                    "timeout_secs" | "timeout" => {
                        Ok(config.timeout_secs.map(|t| t.to_string()))
                    }
                    _ => Err(Error::Config(format!(
                        "Unknown coding config field: {}",
                        field
                    ))),
                }
            }
            _ => Err(Error::Config(format!("Unknown section: {}", section))),
        }
    }
}

fn split_key(key: &str) -> Result<(&str, &str)> {
    let parts: Vec<&str> = key.split('.').collect();
    if parts.len() != 2 {
        return Err(Error::Config(format!(
            "Invalid config key '{}'. Expected format: section.field",
            key
        )));
    }
    Ok((parts[0], parts[1]))
}

fn parse_timeout(value: &str) -> Result<u64> {
    value
        .trim()
        .parse::<u64>()
        .ok()
        .and_then(|secs| positive_timeout(secs).ok())
        .ok_or_else(|| timeout_error(value))
}

fn positive_timeout(secs: u64) -> Result<u64> {
    if secs == 0 {
        return Err(timeout_error(&secs.to_string()));
    }
    Ok(secs)
}

fn timeout_error(value: &str) -> Error {
    Error::Config(format!(
        "Timeout must be a positive number of seconds, got '{}'",
        value
    ))
}

// =============================================================================
// Resolved configuration
// =============================================================================

/// Values supplied explicitly at startup (command-line flags).
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub token: Option<String>,
    pub api_url: Option<String>,
    pub working_directory: Option<PathBuf>,
    pub timeout_secs: Option<u64>,
}

/// Validated settings for one connection generation.
#[derive(Clone, PartialEq, Eq)]
pub struct CodingConfig {
    token: String,
    api_url: String,
    working_directory: Option<PathBuf>,
    timeout: Duration,
}

impl CodingConfig {
    /// Create a configuration with the default endpoint.
    ///
    /// Fails with [`Error::Config`] when the token is blank.
    pub fn new(token: impl Into<String>) -> Result<Self> {
        Ok(Self {
            token: require(Some(token.into()), "Personal Access Token (token)")?,
            api_url: DEFAULT_API_URL.to_string(),
            working_directory: None,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        })
    }

    /// Replace the API endpoint.
    pub fn with_api_url(mut self, api_url: impl Into<String>) -> Result<Self> {
        self.api_url = require(Some(api_url.into()), "API URL (api_url)")?
            .trim_end_matches('/')
            .to_string();
        Ok(self)
    }

    /// Set the base working directory.
    pub fn with_working_directory(mut self, dir: impl Into<PathBuf>) -> Self {
        self.working_directory = Some(dir.into());
        self
    }

    /// Set the per-request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Resolve from overrides, the process environment and the config file.
    pub fn resolve(overrides: &ConfigOverrides, file: &Config) -> Result<Self> {
        Self::resolve_with(overrides, file, |name| std::env::var(name).ok())
    }

    /// Resolve with an explicit environment lookup.
    pub fn resolve_with(
        overrides: &ConfigOverrides,
        file: &Config,
        env: impl Fn(&str) -> Option<String>,
    ) -> Result<Self> {
        let section = file.coding.clone().unwrap_or_default();

        let token = overrides
            .token
            .clone()
            .or_else(|| non_blank(env(ENV_TOKEN)))
            .or(section.token);
        let token = require(token, "Personal Access Token (token)")?;

        let api_url = overrides
            .api_url
            .clone()
            .or_else(|| non_blank(env(ENV_API_URL)))
            .or(section.api_url)
            .unwrap_or_else(|| DEFAULT_API_URL.to_string());

        let working_directory = overrides
            .working_directory
            .clone()
            .or_else(|| non_blank(env(ENV_WORKING_DIRECTORY)).map(PathBuf::from))
            .or(section.working_directory);

        let timeout_secs = match (overrides.timeout_secs, non_blank(env(ENV_TIMEOUT_SECS))) {
            (Some(secs), _) => positive_timeout(secs)?,
            (None, Some(raw)) => parse_timeout(&raw)?,
            (None, None) => {
                positive_timeout(section.timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS))?
            }
        };

        let mut config = Self {
            token,
            api_url: String::new(),
            working_directory: None,
            timeout: Duration::from_secs(timeout_secs),
        }
        .with_api_url(api_url)?;
        config.working_directory = working_directory;

        debug!(
            api_url = %config.api_url,
            working_directory = ?config.working_directory,
            timeout_secs,
            "Configuration resolved"
        );
        Ok(config)
    }

    pub fn token(&self) -> &str {
        &self.token
    }

    pub fn api_url(&self) -> &str {
        &self.api_url
    }

    pub fn working_directory(&self) -> Option<&Path> {
        self.working_directory.as_deref()
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }
}

impl fmt::Debug for CodingConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CodingConfig")
            .field("token", &"<redacted>")
            .field("api_url", &self.api_url)
            .field("working_directory", &self.working_directory)
            .field("timeout", &self.timeout)
            .finish()
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

fn require(value: Option<String>, name: &str) -> Result<String> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(v.trim().to_string()),
        _ => Err(Error::Config(format!(
            "{} is required and must be provided either through environment variables, \
             the config file or command-line options",
            name
        ))),
    }
}

// =============================================================================
// Tests
// =============================================================================
