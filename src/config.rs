//! Configuration for cnblogs-publish.
//!
//! Configuration sources (highest priority first):
//! 1. Environment variables (CNBLOGS_COOKIE, CNBLOGS_XSRF_TOKEN, CNBLOGS_API_BASE)
//! 2. Config file (`--config`, else .cnblogs/config.yaml, else the user config dir)
//! 3. Defaults (https://i.cnblogs.com, 10s fetch, 30s publish)
//!
//! Config file discovery:
//! - Searches current directory and parents for .cnblogs/config.yaml
//! - Falls back to <config dir>/cnblogs-publish/config.yaml
//!
//! Credentials only ever come from the environment.

use std::fmt;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

/// Default editor API base
pub const DEFAULT_API_BASE: &str = "https://i.cnblogs.com";

/// Session cookie variable
pub const COOKIE_VAR: &str = "CNBLOGS_COOKIE";

/// XSRF token variable
pub const XSRF_TOKEN_VAR: &str = "CNBLOGS_XSRF_TOKEN";

/// API base override variable
pub const API_BASE_VAR: &str = "CNBLOGS_API_BASE";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error(
        "environment variable {var} is not set (copy the .Cnblogs.AspNetCore.Cookies cookie \
         and the XSRF-TOKEN value from your browser's developer tools)"
    )]
    MissingCredential { var: &'static str },

    #[error("failed to read config file {path}: {source}")]
    ReadFile {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config file {path}: {source}")]
    ParseFile {
        path: PathBuf,
        source: serde_yaml::Error,
    },
}

/// Session credentials for the editor API
#[derive(Clone)]
pub struct Credentials {
    cookie: String,
    xsrf_token: String,
}

impl Credentials {
    pub fn new(cookie: impl Into<String>, xsrf_token: impl Into<String>) -> Self {
        Self {
            cookie: cookie.into(),
            xsrf_token: xsrf_token.into(),
        }
    }

    /// Read both credentials through `lookup`; blank values count as missing
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let read = |var: &'static str| {
            lookup(var)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
                .ok_or(ConfigError::MissingCredential { var })
        };

        Ok(Self::new(read(COOKIE_VAR)?, read(XSRF_TOKEN_VAR)?))
    }

    /// Read both credentials from the process environment
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    pub fn cookie(&self) -> &str {
        &self.cookie
    }

    pub fn xsrf_token(&self) -> &str {
        &self.xsrf_token
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("cookie", &"<redacted>")
            .field("xsrf_token", &"<redacted>")
            .finish()
    }
}

/// Raw config file schema (matches YAML structure)
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ConfigFile {
    #[serde(default)]
    pub version: Option<String>,
    #[serde(default)]
    pub api: ApiFileConfig,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ApiFileConfig {
    pub base_url: Option<String>,
    pub fetch_timeout_seconds: Option<u64>,
    pub publish_timeout_seconds: Option<u64>,
}

/// Resolved API settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiSettings {
    pub base_url: String,
    pub fetch_timeout_seconds: u64,
    pub publish_timeout_seconds: u64,
}

impl Default for ApiSettings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_BASE.to_string(),
            fetch_timeout_seconds: 10,
            publish_timeout_seconds: 30,
        }
    }
}

/// Fully resolved configuration for one run
#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    pub credentials: Credentials,
    pub api: ApiSettings,
    /// Path to config file (if one was used)
    pub config_file: Option<PathBuf>,
}

/// Find config file by searching `start` and its parents
fn find_config_file(start: &Path) -> Option<PathBuf> {
    let mut current = start.to_path_buf();

    loop {
        let config_path = current.join(".cnblogs").join("config.yaml");
        if config_path.is_file() {
            return Some(config_path);
        }

        if !current.pop() {
            break;
        }
    }

    None
}

/// Per-user config file, if present
fn user_config_file() -> Option<PathBuf> {
    let path = dirs::config_dir()?.join("cnblogs-publish").join("config.yaml");
    path.is_file().then_some(path)
}

/// Load and parse config file
pub fn load_config_file(path: &Path) -> Result<ConfigFile, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::ReadFile {
        path: path.to_path_buf(),
        source,
    })?;

    serde_yaml::from_str(&content).map_err(|source| ConfigError::ParseFile {
        path: path.to_path_buf(),
        source,
    })
}

/// Pick the config file: explicit path, then a `.cnblogs/config.yaml`
/// above `search_from`, then whatever `user_file` yields
pub fn locate_config_file(
    explicit_file: Option<&Path>,
    search_from: Option<&Path>,
    user_file: impl FnOnce() -> Option<PathBuf>,
) -> Option<PathBuf> {
    match explicit_file {
        Some(path) => Some(path.to_path_buf()),
        None => search_from.and_then(find_config_file).or_else(user_file),
    }
}

/// Load configuration from the process environment and the file system
pub fn load_config(explicit_file: Option<&Path>) -> Result<ResolvedConfig, ConfigError> {
    let cwd = std::env::current_dir().ok();
    let config_file = locate_config_file(explicit_file, cwd.as_deref(), user_config_file);
    load_config_with(config_file, |var| std::env::var(var).ok())
}

/// Load configuration from an already located file and an injectable environment
pub fn load_config_with(
    config_file: Option<PathBuf>,
    lookup: impl Fn(&str) -> Option<String>,
) -> Result<ResolvedConfig, ConfigError> {
    // Credentials first: nothing else matters without them
    let credentials = Credentials::from_lookup(&lookup)?;

    let file = match &config_file {
        Some(path) => load_config_file(path)?,
        None => ConfigFile::default(),
    };

    let defaults = ApiSettings::default();
    let base_url = lookup(API_BASE_VAR)
        .filter(|v| !v.trim().is_empty())
        .or(file.api.base_url)
        .unwrap_or(defaults.base_url);

    let api = ApiSettings {
        base_url: base_url.trim().trim_end_matches('/').to_string(),
        fetch_timeout_seconds: file
            .api
            .fetch_timeout_seconds
            .unwrap_or(defaults.fetch_timeout_seconds),
        publish_timeout_seconds: file
            .api
            .publish_timeout_seconds
            .unwrap_or(defaults.publish_timeout_seconds),
    };

    Ok(ResolvedConfig {
        credentials,
        api,
        config_file,
    })
}
