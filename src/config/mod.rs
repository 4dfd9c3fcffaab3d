//! Configuration management for topiccut

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::core::SizeLimit;

/// Environment variable relocating both config and data directories
pub const HOME_ENV: &str = "TOPICCUT_HOME";

/// Environment variable overriding `api.base_url`
pub const API_URL_ENV: &str = "TOPICCUT_API_URL";

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub api: ApiConfig,
    pub auth: AuthConfig,
    pub input: InputConfig,
    pub ui: UiConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Base URL of the summarization API (without trailing slash)
    pub base_url: String,
    /// Per-request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "https://wm87smw1ta.execute-api.ap-northeast-2.amazonaws.com/dev"
                .to_string(),
            timeout_secs: 120,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthConfig {
    /// Hosted sign-in domain (authorize, token and logout endpoints)
    pub hosted_domain: String,
    pub client_id: String,
    /// Must point at localhost; the callback listener binds its port
    pub redirect_uri: String,
    pub response_type: String,
    pub scope: String,
    /// Seconds to wait for the browser callback
    pub callback_timeout_secs: u64,
    /// Per-request timeout for token exchange and refresh
    pub request_timeout_secs: u64,
    /// Skip the session gate entirely (development builds)
    pub dev_bypass: bool,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            hosted_domain:
                "https://ap-northeast-2skxje5knv.auth.ap-northeast-2.amazoncognito.com"
                    .to_string(),
            client_id: "od1ca3on738fo0onip41qev8o".to_string(),
            redirect_uri: "http://localhost:8976/callback".to_string(),
            response_type: "code".to_string(),
            scope: "email openid phone".to_string(),
            callback_timeout_secs: 120,
            request_timeout_secs: 120,
            dev_bypass: false,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct InputConfig {
    /// Largest accepted upload in bytes
    pub max_file_bytes: u64,
    /// Reject files above `max_file_bytes` instead of only advertising the limit
    pub enforce_size_limit: bool,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            max_file_bytes: crate::core::input::DEFAULT_MAX_FILE_BYTES,
            enforce_size_limit: true,
        }
    }
}

impl InputConfig {
    pub fn size_limit(&self) -> SizeLimit {
        SizeLimit {
            max_bytes: self.max_file_bytes,
            enforce: self.enforce_size_limit,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UiConfig {
    /// How long a copy confirmation stays visible
    pub copy_feedback_ms: u64,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            copy_feedback_ms: 2000,
        }
    }
}

impl Config {
    /// Load configuration from the default location
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;
        Self::load_from(&config_path)
    }

    /// Load configuration from `path`, falling back to defaults if it is missing
    pub fn load_from(path: &Path) -> Result<Self> {
        let mut config: Config = if path.exists() {
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read {}", path.display()))?;
            toml::from_str(&content)
                .with_context(|| format!("Failed to parse {}", path.display()))?
        } else {
            Config::default()
        };

        config.apply_env();
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        anyhow::ensure!(
            self.api.timeout_secs > 0,
            "api.timeout_secs must be greater than zero"
        );
        anyhow::ensure!(
            self.auth.request_timeout_secs > 0,
            "auth.request_timeout_secs must be greater than zero"
        );
        anyhow::ensure!(
            self.auth.callback_timeout_secs > 0,
            "auth.callback_timeout_secs must be greater than zero"
        );
        Ok(())
    }

    fn apply_env(&mut self) {
        if let Ok(url) = std::env::var(API_URL_ENV) {
            if !url.trim().is_empty() {
                self.api.base_url = url.trim().to_string();
            }
        }
    }

    /// Get the configuration file path
    pub fn config_path() -> Result<PathBuf> {
        let config_dir = config_dir();
        std::fs::create_dir_all(&config_dir)
            .with_context(|| format!("Failed to create {}", config_dir.display()))?;
        Ok(config_dir.join("config.toml"))
    }
}

fn home_override() -> Option<PathBuf> {
    std::env::var_os(HOME_ENV)
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
}

/// Directory holding `config.toml`
pub fn config_dir() -> PathBuf {
    if let Some(home) = home_override() {
        return home.join("config");
    }
    directories::ProjectDirs::from("", "", "topiccut")
        .map(|dirs| dirs.config_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from(".topiccut"))
}

/// Directory holding preferences and the identity session
pub fn data_dir() -> PathBuf {
    if let Some(home) = home_override() {
        return home.join("data");
    }
    directories::ProjectDirs::from("", "", "topiccut")
        .map(|dirs| dirs.data_local_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from(".topiccut"))
}
