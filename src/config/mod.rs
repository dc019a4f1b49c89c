//! Configuration module
//!
//! Settings are layered: built-in defaults, an optional settings file,
//! `BACKEND_SMOKE_*` environment variables, then command-line flags. The
//! base URL itself normally comes from the frontend's env file.

mod env;
mod env_file;
mod file;

pub use env::EnvConfig;
pub use env_file::resolve_base_url;
pub use file::{find_settings_file, load_settings_file};

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;

use crate::http::DEFAULT_TIMEOUT_SECS;

/// Env file read when nothing else is configured
pub const DEFAULT_ENV_FILE: &str = "/app/frontend/.env";

/// Key holding the backend URL inside the env file
pub const DEFAULT_URL_KEY: &str = "REACT_APP_BACKEND_URL";

/// Setup errors; any of these ends the run before a request is made
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Could not read env file {}: {source}", .path.display())]
    EnvFileUnreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{key} not found in {}", .path.display())]
    KeyNotFound { key: String, path: PathBuf },

    #[error("{key} is empty in {}", .path.display())]
    EmptyValue { key: String, path: PathBuf },

    #[error("Base URL override is empty")]
    EmptyBaseUrl,

    #[error("Invalid setting {name}: {reason}")]
    Invalid { name: &'static str, reason: String },
}

/// Effective settings for one run
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    /// Env file holding the backend URL
    pub env_file: PathBuf,

    /// Key looked up in the env file
    pub url_key: String,

    /// Explicit backend URL; skips the env file when set
    pub base_url: Option<String>,

    /// Per-request timeout in seconds
    pub timeout_secs: u64,

    /// Report format
    pub format: String,

    /// `Origin` sent with the CORS preflight
    pub cors_origin: String,

    /// Log level name
    pub log_level: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            env_file: PathBuf::from(DEFAULT_ENV_FILE),
            url_key: DEFAULT_URL_KEY.to_string(),
            base_url: None,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            format: "table".to_string(),
            cors_origin: crate::checks::CheckOptions::default().cors_origin,
            log_level: "info".to_string(),
        }
    }
}

/// One configuration layer; unset fields leave the layer below untouched
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PartialSettings {
    pub env_file: Option<PathBuf>,
    pub url_key: Option<String>,
    pub base_url: Option<String>,
    pub timeout_secs: Option<u64>,
    pub format: Option<String>,
    pub cors_origin: Option<String>,
    pub log_level: Option<String>,
}

impl Settings {
    /// Apply a layer on top of the current values
    pub fn apply(mut self, layer: PartialSettings) -> Self {
        if let Some(v) = layer.env_file {
            self.env_file = v;
        }
        if let Some(v) = layer.url_key {
            self.url_key = v;
        }
        if let Some(v) = layer.base_url {
            self.base_url = Some(v);
        }
        if let Some(v) = layer.timeout_secs {
            self.timeout_secs = v;
        }
        if let Some(v) = layer.format {
            self.format = v;
        }
        if let Some(v) = layer.cors_origin {
            self.cors_origin = v;
        }
        if let Some(v) = layer.log_level {
            self.log_level = v;
        }
        self
    }

    /// Validate settings
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.timeout_secs == 0 {
            return Err(ConfigError::Invalid {
                name: "timeout_secs",
                reason: "must be at least 1 second".to_string(),
            });
        }
        if self.url_key.is_empty() || self.url_key.contains('=') {
            return Err(ConfigError::Invalid {
                name: "url_key",
                reason: format!("'{}' is not a usable env key", self.url_key),
            });
        }
        if crate::output::OutputFormat::from_str(&self.format).is_none() {
            return Err(ConfigError::Invalid {
                name: "format",
                reason: format!("unknown format '{}'", self.format),
            });
        }
        if crate::utils::LogLevel::from_str(&self.log_level).is_none() {
            return Err(ConfigError::Invalid {
                name: "log_level",
                reason: format!("unknown level '{}'", self.log_level),
            });
        }
        Ok(())
    }

    /// The backend URL: the explicit override, else the env file entry
    pub fn base_url(&self) -> Result<String, ConfigError> {
        match &self.base_url {
            Some(url) => {
                let url = url.trim();
                if url.is_empty() {
                    Err(ConfigError::EmptyBaseUrl)
                } else {
                    Ok(url.to_string())
                }
            }
            None => resolve_base_url(&self.env_file, &self.url_key),
        }
    }
}
