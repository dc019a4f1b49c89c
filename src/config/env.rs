//! Environment variable configuration
//!
//! Provides environment variable overrides for configuration.

use std::env;
use std::path::PathBuf;

use super::{ConfigError, PartialSettings};

/// Environment variable prefix
const ENV_PREFIX: &str = "BACKEND_SMOKE";

/// Settings read from `BACKEND_SMOKE_*` variables
#[derive(Clone, Debug, Default)]
pub struct EnvConfig {
    /// Backend URL from BACKEND_SMOKE_URL
    pub base_url: Option<String>,
    /// Env file from BACKEND_SMOKE_ENV_FILE
    pub env_file: Option<String>,
    /// Env key from BACKEND_SMOKE_URL_KEY
    pub url_key: Option<String>,
    /// Timeout from BACKEND_SMOKE_TIMEOUT
    pub timeout: Option<String>,
    /// Output format from BACKEND_SMOKE_FORMAT
    pub format: Option<String>,
    /// Log level from BACKEND_SMOKE_LOG
    pub log_level: Option<String>,
    /// Settings file from BACKEND_SMOKE_CONFIG
    pub config_file: Option<String>,
}

impl EnvConfig {
    /// Load configuration from the process environment
    pub fn load() -> Self {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Load configuration through an arbitrary lookup
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let get = |name: &str| lookup(&format!("{ENV_PREFIX}_{name}")).filter(|v| !v.is_empty());
        Self {
            base_url: get("URL"),
            env_file: get("ENV_FILE"),
            url_key: get("URL_KEY"),
            timeout: get("TIMEOUT"),
            format: get("FORMAT"),
            log_level: get("LOG"),
            config_file: get("CONFIG"),
        }
    }

    /// Check if any environment variables are set
    pub fn has_any(&self) -> bool {
        self.base_url.is_some()
            || self.env_file.is_some()
            || self.url_key.is_some()
            || self.timeout.is_some()
            || self.format.is_some()
            || self.log_level.is_some()
            || self.config_file.is_some()
    }

    /// Convert into a settings layer
    pub fn to_layer(&self) -> Result<PartialSettings, ConfigError> {
        let timeout_secs = match &self.timeout {
            Some(raw) => Some(raw.trim().parse::<u64>().map_err(|e| ConfigError::Invalid {
                name: "BACKEND_SMOKE_TIMEOUT",
                reason: format!("'{raw}': {e}"),
            })?),
            None => None,
        };

        Ok(PartialSettings {
            env_file: self.env_file.as_ref().map(PathBuf::from),
            url_key: self.url_key.clone(),
            base_url: self.base_url.clone(),
            timeout_secs,
            format: self.format.clone(),
            cors_origin: None,
            log_level: self.log_level.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name: &str| map.get(name).cloned()
    }

    #[test]
    fn test_env_config_default() {
        let config = EnvConfig::default();
        assert!(config.base_url.is_none());
        assert!(!config.has_any());
    }

    #[test]
    fn test_prefixed_variables() {
        let config = EnvConfig::from_lookup(lookup(&[
            ("BACKEND_SMOKE_URL", "http://localhost:8001"),
            ("BACKEND_SMOKE_TIMEOUT", "25"),
            ("REACT_APP_BACKEND_URL", "ignored"),
        ]));
        assert!(config.has_any());

        let layer = config.to_layer().unwrap();
        assert_eq!(layer.base_url.as_deref(), Some("http://localhost:8001"));
        assert_eq!(layer.timeout_secs, Some(25));
        assert!(layer.url_key.is_none());
    }

    #[test]
    fn test_empty_variables_are_unset() {
        let config = EnvConfig::from_lookup(lookup(&[("BACKEND_SMOKE_URL", "")]));
        assert!(!config.has_any());
    }

    #[test]
    fn test_bad_timeout_is_rejected() {
        let config = EnvConfig::from_lookup(lookup(&[("BACKEND_SMOKE_TIMEOUT", "soon")]));
        assert!(matches!(
            config.to_layer(),
            Err(ConfigError::Invalid { name: "BACKEND_SMOKE_TIMEOUT", .. })
        ));
    }
}
