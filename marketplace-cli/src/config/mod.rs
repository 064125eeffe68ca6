//! Application configuration
//!
//! Read from `<config dir>/marketplace-cli/config.toml` when present, then
//! overridden by environment variables (a `.env` file is honoured). The
//! bearer token lives here and is handed to the API layer explicitly.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::api::{ClientConfig, Credential, LogLevel, MonitoringConfig, TimeoutConfig};

pub const ENV_API_URL: &str = "MARKETPLACE_API_URL";
pub const ENV_API_TOKEN: &str = "MARKETPLACE_API_TOKEN";
pub const ENV_TIMEOUT_SECS: &str = "MARKETPLACE_TIMEOUT_SECS";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub api: ApiSection,
    pub timeouts: TimeoutSection,
    pub monitoring: MonitoringSection,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiSection {
    pub base_url: String,
    pub token: Option<String>,
}

impl Default for ApiSection {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000/api".to_string(),
            token: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TimeoutSection {
    pub default_secs: u64,
    /// Per-collection deadlines, e.g. `reports = 60`
    pub overrides: HashMap<String, u64>,
}

impl Default for TimeoutSection {
    fn default() -> Self {
        Self {
            default_secs: 30,
            overrides: HashMap::new(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MonitoringSection {
    pub correlation_ids: bool,
    pub request_logging: bool,
    pub log_level: LogLevel,
}

impl Default for MonitoringSection {
    fn default() -> Self {
        let defaults = MonitoringConfig::default();
        Self {
            correlation_ids: defaults.correlation_ids,
            request_logging: defaults.request_logging,
            log_level: defaults.log_level,
        }
    }
}

impl AppConfig {
    /// Default location of the config file
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("marketplace-cli").join("config.toml"))
    }

    /// Load from the default location and the process environment
    pub fn load() -> Result<Self> {
        dotenvy::dotenv().ok();

        let mut config = match Self::default_path() {
            Some(path) if path.exists() => Self::load_from(&path)?,
            _ => Self::default(),
        };
        config.apply_overrides(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    /// Apply `MARKETPLACE_*` overrides from a variable lookup
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<()> {
        if let Some(url) = lookup(ENV_API_URL).filter(|v| !v.trim().is_empty()) {
            self.api.base_url = url;
        }
        if let Some(token) = lookup(ENV_API_TOKEN).filter(|v| !v.trim().is_empty()) {
            self.api.token = Some(token);
        }
        if let Some(secs) = lookup(ENV_TIMEOUT_SECS) {
            self.timeouts.default_secs = secs.trim().parse().with_context(|| {
                format!("{} must be a number of seconds, got '{}'", ENV_TIMEOUT_SECS, secs)
            })?;
        }
        Ok(())
    }

    pub fn client_config(&self) -> ClientConfig {
        ClientConfig {
            timeouts: TimeoutConfig {
                default: Duration::from_secs(self.timeouts.default_secs.max(1)),
                overrides: self
                    .timeouts
                    .overrides
                    .iter()
                    .map(|(resource, secs)| (resource.clone(), Duration::from_secs((*secs).max(1))))
                    .collect(),
            },
            monitoring: MonitoringConfig {
                correlation_ids: self.monitoring.correlation_ids,
                request_logging: self.monitoring.request_logging,
                log_level: self.monitoring.log_level,
            },
        }
    }

    pub fn credential(&self) -> Result<Credential> {
        self.api
            .token
            .as_deref()
            .map(Credential::bearer)
            .with_context(|| {
                format!(
                    "No API token configured. Set {} or add `token` under [api] in the config file",
                    ENV_API_TOKEN
                )
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_partial_file() {
        let config: AppConfig = toml::from_str(
            r#"
            [api]
            base_url = "https://shop.example.com/api"

            [timeouts]
            default_secs = 10

            [timeouts.overrides]
            reports = 60

            [monitoring]
            log_level = "debug"
            "#,
        )
        .unwrap();

        assert_eq!(config.api.base_url, "https://shop.example.com/api");
        assert!(config.api.token.is_none());
        assert!(config.monitoring.correlation_ids);

        let client = config.client_config();
        assert_eq!(client.timeouts.default, Duration::from_secs(10));
        assert_eq!(client.timeouts.for_resource("/reports"), Duration::from_secs(60));
        assert_eq!(client.monitoring.log_level, LogLevel::Debug);
    }

    #[test]
    fn test_env_overrides() {
        let mut config = AppConfig::default();
        let env: HashMap<&str, &str> = [
            (ENV_API_URL, "http://127.0.0.1:9000"),
            (ENV_API_TOKEN, "abc"),
            (ENV_TIMEOUT_SECS, "5"),
        ]
        .into_iter()
        .collect();

        config
            .apply_overrides(|key| env.get(key).map(|v| v.to_string()))
            .unwrap();

        assert_eq!(config.api.base_url, "http://127.0.0.1:9000");
        assert_eq!(config.credential().unwrap().token(), "abc");
        assert_eq!(config.timeouts.default_secs, 5);
    }

    #[test]
    fn test_invalid_timeout_override_is_rejected() {
        let mut config = AppConfig::default();
        let result = config.apply_overrides(|key| {
            (key == ENV_TIMEOUT_SECS).then(|| "soon".to_string())
        });
        assert!(result.is_err());
    }

    #[test]
    fn test_missing_token_is_an_error() {
        assert!(AppConfig::default().credential().is_err());
    }
}
