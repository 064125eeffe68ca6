//! Client configuration with builder pattern
//!
//! Groups per-call deadlines and request monitoring with sane defaults.
//! There is no retry section: a failed call is final and the caller decides
//! whether to issue it again.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::str::FromStr;
use std::time::Duration;

/// Configuration shared by every backend call made through one client
#[derive(Debug, Clone, Default)]
pub struct ClientConfig {
    pub timeouts: TimeoutConfig,
    pub monitoring: MonitoringConfig,
}

/// Per-call deadlines
#[derive(Debug, Clone)]
pub struct TimeoutConfig {
    /// Deadline used when a resource has no override
    pub default: Duration,
    /// Overrides keyed by collection name (e.g. "reports" -> 60s)
    pub overrides: HashMap<String, Duration>,
}

/// Monitoring and logging configuration
#[derive(Debug, Clone)]
pub struct MonitoringConfig {
    /// Tag each request with an `x-correlation-id` header
    pub correlation_ids: bool,
    /// Log one line per request and response
    pub request_logging: bool,
    pub log_level: LogLevel,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    pub fn to_filter(self) -> log::LevelFilter {
        match self {
            Self::Error => log::LevelFilter::Error,
            Self::Warn => log::LevelFilter::Warn,
            Self::Info => log::LevelFilter::Info,
            Self::Debug => log::LevelFilter::Debug,
            Self::Trace => log::LevelFilter::Trace,
        }
    }
}

impl FromStr for LogLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "error" => Ok(Self::Error),
            "warn" => Ok(Self::Warn),
            "info" => Ok(Self::Info),
            "debug" => Ok(Self::Debug),
            "trace" => Ok(Self::Trace),
            other => Err(format!("unknown log level '{}'", other)),
        }
    }
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            default: Duration::from_secs(30),
            overrides: HashMap::new(),
        }
    }
}

impl TimeoutConfig {
    /// Deadline for a collection path, with or without the leading slash
    pub fn for_resource(&self, resource: &str) -> Duration {
        let key = resource.trim_start_matches('/');
        let key = key.split('/').next().unwrap_or(key);
        self.overrides.get(key).copied().unwrap_or(self.default)
    }
}

impl Default for MonitoringConfig {
    fn default() -> Self {
        Self {
            correlation_ids: true,
            request_logging: true,
            log_level: LogLevel::Info,
        }
    }
}

impl ClientConfig {
    /// Create a new builder for ClientConfig
    pub fn builder() -> ClientConfigBuilder {
        ClientConfigBuilder::new()
    }

    /// Quiet configuration (for testing)
    pub fn disabled() -> Self {
        Self {
            timeouts: TimeoutConfig::default(),
            monitoring: MonitoringConfig {
                correlation_ids: false,
                request_logging: false,
                log_level: LogLevel::Error,
            },
        }
    }
}

/// Builder for ClientConfig
#[derive(Debug)]
pub struct ClientConfigBuilder {
    config: ClientConfig,
}

impl ClientConfigBuilder {
    pub fn new() -> Self {
        Self {
            config: ClientConfig::default(),
        }
    }

    /// Set the deadline used when no override matches
    pub fn default_timeout(mut self, timeout: Duration) -> Self {
        self.config.timeouts.default = timeout;
        self
    }

    /// Set a deadline for one collection
    pub fn timeout_for(mut self, resource: impl Into<String>, timeout: Duration) -> Self {
        self.config
            .timeouts
            .overrides
            .insert(resource.into(), timeout);
        self
    }

    /// Enable/disable correlation IDs
    pub fn correlation_ids(mut self, enabled: bool) -> Self {
        self.config.monitoring.correlation_ids = enabled;
        self
    }

    /// Set logging level
    pub fn log_level(mut self, level: LogLevel) -> Self {
        self.config.monitoring.log_level = level;
        self
    }

    /// Build the final configuration
    pub fn build(self) -> ClientConfig {
        self.config
    }
}

impl Default for ClientConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}
