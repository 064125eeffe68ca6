//! Deadlines and request monitoring
//!
//! Provides per-resource timeouts and correlation-id request logging for
//! backend calls. Calls are never retried automatically.

pub mod config;
pub mod logging;

pub use config::{ClientConfig, ClientConfigBuilder, LogLevel, MonitoringConfig, TimeoutConfig};
pub use logging::{ApiLogger, CORRELATION_HEADER, OperationContext};
