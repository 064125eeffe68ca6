//! Request logging with correlation ids

use log::{debug, info, warn};
use std::time::{Duration, Instant};
use uuid::Uuid;

use super::config::MonitoringConfig;

/// Header carrying the per-request correlation id
pub const CORRELATION_HEADER: &str = "x-correlation-id";

/// Context for one outbound request
#[derive(Debug, Clone)]
pub struct OperationContext {
    pub correlation_id: Option<String>,
    pub method: &'static str,
    pub url: String,
    started: Instant,
}

impl OperationContext {
    pub fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }

    fn tag(&self) -> String {
        match &self.correlation_id {
            Some(id) => format!("[{}] ", &id[..8.min(id.len())]),
            None => String::new(),
        }
    }
}

/// Logs request lifecycles according to the monitoring config
#[derive(Debug, Clone)]
pub struct ApiLogger {
    config: MonitoringConfig,
}

impl ApiLogger {
    pub fn new(config: MonitoringConfig) -> Self {
        Self { config }
    }

    /// Open a context for a request about to be sent
    pub fn start(&self, method: &'static str, url: &str) -> OperationContext {
        let context = OperationContext {
            correlation_id: self
                .config
                .correlation_ids
                .then(|| Uuid::new_v4().to_string()),
            method,
            url: url.to_string(),
            started: Instant::now(),
        };

        if self.config.request_logging {
            debug!("{}{} {}", context.tag(), method, url);
        }
        context
    }

    pub fn success(&self, context: &OperationContext, status: u16) {
        if self.config.request_logging {
            info!(
                "{}{} {} -> {} in {}ms",
                context.tag(),
                context.method,
                context.url,
                status,
                context.elapsed().as_millis()
            );
        }
    }

    pub fn failure(&self, context: &OperationContext, reason: &dyn std::fmt::Display) {
        if self.config.request_logging {
            warn!(
                "{}{} {} failed after {}ms: {}",
                context.tag(),
                context.method,
                context.url,
                context.elapsed().as_millis(),
                reason
            );
        }
    }
}
