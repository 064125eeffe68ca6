//! Storefront backend API module
//!
//! This module provides the data query resolver shared by every list screen:
//! query building, HTTP access with per-call deadlines, bundled fallback
//! data for catalog reads, per-screen list state, and single-field record
//! mutations.

pub mod client;
pub mod error;
pub mod fallback;
pub mod manager;
pub mod models;
pub mod operations;
pub mod pluralization;
pub mod query;
pub mod resilience;

#[cfg(test)]
pub(crate) mod test_support;

pub use client::{HttpDataSource, RemoteDataSource};
pub use error::{ApiError, ParseError, TransportError, TransportErrorKind};
pub use fallback::{FallbackCategory, FallbackResolver, LocalQuery};
pub use manager::{DataOrigin, ListSnapshot, ListStateManager, ListStatus};
pub use models::{Credential, ListEndpoint, Record, record_id};
pub use operations::{MutationGateway, MutationRequest};
pub use query::{
    Filters, QueryBuilder, QueryDescriptor, RawResponse, RequestDescriptor, ResultPage,
    SortFields, SortOrder,
};
pub use resilience::{ApiLogger, ClientConfig, LogLevel, MonitoringConfig, TimeoutConfig};
