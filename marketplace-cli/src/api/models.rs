//! Shared data types for storefront and back-office resources

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::time::Duration;

use super::fallback::FallbackCategory;
use super::pluralization::collection_path;

/// One backend entity (product, order, user, vendor, category)
///
/// No schema is shared across resources, so a record is kept as the raw JSON
/// object the backend returned.
pub type Record = Map<String, Value>;

/// Identity fields checked, in order, when looking a record up by id
pub const IDENTITY_FIELDS: [&str; 3] = ["id", "product_id", "order_number"];

/// Find the identifier of a record, stringified
pub fn record_id(record: &Record) -> Option<String> {
    IDENTITY_FIELDS
        .iter()
        .find_map(|field| record.get(*field))
        .and_then(|value| match value {
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        })
}

/// Bearer token passed explicitly to every backend call
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credential(String);

impl Credential {
    pub fn bearer(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn token(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Credential(***)")
    }
}

/// A collection endpoint a list screen reads from
#[derive(Debug, Clone, PartialEq)]
pub struct ListEndpoint {
    /// Collection path relative to the API base URL (e.g. "/products")
    pub path: String,
    /// Static dataset substituted when the backend is unreachable
    pub fallback: Option<FallbackCategory>,
    /// Hard upper bound for one fetch against this endpoint
    pub timeout: Duration,
}

impl ListEndpoint {
    /// Build an endpoint from an entity name, deriving the collection path
    /// and the fallback dataset (if any) from it
    pub fn for_entity(entity: &str, timeout: Duration) -> Self {
        let collection = collection_path(entity);
        Self {
            fallback: FallbackCategory::from_collection(&collection),
            path: format!("/{}", collection),
            timeout,
        }
    }

    /// Catalog reads degrade to bundled data; admin lists surface errors
    pub fn is_catalog(&self) -> bool {
        self.fallback.is_some()
    }

    /// Collection name without the leading slash
    pub fn resource(&self) -> &str {
        self.path.trim_start_matches('/')
    }
}
