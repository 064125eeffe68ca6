//! Single-field update requests

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Intent to change one field of one record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MutationRequest {
    /// Collection name (e.g. "orders", "vendors")
    pub resource: String,
    /// Record identifier (id, product_id or order_number)
    pub record_id: String,
    /// Field being changed (e.g. "status", "is_verified")
    pub field: String,
    pub new_value: Value,
}

impl MutationRequest {
    pub fn new(
        resource: impl Into<String>,
        record_id: impl ToString,
        field: impl Into<String>,
        new_value: impl Into<Value>,
    ) -> Self {
        Self {
            resource: resource.into().trim_matches('/').to_string(),
            record_id: record_id.to_string(),
            field: field.into(),
            new_value: new_value.into(),
        }
    }

    /// Change an order's fulfilment status
    pub fn order_status(order_id: impl ToString, status: impl Into<String>) -> Self {
        let status: String = status.into();
        Self::new("orders", order_id, "status", status)
    }

    /// Mark a vendor as verified or not
    pub fn vendor_verification(vendor_id: impl ToString, verified: bool) -> Self {
        Self::new("vendors", vendor_id, "is_verified", verified)
    }

    /// `/{resource}/{id}/{field}`
    pub fn path(&self) -> String {
        format!(
            "/{}/{}/{}",
            self.resource,
            urlencoding::encode(&self.record_id),
            urlencoding::encode(&self.field)
        )
    }

    /// `{field: value}`
    pub fn body(&self) -> Value {
        let mut body = Map::new();
        body.insert(self.field.clone(), self.new_value.clone());
        Value::Object(body)
    }

    pub fn http_method(&self) -> &'static str {
        "PUT"
    }

    /// Parse a CLI argument into a JSON value, keeping plain words as strings
    pub fn parse_value(raw: &str) -> Value {
        serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()))
    }
}
