//! Result pages and the two response shapes the backend returns

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::api::error::ParseError;
use crate::api::models::{Record, record_id};

/// One page of records plus pagination metadata
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResultPage {
    pub items: Vec<Record>,
    pub total_records: u64,
    pub total_pages: u64,
    pub page: u64,
}

/// Pagination block of the envelope shape
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageMeta {
    pub total: u64,
    pub pages: u64,
    pub page: u64,
}

/// A response body as it came off the wire
#[derive(Debug, Clone, PartialEq)]
pub enum RawResponse {
    /// Legacy shape: a bare array, no pagination metadata
    Array(Vec<Record>),
    /// `{"items": [...], "meta": {"total", "pages", "page"}}`
    Envelope { items: Vec<Record>, meta: PageMeta },
}

#[derive(Deserialize)]
struct EnvelopeBody {
    items: Vec<Record>,
    meta: PageMeta,
}

impl RawResponse {
    /// Classify a decoded body; the presence of `meta` selects the envelope
    pub fn from_value(endpoint: &str, body: Value) -> Result<Self, ParseError> {
        let has_meta = matches!(&body, Value::Object(map) if map.contains_key("meta"));

        if has_meta {
            let envelope: EnvelopeBody = serde_json::from_value(body)
                .map_err(|e| ParseError::new(endpoint, format!("invalid envelope: {}", e)))?;
            Ok(Self::Envelope {
                items: envelope.items,
                meta: envelope.meta,
            })
        } else if body.is_array() {
            let items: Vec<Record> = serde_json::from_value(body)
                .map_err(|e| ParseError::new(endpoint, format!("invalid record array: {}", e)))?;
            Ok(Self::Array(items))
        } else {
            Err(ParseError::new(
                endpoint,
                format!("expected an array or an object with 'meta', got {}", kind_of(&body)),
            ))
        }
    }

    pub fn from_slice(endpoint: &str, bytes: &[u8]) -> Result<Self, ParseError> {
        let body: Value = serde_json::from_slice(bytes)
            .map_err(|e| ParseError::new(endpoint, format!("body is not JSON: {}", e)))?;
        Self::from_value(endpoint, body)
    }

    pub fn is_legacy(&self) -> bool {
        matches!(self, Self::Array(_))
    }

    pub fn into_page(self) -> ResultPage {
        match self {
            Self::Array(items) => ResultPage::single(items),
            Self::Envelope { items, meta } => ResultPage {
                items,
                total_records: meta.total,
                total_pages: meta.pages,
                page: meta.page,
            },
        }
    }
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object without 'meta'",
    }
}

impl ResultPage {
    /// Every record on one implied page
    pub fn single(items: Vec<Record>) -> Self {
        Self {
            total_records: items.len() as u64,
            total_pages: 1,
            page: 1,
            items,
        }
    }

    pub fn empty(page: u64) -> Self {
        Self {
            page,
            ..Self::default()
        }
    }

    /// Slice one page out of a complete record list, synthesizing metadata
    pub fn paginate(mut all: Vec<Record>, page: u32, page_size: u32) -> Self {
        let page_size = page_size.max(1) as usize;
        let page = page.max(1) as usize;
        let total = all.len();
        let start = (page - 1).saturating_mul(page_size).min(total);
        let end = start.saturating_add(page_size).min(total);

        Self {
            items: all.drain(start..end).collect(),
            total_records: total as u64,
            total_pages: total.div_ceil(page_size) as u64,
            page: page as u64,
        }
    }

    /// Enforce `items.len() <= page_size` and `items.len() <= total_records`
    ///
    /// A body holding the whole collection (legacy arrays) is paged locally;
    /// any other oversized page is truncated.
    pub fn normalize(mut self, page: u32, page_size: u32) -> Self {
        if self.items.len() > page_size.max(1) as usize
            && self.items.len() as u64 == self.total_records
        {
            return Self::paginate(self.items, page, page_size);
        }

        let page_size = page_size.max(1) as usize;
        if self.items.len() > page_size {
            log::warn!(
                "Received {} items for a page of {}, truncating",
                self.items.len(),
                page_size
            );
            self.items.truncate(page_size);
        }
        self.total_records = self.total_records.max(self.items.len() as u64);
        if self.total_records > 0 {
            self.total_pages = self.total_pages.max(1);
        }
        self
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Find a record on this page by its identity field
    pub fn find(&self, id: &str) -> Option<&Record> {
        self.items
            .iter()
            .find(|record| record_id(record).as_deref() == Some(id))
    }

    pub fn has_next(&self) -> bool {
        self.page < self.total_pages
    }
}
