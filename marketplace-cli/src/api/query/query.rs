//! Query descriptor and the request it serializes to

use serde::{Deserialize, Serialize};
use std::num::NonZeroU32;

use super::filters::{Filters, is_reserved};
use super::orderby::{SortFields, SortOrder};

/// Default number of rows per page on list screens
pub const DEFAULT_PAGE_SIZE: NonZeroU32 = match NonZeroU32::new(10) {
    Some(size) => size,
    None => unreachable!(),
};

/// The filter, sort and page choices driving one fetch
///
/// Immutable once built; a new descriptor is created for every interaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryDescriptor {
    page: NonZeroU32,
    page_size: NonZeroU32,
    sort_by: String,
    sort_order: SortOrder,
    filters: Filters,
}

impl QueryDescriptor {
    pub(super) fn from_parts(
        page: NonZeroU32,
        page_size: NonZeroU32,
        sort_by: String,
        sort_order: SortOrder,
        filters: Filters,
    ) -> Self {
        Self {
            page,
            page_size,
            sort_by,
            sort_order,
            filters,
        }
    }

    /// 1-based page number
    pub fn page(&self) -> u32 {
        self.page.get()
    }

    pub fn page_size(&self) -> u32 {
        self.page_size.get()
    }

    pub fn sort_by(&self) -> &str {
        &self.sort_by
    }

    pub fn sort_order(&self) -> SortOrder {
        self.sort_order
    }

    pub fn filters(&self) -> &Filters {
        &self.filters
    }

    /// Same choices, different page
    pub fn with_page(&self, page: NonZeroU32) -> Self {
        Self {
            page,
            ..self.clone()
        }
    }

    /// Build the canonical request without an allow-list
    pub fn build(&self) -> RequestDescriptor {
        self.build_checked(&SortFields::default())
    }

    /// Build the canonical request
    ///
    /// Keys are emitted as `page, page_size, sort_by, sort_order`, then the
    /// filters in declaration order. Blank sort fields are omitted, and so
    /// is any filter named like one of the leading keys.
    pub fn build_checked(&self, sort_fields: &SortFields) -> RequestDescriptor {
        let mut params = Vec::with_capacity(4 + self.filters.len());
        params.push(("page".to_string(), self.page.to_string()));
        params.push(("page_size".to_string(), self.page_size.to_string()));

        if !self.sort_by.trim().is_empty() {
            let sort_by = sort_fields.check(&self.sort_by);
            params.push(("sort_by".to_string(), sort_by.to_string()));
            params.push(("sort_order".to_string(), self.sort_order.to_string()));
        }

        for (key, value) in self.filters.iter().filter(|(key, _)| !is_reserved(key)) {
            params.push((key.to_string(), value.to_string()));
        }

        RequestDescriptor { params }
    }
}

impl Default for QueryDescriptor {
    fn default() -> Self {
        Self {
            page: NonZeroU32::MIN,
            page_size: DEFAULT_PAGE_SIZE,
            sort_by: "created_at".to_string(),
            sort_order: SortOrder::Desc,
            filters: Filters::new(),
        }
    }
}

/// Ordered query-string parameters for one request
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RequestDescriptor {
    params: Vec<(String, String)>,
}

impl RequestDescriptor {
    pub fn params(&self) -> &[(String, String)] {
        &self.params
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.params
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Percent-encoded `k=v&k=v` form, without the leading `?`
    pub fn to_query_string(&self) -> String {
        self.params
            .iter()
            .map(|(k, v)| format!("{}={}", urlencoding::encode(k), urlencoding::encode(v)))
            .collect::<Vec<_>>()
            .join("&")
    }
}
