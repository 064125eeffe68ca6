//! Fluent builder for query descriptors

use log::warn;
use std::num::NonZeroU32;

use super::filters::Filters;
use super::orderby::SortOrder;
use super::query::{DEFAULT_PAGE_SIZE, QueryDescriptor};

/// Fluent builder producing an immutable [`QueryDescriptor`]
///
/// ```ignore
/// let descriptor = QueryBuilder::new()
///     .page(2)
///     .sort_by("total_amount")
///     .sort_order(SortOrder::Asc)
///     .filter("status", "pending")
///     .build();
/// ```
#[derive(Debug, Clone)]
pub struct QueryBuilder {
    page: NonZeroU32,
    page_size: NonZeroU32,
    sort_by: String,
    sort_order: SortOrder,
    filters: Filters,
}

impl QueryBuilder {
    pub fn new() -> Self {
        let defaults = QueryDescriptor::default();
        Self {
            page: NonZeroU32::MIN,
            page_size: DEFAULT_PAGE_SIZE,
            sort_by: defaults.sort_by().to_string(),
            sort_order: defaults.sort_order(),
            filters: Filters::new(),
        }
    }

    /// Start from an existing descriptor (e.g. to change one filter)
    pub fn from_descriptor(descriptor: &QueryDescriptor) -> Self {
        Self {
            page: NonZeroU32::new(descriptor.page()).unwrap_or(NonZeroU32::MIN),
            page_size: NonZeroU32::new(descriptor.page_size()).unwrap_or(DEFAULT_PAGE_SIZE),
            sort_by: descriptor.sort_by().to_string(),
            sort_order: descriptor.sort_order(),
            filters: descriptor.filters().clone(),
        }
    }

    /// Set the 1-based page; 0 is clamped to 1
    pub fn page(mut self, page: u32) -> Self {
        self.page = NonZeroU32::new(page).unwrap_or_else(|| {
            warn!("Page 0 requested, clamping to 1");
            NonZeroU32::MIN
        });
        self
    }

    /// Set the page size; 0 is clamped to 1
    pub fn page_size(mut self, size: u32) -> Self {
        self.page_size = NonZeroU32::new(size).unwrap_or_else(|| {
            warn!("Page size 0 requested, clamping to 1");
            NonZeroU32::MIN
        });
        self
    }

    pub fn sort_by(mut self, field: impl Into<String>) -> Self {
        self.sort_by = field.into();
        self
    }

    pub fn sort_order(mut self, order: SortOrder) -> Self {
        self.sort_order = order;
        self
    }

    /// Add a filter; blank values are dropped
    pub fn filter(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.filters.set(key, Some(value));
        self
    }

    /// Add a filter only when a value is present
    pub fn filter_opt(mut self, key: impl Into<String>, value: Option<impl Into<String>>) -> Self {
        self.filters.set(key, value);
        self
    }

    pub fn filters(mut self, filters: Filters) -> Self {
        for (key, value) in filters.iter() {
            self.filters.set(key, Some(value));
        }
        self
    }

    pub fn build(self) -> QueryDescriptor {
        QueryDescriptor::from_parts(
            self.page,
            self.page_size,
            self.sort_by,
            self.sort_order,
            self.filters,
        )
    }
}

impl Default for QueryBuilder {
    fn default() -> Self {
        Self::new()
    }
}
