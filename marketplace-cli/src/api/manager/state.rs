//! Observable list state

use crate::api::error::ApiError;
use crate::api::query::{QueryDescriptor, ResultPage};

/// Where the displayed page came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataOrigin {
    Remote,
    Fallback,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ListStatus {
    /// No query issued yet
    #[default]
    Idle,
    /// A query is in flight; `data` still holds the previous page
    Loading,
    /// The most recent query settled, successfully or not
    Ready,
}

/// Immutable view of a list screen's state at one instant
#[derive(Debug, Clone, Default)]
pub struct ListSnapshot {
    pub status: ListStatus,
    pub data: Option<ResultPage>,
    /// Failure of the most recent query; set alongside fallback data too
    pub error: Option<ApiError>,
    pub origin: Option<DataOrigin>,
    /// Descriptor of the most recently issued query
    pub last_descriptor: Option<QueryDescriptor>,
    /// Number of queries issued so far
    pub generation: u64,
}

impl ListSnapshot {
    pub fn is_loading(&self) -> bool {
        self.status == ListStatus::Loading
    }

    pub fn is_fallback(&self) -> bool {
        self.origin == Some(DataOrigin::Fallback)
    }
}
