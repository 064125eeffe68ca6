//! Query building for list screens
//!
//! Provides a fluent API for assembling filter/sort/page choices into an
//! immutable [`QueryDescriptor`], which serializes into a canonical
//! [`RequestDescriptor`]. Follows the same pattern as operations with a
//! reusable value type and a fluent builder.

pub mod builder;
pub mod filters;
pub mod orderby;
pub mod query;
pub mod result;

pub use builder::QueryBuilder;
pub use filters::Filters;
pub use orderby::{SortFields, SortOrder};
pub use query::{DEFAULT_PAGE_SIZE, QueryDescriptor, RequestDescriptor};
pub use result::{PageMeta, RawResponse, ResultPage};
