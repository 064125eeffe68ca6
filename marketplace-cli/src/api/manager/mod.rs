//! Per-screen list state
//!
//! A [`ListStateManager`] is created for each list screen, parameterized by
//! the endpoint it reads and the fallback dataset (if any) it may degrade to.

pub mod list;
pub mod state;

pub use list::ListStateManager;
pub use state::{DataOrigin, ListSnapshot, ListStatus};
