//! Record mutations
//!
//! This module provides single-field updates (order status, vendor
//! verification) issued one request at a time.

pub mod gateway;
pub mod operation;

pub use gateway::MutationGateway;
pub use operation::MutationRequest;
