//! Data query resolver for a multi-vendor storefront backend
//!
//! Every list screen (products, categories, orders, users, vendors) fetches,
//! filters, sorts and pages its data the same way; this crate provides that
//! shared machinery plus a small CLI on top of it.

pub mod api;
pub mod cli;
pub mod config;
