//! Storefront catalog client.
//!
//! [`api::CatalogClient`] fetches catalog pages over HTTP and
//! [`store::CatalogStore`] folds them into a normalized, per-view store.

pub mod api;
pub mod models;
pub mod store;
