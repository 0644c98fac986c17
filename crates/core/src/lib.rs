//! Storefront catalog domain crate.
//!
//! Holds the pieces that have no database or HTTP dependency: shared id and
//! timestamp types, the error type, slug derivation, typed product filters,
//! pagination and sort rules, rating aggregation, and the
//! image store abstraction. The db, api, and client crates all build on it.

pub mod catalog;
pub mod error;
pub mod images;
pub mod pagination;
pub mod rating;
pub mod roles;
pub mod search;
pub mod slug;
pub mod types;
