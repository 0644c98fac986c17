//! Authentication primitives.
//!
//! Tokens are issued by the storefront's account service; this crate only
//! validates them. [`jwt::generate_access_token`] exists for tooling and tests.

pub mod jwt;
