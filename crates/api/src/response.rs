//! Shared response envelope types for API handlers.
//!
//! Single resources use a `{ "data": ... }` envelope. Listings use
//! [`storefront_core::pagination::PageResponse`] (`{ data, total, page }`).

use serde::Serialize;

/// Standard `{ "data": T }` response envelope.
///
/// ```ignore
/// Ok(Json(DataResponse { data: product }))
/// ```
#[derive(Debug, Serialize)]
pub struct DataResponse<T: Serialize> {
    pub data: T,
}
