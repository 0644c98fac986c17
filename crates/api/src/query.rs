//! Shared query parameter types for API handlers.

use serde::Deserialize;
use storefront_core::error::CoreError;
use storefront_core::pagination::{PageRequest, ProductSort};

/// Query parameters for `GET /product` (`?page=&limit=&sort=`).
#[derive(Debug, Default, Deserialize)]
pub struct ListProductsParams {
    pub page: Option<i64>,
    pub limit: Option<i64>,
    pub sort: Option<String>,
}

impl ListProductsParams {
    /// Validate paging and sort together so every bad field is reported.
    pub fn resolve(&self) -> Result<(PageRequest, ProductSort), CoreError> {
        let page = PageRequest::from_optional(self.page, self.limit);
        let sort = ProductSort::parse(self.sort.as_deref().unwrap_or_default());

        match (page, sort) {
            (Ok(page), Ok(sort)) => Ok((page, sort)),
            (Err(CoreError::Validation(mut a)), Err(CoreError::Validation(b))) => {
                a.extend(b);
                Err(CoreError::Validation(a))
            }
            (Err(e), _) | (_, Err(e)) => Err(e),
        }
    }
}
