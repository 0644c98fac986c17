pub mod health;
pub mod product;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /product                                list, create (admin)
/// /product/{id}                           get, update (admin), delete (admin)
/// /product/related/{product_id}           related products
/// /product/search                         filtered search (POST)
/// /product/search/rating                  rating-aware search (POST)
/// /product/star/{product_id}              rate (PUT, signed-in user)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new().nest("/product", product::router())
}
