//! Route definitions for products.

use axum::routing::{get, post, put};
use axum::Router;

use crate::handlers::product;
use crate::state::AppState;

/// Routes mounted at `/product`.
///
/// ```text
/// GET    /                         -> list
/// POST   /                         -> create
/// GET    /{id}                     -> get_by_id
/// PUT    /{id}                     -> update
/// DELETE /{id}                     -> delete
/// GET    /related/{product_id}     -> related
/// POST   /search                   -> search
/// POST   /search/rating            -> search_with_rating
/// PUT    /star/{product_id}        -> rate
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(product::list).post(product::create))
        .route(
            "/{id}",
            get(product::get_by_id)
                .put(product::update)
                .delete(product::delete),
        )
        .route("/related/{product_id}", get(product::related))
        .route("/search", post(product::search))
        .route("/search/rating", post(product::search_with_rating))
        .route("/star/{product_id}", put(product::rate))
}
