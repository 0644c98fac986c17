//! Handlers for the `/product` resource.
//!
//! Reads and searches are public. Create, update and delete require an
//! admin; rating requires any signed-in user.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use storefront_core::catalog::{ProductFilterSet, ProductSearchRequest};
use storefront_core::error::CoreError;
use storefront_core::pagination::{PageResponse, ProductSort};
use storefront_core::types::DbId;
use storefront_db::models::product::{CreateProduct, Product, UpdateProduct};
use storefront_db::models::rating::RateProduct;
use storefront_db::repositories::{ProductRepo, RatingRepo};
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::extract::{AppJson, AppPath, AppQuery};
use crate::middleware::rbac::{RequireAdmin, RequireAuth};
use crate::query::ListProductsParams;
use crate::response::DataResponse;
use crate::state::AppState;

fn not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound {
        entity: "Product",
        id,
    })
}

async fn find_product(state: &AppState, id: DbId) -> AppResult<Product> {
    ProductRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(id))
}

// ---------------------------------------------------------------------------
// Reads
// ---------------------------------------------------------------------------

/// GET /api/v1/product?page=1&limit=10&sort=created_at
///
/// One page of every product, newest first unless `sort` names another field.
pub async fn list(
    State(state): State<AppState>,
    AppQuery(params): AppQuery<ListProductsParams>,
) -> AppResult<impl IntoResponse> {
    let (page, sort) = params.resolve()?;
    let (data, total) = ProductRepo::list(&state.pool, &page, sort).await?;
    Ok(Json(PageResponse {
        data,
        total,
        page: page.page(),
    }))
}

/// GET /api/v1/product/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    AppPath(id): AppPath<DbId>,
) -> AppResult<impl IntoResponse> {
    let product = find_product(&state, id).await?;
    Ok(Json(DataResponse { data: product }))
}

/// GET /api/v1/product/related/{product_id}
///
/// Up to three other products from the same category.
pub async fn related(
    State(state): State<AppState>,
    AppPath(product_id): AppPath<DbId>,
) -> AppResult<impl IntoResponse> {
    let product = find_product(&state, product_id).await?;
    let related = ProductRepo::related(&state.pool, &product).await?;
    Ok(Json(DataResponse { data: related }))
}

/// POST /api/v1/product/search
///
/// Filtered listing. A `rating` in the body switches to the rating-aware
/// search, whose items also carry `floor_average`.
pub async fn search(
    State(state): State<AppState>,
    AppJson(body): AppJson<ProductSearchRequest>,
) -> AppResult<Response> {
    let filters = ProductFilterSet::from_request(&body)?;
    if filters.requires_rating_aggregation() {
        return rated_page(&state, &body, &filters).await;
    }

    let page = body.page_request()?;
    let (data, total) =
        ProductRepo::search(&state.pool, &filters, &page, ProductSort::default()).await?;
    Ok(Json(PageResponse {
        data,
        total,
        page: page.page(),
    })
    .into_response())
}

/// POST /api/v1/product/search/rating
///
/// Rating-aware search. Every item carries its computed `floor_average`.
pub async fn search_with_rating(
    State(state): State<AppState>,
    AppJson(body): AppJson<ProductSearchRequest>,
) -> AppResult<Response> {
    let filters = ProductFilterSet::from_request(&body)?;
    rated_page(&state, &body, &filters).await
}

async fn rated_page(
    state: &AppState,
    body: &ProductSearchRequest,
    filters: &ProductFilterSet,
) -> AppResult<Response> {
    let page = body.page_request()?;
    let (data, total) =
        ProductRepo::search_rated(&state.pool, filters, &page, ProductSort::default()).await?;
    Ok(Json(PageResponse {
        data,
        total,
        page: page.page(),
    })
    .into_response())
}

// ---------------------------------------------------------------------------
// Writes
// ---------------------------------------------------------------------------

/// POST /api/v1/product
pub async fn create(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    AppJson(input): AppJson<CreateProduct>,
) -> AppResult<impl IntoResponse> {
    input.validate()?;

    let product = ProductRepo::create(&state.pool, &input).await?;
    tracing::info!(
        product_id = product.id,
        user_id = admin.user_id,
        images = product.images.len(),
        "Product created"
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: product })))
}

/// PUT /api/v1/product/{id}
///
/// Partial update. `removed_images` are detached and their files removed;
/// `images` are appended.
pub async fn update(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    AppPath(id): AppPath<DbId>,
    AppJson(input): AppJson<UpdateProduct>,
) -> AppResult<impl IntoResponse> {
    input.validate()?;

    let updated = ProductRepo::update(&state.pool, id, &input)
        .await?
        .ok_or_else(|| not_found(id))?;

    if !updated.detached_images.is_empty() {
        // The row is already committed; a storage failure leaves orphaned
        // files rather than failing the update.
        if let Err(e) = state.image_store.remove_images(&updated.detached_images).await {
            tracing::error!(product_id = id, error = %e, "Failed to remove detached images");
        }
    }

    tracing::info!(
        product_id = id,
        user_id = admin.user_id,
        detached = updated.detached_images.len(),
        added = input.images.len(),
        "Product updated"
    );

    Ok(Json(DataResponse {
        data: updated.product,
    }))
}

/// DELETE /api/v1/product/{id}
///
/// Removes the product's stored images, then the product. 204 on success.
pub async fn delete(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    AppPath(id): AppPath<DbId>,
) -> AppResult<StatusCode> {
    let product = find_product(&state, id).await?;
    let image_ids = product.image_ids();

    state.image_store.remove_images(&image_ids).await?;

    if !ProductRepo::delete(&state.pool, id).await? {
        return Err(not_found(id));
    }

    tracing::info!(
        product_id = id,
        user_id = admin.user_id,
        images = image_ids.len(),
        "Product deleted"
    );
    Ok(StatusCode::NO_CONTENT)
}

/// PUT /api/v1/product/star/{product_id}
///
/// Set the caller's star rating, replacing any earlier one, and return the
/// product with its updated ratings.
pub async fn rate(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    AppPath(product_id): AppPath<DbId>,
    AppJson(input): AppJson<RateProduct>,
) -> AppResult<impl IntoResponse> {
    input.validate()?;
    find_product(&state, product_id).await?;

    RatingRepo::upsert(&state.pool, product_id, user.user_id, input.star).await?;
    tracing::info!(
        product_id,
        user_id = user.user_id,
        star = input.star,
        "Product rated"
    );

    let product = find_product(&state, product_id).await?;
    Ok(Json(DataResponse { data: product }))
}
