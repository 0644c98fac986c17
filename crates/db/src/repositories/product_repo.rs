//! Repository for the `products` table.
//!
//! Read queries assemble the populated `category`, `subcategories` and
//! `ratings` columns with correlated JSON subqueries so every product is a
//! single row.

use sqlx::types::Json;
use sqlx::{PgPool, Postgres, QueryBuilder};
use storefront_core::catalog::ProductFilterSet;
use storefront_core::images::{edit_images, ProductImage};
use storefront_core::pagination::{PageRequest, ProductSort};
use storefront_core::slug::slugify;
use storefront_core::types::DbId;

use crate::filter::{push_order_by, push_page, push_stored_field_conditions};
use crate::models::product::{CreateProduct, Product, RatedProduct, UpdateProduct, UpdatedProduct};

/// Column list for a populated product, reading `products` as `p`.
const COLUMNS: &str = "p.id, p.title, p.slug, p.description, p.price, p.quantity, \
    p.shipping, p.color, p.brand, p.category_id, p.subcategory_ids, p.images, p.sold, \
    COALESCE((SELECT jsonb_agg(jsonb_build_object('posted_by', r.rated_by, 'star', r.star) \
        ORDER BY r.created_at, r.id) \
        FROM product_ratings r WHERE r.product_id = p.id), '[]'::jsonb) AS ratings, \
    (SELECT jsonb_build_object('id', c.id, 'name', c.name, 'slug', c.slug) \
        FROM categories c WHERE c.id = p.category_id) AS category, \
    COALESCE((SELECT jsonb_agg(jsonb_build_object('id', s.id, 'name', s.name, 'slug', s.slug) \
        ORDER BY s.id) \
        FROM subcategories s WHERE s.id = ANY(p.subcategory_ids)), '[]'::jsonb) AS subcategories, \
    p.created_at, p.updated_at";

/// Computed floor of the mean star rating; NULL when unrated.
const FLOOR_AVERAGE: &str = "(SELECT FLOOR(AVG(r.star))::INT \
    FROM product_ratings r WHERE r.product_id = p.id) AS floor_average";

/// Maximum number of products returned by [`ProductRepo::related`].
pub const RELATED_LIMIT: i64 = 3;

/// Provides CRUD, listing and search operations for products.
pub struct ProductRepo;

impl ProductRepo {
    /// Insert a new product, deriving its slug from the title.
    pub async fn create(pool: &PgPool, input: &CreateProduct) -> Result<Product, sqlx::Error> {
        let slug = slugify(&input.title);
        let id: DbId = sqlx::query_scalar(
            "INSERT INTO products \
                (title, slug, description, price, quantity, shipping, color, brand, \
                 category_id, subcategory_ids, images) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11) \
             RETURNING id",
        )
        .bind(&input.title)
        .bind(&slug)
        .bind(&input.description)
        .bind(input.price)
        .bind(input.quantity)
        .bind(input.shipping)
        .bind(input.color.is_some())
        .bind(input.color.as_deref())
        .bind(input.brand.is_some())
        .bind(input.brand.as_deref())
        .bind(input.category_id.is_some())
        .bind(input.category_id)
        .bind(&input.subcategory_ids)
        .bind(Json(&input.images))
        .fetch_one(pool)
        .await?;

        Self::find_by_id(pool, id)
            .await?
            .ok_or(sqlx::Error::RowNotFound)
    }

    /// Find a product by its ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Product>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM products p WHERE p.id = $1");
        sqlx::query_as::<_, Product>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// One page of every product under `sort`, plus the total product count.
    pub async fn list(
        pool: &PgPool,
        page: &PageRequest,
        sort: ProductSort,
    ) -> Result<(Vec<Product>, i64), sqlx::Error> {
        Self::search(pool, &ProductFilterSet::new(), page, sort).await
    }

    /// Up to [`RELATED_LIMIT`] other products sharing `product`'s category.
    ///
    /// A product without a category has no related products.
    pub async fn related(pool: &PgPool, product: &Product) -> Result<Vec<Product>, sqlx::Error> {
        let Some(category_id) = product.category_id else {
            return Ok(Vec::new());
        };

        let query = format!(
            "SELECT {COLUMNS} FROM products p \
             WHERE p.category_id = $1 AND p.id <> $2 \
             ORDER BY p.created_at DESC, p.id ASC \
             LIMIT $3"
        );
        sqlx::query_as::<_, Product>(&query)
            .bind(category_id)
            .bind(product.id)
            .bind(RELATED_LIMIT)
            .fetch_all(pool)
            .await
    }

    /// One page of products matching every stored-field filter, plus the
    /// count of all matches.
    ///
    /// The rating bucket, if present, is ignored here; use
    /// [`ProductRepo::search_rated`] for it.
    pub async fn search(
        pool: &PgPool,
        filters: &ProductFilterSet,
        page: &PageRequest,
        sort: ProductSort,
    ) -> Result<(Vec<Product>, i64), sqlx::Error> {
        let mut builder = QueryBuilder::<Postgres>::new("SELECT ");
        builder.push(COLUMNS).push(" FROM products p WHERE TRUE");
        push_stored_field_conditions(&mut builder, filters);
        push_order_by(&mut builder, "p", sort);
        push_page(&mut builder, page);
        let items = builder.build_query_as::<Product>().fetch_all(pool).await?;

        let mut count = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM products p WHERE TRUE");
        push_stored_field_conditions(&mut count, filters);
        let total: i64 = count.build_query_scalar().fetch_one(pool).await?;

        Ok((items, total))
    }

    /// Rating-aware search.
    ///
    /// Filtered products are projected with their computed `floor_average`,
    /// the rating bucket (if any) is matched against it, and only then is the
    /// page cut. The total counts every bucket match.
    pub async fn search_rated(
        pool: &PgPool,
        filters: &ProductFilterSet,
        page: &PageRequest,
        sort: ProductSort,
    ) -> Result<(Vec<RatedProduct>, i64), sqlx::Error> {
        let mut builder = QueryBuilder::<Postgres>::new("");
        push_rated_source(&mut builder, filters);
        push_order_by(&mut builder, "rated", sort);
        push_page(&mut builder, page);
        let items = builder
            .build_query_as::<RatedProduct>()
            .fetch_all(pool)
            .await?;

        let mut count = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM (");
        push_rated_source(&mut count, filters);
        count.push(") counted");
        let total: i64 = count.build_query_scalar().fetch_one(pool).await?;

        Ok((items, total))
    }

    /// Apply a partial update and an image edit in one transaction.
    ///
    /// The product row is locked while the new image list is computed, so
    /// concurrent edits cannot drop each other's images. Returns `None` if
    /// the product does not exist.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateProduct,
    ) -> Result<Option<UpdatedProduct>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let current: Option<Json<Vec<ProductImage>>> =
            sqlx::query_scalar("SELECT images FROM products WHERE id = $1 FOR UPDATE")
                .bind(id)
                .fetch_optional(&mut *tx)
                .await?;
        let Some(Json(current)) = current else {
            return Ok(None);
        };

        let edit = edit_images(current, &input.removed_images, input.images.clone());

        sqlx::query(
            "UPDATE products SET \
                title = COALESCE($2, title), \
                description = COALESCE($3, description), \
                price = COALESCE($4, price), \
                quantity = COALESCE($5, quantity), \
                shipping = COALESCE($6, shipping), \
                color = CASE WHEN $7 THEN $8 ELSE color END, \
                brand = CASE WHEN $9 THEN $10 ELSE brand END, \
                category_id = CASE WHEN $11 THEN $12 ELSE category_id END, \
                subcategory_ids = COALESCE($13, subcategory_ids), \
                images = $14 \
             WHERE id = $1",
        )
        .bind(id)
        .bind(&input.title)
        .bind(&input.description)
        .bind(input.price)
        .bind(input.quantity)
        .bind(input.shipping)
        .bind(input.color.is_some())
        .bind(input.color.as_ref().and_then(Option::as_deref))
        .bind(input.brand.is_some())
        .bind(input.brand.as_ref().and_then(Option::as_deref))
        .bind(input.category_id.is_some())
        .bind(input.category_id.flatten())
        .bind(&input.subcategory_ids)
        .bind(Json(&edit.images))
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        let product = Self::find_by_id(pool, id)
            .await?
            .ok_or(sqlx::Error::RowNotFound)?;
        Ok(Some(UpdatedProduct {
            product,
            detached_images: edit.detached,
        }))
    }

    /// Delete a product by ID. Returns `true` if a row was removed.
    ///
    /// Its ratings are removed by `ON DELETE CASCADE`.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM products WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

/// Push `SELECT * FROM (<filtered products + floor_average>) rated [WHERE bucket]`.
fn push_rated_source(builder: &mut QueryBuilder<'_, Postgres>, filters: &ProductFilterSet) {
    builder
        .push("SELECT * FROM (SELECT ")
        .push(COLUMNS)
        .push(", ")
        .push(FLOOR_AVERAGE)
        .push(" FROM products p WHERE TRUE");
    push_stored_field_conditions(builder, filters);
    builder.push(") rated");

    if let Some(bucket) = filters.rating_bucket() {
        builder.push(" WHERE rated.floor_average = ").push_bind(bucket);
    }
}
