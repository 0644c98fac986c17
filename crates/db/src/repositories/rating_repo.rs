//! Repository for the `product_ratings` table.

use sqlx::PgPool;
use storefront_core::types::DbId;

use crate::models::rating::ProductRating;

/// Column list for the `product_ratings` table.
const COLUMNS: &str = "id, product_id, rated_by, star, created_at, updated_at";

/// Provides the rating upsert and per-product lookups.
pub struct RatingRepo;

impl RatingRepo {
    /// Record `rated_by`'s star for a product, replacing any earlier one.
    ///
    /// A single statement keyed on `uq_product_ratings_product_rater`, so
    /// concurrent calls for the same pair still leave exactly one row.
    pub async fn upsert(
        pool: &PgPool,
        product_id: DbId,
        rated_by: DbId,
        star: i16,
    ) -> Result<ProductRating, sqlx::Error> {
        let query = format!(
            "INSERT INTO product_ratings (product_id, rated_by, star) \
             VALUES ($1, $2, $3) \
             ON CONFLICT ON CONSTRAINT uq_product_ratings_product_rater \
             DO UPDATE SET star = EXCLUDED.star \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ProductRating>(&query)
            .bind(product_id)
            .bind(rated_by)
            .bind(star)
            .fetch_one(pool)
            .await
    }

    /// All ratings of a product, oldest first.
    pub async fn list_for_product(
        pool: &PgPool,
        product_id: DbId,
    ) -> Result<Vec<ProductRating>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM product_ratings \
             WHERE product_id = $1 ORDER BY created_at, id"
        );
        sqlx::query_as::<_, ProductRating>(&query)
            .bind(product_id)
            .fetch_all(pool)
            .await
    }
}
