//! Product rating model and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use storefront_core::types::{DbId, Timestamp};
use validator::Validate;

/// A row from the `product_ratings` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ProductRating {
    pub id: DbId,
    pub product_id: DbId,
    pub rated_by: DbId,
    pub star: i16,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A rating as embedded in a product response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RatingEntry {
    pub posted_by: DbId,
    pub star: i16,
}

/// Body of `PUT /product/star/{product_id}`.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct RateProduct {
    #[validate(range(min = 1, max = 5, message = "star must be between 1 and 5"))]
    pub star: i16,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn star_outside_one_to_five_fails_validation() {
        assert!(RateProduct { star: 0 }.validate().is_err());
        assert!(RateProduct { star: 6 }.validate().is_err());
        assert!(RateProduct { star: 1 }.validate().is_ok());
        assert!(RateProduct { star: 5 }.validate().is_ok());
    }
}
