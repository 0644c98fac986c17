//! Product entity model and DTOs.
//!
//! Reads come back with the populated `category`, `subcategories` and
//! `ratings` columns assembled by the repository as JSON, so a product
//! response is a single row.

use serde::{Deserialize, Deserializer, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;
use storefront_core::images::ProductImage;
use storefront_core::rating::floor_average;
use storefront_core::types::{DbId, Timestamp};
use validator::Validate;

use super::category::CategoryRef;
use super::rating::RatingEntry;

/// A product row with its populated references.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Product {
    pub id: DbId,
    pub title: String,
    pub slug: String,
    pub description: String,
    pub price: f64,
    pub quantity: i32,
    pub shipping: bool,
    pub color: Option<String>,
    pub brand: Option<String>,
    pub category_id: Option<DbId>,
    pub subcategory_ids: Vec<DbId>,
    pub images: Json<Vec<ProductImage>>,
    pub sold: i32,
    pub ratings: Json<Vec<RatingEntry>>,
    pub category: Option<Json<CategoryRef>>,
    pub subcategories: Json<Vec<CategoryRef>>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Product {
    /// Storage ids of every attached image, in display order.
    pub fn image_ids(&self) -> Vec<String> {
        self.images.iter().map(|img| img.image_id.clone()).collect()
    }

    /// Floor of the mean star rating, `None` when unrated.
    pub fn floor_average(&self) -> Option<i32> {
        let stars: Vec<i16> = self.ratings.iter().map(|r| r.star).collect();
        floor_average(&stars)
    }
}

/// A product returned by the rating-aware search, carrying its computed bucket.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct RatedProduct {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub product: Product,
    pub floor_average: Option<i32>,
}

fn default_shipping() -> bool {
    true
}

/// DTO for creating a product. The slug is derived from `title`.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateProduct {
    #[validate(length(min = 1, max = 200, message = "title must be 1-200 characters"))]
    pub title: String,
    #[serde(default)]
    #[validate(length(max = 5000, message = "description must be at most 5000 characters"))]
    pub description: String,
    #[validate(range(min = 0.0, message = "price must not be negative"))]
    pub price: f64,
    #[serde(default)]
    #[validate(range(min = 0, message = "quantity must not be negative"))]
    pub quantity: i32,
    #[serde(default = "default_shipping")]
    pub shipping: bool,
    pub color: Option<String>,
    pub brand: Option<String>,
    #[serde(alias = "category")]
    pub category_id: Option<DbId>,
    #[serde(default, alias = "subCategories")]
    pub subcategory_ids: Vec<DbId>,
    #[serde(default)]
    pub images: Vec<ProductImage>,
}

/// DTO for updating a product. Absent fields keep their stored value.
///
/// The nullable columns (`color`, `brand`, `category_id`) distinguish an
/// absent field (`None`) from an explicit `null` (`Some(None)`), which clears
/// the column.
///
/// `removed_images` names image ids to detach; `images` are appended after
/// the removal.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateProduct {
    #[validate(length(min = 1, max = 200, message = "title must be 1-200 characters"))]
    pub title: Option<String>,
    #[validate(length(max = 5000, message = "description must be at most 5000 characters"))]
    pub description: Option<String>,
    #[validate(range(min = 0.0, message = "price must not be negative"))]
    pub price: Option<f64>,
    #[validate(range(min = 0, message = "quantity must not be negative"))]
    pub quantity: Option<i32>,
    pub shipping: Option<bool>,
    #[serde(default, deserialize_with = "present")]
    pub color: Option<Option<String>>,
    #[serde(default, deserialize_with = "present")]
    pub brand: Option<Option<String>>,
    #[serde(default, alias = "category", deserialize_with = "present")]
    pub category_id: Option<Option<DbId>>,
    #[serde(alias = "subCategories")]
    pub subcategory_ids: Option<Vec<DbId>>,
    #[serde(default, alias = "removedImages")]
    pub removed_images: Vec<String>,
    #[serde(default)]
    pub images: Vec<ProductImage>,
}

/// Marks a field that appeared in the body, keeping `null` as `Some(None)`.
fn present<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// Result of an update: the stored product and the image ids it no longer owns.
#[derive(Debug, Clone)]
pub struct UpdatedProduct {
    pub product: Product,
    pub detached_images: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create(title: &str, price: f64) -> CreateProduct {
        CreateProduct {
            title: title.to_string(),
            description: String::new(),
            price,
            quantity: 1,
            shipping: true,
            color: None,
            brand: None,
            category_id: None,
            subcategory_ids: Vec::new(),
            images: Vec::new(),
        }
    }

    #[test]
    fn create_requires_title_and_non_negative_price() {
        assert!(create("Desk Lamp", 19.5).validate().is_ok());
        assert!(create("", 19.5).validate().is_err());
        assert!(create("Desk Lamp", -0.01).validate().is_err());
    }

    #[test]
    fn create_defaults_shipping_to_true() {
        let input: CreateProduct =
            serde_json::from_value(serde_json::json!({ "title": "Mug", "price": 4.0 })).unwrap();
        assert!(input.shipping);
        assert!(input.images.is_empty());
    }

    #[test]
    fn update_accepts_frontend_field_names() {
        let input: UpdateProduct = serde_json::from_value(serde_json::json!({
            "removedImages": ["a"],
            "subCategories": [4, 5],
            "price": 12.0
        }))
        .unwrap();
        assert_eq!(input.removed_images, vec!["a".to_string()]);
        assert_eq!(input.subcategory_ids, Some(vec![4, 5]));
        assert!(input.validate().is_ok());
    }

    #[test]
    fn update_tells_null_from_absent() {
        let input: UpdateProduct = serde_json::from_value(serde_json::json!({
            "color": null,
            "category": 7
        }))
        .unwrap();
        assert_eq!(input.color, Some(None));
        assert_eq!(input.brand, None);
        assert_eq!(input.category_id, Some(Some(7)));
    }

    #[test]
    fn update_validates_only_present_fields() {
        assert!(UpdateProduct::default().validate().is_ok());
        let bad = UpdateProduct {
            price: Some(-1.0),
            ..Default::default()
        };
        assert!(bad.validate().is_err());
    }
}
