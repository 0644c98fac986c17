//! Wire models as the catalog API returns them.

use serde::{Deserialize, Serialize};
use storefront_core::images::ProductImage;
use storefront_core::types::{DbId, Timestamp};

/// Populated category or subcategory reference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryRef {
    pub id: DbId,
    pub name: String,
    pub slug: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rating {
    pub posted_by: DbId,
    pub star: i16,
}

/// A product as served by every read endpoint.
///
/// `floor_average` is only present on rating-aware search results.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: DbId,
    pub title: String,
    pub slug: String,
    #[serde(default)]
    pub description: String,
    pub price: f64,
    pub quantity: i32,
    pub shipping: bool,
    pub color: Option<String>,
    pub brand: Option<String>,
    pub category_id: Option<DbId>,
    #[serde(default)]
    pub subcategory_ids: Vec<DbId>,
    #[serde(default)]
    pub images: Vec<ProductImage>,
    pub sold: i32,
    #[serde(default)]
    pub ratings: Vec<Rating>,
    pub category: Option<CategoryRef>,
    #[serde(default)]
    pub subcategories: Vec<CategoryRef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub floor_average: Option<i32>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// `{ "data": T }` envelope for single resources.
#[derive(Debug, Deserialize)]
pub(crate) struct DataResponse<T> {
    pub data: T,
}

/// Entities the normalized store can key by id.
pub trait Identified {
    fn id(&self) -> DbId;
}

impl Identified for Product {
    fn id(&self) -> DbId {
        self.id
    }
}
