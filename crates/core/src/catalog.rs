//! Typed product filters.
//!
//! A search request is turned into a [`ProductFilterSet`]: one
//! [`ProductFilter`] per active criterion. A product matches when it satisfies
//! every filter in the set. The set carries no storage details; the db crate
//! compiles it into SQL.

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, FieldError};
use crate::pagination::PageRequest;
use crate::rating::validate_rating_bucket;
use crate::search::build_tsquery;
use crate::types::DbId;

/// A single search criterion.
#[derive(Debug, Clone, PartialEq)]
pub enum ProductFilter {
    /// Full-text match on title and description. Holds a sanitized tsquery.
    Keyword(String),
    /// Inclusive price bounds. A missing side is unbounded.
    Price { min: Option<f64>, max: Option<f64> },
    /// Product category is one of these ids.
    Categories(Vec<DbId>),
    /// Product has at least one subcategory among these ids.
    Subcategories(Vec<DbId>),
    /// Floor of the product's mean star rating equals this bucket.
    RatingBucket(i32),
}

/// Body of `POST /product/search` and `POST /product/search/rating`.
///
/// The camelCase aliases are the field names the storefront frontend sends.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProductSearchRequest {
    /// Free-text keywords.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub query: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,
    #[serde(default, alias = "categoriesIds", skip_serializing_if = "Option::is_none")]
    pub category_ids: Option<Vec<DbId>>,
    #[serde(default, alias = "subCategoriesIds", skip_serializing_if = "Option::is_none")]
    pub subcategory_ids: Option<Vec<DbId>>,
    /// Rating bucket (0-5).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<i32>,
}

impl ProductSearchRequest {
    /// Validated page/limit, with defaults for missing values.
    pub fn page_request(&self) -> Result<PageRequest, CoreError> {
        PageRequest::from_optional(self.page, self.limit)
    }
}

/// The conjunction of every active [`ProductFilter`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProductFilterSet {
    filters: Vec<ProductFilter>,
}

impl ProductFilterSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the filter set for a search request.
    ///
    /// - A keyword with no searchable terms adds no filter.
    /// - Empty category or subcategory lists add no filter.
    /// - Price bounds must be finite and non-negative, with `min <= max`.
    /// - The rating bucket must be within 0-5.
    pub fn from_request(req: &ProductSearchRequest) -> Result<Self, CoreError> {
        let mut set = Self::new();
        let mut errors = Vec::new();

        if let Some(tsquery) = req.query.as_deref().and_then(build_tsquery) {
            set.push(ProductFilter::Keyword(tsquery));
        }

        if req.min.is_some() || req.max.is_some() {
            match validate_price_bounds(req.min, req.max) {
                Ok(()) => set.push(ProductFilter::Price {
                    min: req.min,
                    max: req.max,
                }),
                Err(mut e) => errors.append(&mut e),
            }
        }

        if let Some(ids) = req.category_ids.as_ref().filter(|ids| !ids.is_empty()) {
            set.push(ProductFilter::Categories(ids.clone()));
        }

        if let Some(ids) = req.subcategory_ids.as_ref().filter(|ids| !ids.is_empty()) {
            set.push(ProductFilter::Subcategories(ids.clone()));
        }

        if let Some(bucket) = req.rating {
            match validate_rating_bucket(bucket) {
                Ok(()) => set.push(ProductFilter::RatingBucket(bucket)),
                Err(CoreError::Validation(mut e)) => errors.append(&mut e),
                Err(other) => return Err(other),
            }
        }

        if errors.is_empty() {
            Ok(set)
        } else {
            Err(CoreError::Validation(errors))
        }
    }

    /// Append a filter. Callers are responsible for having validated it.
    pub fn push(&mut self, filter: ProductFilter) {
        self.filters.push(filter);
    }

    pub fn filters(&self) -> &[ProductFilter] {
        &self.filters
    }

    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }

    /// The requested rating bucket, if any.
    pub fn rating_bucket(&self) -> Option<i32> {
        self.filters.iter().find_map(|f| match f {
            ProductFilter::RatingBucket(bucket) => Some(*bucket),
            _ => None,
        })
    }

    /// Whether the search must go through the computed floor-average path.
    pub fn requires_rating_aggregation(&self) -> bool {
        self.rating_bucket().is_some()
    }

    /// Every filter that can be evaluated against stored columns, i.e. all
    /// except the rating bucket.
    pub fn stored_field_filters(&self) -> impl Iterator<Item = &ProductFilter> {
        self.filters
            .iter()
            .filter(|f| !matches!(f, ProductFilter::RatingBucket(_)))
    }
}

fn validate_price_bounds(min: Option<f64>, max: Option<f64>) -> Result<(), Vec<FieldError>> {
    let mut errors = Vec::new();

    for (field, value) in [("min", min), ("max", max)] {
        if let Some(v) = value {
            if !v.is_finite() || v < 0.0 {
                errors.push(FieldError::new(
                    field,
                    format!("{field} must be a non-negative number"),
                ));
            }
        }
    }

    if let (Some(lo), Some(hi)) = (min, max) {
        if errors.is_empty() && lo > hi {
            errors.push(FieldError::new("min", "min must not exceed max"));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
