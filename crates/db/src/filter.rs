//! Compiles a [`ProductFilterSet`] into SQL on a [`QueryBuilder`].
//!
//! Every condition references the `products` table through the alias `p`.
//! Callers push a `WHERE TRUE` (or an existing predicate) before calling
//! [`push_stored_field_conditions`]; each filter is appended as `AND ...`.

use sqlx::{Postgres, QueryBuilder};
use storefront_core::catalog::{ProductFilter, ProductFilterSet};
use storefront_core::pagination::{PageRequest, ProductSort};

/// Append one `AND` condition per filter that reads stored columns.
///
/// The rating bucket is skipped: it is matched against the computed
/// `floor_average` column by the aggregation query.
pub fn push_stored_field_conditions(
    builder: &mut QueryBuilder<'_, Postgres>,
    filters: &ProductFilterSet,
) {
    for filter in filters.stored_field_filters() {
        match filter {
            ProductFilter::Keyword(tsquery) => {
                builder
                    .push(" AND p.search_vector @@ to_tsquery('english', ")
                    .push_bind(tsquery.clone())
                    .push(")");
            }
            ProductFilter::Price { min, max } => {
                if let Some(min) = min {
                    builder.push(" AND p.price >= ").push_bind(*min);
                }
                if let Some(max) = max {
                    builder.push(" AND p.price <= ").push_bind(*max);
                }
            }
            ProductFilter::Categories(ids) => {
                builder
                    .push(" AND p.category_id = ANY(")
                    .push_bind(ids.clone())
                    .push(")");
            }
            ProductFilter::Subcategories(ids) => {
                builder
                    .push(" AND p.subcategory_ids && ")
                    .push_bind(ids.clone());
            }
            ProductFilter::RatingBucket(_) => {}
        }
    }
}

/// Append `ORDER BY <alias>.<field> DESC, <alias>.id ASC`.
pub fn push_order_by(builder: &mut QueryBuilder<'_, Postgres>, alias: &str, sort: ProductSort) {
    let column = sort.column();
    builder.push(format!(" ORDER BY {alias}.{column} DESC, {alias}.id ASC"));
}

/// Append `LIMIT $n OFFSET $m` for the page.
pub fn push_page(builder: &mut QueryBuilder<'_, Postgres>, page: &PageRequest) {
    builder
        .push(" LIMIT ")
        .push_bind(page.limit())
        .push(" OFFSET ")
        .push_bind(page.offset());
}
