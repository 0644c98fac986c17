//! Star rating rules and floor-average aggregation.

use crate::error::CoreError;

/// Lowest star a customer can give.
pub const MIN_STAR: i16 = 1;

/// Highest star a customer can give.
pub const MAX_STAR: i16 = 5;

/// Smallest rating bucket a search may ask for.
pub const MIN_RATING_BUCKET: i32 = 0;

/// Largest rating bucket a search may ask for.
pub const MAX_RATING_BUCKET: i32 = 5;

/// Mean star value rounded down to a whole bucket.
///
/// Returns `None` for a product nobody has rated; callers treat that as
/// "no rating", never as bucket 0.
///
/// # Examples
///
/// ```
/// use storefront_core::rating::floor_average;
/// assert_eq!(floor_average(&[4, 5]), Some(4));
/// assert_eq!(floor_average(&[]), None);
/// ```
pub fn floor_average(stars: &[i16]) -> Option<i32> {
    if stars.is_empty() {
        return None;
    }
    let sum: i64 = stars.iter().map(|&s| i64::from(s)).sum();
    let count = stars.len() as i64;
    Some(sum.div_euclid(count) as i32)
}

/// Validate a requested rating bucket.
pub fn validate_rating_bucket(bucket: i32) -> Result<(), CoreError> {
    if (MIN_RATING_BUCKET..=MAX_RATING_BUCKET).contains(&bucket) {
        Ok(())
    } else {
        Err(CoreError::invalid_field(
            "rating",
            format!("rating must be between {MIN_RATING_BUCKET} and {MAX_RATING_BUCKET}"),
        ))
    }
}
