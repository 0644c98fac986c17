//! Integration tests for the per-(product, user) rating upsert.

use sqlx::PgPool;
use storefront_db::models::product::CreateProduct;
use storefront_db::repositories::{ProductRepo, RatingRepo};

async fn seed_product(pool: &PgPool) -> i64 {
    let input = CreateProduct {
        title: "Headphones".to_string(),
        description: String::new(),
        price: 59.0,
        quantity: 3,
        shipping: true,
        color: Some("Black".to_string()),
        brand: Some("Acme".to_string()),
        category_id: None,
        subcategory_ids: Vec::new(),
        images: Vec::new(),
    };
    ProductRepo::create(pool, &input).await.unwrap().id
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_second_rating_replaces_first(pool: PgPool) {
    let product_id = seed_product(&pool).await;

    let first = RatingRepo::upsert(&pool, product_id, 11, 3).await.unwrap();
    let second = RatingRepo::upsert(&pool, product_id, 11, 5).await.unwrap();

    assert_eq!(first.id, second.id);
    let ratings = RatingRepo::list_for_product(&pool, product_id).await.unwrap();
    assert_eq!(ratings.len(), 1);
    assert_eq!(ratings[0].star, 5);
    assert_eq!(ratings[0].rated_by, 11);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_ratings_from_different_users_accumulate(pool: PgPool) {
    let product_id = seed_product(&pool).await;

    RatingRepo::upsert(&pool, product_id, 1, 4).await.unwrap();
    RatingRepo::upsert(&pool, product_id, 2, 5).await.unwrap();

    let product = ProductRepo::find_by_id(&pool, product_id).await.unwrap().unwrap();
    assert_eq!(product.ratings.len(), 2);
    assert_eq!(product.ratings[0].posted_by, 1);
    assert_eq!(product.floor_average(), Some(4));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_concurrent_upserts_leave_one_entry(pool: PgPool) {
    let product_id = seed_product(&pool).await;

    let mut handles = Vec::new();
    for star in 1..=5i16 {
        let pool = pool.clone();
        handles.push(tokio::spawn(async move {
            RatingRepo::upsert(&pool, product_id, 42, star).await
        }));
    }
    for handle in handles {
        handle.await.unwrap().unwrap();
    }

    let ratings = RatingRepo::list_for_product(&pool, product_id).await.unwrap();
    assert_eq!(ratings.len(), 1);
    assert!((1..=5).contains(&ratings[0].star));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_star_outside_range_is_rejected_by_schema(pool: PgPool) {
    let product_id = seed_product(&pool).await;
    let err = RatingRepo::upsert(&pool, product_id, 1, 9).await.unwrap_err();
    assert!(matches!(err, sqlx::Error::Database(_)));
}
