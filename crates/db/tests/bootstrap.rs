use sqlx::PgPool;

/// Connect, migrate, verify the catalog tables exist.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_full_bootstrap(pool: PgPool) {
    storefront_db::health_check(&pool).await.unwrap();

    for table in ["categories", "subcategories", "products", "product_ratings"] {
        let count: (i64,) = sqlx::query_as(&format!("SELECT COUNT(*) FROM {table}"))
            .fetch_one(&pool)
            .await
            .unwrap_or_else(|e| panic!("{table} query failed: {e}"));
        assert_eq!(count.0, 0, "{table} should start empty");
    }
}

/// The updated_at trigger fires on product updates.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_updated_at_trigger(pool: PgPool) {
    let id: i64 = sqlx::query_scalar(
        "INSERT INTO products (title, slug, price) VALUES ('Kettle', 'kettle', 20) RETURNING id",
    )
    .fetch_one(&pool)
    .await
    .unwrap();

    sqlx::query("UPDATE products SET created_at = NOW() - INTERVAL '1 day', updated_at = NOW() - INTERVAL '1 day' WHERE id = $1")
        .bind(id)
        .execute(&pool)
        .await
        .unwrap();
    sqlx::query("UPDATE products SET quantity = 3 WHERE id = $1")
        .bind(id)
        .execute(&pool)
        .await
        .unwrap();

    let (created, updated): (chrono::DateTime<chrono::Utc>, chrono::DateTime<chrono::Utc>) =
        sqlx::query_as("SELECT created_at, updated_at FROM products WHERE id = $1")
            .bind(id)
            .fetch_one(&pool)
            .await
            .unwrap();
    assert!(updated > created);
}
