use sqlx::PgPool;

/// Connect, migrate, and verify both tables exist.
#[sqlx::test(migrations = "./migrations")]
async fn test_full_bootstrap(pool: PgPool) {
    carbase_db::health_check(&pool).await.unwrap();

    for table in ["users", "cars"] {
        let count: (i64,) = sqlx::query_as(&format!("SELECT COUNT(*) FROM {table}"))
            .fetch_one(&pool)
            .await
            .unwrap_or_else(|e| panic!("{table} query failed: {e}"));
        assert_eq!(count.0, 0, "{table} should start empty");
    }
}

/// The identity index must exist under the name the store matches on.
#[sqlx::test(migrations = "./migrations")]
async fn test_identity_index_present(pool: PgPool) {
    let row: (String,) = sqlx::query_as(
        "SELECT indexname::text FROM pg_indexes WHERE tablename = 'cars' AND indexname = $1",
    )
    .bind(carbase_db::store::CAR_IDENTITY_CONSTRAINT)
    .fetch_one(&pool)
    .await
    .unwrap();
    assert_eq!(row.0, "uq_cars_identity");
}
