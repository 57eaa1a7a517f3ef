use taptune_storage::{create_pool, kv, preferences, run_migrations};

async fn memory_pool() -> sqlx::SqlitePool {
    let pool = create_pool("sqlite::memory:").await.unwrap();
    run_migrations(&pool).await.unwrap();
    pool
}

#[tokio::test]
async fn test_keep_awake_defaults_to_true() {
    let pool = memory_pool().await;
    assert!(preferences::keep_awake(&pool).await.unwrap());
}

#[tokio::test]
async fn test_set_keep_awake_round_trips() {
    let pool = memory_pool().await;

    preferences::set_keep_awake(&pool, false).await.unwrap();
    assert!(!preferences::keep_awake(&pool).await.unwrap());

    preferences::set_keep_awake(&pool, true).await.unwrap();
    assert!(preferences::keep_awake(&pool).await.unwrap());
}

#[tokio::test]
async fn test_malformed_stored_value_falls_back_to_default() {
    let pool = memory_pool().await;

    kv::set_raw(&pool, preferences::KEY_KEEP_AWAKE, "wide awake")
        .await
        .unwrap();

    assert!(preferences::keep_awake(&pool).await.unwrap());
}
