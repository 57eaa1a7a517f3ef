use taptune_storage::{create_pool, kv, run_migrations, StorageError};

async fn memory_pool() -> sqlx::SqlitePool {
    let pool = create_pool("sqlite::memory:").await.unwrap();
    run_migrations(&pool).await.unwrap();
    pool
}

#[tokio::test]
async fn test_set_and_get_value() {
    let pool = memory_pool().await;

    let value = serde_json::json!({"volume": 75, "muted": false});
    kv::set_value(&pool, "audio.state", &value).await.unwrap();

    let result = kv::get_value(&pool, "audio.state").await.unwrap();
    assert_eq!(result, Some(value));
}

#[tokio::test]
async fn test_get_missing_key_is_none() {
    let pool = memory_pool().await;

    let result = kv::get_value(&pool, "never.set").await.unwrap();
    assert_eq!(result, None);
    assert_eq!(kv::get_raw(&pool, "never.set").await.unwrap(), None);
}

#[tokio::test]
async fn test_set_replaces_existing_value() {
    let pool = memory_pool().await;

    kv::set_value(&pool, "ui.theme", &serde_json::json!("light"))
        .await
        .unwrap();
    kv::set_value(&pool, "ui.theme", &serde_json::json!("dark"))
        .await
        .unwrap();

    let result = kv::get_value(&pool, "ui.theme").await.unwrap();
    assert_eq!(result, Some(serde_json::json!("dark")));
}

#[tokio::test]
async fn test_delete_reports_whether_a_row_existed() {
    let pool = memory_pool().await;

    kv::set_value(&pool, "gone.soon", &serde_json::json!(1))
        .await
        .unwrap();

    assert!(kv::delete(&pool, "gone.soon").await.unwrap());
    assert_eq!(kv::get_value(&pool, "gone.soon").await.unwrap(), None);
    assert!(!kv::delete(&pool, "gone.soon").await.unwrap());
}

#[tokio::test]
async fn test_raw_and_typed_accessors_share_the_row() {
    let pool = memory_pool().await;

    kv::set_raw(&pool, "shared", "[1,2,3]").await.unwrap();

    assert_eq!(
        kv::get_value(&pool, "shared").await.unwrap(),
        Some(serde_json::json!([1, 2, 3]))
    );
    assert_eq!(
        kv::get_raw(&pool, "shared").await.unwrap().as_deref(),
        Some("[1,2,3]")
    );
}

#[tokio::test]
async fn test_non_json_text_fails_typed_reads_only() {
    let pool = memory_pool().await;

    kv::set_raw(&pool, "opaque", "not json at all").await.unwrap();

    // Raw reads pass the text through untouched
    assert_eq!(
        kv::get_raw(&pool, "opaque").await.unwrap().as_deref(),
        Some("not json at all")
    );

    let err = kv::get_value(&pool, "opaque").await.unwrap_err();
    assert!(matches!(err, StorageError::Serialization(_)));
}
