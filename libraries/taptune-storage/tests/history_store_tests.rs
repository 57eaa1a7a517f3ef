use taptune_core::{ContentDescriptor, ScanRecord};
use taptune_scan::{HistoryStore, ScanHistory};
use taptune_storage::{create_pool, run_migrations, SqliteHistoryStore};

async fn memory_store() -> SqliteHistoryStore {
    let pool = create_pool("sqlite::memory:").await.unwrap();
    run_migrations(&pool).await.unwrap();
    SqliteHistoryStore::new(pool)
}

#[tokio::test]
async fn test_load_from_fresh_database_is_none() {
    let store = memory_store().await;
    assert_eq!(store.load().await.unwrap(), None);
}

#[tokio::test]
async fn test_save_load_clear_round_trip() {
    let store = memory_store().await;

    store.save("[\"first\"]").await.unwrap();
    assert_eq!(store.load().await.unwrap().as_deref(), Some("[\"first\"]"));

    // Saves replace, not append
    store.save("[\"second\"]").await.unwrap();
    assert_eq!(store.load().await.unwrap().as_deref(), Some("[\"second\"]"));

    store.clear().await.unwrap();
    assert_eq!(store.load().await.unwrap(), None);

    // Clearing an already-empty store is fine
    store.clear().await.unwrap();
}

#[tokio::test]
async fn test_full_history_round_trips_through_sqlite() {
    let store = memory_store().await;

    let mut history = ScanHistory::new(10);
    history.record(ScanRecord::new(ContentDescriptor::local(
        "jazz",
        "Blue in Green",
        "/a.mp3",
    )));

    let json = history.to_json().unwrap();
    store.save(&json).await.unwrap();

    let loaded = store.load().await.unwrap().unwrap();
    let restored = ScanHistory::from_json(&loaded, 10).unwrap();

    assert_eq!(restored.len(), 1);
    assert_eq!(
        restored.latest().map(|r| r.descriptor.id.as_str()),
        Some("jazz")
    );
}

#[tokio::test]
async fn test_history_survives_reopening_the_database() {
    let dir = tempfile::tempdir().unwrap();
    let url = format!("sqlite://{}", dir.path().join("taptune.db").display());

    {
        let pool = create_pool(&url).await.unwrap();
        run_migrations(&pool).await.unwrap();
        let store = SqliteHistoryStore::new(pool.clone());
        store.save("[\"persisted\"]").await.unwrap();
        pool.close().await;
    }

    let pool = create_pool(&url).await.unwrap();
    run_migrations(&pool).await.unwrap();
    let store = SqliteHistoryStore::new(pool);
    assert_eq!(
        store.load().await.unwrap().as_deref(),
        Some("[\"persisted\"]")
    );
}
