//! Durable scan history
//!
//! Implements the scan pipeline's [`HistoryStore`] seam on the key/value
//! table. The history arrives already serialized; this store never parses
//! it, so a corrupt payload is the pipeline's call to handle.

use async_trait::async_trait;
use sqlx::SqlitePool;
use taptune_scan::HistoryStore;

use crate::kv;

/// Key/value entry holding the serialized scan history
pub const KEY_SCAN_HISTORY: &str = "scan.history";

/// `SQLite`-backed history store
#[derive(Debug, Clone)]
pub struct SqliteHistoryStore {
    pool: SqlitePool,
}

impl SqliteHistoryStore {
    /// Create a store on an open pool
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl HistoryStore for SqliteHistoryStore {
    async fn load(&self) -> taptune_core::Result<Option<String>> {
        Ok(kv::get_raw(&self.pool, KEY_SCAN_HISTORY).await?)
    }

    async fn save(&self, json: &str) -> taptune_core::Result<()> {
        Ok(kv::set_raw(&self.pool, KEY_SCAN_HISTORY, json).await?)
    }

    async fn clear(&self) -> taptune_core::Result<()> {
        kv::delete(&self.pool, KEY_SCAN_HISTORY).await?;
        Ok(())
    }
}
