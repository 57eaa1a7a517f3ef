//! History persistence seam
//!
//! The scan pipeline serializes its history as a JSON unit; a store
//! only moves that opaque string to and from durable storage.

use async_trait::async_trait;
use taptune_core::Result;
use tokio::sync::Mutex;

/// Durable storage for the serialized scan history
#[async_trait]
pub trait HistoryStore: Send + Sync {
    /// Load the stored history, if any
    async fn load(&self) -> Result<Option<String>>;

    /// Replace the stored history
    async fn save(&self, json: &str) -> Result<()>;

    /// Remove the stored history
    async fn clear(&self) -> Result<()>;
}

/// In-memory store for tests and ephemeral sessions
#[derive(Debug, Default)]
pub struct MemoryHistoryStore {
    value: Mutex<Option<String>>,
}

impl MemoryHistoryStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store preloaded with a serialized history
    pub fn with_value(json: impl Into<String>) -> Self {
        Self {
            value: Mutex::new(Some(json.into())),
        }
    }
}

#[async_trait]
impl HistoryStore for MemoryHistoryStore {
    async fn load(&self) -> Result<Option<String>> {
        Ok(self.value.lock().await.clone())
    }

    async fn save(&self, json: &str) -> Result<()> {
        *self.value.lock().await = Some(json.to_string());
        Ok(())
    }

    async fn clear(&self) -> Result<()> {
        *self.value.lock().await = None;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn empty_store_loads_none() {
        let store = MemoryHistoryStore::new();
        assert_eq!(store.load().await.unwrap(), None);
    }

    #[tokio::test]
    async fn save_then_load_round_trips() {
        let store = MemoryHistoryStore::new();
        store.save("[1,2,3]").await.unwrap();
        assert_eq!(store.load().await.unwrap().as_deref(), Some("[1,2,3]"));
    }

    #[tokio::test]
    async fn clear_removes_the_value() {
        let store = MemoryHistoryStore::with_value("[]");
        store.clear().await.unwrap();
        assert_eq!(store.load().await.unwrap(), None);
    }
}
