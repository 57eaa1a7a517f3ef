//! App preference storage
//!
//! Thin typed wrappers over the key/value table. Missing or malformed
//! values fall back to the preference's default rather than erroring;
//! only database failures surface.

use sqlx::SqlitePool;

use crate::error::{Result, StorageError};
use crate::kv;

/// Keep the screen awake while scanning (default: true)
pub const KEY_KEEP_AWAKE: &str = "screen.keep_awake";

/// Whether the screen should stay awake while scanning
///
/// # Errors
///
/// Returns an error if the database query fails
pub async fn keep_awake(pool: &SqlitePool) -> Result<bool> {
    match kv::get_value(pool, KEY_KEEP_AWAKE).await {
        Ok(Some(value)) => Ok(value.as_bool().unwrap_or(true)),
        Ok(None) => Ok(true),
        Err(StorageError::Serialization(_)) => Ok(true),
        Err(err) => Err(err),
    }
}

/// Set the keep-awake preference
///
/// # Errors
///
/// Returns an error if the database query fails
pub async fn set_keep_awake(pool: &SqlitePool, enabled: bool) -> Result<()> {
    kv::set_value(pool, KEY_KEEP_AWAKE, &serde_json::json!(enabled)).await
}
