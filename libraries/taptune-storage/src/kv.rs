//! Key/value persistence
//!
//! All durable app state goes through this table: values are stored as
//! JSON text under string keys, with an upsert on write. The raw accessors
//! move pre-serialized text without touching it, which is what the scan
//! history uses; the typed accessors add the JSON round trip.
//!
//! # Example
//!
//! ```rust,no_run
//! use taptune_storage::kv;
//! # async fn example(pool: &sqlx::SqlitePool) -> Result<(), Box<dyn std::error::Error>> {
//! // Store a preference
//! kv::set_value(pool, "screen.keep_awake", &serde_json::json!(false)).await?;
//!
//! // Read it back
//! let value = kv::get_value(pool, "screen.keep_awake").await?;
//! # Ok(())
//! # }
//! ```

use sqlx::{Row, SqlitePool};

use crate::error::{Result, StorageError};

/// Get the raw stored text for a key
///
/// # Arguments
///
/// * `pool` - Database connection pool
/// * `key` - Entry key
///
/// # Returns
///
/// Returns `Ok(Some(text))` if the key exists, `Ok(None)` if not found
///
/// # Errors
///
/// Returns an error if the database query fails
pub async fn get_raw(pool: &SqlitePool, key: &str) -> Result<Option<String>> {
    let row = sqlx::query("SELECT value FROM kv_store WHERE key = ?")
        .bind(key)
        .fetch_optional(pool)
        .await?;

    Ok(row.map(|row| row.get::<String, _>("value")))
}

/// Store raw text under a key, replacing any previous value
///
/// # Arguments
///
/// * `pool` - Database connection pool
/// * `key` - Entry key
/// * `value` - Pre-serialized text to store
///
/// # Errors
///
/// Returns an error if the database query fails
pub async fn set_raw(pool: &SqlitePool, key: &str, value: &str) -> Result<()> {
    let now = chrono::Utc::now().timestamp();

    sqlx::query(
        "INSERT INTO kv_store (key, value, updated_at)
         VALUES (?, ?, ?)
         ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at",
    )
    .bind(key)
    .bind(value)
    .bind(now)
    .execute(pool)
    .await?;

    Ok(())
}

/// Get a value for a key, deserialized from its stored JSON
///
/// # Arguments
///
/// * `pool` - Database connection pool
/// * `key` - Entry key
///
/// # Returns
///
/// Returns `Ok(Some(value))` if the key exists, `Ok(None)` if not found
///
/// # Errors
///
/// Returns an error if the database query fails or JSON deserialization fails
pub async fn get_value(pool: &SqlitePool, key: &str) -> Result<Option<serde_json::Value>> {
    match get_raw(pool, key).await? {
        Some(text) => {
            let value: serde_json::Value = serde_json::from_str(&text)
                .map_err(|e| StorageError::Serialization(e.to_string()))?;
            Ok(Some(value))
        }
        None => Ok(None),
    }
}

/// Set a value for a key
///
/// # Arguments
///
/// * `pool` - Database connection pool
/// * `key` - Entry key
/// * `value` - Value (will be JSON-serialized)
///
/// # Errors
///
/// Returns an error if the database query fails or JSON serialization fails
pub async fn set_value(pool: &SqlitePool, key: &str, value: &serde_json::Value) -> Result<()> {
    let text = serde_json::to_string(value)
        .map_err(|e| StorageError::Serialization(e.to_string()))?;
    set_raw(pool, key, &text).await
}

/// Delete a key
///
/// # Arguments
///
/// * `pool` - Database connection pool
/// * `key` - Entry key
///
/// # Returns
///
/// Returns `Ok(true)` if an entry was deleted, `Ok(false)` if no entry was found
///
/// # Errors
///
/// Returns an error if the database query fails
pub async fn delete(pool: &SqlitePool, key: &str) -> Result<bool> {
    let result = sqlx::query("DELETE FROM kv_store WHERE key = ?")
        .bind(key)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}
