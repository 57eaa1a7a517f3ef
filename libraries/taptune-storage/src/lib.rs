//! TapTune Storage
//!
//! `SQLite` persistence layer for TapTune.
//!
//! Scan history and app preferences live in a single key/value table with
//! JSON-serialized values, so adding a key never needs a schema migration.
//! The scan pipeline plugs in through [`SqliteHistoryStore`].
//!
//! # Example
//!
//! ```rust,no_run
//! use taptune_storage::{create_pool, run_migrations, SqliteHistoryStore};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! // Create database connection
//! let pool = create_pool("sqlite://taptune.db").await?;
//! run_migrations(&pool).await?;
//!
//! // Durable history for the scan service
//! let store = SqliteHistoryStore::new(pool.clone());
//!
//! // Preferences live in the same table
//! let keep_awake = taptune_storage::preferences::keep_awake(&pool).await?;
//! # Ok(())
//! # }
//! ```

mod error;
mod history;

pub mod kv;
pub mod preferences;

pub use error::StorageError;
pub use history::{SqliteHistoryStore, KEY_SCAN_HISTORY};

use sqlx::migrate::Migrator;
use sqlx::sqlite::SqlitePool;
use tracing::debug;

// Embed migrations into binary
static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

/// Run database migrations
///
/// This should be called once when the application starts to ensure
/// the database schema is up to date.
///
/// # Errors
///
/// Returns an error if migrations fail to run
pub async fn run_migrations(pool: &SqlitePool) -> Result<(), sqlx::migrate::MigrateError> {
    MIGRATOR.run(pool).await
}

/// Create a new `SQLite` pool
///
/// # Arguments
///
/// * `database_url` - `SQLite` connection string (e.g., `<sqlite://taptune.db>`)
///
/// # Errors
///
/// Returns an error if the connection fails
pub async fn create_pool(database_url: &str) -> Result<SqlitePool, sqlx::Error> {
    use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
    use std::str::FromStr;

    // Parse the URL into options so we can configure SQLite behavior
    let options = SqliteConnectOptions::from_str(database_url)?
        .create_if_missing(true) // Create database file if it doesn't exist
        .journal_mode(SqliteJournalMode::Wal) // Use WAL mode for better concurrency
        .busy_timeout(std::time::Duration::from_secs(30)); // Wait up to 30s for locks

    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect_with(options)
        .await?;

    debug!(database_url, "database pool ready");
    Ok(pool)
}
