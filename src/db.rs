//! Connection pool setup.
//!
//! The pool is created once at startup and handed to every consumer
//! explicitly. Foreign-key enforcement is switched on per connection.

use std::str::FromStr;

use anyhow::{anyhow, Result};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;

use crate::{schema, Config};

// ---

/// Open the file-backed pool described by `cfg`, creating the database if needed.
pub async fn connect(cfg: &Config) -> Result<SqlitePool> {
    // ---
    let options = SqliteConnectOptions::from_str(&cfg.db_url)
        .map_err(|e| anyhow!("Invalid DATABASE_URL '{}': {}", cfg.db_url, e))?
        .create_if_missing(true)
        .foreign_keys(true);

    let pool = SqlitePoolOptions::new()
        .max_connections(cfg.db_pool_max)
        .connect_with(options)
        .await
        .map_err(|e| anyhow!("Failed to connect to database '{}': {}", cfg.db_url, e))?;

    Ok(pool)
}

/// Open a private in-memory store with the schema applied.
///
/// Every SQLite memory connection is its own database, so the pool is pinned
/// to one connection that is never recycled.
pub async fn connect_in_memory() -> Result<SqlitePool> {
    // ---
    let options = SqliteConnectOptions::from_str("sqlite::memory:")?.foreign_keys(true);

    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .min_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect_with(options)
        .await?;

    schema::create_schema(&pool).await?;
    Ok(pool)
}
