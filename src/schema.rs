//! Database schema management for `drought-dashboard`.
//!
//! Ensures required tables and indexes exist before serving requests.
//! Applied once on startup from `main.rs` (EMBP: single gateway call).

use anyhow::Result;
use sqlx::SqlitePool;

// ---

/// Create or update the database schema (idempotent).
///
/// Metrics and deployments carry enforced foreign keys. Tanker assignment and
/// alert references are plain nullable ids: a tanker may name a village that
/// does not exist, and alerts are never checked at creation time.
///
/// Errors are propagated if any SQL execution fails.
pub async fn create_schema(pool: &SqlitePool) -> Result<()> {
    // ---
    let mut tx = pool.begin().await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS villages (
            id                INTEGER PRIMARY KEY AUTOINCREMENT,
            name              TEXT    NOT NULL,
            block             TEXT,
            district          TEXT    NOT NULL,
            state             TEXT    NOT NULL,
            population        INTEGER NOT NULL DEFAULT 0,
            latitude          REAL    NOT NULL,
            longitude         REAL    NOT NULL,
            water_source      TEXT,
            base_water_demand INTEGER NOT NULL DEFAULT 0
        );
        "#,
    )
    .execute(&mut *tx)
    .await?;

    // Append-only time series; the highest id per village is its current row
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS drought_metrics (
            id                   INTEGER PRIMARY KEY AUTOINCREMENT,
            village_id           INTEGER NOT NULL REFERENCES villages(id),
            date                 TEXT    NOT NULL,
            rainfall_deviation   REAL    NOT NULL,
            groundwater_level    REAL    NOT NULL,
            groundwater_velocity REAL    NOT NULL,
            water_stress_index   REAL    NOT NULL,
            risk_level           TEXT    NOT NULL
        );
        "#,
    )
    .execute(&mut *tx)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS tankers (
            id                      INTEGER PRIMARY KEY AUTOINCREMENT,
            registration_no         TEXT    NOT NULL UNIQUE,
            capacity_liters         INTEGER NOT NULL,
            current_load_percentage INTEGER NOT NULL DEFAULT 100,
            assigned_state          TEXT,
            assigned_district       TEXT,
            assigned_block          TEXT,
            assigned_village_id     INTEGER,
            source_point            TEXT,
            status                  TEXT    NOT NULL DEFAULT 'Available',
            current_lat             REAL    NOT NULL DEFAULT 0,
            current_lng             REAL    NOT NULL DEFAULT 0,
            last_updated            TEXT    NOT NULL
        );
        "#,
    )
    .execute(&mut *tx)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS alerts (
            id          INTEGER PRIMARY KEY AUTOINCREMENT,
            alert_type  TEXT    NOT NULL,
            message     TEXT    NOT NULL,
            location_id INTEGER,
            tanker_id   INTEGER,
            timestamp   TEXT    NOT NULL,
            status      TEXT    NOT NULL DEFAULT 'Active'
        );
        "#,
    )
    .execute(&mut *tx)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS deployments (
            id               INTEGER PRIMARY KEY AUTOINCREMENT,
            tanker_id        INTEGER NOT NULL REFERENCES tankers(id),
            village_id       INTEGER NOT NULL REFERENCES villages(id),
            scheduled_date   TEXT    NOT NULL,
            status           TEXT    NOT NULL,
            volume_delivered INTEGER NOT NULL,
            cost_estimated   REAL    NOT NULL,
            fuel_consumed    REAL    NOT NULL
        );
        "#,
    )
    .execute(&mut *tx)
    .await?;

    // Basic indexes for the filtered dashboard reads
    sqlx::query(
        r#"
        CREATE INDEX IF NOT EXISTS idx_villages_state_district
            ON villages (state, district);
        "#,
    )
    .execute(&mut *tx)
    .await?;

    sqlx::query(
        r#"
        CREATE INDEX IF NOT EXISTS idx_drought_metrics_village_id
            ON drought_metrics (village_id);
        "#,
    )
    .execute(&mut *tx)
    .await?;

    sqlx::query(
        r#"
        CREATE INDEX IF NOT EXISTS idx_deployments_tanker_id
            ON deployments (tanker_id);
        "#,
    )
    .execute(&mut *tx)
    .await?;

    tx.commit().await?;
    Ok(())
}
