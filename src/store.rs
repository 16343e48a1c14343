//! Write side of the drought data store.
//!
//! Every operation here is a single insert (plus at most one lookup) against
//! a caller-supplied connection, so the same functions run on a pooled
//! connection from a handler or inside the seed transaction.

use chrono::Utc;
use sqlx::{SqliteConnection, SqliteExecutor};
use tracing::debug;

use crate::error::{StoreError, StoreResult};
use crate::models::{GeoPoint, NewAlert, NewDeployment, NewMetric, NewTanker, NewVillage, RiskLevel};

// ---

/// Insert a village and return its id.
///
/// Name, state and district are required. Names are not unique.
pub async fn create_village(conn: &mut SqliteConnection, village: &NewVillage) -> StoreResult<i64> {
    // ---
    require("name", &village.name)?;
    require("state", &village.state)?;
    require("district", &village.district)?;

    let id = sqlx::query(
        r#"
        INSERT INTO villages (
            name, block, district, state, population,
            latitude, longitude, water_source, base_water_demand
        ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(village.name.trim())
    .bind(&village.block)
    .bind(village.district.trim())
    .bind(village.state.trim())
    .bind(village.population)
    .bind(village.latitude)
    .bind(village.longitude)
    .bind(&village.water_source)
    .bind(village.base_water_demand)
    .execute(&mut *conn)
    .await?
    .last_insert_rowid();

    debug!("Created village {} ({}, {})", id, village.district, village.state);
    Ok(id)
}

/// Append one observation to a village's series, classifying it on the way in.
///
/// Returns the new metric id together with the risk tier that was stored.
pub async fn append_metric(
    conn: &mut SqliteConnection,
    village_id: i64,
    metric: &NewMetric,
) -> StoreResult<(i64, RiskLevel)> {
    // ---
    let wsi = metric.water_stress_index;
    if !wsi.is_finite() || !(0.0..=100.0).contains(&wsi) {
        return Err(StoreError::Validation(format!(
            "water_stress_index must be within 0..=100, got {wsi}"
        )));
    }

    if !village_exists(&mut *conn, village_id).await? {
        return Err(StoreError::NotFound(format!("village {village_id} not found")));
    }

    let risk = RiskLevel::classify(wsi);
    let id = sqlx::query(
        r#"
        INSERT INTO drought_metrics (
            village_id, date, rainfall_deviation, groundwater_level,
            groundwater_velocity, water_stress_index, risk_level
        ) VALUES (?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(village_id)
    .bind(metric.date)
    .bind(metric.rainfall_deviation)
    .bind(metric.groundwater_level)
    .bind(metric.groundwater_velocity)
    .bind(wsi)
    .bind(risk)
    .execute(&mut *conn)
    .await
    .map_err(|e| StoreError::from_insert(e, "drought metric"))?
    .last_insert_rowid();

    debug!("Appended metric {} to village {}: WSI {:.1} -> {:?}", id, village_id, wsi, risk);
    Ok((id, risk))
}

/// Register a tanker, placing it at its assigned village.
///
/// An unknown or absent village leaves the tanker at (0, 0). A duplicate
/// registration number fails with [`StoreError::Conflict`] and writes nothing.
pub async fn register_tanker(conn: &mut SqliteConnection, tanker: &NewTanker) -> StoreResult<i64> {
    // ---
    let position = match tanker.assigned_village_id {
        Some(village_id) => village_position(&mut *conn, village_id).await?,
        None => None,
    };

    insert_tanker(conn, tanker, position.unwrap_or_default()).await
}

/// Insert a tanker at an explicit position.
pub async fn insert_tanker(
    conn: &mut SqliteConnection,
    tanker: &NewTanker,
    position: GeoPoint,
) -> StoreResult<i64> {
    // ---
    require("registration_no", &tanker.registration_no)?;
    if tanker.capacity_liters <= 0 {
        return Err(StoreError::Validation(
            "capacity_liters must be positive".to_string(),
        ));
    }

    let registration_no = tanker.registration_no.trim();
    let id = sqlx::query(
        r#"
        INSERT INTO tankers (
            registration_no, capacity_liters, assigned_state,
            assigned_district, assigned_block, assigned_village_id,
            source_point, status, current_lat, current_lng, last_updated
        ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(registration_no)
    .bind(tanker.capacity_liters)
    .bind(&tanker.assigned_state)
    .bind(&tanker.assigned_district)
    .bind(&tanker.assigned_block)
    .bind(tanker.assigned_village_id)
    .bind(&tanker.source_point)
    .bind(tanker.status)
    .bind(position.latitude)
    .bind(position.longitude)
    .bind(Utc::now())
    .execute(&mut *conn)
    .await
    .map_err(|e| StoreError::from_insert(e, &format!("tanker {registration_no}")))?
    .last_insert_rowid();

    debug!("Registered tanker {} as id {}", registration_no, id);
    Ok(id)
}

/// Raise an alert. Village and tanker references are stored as given.
pub async fn raise_alert(conn: &mut SqliteConnection, alert: &NewAlert) -> StoreResult<i64> {
    // ---
    require("message", &alert.message)?;

    let id = sqlx::query(
        r#"
        INSERT INTO alerts (alert_type, message, location_id, tanker_id, timestamp)
        VALUES (?, ?, ?, ?, ?)
        "#,
    )
    .bind(alert.kind)
    .bind(&alert.message)
    .bind(alert.village_id)
    .bind(alert.tanker_id)
    .bind(Utc::now())
    .execute(&mut *conn)
    .await?
    .last_insert_rowid();

    Ok(id)
}

/// Record a tanker trip to a village. Both must exist.
pub async fn record_deployment(
    conn: &mut SqliteConnection,
    deployment: &NewDeployment,
) -> StoreResult<i64> {
    // ---
    let id = sqlx::query(
        r#"
        INSERT INTO deployments (
            tanker_id, village_id, scheduled_date, status,
            volume_delivered, cost_estimated, fuel_consumed
        ) VALUES (?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(deployment.tanker_id)
    .bind(deployment.village_id)
    .bind(deployment.scheduled_date)
    .bind(deployment.status)
    .bind(deployment.volume_delivered)
    .bind(deployment.cost_estimated)
    .bind(deployment.fuel_consumed)
    .execute(&mut *conn)
    .await
    .map_err(|e| StoreError::from_insert(e, "deployment"))?
    .last_insert_rowid();

    Ok(id)
}

pub async fn village_count<'e>(executor: impl SqliteExecutor<'e>) -> StoreResult<i64> {
    // ---
    let count = sqlx::query_scalar("SELECT COUNT(*) FROM villages")
        .fetch_one(executor)
        .await?;
    Ok(count)
}

pub async fn village_position<'e>(
    executor: impl SqliteExecutor<'e>,
    village_id: i64,
) -> StoreResult<Option<GeoPoint>> {
    // ---
    let row: Option<(f64, f64)> =
        sqlx::query_as("SELECT latitude, longitude FROM villages WHERE id = ?")
            .bind(village_id)
            .fetch_optional(executor)
            .await?;

    Ok(row.map(|(latitude, longitude)| GeoPoint { latitude, longitude }))
}

async fn village_exists<'e>(executor: impl SqliteExecutor<'e>, village_id: i64) -> StoreResult<bool> {
    // ---
    let found: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM villages WHERE id = ?")
        .bind(village_id)
        .fetch_one(executor)
        .await?;
    Ok(found > 0)
}

fn require(field: &str, value: &str) -> StoreResult<()> {
    if value.trim().is_empty() {
        return Err(StoreError::Validation(format!("{field} is required")));
    }
    Ok(())
}
