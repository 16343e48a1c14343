//! Risk and aggregation query layer behind the dashboard endpoints.
//!
//! Every read takes an optional [`RegionFilter`] and composes its predicates
//! onto a fixed base query.
//!
//! # Current metric
//!
//! A village's current metric is the row with the highest id among its
//! metrics: insertion order decides, not observation date. A late-arriving
//! backfill for an older date therefore becomes "current".
//!
//! # Critical villages
//!
//! `criticalVillages` counts Red metric rows belonging to matching villages,
//! including historical rows. A village that was Red twice counts twice.

use sqlx::{QueryBuilder, Sqlite, SqlitePool};
use tracing::debug;

use crate::error::StoreResult;
use crate::filter::{RegionColumns, RegionFilter};
use crate::models::{
    AlertView, BlockEntry, DashboardStats, DistrictEntry, LocationHierarchy, RiskLevel,
    StateEntry, Tanker, TankerStatus, UsageRow, VillageEntry, VillageView, WATER_GAP_FACTOR,
};

// ---

/// Headline counters for the dashboard cards.
pub async fn dashboard_stats(pool: &SqlitePool, filter: &RegionFilter) -> StoreResult<DashboardStats> {
    // ---
    let mut qb = QueryBuilder::<Sqlite>::new("SELECT COUNT(*) FROM villages v");
    filter.push_predicates(&mut qb, RegionColumns::VILLAGE, false);
    let total_villages = qb.build_query_scalar::<i64>().fetch_one(pool).await?;

    let mut qb = QueryBuilder::<Sqlite>::new(
        "SELECT COUNT(*) FROM drought_metrics m JOIN villages v ON v.id = m.village_id WHERE m.risk_level = ",
    );
    qb.push_bind(RiskLevel::Red);
    filter.push_predicates(&mut qb, RegionColumns::VILLAGE, true);
    let critical_villages = qb.build_query_scalar::<i64>().fetch_one(pool).await?;

    let mut qb = QueryBuilder::<Sqlite>::new("SELECT COUNT(*) FROM tankers t WHERE t.status = ");
    qb.push_bind(TankerStatus::InTransit);
    filter.push_predicates(&mut qb, RegionColumns::TANKER, true);
    let active_tankers = qb.build_query_scalar::<i64>().fetch_one(pool).await?;

    let mut qb = QueryBuilder::<Sqlite>::new("SELECT SUM(v.base_water_demand) FROM villages v");
    filter.push_predicates(&mut qb, RegionColumns::VILLAGE, false);
    let demand = qb.build_query_scalar::<Option<i64>>().fetch_one(pool).await?;

    let stats = DashboardStats {
        total_villages,
        critical_villages,
        active_tankers,
        water_gap_liters: water_gap(demand.unwrap_or(0)),
    };
    debug!("Dashboard stats for {:?}: {:?}", filter, stats);
    Ok(stats)
}

/// Shortfall estimate for a total daily demand.
pub fn water_gap(base_water_demand: i64) -> f64 {
    base_water_demand as f64 * WATER_GAP_FACTOR
}

/// One row per village that has at least one metric, joined to its current metric.
pub async fn villages_with_metrics(
    pool: &SqlitePool,
    filter: &RegionFilter,
) -> StoreResult<Vec<VillageView>> {
    // ---
    let mut qb = QueryBuilder::<Sqlite>::new(
        r#"
        SELECT v.id, v.name, v.block, v.district, v.state, v.population,
               v.latitude, v.longitude, v.water_source, v.base_water_demand,
               m.risk_level, m.water_stress_index, m.rainfall_deviation, m.groundwater_level
        FROM villages v
        JOIN drought_metrics m ON v.id = m.village_id
        WHERE m.id IN (SELECT MAX(id) FROM drought_metrics GROUP BY village_id)
        "#,
    );
    filter.push_predicates(&mut qb, RegionColumns::VILLAGE, true);
    qb.push(" ORDER BY v.id");

    let rows = qb.build_query_as::<VillageView>().fetch_all(pool).await?;
    debug!("villages_with_metrics returned {} rows", rows.len());
    Ok(rows)
}

/// Fleet listing filtered by assignment state/district.
pub async fn tanker_list(pool: &SqlitePool, filter: &RegionFilter) -> StoreResult<Vec<Tanker>> {
    // ---
    let mut qb = QueryBuilder::<Sqlite>::new(
        r#"
        SELECT t.id, t.registration_no, t.capacity_liters, t.current_load_percentage,
               t.assigned_state, t.assigned_district, t.assigned_block, t.assigned_village_id,
               t.source_point, t.status, t.current_lat, t.current_lng, t.last_updated
        FROM tankers t
        "#,
    );
    filter.push_predicates(&mut qb, RegionColumns::TANKER, false);
    qb.push(" ORDER BY t.id");

    let rows = qb.build_query_as::<Tanker>().fetch_all(pool).await?;
    Ok(rows)
}

/// Alerts joined with village and tanker labels, newest first.
///
/// The filter applies to the alert's village, so a filtered listing drops
/// alerts that carry no village.
pub async fn alert_list(pool: &SqlitePool, filter: &RegionFilter) -> StoreResult<Vec<AlertView>> {
    // ---
    let mut qb = QueryBuilder::<Sqlite>::new(
        r#"
        SELECT a.id, a.alert_type AS kind, a.message, a.location_id, a.tanker_id,
               a.timestamp, a.status,
               v.name AS village_name, v.district, t.registration_no AS tanker_no
        FROM alerts a
        LEFT JOIN villages v ON a.location_id = v.id
        LEFT JOIN tankers t ON a.tanker_id = t.id
        "#,
    );
    filter.push_predicates(&mut qb, RegionColumns::VILLAGE, false);
    qb.push(" ORDER BY a.timestamp DESC, a.id DESC");

    let rows = qb.build_query_as::<AlertView>().fetch_all(pool).await?;
    Ok(rows)
}

/// Delivery totals per tanker. Tankers without deployments are not listed.
pub async fn usage_report(pool: &SqlitePool, filter: &RegionFilter) -> StoreResult<Vec<UsageRow>> {
    // ---
    let mut qb = QueryBuilder::<Sqlite>::new(
        r#"
        SELECT t.registration_no,
               SUM(d.volume_delivered) AS total_volume,
               COUNT(d.id)             AS trips,
               SUM(d.fuel_consumed)    AS total_fuel
        FROM tankers t
        JOIN deployments d ON t.id = d.tanker_id
        "#,
    );
    filter.push_predicates(&mut qb, RegionColumns::TANKER, false);
    qb.push(" GROUP BY t.id ORDER BY t.id");

    let rows = qb.build_query_as::<UsageRow>().fetch_all(pool).await?;
    Ok(rows)
}

/// Unfiltered administrative tree for the location pickers.
pub async fn location_hierarchy(pool: &SqlitePool) -> StoreResult<LocationHierarchy> {
    // ---
    let states = sqlx::query_as::<_, StateEntry>("SELECT DISTINCT state FROM villages ORDER BY state")
        .fetch_all(pool)
        .await?;

    let districts = sqlx::query_as::<_, DistrictEntry>(
        "SELECT DISTINCT state, district FROM villages ORDER BY state, district",
    )
    .fetch_all(pool)
    .await?;

    let blocks = sqlx::query_as::<_, BlockEntry>(
        "SELECT DISTINCT district, block FROM villages ORDER BY district, block",
    )
    .fetch_all(pool)
    .await?;

    let villages = sqlx::query_as::<_, VillageEntry>(
        "SELECT id, name, block, district, state FROM villages ORDER BY id",
    )
    .fetch_all(pool)
    .await?;

    Ok(LocationHierarchy {
        states,
        districts,
        blocks,
        villages,
    })
}
