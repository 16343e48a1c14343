//! Data models for villages, drought metrics, tankers, alerts and deployments.
//!
//! Input types (`New*`) are what callers hand to the store; row types are
//! what the query layer reads back and the HTTP layer serializes verbatim.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

// ---

/// WSI above this value is classified [`RiskLevel::Red`].
pub const RED_WSI_THRESHOLD: f64 = 70.0;

/// WSI above this value (and at or below the red threshold) is [`RiskLevel::Orange`].
pub const ORANGE_WSI_THRESHOLD: f64 = 40.0;

/// Share of base water demand treated as the unmet shortfall on the dashboard.
pub const WATER_GAP_FACTOR: f64 = 0.4;

/// Drought risk tier derived from the water stress index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
pub enum RiskLevel {
    Green,
    Orange,
    Red,
}

impl RiskLevel {
    // ---
    /// Classify a water stress index. Pure and stateless: the same WSI
    /// always yields the same tier.
    pub fn classify(wsi: f64) -> Self {
        if wsi > RED_WSI_THRESHOLD {
            Self::Red
        } else if wsi > ORANGE_WSI_THRESHOLD {
            Self::Orange
        } else {
            Self::Green
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, sqlx::Type)]
pub enum TankerStatus {
    #[default]
    Available,
    #[serde(rename = "In Transit")]
    #[sqlx(rename = "In Transit")]
    InTransit,
    Delivering,
    Maintenance,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
pub enum AlertKind {
    Critical,
    Warning,
    Info,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
pub enum DeploymentStatus {
    Pending,
    Delivered,
    Cancelled,
}

/// Latitude/longitude pair. Defaults to (0, 0) for unresolved locations.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct GeoPoint {
    pub latitude: f64,
    pub longitude: f64,
}

// --- inputs

/// Attributes for provisioning a village.
#[derive(Debug, Clone, Deserialize)]
pub struct NewVillage {
    // ---
    pub name: String,
    #[serde(default)]
    pub block: Option<String>,
    #[serde(default)]
    pub district: String,
    #[serde(default)]
    pub state: String,
    #[serde(default)]
    pub population: i64,
    pub latitude: f64,
    pub longitude: f64,
    #[serde(default)]
    pub water_source: Option<String>,
    #[serde(default)]
    pub base_water_demand: i64,
}

/// One observation appended to a village's drought time series.
///
/// The risk tier is not supplied; it is derived from `water_stress_index`
/// at write time.
#[derive(Debug, Clone, Deserialize)]
pub struct NewMetric {
    // ---
    pub date: NaiveDate,
    pub rainfall_deviation: f64,
    pub groundwater_level: f64,
    #[serde(default)]
    pub groundwater_velocity: f64,
    pub water_stress_index: f64,
}

/// Tanker registration request, matching the `POST /api/tankers` body.
#[derive(Debug, Clone, Deserialize)]
pub struct NewTanker {
    // ---
    #[serde(default)]
    pub registration_no: String,
    pub capacity_liters: i64,
    #[serde(default)]
    pub assigned_state: Option<String>,
    #[serde(default)]
    pub assigned_district: Option<String>,
    #[serde(default)]
    pub assigned_block: Option<String>,
    #[serde(default)]
    pub assigned_village_id: Option<i64>,
    #[serde(default)]
    pub source_point: Option<String>,
    #[serde(default)]
    pub status: TankerStatus,
}

#[derive(Debug, Clone)]
pub struct NewAlert {
    pub kind: AlertKind,
    pub message: String,
    pub village_id: Option<i64>,
    pub tanker_id: Option<i64>,
}

#[derive(Debug, Clone)]
pub struct NewDeployment {
    // ---
    pub tanker_id: i64,
    pub village_id: i64,
    pub scheduled_date: NaiveDate,
    pub status: DeploymentStatus,
    pub volume_delivered: i64,
    pub cost_estimated: f64,
    pub fuel_consumed: f64,
}

// --- rows

/// A village joined with its current drought metric.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct VillageView {
    // ---
    pub id: i64,
    pub name: String,
    pub block: Option<String>,
    pub district: String,
    pub state: String,
    pub population: i64,
    pub latitude: f64,
    pub longitude: f64,
    pub water_source: Option<String>,
    pub base_water_demand: i64,
    pub risk_level: RiskLevel,
    pub water_stress_index: f64,
    pub rainfall_deviation: f64,
    pub groundwater_level: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Tanker {
    // ---
    pub id: i64,
    pub registration_no: String,
    pub capacity_liters: i64,
    pub current_load_percentage: i64,
    pub assigned_state: Option<String>,
    pub assigned_district: Option<String>,
    pub assigned_block: Option<String>,
    pub assigned_village_id: Option<i64>,
    pub source_point: Option<String>,
    pub status: TankerStatus,
    pub current_lat: f64,
    pub current_lng: f64,
    pub last_updated: DateTime<Utc>,
}

/// An alert joined with its village and tanker labels, when present.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct AlertView {
    // ---
    pub id: i64,
    #[serde(rename = "type")]
    pub kind: AlertKind,
    pub message: String,
    pub location_id: Option<i64>,
    pub tanker_id: Option<i64>,
    pub timestamp: DateTime<Utc>,
    pub status: String,
    pub village_name: Option<String>,
    pub district: Option<String>,
    pub tanker_no: Option<String>,
}

/// Per-tanker delivery totals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct UsageRow {
    pub registration_no: String,
    pub total_volume: i64,
    pub trips: i64,
    pub total_fuel: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub total_villages: i64,
    pub critical_villages: i64,
    pub active_tankers: i64,
    pub water_gap_liters: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct StateEntry {
    pub state: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct DistrictEntry {
    pub state: String,
    pub district: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct BlockEntry {
    pub district: String,
    pub block: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct VillageEntry {
    pub id: i64,
    pub name: String,
    pub block: Option<String>,
    pub district: String,
    pub state: String,
}

/// Full administrative tree used to populate the location pickers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocationHierarchy {
    pub states: Vec<StateEntry>,
    pub districts: Vec<DistrictEntry>,
    pub blocks: Vec<BlockEntry>,
    pub villages: Vec<VillageEntry>,
}
