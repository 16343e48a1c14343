//! First-boot synthetic data for an empty store.
//!
//! The administrative shape is fixed: every listed district gets exactly
//! three villages, each with one classified metric row. Per-village values
//! are drawn from the supplied RNG, so a seeded `ChaCha8Rng` reproduces a run
//! while production draws from entropy.

use std::collections::HashMap;

use anyhow::{Context, Result};
use chrono::Utc;
use rand::Rng;
use sqlx::SqlitePool;
use tracing::info;

use crate::models::{
    AlertKind, DeploymentStatus, GeoPoint, NewAlert, NewDeployment, NewMetric, NewTanker,
    NewVillage, TankerStatus,
};
use crate::store;

// ---

pub const VILLAGES_PER_DISTRICT: usize = 3;

/// Litres per person per day used to derive base demand.
const LITRES_PER_CAPITA: i64 = 20;

/// Centre and full width (degrees) of the coordinate box approximating India.
const CENTER_LAT: f64 = 20.0;
const CENTER_LNG: f64 = 78.0;
const BOX_SPAN: f64 = 15.0;

pub const STATES: &[(&str, &[&str])] = &[
    ("Andhra Pradesh", &["Anantapur", "Chittoor", "Kurnool"]),
    ("Arunachal Pradesh", &["Tawang", "West Kameng"]),
    ("Assam", &["Kamrup", "Dibrugarh"]),
    ("Bihar", &["Patna", "Gaya", "Muzaffarpur"]),
    ("Chhattisgarh", &["Raipur", "Bastar"]),
    ("Goa", &["North Goa", "South Goa"]),
    ("Gujarat", &["Ahmedabad", "Rajkot", "Kutch"]),
    ("Haryana", &["Gurugram", "Hisar"]),
    ("Himachal Pradesh", &["Shimla", "Kangra"]),
    ("Jharkhand", &["Ranchi", "Dhanbad"]),
    ("Karnataka", &["Bengaluru", "Mysuru", "Belagavi"]),
    ("Kerala", &["Thiruvananthapuram", "Kochi"]),
    ("Madhya Pradesh", &["Bhopal", "Indore", "Gwalior"]),
    ("Maharashtra", &["Mumbai", "Pune", "Nagpur", "Latur", "Beed"]),
    ("Manipur", &["Imphal East", "Imphal West"]),
    ("Meghalaya", &["East Khasi Hills", "West Garo Hills"]),
    ("Mizoram", &["Aizawl", "Lunglei"]),
    ("Nagaland", &["Kohima", "Dimapur"]),
    ("Odisha", &["Bhubaneswar", "Cuttack"]),
    ("Punjab", &["Ludhiana", "Amritsar"]),
    ("Rajasthan", &["Jaipur", "Jodhpur", "Udaipur"]),
    ("Sikkim", &["Gangtok", "Namchi"]),
    ("Tamil Nadu", &["Chennai", "Coimbatore", "Madurai"]),
    ("Telangana", &["Hyderabad", "Warangal"]),
    ("Tripura", &["Agartala", "Udaipur"]),
    ("Uttar Pradesh", &["Lucknow", "Kanpur", "Varanasi"]),
    ("Uttarakhand", &["Dehradun", "Haridwar"]),
    ("West Bengal", &["Kolkata", "Darjeeling"]),
    ("Delhi", &["New Delhi", "North Delhi"]),
    ("Jammu & Kashmir", &["Srinagar", "Jammu"]),
    ("Ladakh", &["Leh", "Kargil"]),
    ("Puducherry", &["Puducherry", "Karaikal"]),
    ("Andaman & Nicobar", &["Port Blair"]),
    ("Chandigarh", &["Chandigarh"]),
    ("Dadra & Nagar Haveli", &["Silvassa"]),
    ("Lakshadweep", &["Kavaratti"]),
];

/// What a seeding pass wrote.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SeedSummary {
    pub villages: usize,
    pub tankers: usize,
    pub alerts: usize,
    pub deployments: usize,
}

/// Total number of listed districts.
pub fn district_count() -> usize {
    STATES.iter().map(|(_, districts)| districts.len()).sum()
}

/// Populate the store if it holds no villages.
///
/// Returns `None` when the store was already populated; nothing is written
/// in that case. The whole pass runs in one transaction.
pub async fn seed_if_empty<R: Rng>(pool: &SqlitePool, rng: &mut R) -> Result<Option<SeedSummary>> {
    // ---
    let mut tx = pool.begin().await?;

    let existing = store::village_count(&mut *tx).await?;
    if existing > 0 {
        info!("Store already holds {} villages, skipping seed", existing);
        return Ok(None);
    }

    let today = Utc::now().date_naive();
    let mut summary = SeedSummary::default();
    let mut village_ids: HashMap<(&str, &str, usize), i64> = HashMap::new();

    for (state, districts) in STATES {
        for district in districts.iter() {
            for n in 1..=VILLAGES_PER_DISTRICT {
                let village = random_village(rng, state, district, n);
                let id = store::create_village(&mut tx, &village)
                    .await
                    .with_context(|| format!("seeding {}", village.name))?;

                let metric = NewMetric {
                    date: today,
                    rainfall_deviation: round2(rng.gen_range(-60.0..=0.0)),
                    groundwater_level: round2(rng.gen_range(20.0..70.0)),
                    groundwater_velocity: -1.2,
                    water_stress_index: rng.gen_range(0.0..100.0),
                };
                store::append_metric(&mut tx, id, &metric).await?;

                village_ids.insert((*state, *district, n), id);
                summary.villages += 1;
            }
        }
    }

    // District names repeat across states (Udaipur), so lookups carry the state
    let village = |state: &str, district: &str, n: usize| -> Result<i64> {
        village_ids
            .get(&(state, district, n))
            .copied()
            .with_context(|| format!("no seeded village {district} {n} in {state}"))
    };

    let tankers = [
        ("MH-24-AB-1234", 10_000, TankerStatus::Available, 18.4088, 76.5604, "Maharashtra", "Latur", "Block A"),
        ("MH-24-CD-5678", 12_000, TankerStatus::InTransit, 18.9891, 75.7601, "Maharashtra", "Beed", "Block B"),
        ("RJ-19-XY-9999", 15_000, TankerStatus::Available, 26.2389, 73.0243, "Rajasthan", "Jodhpur", "Block C"),
    ];
    let mut tanker_ids = Vec::with_capacity(tankers.len());
    for (reg, capacity, status, lat, lng, state, district, block) in tankers {
        let tanker = NewTanker {
            registration_no: reg.to_string(),
            capacity_liters: capacity,
            assigned_state: Some(state.to_string()),
            assigned_district: Some(district.to_string()),
            assigned_block: Some(block.to_string()),
            assigned_village_id: None,
            source_point: None,
            status,
        };
        let position = GeoPoint {
            latitude: lat,
            longitude: lng,
        };
        tanker_ids.push(store::insert_tanker(&mut tx, &tanker, position).await?);
        summary.tankers += 1;
    }

    let latur_1 = village("Maharashtra", "Latur", 1)?;
    let latur_3 = village("Maharashtra", "Latur", 3)?;
    let beed_1 = village("Maharashtra", "Beed", 1)?;

    let alerts = [
        (AlertKind::Critical, "Village 1 in Latur needs tanker urgently", latur_1),
        (AlertKind::Warning, "Groundwater level critical in Latur Village 3", latur_3),
    ];
    for (kind, message, village_id) in alerts {
        let alert = NewAlert {
            kind,
            message: message.to_string(),
            village_id: Some(village_id),
            tanker_id: None,
        };
        store::raise_alert(&mut tx, &alert).await?;
        summary.alerts += 1;
    }

    let deliveries = [
        (tanker_ids[0], latur_1, 10_000, 1_500.0, 45.0),
        (tanker_ids[1], beed_1, 12_000, 1_800.0, 52.0),
    ];
    for (tanker_id, village_id, volume, cost, fuel) in deliveries {
        let deployment = NewDeployment {
            tanker_id,
            village_id,
            scheduled_date: today,
            status: DeploymentStatus::Delivered,
            volume_delivered: volume,
            cost_estimated: cost,
            fuel_consumed: fuel,
        };
        store::record_deployment(&mut tx, &deployment).await?;
        summary.deployments += 1;
    }

    tx.commit().await?;

    info!(
        "Seeded {} villages, {} tankers, {} alerts, {} deployments",
        summary.villages, summary.tankers, summary.alerts, summary.deployments
    );
    Ok(Some(summary))
}

fn random_village<R: Rng>(rng: &mut R, state: &str, district: &str, n: usize) -> NewVillage {
    // ---
    let population = rng.gen_range(500..5_500);
    NewVillage {
        name: format!("{district} Village {n}"),
        block: Some("Block A".to_string()),
        district: district.to_string(),
        state: state.to_string(),
        population,
        latitude: CENTER_LAT + (rng.gen::<f64>() - 0.5) * BOX_SPAN,
        longitude: CENTER_LNG + (rng.gen::<f64>() - 0.5) * BOX_SPAN,
        water_source: Some("Borewell".to_string()),
        base_water_demand: population * LITRES_PER_CAPITA,
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
