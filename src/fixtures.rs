//! Small builders shared by the unit tests.

use chrono::NaiveDate;

use crate::models::{NewMetric, NewTanker, NewVillage, TankerStatus};

pub fn village(name: &str, state: &str, district: &str, base_water_demand: i64) -> NewVillage {
    NewVillage {
        name: name.to_string(),
        block: Some("Block A".to_string()),
        district: district.to_string(),
        state: state.to_string(),
        population: base_water_demand / 20,
        latitude: 20.0,
        longitude: 78.0,
        water_source: Some("Borewell".to_string()),
        base_water_demand,
    }
}

/// `date` is `YYYY-MM-DD`.
pub fn metric(date: &str, water_stress_index: f64) -> NewMetric {
    NewMetric {
        date: NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap(),
        rainfall_deviation: -25.0,
        groundwater_level: 35.0,
        groundwater_velocity: -1.2,
        water_stress_index,
    }
}

pub fn tanker(registration_no: &str) -> NewTanker {
    NewTanker {
        registration_no: registration_no.to_string(),
        capacity_liters: 10_000,
        assigned_state: None,
        assigned_district: None,
        assigned_block: None,
        assigned_village_id: None,
        source_point: Some("District depot".to_string()),
        status: TankerStatus::Available,
    }
}
