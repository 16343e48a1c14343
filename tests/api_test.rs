use std::sync::{Arc, Mutex};

use anyhow::Result;
use axum::{routing::post, Json, Router};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use reqwest::{Client, StatusCode};
use serde_json::{json, Value};
use sqlx::SqlitePool;
use tokio_test::assert_ok;

use drought_dashboard::{
    chat, db, routes, seed, AlertView, Config, DashboardStats, LocationHierarchy, Tanker,
    UsageRow, VillageView,
};

/// Boot the full router on an ephemeral port over a fresh in-memory store.
async fn spawn_app() -> Result<(String, SqlitePool)> {
    spawn_app_with(Config::default()).await
}

async fn spawn_app_with(cfg: Config) -> Result<(String, SqlitePool)> {
    // ---
    let pool = db::connect_in_memory().await?;
    let app = routes::router(pool.clone(), cfg);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    tokio::spawn(async move { axum::serve(listener, app).await });

    Ok((format!("http://{addr}"), pool))
}

async fn spawn_seeded_app() -> Result<(String, SqlitePool)> {
    spawn_seeded_app_with(Config::default()).await
}

async fn spawn_seeded_app_with(cfg: Config) -> Result<(String, SqlitePool)> {
    // ---
    let (base, pool) = spawn_app_with(cfg).await?;
    let mut rng = ChaCha8Rng::seed_from_u64(2024);
    seed::seed_if_empty(&pool, &mut rng).await?;
    Ok((base, pool))
}

async fn provision_village(client: &Client, base: &str, body: Value) -> Result<i64> {
    // ---
    let resp: Value = client
        .post(format!("{base}/api/villages"))
        .json(&body)
        .send()
        .await?
        .json()
        .await?;
    Ok(resp["id"].as_i64().expect("village id"))
}

#[tokio::test]
async fn health_is_ok() -> Result<()> {
    // ---
    let (base, _pool) = spawn_app().await?;
    let body: Value = Client::new()
        .get(format!("{base}/health"))
        .send()
        .await?
        .json()
        .await?;

    assert_eq!(body, json!({ "status": "ok" }));
    Ok(())
}

#[tokio::test]
async fn seeded_stats_match_village_listing() -> Result<()> {
    // ---
    let (base, _pool) = spawn_seeded_app().await?;
    let client = Client::new();

    let stats: DashboardStats = client
        .get(format!("{base}/api/dashboard/stats"))
        .send()
        .await?
        .json()
        .await?;
    let villages: Vec<VillageView> = client
        .get(format!("{base}/api/villages"))
        .send()
        .await?
        .json()
        .await?;

    let expected = seed::district_count() * seed::VILLAGES_PER_DISTRICT;
    assert_eq!(stats.total_villages as usize, expected);
    assert_eq!(villages.len(), expected);
    assert_eq!(stats.active_tankers, 1, "one seeded tanker is in transit");

    let demand: i64 = villages.iter().map(|v| v.base_water_demand).sum();
    assert!((stats.water_gap_liters - 0.4 * demand as f64).abs() < 1e-6);

    let red = villages
        .iter()
        .filter(|v| v.water_stress_index > 70.0)
        .count();
    assert_eq!(stats.critical_villages as usize, red);
    Ok(())
}

#[tokio::test]
async fn state_filter_narrows_every_listing() -> Result<()> {
    // ---
    let (base, _pool) = spawn_seeded_app().await?;
    let client = Client::new();

    let villages: Vec<VillageView> = client
        .get(format!("{base}/api/villages?state=Maharashtra"))
        .send()
        .await?
        .json()
        .await?;
    assert_eq!(villages.len(), 15);
    assert!(villages.iter().all(|v| v.state == "Maharashtra"));

    let tankers: Vec<Tanker> = client
        .get(format!("{base}/api/tankers?state=Maharashtra"))
        .send()
        .await?
        .json()
        .await?;
    assert_eq!(tankers.len(), 2);

    let usage: Vec<UsageRow> = client
        .get(format!("{base}/api/reports/usage?state=Rajasthan"))
        .send()
        .await?
        .json()
        .await?;
    assert!(usage.is_empty(), "the Rajasthan tanker has no deliveries");

    let alerts: Vec<AlertView> = client
        .get(format!("{base}/api/alerts?district=Latur"))
        .send()
        .await?
        .json()
        .await?;
    assert_eq!(alerts.len(), 2);
    assert!(alerts.windows(2).all(|w| w[0].timestamp >= w[1].timestamp));
    Ok(())
}

#[tokio::test]
async fn blank_filter_values_are_ignored() -> Result<()> {
    // ---
    let (base, _pool) = spawn_seeded_app().await?;
    let client = Client::new();

    let unfiltered: DashboardStats = client
        .get(format!("{base}/api/dashboard/stats"))
        .send()
        .await?
        .json()
        .await?;
    let blank: DashboardStats = client
        .get(format!("{base}/api/dashboard/stats?state=&district="))
        .send()
        .await?
        .json()
        .await?;

    assert_eq!(unfiltered, blank);
    Ok(())
}

#[tokio::test]
async fn hierarchy_lists_distinct_levels() -> Result<()> {
    // ---
    let (base, _pool) = spawn_seeded_app().await?;
    let tree: LocationHierarchy = Client::new()
        .get(format!("{base}/api/locations/hierarchy"))
        .send()
        .await?
        .json()
        .await?;

    assert_eq!(tree.states.len(), seed::STATES.len());
    assert_eq!(tree.districts.len(), seed::district_count());
    assert_eq!(
        tree.villages.len(),
        seed::district_count() * seed::VILLAGES_PER_DISTRICT
    );
    Ok(())
}

#[tokio::test]
async fn register_tanker_then_reject_duplicate() -> Result<()> {
    // ---
    let (base, _pool) = spawn_app().await?;
    let client = Client::new();

    let village_id = provision_village(
        &client,
        &base,
        json!({
            "name": "Latur Village 9", "block": "Block A", "district": "Latur",
            "state": "Maharashtra", "population": 1200, "latitude": 18.41,
            "longitude": 76.56, "water_source": "Borewell", "base_water_demand": 24000
        }),
    )
    .await?;

    let body = json!({
        "registration_no": "MH-24-EF-4321", "capacity_liters": 9000,
        "assigned_state": "Maharashtra", "assigned_district": "Latur",
        "assigned_block": "Block A", "assigned_village_id": village_id,
        "source_point": "Latur depot", "status": "In Transit"
    });

    let created = client
        .post(format!("{base}/api/tankers"))
        .json(&body)
        .send()
        .await?;
    assert_eq!(created.status(), StatusCode::OK);
    let created: Value = created.json().await?;
    assert_eq!(created["success"], true);
    assert_ok!(created["id"].as_i64().ok_or("missing id"));

    let duplicate = client
        .post(format!("{base}/api/tankers"))
        .json(&body)
        .send()
        .await?;
    assert!(duplicate.status().is_client_error());
    let duplicate: Value = duplicate.json().await?;
    assert!(duplicate["error"].as_str().is_some());

    let tankers: Vec<Tanker> = client
        .get(format!("{base}/api/tankers"))
        .send()
        .await?
        .json()
        .await?;
    assert_eq!(tankers.len(), 1);
    assert_eq!((tankers[0].current_lat, tankers[0].current_lng), (18.41, 76.56));
    Ok(())
}

#[tokio::test]
async fn register_tanker_for_unknown_village_sits_at_origin() -> Result<()> {
    // ---
    let (base, _pool) = spawn_app().await?;
    let client = Client::new();

    let resp = client
        .post(format!("{base}/api/tankers"))
        .json(&json!({
            "registration_no": "KA-01-GH-1111", "capacity_liters": 6000,
            "assigned_village_id": 12345, "status": "Available"
        }))
        .send()
        .await?;
    assert_eq!(resp.status(), StatusCode::OK);

    let tankers: Vec<Tanker> = client
        .get(format!("{base}/api/tankers"))
        .send()
        .await?
        .json()
        .await?;
    assert_eq!((tankers[0].current_lat, tankers[0].current_lng), (0.0, 0.0));
    Ok(())
}

#[tokio::test]
async fn malformed_tanker_body_is_a_client_error() -> Result<()> {
    // ---
    let (base, _pool) = spawn_app().await?;

    let resp = Client::new()
        .post(format!("{base}/api/tankers"))
        .json(&json!({ "registration_no": "X", "capacity_liters": 100, "status": "Flying" }))
        .send()
        .await?;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let body: Value = resp.json().await?;
    assert!(body["error"].is_string());
    Ok(())
}

#[tokio::test]
async fn appended_metric_becomes_current() -> Result<()> {
    // ---
    let (base, _pool) = spawn_app().await?;
    let client = Client::new();

    let village_id = provision_village(
        &client,
        &base,
        json!({
            "name": "Beed Village 7", "district": "Beed", "state": "Maharashtra",
            "population": 800, "latitude": 18.99, "longitude": 75.76,
            "base_water_demand": 16000
        }),
    )
    .await?;

    for (date, wsi, expected) in [("2025-06-01", 91.0, "Red"), ("2025-02-01", 55.0, "Orange")] {
        let resp: Value = client
            .post(format!("{base}/api/villages/{village_id}/metrics"))
            .json(&json!({
                "date": date, "rainfall_deviation": -30.0, "groundwater_level": 41.5,
                "groundwater_velocity": -1.2, "water_stress_index": wsi
            }))
            .send()
            .await?
            .json()
            .await?;
        assert_eq!(resp["risk_level"], expected);
    }

    let villages: Vec<VillageView> = client
        .get(format!("{base}/api/villages?district=Beed"))
        .send()
        .await?
        .json()
        .await?;
    assert_eq!(villages.len(), 1);
    assert_eq!(villages[0].water_stress_index, 55.0);

    let missing = client
        .post(format!("{base}/api/villages/999/metrics"))
        .json(&json!({
            "date": "2025-06-01", "rainfall_deviation": 0.0,
            "groundwater_level": 10.0, "water_stress_index": 10.0
        }))
        .send()
        .await?;
    assert_eq!(missing.status(), StatusCode::NOT_FOUND);
    Ok(())
}

#[tokio::test]
async fn village_without_state_is_rejected() -> Result<()> {
    // ---
    let (base, _pool) = spawn_app().await?;

    let resp = Client::new()
        .post(format!("{base}/api/villages"))
        .json(&json!({ "name": "Orphan", "district": "Latur", "latitude": 0.0, "longitude": 0.0 }))
        .send()
        .await?;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    Ok(())
}

#[tokio::test]
async fn chat_without_key_reports_not_configured() -> Result<()> {
    // ---
    let (base, _pool) = spawn_seeded_app().await?;

    let body: Value = Client::new()
        .post(format!("{base}/api/chat"))
        .json(&json!({ "message": "Which district needs tankers first?", "state": "Maharashtra" }))
        .send()
        .await?
        .json()
        .await?;

    assert_eq!(body["reply"], chat::NOT_CONFIGURED_REPLY);
    Ok(())
}

#[tokio::test]
async fn non_numeric_village_id_is_a_json_client_error() -> Result<()> {
    // ---
    let (base, _pool) = spawn_app().await?;

    let resp = Client::new()
        .post(format!("{base}/api/villages/abc/metrics"))
        .json(&json!({
            "date": "2025-06-01", "rainfall_deviation": 0.0,
            "groundwater_level": 10.0, "water_stress_index": 10.0
        }))
        .send()
        .await?;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let body: Value = resp.json().await?;
    assert!(body["error"].as_str().is_some_and(|e| e.contains("abc")), "{body}");
    Ok(())
}

/// Stand-in for the generative-language API that records the last request
/// body and answers with a fixed reply.
async fn fake_model(reply: &'static str, captured: Arc<Mutex<Option<Value>>>) -> Result<String> {
    // ---
    let app = Router::new().route(
        "/models/{model}",
        post(move |Json(body): Json<Value>| {
            let captured = captured.clone();
            async move {
                *captured.lock().unwrap() = Some(body);
                Json(json!({ "candidates": [{ "content": { "parts": [{ "text": reply }] } }] }))
            }
        }),
    );

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    tokio::spawn(async move { axum::serve(listener, app).await });
    Ok(format!("http://{addr}"))
}

#[tokio::test]
async fn chat_without_context_sends_filtered_stats() -> Result<()> {
    // ---
    let captured = Arc::new(Mutex::new(None));
    let model_url = fake_model("ok", captured.clone()).await?;
    let cfg = Config {
        gemini_api_key: Some("test-key".to_string()),
        gemini_api_url: model_url,
        ..Config::default()
    };
    let (base, _pool) = spawn_seeded_app_with(cfg).await?;
    let client = Client::new();

    let body: Value = client
        .post(format!("{base}/api/chat"))
        .json(&json!({ "message": "Which Latur village is worst?", "district": "Latur" }))
        .send()
        .await?
        .json()
        .await?;
    assert_eq!(body["reply"], "ok");

    let latur: DashboardStats = client
        .get(format!("{base}/api/dashboard/stats?district=Latur"))
        .send()
        .await?
        .json()
        .await?;
    assert_eq!(latur.total_villages, 3);

    let sent = captured.lock().unwrap().take().expect("upstream was called");
    let instruction = sent["systemInstruction"]["parts"][0]["text"]
        .as_str()
        .expect("instruction text");
    assert!(instruction.contains(r#""totalVillages":3"#), "{instruction}");
    assert!(instruction.contains(&serde_json::to_value(&latur)?.to_string()));
    assert_eq!(sent["contents"][0]["parts"][0]["text"], "Which Latur village is worst?");
    Ok(())
}
