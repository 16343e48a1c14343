use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, State,
    },
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};
use tracing::info;

use super::AppState;
use crate::{queries, store, NewMetric, NewVillage, RegionFilter, StoreError, VillageView};

// ---

pub fn router() -> Router<AppState> {
    // ---
    Router::new()
        .route("/api/villages", get(list).post(create))
        .route("/api/villages/{id}/metrics", post(append_metric))
}

async fn list(
    State((pool, _)): State<AppState>,
    filter: RegionFilter,
) -> Result<Json<Vec<VillageView>>, StoreError> {
    // ---
    info!("GET /api/villages - filter {:?}", filter);
    let villages = queries::villages_with_metrics(&pool, &filter).await?;
    Ok(Json(villages))
}

async fn create(
    State((pool, _)): State<AppState>,
    payload: Result<Json<NewVillage>, JsonRejection>,
) -> Result<Json<Value>, StoreError> {
    // ---
    let Json(village) = payload.map_err(|e| StoreError::Validation(e.body_text()))?;
    info!("POST /api/villages - {} ({})", village.name, village.district);

    let mut conn = pool.acquire().await?;
    let id = store::create_village(&mut conn, &village).await?;

    Ok(Json(json!({ "success": true, "id": id })))
}

async fn append_metric(
    State((pool, _)): State<AppState>,
    path: Result<Path<i64>, PathRejection>,
    payload: Result<Json<NewMetric>, JsonRejection>,
) -> Result<Json<Value>, StoreError> {
    // ---
    let Path(village_id) = path.map_err(|e| StoreError::Validation(e.body_text()))?;
    let Json(metric) = payload.map_err(|e| StoreError::Validation(e.body_text()))?;
    info!("POST /api/villages/{}/metrics - WSI {}", village_id, metric.water_stress_index);

    let mut conn = pool.acquire().await?;
    let (id, risk) = store::append_metric(&mut conn, village_id, &metric).await?;

    Ok(Json(json!({ "success": true, "id": id, "risk_level": risk })))
}
