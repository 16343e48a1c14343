use axum::{
    extract::{rejection::JsonRejection, State},
    routing::get,
    Json, Router,
};
use serde_json::{json, Value};
use tracing::info;

use super::AppState;
use crate::{queries, store, NewTanker, RegionFilter, StoreError, Tanker};

// ---

pub fn router() -> Router<AppState> {
    // ---
    Router::new().route("/api/tankers", get(list).post(register))
}

async fn list(
    State((pool, _)): State<AppState>,
    filter: RegionFilter,
) -> Result<Json<Vec<Tanker>>, StoreError> {
    // ---
    info!("GET /api/tankers - filter {:?}", filter);
    let tankers = queries::tanker_list(&pool, &filter).await?;
    Ok(Json(tankers))
}

async fn register(
    State((pool, _)): State<AppState>,
    payload: Result<Json<NewTanker>, JsonRejection>,
) -> Result<Json<Value>, StoreError> {
    // ---
    let Json(tanker) = payload.map_err(|e| StoreError::Validation(e.body_text()))?;
    info!("POST /api/tankers - {}", tanker.registration_no);

    let mut conn = pool.acquire().await?;
    let id = store::register_tanker(&mut conn, &tanker).await?;

    Ok(Json(json!({ "success": true, "id": id })))
}
