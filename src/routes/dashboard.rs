use axum::{extract::State, routing::get, Json, Router};
use tracing::info;

use super::AppState;
use crate::{queries, DashboardStats, RegionFilter, StoreError};

// ---

pub fn router() -> Router<AppState> {
    // ---
    Router::new().route("/api/dashboard/stats", get(handler))
}

async fn handler(
    State((pool, _)): State<AppState>,
    filter: RegionFilter,
) -> Result<Json<DashboardStats>, StoreError> {
    // ---
    info!("GET /api/dashboard/stats - filter {:?}", filter);
    let stats = queries::dashboard_stats(&pool, &filter).await?;
    Ok(Json(stats))
}
