use axum::{extract::State, routing::get, Json, Router};
use tracing::info;

use super::AppState;
use crate::{queries, RegionFilter, StoreError, UsageRow};

// ---

pub fn router() -> Router<AppState> {
    // ---
    Router::new().route("/api/reports/usage", get(handler))
}

async fn handler(
    State((pool, _)): State<AppState>,
    filter: RegionFilter,
) -> Result<Json<Vec<UsageRow>>, StoreError> {
    // ---
    info!("GET /api/reports/usage - filter {:?}", filter);
    let report = queries::usage_report(&pool, &filter).await?;
    info!("Usage report covers {} tankers", report.len());
    Ok(Json(report))
}
