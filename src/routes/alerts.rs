use axum::{extract::State, routing::get, Json, Router};
use tracing::info;

use super::AppState;
use crate::{queries, AlertView, RegionFilter, StoreError};

// ---

pub fn router() -> Router<AppState> {
    // ---
    Router::new().route("/api/alerts", get(handler))
}

async fn handler(
    State((pool, _)): State<AppState>,
    filter: RegionFilter,
) -> Result<Json<Vec<AlertView>>, StoreError> {
    // ---
    info!("GET /api/alerts - filter {:?}", filter);
    let alerts = queries::alert_list(&pool, &filter).await?;
    Ok(Json(alerts))
}
