use axum::{extract::State, routing::get, Json, Router};
use tracing::info;

use super::AppState;
use crate::{queries, LocationHierarchy, StoreError};

// ---

pub fn router() -> Router<AppState> {
    // ---
    Router::new().route("/api/locations/hierarchy", get(handler))
}

async fn handler(State((pool, _)): State<AppState>) -> Result<Json<LocationHierarchy>, StoreError> {
    // ---
    info!("GET /api/locations/hierarchy");
    let tree = queries::location_hierarchy(&pool).await?;
    Ok(Json(tree))
}
