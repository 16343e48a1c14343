use axum::{
    extract::{rejection::JsonRejection, State},
    routing::post,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::info;

use super::AppState;
use crate::{queries, ChatAssistant, RegionFilter, StoreError};

// ---

#[derive(Debug, Deserialize)]
struct ChatRequest {
    message: String,
    /// Dashboard context supplied by the client. Built from the stats when absent.
    #[serde(default)]
    context: Option<Value>,
    #[serde(default)]
    state: Option<String>,
    #[serde(default)]
    district: Option<String>,
}

#[derive(Debug, Serialize)]
struct ChatResponse {
    reply: String,
}

pub fn router() -> Router<AppState> {
    // ---
    Router::new().route("/api/chat", post(handler))
}

async fn handler(
    State((pool, config)): State<AppState>,
    payload: Result<Json<ChatRequest>, JsonRejection>,
) -> Result<Json<ChatResponse>, StoreError> {
    // ---
    let Json(request) = payload.map_err(|e| StoreError::Validation(e.body_text()))?;
    if request.message.trim().is_empty() {
        return Err(StoreError::Validation("message is required".to_string()));
    }
    info!("POST /api/chat - {} chars", request.message.len());

    let context = match request.context {
        Some(context) => context,
        None => {
            let filter = RegionFilter {
                state: request.state,
                district: request.district,
            };
            let stats = queries::dashboard_stats(&pool, &filter).await?;
            serde_json::to_value(stats).unwrap_or(Value::Null)
        }
    };

    let assistant = ChatAssistant::from_config(&config);
    let reply = assistant.reply(&request.message, &context).await;

    Ok(Json(ChatResponse { reply }))
}
