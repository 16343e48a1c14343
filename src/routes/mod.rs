//! Route gateway: one sub-router per resource, merged under shared state.

use std::convert::Infallible;

use axum::{
    extract::{FromRequestParts, Query},
    http::request::Parts,
    Router,
};
use sqlx::SqlitePool;

use crate::{Config, RegionFilter};

mod alerts;
mod chat;
mod dashboard;
mod health;
mod locations;
mod reports;
mod tankers;
mod villages;

// ---

/// Shared handler state: the pool opened at startup and the config snapshot.
pub type AppState = (SqlitePool, Config);

pub fn router(pool: SqlitePool, config: Config) -> Router {
    // ---
    Router::new()
        .merge(dashboard::router())
        .merge(villages::router())
        .merge(tankers::router())
        .merge(locations::router())
        .merge(alerts::router())
        .merge(reports::router())
        .merge(chat::router())
        .merge(health::router())
        .with_state((pool, config))
}

/// `?state=&district=` extraction. A query string that fails to parse is
/// treated as no filter at all rather than rejected.
impl<S> FromRequestParts<S> for RegionFilter
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        // ---
        let filter = match Query::<RegionFilter>::from_request_parts(parts, state).await {
            Ok(Query(filter)) => filter,
            Err(e) => {
                tracing::debug!("Ignoring malformed filter: {}", e);
                RegionFilter::default()
            }
        };
        Ok(filter)
    }
}
