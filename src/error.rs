//! Typed failures raised by the store and query layer.
//!
//! Handlers return these directly; the [`IntoResponse`] impl is the single
//! place where they become client-visible `{ "error": ... }` bodies.

use axum::{http::StatusCode, response::IntoResponse, Json};
use serde_json::json;
use thiserror::Error as ThisError;

// ---

#[derive(Debug, ThisError)]
pub enum StoreError {
    /// A required field was missing or out of range.
    #[error("{0}")]
    Validation(String),

    /// A unique key is already taken.
    #[error("{0}")]
    Conflict(String),

    /// A referenced entity does not exist.
    #[error("{0}")]
    NotFound(String),

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

pub type StoreResult<T> = Result<T, StoreError>;

impl StoreError {
    // ---
    /// Classify an engine error raised by an insert.
    ///
    /// Unique violations become [`StoreError::Conflict`] and foreign-key
    /// violations become [`StoreError::NotFound`]; everything else is passed
    /// through untouched.
    pub fn from_insert(err: sqlx::Error, what: &str) -> Self {
        // ---
        if let sqlx::Error::Database(db_err) = &err {
            if db_err.is_unique_violation() {
                return Self::Conflict(format!("{what} already exists"));
            }
            if db_err.is_foreign_key_violation() {
                return Self::NotFound(format!("{what} references a missing record"));
            }
        }
        Self::Database(err)
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::Conflict(_) => StatusCode::CONFLICT,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for StoreError {
    fn into_response(self) -> axum::response::Response {
        // ---
        let status = self.status();
        let message = match &self {
            Self::Database(e) => {
                tracing::error!("Database failure: {}", e);
                "Internal database error".to_string()
            }
            other => {
                tracing::warn!("Request rejected ({}): {}", status, other);
                other.to_string()
            }
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}
