//! HTTP facade.
//!
//! Thin translation layer: handlers validate the request shape, call the
//! tracker client or the store, and map errors to HTTP statuses. Read
//! endpoints degrade to empty/default payloads on storage failure so
//! polling dashboards keep rendering; write endpoints surface failures.

pub mod health;
pub mod menu;
pub mod orders;
pub mod status;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::{Json, Router};
use serde_json::json;
use tower_http::trace::TraceLayer;

use crate::clients::TrackerClient;
use crate::store::SharedStore;
use crate::tracker::TrackerError;

/// Shared handler state.
#[derive(Clone)]
pub struct AppState {
    pub tracker: TrackerClient,
    pub store: SharedStore,
}

/// Builds the full application router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .merge(health::router())
        .merge(menu::router())
        .merge(status::router())
        .merge(orders::router())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Error payload returned by write endpoints: `{"error": "..."}` with a
/// matching status code.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
        }
    }
}

impl From<TrackerError> for ApiError {
    fn from(err: TrackerError) -> Self {
        let status = match &err {
            TrackerError::NotFound(_) => StatusCode::NOT_FOUND,
            TrackerError::ActorClosed | TrackerError::ActorDropped => {
                StatusCode::SERVICE_UNAVAILABLE
            }
            TrackerError::Creation(_) | TrackerError::Storage(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };
        Self {
            status,
            message: err.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(json!({ "error": self.message }))).into_response()
    }
}
