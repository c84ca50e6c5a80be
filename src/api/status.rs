use axum::extract::State;
use axum::{routing::get, Json, Router};
use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::warn;

use super::AppState;
use crate::tracker::load_label;

/// Aggregate payload polled by the customer-facing view. Field names are
/// part of the wire contract, hence the camelCase.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct RestaurantStatusResponse {
    current_orders: i64,
    average_wait_time: i64,
    status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    last_updated: Option<DateTime<Utc>>,
    active_orders: usize,
}

/// Restaurant-wide load summary: the persisted aggregate row plus the live
/// active count. When the row cannot be read the response falls back to a
/// summary derived from the live count alone.
async fn get_restaurant_status(State(state): State<AppState>) -> Json<RestaurantStatusResponse> {
    let active = match state.tracker.stats().await {
        Ok(stats) => stats.active_orders,
        Err(err) => {
            warn!(error = %err, "tracker stats unavailable");
            0
        }
    };

    let response = match state.store.restaurant_status().await {
        Ok(Some(row)) => RestaurantStatusResponse {
            current_orders: row.current_orders,
            average_wait_time: row.average_wait_time,
            status: row.status,
            last_updated: Some(row.last_updated),
            active_orders: active,
        },
        Ok(None) => fallback(active),
        Err(err) => {
            warn!(error = %err, "restaurant status read failed");
            fallback(active)
        }
    };

    Json(response)
}

fn fallback(active: usize) -> RestaurantStatusResponse {
    RestaurantStatusResponse {
        current_orders: active as i64,
        average_wait_time: 25,
        status: load_label(active).to_string(),
        last_updated: None,
        active_orders: active,
    }
}

pub fn router() -> Router<AppState> {
    Router::new().route("/api/orders/status", get(get_restaurant_status))
}
