use axum::extract::{Path, State};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use tracing::warn;

use super::{ApiError, AppState};
use crate::model::{ActiveOrderSummary, NewOrder, OrderRecord, OrderStatus, OrderStatusView};
use crate::tracker::TrackerStats;

/// Rows returned by the admin listing.
const ADMIN_LIMIT: u32 = 50;
/// Rows returned by the debug listing.
const DEBUG_RECENT: u32 = 5;

#[derive(Serialize)]
struct CreateOrderResponse {
    order_id: i64,
    estimated_time: u32,
    status: &'static str,
    message: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    customer: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    payment: Option<String>,
}

/// Creates an order. The facade owns request validation: an order without
/// items never reaches the tracker.
async fn create_order(
    State(state): State<AppState>,
    Json(payload): Json<NewOrder>,
) -> Result<Json<CreateOrderResponse>, ApiError> {
    if payload.items.is_empty() {
        return Err(ApiError::bad_request("order must contain at least one item"));
    }

    let customer = payload.customer.clone();
    let payment = payload.payment.clone();
    let receipt = state.tracker.add_order(payload).await?;

    Ok(Json(CreateOrderResponse {
        order_id: receipt.order_id,
        estimated_time: receipt.estimated_time,
        status: "success",
        message: "order created",
        customer,
        payment,
    }))
}

async fn get_order_status(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<OrderStatusView>, ApiError> {
    Ok(Json(state.tracker.get_status(id).await?))
}

#[derive(Deserialize)]
struct SetStatusRequest {
    status: OrderStatus,
}

#[derive(Serialize)]
struct SetStatusResponse {
    success: bool,
    order_id: i64,
    status: OrderStatus,
}

/// External status override, e.g. from the kitchen panel.
async fn set_order_status(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(request): Json<SetStatusRequest>,
) -> Result<Json<SetStatusResponse>, ApiError> {
    state.tracker.set_status(id, request.status).await?;
    Ok(Json(SetStatusResponse {
        success: true,
        order_id: id,
        status: request.status,
    }))
}

#[derive(Serialize)]
struct AdminOrdersResponse {
    orders: Vec<OrderRecord>,
    active_orders: Vec<ActiveOrderSummary>,
    total_active: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

/// Recent persisted orders combined with live active summaries. Storage
/// failure degrades to an active-only listing.
async fn admin_orders(State(state): State<AppState>) -> Json<AdminOrdersResponse> {
    let active_orders = state.tracker.list_active().await.unwrap_or_default();

    let (orders, error) = match state.store.recent_orders(ADMIN_LIMIT).await {
        Ok(orders) => (orders, None),
        Err(err) => {
            warn!(error = %err, "admin listing read failed");
            (Vec::new(), Some(err.to_string()))
        }
    };

    Json(AdminOrdersResponse {
        orders,
        total_active: active_orders.len(),
        active_orders,
        error,
    })
}

#[derive(Serialize)]
struct DebugOrdersResponse {
    database_orders_count: i64,
    active_orders_count: usize,
    recent_orders: Vec<OrderRecord>,
    active_orders: Vec<ActiveOrderSummary>,
    database_status: &'static str,
    stats: TrackerStats,
}

/// Everything a debugging session wants on one page, never failing:
/// `database_orders_count` is -1 when the store cannot be reached, and the
/// tracker counters expose how many best-effort writes were dropped.
async fn debug_orders(State(state): State<AppState>) -> Json<DebugOrdersResponse> {
    let stats = state.tracker.stats().await.unwrap_or_default();
    let active_orders = state.tracker.list_active().await.unwrap_or_default();

    let database_orders_count = match state.store.count_orders().await {
        Ok(count) => count,
        Err(err) => {
            warn!(error = %err, "order count read failed");
            -1
        }
    };

    let recent_orders = state
        .store
        .recent_orders(DEBUG_RECENT)
        .await
        .unwrap_or_default();

    Json(DebugOrdersResponse {
        database_orders_count,
        active_orders_count: active_orders.len(),
        recent_orders,
        active_orders,
        database_status: if database_orders_count >= 0 { "ok" } else { "error" },
        stats,
    })
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/orders", post(create_order))
        .route(
            "/api/orders/{id}/status",
            get(get_order_status).put(set_order_status),
        )
        .route("/api/admin/orders", get(admin_orders))
        .route("/api/debug/orders", get(debug_orders))
}
