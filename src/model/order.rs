//! Order domain types: the in-memory order tracked by the kitchen simulation,
//! its persisted form, and the DTOs exchanged with the HTTP facade.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Default customer name when the request omits one.
pub const DEFAULT_CUSTOMER: &str = "Cliente";
/// Default payment method when the request omits one.
pub const DEFAULT_PAYMENT: &str = "efectivo";

/// Preparation stage of an order.
///
/// `received` is the initial state. The simulation advances orders through
/// `preparing`, `cooking` and `ready` as progress crosses fixed thresholds.
/// `completed` and `cancelled` are terminal; `cancelled` is only reachable
/// through an external status override (e.g. kitchen staff).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    Received,
    Preparing,
    Cooking,
    Ready,
    Completed,
    Cancelled,
}

impl OrderStatus {
    /// Terminal states end an order's life in the active set.
    pub fn is_terminal(self) -> bool {
        matches!(self, OrderStatus::Completed | OrderStatus::Cancelled)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            OrderStatus::Received => "received",
            OrderStatus::Preparing => "preparing",
            OrderStatus::Cooking => "cooking",
            OrderStatus::Ready => "ready",
            OrderStatus::Completed => "completed",
            OrderStatus::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OrderStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "received" => Ok(OrderStatus::Received),
            "preparing" => Ok(OrderStatus::Preparing),
            "cooking" => Ok(OrderStatus::Cooking),
            "ready" => Ok(OrderStatus::Ready),
            "completed" => Ok(OrderStatus::Completed),
            "cancelled" => Ok(OrderStatus::Cancelled),
            other => Err(format!("unknown order status: {other}")),
        }
    }
}

fn default_quantity() -> u32 {
    1
}

/// A single line of an order. A payload without a `quantity` field counts
/// as one unit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderItem {
    pub name: String,
    #[serde(default = "default_quantity")]
    pub quantity: u32,
    #[serde(default)]
    pub price: f64,
}

/// Creation payload for an order, as posted by the facade.
///
/// `total` is taken on trust: it is never cross-checked against menu prices
/// times quantities. The facade rejects empty `items` before this reaches
/// the tracker.
#[derive(Debug, Clone, Deserialize)]
pub struct NewOrder {
    pub items: Vec<OrderItem>,
    pub total: f64,
    #[serde(default)]
    pub customer: Option<String>,
    #[serde(default, alias = "payment_method")]
    pub payment: Option<String>,
}

/// An in-flight order, owned exclusively by the tracker actor.
#[derive(Debug, Clone, PartialEq)]
pub struct Order {
    pub id: i64,
    pub items: Vec<OrderItem>,
    pub total: f64,
    /// Minutes until the order is expected to reach 100% progress.
    /// Computed once at creation, immutable afterwards.
    pub estimated_time: u32,
    pub customer: String,
    pub payment_method: String,
    pub status: OrderStatus,
    pub created_at: DateTime<Utc>,
    /// Percentage in [0, 100], recomputed on every tick.
    pub progress: f64,
}

impl Order {
    /// Builds a fresh in-memory order. The id is assigned by the store on
    /// insert; callers pass a placeholder (0) and overwrite it afterwards.
    pub fn new(
        id: i64,
        params: NewOrder,
        estimated_time: u32,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            items: params.items,
            total: params.total,
            estimated_time,
            customer: params.customer.unwrap_or_else(|| DEFAULT_CUSTOMER.to_string()),
            payment_method: params.payment.unwrap_or_else(|| DEFAULT_PAYMENT.to_string()),
            status: OrderStatus::Received,
            created_at,
            progress: 0.0,
        }
    }

    /// Progress at `now`, as a pure function of elapsed time and the ETA.
    /// Never exceeds 100; monotone non-decreasing for non-decreasing `now`.
    pub fn progress_at(&self, now: DateTime<Utc>) -> f64 {
        let elapsed_minutes = (now - self.created_at).num_seconds() as f64 / 60.0;
        let eta = self.estimated_time.max(1) as f64;
        (elapsed_minutes / eta * 100.0).clamp(0.0, 100.0)
    }

    pub fn summary(&self) -> ActiveOrderSummary {
        ActiveOrderSummary {
            id: self.id,
            status: self.status,
            progress: self.progress,
        }
    }
}

/// The persisted form of an order, as read back from the store.
#[derive(Debug, Clone, Serialize)]
pub struct OrderRecord {
    pub id: i64,
    pub items: Vec<OrderItem>,
    pub total: f64,
    pub estimated_time: u32,
    pub customer: String,
    pub payment_method: String,
    pub status: OrderStatus,
    pub created_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
}

/// Status snapshot for a single order. Progress is only present while the
/// order is in flight; `completed_at` only once it is persisted as terminal.
#[derive(Debug, Clone, Serialize)]
pub struct OrderStatusView {
    pub order_id: i64,
    pub status: OrderStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub progress: Option<f64>,
    pub estimated_time: u32,
    pub created_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,
}

/// Compact `{id, status, progress}` tuple for admin and debug listings.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ActiveOrderSummary {
    pub id: i64,
    pub status: OrderStatus,
    pub progress: f64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn order_with_eta(eta: u32) -> Order {
        Order::new(
            1,
            NewOrder {
                items: vec![OrderItem { name: "Margherita Clásica".into(), quantity: 1, price: 189.0 }],
                total: 189.0,
                customer: None,
                payment: None,
            },
            eta,
            Utc::now(),
        )
    }

    #[test]
    fn defaults_apply_when_fields_absent() {
        let order = order_with_eta(15);
        assert_eq!(order.customer, DEFAULT_CUSTOMER);
        assert_eq!(order.payment_method, DEFAULT_PAYMENT);
        assert_eq!(order.status, OrderStatus::Received);
        assert_eq!(order.progress, 0.0);
    }

    #[test]
    fn item_quantity_defaults_to_one() {
        let item: OrderItem = serde_json::from_str(r#"{"name":"Pepperoni Supreme"}"#).unwrap();
        assert_eq!(item.quantity, 1);
    }

    #[test]
    fn progress_is_capped_and_monotone() {
        let order = order_with_eta(20);
        let half = order.created_at + Duration::minutes(10);
        let past = order.created_at + Duration::minutes(45);
        assert_eq!(order.progress_at(half), 50.0);
        assert_eq!(order.progress_at(past), 100.0);
        assert!(order.progress_at(half) <= order.progress_at(past));
    }

    #[test]
    fn status_round_trips_through_strings() {
        for status in [
            OrderStatus::Received,
            OrderStatus::Preparing,
            OrderStatus::Cooking,
            OrderStatus::Ready,
            OrderStatus::Completed,
            OrderStatus::Cancelled,
        ] {
            assert_eq!(status.as_str().parse::<OrderStatus>().unwrap(), status);
        }
        assert!("burnt".parse::<OrderStatus>().is_err());
    }
}
