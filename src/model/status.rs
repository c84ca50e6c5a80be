//! Restaurant-wide load aggregate.

use chrono::{DateTime, Utc};
use serde::Serialize;

/// The singleton aggregate row describing restaurant-wide load.
///
/// This is a cache, not a source of truth: it is fully derivable from the
/// active set at any time and is rewritten after every order creation and
/// every completion batch. `last_updated` not advancing is the only signal
/// that aggregate persistence is failing.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct RestaurantStatus {
    pub current_orders: i64,
    pub average_wait_time: i64,
    pub status: String,
    pub last_updated: DateTime<Utc>,
}
