//! Menu catalog types.

use serde::{Deserialize, Serialize};

/// A catalog entry. Read-mostly: seeded at startup and never mutated by the
/// order simulation.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct MenuItem {
    pub id: i64,
    pub name: String,
    pub category: String,
    pub description: String,
    pub price: f64,
    /// Human-readable preparation range, e.g. "15-20 min".
    pub time_range: String,
    pub available: bool,
}
