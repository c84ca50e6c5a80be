//! Persistent store port.
//!
//! The tracker talks to storage through the [`OrderStore`] trait so the
//! simulation logic never depends on a concrete engine. Two implementations
//! ship with the crate:
//!
//! - [`sqlite::SqliteStore`] — the real SQLite-backed store.
//! - [`memory::MemoryStore`] — an in-memory double for tests, with scripted
//!   failure injection.
//!
//! Transient failures are retried inside the store implementation via
//! [`with_retry`]: 3 attempts with exponential backoff, after which the call
//! fails fast with [`StoreError::Unavailable`].

pub mod memory;
pub mod sqlite;

use crate::model::{MenuItem, Order, OrderRecord, OrderStatus, RestaurantStatus};
use crate::tracker::StatusSummary;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tracing::warn;

/// Retry budget for a single logical store call.
pub const MAX_ATTEMPTS: u32 = 3;
/// First backoff delay; doubles on every further attempt.
const INITIAL_BACKOFF: Duration = Duration::from_millis(100);

/// Storage-layer errors.
#[derive(Debug, Error)]
pub enum StoreError {
    /// A retryable fault (I/O, pool timeout, SQLITE_BUSY). Only observed
    /// inside the retry loop; callers see `Unavailable` once retries are
    /// exhausted.
    #[error("transient storage error: {0}")]
    Transient(String),

    /// Retries exhausted; the triggering operation fails fast.
    #[error("storage unavailable after {attempts} attempts: {last_error}")]
    Unavailable { attempts: u32, last_error: String },

    /// A non-retryable fault (bad query, undecodable row).
    #[error("storage error: {0}")]
    Fatal(String),
}

/// Shared handle to a store implementation.
pub type SharedStore = Arc<dyn OrderStore>;

/// Record-store contract consumed by the tracker and the HTTP facade.
#[async_trait]
pub trait OrderStore: Send + Sync {
    /// Inserts a new order row and returns its durable id.
    async fn insert_order(&self, order: &Order) -> Result<i64, StoreError>;

    /// Updates an order's status, stamping `completed_at` when provided.
    /// Returns the number of rows affected (0 when the id is unknown).
    async fn update_order_status(
        &self,
        id: i64,
        status: OrderStatus,
        completed_at: Option<DateTime<Utc>>,
    ) -> Result<u64, StoreError>;

    async fn get_order(&self, id: i64) -> Result<Option<OrderRecord>, StoreError>;

    /// Most recent orders first, for the admin listing.
    async fn recent_orders(&self, limit: u32) -> Result<Vec<OrderRecord>, StoreError>;

    async fn count_orders(&self) -> Result<i64, StoreError>;

    /// Available menu items.
    async fn menu(&self) -> Result<Vec<MenuItem>, StoreError>;

    /// Rewrites the singleton restaurant-status row.
    async fn upsert_restaurant_status(
        &self,
        summary: &StatusSummary,
        now: DateTime<Utc>,
    ) -> Result<(), StoreError>;

    async fn restaurant_status(&self) -> Result<Option<RestaurantStatus>, StoreError>;
}

/// Runs `call` up to [`MAX_ATTEMPTS`] times, sleeping with doubling backoff
/// between attempts. Only [`StoreError::Transient`] is retried; anything
/// else propagates immediately.
pub(crate) async fn with_retry<T, F, Fut>(op: &'static str, mut call: F) -> Result<T, StoreError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, StoreError>>,
{
    let mut backoff = INITIAL_BACKOFF;
    let mut last_error = String::new();

    for attempt in 1..=MAX_ATTEMPTS {
        match call().await {
            Ok(value) => return Ok(value),
            Err(StoreError::Transient(err)) => {
                warn!(op, attempt, error = %err, "transient storage error, backing off");
                last_error = err;
                if attempt < MAX_ATTEMPTS {
                    tokio::time::sleep(backoff).await;
                    backoff *= 2;
                }
            }
            Err(other) => return Err(other),
        }
    }

    Err(StoreError::Unavailable {
        attempts: MAX_ATTEMPTS,
        last_error,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    #[tokio::test]
    async fn succeeds_once_the_fault_clears() {
        let calls = AtomicU32::new(0);
        let result = with_retry("test", || {
            let attempt = calls.fetch_add(1, Ordering::SeqCst) + 1;
            async move {
                if attempt < 3 {
                    Err(StoreError::Transient("disk I/O error".into()))
                } else {
                    Ok(attempt)
                }
            }
        })
        .await;

        assert_eq!(result.unwrap(), 3);
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn exhaustion_escalates_to_unavailable() {
        let calls = AtomicU32::new(0);
        let result: Result<(), _> = with_retry("test", || {
            calls.fetch_add(1, Ordering::SeqCst);
            async { Err(StoreError::Transient("still down".into())) }
        })
        .await;

        assert_eq!(calls.load(Ordering::SeqCst), MAX_ATTEMPTS);
        match result {
            Err(StoreError::Unavailable { attempts, last_error }) => {
                assert_eq!(attempts, MAX_ATTEMPTS);
                assert_eq!(last_error, "still down");
            }
            other => panic!("expected Unavailable, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn fatal_errors_are_not_retried() {
        let calls = AtomicU32::new(0);
        let result: Result<(), _> = with_retry("test", || {
            calls.fetch_add(1, Ordering::SeqCst);
            async { Err(StoreError::Fatal("syntax error".into())) }
        })
        .await;

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(matches!(result, Err(StoreError::Fatal(_))));
    }
}
