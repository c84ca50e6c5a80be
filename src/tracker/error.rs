//! Error types for the tracker actor.

use crate::store::StoreError;
use thiserror::Error;

/// Errors surfaced by tracker operations.
#[derive(Debug, Error)]
pub enum TrackerError {
    /// A new order could not be persisted; the in-memory record was not
    /// added, so the active set still mirrors durable storage.
    #[error("order creation failed: {0}")]
    Creation(#[source] StoreError),

    /// A storage write required by the operation failed after retries.
    #[error("storage error: {0}")]
    Storage(#[source] StoreError),

    /// The order exists neither in the active set nor in the store.
    #[error("order not found: {0}")]
    NotFound(i64),

    /// The actor's channel is closed; the system is shutting down.
    #[error("tracker actor closed")]
    ActorClosed,

    /// The actor dropped the reply channel without answering.
    #[error("tracker actor dropped response channel")]
    ActorDropped,
}
