//! Order lifecycle tracking and load simulation.
//!
//! The tracker owns the set of in-flight orders and advances each one
//! through its preparation stages as time passes. It is built from three
//! pieces:
//!
//! - [`estimate`] — pure ETA calculation from order contents and load.
//! - [`aggregate`] — pure derivation of the restaurant-wide load summary.
//! - [`actor`] — the actor that owns the active set and applies both.

pub mod actor;
pub mod aggregate;
pub mod error;
pub mod estimate;

pub use actor::{OrderReceipt, OrderTracker, Response, TrackerRequest, TrackerStats};
pub use aggregate::{load_label, summarize, StatusSummary};
pub use error::TrackerError;
pub use estimate::estimate_minutes;

use crate::clients::TrackerClient;
use tokio::sync::mpsc;

/// Queue depth for pending tracker requests.
const CHANNEL_CAPACITY: usize = 32;

/// Creates the tracker actor and its client.
///
/// The actor does nothing until [`OrderTracker::run`] is spawned with a
/// store handle; see [`crate::runtime::OrderSystem`] for the wiring.
pub fn new() -> (OrderTracker, TrackerClient) {
    let (sender, receiver) = mpsc::channel(CHANNEL_CAPACITY);
    (OrderTracker::new(receiver), TrackerClient::new(sender))
}
