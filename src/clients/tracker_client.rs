use chrono::{DateTime, Utc};
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, instrument};

use crate::model::{ActiveOrderSummary, NewOrder, OrderStatus, OrderStatusView};
use crate::tracker::{OrderReceipt, TrackerError, TrackerRequest, TrackerStats};

/// Client for the tracker actor.
///
/// Cloneable and cheap to share: every HTTP handler and the background
/// ticker hold one. Each method sends a request over the actor's channel
/// and awaits the reply; a closed channel surfaces as
/// [`TrackerError::ActorClosed`] / [`TrackerError::ActorDropped`].
#[derive(Clone)]
pub struct TrackerClient {
    sender: mpsc::Sender<TrackerRequest>,
}

impl TrackerClient {
    pub fn new(sender: mpsc::Sender<TrackerRequest>) -> Self {
        Self { sender }
    }

    async fn request<T>(
        &self,
        make: impl FnOnce(oneshot::Sender<Result<T, TrackerError>>) -> TrackerRequest,
    ) -> Result<T, TrackerError> {
        let (respond_to, response) = oneshot::channel();
        self.sender
            .send(make(respond_to))
            .await
            .map_err(|_| TrackerError::ActorClosed)?;
        response.await.map_err(|_| TrackerError::ActorDropped)?
    }

    /// Creates an order and returns its durable id plus quoted ETA.
    #[instrument(skip(self, params))]
    pub async fn add_order(&self, params: NewOrder) -> Result<OrderReceipt, TrackerError> {
        debug!(items = params.items.len(), "sending AddOrder");
        self.request(|respond_to| TrackerRequest::AddOrder { params, respond_to })
            .await
    }

    /// Drives one simulation tick. Invoked by the ticker, not by request
    /// handlers. Returns the number of orders retired this tick.
    pub async fn advance(&self, now: DateTime<Utc>) -> Result<usize, TrackerError> {
        self.request(|respond_to| TrackerRequest::Advance { now, respond_to })
            .await
    }

    /// Overrides an order's status (kitchen staff action).
    #[instrument(skip(self))]
    pub async fn set_status(&self, id: i64, status: OrderStatus) -> Result<(), TrackerError> {
        debug!("sending SetStatus");
        self.request(|respond_to| TrackerRequest::SetStatus { id, status, respond_to })
            .await
    }

    /// Status snapshot for one order, live progress included while active.
    pub async fn get_status(&self, id: i64) -> Result<OrderStatusView, TrackerError> {
        self.request(|respond_to| TrackerRequest::GetStatus { id, respond_to })
            .await
    }

    /// Summaries of the active set, for admin and debug listings.
    pub async fn list_active(&self) -> Result<Vec<ActiveOrderSummary>, TrackerError> {
        self.request(|respond_to| TrackerRequest::ListActive { respond_to })
            .await
    }

    /// Simulation counters.
    pub async fn stats(&self) -> Result<TrackerStats, TrackerError> {
        self.request(|respond_to| TrackerRequest::Stats { respond_to })
            .await
    }
}
