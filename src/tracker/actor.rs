//! The tracker actor: exclusive owner of the active-order set.
//!
//! One Tokio task runs [`OrderTracker::run`] and processes requests
//! sequentially, so the active set needs no locks. Request handlers and the
//! background ticker talk to it through [`TrackerClient`], which sends a
//! [`TrackerRequest`] and awaits the reply on a oneshot channel.
//!
//! [`TrackerClient`]: crate::clients::TrackerClient

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, info, warn};

use super::error::TrackerError;
use super::{aggregate, estimate};
use crate::model::{ActiveOrderSummary, NewOrder, Order, OrderStatus, OrderStatusView};
use crate::store::SharedStore;

/// Progress thresholds mapping to preparation stages, highest band first.
const READY_AT: f64 = 75.0;
const COOKING_AT: f64 = 50.0;
const PREPARING_AT: f64 = 25.0;

/// One-shot reply channel for tracker operations.
pub type Response<T> = oneshot::Sender<Result<T, TrackerError>>;

/// Requests understood by the tracker actor.
#[derive(Debug)]
pub enum TrackerRequest {
    /// Create an order: estimate, persist, then track in memory.
    AddOrder {
        params: NewOrder,
        respond_to: Response<OrderReceipt>,
    },
    /// One simulation tick: recompute progress for every active order and
    /// retire the ones that reached 100%. Sent only by the ticker.
    Advance {
        now: DateTime<Utc>,
        respond_to: Response<usize>,
    },
    /// External status override (kitchen staff action).
    SetStatus {
        id: i64,
        status: OrderStatus,
        respond_to: Response<()>,
    },
    /// Status snapshot: active set first, store fallback.
    GetStatus {
        id: i64,
        respond_to: Response<OrderStatusView>,
    },
    /// `{id, status, progress}` summaries of the active set.
    ListActive {
        respond_to: Response<Vec<ActiveOrderSummary>>,
    },
    /// Simulation counters, including best-effort persistence failures.
    Stats { respond_to: Response<TrackerStats> },
}

/// Reply to a successful order creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrderReceipt {
    pub order_id: i64,
    pub estimated_time: u32,
}

/// Live counters of the simulation.
///
/// The persist-failure counters make the accepted inconsistency window of
/// best-effort writes observable: completions and aggregate upserts that
/// could not be stored are counted here instead of failing the simulation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TrackerStats {
    pub active_orders: usize,
    pub completion_persist_failures: u64,
    pub status_persist_failures: u64,
}

/// Maps a progress percentage to the stage it implies, if any.
///
/// Below 25% no band applies and the current status is left alone — which
/// is what lets a manual override survive until progress catches up.
fn status_for_progress(progress: f64) -> Option<OrderStatus> {
    if progress >= READY_AT {
        Some(OrderStatus::Ready)
    } else if progress >= COOKING_AT {
        Some(OrderStatus::Cooking)
    } else if progress >= PREPARING_AT {
        Some(OrderStatus::Preparing)
    } else {
        None
    }
}

/// The actor. Owns the active set and the simulation counters; state is
/// touched only from its own event loop.
pub struct OrderTracker {
    receiver: mpsc::Receiver<TrackerRequest>,
    active: Vec<Order>,
    completion_persist_failures: u64,
    status_persist_failures: u64,
}

impl OrderTracker {
    pub(crate) fn new(receiver: mpsc::Receiver<TrackerRequest>) -> Self {
        Self {
            receiver,
            active: Vec::new(),
            completion_persist_failures: 0,
            status_persist_failures: 0,
        }
    }

    /// Event loop. The store handle is injected here, not at construction,
    /// so the same actor wiring works against SQLite in production and the
    /// in-memory store in tests.
    pub async fn run(mut self, store: SharedStore) {
        info!("Order tracker started");

        while let Some(msg) = self.receiver.recv().await {
            match msg {
                TrackerRequest::AddOrder { params, respond_to } => {
                    let _ = respond_to.send(self.add_order(params, &store).await);
                }
                TrackerRequest::Advance { now, respond_to } => {
                    let _ = respond_to.send(Ok(self.advance(now, &store).await));
                }
                TrackerRequest::SetStatus { id, status, respond_to } => {
                    let _ = respond_to.send(self.set_status(id, status, &store).await);
                }
                TrackerRequest::GetStatus { id, respond_to } => {
                    let _ = respond_to.send(self.get_status(id, &store).await);
                }
                TrackerRequest::ListActive { respond_to } => {
                    let summaries = self.active.iter().map(Order::summary).collect();
                    let _ = respond_to.send(Ok(summaries));
                }
                TrackerRequest::Stats { respond_to } => {
                    let _ = respond_to.send(Ok(self.stats()));
                }
            }
        }

        info!(active = self.active.len(), "Order tracker shut down");
    }

    fn stats(&self) -> TrackerStats {
        TrackerStats {
            active_orders: self.active.len(),
            completion_persist_failures: self.completion_persist_failures,
            status_persist_failures: self.status_persist_failures,
        }
    }

    /// Creates an order. The ETA is computed against the load *before* the
    /// new order joins the set, and the order is only tracked in memory once
    /// the store has handed back a durable id — every active-set member has
    /// a durable counterpart.
    async fn add_order(
        &mut self,
        params: NewOrder,
        store: &SharedStore,
    ) -> Result<OrderReceipt, TrackerError> {
        let estimated_time = estimate::estimate_minutes(&params.items, self.active.len());
        debug!(estimated_time, active = self.active.len(), "AddOrder");

        let mut order = Order::new(0, params, estimated_time, Utc::now());
        let id = store
            .insert_order(&order)
            .await
            .map_err(TrackerError::Creation)?;
        order.id = id;
        self.active.push(order);

        info!(order_id = id, estimated_time, active = self.active.len(), "Order created");
        self.persist_aggregate(store).await;

        Ok(OrderReceipt {
            order_id: id,
            estimated_time,
        })
    }

    /// One tick of the simulation. Returns the number of orders retired.
    ///
    /// Completion persistence is best-effort: a storage failure is logged
    /// and counted but never keeps the order in the set, so the simulation
    /// cannot stall because storage is unreachable.
    async fn advance(&mut self, now: DateTime<Utc>, store: &SharedStore) -> usize {
        let mut completed = Vec::new();

        for order in &mut self.active {
            order.progress = order.progress_at(now);
            if order.progress >= 100.0 {
                order.status = OrderStatus::Completed;
                completed.push(order.id);
            } else if let Some(stage) = status_for_progress(order.progress) {
                order.status = stage;
            }
        }

        for &id in &completed {
            match store
                .update_order_status(id, OrderStatus::Completed, Some(now))
                .await
            {
                Ok(_) => info!(order_id = id, "Order completed"),
                Err(err) => {
                    self.completion_persist_failures += 1;
                    warn!(order_id = id, error = %err, "completion not persisted");
                }
            }
        }

        if !completed.is_empty() {
            self.active.retain(|order| !completed.contains(&order.id));
            self.persist_aggregate(store).await;
        }

        completed.len()
    }

    /// External override. The persisted update always runs; the in-memory
    /// status is overwritten when the order is active, even when that
    /// desynchronizes it from progress. A terminal override retires the
    /// order from the active set immediately.
    async fn set_status(
        &mut self,
        id: i64,
        status: OrderStatus,
        store: &SharedStore,
    ) -> Result<(), TrackerError> {
        let completed_at = if status.is_terminal() {
            Some(Utc::now())
        } else {
            None
        };

        let affected = store
            .update_order_status(id, status, completed_at)
            .await
            .map_err(TrackerError::Storage)?;

        let mut in_active = false;
        if let Some(order) = self.active.iter_mut().find(|order| order.id == id) {
            order.status = status;
            in_active = true;
        }

        if affected == 0 && !in_active {
            return Err(TrackerError::NotFound(id));
        }

        info!(order_id = id, status = %status, "Status overridden");

        if in_active && status.is_terminal() {
            self.active.retain(|order| order.id != id);
            self.persist_aggregate(store).await;
        }

        Ok(())
    }

    /// Status snapshot. The active set is authoritative for in-flight
    /// orders since it carries live progress; completed orders come back
    /// from the store.
    async fn get_status(
        &self,
        id: i64,
        store: &SharedStore,
    ) -> Result<OrderStatusView, TrackerError> {
        if let Some(order) = self.active.iter().find(|order| order.id == id) {
            return Ok(OrderStatusView {
                order_id: id,
                status: order.status,
                progress: Some(order.progress),
                estimated_time: order.estimated_time,
                created_at: order.created_at,
                completed_at: None,
            });
        }

        match store.get_order(id).await.map_err(TrackerError::Storage)? {
            Some(record) => Ok(OrderStatusView {
                order_id: id,
                status: record.status,
                progress: None,
                estimated_time: record.estimated_time,
                created_at: record.created_at,
                completed_at: record.completed_at,
            }),
            None => Err(TrackerError::NotFound(id)),
        }
    }

    /// Recomputes and persists the restaurant aggregate, best-effort.
    async fn persist_aggregate(&mut self, store: &SharedStore) {
        let summary = aggregate::summarize(&self.active);
        match store.upsert_restaurant_status(&summary, Utc::now()).await {
            Ok(()) => debug!(
                current_orders = summary.current_orders,
                average_wait_time = summary.average_wait_time,
                label = summary.label,
                "Aggregate updated"
            ),
            Err(err) => {
                self.status_persist_failures += 1;
                warn!(error = %err, "restaurant status not persisted");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bands_are_evaluated_highest_first() {
        assert_eq!(status_for_progress(0.0), None);
        assert_eq!(status_for_progress(24.9), None);
        assert_eq!(status_for_progress(25.0), Some(OrderStatus::Preparing));
        assert_eq!(status_for_progress(49.9), Some(OrderStatus::Preparing));
        assert_eq!(status_for_progress(50.0), Some(OrderStatus::Cooking));
        assert_eq!(status_for_progress(75.0), Some(OrderStatus::Ready));
        assert_eq!(status_for_progress(99.9), Some(OrderStatus::Ready));
    }
}
