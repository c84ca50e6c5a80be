use std::time::Duration;
use tokio::sync::watch;
use tracing::{error, info};

use crate::clients::TrackerClient;
use crate::runtime::ticker;
use crate::store::SharedStore;
use crate::tracker;

/// The running order-tracking system: one tracker actor plus one ticker.
///
/// `OrderSystem::start` wires everything together:
/// 1. Creates the tracker actor and its client.
/// 2. Spawns the actor's event loop with the store injected.
/// 3. Spawns the ticker that advances the simulation every `tick_period`.
///
/// The public [`TrackerClient`] is cloneable; hand copies to whoever needs
/// to talk to the simulation (the HTTP facade, tests).
pub struct OrderSystem {
    /// Client for the tracker actor.
    pub tracker: TrackerClient,

    /// Tells the ticker to stop scheduling runs.
    stop: watch::Sender<bool>,

    /// Task handles for the actor and the ticker, joined on shutdown.
    handles: Vec<tokio::task::JoinHandle<()>>,
}

impl OrderSystem {
    /// Starts the actor and the ticker against the given store.
    pub fn start(store: SharedStore, tick_period: Duration) -> Self {
        let (actor, tracker) = tracker::new();
        let actor_handle = tokio::spawn(actor.run(store));

        let (stop, stop_rx) = watch::channel(false);
        let ticker_handle = tokio::spawn(ticker::run(tracker.clone(), tick_period, stop_rx));

        Self {
            tracker,
            stop,
            handles: vec![actor_handle, ticker_handle],
        }
    }

    /// Gracefully shuts the system down.
    ///
    /// Stops the ticker first (no new runs get scheduled), then drops the
    /// system's client so the actor drains its queue and exits once every
    /// outstanding clone is gone, then joins both tasks.
    pub async fn shutdown(self) -> Result<(), String> {
        info!("Shutting down order system...");

        let _ = self.stop.send(true);
        drop(self.tracker);

        for handle in self.handles {
            if let Err(err) = handle.await {
                error!("task failed: {err:?}");
                return Err(format!("task failed: {err:?}"));
            }
        }

        info!("Order system shutdown complete.");
        Ok(())
    }
}
