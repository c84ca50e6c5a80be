//! The simulation heartbeat.

use chrono::Utc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};

use crate::clients::TrackerClient;
use crate::tracker::TrackerError;

/// Drives the tracker on a fixed interval until told to stop.
///
/// This loop is the only driver of order completion, so it must outlive any
/// single bad iteration: a failed tick is logged and the next interval runs
/// as usual. It exits on the shutdown signal (sender dropped or fired) or
/// once the actor's channel closes.
pub async fn run(client: TrackerClient, period: Duration, mut shutdown: watch::Receiver<bool>) {
    let mut interval = tokio::time::interval(period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
    info!(period_secs = period.as_secs(), "Ticker started");

    loop {
        tokio::select! {
            _ = interval.tick() => {
                match client.advance(Utc::now()).await {
                    Ok(0) => debug!("tick: nothing to retire"),
                    Ok(completed) => info!(completed, "tick: orders retired"),
                    Err(TrackerError::ActorClosed | TrackerError::ActorDropped) => {
                        info!("Ticker stopping: tracker gone");
                        break;
                    }
                    Err(err) => warn!(error = %err, "tick failed"),
                }
            }
            _ = shutdown.changed() => {
                info!("Ticker stopping: shutdown requested");
                break;
            }
        }
    }
}
