//! Runtime orchestration and lifecycle management.
//!
//! - [`OrderSystem`] — spawns the tracker actor and the periodic ticker,
//!   wires them to the store, and owns graceful shutdown.
//! - [`ticker`] — the background loop that drives the simulation.
//! - [`setup_tracing`] — observability bootstrap.

pub mod order_system;
pub mod ticker;
pub mod tracing;

pub use order_system::*;
pub use tracing::*;
