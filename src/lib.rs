//! # Deprizza
//!
//! > **Order-tracking backend for a pizza restaurant.**
//!
//! Serves a menu, accepts orders, and simulates each order's progress
//! through the kitchen so a chef panel and a customer view can poll status.
//! The heart of the crate is an in-memory lifecycle simulation: a single
//! actor owns the set of in-flight orders, and a background ticker advances
//! every order through its preparation stages based on elapsed time,
//! reconciling with SQLite along the way.
//!
//! ## Concurrency Model
//!
//! The active-order set is shared between HTTP handlers (create, override,
//! query) and the periodic ticker. Instead of wrapping it in a lock, one
//! Tokio task owns it outright and processes messages sequentially; everyone
//! else holds a [`clients::TrackerClient`] and awaits replies over oneshot
//! channels. Message passing *is* the mutual exclusion.
//!
//! ## Module Tour
//!
//! - [`model`] — pure data: orders, menu items, the restaurant aggregate.
//! - [`tracker`] — the simulation: ETA estimation, the load aggregator, and
//!   the actor that owns the active set.
//! - [`clients`] — the typed async facade over the actor's channel.
//! - [`store`] — the persistence port, its SQLite implementation (bounded
//!   retries with exponential backoff), and an in-memory double for tests.
//! - [`api`] — the axum HTTP facade.
//! - [`runtime`] — orchestration: system wiring, the ticker, tracing setup.
//! - [`config`] — environment-driven settings.
//!
//! ## Durability Contract
//!
//! Every order in the active set has a durable row: creation persists
//! before the order is tracked in memory, and fails outright if storage is
//! unreachable. The reverse direction is deliberately looser — completions
//! discovered by the ticker are persisted best-effort, because the
//! simulation must not stall when storage misbehaves. Dropped writes are
//! counted and exposed through the debug endpoint.
//!
//! ## Running
//!
//! ```bash
//! RUST_LOG=info cargo run
//! ```
//!
//! Configuration comes from the environment (optionally a `.env` file):
//! `DATABASE_URL`, `HOST`, `PORT`, `TICK_SECS`.

pub mod api;
pub mod clients;
pub mod config;
pub mod model;
pub mod runtime;
pub mod store;
pub mod tracker;
