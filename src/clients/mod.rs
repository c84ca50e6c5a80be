//! Type-safe async facade over the tracker actor's message channel.

pub mod tracker_client;

pub use tracker_client::*;
