/// Initializes structured logging for the application.
///
/// Uses the `tracing` crate with environment-based filtering (`RUST_LOG`),
/// a compact format, and no module-path targets — log lines stay short
/// while keeping their structured fields.
///
/// ```bash
/// RUST_LOG=info cargo run      # operational logs
/// RUST_LOG=debug cargo run     # per-request payload fields
/// RUST_LOG=deprizza=debug cargo run
/// ```
pub fn setup_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_target(false)
        .compact()
        .init();
}
