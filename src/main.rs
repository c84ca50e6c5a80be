use std::net::SocketAddr;
use std::sync::Arc;

use tracing::info;

use deprizza::api::{self, AppState};
use deprizza::config::Config;
use deprizza::runtime::{setup_tracing, OrderSystem};
use deprizza::store::sqlite::SqliteStore;
use deprizza::store::SharedStore;

#[tokio::main]
async fn main() -> Result<(), String> {
    dotenvy::dotenv().ok();
    setup_tracing();

    let config = Config::from_env();
    info!(database_url = %config.database_url, "🍕 starting deprizza");

    let store = SqliteStore::connect(&config.database_url)
        .await
        .map_err(|err| format!("database connection failed: {err}"))?;
    store
        .init()
        .await
        .map_err(|err| format!("database init failed: {err}"))?;
    let store: SharedStore = Arc::new(store);

    let system = OrderSystem::start(store.clone(), config.tick_period);

    let app = api::router(AppState {
        tracker: system.tracker.clone(),
        store,
    });

    let addr: SocketAddr = format!("{}:{}", config.host, config.port)
        .parse()
        .map_err(|err| format!("invalid HOST/PORT: {err}"))?;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|err| format!("bind failed: {err}"))?;
    info!("listening on http://{addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|err| format!("server error: {err}"))?;

    system.shutdown().await
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %err, "failed to listen for shutdown signal");
    }
    info!("shutdown signal received");
}
