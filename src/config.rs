//! Environment-driven configuration.

use std::env;
use std::time::Duration;

/// Seconds between simulation ticks unless `TICK_SECS` overrides it.
const DEFAULT_TICK_SECS: u64 = 30;

#[derive(Clone, Debug)]
pub struct Config {
    /// SQLite URL, e.g. `sqlite://deprizza.db` or `sqlite::memory:`.
    pub database_url: String,
    pub host: String,
    pub port: u16,
    /// Interval between two `advance` runs of the ticker.
    pub tick_period: Duration,
}

impl Config {
    /// Reads configuration from the environment, falling back to local
    /// development defaults. Call `dotenvy::dotenv()` first if a `.env`
    /// file should participate.
    pub fn from_env() -> Self {
        let database_url =
            env::var("DATABASE_URL").unwrap_or_else(|_| "sqlite://deprizza.db".into());
        let host = env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());
        let port = env::var("PORT")
            .ok()
            .and_then(|value| value.parse().ok())
            .unwrap_or(3000);
        let tick_secs = env::var("TICK_SECS")
            .ok()
            .and_then(|value| value.parse().ok())
            .unwrap_or(DEFAULT_TICK_SECS);

        Self {
            database_url,
            host,
            port,
            tick_period: Duration::from_secs(tick_secs),
        }
    }
}
