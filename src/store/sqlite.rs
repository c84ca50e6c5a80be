//! SQLite-backed store.
//!
//! Uses a WAL-mode database with a single pooled connection and a 20 second
//! acquire timeout. Every port method runs under the bounded-retry wrapper;
//! sqlx errors are classified into transient (I/O, pool timeout,
//! SQLITE_BUSY/locked) and fatal before the wrapper decides whether to
//! back off.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::sqlite::{
    SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteRow, SqliteSynchronous,
};
use sqlx::{Row, SqlitePool};
use std::str::FromStr;
use std::time::Duration;
use tracing::{info, warn};

use super::{with_retry, OrderStore, StoreError};
use crate::model::{MenuItem, Order, OrderRecord, OrderStatus, RestaurantStatus};
use crate::tracker::StatusSummary;

/// Pool acquire timeout; doubles as the connection-level timeout of the
/// retry contract.
const ACQUIRE_TIMEOUT: Duration = Duration::from_secs(20);

/// The built-in menu, seeded once: (id, name, category, description, price,
/// time range).
const MENU_SEED: &[(i64, &str, &str, &str, f64, &str)] = &[
    (1, "Margherita Clásica", "clasica", "Tomato sauce, fresh mozzarella, basil, olive oil", 189.00, "15-20 min"),
    (2, "Pepperoni Supreme", "clasica", "Tomato sauce, mozzarella, extra pepperoni, oregano", 219.00, "18-23 min"),
    (3, "Cuatro Quesos", "premium", "White sauce, mozzarella, parmesan, gorgonzola, goat cheese", 269.00, "20-25 min"),
    (4, "Hawaiana Tropical", "clasica", "Tomato sauce, mozzarella, ham, fresh pineapple", 239.00, "16-21 min"),
    (5, "Vegetariana Garden", "veggie", "Tomato sauce, mozzarella, peppers, mushrooms, onion, olives", 229.00, "17-22 min"),
    (6, "Meat Lovers", "premium", "BBQ sauce, mozzarella, pepperoni, sausage, ham, bacon", 299.00, "22-27 min"),
    (7, "Mediterránea", "premium", "Pesto, mozzarella, cherry tomatoes, olives, arugula, feta", 279.00, "19-24 min"),
    (8, "Vegana Delight", "veggie", "Tomato sauce, vegan cheese, roasted vegetables, spinach", 259.00, "20-25 min"),
];

/// Initial ingredient stock: (name, stock).
const INGREDIENT_SEED: &[(&str, i64)] = &[
    ("Tomato sauce", 150),
    ("Mozzarella", 120),
    ("Pepperoni", 80),
    ("Ham", 90),
    ("Pineapple", 60),
    ("Mushrooms", 70),
    ("Peppers", 85),
    ("Olives", 55),
    ("Basil", 40),
    ("Parmesan", 45),
    ("Gorgonzola", 35),
    ("Goat cheese", 30),
];

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        match &err {
            sqlx::Error::Io(_) | sqlx::Error::PoolTimedOut => {
                StoreError::Transient(err.to_string())
            }
            sqlx::Error::Database(db) => {
                let message = db.message();
                if message.contains("locked")
                    || message.contains("busy")
                    || message.contains("I/O")
                {
                    StoreError::Transient(err.to_string())
                } else {
                    StoreError::Fatal(err.to_string())
                }
            }
            _ => StoreError::Fatal(err.to_string()),
        }
    }
}

#[derive(Clone)]
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    /// Opens (creating if missing) the database at `url`,
    /// e.g. `sqlite://deprizza.db` or `sqlite::memory:`.
    pub async fn connect(url: &str) -> Result<Self, StoreError> {
        let options = SqliteConnectOptions::from_str(url)
            .map_err(|err| StoreError::Fatal(err.to_string()))?
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal);

        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .acquire_timeout(ACQUIRE_TIMEOUT)
            .connect_with(options)
            .await?;

        Ok(Self { pool })
    }

    /// Creates the schema and seeds the menu, ingredient stock, and the
    /// singleton status row. Idempotent; retried as a whole on transient
    /// faults.
    pub async fn init(&self) -> Result<(), StoreError> {
        with_retry("init", || async move {
            self.create_schema().await?;
            self.seed().await
        })
        .await?;

        info!("database initialized");
        Ok(())
    }

    async fn create_schema(&self) -> Result<(), StoreError> {
        sqlx::query(
            "CREATE TABLE IF NOT EXISTS menu_items (
                id INTEGER PRIMARY KEY,
                name TEXT NOT NULL,
                category TEXT NOT NULL,
                description TEXT NOT NULL,
                price REAL NOT NULL,
                time_range TEXT NOT NULL,
                available INTEGER NOT NULL DEFAULT 1
            )",
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            "CREATE TABLE IF NOT EXISTS orders (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                items TEXT NOT NULL,
                total REAL NOT NULL,
                estimated_time INTEGER NOT NULL,
                customer TEXT NOT NULL,
                payment_method TEXT NOT NULL,
                status TEXT NOT NULL DEFAULT 'received',
                created_at TEXT NOT NULL,
                completed_at TEXT NULL
            )",
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            "CREATE TABLE IF NOT EXISTS ingredients (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                name TEXT UNIQUE NOT NULL,
                stock INTEGER NOT NULL DEFAULT 100,
                min_stock INTEGER NOT NULL DEFAULT 10,
                last_updated TEXT
            )",
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            "CREATE TABLE IF NOT EXISTS restaurant_status (
                id INTEGER PRIMARY KEY,
                current_orders INTEGER NOT NULL DEFAULT 0,
                average_wait_time INTEGER NOT NULL DEFAULT 25,
                status TEXT NOT NULL,
                last_updated TEXT NOT NULL
            )",
        )
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn seed(&self) -> Result<(), StoreError> {
        for &(id, name, category, description, price, time_range) in MENU_SEED {
            sqlx::query(
                "INSERT OR IGNORE INTO menu_items
                    (id, name, category, description, price, time_range, available)
                 VALUES (?, ?, ?, ?, ?, ?, 1)",
            )
            .bind(id)
            .bind(name)
            .bind(category)
            .bind(description)
            .bind(price)
            .bind(time_range)
            .execute(&self.pool)
            .await?;
        }

        for &(name, stock) in INGREDIENT_SEED {
            sqlx::query("INSERT OR IGNORE INTO ingredients (name, stock) VALUES (?, ?)")
                .bind(name)
                .bind(stock)
                .execute(&self.pool)
                .await?;
        }

        sqlx::query(
            "INSERT OR IGNORE INTO restaurant_status
                (id, current_orders, average_wait_time, status, last_updated)
             VALUES (1, 0, 25, ?, ?)",
        )
        .bind("accepting orders")
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}

fn record_from_row(row: &SqliteRow) -> Result<OrderRecord, StoreError> {
    let id: i64 = row.try_get("id")?;

    let items_json: String = row.try_get("items")?;
    let items = match serde_json::from_str(&items_json) {
        Ok(items) => items,
        Err(err) => {
            // A corrupt items column degrades to an empty list rather than
            // poisoning every listing that includes the row.
            warn!(order_id = id, error = %err, "undecodable items column");
            Vec::new()
        }
    };

    let status: OrderStatus = row
        .try_get::<String, _>("status")?
        .parse()
        .map_err(StoreError::Fatal)?;

    Ok(OrderRecord {
        id,
        items,
        total: row.try_get("total")?,
        estimated_time: row.try_get::<i64, _>("estimated_time")? as u32,
        customer: row.try_get("customer")?,
        payment_method: row.try_get("payment_method")?,
        status,
        created_at: row.try_get("created_at")?,
        completed_at: row.try_get("completed_at")?,
    })
}

#[async_trait]
impl OrderStore for SqliteStore {
    async fn insert_order(&self, order: &Order) -> Result<i64, StoreError> {
        let items = serde_json::to_string(&order.items)
            .map_err(|err| StoreError::Fatal(err.to_string()))?;

        with_retry("insert_order", || {
            let items = items.clone();
            async move {
                let result = sqlx::query(
                    "INSERT INTO orders
                        (items, total, estimated_time, customer, payment_method, status, created_at)
                     VALUES (?, ?, ?, ?, ?, ?, ?)",
                )
                .bind(items)
                .bind(order.total)
                .bind(order.estimated_time as i64)
                .bind(&order.customer)
                .bind(&order.payment_method)
                .bind(order.status.as_str())
                .bind(order.created_at)
                .execute(&self.pool)
                .await?;
                Ok(result.last_insert_rowid())
            }
        })
        .await
    }

    async fn update_order_status(
        &self,
        id: i64,
        status: OrderStatus,
        completed_at: Option<DateTime<Utc>>,
    ) -> Result<u64, StoreError> {
        with_retry("update_order_status", || async move {
            let result = sqlx::query(
                "UPDATE orders
                 SET status = ?, completed_at = COALESCE(?, completed_at)
                 WHERE id = ?",
            )
            .bind(status.as_str())
            .bind(completed_at)
            .bind(id)
            .execute(&self.pool)
            .await?;
            Ok(result.rows_affected())
        })
        .await
    }

    async fn get_order(&self, id: i64) -> Result<Option<OrderRecord>, StoreError> {
        let row = with_retry("get_order", || async move {
            Ok(sqlx::query("SELECT * FROM orders WHERE id = ?")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?)
        })
        .await?;

        row.as_ref().map(record_from_row).transpose()
    }

    async fn recent_orders(&self, limit: u32) -> Result<Vec<OrderRecord>, StoreError> {
        let rows = with_retry("recent_orders", || async move {
            Ok(
                sqlx::query("SELECT * FROM orders ORDER BY created_at DESC, id DESC LIMIT ?")
                    .bind(limit as i64)
                    .fetch_all(&self.pool)
                    .await?,
            )
        })
        .await?;

        rows.iter().map(record_from_row).collect()
    }

    async fn count_orders(&self) -> Result<i64, StoreError> {
        with_retry("count_orders", || async move {
            let row = sqlx::query("SELECT COUNT(*) AS n FROM orders")
                .fetch_one(&self.pool)
                .await?;
            Ok(row.try_get("n")?)
        })
        .await
    }

    async fn menu(&self) -> Result<Vec<MenuItem>, StoreError> {
        with_retry("menu", || async move {
            Ok(sqlx::query_as::<_, MenuItem>(
                "SELECT id, name, category, description, price, time_range, available
                 FROM menu_items WHERE available = 1 ORDER BY id",
            )
            .fetch_all(&self.pool)
            .await?)
        })
        .await
    }

    async fn upsert_restaurant_status(
        &self,
        summary: &StatusSummary,
        now: DateTime<Utc>,
    ) -> Result<(), StoreError> {
        with_retry("upsert_restaurant_status", || async move {
            sqlx::query(
                "INSERT INTO restaurant_status
                    (id, current_orders, average_wait_time, status, last_updated)
                 VALUES (1, ?, ?, ?, ?)
                 ON CONFLICT(id) DO UPDATE SET
                    current_orders = excluded.current_orders,
                    average_wait_time = excluded.average_wait_time,
                    status = excluded.status,
                    last_updated = excluded.last_updated",
            )
            .bind(summary.current_orders as i64)
            .bind(summary.average_wait_time as i64)
            .bind(summary.label)
            .bind(now)
            .execute(&self.pool)
            .await?;
            Ok(())
        })
        .await
    }

    async fn restaurant_status(&self) -> Result<Option<RestaurantStatus>, StoreError> {
        with_retry("restaurant_status", || async move {
            Ok(sqlx::query_as::<_, RestaurantStatus>(
                "SELECT current_orders, average_wait_time, status, last_updated
                 FROM restaurant_status WHERE id = 1",
            )
            .fetch_optional(&self.pool)
            .await?)
        })
        .await
    }
}
