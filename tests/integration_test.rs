use std::sync::Arc;
use std::time::Duration;

use chrono::{Duration as ChronoDuration, Utc};

use deprizza::model::{NewOrder, OrderItem, OrderStatus};
use deprizza::runtime::OrderSystem;
use deprizza::store::sqlite::SqliteStore;
use deprizza::store::{OrderStore, SharedStore};

/// Full-system tests: the real actor, the real ticker wiring, and a real
/// (in-memory) SQLite database.

async fn fresh_store() -> Arc<SqliteStore> {
    let store = SqliteStore::connect("sqlite::memory:")
        .await
        .expect("connect in-memory sqlite");
    store.init().await.expect("init schema and seed");
    Arc::new(store)
}

fn margherita(quantity: u32) -> NewOrder {
    NewOrder {
        items: vec![OrderItem {
            name: "Margherita Clásica".into(),
            quantity,
            price: 189.0,
        }],
        total: 189.0 * quantity as f64,
        customer: None,
        payment: None,
    }
}

// A tick period long enough that only explicit `advance` calls move the
// simulation during a test.
const QUIET_TICK: Duration = Duration::from_secs(3600);

#[tokio::test]
async fn menu_is_seeded_on_init() {
    let store = fresh_store().await;

    let menu = store.menu().await.unwrap();
    assert_eq!(menu.len(), 8);
    assert_eq!(menu[0].name, "Margherita Clásica");
    assert_eq!(menu[0].price, 189.0);
    assert_eq!(menu[0].time_range, "15-20 min");
    assert!(menu.iter().all(|item| item.available));

    // Init is idempotent: a second run must not duplicate the catalog.
    store.init().await.unwrap();
    assert_eq!(store.menu().await.unwrap().len(), 8);
}

#[tokio::test]
async fn status_row_is_seeded_idle() {
    let store = fresh_store().await;

    let row = store.restaurant_status().await.unwrap().expect("seeded row");
    assert_eq!(row.current_orders, 0);
    assert_eq!(row.average_wait_time, 25);
    assert_eq!(row.status, "accepting orders");
}

#[tokio::test]
async fn full_order_flow_against_sqlite() {
    let store = fresh_store().await;
    let shared: SharedStore = store.clone();
    let system = OrderSystem::start(shared, QUIET_TICK);

    // Create: quantity 2 on an empty kitchen -> 15 + 3.
    let receipt = system.tracker.add_order(margherita(2)).await.unwrap();
    assert_eq!(receipt.estimated_time, 18);

    let view = system.tracker.get_status(receipt.order_id).await.unwrap();
    assert_eq!(view.status, OrderStatus::Received);
    assert!(view.progress.unwrap() < 1.0);

    // The aggregate row reflects the new load (mean 18 clamps up to 20).
    let row = store.restaurant_status().await.unwrap().unwrap();
    assert_eq!(row.current_orders, 1);
    assert_eq!(row.average_wait_time, 20);
    assert_eq!(row.status, "normal operation");

    // Kitchen overrides the stage, then completes the order.
    system
        .tracker
        .set_status(receipt.order_id, OrderStatus::Ready)
        .await
        .unwrap();
    let view = system.tracker.get_status(receipt.order_id).await.unwrap();
    assert_eq!(view.status, OrderStatus::Ready);

    system
        .tracker
        .set_status(receipt.order_id, OrderStatus::Completed)
        .await
        .unwrap();
    assert!(system.tracker.list_active().await.unwrap().is_empty());

    let record = store
        .get_order(receipt.order_id)
        .await
        .unwrap()
        .expect("row persisted");
    assert_eq!(record.status, OrderStatus::Completed);
    assert!(record.completed_at.is_some());
    assert_eq!(record.items.len(), 1);
    assert_eq!(record.items[0].quantity, 2);
    assert_eq!(record.customer, "Cliente");

    // The aggregate is back to idle.
    let row = store.restaurant_status().await.unwrap().unwrap();
    assert_eq!(row.current_orders, 0);
    assert_eq!(row.status, "accepting orders");

    system.shutdown().await.unwrap();
}

#[tokio::test]
async fn simulated_completion_is_persisted() {
    let store = fresh_store().await;
    let shared: SharedStore = store.clone();
    let system = OrderSystem::start(shared, QUIET_TICK);

    let receipt = system.tracker.add_order(margherita(1)).await.unwrap();
    assert_eq!(receipt.estimated_time, 15);

    // Drive the tick well past the ETA by hand.
    let retired = system
        .tracker
        .advance(Utc::now() + ChronoDuration::minutes(20))
        .await
        .unwrap();
    assert_eq!(retired, 1);

    let record = store
        .get_order(receipt.order_id)
        .await
        .unwrap()
        .expect("row persisted");
    assert_eq!(record.status, OrderStatus::Completed);
    assert!(record.completed_at.is_some());

    // Status now comes from the store: no live progress anymore.
    let view = system.tracker.get_status(receipt.order_id).await.unwrap();
    assert_eq!(view.progress, None);
    assert_eq!(view.status, OrderStatus::Completed);

    system.shutdown().await.unwrap();
}

#[tokio::test]
async fn listings_and_counts_see_every_order() {
    let store = fresh_store().await;
    let shared: SharedStore = store.clone();
    let system = OrderSystem::start(shared, QUIET_TICK);

    let first = system.tracker.add_order(margherita(1)).await.unwrap();
    let second = system.tracker.add_order(margherita(3)).await.unwrap();

    assert_eq!(store.count_orders().await.unwrap(), 2);

    let recent = store.recent_orders(50).await.unwrap();
    assert_eq!(recent.len(), 2);
    let ids: Vec<i64> = recent.iter().map(|record| record.id).collect();
    assert!(ids.contains(&first.order_id));
    assert!(ids.contains(&second.order_id));

    let active = system.tracker.list_active().await.unwrap();
    assert_eq!(active.len(), 2);
    assert!(active
        .iter()
        .all(|summary| summary.status == OrderStatus::Received));

    system.shutdown().await.unwrap();
}

#[tokio::test]
async fn update_on_unknown_id_affects_nothing() {
    let store = fresh_store().await;

    let affected = store
        .update_order_status(424242, OrderStatus::Ready, None)
        .await
        .unwrap();
    assert_eq!(affected, 0);
    assert!(store.get_order(424242).await.unwrap().is_none());
}
