//! In-memory store double for tests.
//!
//! Behaves like the real store for the happy paths and lets tests script
//! failures per operation family, standing in for a storage layer whose
//! retries are already exhausted. Ships in the library (not behind
//! `cfg(test)`) so the integration suites can drive the real actor
//! against it.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use super::{OrderStore, StoreError, MAX_ATTEMPTS};
use crate::model::{MenuItem, Order, OrderRecord, OrderStatus, RestaurantStatus};
use crate::tracker::StatusSummary;

fn unavailable() -> StoreError {
    StoreError::Unavailable {
        attempts: MAX_ATTEMPTS,
        last_error: "injected fault".into(),
    }
}

#[derive(Default)]
struct Inner {
    next_id: i64,
    orders: HashMap<i64, OrderRecord>,
    status_row: Option<RestaurantStatus>,
    menu: Vec<MenuItem>,
}

/// Stateful fake of the store port with scripted failure injection.
#[derive(Default)]
pub struct MemoryStore {
    inner: Mutex<Inner>,
    fail_inserts: AtomicBool,
    fail_updates: AtomicBool,
    fail_status_upserts: AtomicBool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every `insert_order` fail with `Unavailable`.
    pub fn fail_inserts(&self, fail: bool) {
        self.fail_inserts.store(fail, Ordering::SeqCst);
    }

    /// Make every `update_order_status` fail with `Unavailable`.
    pub fn fail_updates(&self, fail: bool) {
        self.fail_updates.store(fail, Ordering::SeqCst);
    }

    /// Make every `upsert_restaurant_status` fail with `Unavailable`.
    pub fn fail_status_upserts(&self, fail: bool) {
        self.fail_status_upserts.store(fail, Ordering::SeqCst);
    }

    pub fn set_menu(&self, menu: Vec<MenuItem>) {
        self.inner.lock().unwrap().menu = menu;
    }

    /// Direct look at a persisted row, bypassing the port.
    pub fn record(&self, id: i64) -> Option<OrderRecord> {
        self.inner.lock().unwrap().orders.get(&id).cloned()
    }

    /// Direct look at the aggregate row, bypassing the port.
    pub fn status_row(&self) -> Option<RestaurantStatus> {
        self.inner.lock().unwrap().status_row.clone()
    }

    pub fn order_count(&self) -> usize {
        self.inner.lock().unwrap().orders.len()
    }
}

#[async_trait]
impl OrderStore for MemoryStore {
    async fn insert_order(&self, order: &Order) -> Result<i64, StoreError> {
        if self.fail_inserts.load(Ordering::SeqCst) {
            return Err(unavailable());
        }

        let mut inner = self.inner.lock().unwrap();
        inner.next_id += 1;
        let id = inner.next_id;
        inner.orders.insert(
            id,
            OrderRecord {
                id,
                items: order.items.clone(),
                total: order.total,
                estimated_time: order.estimated_time,
                customer: order.customer.clone(),
                payment_method: order.payment_method.clone(),
                status: order.status,
                created_at: order.created_at,
                completed_at: None,
            },
        );
        Ok(id)
    }

    async fn update_order_status(
        &self,
        id: i64,
        status: OrderStatus,
        completed_at: Option<DateTime<Utc>>,
    ) -> Result<u64, StoreError> {
        if self.fail_updates.load(Ordering::SeqCst) {
            return Err(unavailable());
        }

        let mut inner = self.inner.lock().unwrap();
        match inner.orders.get_mut(&id) {
            Some(record) => {
                record.status = status;
                if completed_at.is_some() {
                    record.completed_at = completed_at;
                }
                Ok(1)
            }
            None => Ok(0),
        }
    }

    async fn get_order(&self, id: i64) -> Result<Option<OrderRecord>, StoreError> {
        Ok(self.inner.lock().unwrap().orders.get(&id).cloned())
    }

    async fn recent_orders(&self, limit: u32) -> Result<Vec<OrderRecord>, StoreError> {
        let inner = self.inner.lock().unwrap();
        let mut records: Vec<_> = inner.orders.values().cloned().collect();
        records.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        records.truncate(limit as usize);
        Ok(records)
    }

    async fn count_orders(&self) -> Result<i64, StoreError> {
        Ok(self.inner.lock().unwrap().orders.len() as i64)
    }

    async fn menu(&self) -> Result<Vec<MenuItem>, StoreError> {
        Ok(self.inner.lock().unwrap().menu.clone())
    }

    async fn upsert_restaurant_status(
        &self,
        summary: &StatusSummary,
        now: DateTime<Utc>,
    ) -> Result<(), StoreError> {
        if self.fail_status_upserts.load(Ordering::SeqCst) {
            return Err(unavailable());
        }

        self.inner.lock().unwrap().status_row = Some(RestaurantStatus {
            current_orders: summary.current_orders as i64,
            average_wait_time: summary.average_wait_time as i64,
            status: summary.label.to_string(),
            last_updated: now,
        });
        Ok(())
    }

    async fn restaurant_status(&self) -> Result<Option<RestaurantStatus>, StoreError> {
        Ok(self.inner.lock().unwrap().status_row.clone())
    }
}
