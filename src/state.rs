//! Snapshot cache for fetched order and driver lists. Server-side state moves
//! underneath this process on every mutation, so the cache is read-through with
//! explicit invalidation and a staleness window rather than a durable store.

use std::sync::RwLock;

use chrono::{DateTime, Duration, Utc};
use dashmap::DashMap;

use crate::models::driver::Driver;
use crate::models::order::Order;

#[derive(Debug, Clone)]
struct Snapshot<T> {
    value: T,
    fetched_at: DateTime<Utc>,
}

impl<T> Snapshot<T> {
    fn new(value: T) -> Self {
        Self {
            value,
            fetched_at: Utc::now(),
        }
    }

    fn age(&self) -> Duration {
        Utc::now() - self.fetched_at
    }
}

pub struct SnapshotCache {
    // Orders keyed by restaurant id; drivers are a single fleet-wide list.
    orders: DashMap<String, Snapshot<Vec<Order>>>,
    drivers: RwLock<Option<Snapshot<Vec<Driver>>>>,
    max_age: Duration,
}

impl SnapshotCache {
    pub fn new(max_age: Duration) -> Self {
        Self {
            orders: DashMap::new(),
            drivers: RwLock::new(None),
            max_age,
        }
    }

    /// Cached orders for one restaurant, or `None` when absent or stale.
    pub fn orders(&self, restaurant_id: &str) -> Option<Vec<Order>> {
        let entry = self.orders.get(restaurant_id)?;
        if entry.age() < self.max_age {
            Some(entry.value.clone())
        } else {
            None
        }
    }

    pub fn put_orders(&self, restaurant_id: &str, orders: Vec<Order>) {
        self.orders
            .insert(restaurant_id.to_string(), Snapshot::new(orders));
    }

    pub fn invalidate_orders(&self, restaurant_id: &str) {
        self.orders.remove(restaurant_id);
    }

    /// Drops every cached order list. Used after mutations that are not scoped
    /// to a known restaurant, e.g. per-order driver assignment.
    pub fn invalidate_all_orders(&self) {
        self.orders.clear();
    }

    pub fn drivers(&self) -> Option<Vec<Driver>> {
        let guard = match self.drivers.read() {
            Ok(guard) => guard,
            Err(_) => return None,
        };
        let entry = guard.as_ref()?;
        if entry.age() < self.max_age {
            Some(entry.value.clone())
        } else {
            None
        }
    }

    pub fn put_drivers(&self, drivers: Vec<Driver>) {
        if let Ok(mut guard) = self.drivers.write() {
            *guard = Some(Snapshot::new(drivers));
        }
    }

    pub fn invalidate_drivers(&self) {
        if let Ok(mut guard) = self.drivers.write() {
            *guard = None;
        }
    }
}
