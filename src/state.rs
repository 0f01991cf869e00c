use std::sync::atomic::{AtomicU64, Ordering};

use dashmap::DashMap;
use tokio::sync::broadcast;
use uuid::Uuid;

use crate::config::Config;
use crate::models::branch::Branch;
use crate::models::order::Order;
use crate::models::worker::DeliveryWorker;
use crate::observability::metrics::Metrics;

/// The shared store. Per-entry locking on the order map is what gives the
/// claim and dispatch paths their check-then-set atomicity: hold the entry
/// via `get_mut` for the whole precondition-check-plus-write.
pub struct AppState {
    pub orders: DashMap<Uuid, Order>,
    pub workers: DashMap<Uuid, DeliveryWorker>,
    pub branches: DashMap<Uuid, Branch>,
    pub order_events_tx: broadcast::Sender<Order>,
    pub metrics: Metrics,
    pub config: Config,
    order_seq: AtomicU64,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        let (order_events_tx, _unused_rx) = broadcast::channel(config.event_buffer_size);

        Self {
            orders: DashMap::new(),
            workers: DashMap::new(),
            branches: DashMap::new(),
            order_events_tx,
            metrics: Metrics::new(),
            config,
            order_seq: AtomicU64::new(0),
        }
    }

    pub fn next_order_number(&self) -> String {
        let seq = self.order_seq.fetch_add(1, Ordering::Relaxed) + 1;
        format!("{}-{seq:04}", self.config.order_number_prefix)
    }

    /// The worker's current load: assigned orders still on the road or in
    /// the kitchen. `exclude` drops the order being claimed from the count.
    pub fn active_assignments(&self, worker_id: Uuid, exclude: Uuid) -> usize {
        self.orders
            .iter()
            .filter(|entry| entry.key() != &exclude && entry.value().is_active_assignment_for(worker_id))
            .count()
    }

    /// Fan a fresh order snapshot out to connected UI clients.
    pub fn publish_order(&self, order: &Order) {
        let _ = self.order_events_tx.send(order.clone());
    }
}
