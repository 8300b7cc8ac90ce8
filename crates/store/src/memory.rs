//! Shared in-memory backend for the reference adapters.
//!
//! A single [`InMemoryDb`] plays the role of the database: repositories stage
//! inserts and updates against it, and the unit of work applies all staged
//! changes plus the pending integration events as one atomic commit with
//! versioned last-writer-detection.

use std::collections::HashMap;
use std::sync::Arc;

use common::{CourierId, OrderId, Version};
use domain::{Courier, Order};
use tokio::sync::RwLock;

use crate::error::StoreError;
use crate::event::IntegrationEvent;
use crate::outbox::OutboxEntry;

/// A change staged by a repository, not yet committed.
#[derive(Debug, Clone)]
pub(crate) enum StagedChange {
    InsertOrder(Order),
    UpdateOrder(Order),
    InsertCourier(Courier),
    UpdateCourier(Courier),
}

#[derive(Debug)]
struct OrderRecord {
    order: Order,
    /// Insertion sequence, the FIFO key for "first in Created status".
    seq: u64,
}

#[derive(Debug, Default)]
pub(crate) struct DbInner {
    next_seq: u64,
    orders: HashMap<OrderId, OrderRecord>,
    couriers: HashMap<CourierId, Courier>,
    staged: Vec<StagedChange>,
    outbox: Vec<OutboxEntry>,
}

/// In-memory database shared by the repositories and the unit of work.
#[derive(Clone, Default)]
pub struct InMemoryDb {
    inner: Arc<RwLock<DbInner>>,
}

impl InMemoryDb {
    /// Creates a new empty database.
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) async fn stage(&self, change: StagedChange) {
        self.inner.write().await.staged.push(change);
    }

    pub(crate) async fn get_order(&self, order_id: OrderId) -> Option<Order> {
        self.inner
            .read()
            .await
            .orders
            .get(&order_id)
            .map(|record| record.order.clone())
    }

    pub(crate) async fn first_order_where(
        &self,
        predicate: impl Fn(&Order) -> bool,
    ) -> Option<Order> {
        self.inner
            .read()
            .await
            .orders
            .values()
            .filter(|record| predicate(&record.order))
            .min_by_key(|record| record.seq)
            .map(|record| record.order.clone())
    }

    pub(crate) async fn orders_where(&self, predicate: impl Fn(&Order) -> bool) -> Vec<Order> {
        let inner = self.inner.read().await;
        let mut records: Vec<&OrderRecord> = inner
            .orders
            .values()
            .filter(|record| predicate(&record.order))
            .collect();
        records.sort_by_key(|record| record.seq);
        records.iter().map(|record| record.order.clone()).collect()
    }

    pub(crate) async fn get_courier(&self, courier_id: CourierId) -> Option<Courier> {
        self.inner.read().await.couriers.get(&courier_id).cloned()
    }

    pub(crate) async fn couriers_where(
        &self,
        predicate: impl Fn(&Courier) -> bool,
    ) -> Vec<Courier> {
        let mut couriers: Vec<Courier> = self
            .inner
            .read()
            .await
            .couriers
            .values()
            .filter(|courier| predicate(courier))
            .cloned()
            .collect();
        // Stable iteration order keeps dispatch tie-breaking deterministic.
        couriers.sort_by_key(|courier| courier.id().as_uuid());
        couriers
    }

    /// Applies all staged changes and appends `events` to the outbox as one
    /// atomic commit.
    ///
    /// The staged queue is drained up front: a validation failure discards
    /// the whole batch and applies nothing. Updates are validated against the
    /// stored version (fail the save if the record changed since load).
    pub(crate) async fn commit(&self, events: Vec<IntegrationEvent>) -> Result<(), StoreError> {
        let mut inner = self.inner.write().await;
        let staged = std::mem::take(&mut inner.staged);

        for change in &staged {
            match change {
                StagedChange::InsertOrder(order) => {
                    if inner.orders.contains_key(&order.id()) {
                        return Err(StoreError::OrderAlreadyExists(order.id()));
                    }
                }
                StagedChange::UpdateOrder(order) => {
                    let record = inner
                        .orders
                        .get(&order.id())
                        .ok_or(StoreError::OrderNotFound(order.id()))?;
                    if record.order.version() != order.version() {
                        return Err(StoreError::ConcurrencyConflict {
                            aggregate: format!("order {}", order.id()),
                            expected: order.version(),
                            actual: record.order.version(),
                        });
                    }
                }
                StagedChange::InsertCourier(courier) => {
                    if inner.couriers.contains_key(&courier.id()) {
                        return Err(StoreError::CourierAlreadyExists(courier.id()));
                    }
                }
                StagedChange::UpdateCourier(courier) => {
                    let stored = inner
                        .couriers
                        .get(&courier.id())
                        .ok_or(StoreError::CourierNotFound(courier.id()))?;
                    if stored.version() != courier.version() {
                        return Err(StoreError::ConcurrencyConflict {
                            aggregate: format!("courier {}", courier.id()),
                            expected: courier.version(),
                            actual: stored.version(),
                        });
                    }
                }
            }
        }

        for change in staged {
            match change {
                StagedChange::InsertOrder(mut order) => {
                    // Events never persist with the aggregate; they travel
                    // through the outbox.
                    let _ = order.take_events();
                    order.set_version(Version::first());
                    let seq = inner.next_seq;
                    inner.next_seq += 1;
                    inner.orders.insert(order.id(), OrderRecord { order, seq });
                }
                StagedChange::UpdateOrder(mut order) => {
                    let _ = order.take_events();
                    order.set_version(order.version().next());
                    if let Some(record) = inner.orders.get_mut(&order.id()) {
                        record.order = order;
                    }
                }
                StagedChange::InsertCourier(mut courier) => {
                    courier.set_version(Version::first());
                    inner.couriers.insert(courier.id(), courier);
                }
                StagedChange::UpdateCourier(mut courier) => {
                    courier.set_version(courier.version().next());
                    inner.couriers.insert(courier.id(), courier);
                }
            }
        }

        inner
            .outbox
            .extend(events.into_iter().map(OutboxEntry::new));

        Ok(())
    }

    /// Drops all staged, uncommitted changes.
    pub(crate) async fn discard_staged(&self) {
        self.inner.write().await.staged.clear();
    }

    pub(crate) async fn unpublished_events(&self) -> Vec<IntegrationEvent> {
        self.inner
            .read()
            .await
            .outbox
            .iter()
            .filter(|entry| entry.published_at.is_none())
            .map(|entry| entry.event.clone())
            .collect()
    }

    pub(crate) async fn mark_published(&self, event_id: common::EventId) {
        let mut inner = self.inner.write().await;
        if let Some(entry) = inner
            .outbox
            .iter_mut()
            .find(|entry| entry.event.event_id == event_id)
        {
            entry.published_at = Some(chrono::Utc::now());
        }
    }

    /// Returns a snapshot of the whole outbox, for inspection in tests.
    pub async fn outbox(&self) -> Vec<OutboxEntry> {
        self.inner.read().await.outbox.clone()
    }

    /// Number of currently staged, uncommitted changes.
    pub async fn staged_count(&self) -> usize {
        self.inner.read().await.staged.len()
    }
}
