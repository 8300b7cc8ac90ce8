use async_trait::async_trait;
use common::OrderId;
use domain::{Order, OrderStatus};

use crate::Result;
use crate::memory::{InMemoryDb, StagedChange};

/// Load/save contract for the order aggregate.
///
/// `add` and `update` stage changes; nothing becomes visible until the unit
/// of work commits.
#[async_trait]
pub trait OrderRepository: Send + Sync {
    /// Stages a new order for insertion.
    async fn add(&self, order: Order) -> Result<()>;

    /// Stages an update of an existing order.
    async fn update(&self, order: Order) -> Result<()>;

    /// Loads an order by id.
    async fn get(&self, order_id: OrderId) -> Result<Option<Order>>;

    /// Loads the oldest order in the Created status (FIFO by insertion).
    async fn get_first_in_created_status(&self) -> Result<Option<Order>>;

    /// Loads every order in the Assigned status.
    async fn get_all_in_assigned_status(&self) -> Result<Vec<Order>>;
}

/// In-memory order repository over a shared [`InMemoryDb`].
#[derive(Clone)]
pub struct InMemoryOrderRepository {
    db: InMemoryDb,
}

impl InMemoryOrderRepository {
    pub fn new(db: InMemoryDb) -> Self {
        Self { db }
    }
}

#[async_trait]
impl OrderRepository for InMemoryOrderRepository {
    async fn add(&self, order: Order) -> Result<()> {
        self.db.stage(StagedChange::InsertOrder(order)).await;
        Ok(())
    }

    async fn update(&self, order: Order) -> Result<()> {
        self.db.stage(StagedChange::UpdateOrder(order)).await;
        Ok(())
    }

    async fn get(&self, order_id: OrderId) -> Result<Option<Order>> {
        Ok(self.db.get_order(order_id).await)
    }

    async fn get_first_in_created_status(&self) -> Result<Option<Order>> {
        Ok(self
            .db
            .first_order_where(|order| order.status() == OrderStatus::Created)
            .await)
    }

    async fn get_all_in_assigned_status(&self) -> Result<Vec<Order>> {
        Ok(self
            .db
            .orders_where(|order| order.status() == OrderStatus::Assigned)
            .await)
    }
}
