use async_trait::async_trait;
use common::CourierId;
use domain::Courier;

use crate::Result;
use crate::memory::{InMemoryDb, StagedChange};

/// Load/save contract for the courier aggregate.
#[async_trait]
pub trait CourierRepository: Send + Sync {
    /// Stages a new courier for insertion.
    async fn add(&self, courier: Courier) -> Result<()>;

    /// Stages an update of an existing courier.
    async fn update(&self, courier: Courier) -> Result<()>;

    /// Loads a courier by id.
    async fn get(&self, courier_id: CourierId) -> Result<Option<Courier>>;

    /// Loads every courier whose storage places are all unoccupied, in a
    /// stable order.
    async fn get_all_free(&self) -> Result<Vec<Courier>>;
}

/// In-memory courier repository over a shared [`InMemoryDb`].
#[derive(Clone)]
pub struct InMemoryCourierRepository {
    db: InMemoryDb,
}

impl InMemoryCourierRepository {
    pub fn new(db: InMemoryDb) -> Self {
        Self { db }
    }
}

#[async_trait]
impl CourierRepository for InMemoryCourierRepository {
    async fn add(&self, courier: Courier) -> Result<()> {
        self.db.stage(StagedChange::InsertCourier(courier)).await;
        Ok(())
    }

    async fn update(&self, courier: Courier) -> Result<()> {
        self.db.stage(StagedChange::UpdateCourier(courier)).await;
        Ok(())
    }

    async fn get(&self, courier_id: CourierId) -> Result<Option<Courier>> {
        Ok(self.db.get_courier(courier_id).await)
    }

    async fn get_all_free(&self) -> Result<Vec<Courier>> {
        Ok(self.db.couriers_where(Courier::is_free).await)
    }
}
