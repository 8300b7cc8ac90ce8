//! Assignment tick: match the oldest unassigned order to a courier.

use domain::{DispatchError, DispatchService};
use metrics::counter;
use store::{CourierRepository, OrderRepository, UnitOfWork};

use common::{CourierId, OrderId};

use super::to_integration;
use crate::error::ApplicationError;
use crate::tick::TickGuard;

/// What a single assignment tick did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssignmentOutcome {
    /// The oldest Created order was matched and persisted.
    Assigned {
        order_id: OrderId,
        courier_id: CourierId,
    },
    /// Nothing to assign.
    NoCreatedOrders,
    /// No courier is currently free.
    NoFreeCouriers,
    /// Free couriers exist but none can take this order. The order stays
    /// Created and will be retried on the next tick.
    NoSuitableCourier { order_id: OrderId },
    /// A previous tick is still running; this one did nothing.
    AlreadyRunning,
}

/// Periodic tick that dispatches the oldest Created order.
///
/// One order per tick. Ticks never overlap: a second invocation while one is
/// in flight returns [`AssignmentOutcome::AlreadyRunning`] immediately.
pub struct AssignOrdersHandler<O, C, U>
where
    O: OrderRepository,
    C: CourierRepository,
    U: UnitOfWork,
{
    orders: O,
    couriers: C,
    uow: U,
    dispatch: DispatchService,
    guard: TickGuard,
}

impl<O, C, U> AssignOrdersHandler<O, C, U>
where
    O: OrderRepository,
    C: CourierRepository,
    U: UnitOfWork,
{
    pub fn new(orders: O, couriers: C, uow: U) -> Self {
        Self {
            orders,
            couriers,
            uow,
            dispatch: DispatchService::new(),
            guard: TickGuard::new(),
        }
    }

    #[tracing::instrument(skip(self))]
    pub async fn handle(&self) -> Result<AssignmentOutcome, ApplicationError> {
        let Some(_running) = self.guard.try_acquire() else {
            tracing::debug!("assignment tick already running, skipping");
            return Ok(AssignmentOutcome::AlreadyRunning);
        };

        let Some(mut order) = self.orders.get_first_in_created_status().await? else {
            return Ok(AssignmentOutcome::NoCreatedOrders);
        };

        let candidates = self.couriers.get_all_free().await?;
        if candidates.is_empty() {
            tracing::debug!(order_id = %order.id(), "no free couriers");
            return Ok(AssignmentOutcome::NoFreeCouriers);
        }

        let courier = match self.dispatch.dispatch(&mut order, candidates) {
            Ok(courier) => courier,
            Err(DispatchError::SuitableCourierNotFound { order_id }) => {
                tracing::warn!(%order_id, "no suitable courier, order stays queued");
                return Ok(AssignmentOutcome::NoSuitableCourier { order_id });
            }
            Err(err) => {
                tracing::error!(order_id = %order.id(), error = %err, "dispatch failed");
                self.uow.discard_changes().await;
                return Err(err.into());
            }
        };

        let order_id = order.id();
        let courier_id = courier.id();
        let events = to_integration(order.take_events())?;

        self.orders.update(order).await?;
        self.couriers.update(courier).await?;
        self.uow.save_changes(events).await?;

        counter!("orders_assigned_total").increment(1);
        tracing::info!(%order_id, %courier_id, "order assigned");
        Ok(AssignmentOutcome::Assigned {
            order_id,
            courier_id,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::OrderId;
    use domain::{Courier, Location, Order, OrderStatus};
    use store::{
        InMemoryCourierRepository, InMemoryDb, InMemoryOrderRepository, InMemoryUnitOfWork,
    };

    fn handler(
        db: &InMemoryDb,
    ) -> AssignOrdersHandler<InMemoryOrderRepository, InMemoryCourierRepository, InMemoryUnitOfWork>
    {
        AssignOrdersHandler::new(
            InMemoryOrderRepository::new(db.clone()),
            InMemoryCourierRepository::new(db.clone()),
            InMemoryUnitOfWork::new(db.clone()),
        )
    }

    async fn seed_order(db: &InMemoryDb, x: i32, y: i32, volume: u32) -> OrderId {
        let mut order =
            Order::create(OrderId::new(), Location::create(x, y).unwrap(), volume).unwrap();
        let id = order.id();
        order.take_events();
        let repo = InMemoryOrderRepository::new(db.clone());
        repo.add(order).await.unwrap();
        InMemoryUnitOfWork::new(db.clone())
            .save_changes(vec![])
            .await
            .unwrap();
        id
    }

    async fn seed_courier(db: &InMemoryDb, name: &str, x: i32, y: i32, speed: u32) -> Courier {
        let courier = Courier::create(name, speed, Location::create(x, y).unwrap()).unwrap();
        let repo = InMemoryCourierRepository::new(db.clone());
        repo.add(courier.clone()).await.unwrap();
        InMemoryUnitOfWork::new(db.clone())
            .save_changes(vec![])
            .await
            .unwrap();
        courier
    }

    #[tokio::test]
    async fn empty_system_is_a_no_op() {
        let db = InMemoryDb::new();
        let outcome = handler(&db).handle().await.unwrap();
        assert_eq!(outcome, AssignmentOutcome::NoCreatedOrders);
    }

    #[tokio::test]
    async fn order_without_couriers_is_a_no_op() {
        let db = InMemoryDb::new();
        seed_order(&db, 5, 5, 1).await;

        let outcome = handler(&db).handle().await.unwrap();
        assert_eq!(outcome, AssignmentOutcome::NoFreeCouriers);
    }

    #[tokio::test]
    async fn assigns_oldest_order_to_nearest_courier() {
        let db = InMemoryDb::new();
        let first = seed_order(&db, 5, 5, 1).await;
        seed_order(&db, 2, 2, 1).await;
        seed_courier(&db, "Far", 10, 10, 1).await;
        let near = seed_courier(&db, "Near", 5, 4, 1).await;

        let outcome = handler(&db).handle().await.unwrap();
        assert_eq!(
            outcome,
            AssignmentOutcome::Assigned {
                order_id: first,
                courier_id: near.id(),
            }
        );

        let stored = InMemoryOrderRepository::new(db.clone())
            .get(first)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stored.status(), OrderStatus::Assigned);
        assert_eq!(stored.courier_id(), Some(near.id()));

        let stored_courier = InMemoryCourierRepository::new(db.clone())
            .get(near.id())
            .await
            .unwrap()
            .unwrap();
        assert!(!stored_courier.is_free());
    }

    #[tokio::test]
    async fn busy_couriers_are_not_candidates() {
        let db = InMemoryDb::new();
        seed_order(&db, 5, 5, 1).await;
        seed_order(&db, 2, 2, 1).await;
        seed_courier(&db, "Solo", 1, 1, 1).await;

        let handler = handler(&db);
        let first = handler.handle().await.unwrap();
        assert!(matches!(first, AssignmentOutcome::Assigned { .. }));

        let second = handler.handle().await.unwrap();
        assert_eq!(second, AssignmentOutcome::NoFreeCouriers);
    }

    #[tokio::test]
    async fn oversized_order_stays_queued_without_failing_the_tick() {
        let db = InMemoryDb::new();
        let order_id = seed_order(&db, 5, 5, 11).await;
        seed_courier(&db, "Default bag", 1, 1, 1).await;

        let outcome = handler(&db).handle().await.unwrap();
        assert_eq!(outcome, AssignmentOutcome::NoSuitableCourier { order_id });

        let stored = InMemoryOrderRepository::new(db.clone())
            .get(order_id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stored.status(), OrderStatus::Created);
    }
}
