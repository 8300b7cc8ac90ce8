//! Movement tick: advance every busy courier one step, complete arrivals.

use common::OrderId;
use domain::IntegrityViolation;
use metrics::{counter, histogram};
use store::{CourierRepository, OrderRepository, UnitOfWork};

use super::to_integration;
use crate::error::ApplicationError;
use crate::tick::TickGuard;

/// What a single movement tick did.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct MovementOutcome {
    /// True when the tick was skipped because a previous one was running.
    pub skipped: bool,
    /// Assigned orders whose courier moved this tick.
    pub processed: u32,
    /// Orders delivered this tick.
    pub completed: u32,
    /// Orders whose step failed and was rolled back; they stay Assigned and
    /// are retried on the next tick.
    pub failed: Vec<OrderId>,
}

/// Periodic tick that moves couriers towards their assigned orders.
///
/// Each order is processed in its own unit of work, so one order's failure
/// rolls back only that order's step. The exception is corrupted state
/// (an Assigned order without a courier, or a courier id that resolves to
/// nothing): that aborts the whole tick, because continuing to move couriers
/// against a store that lies about assignments compounds the damage.
pub struct MoveCouriersHandler<O, C, U>
where
    O: OrderRepository,
    C: CourierRepository,
    U: UnitOfWork,
{
    orders: O,
    couriers: C,
    uow: U,
    guard: TickGuard,
}

impl<O, C, U> MoveCouriersHandler<O, C, U>
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
            guard: TickGuard::new(),
        }
    }

    #[tracing::instrument(skip(self))]
    pub async fn handle(&self) -> Result<MovementOutcome, ApplicationError> {
        let Some(_running) = self.guard.try_acquire() else {
            tracing::debug!("movement tick already running, skipping");
            return Ok(MovementOutcome {
                skipped: true,
                ..MovementOutcome::default()
            });
        };

        let assigned = self.orders.get_all_in_assigned_status().await?;
        let mut outcome = MovementOutcome::default();

        for order in assigned {
            let order_id = order.id();
            match self.process_order(order).await {
                Ok(delivered) => {
                    outcome.processed += 1;
                    if delivered {
                        outcome.completed += 1;
                    }
                }
                Err(err) if err.is_integrity_violation() => {
                    tracing::error!(%order_id, error = %err, "corrupted state, aborting tick");
                    self.uow.discard_changes().await;
                    return Err(err);
                }
                Err(err) => {
                    tracing::warn!(%order_id, error = %err, "movement step failed, rolled back");
                    self.uow.discard_changes().await;
                    outcome.failed.push(order_id);
                }
            }
        }

        histogram!("couriers_moved_per_tick").record(f64::from(outcome.processed));
        if outcome.completed > 0 {
            counter!("orders_completed_total").increment(u64::from(outcome.completed));
        }
        Ok(outcome)
    }

    /// Moves one courier a step towards its order. Returns true on delivery.
    async fn process_order(&self, mut order: domain::Order) -> Result<bool, ApplicationError> {
        let courier_id = order.courier_id().ok_or_else(|| {
            IntegrityViolation::new(format!(
                "order {} is Assigned without a courier id",
                order.id()
            ))
        })?;
        let mut courier = self.couriers.get(courier_id).await?.ok_or_else(|| {
            IntegrityViolation::new(format!(
                "order {} references missing courier {courier_id}",
                order.id()
            ))
        })?;

        courier.move_towards(order.location());

        let delivered = courier.location() == order.location();
        if delivered {
            courier.complete_order(&order)?;
            order.complete()?;
            tracing::info!(order_id = %order.id(), %courier_id, "order delivered");
        }

        let events = to_integration(order.take_events())?;
        self.orders.update(order).await?;
        self.couriers.update(courier).await?;
        self.uow.save_changes(events).await?;
        Ok(delivered)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::{CourierId, OrderId};
    use domain::{Courier, Location, Order, OrderStatus};
    use store::{
        InMemoryCourierRepository, InMemoryDb, InMemoryOrderRepository, InMemoryUnitOfWork,
    };

    fn handler(
        db: &InMemoryDb,
    ) -> MoveCouriersHandler<InMemoryOrderRepository, InMemoryCourierRepository, InMemoryUnitOfWork>
    {
        MoveCouriersHandler::new(
            InMemoryOrderRepository::new(db.clone()),
            InMemoryCourierRepository::new(db.clone()),
            InMemoryUnitOfWork::new(db.clone()),
        )
    }

    async fn commit(db: &InMemoryDb) {
        InMemoryUnitOfWork::new(db.clone())
            .save_changes(vec![])
            .await
            .unwrap();
    }

    /// Seeds an already-assigned order/courier pair, bypassing dispatch.
    async fn seed_assigned(
        db: &InMemoryDb,
        target: Location,
        courier_start: Location,
        speed: u32,
    ) -> (OrderId, CourierId) {
        let mut order = Order::create(OrderId::new(), target, 1).unwrap();
        order.take_events();
        let mut courier = Courier::create("Nikita", speed, courier_start).unwrap();
        order.assign(&courier).unwrap();
        courier.take_order(&order).unwrap();
        let ids = (order.id(), courier.id());

        InMemoryOrderRepository::new(db.clone())
            .add(order)
            .await
            .unwrap();
        InMemoryCourierRepository::new(db.clone())
            .add(courier)
            .await
            .unwrap();
        commit(db).await;
        ids
    }

    fn location(x: i32, y: i32) -> Location {
        Location::create(x, y).unwrap()
    }

    #[tokio::test]
    async fn no_assigned_orders_is_a_no_op() {
        let db = InMemoryDb::new();
        let outcome = handler(&db).handle().await.unwrap();
        assert_eq!(outcome, MovementOutcome::default());
    }

    #[tokio::test]
    async fn courier_advances_one_step_per_tick() {
        let db = InMemoryDb::new();
        let (_, courier_id) = seed_assigned(&db, location(5, 5), location(1, 1), 1).await;

        let outcome = handler(&db).handle().await.unwrap();
        assert_eq!(outcome.processed, 1);
        assert_eq!(outcome.completed, 0);

        // X axis first.
        let courier = InMemoryCourierRepository::new(db.clone())
            .get(courier_id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(courier.location(), location(2, 1));
    }

    #[tokio::test]
    async fn arrival_completes_order_and_frees_the_courier() {
        let db = InMemoryDb::new();
        let (order_id, courier_id) = seed_assigned(&db, location(2, 1), location(1, 1), 1).await;

        let outcome = handler(&db).handle().await.unwrap();
        assert_eq!(outcome.completed, 1);

        let order = InMemoryOrderRepository::new(db.clone())
            .get(order_id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(order.status(), OrderStatus::Completed);

        let courier = InMemoryCourierRepository::new(db.clone())
            .get(courier_id)
            .await
            .unwrap()
            .unwrap();
        assert!(courier.is_free());

        let outbox = db.outbox().await;
        assert_eq!(outbox.len(), 1);
        assert_eq!(outbox[0].event.event_type, "OrderCompleted");
    }

    #[tokio::test]
    async fn completed_orders_are_not_moved_again() {
        let db = InMemoryDb::new();
        seed_assigned(&db, location(2, 1), location(1, 1), 1).await;

        let handler = handler(&db);
        handler.handle().await.unwrap();
        let second = handler.handle().await.unwrap();
        assert_eq!(second.processed, 0);
    }

    #[tokio::test]
    async fn missing_courier_aborts_the_whole_tick() {
        let db = InMemoryDb::new();

        // An assigned order whose courier was never stored.
        let mut order = Order::create(OrderId::new(), location(5, 5), 1).unwrap();
        order.take_events();
        let phantom = Courier::create("Phantom", 1, location(1, 1)).unwrap();
        order.assign(&phantom).unwrap();
        InMemoryOrderRepository::new(db.clone())
            .add(order)
            .await
            .unwrap();
        commit(&db).await;

        let result = handler(&db).handle().await;
        assert!(matches!(result, Err(err) if err.is_integrity_violation()));
        assert_eq!(db.staged_count().await, 0);
    }

    #[tokio::test]
    async fn fast_courier_overshoot_is_clamped_to_target() {
        let db = InMemoryDb::new();
        let (order_id, _) = seed_assigned(&db, location(3, 1), location(1, 1), 5).await;

        let outcome = handler(&db).handle().await.unwrap();
        assert_eq!(outcome.completed, 1);

        let order = InMemoryOrderRepository::new(db.clone())
            .get(order_id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(order.status(), OrderStatus::Completed);
    }
}
