//! Stateless domain service that matches one order to the best courier.

use thiserror::Error;

use common::OrderId;

use crate::courier::{Courier, CourierError};
use crate::error::ValidationError;
use crate::order::{Order, OrderError, OrderStatus};

/// Errors that can occur during dispatch.
#[derive(Debug, Error)]
pub enum DispatchError {
    /// The candidate list was empty.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Only orders in the Created status can be dispatched.
    #[error("only order with status Created can be dispatched, order {order_id} is {status}")]
    OnlyCreatedOrderCanBeDispatched {
        order_id: OrderId,
        status: OrderStatus,
    },

    /// No candidate can fit the order's volume.
    #[error("suitable courier not found for order {order_id}")]
    SuitableCourierNotFound { order_id: OrderId },

    /// Assignment failed on the order side.
    #[error(transparent)]
    Order(#[from] OrderError),

    /// Taking the order failed on the courier side.
    #[error(transparent)]
    Courier(#[from] CourierError),
}

/// Matches one Created order to the nearest free courier that can take it.
///
/// Dispatch couples both aggregates transactionally at the domain level: on
/// success the order is Assigned and the winner's best-fit storage place is
/// occupied, and the caller must persist both together.
#[derive(Debug, Clone, Copy, Default)]
pub struct DispatchService;

impl DispatchService {
    pub fn new() -> Self {
        Self
    }

    /// Picks the winner, mutates both aggregates and returns the courier.
    ///
    /// Candidates unable to take the order are filtered out; among the rest
    /// the minimal [`Courier::remaining_moves_to`] the order's location wins.
    /// Ties go to the first minimum in input order, which keeps selection
    /// deterministic for a stably ordered candidate list.
    pub fn dispatch(
        &self,
        order: &mut Order,
        couriers: Vec<Courier>,
    ) -> Result<Courier, DispatchError> {
        if !order.status().can_assign() {
            return Err(DispatchError::OnlyCreatedOrderCanBeDispatched {
                order_id: order.id(),
                status: order.status(),
            });
        }
        if couriers.is_empty() {
            return Err(ValidationError::CollectionIsTooSmall { min: 1, actual: 0 }.into());
        }

        let mut winner: Option<(Courier, u32)> = None;
        for courier in couriers {
            if !courier.can_take_order(order) {
                continue;
            }
            let moves = courier.remaining_moves_to(order.location());
            match &winner {
                Some((_, best)) if *best <= moves => {}
                _ => winner = Some((courier, moves)),
            }
        }

        let Some((mut courier, _)) = winner else {
            return Err(DispatchError::SuitableCourierNotFound {
                order_id: order.id(),
            });
        };

        order.assign(&courier)?;
        courier.take_order(order)?;

        Ok(courier)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::location::Location;

    fn location(x: i32, y: i32) -> Location {
        Location::create(x, y).unwrap()
    }

    fn order(volume: u32) -> Order {
        Order::create(common::OrderId::new(), location(5, 5), volume).unwrap()
    }

    fn courier_at(name: &str, x: i32, y: i32, speed: u32) -> Courier {
        Courier::create(name, speed, location(x, y)).unwrap()
    }

    #[test]
    fn dispatch_picks_nearest_courier() {
        let mut order = order(4);
        let far = courier_at("Far", 1, 1, 1); // 8 moves
        let near = courier_at("Near", 4, 5, 1); // 1 move
        let near_id = near.id();

        let winner = DispatchService::new()
            .dispatch(&mut order, vec![far, near])
            .unwrap();

        assert_eq!(winner.id(), near_id);
        assert_eq!(order.status(), OrderStatus::Assigned);
        assert_eq!(order.courier_id(), Some(near_id));
        assert!(!winner.is_free());
    }

    #[test]
    fn dispatch_accounts_for_speed() {
        let mut order = order(4);
        let slow = courier_at("Slow", 4, 5, 1); // distance 1 -> 1 move
        let fast = courier_at("Fast", 1, 1, 8); // distance 8 -> 1 move, tied
        let slow_id = slow.id();

        // Tie at 1 move: first in input order wins.
        let winner = DispatchService::new()
            .dispatch(&mut order, vec![slow, fast])
            .unwrap();
        assert_eq!(winner.id(), slow_id);
    }

    #[test]
    fn dispatch_tie_goes_to_first_minimum() {
        let mut order = order(1);
        let couriers = vec![
            courier_at("A", 1, 1, 2), // 4 moves
            courier_at("B", 4, 4, 1), // 2 moves
            courier_at("C", 5, 3, 1), // 2 moves, tied with B
            courier_at("D", 1, 2, 1), // 7 moves
        ];
        let expected = couriers[1].id();

        let winner = DispatchService::new().dispatch(&mut order, couriers).unwrap();
        assert_eq!(winner.id(), expected);
    }

    #[test]
    fn dispatch_skips_couriers_without_capacity() {
        let mut order = order(11); // over the default bag volume
        let mut big = courier_at("Big", 1, 1, 1);
        big.add_storage_place("Trunk", 20).unwrap();
        let big_id = big.id();
        let near_but_small = courier_at("Small", 5, 5, 1);

        let winner = DispatchService::new()
            .dispatch(&mut order, vec![near_but_small, big])
            .unwrap();
        assert_eq!(winner.id(), big_id);
    }

    #[test]
    fn dispatch_fails_when_no_courier_fits() {
        let mut order = order(11);
        let couriers = vec![courier_at("A", 5, 5, 1), courier_at("B", 5, 6, 3)];

        let result = DispatchService::new().dispatch(&mut order, couriers);
        assert!(matches!(
            result,
            Err(DispatchError::SuitableCourierNotFound { order_id }) if order_id == order.id()
        ));
        assert_eq!(order.status(), OrderStatus::Created);
    }

    #[test]
    fn dispatch_fails_on_empty_candidate_list() {
        let mut order = order(4);
        let result = DispatchService::new().dispatch(&mut order, vec![]);
        assert!(matches!(
            result,
            Err(DispatchError::Validation(
                ValidationError::CollectionIsTooSmall { min: 1, actual: 0 }
            ))
        ));
    }

    #[test]
    fn dispatch_requires_created_status() {
        let mut order = order(4);
        let courier = courier_at("A", 1, 1, 1);
        order.assign(&courier).unwrap();

        let result = DispatchService::new().dispatch(&mut order, vec![courier_at("B", 5, 5, 1)]);
        assert!(matches!(
            result,
            Err(DispatchError::OnlyCreatedOrderCanBeDispatched {
                status: OrderStatus::Assigned,
                ..
            })
        ));
    }

    #[test]
    fn dispatch_occupies_best_fit_place_of_winner() {
        let mut order = order(2);
        let mut courier = courier_at("A", 4, 5, 1);
        courier.add_storage_place("Pouch", 2).unwrap();

        let winner = DispatchService::new()
            .dispatch(&mut order, vec![courier])
            .unwrap();

        assert_eq!(winner.storage_places()[1].order_id(), Some(order.id()));
        assert!(winner.storage_places()[0].is_free());
    }
}
