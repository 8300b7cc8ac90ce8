//! Courier aggregate and its storage places.

mod aggregate;
mod storage_place;

pub use aggregate::Courier;
pub use storage_place::StoragePlace;

use common::{OrderId, StoragePlaceId};
use thiserror::Error;

use crate::error::ValidationError;

/// Errors that can occur during courier operations.
#[derive(Debug, Error)]
pub enum CourierError {
    /// A malformed input reached the aggregate.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The storage place is occupied or too small for the order.
    #[error("order {order_id} cannot be stored in place {place_id}")]
    OrderCannotBeStored {
        order_id: OrderId,
        place_id: StoragePlaceId,
    },

    /// The storage place is empty or holds a different order.
    #[error("order {order_id} cannot be cleared from place {place_id}: occupied by {occupant:?}")]
    OrderCannotBeCleared {
        order_id: OrderId,
        place_id: StoragePlaceId,
        occupant: Option<OrderId>,
    },

    /// No storage place can take the order, or the courier already holds it.
    #[error("order {order_id} cannot be taken by courier")]
    OrderCannotBeTakenByCourier { order_id: OrderId },

    /// No storage place holds the specified order.
    #[error("courier has no order with id {order_id}")]
    CourierHasNoSpecifiedOrder { order_id: OrderId },

    /// The new storage place failed validation.
    #[error("storage place cannot be added to courier")]
    StoragePlaceCannotBeAdded {
        #[source]
        source: ValidationError,
    },
}
