//! Order aggregate and related types.

mod aggregate;
mod events;
mod status;

pub use aggregate::Order;
pub use events::{OrderCompletedData, OrderCreatedData, OrderEvent};
pub use status::OrderStatus;

use thiserror::Error;

use crate::error::{IntegrityViolation, ValidationError};

/// Errors that can occur during order operations.
#[derive(Debug, Error)]
pub enum OrderError {
    /// A malformed input reached the aggregate.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Assignment is only allowed from the Created status.
    #[error("only order with status Created can be assigned, current status is {status}")]
    OnlyCreatedOrderCanBeAssigned { status: OrderStatus },

    /// Completion is only allowed from the Assigned status.
    #[error("not assigned order cannot be completed, current status is {status}")]
    NotAssignedOrderCannotBeCompleted { status: OrderStatus },

    /// Corrupted aggregate state, fatal to the current unit of work.
    #[error(transparent)]
    Integrity(#[from] IntegrityViolation),
}
