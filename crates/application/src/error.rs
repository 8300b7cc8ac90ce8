use common::OrderId;
use domain::{CourierError, DispatchError, IntegrityViolation, OrderError};
use store::StoreError;
use thiserror::Error;

/// Errors surfaced by the use-case handlers.
#[derive(Debug, Error)]
pub enum ApplicationError {
    /// An order with this id already exists.
    #[error("order already exists: {order_id}")]
    OrderAlreadyExists { order_id: OrderId },

    /// A rule violation on the order aggregate.
    #[error(transparent)]
    Order(#[from] OrderError),

    /// A rule violation on the courier aggregate.
    #[error(transparent)]
    Courier(#[from] CourierError),

    /// Dispatch could not match the order.
    #[error(transparent)]
    Dispatch(#[from] DispatchError),

    /// The persistence layer rejected the unit of work.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// The geocoding collaborator failed.
    #[error(transparent)]
    Geo(#[from] crate::services::geo::GeoError),

    /// Corrupted persisted state, fatal to the current tick.
    #[error(transparent)]
    Integrity(#[from] IntegrityViolation),

    /// An event payload could not be serialized.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl ApplicationError {
    /// Returns true for broken-invariant errors that must abort the current
    /// tick rather than be skipped and retried.
    pub fn is_integrity_violation(&self) -> bool {
        matches!(
            self,
            ApplicationError::Integrity(_) | ApplicationError::Order(OrderError::Integrity(_))
        )
    }
}
