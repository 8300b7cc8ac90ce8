use common::{CourierId, OrderId, Version};
use thiserror::Error;

/// Errors that can occur when persisting aggregates or delivering events.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The record changed since it was loaded; nothing was applied.
    #[error("concurrency conflict for {aggregate}: expected version {expected}, found {actual}")]
    ConcurrencyConflict {
        aggregate: String,
        expected: Version,
        actual: Version,
    },

    /// An order with this id already exists.
    #[error("order already exists: {0}")]
    OrderAlreadyExists(OrderId),

    /// A courier with this id already exists.
    #[error("courier already exists: {0}")]
    CourierAlreadyExists(CourierId),

    /// The order to update was not found.
    #[error("order not found: {0}")]
    OrderNotFound(OrderId),

    /// The courier to update was not found.
    #[error("courier not found: {0}")]
    CourierNotFound(CourierId),

    /// An event payload could not be (de)serialized.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The external publisher rejected an event; the outbox entry stays
    /// unpublished and is retried on the next processing run.
    #[error("event publish failed")]
    Publish(#[source] Box<dyn std::error::Error + Send + Sync>),
}
