//! Use-case command handlers.

pub mod assign_orders;
pub mod create_order;
pub mod move_couriers;

use domain::OrderEvent;
use store::IntegrationEvent;

/// Wraps drained domain events into integration envelopes for the outbox.
pub(crate) fn to_integration(
    events: Vec<OrderEvent>,
) -> Result<Vec<IntegrationEvent>, serde_json::Error> {
    events
        .iter()
        .map(IntegrationEvent::from_order_event)
        .collect()
}
