//! Order domain events.
//!
//! Events are recorded by the aggregate and drained explicitly with
//! [`Order::take_events`](super::Order::take_events); the orchestration layer
//! forwards them to the unit of work for outbox delivery.

use chrono::{DateTime, Utc};
use common::{CourierId, OrderId};
use serde::{Deserialize, Serialize};

/// Events that can occur on an order aggregate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum OrderEvent {
    /// Order was created.
    OrderCreated(OrderCreatedData),

    /// Order was delivered by its courier.
    OrderCompleted(OrderCompletedData),
}

impl OrderEvent {
    /// Returns the event type name used for outbox routing.
    pub fn event_type(&self) -> &'static str {
        match self {
            OrderEvent::OrderCreated(_) => "OrderCreated",
            OrderEvent::OrderCompleted(_) => "OrderCompleted",
        }
    }

    /// Creates an OrderCreated event.
    pub fn order_created(order_id: OrderId) -> Self {
        OrderEvent::OrderCreated(OrderCreatedData {
            order_id,
            occurred_at: Utc::now(),
        })
    }

    /// Creates an OrderCompleted event.
    pub fn order_completed(order_id: OrderId, courier_id: CourierId) -> Self {
        OrderEvent::OrderCompleted(OrderCompletedData {
            order_id,
            courier_id,
            occurred_at: Utc::now(),
        })
    }
}

/// Data for the OrderCreated event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderCreatedData {
    pub order_id: OrderId,
    pub occurred_at: DateTime<Utc>,
}

/// Data for the OrderCompleted event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderCompletedData {
    pub order_id: OrderId,
    pub courier_id: CourierId,
    pub occurred_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn event_type_names() {
        let created = OrderEvent::order_created(OrderId::new());
        assert_eq!(created.event_type(), "OrderCreated");

        let completed = OrderEvent::order_completed(OrderId::new(), CourierId::new());
        assert_eq!(completed.event_type(), "OrderCompleted");
    }

    #[test]
    fn completed_event_carries_both_identities() {
        let order_id = OrderId::new();
        let courier_id = CourierId::new();
        let event = OrderEvent::order_completed(order_id, courier_id);

        let OrderEvent::OrderCompleted(data) = event else {
            panic!("expected OrderCompleted");
        };
        assert_eq!(data.order_id, order_id);
        assert_eq!(data.courier_id, courier_id);
    }

    #[test]
    fn serialization_roundtrip() {
        let event = OrderEvent::order_created(OrderId::new());
        let json = serde_json::to_string(&event).unwrap();
        assert!(json.contains("OrderCreated"));

        let deserialized: OrderEvent = serde_json::from_str(&json).unwrap();
        assert_eq!(event, deserialized);
    }
}
