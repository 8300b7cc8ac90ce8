use chrono::{DateTime, Utc};
use common::EventId;
use domain::OrderEvent;
use serde::{Deserialize, Serialize};

/// An envelope around a domain event, ready for external delivery.
///
/// Carries a unique event id and an occurrence timestamp so downstream
/// consumers can deduplicate at-least-once deliveries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IntegrationEvent {
    /// Unique identifier for this event.
    pub event_id: EventId,

    /// The event type name (e.g. "OrderCreated", "OrderCompleted").
    pub event_type: String,

    /// When the envelope was created.
    pub occurred_at: DateTime<Utc>,

    /// The event payload as JSON.
    pub payload: serde_json::Value,
}

impl IntegrationEvent {
    /// Wraps any serializable payload in a fresh envelope.
    pub fn new(
        event_type: impl Into<String>,
        payload: &impl Serialize,
    ) -> Result<Self, serde_json::Error> {
        Ok(Self {
            event_id: EventId::new(),
            event_type: event_type.into(),
            occurred_at: Utc::now(),
            payload: serde_json::to_value(payload)?,
        })
    }

    /// Wraps an order domain event.
    pub fn from_order_event(event: &OrderEvent) -> Result<Self, serde_json::Error> {
        Self::new(event.event_type(), event)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::OrderId;

    #[test]
    fn envelopes_get_unique_ids() {
        let event = OrderEvent::order_created(OrderId::new());
        let a = IntegrationEvent::from_order_event(&event).unwrap();
        let b = IntegrationEvent::from_order_event(&event).unwrap();
        assert_ne!(a.event_id, b.event_id);
    }

    #[test]
    fn envelope_keeps_event_type_and_payload() {
        let order_id = OrderId::new();
        let event = OrderEvent::order_created(order_id);
        let envelope = IntegrationEvent::from_order_event(&event).unwrap();

        assert_eq!(envelope.event_type, "OrderCreated");
        let decoded: OrderEvent = serde_json::from_value(envelope.payload).unwrap();
        assert_eq!(decoded, event);
    }
}
