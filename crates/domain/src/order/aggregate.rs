//! Order aggregate root.

use common::{CourierId, OrderId, Version};
use serde::{Deserialize, Serialize};

use super::{OrderError, OrderEvent, OrderStatus};
use crate::courier::Courier;
use crate::error::{IntegrityViolation, ValidationError};
use crate::location::Location;

/// A delivery order with a destination, a volume and a monotonic lifecycle.
///
/// The order references its courier by identity only; the courier stores the
/// order id inside one of its storage places. No object aliasing crosses the
/// aggregate boundary.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    id: OrderId,
    location: Location,
    volume: u32,
    status: OrderStatus,
    courier_id: Option<CourierId>,
    #[serde(default)]
    version: Version,
    /// Events recorded since the last drain. Never persisted with the
    /// aggregate; they travel through the outbox.
    #[serde(skip)]
    pending_events: Vec<OrderEvent>,
}

impl Order {
    /// Creates an order in the Created status and records the OrderCreated
    /// event for later publication.
    pub fn create(order_id: OrderId, location: Location, volume: u32) -> Result<Self, OrderError> {
        if order_id.is_nil() {
            return Err(ValidationError::ValueIsRequired { field: "order_id" }.into());
        }
        if volume == 0 {
            return Err(ValidationError::ValueIsInvalid { field: "volume" }.into());
        }

        Ok(Self {
            id: order_id,
            location,
            volume,
            status: OrderStatus::Created,
            courier_id: None,
            version: Version::initial(),
            pending_events: vec![OrderEvent::order_created(order_id)],
        })
    }

    pub fn id(&self) -> OrderId {
        self.id
    }

    pub fn location(&self) -> Location {
        self.location
    }

    pub fn volume(&self) -> u32 {
        self.volume
    }

    pub fn status(&self) -> OrderStatus {
        self.status
    }

    /// The assigned courier, present from the Assigned status on.
    pub fn courier_id(&self) -> Option<CourierId> {
        self.courier_id
    }

    pub fn version(&self) -> Version {
        self.version
    }

    pub fn set_version(&mut self, version: Version) {
        self.version = version;
    }

    /// Drains the events recorded since the last drain.
    ///
    /// The orchestration layer forwards them to the unit of work so they are
    /// committed atomically with the state change that produced them.
    pub fn take_events(&mut self) -> Vec<OrderEvent> {
        std::mem::take(&mut self.pending_events)
    }

    /// Attaches the courier and moves the order to Assigned.
    ///
    /// Raises no event itself; the assignment becomes visible through the
    /// persisted status change.
    pub fn assign(&mut self, courier: &Courier) -> Result<(), OrderError> {
        if !self.status.can_assign() {
            return Err(OrderError::OnlyCreatedOrderCanBeAssigned {
                status: self.status,
            });
        }

        self.courier_id = Some(courier.id());
        self.status = OrderStatus::Assigned;
        Ok(())
    }

    /// Moves the order to Completed and records the OrderCompleted event.
    ///
    /// An Assigned order without a courier id is corrupted state: `assign`
    /// guarantees the id is set before Assigned is reachable, so this is an
    /// [`IntegrityViolation`], not a recoverable rule violation.
    pub fn complete(&mut self) -> Result<(), OrderError> {
        if !self.status.can_complete() {
            return Err(OrderError::NotAssignedOrderCannotBeCompleted {
                status: self.status,
            });
        }

        let courier_id = self.courier_id.ok_or_else(|| {
            IntegrityViolation::new(format!("order {} is Assigned without a courier id", self.id))
        })?;

        self.status = OrderStatus::Completed;
        self.pending_events
            .push(OrderEvent::order_completed(self.id, courier_id));
        Ok(())
    }
}
