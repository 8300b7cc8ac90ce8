//! A named capacity slot on a courier.

use common::{OrderId, StoragePlaceId};
use serde::{Deserialize, Serialize};

use super::CourierError;
use crate::error::ValidationError;

/// A storage place holds at most one order at a time.
///
/// An order fits iff its volume does not exceed `total_volume` and the slot
/// is currently free. Slots are created with the courier (or added later) and
/// are never deleted; clearing makes them reusable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoragePlace {
    id: StoragePlaceId,
    name: String,
    total_volume: u32,
    order_id: Option<OrderId>,
}

impl StoragePlace {
    /// Creates a storage place; the name must be non-empty and the capacity
    /// positive.
    pub fn create(name: impl Into<String>, total_volume: u32) -> Result<Self, ValidationError> {
        let name = name.into();
        if name.is_empty() {
            return Err(ValidationError::ValueIsRequired { field: "name" });
        }
        if total_volume == 0 {
            return Err(ValidationError::ValueIsInvalid {
                field: "total_volume",
            });
        }

        Ok(Self {
            id: StoragePlaceId::new(),
            name,
            total_volume,
            order_id: None,
        })
    }

    pub fn id(&self) -> StoragePlaceId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn total_volume(&self) -> u32 {
        self.total_volume
    }

    /// The occupying order, if any.
    pub fn order_id(&self) -> Option<OrderId> {
        self.order_id
    }

    /// Returns true if no order occupies this place.
    pub fn is_free(&self) -> bool {
        self.order_id.is_none()
    }

    /// Returns true iff an order of `order_volume` fits right now.
    ///
    /// A zero volume is a caller precondition violation: orders validate
    /// their volume as positive at construction.
    pub fn can_store(&self, order_volume: u32) -> bool {
        debug_assert!(order_volume > 0, "order volume must be positive");

        order_volume <= self.total_volume && self.order_id.is_none()
    }

    /// Puts `order_id` into this place.
    pub fn store(&mut self, order_id: OrderId, order_volume: u32) -> Result<(), CourierError> {
        if !self.can_store(order_volume) {
            return Err(CourierError::OrderCannotBeStored {
                order_id,
                place_id: self.id,
            });
        }

        self.order_id = Some(order_id);
        Ok(())
    }

    /// Removes `order_id` from this place.
    pub fn clear(&mut self, order_id: OrderId) -> Result<(), CourierError> {
        if self.order_id != Some(order_id) {
            return Err(CourierError::OrderCannotBeCleared {
                order_id,
                place_id: self.id,
                occupant: self.order_id,
            });
        }

        self.order_id = None;
        Ok(())
    }
}
