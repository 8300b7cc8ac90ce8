//! Courier aggregate root.

use common::{CourierId, Version};
use serde::{Deserialize, Serialize};

use super::{CourierError, StoragePlace};
use crate::error::ValidationError;
use crate::location::Location;
use crate::order::Order;

const DEFAULT_BAG_NAME: &str = "Bag";
const DEFAULT_BAG_VOLUME: u32 = 10;

/// A courier with a location, a speed and an ordered list of storage places.
///
/// The courier owns its storage places exclusively; occupancy is mutated only
/// through [`Courier::take_order`] and [`Courier::complete_order`], and the
/// location only through [`Courier::move_towards`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Courier {
    id: CourierId,
    name: String,
    /// Grid units covered per movement tick.
    speed: u32,
    location: Location,
    storage_places: Vec<StoragePlace>,
    #[serde(default)]
    version: Version,
}

impl Courier {
    /// Creates a courier with the default bag storage place.
    pub fn create(
        name: impl Into<String>,
        speed: u32,
        location: Location,
    ) -> Result<Self, CourierError> {
        let name = name.into();
        if name.is_empty() {
            return Err(ValidationError::ValueIsRequired { field: "name" }.into());
        }
        if speed == 0 {
            return Err(ValidationError::ValueIsInvalid { field: "speed" }.into());
        }

        let bag = StoragePlace::create(DEFAULT_BAG_NAME, DEFAULT_BAG_VOLUME)?;

        Ok(Self {
            id: CourierId::new(),
            name,
            speed,
            location,
            storage_places: vec![bag],
            version: Version::initial(),
        })
    }

    pub fn id(&self) -> CourierId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn speed(&self) -> u32 {
        self.speed
    }

    pub fn location(&self) -> Location {
        self.location
    }

    pub fn storage_places(&self) -> &[StoragePlace] {
        &self.storage_places
    }

    pub fn version(&self) -> Version {
        self.version
    }

    pub fn set_version(&mut self, version: Version) {
        self.version = version;
    }

    /// A courier is free when every storage place is unoccupied.
    pub fn is_free(&self) -> bool {
        self.storage_places.iter().all(StoragePlace::is_free)
    }

    /// Appends a new storage place, validated the same way as at creation.
    pub fn add_storage_place(
        &mut self,
        name: impl Into<String>,
        total_volume: u32,
    ) -> Result<(), CourierError> {
        let place = StoragePlace::create(name, total_volume)
            .map_err(|source| CourierError::StoragePlaceCannotBeAdded { source })?;

        self.storage_places.push(place);
        Ok(())
    }

    /// Returns true iff any storage place can store the order's volume.
    pub fn can_take_order(&self, order: &Order) -> bool {
        self.storage_places
            .iter()
            .any(|place| place.can_store(order.volume()))
    }

    /// Stores the order in the best-fit storage place.
    ///
    /// Among the places that can store the order, the one with the smallest
    /// total volume wins; ties go to the first such place in insertion order.
    /// An order already held by this courier cannot be taken again.
    pub fn take_order(&mut self, order: &Order) -> Result<(), CourierError> {
        let already_held = self
            .storage_places
            .iter()
            .any(|place| place.order_id() == Some(order.id()));
        if already_held {
            return Err(CourierError::OrderCannotBeTakenByCourier {
                order_id: order.id(),
            });
        }

        let mut best: Option<usize> = None;
        for (idx, place) in self.storage_places.iter().enumerate() {
            if !place.can_store(order.volume()) {
                continue;
            }
            match best {
                Some(current) if self.storage_places[current].total_volume() <= place.total_volume() => {}
                _ => best = Some(idx),
            }
        }

        let Some(idx) = best else {
            return Err(CourierError::OrderCannotBeTakenByCourier {
                order_id: order.id(),
            });
        };

        self.storage_places[idx].store(order.id(), order.volume())
    }

    /// Clears the storage place occupied by the order.
    pub fn complete_order(&mut self, order: &Order) -> Result<(), CourierError> {
        let place = self
            .storage_places
            .iter_mut()
            .find(|place| place.order_id() == Some(order.id()))
            .ok_or(CourierError::CourierHasNoSpecifiedOrder {
                order_id: order.id(),
            })?;

        place.clear(order.id())
    }

    /// Number of movement ticks needed to reach `target` from the current
    /// location: `ceil(distance / speed)`.
    pub fn remaining_moves_to(&self, target: Location) -> u32 {
        self.location.distance_to(target).div_ceil(self.speed)
    }

    /// Advances the location toward `target` by at most `speed` grid steps.
    ///
    /// The step budget is spent on the X axis first, the remainder on Y. This
    /// axis-priority rule is a deliberate reproducible tie-break, not true
    /// diagonal-shortest movement. The result interpolates between two
    /// in-bounds locations and is therefore always in bounds.
    pub fn move_towards(&mut self, target: Location) {
        let dx = target.x() - self.location.x();
        let dy = target.y() - self.location.y();
        let budget = self.speed as i32;

        let move_x = dx.clamp(-budget, budget);
        let budget = budget - move_x.abs();
        let move_y = dy.clamp(-budget, budget);

        self.location = Location::clamped(self.location.x() + move_x, self.location.y() + move_y);
    }
}
