//! Grid location value object, the shared kernel of both aggregates.

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// An immutable coordinate on the delivery grid.
///
/// Both axes are bounded to the closed range
/// [[`Location::MIN`], [`Location::MAX`]]; construction outside the grid
/// fails. Two locations are equal iff both coordinates match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Location {
    x: i32,
    y: i32,
}

impl Location {
    /// The inclusive lower bound of the grid.
    pub const MIN: Location = Location { x: 1, y: 1 };

    /// The inclusive upper bound of the grid.
    pub const MAX: Location = Location { x: 10, y: 10 };

    /// Creates a location, failing if either coordinate is off the grid.
    pub fn create(x: i32, y: i32) -> Result<Self, ValidationError> {
        if x < Self::MIN.x || x > Self::MAX.x {
            return Err(ValidationError::ValueIsInvalid { field: "x" });
        }
        if y < Self::MIN.y || y > Self::MAX.y {
            return Err(ValidationError::ValueIsInvalid { field: "y" });
        }

        Ok(Self { x, y })
    }

    /// Creates a location by clamping both coordinates into the grid.
    ///
    /// Used where the result is in bounds by construction, such as movement
    /// interpolation between two valid locations and random grid points.
    pub fn clamped(x: i32, y: i32) -> Self {
        Self {
            x: x.clamp(Self::MIN.x, Self::MAX.x),
            y: y.clamp(Self::MIN.y, Self::MAX.y),
        }
    }

    pub fn x(&self) -> i32 {
        self.x
    }

    pub fn y(&self) -> i32 {
        self.y
    }

    /// Manhattan distance to `target`: `|dx| + |dy|`.
    ///
    /// Symmetric and always non-negative.
    pub fn distance_to(&self, target: Location) -> u32 {
        ((target.x - self.x).abs() + (target.y - self.y).abs()) as u32
    }
}

impl std::fmt::Display for Location {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}
