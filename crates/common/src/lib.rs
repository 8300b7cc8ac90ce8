//! Shared types for the courier dispatch system.
//!
//! Typed identifiers keep order, courier, storage place and event IDs from
//! being mixed up, and [`Version`] carries the optimistic-concurrency counter
//! that repositories check on every update.

pub mod ids;
pub mod version;

pub use ids::{CourierId, EventId, OrderId, StoragePlaceId};
pub use version::Version;
