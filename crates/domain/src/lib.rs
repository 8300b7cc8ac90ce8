//! Domain layer for the courier dispatch system.
//!
//! This crate holds the dispatch-and-movement core:
//! - [`Location`] grid coordinate value object with Manhattan distance
//! - [`Courier`] aggregate with storage places, capacity and movement
//! - [`Order`] aggregate with its Created → Assigned → Completed lifecycle
//! - [`DispatchService`] matching an order to the nearest suitable courier
//!
//! Everything here is synchronous, pure computation. Persistence, event
//! delivery and scheduling live behind the collaborator contracts in the
//! `store` and `application` crates.

pub mod courier;
pub mod dispatch;
pub mod error;
pub mod location;
pub mod order;

pub use courier::{Courier, CourierError, StoragePlace};
pub use dispatch::{DispatchError, DispatchService};
pub use error::{IntegrityViolation, ValidationError};
pub use location::Location;
pub use order::{Order, OrderCompletedData, OrderCreatedData, OrderError, OrderEvent, OrderStatus};
