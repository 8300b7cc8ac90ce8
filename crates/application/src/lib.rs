//! Use-case orchestration for the dispatch system.
//!
//! Two periodically scheduled ticks drive the system: the assignment tick
//! ([`AssignOrdersHandler`]) matches one Created order to the nearest free
//! courier, and the movement tick ([`MoveCouriersHandler`]) advances every
//! assigned courier one step and completes orders on arrival. Both are
//! stateless between invocations, idempotent as no-ops and guarded against
//! re-entrant execution.
//!
//! The order-creation path ([`CreateOrderHandler`]) is the only user-facing
//! entry point; it surfaces validation and rule violations directly to its
//! caller.

pub mod commands;
pub mod error;
pub mod services;
pub mod tick;

pub use commands::assign_orders::{AssignOrdersHandler, AssignmentOutcome};
pub use commands::create_order::{CreateOrderCommand, CreateOrderHandler};
pub use commands::move_couriers::{MoveCouriersHandler, MovementOutcome};
pub use error::ApplicationError;
pub use services::geo::{GeoClient, GeoError, InMemoryGeoClient};
pub use services::location::{RandomLocationProvider, RandomSource, ThreadRngRandom};
pub use tick::TickGuard;
