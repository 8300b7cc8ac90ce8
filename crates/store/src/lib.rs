//! Persistence and event-delivery contracts for the dispatch core.
//!
//! The domain layer only requires that stores round-trip aggregate state
//! losslessly and that domain events reach the publisher atomically with the
//! state change that produced them. This crate defines those contracts
//! ([`OrderRepository`], [`CourierRepository`], [`UnitOfWork`],
//! [`EventPublisher`]) and ships in-memory reference adapters used by the
//! orchestration layer's tests.
//!
//! Delivery strategy: outbox. [`UnitOfWork::save_changes`] appends
//! integration events to an outbox table in the same commit as the aggregate
//! changes; [`OutboxProcessor`] publishes unpublished entries and marks them
//! afterwards, which makes delivery at-least-once and requires idempotent
//! consumers.

pub mod courier_repository;
pub mod error;
pub mod event;
pub mod memory;
pub mod order_repository;
pub mod outbox;
pub mod unit_of_work;

pub use courier_repository::{CourierRepository, InMemoryCourierRepository};
pub use error::StoreError;
pub use event::IntegrationEvent;
pub use memory::InMemoryDb;
pub use order_repository::{InMemoryOrderRepository, OrderRepository};
pub use outbox::{EventPublisher, InMemoryEventPublisher, OutboxEntry, OutboxProcessor};
pub use unit_of_work::{InMemoryUnitOfWork, UnitOfWork};

/// Result type for store operations.
pub type Result<T> = std::result::Result<T, StoreError>;
