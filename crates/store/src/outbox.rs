//! Outbox entries, the publisher contract and the outbox processor.

use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::Result;
use crate::error::StoreError;
use crate::event::IntegrationEvent;
use crate::memory::InMemoryDb;

/// One row of the outbox: an integration event and its delivery state.
#[derive(Debug, Clone)]
pub struct OutboxEntry {
    pub event: IntegrationEvent,
    /// Set once the event has been handed to the publisher. Publishing
    /// happens before marking, so a crash in between redelivers the event.
    pub published_at: Option<DateTime<Utc>>,
}

impl OutboxEntry {
    pub fn new(event: IntegrationEvent) -> Self {
        Self {
            event,
            published_at: None,
        }
    }
}

/// Hands integration events to an external transport (e.g. a message bus).
#[async_trait]
pub trait EventPublisher: Send + Sync {
    async fn publish(&self, event: &IntegrationEvent) -> Result<()>;
}

#[derive(Debug, Default)]
struct PublisherState {
    published: Vec<IntegrationEvent>,
    fail_next: bool,
}

/// In-memory publisher for tests: records every published event and can be
/// told to fail the next publish.
#[derive(Debug, Clone, Default)]
pub struct InMemoryEventPublisher {
    state: Arc<RwLock<PublisherState>>,
}

impl InMemoryEventPublisher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes the next publish call fail.
    pub fn set_fail_next(&self, fail: bool) {
        self.state.write().unwrap().fail_next = fail;
    }

    /// Returns every event published so far.
    pub fn published(&self) -> Vec<IntegrationEvent> {
        self.state.read().unwrap().published.clone()
    }
}

#[async_trait]
impl EventPublisher for InMemoryEventPublisher {
    async fn publish(&self, event: &IntegrationEvent) -> Result<()> {
        let mut state = self.state.write().unwrap();
        if state.fail_next {
            state.fail_next = false;
            return Err(StoreError::Publish("transport unavailable".into()));
        }
        state.published.push(event.clone());
        Ok(())
    }
}

/// Drains unpublished outbox entries through an [`EventPublisher`].
///
/// Invoked on its own cadence by the external scheduler, the same way the
/// dispatch ticks are. Entries are published before being marked, so a
/// failure or crash can only cause redelivery, never loss.
pub struct OutboxProcessor<P: EventPublisher> {
    db: InMemoryDb,
    publisher: P,
}

impl<P: EventPublisher> OutboxProcessor<P> {
    pub fn new(db: InMemoryDb, publisher: P) -> Self {
        Self { db, publisher }
    }

    /// Publishes every unpublished entry, returning how many went out.
    #[tracing::instrument(skip(self))]
    pub async fn process(&self) -> Result<usize> {
        let pending = self.db.unpublished_events().await;
        let mut delivered = 0;

        for event in pending {
            self.publisher.publish(&event).await?;
            self.db.mark_published(event.event_id).await;
            delivered += 1;
        }

        if delivered > 0 {
            tracing::info!(delivered, "outbox entries published");
        }
        Ok(delivered)
    }
}
