use async_trait::async_trait;

use crate::Result;
use crate::event::IntegrationEvent;
use crate::memory::InMemoryDb;

/// Commits staged aggregate changes and pending domain events atomically.
///
/// `save_changes` is all-or-nothing: a version conflict or constraint
/// violation on any staged change discards the whole batch and returns the
/// error, leaving the store untouched. Events land in the outbox in the same
/// commit, so they can never be published without the state change that
/// produced them.
#[async_trait]
pub trait UnitOfWork: Send + Sync {
    /// Flushes all staged repository changes plus `events` as one commit.
    async fn save_changes(&self, events: Vec<IntegrationEvent>) -> Result<()>;

    /// Drops staged changes without committing, e.g. when a tick aborts
    /// between staging and saving.
    async fn discard_changes(&self);
}

/// Unit of work over the shared [`InMemoryDb`].
#[derive(Clone)]
pub struct InMemoryUnitOfWork {
    db: InMemoryDb,
}

impl InMemoryUnitOfWork {
    pub fn new(db: InMemoryDb) -> Self {
        Self { db }
    }
}

#[async_trait]
impl UnitOfWork for InMemoryUnitOfWork {
    async fn save_changes(&self, events: Vec<IntegrationEvent>) -> Result<()> {
        self.db.commit(events).await
    }

    async fn discard_changes(&self) {
        self.db.discard_staged().await;
    }
}
