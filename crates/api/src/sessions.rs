//! Per-user in-memory ledger sessions.
//!
//! The ledger engine assumes a single logical writer per user: mutations
//! must be applied in order against one in-memory state. The registry
//! gives each authenticated user one `Ledger` behind a `tokio` mutex, so
//! concurrent requests for the same user serialize while different users
//! never contend.

use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::Mutex;
use uuid::Uuid;

use plata_core::Ledger;
use plata_db::{FinanceRepository, repositories::FinanceError};
use plata_shared::types::UserId;

/// Maps user ids to their live ledger sessions.
#[derive(Debug, Clone, Default)]
pub struct SessionRegistry {
    inner: Arc<DashMap<Uuid, Arc<Mutex<Ledger>>>>,
}

impl SessionRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the user's ledger session, hydrating it from storage on
    /// first access.
    ///
    /// Concurrent first accesses may both load a snapshot; the loser's
    /// copy is dropped. Hydration never writes, so the copies are
    /// identical.
    ///
    /// # Errors
    ///
    /// Returns an error if the snapshot cannot be loaded.
    pub async fn ledger(
        &self,
        repo: &FinanceRepository,
        user_id: UserId,
    ) -> Result<Arc<Mutex<Ledger>>, FinanceError> {
        if let Some(session) = self.inner.get(&user_id.into_inner()) {
            return Ok(Arc::clone(session.value()));
        }
        // Load outside any map guard so a slow query never blocks a shard.
        let snapshot = repo.load_snapshot(user_id).await?;
        let ledger = Arc::new(Mutex::new(Ledger::from_snapshot(snapshot)));
        let session = self.inner.entry(user_id.into_inner()).or_insert(ledger);
        Ok(Arc::clone(session.value()))
    }

    /// Drops the user's cached session.
    ///
    /// Called after a failed durable write: the in-memory state may be
    /// ahead of storage, and the next request must rehydrate from the
    /// last durable snapshot.
    pub fn evict(&self, user_id: UserId) {
        self.inner.remove(&user_id.into_inner());
    }
}
