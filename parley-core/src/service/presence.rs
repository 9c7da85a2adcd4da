//! Participant presence registry.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use tracing::info;

use crate::{models::Participant, repository::ParticipantRepository, Error, Result};

/// Tracks who is in the room and when each participant was last heard from.
#[derive(Clone)]
pub struct PresenceRegistry {
    participants: Arc<dyn ParticipantRepository>,
}

impl std::fmt::Debug for PresenceRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PresenceRegistry").finish()
    }
}

impl PresenceRegistry {
    #[must_use]
    pub fn new(participants: Arc<dyn ParticipantRepository>) -> Self {
        Self { participants }
    }

    /// Register a newcomer. At most one live entry exists per name.
    pub async fn register(&self, name: &str) -> Result<Participant> {
        let participant = Participant::new(name.to_string());
        if !self.participants.insert_new(participant.clone()).await? {
            return Err(Error::Conflict(format!(
                "participant {name} is already registered"
            )));
        }
        info!(name, "participant registered");
        Ok(participant)
    }

    /// Reset the staleness timer for a live participant.
    pub async fn heartbeat(&self, name: &str) -> Result<()> {
        if !self.participants.touch(name, Utc::now()).await? {
            return Err(Error::NotFound(format!(
                "participant {name} is not registered"
            )));
        }
        Ok(())
    }

    pub async fn is_active(&self, name: &str) -> Result<bool> {
        self.participants.contains(name).await
    }

    /// Snapshot of all live participants in stable store order.
    pub async fn list_active(&self) -> Result<Vec<Participant>> {
        self.participants.list().await
    }

    /// Remove every participant silent for at least `threshold` as of `now`,
    /// returning exactly the removed set.
    ///
    /// Each removal is a compare-and-delete, so a participant refreshed
    /// between scan and removal stays, and overlapping calls never report
    /// the same entry twice.
    pub async fn evict_expired(
        &self,
        threshold: Duration,
        now: DateTime<Utc>,
    ) -> Result<Vec<Participant>> {
        let cutoff = now - threshold;
        let mut evicted = Vec::new();
        for candidate in self.participants.scan_stale(cutoff).await? {
            if let Some(gone) = self
                .participants
                .remove_if_stale(&candidate.name, cutoff)
                .await?
            {
                info!(name = %gone.name, "participant evicted");
                evicted.push(gone);
            }
        }
        Ok(evicted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::MemoryStore;

    fn registry() -> (Arc<MemoryStore>, PresenceRegistry) {
        let store = Arc::new(MemoryStore::new());
        (store.clone(), PresenceRegistry::new(store))
    }

    #[tokio::test]
    async fn test_register_then_conflict() {
        let (_, presence) = registry();
        presence.register("Ana").await.unwrap();
        assert!(matches!(
            presence.register("Ana").await,
            Err(Error::Conflict(_))
        ));
    }

    #[tokio::test]
    async fn test_heartbeat_unknown_is_not_found() {
        let (_, presence) = registry();
        assert!(matches!(
            presence.heartbeat("ghost").await,
            Err(Error::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_heartbeat_refreshes_timer() {
        let (store, presence) = registry();
        presence.register("Ana").await.unwrap();
        store
            .touch("Ana", Utc::now() - Duration::seconds(60))
            .await
            .unwrap();

        presence.heartbeat("Ana").await.unwrap();
        let evicted = presence
            .evict_expired(Duration::seconds(10), Utc::now())
            .await
            .unwrap();
        assert!(evicted.is_empty());
    }

    #[tokio::test]
    async fn test_evict_expired_removes_only_stale() {
        let (store, presence) = registry();
        presence.register("fresh").await.unwrap();
        presence.register("stale").await.unwrap();
        store
            .touch("stale", Utc::now() - Duration::seconds(60))
            .await
            .unwrap();

        let evicted = presence
            .evict_expired(Duration::seconds(10), Utc::now())
            .await
            .unwrap();
        assert_eq!(evicted.len(), 1);
        assert_eq!(evicted[0].name, "stale");

        assert!(presence.is_active("fresh").await.unwrap());
        assert!(!presence.is_active("stale").await.unwrap());
    }

    #[tokio::test]
    async fn test_evict_expired_boundary_is_inclusive() {
        let (store, presence) = registry();
        presence.register("edge").await.unwrap();
        let now = Utc::now();
        store
            .touch("edge", now - Duration::seconds(10))
            .await
            .unwrap();

        // Exactly threshold-old silence evicts.
        let evicted = presence
            .evict_expired(Duration::seconds(10), now)
            .await
            .unwrap();
        assert_eq!(evicted.len(), 1);
    }

    #[tokio::test]
    async fn test_concurrent_eviction_reports_once() {
        let (store, presence) = registry();
        presence.register("stale").await.unwrap();
        store
            .touch("stale", Utc::now() - Duration::seconds(60))
            .await
            .unwrap();

        let now = Utc::now();
        let (a, b) = tokio::join!(
            presence.evict_expired(Duration::seconds(10), now),
            presence.evict_expired(Duration::seconds(10), now),
        );
        let total = a.unwrap().len() + b.unwrap().len();
        assert_eq!(total, 1);
    }
}
