use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::{models::Participant, Result};

/// Narrow durable-store interface for the participant collection.
///
/// Each operation must be atomic with respect to concurrent calls on the
/// same name; backends map their own failures to `Error::Unavailable`.
#[async_trait]
pub trait ParticipantRepository: Send + Sync {
    /// Insert if no entry with the same name exists. Returns false on a
    /// name collision, leaving the existing entry untouched.
    async fn insert_new(&self, participant: Participant) -> Result<bool>;

    /// Set `last_heartbeat` on an existing entry. Returns false when the
    /// name is not present.
    async fn touch(&self, name: &str, at: DateTime<Utc>) -> Result<bool>;

    async fn contains(&self, name: &str) -> Result<bool>;

    /// Snapshot of all live entries in stable store order.
    async fn list(&self) -> Result<Vec<Participant>>;

    /// Entries with `last_heartbeat <= cutoff`.
    async fn scan_stale(&self, cutoff: DateTime<Utc>) -> Result<Vec<Participant>>;

    /// Compare-and-delete: remove the entry only while it is still stale at
    /// removal time. Returns the removed entry, or None when the name is
    /// gone or was refreshed concurrently.
    async fn remove_if_stale(
        &self,
        name: &str,
        cutoff: DateTime<Utc>,
    ) -> Result<Option<Participant>>;
}
