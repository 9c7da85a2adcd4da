use async_trait::async_trait;

use crate::{
    models::{Message, MessageChanges, MessageId, NewMessage},
    Result,
};

/// Narrow durable-store interface for the message log.
///
/// Backends map their own failures to `Error::Unavailable`.
#[async_trait]
pub trait MessageRepository: Send + Sync {
    /// Persist a message under a freshly assigned id. Ids are strictly
    /// increasing in append order; the message is durable before this
    /// returns.
    async fn append(&self, message: NewMessage) -> Result<Message>;

    async fn get(&self, id: &MessageId) -> Result<Option<Message>>;

    /// Messages routed to `viewer` (broadcast, authored by, or addressed
    /// to), newest first. `limit = 0` means unlimited.
    async fn list_visible_to(&self, viewer: &str, limit: usize) -> Result<Vec<Message>>;

    /// Conditional update: rewrite to/text/kind only while `from` still
    /// equals `author`. Returns false when no record matched.
    async fn update_if_author(
        &self,
        id: &MessageId,
        author: &str,
        changes: MessageChanges,
    ) -> Result<bool>;

    /// Conditional delete with the same match rule as `update_if_author`.
    async fn delete_if_author(&self, id: &MessageId, author: &str) -> Result<bool>;
}
