//! Ordered message log with routing and owner-gated mutation.

use std::sync::Arc;

use tracing::info;

use crate::{
    models::{Message, MessageChanges, MessageId, MessageKind, NewMessage},
    repository::MessageRepository,
    Error, Result,
};

#[derive(Clone)]
pub struct MessageService {
    messages: Arc<dyn MessageRepository>,
}

impl std::fmt::Debug for MessageService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MessageService").finish()
    }
}

impl MessageService {
    #[must_use]
    pub fn new(messages: Arc<dyn MessageRepository>) -> Self {
        Self { messages }
    }

    /// Append an already validated message to the log.
    pub async fn append(&self, message: NewMessage) -> Result<Message> {
        let stored = self.messages.append(message).await?;
        info!(id = %stored.id, from = %stored.from, to = %stored.to, kind = %stored.kind, "message appended");
        Ok(stored)
    }

    /// Messages visible to `viewer`, newest first. `limit = 0` returns all.
    pub async fn query(&self, viewer: &str, limit: usize) -> Result<Vec<Message>> {
        self.messages.list_visible_to(viewer, limit).await
    }

    /// Replace to/text/kind of a message owned by `editor`.
    pub async fn update(
        &self,
        id: &MessageId,
        editor: &str,
        changes: MessageChanges,
    ) -> Result<()> {
        self.require_owned(id, editor).await?;
        // The conditional write re-checks authorship; `from` never changes,
        // so a false match means the message vanished concurrently.
        if !self.messages.update_if_author(id, editor, changes).await? {
            return Err(Error::NotFound(format!("message {id} not found")));
        }
        info!(id = %id, editor, "message updated");
        Ok(())
    }

    /// Permanently remove a message owned by `requester`.
    pub async fn delete(&self, id: &MessageId, requester: &str) -> Result<()> {
        self.require_owned(id, requester).await?;
        if !self.messages.delete_if_author(id, requester).await? {
            return Err(Error::NotFound(format!("message {id} not found")));
        }
        info!(id = %id, requester, "message deleted");
        Ok(())
    }

    async fn require_owned(&self, id: &MessageId, requester: &str) -> Result<Message> {
        let message = self
            .messages
            .get(id)
            .await?
            .ok_or_else(|| Error::NotFound(format!("message {id} not found")))?;
        if message.kind == MessageKind::Status {
            return Err(Error::Forbidden(
                "status messages cannot be modified".to_string(),
            ));
        }
        if message.from != requester {
            return Err(Error::Forbidden(
                "only the author may modify a message".to_string(),
            ));
        }
        Ok(message)
    }
}
