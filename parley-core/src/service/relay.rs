//! Request orchestration.
//!
//! One method per externally observable operation; every failure is
//! classified through the crate error taxonomy and the transport layer
//! maps classes to status signaling.

use tracing::warn;

use crate::{
    config::LimitsConfig,
    models::{
        Message, MessageChanges, MessageDraft, NewMessage, Participant, RegisterDraft,
    },
    validation::RequestValidator,
    Error, Result,
};

use super::{MessageService, PresenceRegistry};

pub struct RelayService {
    presence: PresenceRegistry,
    messages: MessageService,
    validator: RequestValidator,
}

impl std::fmt::Debug for RelayService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RelayService").finish()
    }
}

impl RelayService {
    #[must_use]
    pub fn new(presence: PresenceRegistry, messages: MessageService, limits: &LimitsConfig) -> Self {
        Self {
            presence,
            messages,
            validator: RequestValidator::new()
                .with_limits(limits.max_name_len, limits.max_text_len),
        }
    }

    /// Register a participant and announce the arrival to the room.
    pub async fn register(&self, draft: &RegisterDraft) -> Result<Participant> {
        let name = self.validator.participant_name(draft.name.as_deref())?;
        let participant = self.presence.register(&name).await?;
        // Registration is not rolled back when the arrival notice fails to
        // append.
        if let Err(err) = self.messages.append(NewMessage::arrival(&name)).await {
            warn!(name = %name, error = %err, "arrival notice was not appended");
        }
        Ok(participant)
    }

    /// Refresh a participant's staleness timer.
    pub async fn heartbeat(&self, name: Option<&str>) -> Result<()> {
        let name = self.validator.participant_name(name)?;
        self.presence.heartbeat(&name).await
    }

    /// Relay a user message. The sender must be in the room; the recipient
    /// is never checked.
    pub async fn send(&self, from: Option<&str>, draft: &MessageDraft) -> Result<Message> {
        let outgoing = self.validator.send(from, draft)?;
        if !self.presence.is_active(&outgoing.from).await? {
            return Err(Error::InvalidInput(format!(
                "sender {} is not in the room",
                outgoing.from
            )));
        }
        self.messages
            .append(NewMessage::chat(
                outgoing.from,
                outgoing.to,
                outgoing.text,
                outgoing.kind,
            ))
            .await
    }

    pub async fn list_participants(&self) -> Result<Vec<Participant>> {
        self.presence.list_active().await
    }

    /// Messages visible to `viewer`, newest first; `limit = 0` means all.
    pub async fn list_messages(&self, viewer: Option<&str>, limit: usize) -> Result<Vec<Message>> {
        let viewer = self.validator.participant_name(viewer)?;
        self.messages.query(&viewer, limit).await
    }

    /// Rewrite to/text/kind of an owned message.
    pub async fn update_message(
        &self,
        raw_id: &str,
        editor: Option<&str>,
        draft: &MessageDraft,
    ) -> Result<()> {
        let (id, outgoing) = self.validator.update(raw_id, editor, draft)?;
        if !self.presence.is_active(&outgoing.from).await? {
            return Err(Error::InvalidInput(format!(
                "editor {} is not in the room",
                outgoing.from
            )));
        }
        self.messages
            .update(
                &id,
                &outgoing.from,
                MessageChanges {
                    to: outgoing.to,
                    text: outgoing.text,
                    kind: outgoing.kind,
                },
            )
            .await
    }

    /// Delete an owned message. Ownership is the only gate; presence is not
    /// re-checked.
    pub async fn delete_message(&self, raw_id: &str, requester: Option<&str>) -> Result<()> {
        let id = self.validator.message_id(raw_id)?;
        let requester = self.validator.participant_name(requester)?;
        self.messages.delete(&id, &requester).await
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use async_trait::async_trait;
    use mockall::mock;

    use super::*;
    use crate::models::{MessageId, MessageKind};
    use crate::repository::{MemoryStore, MessageRepository};
    use crate::test_helpers::{draft, relay_over};

    mock! {
        MessageRepo {}

        #[async_trait]
        impl MessageRepository for MessageRepo {
            async fn append(&self, message: NewMessage) -> Result<Message>;
            async fn get(&self, id: &MessageId) -> Result<Option<Message>>;
            async fn list_visible_to(&self, viewer: &str, limit: usize) -> Result<Vec<Message>>;
            async fn update_if_author(
                &self,
                id: &MessageId,
                author: &str,
                changes: MessageChanges,
            ) -> Result<bool>;
            async fn delete_if_author(&self, id: &MessageId, author: &str) -> Result<bool>;
        }
    }

    #[tokio::test]
    async fn test_register_validates_name() {
        let relay = relay_over(Arc::new(MemoryStore::new()));
        assert!(matches!(
            relay.register(&RegisterDraft::default()).await,
            Err(Error::InvalidInput(_))
        ));
        assert!(matches!(
            relay.register(&RegisterDraft::named("<p></p>")).await,
            Err(Error::InvalidInput(_))
        ));
    }

    #[tokio::test]
    async fn test_register_survives_arrival_append_failure() {
        let mut repo = MockMessageRepo::new();
        repo.expect_append()
            .returning(|_| Err(Error::Unavailable("message log offline".to_string())));

        let store = Arc::new(MemoryStore::new());
        let presence = PresenceRegistry::new(store.clone());
        let relay = RelayService::new(
            presence.clone(),
            MessageService::new(Arc::new(repo)),
            &LimitsConfig::default(),
        );

        // The registration stands even though the notice was lost.
        relay.register(&RegisterDraft::named("Ana")).await.unwrap();
        assert!(presence.is_active("Ana").await.unwrap());
    }

    #[tokio::test]
    async fn test_send_surfaces_store_failure_as_unavailable() {
        let mut repo = MockMessageRepo::new();
        repo.expect_append()
            .returning(|_| Err(Error::Unavailable("message log offline".to_string())));

        let store = Arc::new(MemoryStore::new());
        let presence = PresenceRegistry::new(store.clone());
        presence.register("Ana").await.unwrap();
        let relay = RelayService::new(
            presence,
            MessageService::new(Arc::new(repo)),
            &LimitsConfig::default(),
        );

        assert!(matches!(
            relay
                .send(Some("Ana"), &draft("Bob", "oi", "message"))
                .await,
            Err(Error::Unavailable(_))
        ));
    }

    #[tokio::test]
    async fn test_send_from_absent_sender_is_invalid_input() {
        let relay = relay_over(Arc::new(MemoryStore::new()));
        assert!(matches!(
            relay
                .send(Some("Ana"), &draft("Bob", "oi", "message"))
                .await,
            Err(Error::InvalidInput(_))
        ));
    }

    #[tokio::test]
    async fn test_send_sanitizes_text() {
        let relay = relay_over(Arc::new(MemoryStore::new()));
        relay.register(&RegisterDraft::named("Ana")).await.unwrap();
        let message = relay
            .send(Some("Ana"), &draft("Todos", "<b>oi</b> pessoal", "message"))
            .await
            .unwrap();
        assert_eq!(message.text, "oi pessoal");
        assert_eq!(message.kind, MessageKind::Message);
    }

    #[tokio::test]
    async fn test_update_requires_present_editor() {
        let store = Arc::new(MemoryStore::new());
        let relay = relay_over(store);
        relay.register(&RegisterDraft::named("Ana")).await.unwrap();
        let message = relay
            .send(Some("Ana"), &draft("Todos", "oi", "message"))
            .await
            .unwrap();

        assert!(matches!(
            relay
                .update_message(
                    message.id.as_str(),
                    Some("Ghost"),
                    &draft("Todos", "edited", "message"),
                )
                .await,
            Err(Error::InvalidInput(_))
        ));
    }

    #[tokio::test]
    async fn test_update_rejects_malformed_id_before_store() {
        let relay = relay_over(Arc::new(MemoryStore::new()));
        relay.register(&RegisterDraft::named("Ana")).await.unwrap();
        assert!(matches!(
            relay
                .update_message("bogus", Some("Ana"), &draft("Todos", "x", "message"))
                .await,
            Err(Error::InvalidInput(_))
        ));
    }
}
