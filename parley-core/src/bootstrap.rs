//! Wires stores, services, and the sweeper together.

use std::sync::Arc;

use crate::{
    config::Config,
    repository::{MemoryStore, MessageRepository, ParticipantRepository},
    service::{MessageService, PresenceRegistry, RelayService, Sweeper},
};

/// Everything a caller needs to serve relay traffic: the request-facing
/// service and the not-yet-started sweeper.
pub struct Relay {
    pub service: RelayService,
    pub sweeper: Sweeper,
}

/// Build a relay over a fresh in-memory store.
#[must_use]
pub fn build(config: &Config) -> Relay {
    let store = Arc::new(MemoryStore::new());
    build_with_stores(config, store.clone(), store)
}

/// Build a relay over caller-supplied participant and message stores.
pub fn build_with_stores(
    config: &Config,
    participants: Arc<dyn ParticipantRepository>,
    messages: Arc<dyn MessageRepository>,
) -> Relay {
    let presence = PresenceRegistry::new(participants);
    let message_service = MessageService::new(messages);
    let service = RelayService::new(
        presence.clone(),
        message_service.clone(),
        &config.limits,
    );
    let sweeper = Sweeper::new(presence, message_service);
    Relay { service, sweeper }
}
