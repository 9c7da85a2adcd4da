//! Test helpers and fixtures for parley-core tests.

use std::sync::Arc;

use crate::config::LimitsConfig;
use crate::models::MessageDraft;
use crate::repository::MemoryStore;
use crate::service::{MessageService, PresenceRegistry, RelayService};

/// A send/update draft with every field present.
pub fn draft(to: &str, text: &str, kind: &str) -> MessageDraft {
    MessageDraft {
        to: Some(to.to_string()),
        text: Some(text.to_string()),
        kind: Some(kind.to_string()),
    }
}

/// A relay service with default limits over the given store.
pub fn relay_over(store: Arc<MemoryStore>) -> RelayService {
    RelayService::new(
        PresenceRegistry::new(store.clone()),
        MessageService::new(store),
        &LimitsConfig::default(),
    )
}
