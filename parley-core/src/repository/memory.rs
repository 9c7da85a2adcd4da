//! In-memory backing store.
//!
//! Serves the test suite and embedded deployments; a durable backend
//! implements the same traits and maps its failures to `Error::Unavailable`.

use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use parking_lot::RwLock;

use crate::models::{
    Message, MessageChanges, MessageId, MessageIdGenerator, NewMessage, Participant, BROADCAST,
};
use crate::Result;

use super::{MessageRepository, ParticipantRepository};

#[derive(Default)]
pub struct MemoryStore {
    participants: DashMap<String, Participant>,
    messages: RwLock<BTreeMap<MessageId, Message>>,
    ids: MessageIdGenerator,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ParticipantRepository for MemoryStore {
    async fn insert_new(&self, participant: Participant) -> Result<bool> {
        match self.participants.entry(participant.name.clone()) {
            Entry::Occupied(_) => Ok(false),
            Entry::Vacant(slot) => {
                slot.insert(participant);
                Ok(true)
            }
        }
    }

    async fn touch(&self, name: &str, at: DateTime<Utc>) -> Result<bool> {
        Ok(self
            .participants
            .get_mut(name)
            .map(|mut entry| entry.last_heartbeat = at)
            .is_some())
    }

    async fn contains(&self, name: &str) -> Result<bool> {
        Ok(self.participants.contains_key(name))
    }

    async fn list(&self) -> Result<Vec<Participant>> {
        let mut all: Vec<Participant> = self
            .participants
            .iter()
            .map(|entry| entry.value().clone())
            .collect();
        all.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(all)
    }

    async fn scan_stale(&self, cutoff: DateTime<Utc>) -> Result<Vec<Participant>> {
        Ok(self
            .participants
            .iter()
            .filter(|entry| entry.value().last_heartbeat <= cutoff)
            .map(|entry| entry.value().clone())
            .collect())
    }

    async fn remove_if_stale(
        &self,
        name: &str,
        cutoff: DateTime<Utc>,
    ) -> Result<Option<Participant>> {
        Ok(self
            .participants
            .remove_if(name, |_, participant| participant.last_heartbeat <= cutoff)
            .map(|(_, participant)| participant))
    }
}

#[async_trait]
impl MessageRepository for MemoryStore {
    async fn append(&self, message: NewMessage) -> Result<Message> {
        let mut log = self.messages.write();
        // Id assignment inside the write section keeps id order equal to
        // commit order.
        let id = self.ids.next_id();
        let stored = Message {
            id: id.clone(),
            from: message.from,
            to: message.to,
            text: message.text,
            kind: message.kind,
            time: message.time,
        };
        log.insert(id, stored.clone());
        Ok(stored)
    }

    async fn get(&self, id: &MessageId) -> Result<Option<Message>> {
        Ok(self.messages.read().get(id).cloned())
    }

    async fn list_visible_to(&self, viewer: &str, limit: usize) -> Result<Vec<Message>> {
        let log = self.messages.read();
        let visible = log
            .values()
            .rev()
            .filter(|m| m.to == BROADCAST || m.from == viewer || m.to == viewer)
            .cloned();
        Ok(if limit == 0 {
            visible.collect()
        } else {
            visible.take(limit).collect()
        })
    }

    async fn update_if_author(
        &self,
        id: &MessageId,
        author: &str,
        changes: MessageChanges,
    ) -> Result<bool> {
        let mut log = self.messages.write();
        match log.get_mut(id) {
            Some(message) if message.from == author => {
                message.to = changes.to;
                message.text = changes.text;
                message.kind = changes.kind;
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn delete_if_author(&self, id: &MessageId, author: &str) -> Result<bool> {
        let mut log = self.messages.write();
        match log.get(id) {
            Some(message) if message.from == author => {
                log.remove(id);
                Ok(true)
            }
            _ => Ok(false),
        }
    }
}
