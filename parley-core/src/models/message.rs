use chrono::Utc;
use serde::{Deserialize, Serialize};

use super::id::MessageId;

/// Reserved recipient meaning "every active participant".
pub const BROADCAST: &str = "Todos";

/// Body of the system-generated arrival notice.
pub const ARRIVAL_TEXT: &str = "entered the room";

/// Body of the system-generated departure notice.
pub const DEPARTURE_TEXT: &str = "left the room";

/// Message classification.
///
/// `Status` is reserved for system-generated arrival/departure notices and
/// is never user-sendable, user-editable, or user-deletable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageKind {
    Message,
    PrivateMessage,
    Status,
}

impl MessageKind {
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "message" => Some(Self::Message),
            "private_message" => Some(Self::PrivateMessage),
            "status" => Some(Self::Status),
            _ => None,
        }
    }

    #[must_use]
    pub const fn is_user_sendable(self) -> bool {
        matches!(self, Self::Message | Self::PrivateMessage)
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Message => "message",
            Self::PrivateMessage => "private_message",
            Self::Status => "status",
        }
    }
}

impl std::fmt::Display for MessageKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A stored relay message.
///
/// `time` is display-only; ordering relies on `id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub id: MessageId,
    pub from: String,
    pub to: String,
    pub text: String,
    pub kind: MessageKind,
    pub time: String,
}

/// Message content before the store assigns an id.
#[derive(Debug, Clone)]
pub struct NewMessage {
    pub from: String,
    pub to: String,
    pub text: String,
    pub kind: MessageKind,
    pub time: String,
}

impl NewMessage {
    /// A validated user message, stamped with the current clock time.
    #[must_use]
    pub fn chat(from: String, to: String, text: String, kind: MessageKind) -> Self {
        Self {
            from,
            to,
            text,
            kind,
            time: clock_time(),
        }
    }

    /// The broadcast notice announcing that `name` joined.
    #[must_use]
    pub fn arrival(name: &str) -> Self {
        Self {
            from: name.to_string(),
            to: BROADCAST.to_string(),
            text: ARRIVAL_TEXT.to_string(),
            kind: MessageKind::Status,
            time: clock_time(),
        }
    }

    /// The broadcast notice announcing that `name` was evicted.
    #[must_use]
    pub fn departure(name: &str) -> Self {
        Self {
            from: name.to_string(),
            to: BROADCAST.to_string(),
            text: DEPARTURE_TEXT.to_string(),
            kind: MessageKind::Status,
            time: clock_time(),
        }
    }
}

/// The owner-editable field set. `from`, `id`, and `time` never change.
#[derive(Debug, Clone)]
pub struct MessageChanges {
    pub to: String,
    pub text: String,
    pub kind: MessageKind,
}

/// Send/update payload before validation; the author arrives out-of-band.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MessageDraft {
    pub to: Option<String>,
    pub text: Option<String>,
    pub kind: Option<String>,
}

fn clock_time() -> String {
    Utc::now().format("%H:%M:%S").to_string()
}
