use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};

/// Length of the opaque message-id token
pub const MESSAGE_ID_LEN: usize = 24;

/// Message ID type (24-character lowercase-hex token)
///
/// Assigned by the store in strictly increasing order; lexicographic order
/// of tokens equals assignment order.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MessageId(pub String);

impl MessageId {
    #[must_use]
    pub const fn from_string(id: String) -> Self {
        Self(id)
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Parse an externally supplied token, enforcing the id shape.
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        if Self::is_valid(raw) {
            Some(Self(raw.to_string()))
        } else {
            None
        }
    }

    /// Whether `raw` has the 24-character lowercase-hex shape.
    #[must_use]
    pub fn is_valid(raw: &str) -> bool {
        raw.len() == MESSAGE_ID_LEN
            && raw.bytes().all(|b| matches!(b, b'0'..=b'9' | b'a'..=b'f'))
    }
}

impl std::fmt::Display for MessageId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for MessageId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// Allocates strictly increasing message ids.
///
/// The counter is seeded from the wall clock shifted past a 20-bit sequence
/// space, so ids allocated after a restart still sort after earlier ones.
pub struct MessageIdGenerator {
    next: AtomicU64,
}

impl MessageIdGenerator {
    #[must_use]
    pub fn new() -> Self {
        let seed = (chrono::Utc::now().timestamp_millis() as u64) << 20;
        Self {
            next: AtomicU64::new(seed),
        }
    }

    pub fn next_id(&self) -> MessageId {
        let n = self.next.fetch_add(1, Ordering::SeqCst);
        MessageId(format!("{n:024x}"))
    }
}

impl Default for MessageIdGenerator {
    fn default() -> Self {
        Self::new()
    }
}
