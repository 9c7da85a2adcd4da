use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A live room participant.
///
/// At most one entry exists per name; the sweeper removes entries whose
/// `last_heartbeat` falls past the staleness threshold.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Participant {
    pub name: String,
    pub last_heartbeat: DateTime<Utc>,
}

impl Participant {
    #[must_use]
    pub fn new(name: String) -> Self {
        Self {
            name,
            last_heartbeat: Utc::now(),
        }
    }
}

/// Registration payload before validation.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RegisterDraft {
    pub name: Option<String>,
}

impl RegisterDraft {
    #[must_use]
    pub fn named(name: &str) -> Self {
        Self {
            name: Some(name.to_string()),
        }
    }
}
