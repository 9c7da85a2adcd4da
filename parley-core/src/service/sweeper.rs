//! Periodic eviction of silent participants.

use chrono::{DateTime, Utc};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{error, info, warn};

use crate::models::NewMessage;
use crate::Result;

use super::{MessageService, PresenceRegistry};

/// How often the sweep runs. Fixed by the relay contract, not configuration.
pub const SWEEP_INTERVAL: std::time::Duration = std::time::Duration::from_secs(10);

/// How long a participant may stay silent before eviction, in seconds.
pub const STALE_AFTER_SECS: i64 = 10;

pub struct Sweeper {
    presence: PresenceRegistry,
    messages: MessageService,
}

impl std::fmt::Debug for Sweeper {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Sweeper").finish()
    }
}

impl Sweeper {
    #[must_use]
    pub fn new(presence: PresenceRegistry, messages: MessageService) -> Self {
        Self { presence, messages }
    }

    /// Run the sweep loop until the returned handle is aborted.
    ///
    /// Ticks are serialized: the next tick is not taken while a sweep is
    /// still in flight.
    #[must_use]
    pub fn start(self) -> JoinHandle<()> {
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(SWEEP_INTERVAL);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                interval.tick().await;
                match self.sweep_once(Utc::now()).await {
                    Ok(0) => {}
                    Ok(evicted) => info!(evicted, "swept silent participants"),
                    // The tick is abandoned; the next interval retries.
                    Err(err) => error!(error = %err, "sweep failed"),
                }
            }
        })
    }

    /// One eviction pass: remove everyone silent past the threshold as of
    /// `now` and announce each departure.
    pub async fn sweep_once(&self, now: DateTime<Utc>) -> Result<usize> {
        let evicted = self
            .presence
            .evict_expired(chrono::Duration::seconds(STALE_AFTER_SECS), now)
            .await?;
        for participant in &evicted {
            // Departure notices are independent; one failed append must not
            // hold back the rest or undo the eviction.
            if let Err(err) = self
                .messages
                .append(NewMessage::departure(&participant.name))
                .await
            {
                warn!(name = %participant.name, error = %err, "departure notice was not appended");
            }
        }
        Ok(evicted.len())
    }
}
