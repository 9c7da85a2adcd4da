pub mod messages;
pub mod presence;
pub mod relay;
pub mod sweeper;

pub use messages::MessageService;
pub use presence::PresenceRegistry;
pub use relay::RelayService;
pub use sweeper::{Sweeper, STALE_AFTER_SECS, SWEEP_INTERVAL};
