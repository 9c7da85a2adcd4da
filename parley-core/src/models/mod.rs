pub mod id;
pub mod message;
pub mod participant;

pub use id::{MessageId, MessageIdGenerator, MESSAGE_ID_LEN};
pub use message::{
    Message, MessageChanges, MessageDraft, MessageKind, NewMessage, ARRIVAL_TEXT, BROADCAST,
    DEPARTURE_TEXT,
};
pub use participant::{Participant, RegisterDraft};
