//! Input validation for relay requests.
//!
//! Every string field is normalized through [`crate::sanitize::strip`]
//! before the emptiness and length checks run; callers cannot tell a
//! normalization failure from a post-normalization empty field.

use crate::models::{MessageDraft, MessageId, MessageKind, MESSAGE_ID_LEN};
use crate::sanitize;

// Canonical validation limits
/// Maximum participant-name length
pub const NAME_MAX: usize = 50;
/// Maximum message-text length
pub const TEXT_MAX: usize = 500;

/// Validation error
#[derive(Debug, Clone, thiserror::Error)]
pub enum ValidationError {
    #[error("invalid {field}: {message}")]
    Field { field: String, message: String },
}

/// Validation result
pub type ValidationResult<T> = Result<T, ValidationError>;

/// A fully validated, normalized send/update payload.
#[derive(Debug, Clone)]
pub struct OutgoingMessage {
    pub from: String,
    pub to: String,
    pub text: String,
    pub kind: MessageKind,
}

/// Normalizes and checks raw relay inputs.
pub struct RequestValidator {
    max_name_len: usize,
    max_text_len: usize,
}

impl Default for RequestValidator {
    fn default() -> Self {
        Self {
            max_name_len: NAME_MAX,
            max_text_len: TEXT_MAX,
        }
    }
}

impl RequestValidator {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub const fn with_limits(mut self, max_name_len: usize, max_text_len: usize) -> Self {
        self.max_name_len = max_name_len;
        self.max_text_len = max_text_len;
        self
    }

    /// Validate a participant name (registration, heartbeat, viewer).
    pub fn participant_name(&self, raw: Option<&str>) -> ValidationResult<String> {
        self.normalized("name", raw, self.max_name_len)
    }

    /// Validate a user send request.
    pub fn send(&self, from: Option<&str>, draft: &MessageDraft) -> ValidationResult<OutgoingMessage> {
        let from = self.normalized("from", from, self.max_name_len)?;
        let to = self.normalized("to", draft.to.as_deref(), self.max_name_len)?;
        let text = self.normalized("text", draft.text.as_deref(), self.max_text_len)?;
        let kind = self.user_kind(draft.kind.as_deref())?;
        Ok(OutgoingMessage {
            from,
            to,
            text,
            kind,
        })
    }

    /// Validate an update request: the send shape plus the id token.
    pub fn update(
        &self,
        raw_id: &str,
        editor: Option<&str>,
        draft: &MessageDraft,
    ) -> ValidationResult<(MessageId, OutgoingMessage)> {
        let id = self.message_id(raw_id)?;
        let outgoing = self.send(editor, draft)?;
        Ok((id, outgoing))
    }

    /// Validate a message-id token. Shape violations never reach the store.
    pub fn message_id(&self, raw: &str) -> ValidationResult<MessageId> {
        MessageId::parse(raw.trim()).ok_or_else(|| ValidationError::Field {
            field: "id".to_string(),
            message: format!("must be a {MESSAGE_ID_LEN}-character token"),
        })
    }

    fn user_kind(&self, raw: Option<&str>) -> ValidationResult<MessageKind> {
        let invalid = || ValidationError::Field {
            field: "kind".to_string(),
            message: "must be message or private_message".to_string(),
        };
        let value = sanitize::strip(raw.unwrap_or_default()).map_err(|_| invalid())?;
        match MessageKind::parse(&value) {
            Some(kind) if kind.is_user_sendable() => Ok(kind),
            _ => Err(invalid()),
        }
    }

    fn normalized(
        &self,
        field: &str,
        raw: Option<&str>,
        max_len: usize,
    ) -> ValidationResult<String> {
        let value =
            sanitize::strip(raw.unwrap_or_default()).map_err(|_| ValidationError::Field {
                field: field.to_string(),
                message: "is not parseable".to_string(),
            })?;
        if value.is_empty() {
            return Err(ValidationError::Field {
                field: field.to_string(),
                message: "must not be empty".to_string(),
            });
        }
        if value.len() > max_len {
            return Err(ValidationError::Field {
                field: field.to_string(),
                message: format!("must be at most {max_len} characters"),
            });
        }
        Ok(value)
    }
}
