//! Inbound chat message record.
//!
//! # Responsibility
//! - Mirror the host's public-chat message shape (`id`, `text`, `senderId`,
//!   `senderName`, `createdAt`).
//! - Reject malformed records before they reach dedup or aggregation.
//!
//! # Invariants
//! - A valid message has a non-blank `id`, non-blank `text` and a timestamp.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// One message delivered by the host message source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageEvent {
    /// Host-assigned message id; the dedup key.
    pub id: String,
    /// Raw message body.
    pub text: String,
    #[serde(default)]
    pub sender_id: String,
    #[serde(default)]
    pub sender_name: String,
    /// Unix epoch milliseconds. `None` marks a malformed record.
    #[serde(default)]
    pub created_at: Option<i64>,
}

impl MessageEvent {
    /// Creates a message with empty sender metadata.
    pub fn new(id: impl Into<String>, text: impl Into<String>, created_at: i64) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
            sender_id: String::new(),
            sender_name: String::new(),
            created_at: Some(created_at),
        }
    }

    /// Attaches sender metadata.
    pub fn with_sender(
        mut self,
        sender_id: impl Into<String>,
        sender_name: impl Into<String>,
    ) -> Self {
        self.sender_id = sender_id.into();
        self.sender_name = sender_name.into();
        self
    }

    /// Checks the fields ingestion depends on.
    pub fn validate(&self) -> Result<(), MessageValidationError> {
        if self.id.trim().is_empty() {
            return Err(MessageValidationError::EmptyId);
        }
        if self.text.trim().is_empty() {
            return Err(MessageValidationError::EmptyText {
                id: self.id.clone(),
            });
        }
        if self.created_at.is_none() {
            return Err(MessageValidationError::MissingTimestamp {
                id: self.id.clone(),
            });
        }
        Ok(())
    }
}

/// Reason a message was dropped before aggregation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MessageValidationError {
    EmptyId,
    EmptyText { id: String },
    MissingTimestamp { id: String },
}

impl Display for MessageValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyId => write!(f, "message id cannot be empty"),
            Self::EmptyText { id } => write!(f, "message `{id}` has empty text"),
            Self::MissingTimestamp { id } => write!(f, "message `{id}` has no createdAt"),
        }
    }
}

impl Error for MessageValidationError {}

#[cfg(test)]
mod tests {
    use super::{MessageEvent, MessageValidationError};

    #[test]
    fn validate_accepts_complete_message() {
        let message = MessageEvent::new("m-1", "hello", 1_700_000_000_000).with_sender("u-1", "Ada");
        assert!(message.validate().is_ok());
    }

    #[test]
    fn validate_rejects_blank_fields_in_order() {
        let mut message = MessageEvent::new("  ", "", 1);
        assert_eq!(message.validate(), Err(MessageValidationError::EmptyId));

        message.id = "m-2".to_string();
        assert!(matches!(
            message.validate(),
            Err(MessageValidationError::EmptyText { .. })
        ));

        message.text = "hi".to_string();
        message.created_at = None;
        assert!(matches!(
            message.validate(),
            Err(MessageValidationError::MissingTimestamp { .. })
        ));
    }
}
