//! Message types - One turn in the conversation
//!
//! Messages are append-only: once a message is created and inserted into a
//! session it is never mutated or removed.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Who authored a message.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    User,
    Assistant,
}

/// A single turn in the conversation.
///
/// `content` may contain structured markup (headings, fenced code blocks,
/// tables); interpreting it is the renderer's job, this crate passes it
/// through untouched.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct Message {
    /// Session-monotonic identifier, assigned at creation time.
    pub id: u64,
    pub role: Role,
    pub content: String,
    /// Creation instant, immutable once set.
    pub timestamp: DateTime<Utc>,
}

impl Message {
    /// Create a message stamped with the current time.
    pub fn new(id: u64, role: Role, content: impl Into<String>) -> Self {
        Self {
            id,
            role,
            content: content.into(),
            timestamp: Utc::now(),
        }
    }

    pub fn user(id: u64, content: impl Into<String>) -> Self {
        Self::new(id, Role::User, content)
    }

    pub fn assistant(id: u64, content: impl Into<String>) -> Self {
        Self::new(id, Role::Assistant, content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_serialization() {
        assert_eq!(serde_json::to_string(&Role::User).unwrap(), "\"user\"");
        assert_eq!(
            serde_json::to_string(&Role::Assistant).unwrap(),
            "\"assistant\""
        );
    }

    #[test]
    fn test_constructors_set_role() {
        assert_eq!(Message::user(1, "hi").role, Role::User);
        assert_eq!(Message::assistant(2, "hello").role, Role::Assistant);
    }
}
