use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Group {
    pub id: String,
    pub name: String,
    pub description: String,
    pub created_by: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Whether a message (and the conversation it belongs to) targets a single
/// user or a group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ConversationKind {
    OneToOne,
    Group,
}

impl fmt::Display for ConversationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OneToOne => f.write_str("one-to-one"),
            Self::Group => f.write_str("group"),
        }
    }
}

/// Delivery state of a message. Ordered so that `Sent < Delivered < Read`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MessageStatus {
    /// Single tick
    Sent,
    /// Double tick
    Delivered,
    /// Blue double tick
    Read,
}

impl MessageStatus {
    /// True if moving from `self` to `next` goes forward in the state machine.
    pub fn can_advance_to(self, next: MessageStatus) -> bool {
        next > self
    }
}

impl fmt::Display for MessageStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Sent => f.write_str("SENT"),
            Self::Delivered => f.write_str("DELIVERED"),
            Self::Read => f.write_str("READ"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub id: String,
    pub sender_id: String,
    /// A user id for one-to-one messages, a group id for group messages.
    pub destination_id: String,
    #[serde(rename = "message_text")]
    pub text: String,
    pub status: MessageStatus,
    #[serde(rename = "conversation_type")]
    pub kind: ConversationKind,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Message {
    /// True if `user_id` receives this message directly, i.e. it is the
    /// one-to-one recipient. Group recipients depend on membership and are
    /// resolved by the store.
    pub fn is_direct_recipient(&self, user_id: &str) -> bool {
        self.kind == ConversationKind::OneToOne && self.destination_id == user_id
    }
}

/// Read receipt: evidence that `user_id` has read `message_id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageRead {
    pub id: String,
    pub message_id: String,
    pub user_id: String,
    pub created_at: DateTime<Utc>,
}

/// A user's view of one conversation, used to build the chat list screen.
///
/// For one-to-one conversations `destination_id` is the other party; for
/// group conversations it is the group id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserConversation {
    pub id: String,
    pub user_id: String,
    pub destination_id: String,
    #[serde(rename = "conversation_type")]
    pub kind: ConversationKind,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A conversation row joined with its most recent message and the number of
/// messages the owning user has not read yet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversationOverview {
    pub conversation: UserConversation,
    pub last_message: Option<Message>,
    pub unread_count: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_only_advances_forward() {
        assert!(MessageStatus::Sent.can_advance_to(MessageStatus::Delivered));
        assert!(MessageStatus::Delivered.can_advance_to(MessageStatus::Read));
        assert!(MessageStatus::Sent.can_advance_to(MessageStatus::Read));
        assert!(!MessageStatus::Read.can_advance_to(MessageStatus::Delivered));
        assert!(!MessageStatus::Delivered.can_advance_to(MessageStatus::Delivered));
    }

    #[test]
    fn wire_names() {
        assert_eq!(serde_json::to_string(&MessageStatus::Delivered).unwrap(), "\"DELIVERED\"");
        assert_eq!(serde_json::to_string(&ConversationKind::OneToOne).unwrap(), "\"one-to-one\"");
        assert_eq!(
            serde_json::from_str::<ConversationKind>("\"group\"").unwrap(),
            ConversationKind::Group
        );
        assert_eq!(MessageStatus::Read.to_string(), "READ");
    }
}
