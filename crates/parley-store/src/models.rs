//! Inputs accepted by the store. Ids, statuses and timestamps that the store
//! assigns itself are absent.

use parley_types::models::{ConversationKind, Message};

#[derive(Debug, Clone)]
pub struct NewUser {
    pub id: String,
    pub name: String,
    pub email: String,
}

#[derive(Debug, Clone)]
pub struct NewGroup {
    pub id: String,
    pub name: String,
    pub description: String,
    pub created_by: String,
}

/// A message as submitted by the caller, who has already resolved the
/// destination to a user or a group.
#[derive(Debug, Clone)]
pub struct NewMessage {
    pub sender_id: String,
    pub destination_id: String,
    pub text: String,
    pub kind: ConversationKind,
}

/// One page of a destination's messages, newest first.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MessagePage {
    pub messages: Vec<Message>,
    /// Id of the first message after this page, `None` on the last page.
    pub next_cursor: Option<String>,
}

impl MessagePage {
    pub fn has_more(&self) -> bool {
        self.next_cursor.is_some()
    }
}
