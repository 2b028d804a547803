use serde::{Deserialize, Serialize};

use crate::models::{Message, MessageStatus};

/// Events pushed to connected clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum NotificationEvent {
    /// A new message was posted to a destination the client listens on
    MessageCreate { message: Message },

    /// A recipient acknowledged delivery or read of a message
    MessageStatusUpdate {
        message_id: String,
        user_id: String,
        status: MessageStatus,
    },
}

impl NotificationEvent {
    /// The message this event is about.
    pub fn message_id(&self) -> &str {
        match self {
            Self::MessageCreate { message } => &message.id,
            Self::MessageStatusUpdate { message_id, .. } => message_id,
        }
    }
}
