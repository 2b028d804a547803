use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::{ConversationKind, Message, MessageStatus};

// -- Messages --

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SendMessageRequest {
    /// Optional; when present it must match the authenticated user.
    #[serde(default)]
    pub sender_id: Option<String>,
    pub destination_id: String,
    pub message: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SendMessageResponse {
    pub message_id: String,
    pub status: MessageStatus,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct GetMessagesResponse {
    pub messages: Vec<Message>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_cursor: Option<String>,
    pub has_more: bool,
}

// -- Acknowledgements --

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AckRequest {
    /// Optional; when present it must match the authenticated user.
    #[serde(default)]
    pub user_id: Option<String>,
    pub message_id: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AckResponse {
    pub message: String,
}

// -- Conversations --

#[derive(Debug, Serialize, Deserialize)]
pub struct ConversationListItem {
    pub conversation_id: String,
    pub destination_id: String,
    pub conversation_type: ConversationKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_message: Option<Message>,
    pub unread_count: usize,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct GetUserConversationsResponse {
    pub conversations: Vec<ConversationListItem>,
}

// -- Search --

#[derive(Debug, Serialize, Deserialize)]
pub struct SearchMessagesResponse {
    pub results: Vec<Message>,
    pub query: String,
}

// -- Errors --

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    pub code: String,
    pub message: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: ErrorBody,
}
