use axum::{
    Extension, Json,
    extract::{Path, Query, State, rejection::JsonRejection},
    http::StatusCode,
    response::IntoResponse,
};
use serde::Deserialize;
use tracing::{debug, info};

use parley_store::NewMessage;
use parley_types::api::{GetMessagesResponse, SendMessageRequest, SendMessageResponse};
use parley_types::models::ConversationKind;

use crate::auth::{AppState, AuthenticatedUser};
use crate::error::ApiError;

pub const DEFAULT_PAGE_SIZE: usize = 50;
pub const MAX_PAGE_SIZE: usize = 100;

#[derive(Debug, Deserialize)]
pub struct MessageQuery {
    /// Kept as text so a malformed value falls back to the default.
    pub limit: Option<String>,
    /// Id of the last message of the previous page.
    #[serde(default)]
    pub cursor: String,
}

impl MessageQuery {
    pub fn page_size(&self) -> usize {
        self.limit
            .as_deref()
            .and_then(|limit| limit.trim().parse::<usize>().ok())
            .filter(|limit| *limit > 0)
            .map_or(DEFAULT_PAGE_SIZE, |limit| limit.min(MAX_PAGE_SIZE))
    }
}

pub async fn send_message(
    State(state): State<AppState>,
    Extension(caller): Extension<AuthenticatedUser>,
    payload: Result<Json<SendMessageRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(req) = payload?;

    if req.message.trim().is_empty() {
        return Err(ApiError::MessageEmpty);
    }

    let sender_id = caller.acting_as(req.sender_id.as_deref())?;
    state
        .store
        .get_user(&sender_id)
        .map_err(|_| ApiError::SenderNotFound)?;

    let kind = if state.store.get_group(&req.destination_id).is_ok() {
        if !state.config.enable_group_chat {
            return Err(ApiError::FeatureDisabled("group chat"));
        }
        if !state.store.is_group_member(&req.destination_id, &sender_id) {
            return Err(ApiError::NotGroupMember);
        }
        ConversationKind::Group
    } else {
        state
            .store
            .get_user(&req.destination_id)
            .map_err(|_| ApiError::DestinationNotFound)?;
        ConversationKind::OneToOne
    };

    let text = clamp_text(&req.message, state.config.max_message_length);
    let message = state.store.create_message(NewMessage {
        sender_id,
        destination_id: req.destination_id,
        text,
        kind,
    })?;

    info!(
        "Message {} sent from {} to {} ({})",
        message.id, message.sender_id, message.destination_id, message.kind
    );

    Ok((
        StatusCode::CREATED,
        Json(SendMessageResponse {
            message_id: message.id,
            status: message.status,
        }),
    ))
}

pub async fn get_messages(
    State(state): State<AppState>,
    Extension(caller): Extension<AuthenticatedUser>,
    Path(destination_id): Path<String>,
    Query(query): Query<MessageQuery>,
) -> Result<Json<GetMessagesResponse>, ApiError> {
    if state.store.get_group(&destination_id).is_ok() {
        if !state.store.is_group_member(&destination_id, &caller.user_id) {
            return Err(ApiError::NotGroupMember);
        }
    } else {
        // a user destination is that user's inbox
        caller.require_self(&destination_id)?;
    }

    let limit = query.page_size();
    let page = state.store.get_messages(&destination_id, limit, &query.cursor)?;
    debug!(
        "{} fetched {} message(s) from {}",
        caller.user_id,
        page.messages.len(),
        destination_id
    );

    let has_more = page.has_more();
    Ok(Json(GetMessagesResponse {
        messages: page.messages,
        next_cursor: page.next_cursor,
        has_more,
    }))
}

/// Trim surrounding whitespace and cut to `max_chars` characters (0 means no limit).
fn clamp_text(text: &str, max_chars: usize) -> String {
    let text = text.trim();
    if max_chars == 0 || text.chars().count() <= max_chars {
        return text.to_string();
    }
    text.chars().take(max_chars).collect()
}
