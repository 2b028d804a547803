use axum::{
    Extension, Json,
    extract::{State, rejection::JsonRejection},
};
use tracing::{debug, info};

use parley_types::api::{AckRequest, AckResponse};
use parley_types::events::NotificationEvent;
use parley_types::models::{ConversationKind, Message, MessageStatus};

use crate::auth::{AppState, AuthenticatedUser};
use crate::error::ApiError;

pub async fn ack_delivered(
    State(state): State<AppState>,
    Extension(caller): Extension<AuthenticatedUser>,
    payload: Result<Json<AckRequest>, JsonRejection>,
) -> Result<Json<AckResponse>, ApiError> {
    let Json(req) = payload?;
    let (user_id, message) = authorize_recipient(&state, &caller, &req)?;

    if state
        .store
        .advance_message_status(&message.id, MessageStatus::Delivered)?
    {
        info!("Message {} delivered to {}", message.id, user_id);
        notify_sender(&state, &message, &user_id, MessageStatus::Delivered);
    } else {
        debug!("Message {} already past SENT, delivery ack ignored", message.id);
    }

    Ok(Json(AckResponse {
        message: "Message delivered".into(),
    }))
}

pub async fn ack_read(
    State(state): State<AppState>,
    Extension(caller): Extension<AuthenticatedUser>,
    payload: Result<Json<AckRequest>, JsonRejection>,
) -> Result<Json<AckResponse>, ApiError> {
    let Json(req) = payload?;
    let (user_id, message) = authorize_recipient(&state, &caller, &req)?;

    if state.store.create_message_read(&message.id, &user_id)? {
        info!("Message {} read by {}", message.id, user_id);
        notify_sender(&state, &message, &user_id, MessageStatus::Read);
    } else {
        debug!("Message {} already read by {}", message.id, user_id);
    }

    Ok(Json(AckResponse {
        message: "Message marked as read".into(),
    }))
}

/// Resolve the acting user and the message, and check the user actually
/// receives it: the one-to-one addressee, or a group member other than the
/// sender.
fn authorize_recipient(
    state: &AppState,
    caller: &AuthenticatedUser,
    req: &AckRequest,
) -> Result<(String, Message), ApiError> {
    let user_id = caller.acting_as(req.user_id.as_deref())?;
    let message = state.store.get_message(&req.message_id)?;

    let is_recipient = match message.kind {
        ConversationKind::OneToOne => message.is_direct_recipient(&user_id),
        ConversationKind::Group => {
            message.sender_id != user_id
                && state.store.is_group_member(&message.destination_id, &user_id)
        }
    };
    if !is_recipient {
        return Err(ApiError::NotMessageRecipient);
    }
    Ok((user_id, message))
}

fn notify_sender(state: &AppState, message: &Message, user_id: &str, status: MessageStatus) {
    // offline senders pick the status up from the next page fetch
    let _ = state.dispatcher.send_to(
        &message.sender_id,
        NotificationEvent::MessageStatusUpdate {
            message_id: message.id.clone(),
            user_id: user_id.to_string(),
            status,
        },
    );
}
