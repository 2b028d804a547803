use axum::{
    Extension, Json,
    extract::{Path, State},
};

use parley_types::api::{ConversationListItem, GetUserConversationsResponse};
use parley_types::models::ConversationOverview;

use crate::auth::{AppState, AuthenticatedUser};
use crate::error::ApiError;

pub async fn get_user_conversations(
    State(state): State<AppState>,
    Extension(caller): Extension<AuthenticatedUser>,
    Path(user_id): Path<String>,
) -> Result<Json<GetUserConversationsResponse>, ApiError> {
    caller.require_self(&user_id)?;

    let conversations = state
        .store
        .conversation_overview(&user_id)
        .into_iter()
        .map(list_item)
        .collect();

    Ok(Json(GetUserConversationsResponse { conversations }))
}

fn list_item(overview: ConversationOverview) -> ConversationListItem {
    let ConversationOverview {
        conversation,
        last_message,
        unread_count,
    } = overview;
    ConversationListItem {
        conversation_id: conversation.id,
        destination_id: conversation.destination_id,
        conversation_type: conversation.kind,
        last_message,
        unread_count,
        updated_at: conversation.updated_at,
    }
}
