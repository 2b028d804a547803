use axum::{
    Extension, Json,
    extract::{Path, Query, State},
};
use serde::Deserialize;
use tracing::debug;

use parley_types::api::SearchMessagesResponse;

use crate::auth::{AppState, AuthenticatedUser};
use crate::error::ApiError;

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    pub query: String,
}

pub async fn search_messages(
    State(state): State<AppState>,
    Extension(caller): Extension<AuthenticatedUser>,
    Path(user_id): Path<String>,
    Query(params): Query<SearchQuery>,
) -> Result<Json<SearchMessagesResponse>, ApiError> {
    caller.require_self(&user_id)?;

    if !state.config.enable_search {
        return Err(ApiError::FeatureDisabled("search"));
    }
    if params.query.trim().is_empty() {
        return Err(ApiError::SearchQueryRequired);
    }

    let results = state.store.search_messages(&user_id, &params.query);
    debug!("Search by {} matched {} message(s)", user_id, results.len());

    Ok(Json(SearchMessagesResponse {
        results,
        query: params.query,
    }))
}
