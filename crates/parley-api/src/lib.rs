pub mod acks;
pub mod auth;
pub mod config;
pub mod conversations;
pub mod error;
pub mod messages;
pub mod middleware;
pub mod search;

use axum::{
    Router, middleware as axum_middleware,
    routing::{get, post},
};

pub use auth::{AppState, AppStateInner, AuthenticatedUser};
pub use config::{ApiConfig, ClientCredentials};
pub use error::ApiError;

/// All REST routes. `/health` is public, everything under `/api/v1` goes
/// through basic auth.
pub fn router(state: AppState) -> Router {
    let protected_routes = Router::new()
        .route("/sendMessage", post(messages::send_message))
        .route("/ack/delivered", post(acks::ack_delivered))
        .route("/ack/read", post(acks::ack_read))
        .route("/conversations/{destination_id}/messages", get(messages::get_messages))
        .route("/users/{user_id}/conversations", get(conversations::get_user_conversations))
        .route("/search/{user_id}", get(search::search_messages))
        .layer(axum_middleware::from_fn_with_state(state.clone(), middleware::require_auth))
        .with_state(state);

    Router::new()
        .route("/health", get(health))
        .nest("/api/v1", protected_routes)
}

async fn health() -> &'static str {
    "OK"
}
