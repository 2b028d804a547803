use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;
use tracing::{error, warn};

use parley_store::{Entity, StoreError};
use parley_types::api::{ErrorBody, ErrorResponse};

/// Everything a handler can answer with besides success. Rendered as
/// `{"error": {"code": ..., "message": ...}}`.
#[derive(Debug, Error)]
pub enum ApiError {
    // 400
    #[error("Invalid request")]
    InvalidRequest,
    #[error("Message cannot be empty")]
    MessageEmpty,
    #[error("Query parameter is required")]
    SearchQueryRequired,

    // 401
    #[error("Authorization header required")]
    AuthRequired,
    #[error("Invalid authorization header format. Expected: Basic <base64(username:password)>")]
    InvalidAuthFormat,
    #[error("Invalid base64 encoding in authorization header")]
    InvalidBase64,
    #[error("Invalid credentials format. Expected: username:password")]
    InvalidCredentialsFormat,
    #[error("Invalid username or password")]
    InvalidCredentials,

    // 403
    #[error("Access denied")]
    AccessDenied,
    #[error("User is not a member of this group")]
    NotGroupMember,
    #[error("User is not the recipient of this message")]
    NotMessageRecipient,
    #[error("{0} is disabled")]
    FeatureDisabled(&'static str),

    // 404
    #[error("Sender not found")]
    SenderNotFound,
    #[error("Destination not found")]
    DestinationNotFound,
    #[error("Message not found")]
    MessageNotFound,
    #[error("Resource not found")]
    NotFound,

    // 409
    #[error("Resource already exists")]
    AlreadyExists,

    // 500
    #[error("An internal error occurred")]
    Internal,
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::InvalidRequest | Self::MessageEmpty | Self::SearchQueryRequired => {
                StatusCode::BAD_REQUEST
            }
            Self::AuthRequired
            | Self::InvalidAuthFormat
            | Self::InvalidBase64
            | Self::InvalidCredentialsFormat
            | Self::InvalidCredentials => StatusCode::UNAUTHORIZED,
            Self::AccessDenied
            | Self::NotGroupMember
            | Self::NotMessageRecipient
            | Self::FeatureDisabled(_) => StatusCode::FORBIDDEN,
            Self::SenderNotFound
            | Self::DestinationNotFound
            | Self::MessageNotFound
            | Self::NotFound => StatusCode::NOT_FOUND,
            Self::AlreadyExists => StatusCode::CONFLICT,
            Self::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidRequest => "BAD_REQUEST_INVALID_REQUEST",
            Self::MessageEmpty => "BAD_REQUEST_MESSAGE_EMPTY",
            Self::SearchQueryRequired => "BAD_REQUEST_SEARCH_QUERY_REQUIRED",
            Self::AuthRequired => "UNAUTHORIZED_AUTH_REQUIRED",
            Self::InvalidAuthFormat => "UNAUTHORIZED_INVALID_AUTH_FORMAT",
            Self::InvalidBase64 => "UNAUTHORIZED_INVALID_BASE64",
            Self::InvalidCredentialsFormat => "UNAUTHORIZED_INVALID_CREDENTIALS_FORMAT",
            Self::InvalidCredentials => "UNAUTHORIZED_INVALID_CREDENTIALS",
            Self::AccessDenied => "FORBIDDEN_ACCESS_DENIED",
            Self::NotGroupMember => "FORBIDDEN_NOT_GROUP_MEMBER",
            Self::NotMessageRecipient => "FORBIDDEN_NOT_MESSAGE_RECIPIENT",
            Self::FeatureDisabled(_) => "FORBIDDEN_FEATURE_DISABLED",
            Self::SenderNotFound => "NOT_FOUND_SENDER_NOT_FOUND",
            Self::DestinationNotFound => "NOT_FOUND_DESTINATION_NOT_FOUND",
            Self::MessageNotFound => "NOT_FOUND_MESSAGE_NOT_FOUND",
            Self::NotFound => "NOT_FOUND_RESOURCE_NOT_FOUND",
            Self::AlreadyExists => "CONFLICT_ALREADY_EXISTS",
            Self::Internal => "SERVER_ERROR_INTERNAL_ERROR",
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorResponse {
            error: ErrorBody {
                code: self.code().to_string(),
                message: self.to_string(),
            },
        };
        (self.status(), Json(body)).into_response()
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound { entity: Entity::Message, .. } => Self::MessageNotFound,
            StoreError::NotFound { .. } => Self::NotFound,
            StoreError::AlreadyExists { .. } => Self::AlreadyExists,
            StoreError::InvalidArgument(reason) => {
                error!("Store rejected handler input: {}", reason);
                Self::Internal
            }
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        warn!("Rejected request body: {}", rejection.body_text());
        Self::InvalidRequest
    }
}
