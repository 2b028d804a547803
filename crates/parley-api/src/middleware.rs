use axum::{
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::Response,
};
use base64::Engine;
use base64::engine::general_purpose::STANDARD as B64;
use tracing::{debug, warn};

use crate::auth::{AppState, AuthenticatedUser};
use crate::error::ApiError;

/// Check HTTP Basic credentials against the configured clients and attach the
/// caller as an [`AuthenticatedUser`] extension.
pub async fn require_auth(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let auth_header = req
        .headers()
        .get(header::AUTHORIZATION)
        .ok_or_else(|| {
            warn!("Request without Authorization header");
            ApiError::AuthRequired
        })?
        .to_str()
        .map_err(|_| ApiError::InvalidAuthFormat)?;

    let (username, password) = parse_basic(auth_header)?;

    if !state.verify_credentials(&username, &password) {
        warn!("Authentication failed for {}", username);
        return Err(ApiError::InvalidCredentials);
    }

    debug!("Authenticated {}", username);
    req.extensions_mut().insert(AuthenticatedUser { user_id: username });
    Ok(next.run(req).await)
}

/// Split `Basic <base64(username:password)>` into its credentials.
pub fn parse_basic(auth_header: &str) -> Result<(String, String), ApiError> {
    let encoded = auth_header
        .strip_prefix("Basic ")
        .filter(|rest| !rest.is_empty() && !rest.contains(' '))
        .ok_or(ApiError::InvalidAuthFormat)?;

    let decoded = B64.decode(encoded).map_err(|_| ApiError::InvalidBase64)?;
    let decoded = String::from_utf8(decoded).map_err(|_| ApiError::InvalidBase64)?;

    let (username, password) = decoded
        .split_once(':')
        .ok_or(ApiError::InvalidCredentialsFormat)?;
    Ok((username.to_string(), password.to_string()))
}
