use std::sync::Arc;

use parley_gateway::Dispatcher;
use parley_store::Repository;

use crate::config::ApiConfig;
use crate::error::ApiError;

pub type AppState = Arc<AppStateInner>;

pub struct AppStateInner {
    pub store: Arc<dyn Repository>,
    pub dispatcher: Dispatcher,
    pub config: ApiConfig,
}

impl AppStateInner {
    pub fn new(store: Arc<dyn Repository>, dispatcher: Dispatcher, config: ApiConfig) -> AppState {
        Arc::new(Self {
            store,
            dispatcher,
            config,
        })
    }

    pub fn verify_credentials(&self, username: &str, password: &str) -> bool {
        self.config
            .clients
            .iter()
            .any(|client| client.username == username && client.password == password)
    }
}

/// The user a request acts as, set by [`crate::middleware::require_auth`].
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    pub user_id: String,
}

impl AuthenticatedUser {
    /// Older clients still send the acting user in the body. Accept it only if
    /// it names the authenticated user.
    pub fn acting_as(&self, claimed: Option<&str>) -> Result<String, ApiError> {
        match claimed {
            Some(claimed) if !claimed.is_empty() && claimed != self.user_id => {
                Err(ApiError::AccessDenied)
            }
            _ => Ok(self.user_id.clone()),
        }
    }

    /// Guard for routes scoped to `/users/{user_id}/...`.
    pub fn require_self(&self, user_id: &str) -> Result<(), ApiError> {
        if user_id == self.user_id {
            Ok(())
        } else {
            Err(ApiError::AccessDenied)
        }
    }
}
