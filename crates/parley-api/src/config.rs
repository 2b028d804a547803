/// A username/password pair accepted by the basic-auth middleware. The
/// username doubles as the acting user id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientCredentials {
    pub username: String,
    pub password: String,
}

impl ClientCredentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

/// Settings the REST layer needs at request time.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub clients: Vec<ClientCredentials>,
    /// Longer messages are truncated; 0 disables the limit.
    pub max_message_length: usize,
    pub enable_search: bool,
    pub enable_group_chat: bool,
}

pub const DEFAULT_MAX_MESSAGE_LENGTH: usize = 10_000;

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            clients: vec![
                ClientCredentials::new("user1", "password1"),
                ClientCredentials::new("user2", "password2"),
                ClientCredentials::new("user3", "password3"),
            ],
            max_message_length: DEFAULT_MAX_MESSAGE_LENGTH,
            enable_search: true,
            enable_group_chat: true,
        }
    }
}
