use std::time::Duration;

use anyhow::{Context, bail};

use parley_api::{ApiConfig, ClientCredentials};

pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Everything the binary reads from the environment.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Requests still running after this long are answered with 408.
    pub request_timeout: Duration,
    pub seed_demo: bool,
    pub api: ApiConfig,
}

impl ServerConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup; unset keys take their defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let defaults = ApiConfig::default();

        let host = lookup("PARLEY_HOST").unwrap_or_else(|| "0.0.0.0".into());
        let port = match lookup("PARLEY_PORT") {
            Some(raw) => raw
                .trim()
                .parse::<u16>()
                .with_context(|| format!("PARLEY_PORT must be a port number, got {raw:?}"))?,
            None => 8080,
        };

        let request_timeout = match lookup("PARLEY_REQUEST_TIMEOUT") {
            Some(raw) => {
                let secs = raw.trim().parse::<u64>().with_context(|| {
                    format!("PARLEY_REQUEST_TIMEOUT must be a number of seconds, got {raw:?}")
                })?;
                if secs == 0 {
                    bail!("PARLEY_REQUEST_TIMEOUT must be at least 1 second");
                }
                Duration::from_secs(secs)
            }
            None => DEFAULT_REQUEST_TIMEOUT,
        };

        let clients = match lookup("PARLEY_AUTH_CLIENTS") {
            Some(raw) => parse_clients(&raw)?,
            None => defaults.clients,
        };

        let max_message_length = match lookup("PARLEY_MAX_MESSAGE_LENGTH") {
            Some(raw) => raw.trim().parse::<usize>().with_context(|| {
                format!("PARLEY_MAX_MESSAGE_LENGTH must be a non-negative integer, got {raw:?}")
            })?,
            None => defaults.max_message_length,
        };

        Ok(Self {
            host,
            port,
            request_timeout,
            seed_demo: flag(&lookup, "PARLEY_SEED_DEMO", true)?,
            api: ApiConfig {
                clients,
                max_message_length,
                enable_search: flag(&lookup, "PARLEY_ENABLE_SEARCH", defaults.enable_search)?,
                enable_group_chat: flag(
                    &lookup,
                    "PARLEY_ENABLE_GROUP_CHAT",
                    defaults.enable_group_chat,
                )?,
            },
        })
    }
}

/// `user1:password1,user2:password2`
fn parse_clients(raw: &str) -> anyhow::Result<Vec<ClientCredentials>> {
    let mut clients = Vec::new();
    for entry in raw.split(',').map(str::trim).filter(|entry| !entry.is_empty()) {
        let Some((username, password)) = entry.split_once(':') else {
            bail!("PARLEY_AUTH_CLIENTS entry {entry:?} is not username:password");
        };
        if username.is_empty() || password.is_empty() {
            bail!("PARLEY_AUTH_CLIENTS entry {entry:?} has an empty username or password");
        }
        clients.push(ClientCredentials::new(username, password));
    }
    if clients.is_empty() {
        bail!("PARLEY_AUTH_CLIENTS must name at least one client");
    }
    Ok(clients)
}

fn flag(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
    default: bool,
) -> anyhow::Result<bool> {
    let Some(raw) = lookup(key) else {
        return Ok(default);
    };
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => bail!("{key} must be a boolean, got {raw:?}"),
    }
}
