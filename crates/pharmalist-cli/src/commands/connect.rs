//! Opening the list service a command runs against.

use crate::config::Config;
use crate::error::Result;
use pharmalist_domain::DomainKey;
use pharmalist_sdk::{ListService, LocalService, PharmaClient};
use pharmalist_store::MemoryStore;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

/// Service plus the per-invocation defaults taken from the profile
pub struct Session {
    /// Where lists live
    pub service: Arc<dyn ListService>,
    /// Acting user for versions and work logs
    pub actor: Option<String>,
    /// Domain used when a command does not name one
    pub domain: Option<DomainKey>,
    /// Interval of `watch`
    pub poll_interval: Duration,
    /// Conversation history size
    pub history_size: usize,
}

impl Session {
    /// Session over `service` with no profile defaults
    pub fn new(service: Arc<dyn ListService>) -> Self {
        Self {
            service,
            actor: None,
            domain: None,
            poll_interval: pharmalist_sdk::DEFAULT_POLL_INTERVAL,
            history_size: 1000,
        }
    }
}

/// Open the service for the active profile
///
/// With `local` set, lists are read from and written to the blob in that
/// directory instead of the profile's server.
pub fn open_session(local: Option<&Path>, by: Option<String>, config: &Config) -> Result<Session> {
    let profile = config.get_active_profile()?;

    let service: Arc<dyn ListService> = match local {
        Some(dir) => {
            info!(dir = %dir.display(), "using local list store");
            Arc::new(LocalService::new(MemoryStore::open_blob(dir)?))
        }
        None => {
            info!(url = %profile.server_url, "using list server");
            let client = PharmaClient::new(&profile.server_url)?;
            match &profile.token {
                Some(token) => Arc::new(client.with_token(token)),
                None => Arc::new(client),
            }
        }
    };

    Ok(Session {
        service,
        actor: by.or_else(|| profile.user.clone()),
        domain: profile.domain,
        poll_interval: config.settings.poll_interval(),
        history_size: config.settings.history_size,
    })
}
