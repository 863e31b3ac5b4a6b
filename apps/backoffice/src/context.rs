//! Shared application context.

use std::sync::Arc;

use techstore_api::{ApiClient, ApiConfig, AuthApi, Queries, ResourceStore, SessionStore};

use crate::error::CliError;

/// Everything a command needs, built once per invocation.
///
/// The session store is shared between the HTTP client (bearer token,
/// 401 handling) and the commands (theme, document tags), so a forced
/// logout in one place is visible everywhere.
pub struct App {
    pub queries: Queries,
    pub auth: AuthApi,
    pub session: Arc<SessionStore>,
}

impl App {
    pub fn bootstrap() -> Result<Self, CliError> {
        let config = ApiConfig::load()?;
        let session = Arc::new(SessionStore::open_default()?);
        let client = ApiClient::new(&config, session.clone())?;
        let store = Arc::new(ResourceStore::new());

        Ok(App {
            queries: Queries::new(client.clone(), store),
            auth: AuthApi::new(client),
            session,
        })
    }
}
