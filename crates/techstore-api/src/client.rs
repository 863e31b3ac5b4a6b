//! # HTTP Client Wrapper
//!
//! Thin wrapper over `reqwest` that gives every request the same
//! treatment the rest of the stack expects:
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Request Lifecycle                                 │
//! │                                                                         │
//! │  service call                                                           │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  attach bearer token (from SessionStore, when present)                  │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  send (30s upper bound) ──── transport fault ──► ApiError::Transport   │
//! │       │                                                                 │
//! │       ├── 401 outside /auth ──► clear credentials, SessionExpired       │
//! │       ├── other non-2xx ─────► normalized {message, status, data}       │
//! │       └── 2xx ───────────────► typed JSON body                          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! No retry policy lives here; a single network failure surfaces
//! directly to the caller. The query layer owns the one bounded retry
//! for reads.

use std::sync::Arc;
use std::time::Duration;

use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, warn};

use crate::config::ApiConfig;
use crate::error::{ApiError, ApiResult};
use crate::session::SessionStore;

/// HTTP client for the upstream REST API.
///
/// Cheap to clone: the underlying connection pool and the session store
/// are shared.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    session: Arc<SessionStore>,
}

impl ApiClient {
    /// Builds a client from configuration and a shared session store.
    pub fn new(config: &ApiConfig, session: Arc<SessionStore>) -> ApiResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| ApiError::Transport(format!("building HTTP client: {}", e)))?;

        Ok(ApiClient {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            session,
        })
    }

    /// The shared session store backing this client.
    pub fn session(&self) -> &Arc<SessionStore> {
        &self.session
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    // -------------------------------------------------------------------------
    // Verbs
    // -------------------------------------------------------------------------

    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> ApiResult<T> {
        self.execute(self.http.get(self.url(path)), path).await
    }

    /// GET with a serializable query-string payload (filter endpoints).
    pub async fn get_query<T, Q>(&self, path: &str, query: &Q) -> ApiResult<T>
    where
        T: DeserializeOwned,
        Q: Serialize + ?Sized,
    {
        self.execute(self.http.get(self.url(path)).query(query), path)
            .await
    }

    pub async fn post<T, B>(&self, path: &str, body: &B) -> ApiResult<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.execute(self.http.post(self.url(path)).json(body), path)
            .await
    }

    pub async fn put<T, B>(&self, path: &str, body: &B) -> ApiResult<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.execute(self.http.put(self.url(path)).json(body), path)
            .await
    }

    pub async fn patch<T, B>(&self, path: &str, body: &B) -> ApiResult<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.execute(self.http.patch(self.url(path)).json(body), path)
            .await
    }

    /// DELETE; the upstream answers these with an empty body.
    pub async fn delete(&self, path: &str) -> ApiResult<()> {
        self.dispatch(self.http.delete(self.url(path)), path).await?;
        Ok(())
    }

    // -------------------------------------------------------------------------
    // Dispatch
    // -------------------------------------------------------------------------

    async fn execute<T: DeserializeOwned>(
        &self,
        request: reqwest::RequestBuilder,
        path: &str,
    ) -> ApiResult<T> {
        let response = self.dispatch(request, path).await?;
        response.json::<T>().await.map_err(ApiError::from)
    }

    async fn dispatch(
        &self,
        mut request: reqwest::RequestBuilder,
        path: &str,
    ) -> ApiResult<reqwest::Response> {
        if let Some(token) = self.session.token() {
            request = request.bearer_auth(token);
        }

        debug!(path, "dispatching request");
        let response = request.send().await?;
        let status = response.status();

        // A 401 anywhere but the auth endpoints means the session is
        // over: drop stored credentials so every holder of the session
        // store sees the logout, then surface the terminal error.
        if status == StatusCode::UNAUTHORIZED && !path.starts_with("/auth") {
            warn!(path, "401 from API, clearing stored credentials");
            if let Err(err) = self.session.clear_credentials() {
                warn!(%err, "could not clear persisted credentials");
            }
            return Err(ApiError::SessionExpired);
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ApiError::from_response(status.as_u16(), &body));
        }

        Ok(response)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn test_client() -> (tempfile::TempDir, ApiClient) {
        let dir = tempfile::tempdir().unwrap();
        let session = Arc::new(SessionStore::open(dir.path().join("session.json")).unwrap());
        let config = ApiConfig::with_base_url("http://localhost:5000/api/");
        let client = ApiClient::new(&config, session).unwrap();
        (dir, client)
    }

    #[test]
    fn test_url_joining() {
        let (_dir, client) = test_client();
        assert_eq!(client.url("/products"), "http://localhost:5000/api/products");
        assert_eq!(
            client.url("/products/7/stock"),
            "http://localhost:5000/api/products/7/stock"
        );
    }

    #[tokio::test]
    async fn test_unreachable_host_is_a_transport_error() {
        let dir = tempfile::tempdir().unwrap();
        let session = Arc::new(SessionStore::open(dir.path().join("session.json")).unwrap());
        // Nothing listens on port 1.
        let config = ApiConfig::with_base_url("http://127.0.0.1:1/api");
        let client = ApiClient::new(&config, session).unwrap();

        let result: ApiResult<Vec<techstore_core::types::Product>> = client.get("/products").await;
        assert!(matches!(result, Err(ApiError::Transport(_))));
    }
}
