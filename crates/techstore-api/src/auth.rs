//! # Authentication
//!
//! Login/registration against `/auth`, plus client-side decoding of the
//! bearer token payload.
//!
//! ## Token trust model
//! The payload is decoded **without signature verification** - on
//! purpose. Verification is the server's responsibility; the client
//! only needs the id/username/role claims for display. Nothing derived
//! here grants access: every authorization decision comes back from the
//! server on each request.

use jsonwebtoken::{Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::client::ApiClient;
use crate::error::{ApiError, ApiResult};
use crate::session::UserProfile;

// =============================================================================
// Claim names
// =============================================================================

// The upstream API is ASP.NET; its tokens carry the WS-identity claim
// URIs. Short names are accepted as fallbacks for other issuers.
pub const CLAIM_NAME_IDENTIFIER: &str =
    "http://schemas.xmlsoap.org/ws/2005/05/identity/claims/nameidentifier";
pub const CLAIM_NAME: &str = "http://schemas.xmlsoap.org/ws/2005/05/identity/claims/name";
pub const CLAIM_ROLE: &str = "http://schemas.microsoft.com/ws/2008/06/identity/claims/role";

// =============================================================================
// Wire types
// =============================================================================

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub username: String,
    pub password: String,
    pub role: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    pub token: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterResponse {
    pub message: String,
    #[serde(default)]
    pub user_id: Option<i64>,
}

// =============================================================================
// Auth API
// =============================================================================

/// Authentication operations.
#[derive(Debug, Clone)]
pub struct AuthApi {
    client: ApiClient,
}

impl AuthApi {
    pub fn new(client: ApiClient) -> Self {
        AuthApi { client }
    }

    /// Logs in, persists the token and the decoded profile, and returns
    /// the profile.
    pub async fn login(&self, username: &str, password: &str) -> ApiResult<UserProfile> {
        let request = LoginRequest {
            username: username.to_string(),
            password: password.to_string(),
        };

        let response: AuthResponse = self.client.post("/auth/login", &request).await?;
        let profile = decode_profile(&response.token)?;

        self.client
            .session()
            .set_credentials(response.token, profile.clone())?;

        info!(username = %profile.username, role = %profile.role, "logged in");
        Ok(profile)
    }

    /// Registers a new user. Does not log in.
    pub async fn register(
        &self,
        username: &str,
        password: &str,
        role: Option<&str>,
    ) -> ApiResult<RegisterResponse> {
        let request = RegisterRequest {
            username: username.to_string(),
            password: password.to_string(),
            role: role.unwrap_or("User").to_string(),
        };

        self.client.post("/auth/register", &request).await
    }

    /// Drops persisted credentials.
    pub fn logout(&self) -> ApiResult<()> {
        self.client.session().clear_credentials()?;
        info!("logged out");
        Ok(())
    }

    /// The stored profile, if logged in.
    pub fn current_user(&self) -> Option<UserProfile> {
        self.client.session().user()
    }
}

// =============================================================================
// Token decoding
// =============================================================================

/// Decodes the display profile from a bearer token payload.
///
/// Signature, expiry and audience are deliberately not checked - the
/// token goes back to the server on every request, and the server is
/// the only party that can reject it meaningfully.
pub fn decode_profile(token: &str) -> ApiResult<UserProfile> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.insecure_disable_signature_validation();
    validation.validate_exp = false;
    validation.validate_aud = false;
    validation.required_spec_claims = Default::default();

    let data = jsonwebtoken::decode::<serde_json::Value>(
        token,
        &DecodingKey::from_secret(&[]),
        &validation,
    )
    .map_err(|e| ApiError::MalformedToken(e.to_string()))?;

    let claims = data.claims;

    let id = claim_value(&claims, &[CLAIM_NAME_IDENTIFIER, "nameid", "sub"])
        .and_then(claim_as_i64)
        .unwrap_or(0);

    let username = claim_value(&claims, &[CLAIM_NAME, "unique_name", "name"])
        .and_then(|v| v.as_str())
        .map(str::to_string)
        .ok_or_else(|| ApiError::MalformedToken("missing username claim".to_string()))?;

    let role = claim_value(&claims, &[CLAIM_ROLE, "role"])
        .and_then(|v| v.as_str())
        .unwrap_or("User")
        .to_string();

    Ok(UserProfile { id, username, role })
}

fn claim_value<'a>(claims: &'a serde_json::Value, keys: &[&str]) -> Option<&'a serde_json::Value> {
    keys.iter().find_map(|key| claims.get(*key))
}

fn claim_as_i64(value: &serde_json::Value) -> Option<i64> {
    value
        .as_i64()
        .or_else(|| value.as_str().and_then(|s| s.parse().ok()))
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use jsonwebtoken::{encode, EncodingKey, Header};

    fn make_token(claims: serde_json::Value) -> String {
        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(b"any-secret-the-client-never-knows"),
        )
        .unwrap()
    }

    #[test]
    fn test_decode_aspnet_claim_uris() {
        let token = make_token(serde_json::json!({
            CLAIM_NAME_IDENTIFIER: "7",
            CLAIM_NAME: "admin",
            CLAIM_ROLE: "Admin",
            "exp": 4102444800i64,
        }));

        let profile = decode_profile(&token).unwrap();
        assert_eq!(profile.id, 7);
        assert_eq!(profile.username, "admin");
        assert_eq!(profile.role, "Admin");
    }

    #[test]
    fn test_decode_short_claim_names() {
        let token = make_token(serde_json::json!({
            "sub": 12,
            "unique_name": "ana",
        }));

        let profile = decode_profile(&token).unwrap();
        assert_eq!(profile.id, 12);
        assert_eq!(profile.username, "ana");
        assert_eq!(profile.role, "User");
    }

    #[test]
    fn test_decode_ignores_expiry() {
        // An expired token still decodes; only the server rejects it.
        let token = make_token(serde_json::json!({
            "unique_name": "ana",
            "exp": 1i64,
        }));
        assert!(decode_profile(&token).is_ok());
    }

    #[test]
    fn test_decode_rejects_garbage() {
        assert!(matches!(
            decode_profile("not.a.token"),
            Err(ApiError::MalformedToken(_))
        ));
        assert!(decode_profile("").is_err());
    }

    #[test]
    fn test_decode_requires_username() {
        let token = make_token(serde_json::json!({ "sub": 1 }));
        assert!(matches!(
            decode_profile(&token),
            Err(ApiError::MalformedToken(_))
        ));
    }
}
