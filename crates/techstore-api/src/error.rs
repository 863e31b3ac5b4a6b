//! Normalized error taxonomy for the API layer.
//!
//! Every failure that crosses the network collapses into one of these
//! shapes, mirroring the upstream contract: a `{message, status, data}`
//! triple for remote failures, a terminal `SessionExpired` for auth
//! failures, and transport/decoding variants for everything below that.

use thiserror::Error;

use techstore_core::CoreError;

/// API layer errors.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The remote API answered with a non-success status.
    #[error("{message}")]
    Http {
        message: String,
        status: Option<u16>,
        data: Option<serde_json::Value>,
    },

    /// The request never completed (connection refused, timeout, DNS).
    /// No retry policy at this level; the failure surfaces directly.
    #[error("request failed: {0}")]
    Transport(String),

    /// A response arrived but its body did not match the expected shape.
    #[error("unexpected response body: {0}")]
    Decode(String),

    /// HTTP 401 outside the login flow. Stored credentials have already
    /// been cleared; the session is over and the user must log in again.
    #[error("session expired, please log in again")]
    SessionExpired,

    /// An operation that requires credentials ran without any.
    #[error("not authenticated")]
    NotAuthenticated,

    /// The bearer token payload could not be decoded.
    #[error("malformed token: {0}")]
    MalformedToken(String),

    /// The persisted session state file could not be read or written.
    #[error("session state error: {0}")]
    State(String),

    /// Local business rule rejected the operation before submission.
    #[error(transparent)]
    Core(#[from] CoreError),
}

impl ApiError {
    /// Builds the normalized error for a non-success response.
    ///
    /// The upstream API answers errors either as a plain string or as a
    /// JSON object with a `message` field; anything else keeps the raw
    /// body as attached data with a generic message.
    pub fn from_response(status: u16, body: &str) -> Self {
        let data: Option<serde_json::Value> = serde_json::from_str(body).ok();

        let message = match &data {
            Some(serde_json::Value::String(s)) => s.clone(),
            Some(serde_json::Value::Object(map)) => map
                .get("message")
                .and_then(|m| m.as_str())
                .map(str::to_string)
                .unwrap_or_else(|| format!("request failed with status {}", status)),
            _ if !body.trim().is_empty() => body.trim().to_string(),
            _ => format!("request failed with status {}", status),
        };

        ApiError::Http {
            message,
            status: Some(status),
            data,
        }
    }

    /// Status code for remote failures, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Http { status, .. } => *status,
            ApiError::SessionExpired => Some(401),
            _ => None,
        }
    }

    /// True for failures worth a second read attempt (transport faults
    /// and server-side 5xx). Client errors and auth failures are final.
    pub fn is_transient(&self) -> bool {
        match self {
            ApiError::Transport(_) => true,
            ApiError::Http { status, .. } => matches!(status, Some(s) if *s >= 500),
            _ => false,
        }
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            ApiError::Decode(err.to_string())
        } else {
            ApiError::Transport(err.to_string())
        }
    }
}

/// Convenience type alias for Results with ApiError.
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_response_plain_string_body() {
        let err = ApiError::from_response(400, "\"Stock insuficiente\"");
        match err {
            ApiError::Http { message, status, data } => {
                assert_eq!(message, "Stock insuficiente");
                assert_eq!(status, Some(400));
                assert!(data.is_some());
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_from_response_object_with_message() {
        let err = ApiError::from_response(409, r#"{"message": "Código duplicado", "field": "codigo"}"#);
        assert_eq!(err.to_string(), "Código duplicado");
        assert_eq!(err.status(), Some(409));
    }

    #[test]
    fn test_from_response_opaque_body() {
        let err = ApiError::from_response(500, "<html>oops</html>");
        assert_eq!(err.to_string(), "<html>oops</html>");
        assert!(err.is_transient());
    }

    #[test]
    fn test_from_response_empty_body() {
        let err = ApiError::from_response(404, "");
        assert_eq!(err.to_string(), "request failed with status 404");
        assert!(!err.is_transient());
    }

    #[test]
    fn test_transient_classification() {
        assert!(ApiError::Transport("timeout".into()).is_transient());
        assert!(!ApiError::SessionExpired.is_transient());
        assert!(!ApiError::from_response(422, "").is_transient());
        assert!(ApiError::from_response(503, "").is_transient());
    }
}
