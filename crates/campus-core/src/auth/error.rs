use thiserror::Error;

/// Fallback message when the identity endpoint gives no usable reason.
pub const LOGIN_FAILED_MESSAGE: &str = "Login failed";

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    /// Credentials were rejected or the identity endpoint could not be reached.
    #[error("{0}")]
    AuthenticationFailed(String),
}

impl AuthError {
    pub fn message(&self) -> &str {
        match self {
            AuthError::AuthenticationFailed(msg) => msg,
        }
    }

    /// Build from a non-2xx login response body, preferring the server's
    /// `{"message": ...}` when present and non-empty.
    pub fn from_response_body(body: &str) -> Self {
        let message = serde_json::from_str::<serde_json::Value>(body)
            .ok()
            .and_then(|v| v.get("message").and_then(|m| m.as_str()).map(str::to_owned))
            .filter(|m| !m.trim().is_empty())
            .unwrap_or_else(|| LOGIN_FAILED_MESSAGE.to_string());
        AuthError::AuthenticationFailed(message)
    }

    /// Map a transport failure to a user-facing reason.
    pub fn from_transport(err: &reqwest::Error) -> Self {
        let message = if err.is_connect() {
            "Unable to connect to server"
        } else if err.is_timeout() {
            "Connection timed out"
        } else {
            LOGIN_FAILED_MESSAGE
        };
        AuthError::AuthenticationFailed(message.to_string())
    }
}
