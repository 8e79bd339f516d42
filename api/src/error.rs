//! API error taxonomy and user-facing normalization.
//!
//! ERROR HANDLING
//! ==============
//! - `SessionExpired`: a 401 outside the reset/OTP flows. The request
//!   pipeline has already logged out and redirected; callers only report it.
//! - `Business`: the server answered with a non-2xx status (including 401 on
//!   session-exempt endpoints). Carries the server's own message.
//! - `Timeout` / `Transport`: no usable response.
//! - `Decode`: a 2xx body that does not match the expected schema.
//! - `LoginRejected`: the login call succeeded but issued no credential.
//! - `Validation`: rejected locally before any request was sent.

use serde_json::Value;

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("session expired while calling {endpoint}")]
    SessionExpired { endpoint: &'static str },

    #[error("{endpoint} failed with status {status}: {message}")]
    Business { endpoint: &'static str, status: u16, message: String },

    #[error("request to {endpoint} timed out")]
    Timeout { endpoint: &'static str },

    #[error("request to {endpoint} failed: {source}")]
    Transport {
        endpoint: &'static str,
        #[source]
        source: reqwest::Error,
    },

    #[error("invalid response from {endpoint}: {message}")]
    Decode { endpoint: &'static str, message: String },

    #[error("could not encode request for {endpoint}: {message}")]
    Encode { endpoint: &'static str, message: String },

    #[error("login was not accepted")]
    LoginRejected,

    #[error("{0}")]
    Validation(String),

    #[error("invalid request URL for {endpoint}")]
    InvalidUrl { endpoint: &'static str },

    #[error("http client build failed: {0}")]
    HttpClientBuild(String),

    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// What a form or status line shows for an error.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NormalizedError {
    pub code: &'static str,
    pub message: String,
    pub status: Option<u16>,
}

impl ApiError {
    pub(crate) fn transport(endpoint: &'static str, source: reqwest::Error) -> Self {
        if source.is_timeout() {
            Self::Timeout { endpoint }
        } else {
            Self::Transport { endpoint, source }
        }
    }

    pub(crate) fn decode(endpoint: &'static str, e: &serde_json::Error) -> Self {
        Self::Decode { endpoint, message: e.to_string() }
    }

    /// HTTP status behind the error, when the server answered.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::SessionExpired { .. } => Some(401),
            Self::Business { status, .. } => Some(*status),
            _ => None,
        }
    }

    #[must_use]
    pub fn is_session_expired(&self) -> bool {
        matches!(self, Self::SessionExpired { .. })
    }

    /// Map to a stable code and a message fit for the user.
    #[must_use]
    pub fn normalize(&self) -> NormalizedError {
        let (code, message) = match self {
            Self::SessionExpired { .. } => ("UNAUTHORIZED", "Your session has expired. Please login again.".to_owned()),
            Self::Business { status: 403, .. } => {
                ("FORBIDDEN", "You do not have permission to perform this action.".to_owned())
            }
            Self::Business { status: 404, message, .. } => {
                ("NOT_FOUND", non_empty_or(message, "The requested resource was not found."))
            }
            Self::Business { status: 422, message, .. } => {
                ("VALIDATION_ERROR", non_empty_or(message, "Please check your input and try again."))
            }
            Self::Business { status, .. } if *status >= 500 => ("SERVER_ERROR", "Server error. Please try again later.".to_owned()),
            Self::Business { message, .. } => ("API_ERROR", non_empty_or(message, "An unexpected error occurred.")),
            Self::Timeout { .. } => ("TIMEOUT", "Request timeout. Please try again.".to_owned()),
            Self::Transport { .. } => {
                ("NETWORK_ERROR", "Network error. Please check your internet connection.".to_owned())
            }
            Self::Decode { .. } => ("DECODE_ERROR", "The server sent an unexpected response.".to_owned()),
            Self::Validation(message) => ("VALIDATION_ERROR", message.clone()),
            Self::LoginRejected => ("API_ERROR", "Invalid username or password.".to_owned()),
            Self::Encode { .. } | Self::InvalidUrl { .. } | Self::HttpClientBuild(_) | Self::Io { .. } => {
                ("ERROR", self.to_string())
            }
        };
        NormalizedError { code, message, status: self.status() }
    }
}

fn non_empty_or(message: &str, fallback: &str) -> String {
    if message.trim().is_empty() { fallback.to_owned() } else { message.to_owned() }
}

/// Pull the server's explanation out of an error body.
///
/// The API reports failures as `{"error": "..."}` or `{"message": "..."}`;
/// anything else falls back to the canonical status text.
pub(crate) fn server_message(body: &str, status: reqwest::StatusCode) -> String {
    let fallback = || status.canonical_reason().unwrap_or("request failed").to_owned();
    let Ok(value) = serde_json::from_str::<Value>(body) else {
        return fallback();
    };
    ["error", "message"]
        .iter()
        .find_map(|key| value.get(*key).and_then(Value::as_str))
        .filter(|m| !m.trim().is_empty())
        .map_or_else(fallback, str::to_owned)
}

/// Friendlier wording for the server's password-reset failures.
#[must_use]
pub fn reset_password_message(server_error: &str) -> String {
    let lower = server_error.to_ascii_lowercase();
    if server_error.contains("Can't use previous password") {
        "You cannot reuse your previous password. Please choose a different one.".to_owned()
    } else if lower.contains("otp") {
        "The OTP code is invalid or has expired.".to_owned()
    } else if server_error.contains("User not found") {
        "User not found.".to_owned()
    } else if lower.contains("expired") {
        "The OTP code has expired.".to_owned()
    } else {
        server_error.to_owned()
    }
}

#[cfg(test)]
#[path = "error_test.rs"]
mod tests;
