//! Gateway error taxonomy.
//!
//! ERROR HANDLING
//! ==============
//! Gateways forward failures verbatim: the HTTP status and raw body are
//! kept on [`ApiError::Status`]. Views never show those details; they
//! classify with [`ApiError::kind`] for logging and show [`GENERIC_ERROR`].

#[cfg(test)]
#[path = "error_test.rs"]
mod error_test;

/// The only failure text views ever display.
pub const GENERIC_ERROR: &str = "An error occurred";

/// Errors produced by gateway calls.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The request never completed (connection refused, timeout, reset).
    #[error("request failed: {0}")]
    Request(String),

    /// The backend answered with a non-success status.
    #[error("API response error: status {status}")]
    Status { status: u16, body: String },

    /// A success body could not be decoded.
    #[error("response parse failed: {0}")]
    Decode(String),

    /// The underlying HTTP client could not be constructed.
    #[error("HTTP client build failed: {0}")]
    ClientBuild(String),
}

/// Coarse classification of a failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Client-side form rejection. Never produced by a network call.
    Validation,
    BadRequest,
    Unauthorized,
    NotFound,
    Conflict,
    Server,
    Network,
    Unexpected,
}

impl ErrorKind {
    #[must_use]
    pub fn from_status(status: u16) -> Self {
        match status {
            400 | 422 => Self::BadRequest,
            401 | 403 => Self::Unauthorized,
            404 => Self::NotFound,
            409 => Self::Conflict,
            500..=599 => Self::Server,
            _ => Self::Unexpected,
        }
    }

    /// Network failures get the same user-facing treatment as 5xx.
    #[must_use]
    pub fn is_server_side(self) -> bool {
        matches!(self, Self::Server | Self::Network)
    }
}

impl ApiError {
    /// HTTP status, when the backend answered at all.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Status { status, .. } => ErrorKind::from_status(*status),
            Self::Request(_) => ErrorKind::Network,
            Self::Decode(_) | Self::ClientBuild(_) => ErrorKind::Unexpected,
        }
    }

    /// Backend-provided message: the `message` field of a JSON body, else
    /// the raw body, else this error's own description.
    #[must_use]
    pub fn message(&self) -> String {
        match self {
            Self::Status { body, .. } => extract_message(body).unwrap_or_else(|| self.to_string()),
            _ => self.to_string(),
        }
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            Self::Decode(err.to_string())
        } else {
            Self::Request(err.to_string())
        }
    }
}

pub(crate) fn extract_message(body: &str) -> Option<String> {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return None;
    }
    match serde_json::from_str::<serde_json::Value>(trimmed) {
        Ok(serde_json::Value::Object(map)) => map
            .get("message")
            .and_then(serde_json::Value::as_str)
            .map(str::to_owned),
        Ok(serde_json::Value::String(text)) => Some(text),
        _ => Some(trimmed.to_owned()),
    }
}
