//! Auth gateway: `POST auth/login` and `POST auth/register`.
//!
//! Neither call touches the [`SessionStore`](crate::SessionStore). Feeding a
//! successful login into the store is the caller's job, so a rejected login
//! can never leave half-written session state behind.

#[cfg(test)]
#[path = "auth_test.rs"]
mod auth_test;

use reqwest::Method;

use super::error::{ApiError, ErrorKind};
use super::http::ApiClient;
use super::types::{LoginRequest, RegisterRequest, SessionInformation};

// =============================================================================
// ERRORS
// =============================================================================

/// A failed login: bad credentials (401), malformed payload (400), backend
/// down (5xx) or the request never completing.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("login rejected (status {status}): {message}")]
    Rejected { status: u16, message: String },
    #[error("login request failed: {0}")]
    Transport(ApiError),
}

/// A failed registration: duplicate email (409, or 400 from older
/// backends), malformed payload (400), backend down (5xx), network.
#[derive(Debug, thiserror::Error)]
pub enum RegistrationError {
    #[error("registration rejected (status {status}): {message}")]
    Rejected { status: u16, message: String },
    #[error("registration request failed: {0}")]
    Transport(ApiError),
}

impl From<ApiError> for AuthError {
    fn from(err: ApiError) -> Self {
        match err.status() {
            Some(status) => Self::Rejected { status, message: err.message() },
            None => Self::Transport(err),
        }
    }
}

impl From<ApiError> for RegistrationError {
    fn from(err: ApiError) -> Self {
        match err.status() {
            Some(status) => Self::Rejected { status, message: err.message() },
            None => Self::Transport(err),
        }
    }
}

impl AuthError {
    /// Backend message for a rejection, else the transport failure text.
    #[must_use]
    pub fn message(&self) -> String {
        match self {
            Self::Rejected { message, .. } => message.clone(),
            Self::Transport(err) => err.message(),
        }
    }

    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Rejected { status, .. } => Some(*status),
            Self::Transport(err) => err.status(),
        }
    }

    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Rejected { status, .. } => ErrorKind::from_status(*status),
            Self::Transport(err) => err.kind(),
        }
    }
}

impl RegistrationError {
    /// Backend message for a rejection, else the transport failure text.
    #[must_use]
    pub fn message(&self) -> String {
        match self {
            Self::Rejected { message, .. } => message.clone(),
            Self::Transport(err) => err.message(),
        }
    }

    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Rejected { status, .. } => Some(*status),
            Self::Transport(err) => err.status(),
        }
    }

    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Rejected { status, .. } => ErrorKind::from_status(*status),
            Self::Transport(err) => err.kind(),
        }
    }

    /// Whether the backend reported the email as already registered.
    #[must_use]
    pub fn is_duplicate_email(&self) -> bool {
        match self {
            Self::Rejected { status: 409, .. } => true,
            Self::Rejected { status: 400, message } => message.to_ascii_lowercase().contains("already"),
            _ => false,
        }
    }
}

// =============================================================================
// GATEWAY
// =============================================================================

/// Credential exchange. Enables mocking in view-model tests.
#[async_trait::async_trait]
pub trait AuthApi: Send + Sync {
    /// Exchange credentials for a login-session record.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError`] on any rejection or transport failure.
    async fn login(&self, request: &LoginRequest) -> Result<SessionInformation, AuthError>;

    /// Create an account. Resolves with nothing on success.
    ///
    /// # Errors
    ///
    /// Returns [`RegistrationError`] on any rejection or transport failure.
    async fn register(&self, request: &RegisterRequest) -> Result<(), RegistrationError>;
}

#[derive(Clone, Debug)]
pub struct AuthGateway {
    client: ApiClient,
}

impl AuthGateway {
    #[must_use]
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }
}

#[async_trait::async_trait]
impl AuthApi for AuthGateway {
    async fn login(&self, request: &LoginRequest) -> Result<SessionInformation, AuthError> {
        Ok(self.client.send_json(Method::POST, "auth/login", request).await?)
    }

    async fn register(&self, request: &RegisterRequest) -> Result<(), RegistrationError> {
        Ok(self
            .client
            .send_unit(Method::POST, "auth/register", Some(request))
            .await?)
    }
}
