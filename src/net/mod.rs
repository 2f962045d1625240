//! REST gateways for the studio backend.
//!
//! Each gateway wraps a shared [`ApiClient`] and sits behind an async trait
//! so view models can be exercised against mocks. Every method maps to
//! exactly one backend call.

pub mod auth;
pub mod error;
pub mod http;
pub mod sessions;
pub mod teachers;
pub mod types;
pub mod users;

pub use auth::{AuthApi, AuthError, AuthGateway, RegistrationError};
pub use error::{ApiError, ErrorKind, GENERIC_ERROR};
pub use http::ApiClient;
pub use sessions::{SessionApi, SessionGateway};
pub use teachers::{TeacherApi, TeacherGateway};
pub use users::{UserApi, UserGateway};

/// All gateways built over one client.
#[derive(Clone, Debug)]
pub struct Gateways {
    pub auth: AuthGateway,
    pub sessions: SessionGateway,
    pub teachers: TeacherGateway,
    pub users: UserGateway,
}

impl Gateways {
    #[must_use]
    pub fn new(client: &ApiClient) -> Self {
        Self {
            auth: AuthGateway::new(client.clone()),
            sessions: SessionGateway::new(client.clone()),
            teachers: TeacherGateway::new(client.clone()),
            users: UserGateway::new(client.clone()),
        }
    }
}
