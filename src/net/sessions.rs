//! Class-session gateway: CRUD plus participation.
//!
//! Participation calls return nothing; callers refetch the session to see
//! the new participant set.

#[cfg(test)]
#[path = "sessions_test.rs"]
mod sessions_test;

use reqwest::Method;

use super::error::ApiError;
use super::http::ApiClient;
use super::types::{ClassSession, SessionId, SessionPayload, UserId};

#[async_trait::async_trait]
pub trait SessionApi: Send + Sync {
    /// `GET session`
    async fn all(&self) -> Result<Vec<ClassSession>, ApiError>;
    /// `GET session/{id}`
    async fn detail(&self, id: SessionId) -> Result<ClassSession, ApiError>;
    /// `POST session`. The backend assigns the id.
    async fn create(&self, payload: &SessionPayload) -> Result<ClassSession, ApiError>;
    /// `PUT session/{id}`, a full replace of the editable fields.
    async fn update(&self, id: SessionId, payload: &SessionPayload) -> Result<ClassSession, ApiError>;
    /// `DELETE session/{id}`
    async fn delete(&self, id: SessionId) -> Result<(), ApiError>;
    /// `POST session/{id}/participate/{user_id}`
    async fn participate(&self, id: SessionId, user_id: UserId) -> Result<(), ApiError>;
    /// `DELETE session/{id}/participate/{user_id}`
    async fn un_participate(&self, id: SessionId, user_id: UserId) -> Result<(), ApiError>;
}

#[derive(Clone, Debug)]
pub struct SessionGateway {
    client: ApiClient,
}

impl SessionGateway {
    #[must_use]
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }
}

fn session_path(id: SessionId) -> String {
    format!("session/{id}")
}

fn participation_path(id: SessionId, user_id: UserId) -> String {
    format!("session/{id}/participate/{user_id}")
}

#[async_trait::async_trait]
impl SessionApi for SessionGateway {
    async fn all(&self) -> Result<Vec<ClassSession>, ApiError> {
        self.client.get_json("session").await
    }

    async fn detail(&self, id: SessionId) -> Result<ClassSession, ApiError> {
        self.client.get_json(&session_path(id)).await
    }

    async fn create(&self, payload: &SessionPayload) -> Result<ClassSession, ApiError> {
        self.client.send_json(Method::POST, "session", payload).await
    }

    async fn update(&self, id: SessionId, payload: &SessionPayload) -> Result<ClassSession, ApiError> {
        self.client
            .send_json(Method::PUT, &session_path(id), payload)
            .await
    }

    async fn delete(&self, id: SessionId) -> Result<(), ApiError> {
        self.client
            .send_unit::<()>(Method::DELETE, &session_path(id), None)
            .await
    }

    async fn participate(&self, id: SessionId, user_id: UserId) -> Result<(), ApiError> {
        self.client
            .send_unit::<()>(Method::POST, &participation_path(id, user_id), None)
            .await
    }

    async fn un_participate(&self, id: SessionId, user_id: UserId) -> Result<(), ApiError> {
        self.client
            .send_unit::<()>(Method::DELETE, &participation_path(id, user_id), None)
            .await
    }
}
