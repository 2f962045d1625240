//! Teacher gateway. Teachers are read-only from the client.

use super::error::ApiError;
use super::http::ApiClient;
use super::types::{Teacher, TeacherId};

#[async_trait::async_trait]
pub trait TeacherApi: Send + Sync {
    /// `GET teacher`
    async fn all(&self) -> Result<Vec<Teacher>, ApiError>;
    /// `GET teacher/{id}`
    async fn detail(&self, id: TeacherId) -> Result<Teacher, ApiError>;
}

#[derive(Clone, Debug)]
pub struct TeacherGateway {
    client: ApiClient,
}

impl TeacherGateway {
    #[must_use]
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }
}

#[async_trait::async_trait]
impl TeacherApi for TeacherGateway {
    async fn all(&self) -> Result<Vec<Teacher>, ApiError> {
        self.client.get_json("teacher").await
    }

    async fn detail(&self, id: TeacherId) -> Result<Teacher, ApiError> {
        self.client.get_json(&format!("teacher/{id}")).await
    }
}
