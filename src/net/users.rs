//! User gateway: read and delete. There is no edit-profile flow.

use reqwest::Method;

use super::error::ApiError;
use super::http::ApiClient;
use super::types::{UserAccount, UserId};

#[async_trait::async_trait]
pub trait UserApi: Send + Sync {
    /// `GET user/{id}`
    async fn get_by_id(&self, id: UserId) -> Result<UserAccount, ApiError>;
    /// `DELETE user/{id}`
    async fn delete(&self, id: UserId) -> Result<(), ApiError>;
}

#[derive(Clone, Debug)]
pub struct UserGateway {
    client: ApiClient,
}

impl UserGateway {
    #[must_use]
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }
}

#[async_trait::async_trait]
impl UserApi for UserGateway {
    async fn get_by_id(&self, id: UserId) -> Result<UserAccount, ApiError> {
        self.client.get_json(&format!("user/{id}")).await
    }

    async fn delete(&self, id: UserId) -> Result<(), ApiError> {
        self.client
            .send_unit::<()>(Method::DELETE, &format!("user/{id}"), None)
            .await
    }
}
