//! Shared HTTP plumbing for every gateway.
//!
//! DESIGN
//! ======
//! One `reqwest::Client` per app, cloned into each gateway. Every request
//! goes out with the current bearer token when the [`SessionStore`] holds a
//! record, and with no `Authorization` header otherwise. A call is exactly
//! one request: no retries, no caching.

#[cfg(test)]
#[path = "http_test.rs"]
mod http_test;

use std::time::Duration;

use reqwest::Method;
use reqwest::header::AUTHORIZATION;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;

use super::error::ApiError;
use crate::config::ClientConfig;
use crate::state::session::SessionStore;

#[derive(Clone, Debug)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    session: SessionStore,
}

impl ApiClient {
    /// Build a client for `config.base_url` that authenticates as whoever
    /// `session` currently holds.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client fails to build.
    pub fn new(config: &ClientConfig, session: SessionStore) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
            .build()
            .map_err(|e| ApiError::ClientBuild(e.to_string()))?;
        Ok(Self { http, base_url: config.base_url.clone(), session })
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    #[must_use]
    pub fn session(&self) -> &SessionStore {
        &self.session
    }

    pub(crate) fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    fn request(&self, method: Method, path: &str) -> reqwest::RequestBuilder {
        debug!(%method, path, "api request");
        let builder = self.http.request(method, self.endpoint(path));
        match self.session.authorization() {
            Some(value) => builder.header(AUTHORIZATION, value),
            None => builder,
        }
    }

    /// Send and return the body of a 2xx response.
    async fn execute(&self, builder: reqwest::RequestBuilder) -> Result<String, ApiError> {
        let response = builder.send().await?;
        let status = response.status();
        if !status.is_success() {
            debug!(status = status.as_u16(), "api request rejected");
            let body = response.text().await.unwrap_or_default();
            return Err(ApiError::Status { status: status.as_u16(), body });
        }
        Ok(response.text().await?)
    }

    pub(crate) async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let body = self.execute(self.request(Method::GET, path)).await?;
        decode(&body)
    }

    pub(crate) async fn send_json<B, T>(&self, method: Method, path: &str, payload: &B) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized + Sync,
        T: DeserializeOwned,
    {
        let body = self.execute(self.request(method, path).json(payload)).await?;
        decode(&body)
    }

    /// Send with an optional JSON body and discard whatever comes back.
    pub(crate) async fn send_unit<B>(&self, method: Method, path: &str, payload: Option<&B>) -> Result<(), ApiError>
    where
        B: Serialize + ?Sized + Sync,
    {
        let builder = self.request(method, path);
        let builder = match payload {
            Some(payload) => builder.json(payload),
            None => builder,
        };
        self.execute(builder).await.map(|_| ())
    }
}

pub(crate) fn decode<T: DeserializeOwned>(body: &str) -> Result<T, ApiError> {
    serde_json::from_str(body).map_err(|e| ApiError::Decode(e.to_string()))
}
