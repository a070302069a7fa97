//! HTTP transport for the academic-records REST API.
//!
//! `ApiClient` carries the bearer token of the current session and attaches
//! it to every resource request. It also implements `Authenticator` for the
//! identity endpoint.

use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response};
use serde::{de::DeserializeOwned, Serialize};
use tracing::{debug, warn};

use super::resource::ResourceGateway;
use super::ApiError;
use crate::auth::{AuthError, AuthResponse, Authenticator, Credentials};
use crate::models::{Course, Enrollment, Grade, Student, Teacher};

// ============================================================================
// Constants
// ============================================================================

/// Identity endpoint, relative to the base URL
const LOGIN_PATH: &str = "auth/login";

const STUDENT_COUNT_PATH: &str = "students/stats/count";
const TEACHER_COUNT_PATH: &str = "teachers/stats/count";

/// API client for the records service.
/// Clone is cheap - reqwest::Client uses Arc internally for connection pooling.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
    token: Option<String>,
}

impl ApiClient {
    /// Create a client without a request timeout.
    pub fn new(base_url: &str) -> Result<Self> {
        Self::with_timeout(base_url, None)
    }

    pub fn with_timeout(base_url: &str, timeout: Option<Duration>) -> Result<Self> {
        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().context("Failed to build HTTP client")?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            token: None,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Set the bearer token for authenticated requests
    pub fn set_token(&mut self, token: String) {
        self.token = Some(token);
    }

    pub fn clear_token(&mut self) {
        self.token = None;
    }

    pub fn has_token(&self) -> bool {
        self.token.is_some()
    }

    /// Create a new ApiClient with the given token, sharing the connection pool.
    pub fn with_token(&self, token: String) -> Self {
        Self {
            client: self.client.clone(),
            base_url: self.base_url.clone(),
            token: Some(token),
        }
    }

    pub(crate) fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match self.token {
            Some(ref token) => request.bearer_auth(token),
            None => request,
        }
    }

    /// Check if response is successful, returning an error with body if not.
    async fn check_response(response: Response) -> Result<Response, ApiError> {
        if response.status().is_success() {
            Ok(response)
        } else {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            Err(ApiError::from_status(status, &body))
        }
    }

    pub(crate) async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let url = self.url(path);
        debug!(url = %url, "GET");
        let response = self.authorize(self.client.get(&url)).send().await?;
        let response = Self::check_response(response).await?;
        Ok(response.json().await?)
    }

    pub(crate) async fn post<T, B>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let url = self.url(path);
        debug!(url = %url, "POST");
        let response = self.authorize(self.client.post(&url)).json(body).send().await?;
        let response = Self::check_response(response).await?;
        Ok(response.json().await?)
    }

    pub(crate) async fn put<T, B>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let url = self.url(path);
        debug!(url = %url, "PUT");
        let response = self.authorize(self.client.put(&url)).json(body).send().await?;
        let response = Self::check_response(response).await?;
        Ok(response.json().await?)
    }

    pub(crate) async fn delete(&self, path: &str) -> Result<(), ApiError> {
        let url = self.url(path);
        debug!(url = %url, "DELETE");
        let response = self.authorize(self.client.delete(&url)).send().await?;
        Self::check_response(response).await?;
        Ok(())
    }

    // ===== Resource Gateways =====

    pub fn students(&self) -> ResourceGateway<'_, Student> {
        ResourceGateway::new(self)
    }

    pub fn teachers(&self) -> ResourceGateway<'_, Teacher> {
        ResourceGateway::new(self)
    }

    pub fn courses(&self) -> ResourceGateway<'_, Course> {
        ResourceGateway::new(self)
    }

    pub fn enrollments(&self) -> ResourceGateway<'_, Enrollment> {
        ResourceGateway::new(self)
    }

    pub fn grades(&self) -> ResourceGateway<'_, Grade> {
        ResourceGateway::new(self)
    }

    // ===== Dashboard =====

    pub async fn student_count(&self) -> Result<u64, ApiError> {
        self.get(STUDENT_COUNT_PATH).await
    }

    pub async fn teacher_count(&self) -> Result<u64, ApiError> {
        self.get(TEACHER_COUNT_PATH).await
    }
}

#[async_trait]
impl Authenticator for ApiClient {
    async fn authenticate(&self, credentials: &Credentials) -> Result<AuthResponse, AuthError> {
        let url = self.url(LOGIN_PATH);

        let response = self
            .client
            .post(&url)
            .json(credentials)
            .send()
            .await
            .map_err(|e| {
                warn!(error = %e, "Failed to send authentication request");
                AuthError::from_transport(&e)
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            debug!(%status, "Authentication rejected");
            return Err(AuthError::from_response_body(&body));
        }

        response.json::<AuthResponse>().await.map_err(|e| {
            warn!(error = %e, "Failed to parse auth response");
            AuthError::from_transport(&e)
        })
    }
}
