//! Shopdeck API client
//!
//! One client instance serves the whole app: it reads the access token
//! from the credential store at request time, so a token refreshed by any
//! caller is picked up by every later request, including retries.

pub mod auth;
pub mod chat;
pub mod credentials;
pub mod error;
pub mod images;
pub mod marketplace;
pub mod refresh;

use crate::types::{ApiErrorBody, RefreshTokenRequest, RefreshTokenResponse};
use error::ApiError;
use refresh::{RefreshCoordinator, RefreshError, RefreshOutcome};
use reqwest::{header, Client, ClientBuilder, Method, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use shopdeck_core::{Clock, CredentialStore};
use std::sync::Arc;
#[cfg(not(target_arch = "wasm32"))]
use std::time::Duration;

/// Path of the token refresh endpoint. Requests to it never trigger
/// another refresh.
const REFRESH_PATH: &str = "/auth/refresh";

/// HTTP client that attaches the current access token and transparently
/// recovers from token expiry with a single silent refresh and retry.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
    store: Arc<dyn CredentialStore>,
    clock: Arc<dyn Clock>,
    refresher: Arc<RefreshCoordinator>,
}

impl ApiClient {
    /// Create a new client builder.
    pub fn builder() -> ApiClientBuilder {
        ApiClientBuilder::default()
    }

    /// Get the base URL.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// The credential store this client reads tokens from.
    pub fn store(&self) -> &Arc<dyn CredentialStore> {
        &self.store
    }

    pub(crate) fn now_ms(&self) -> i64 {
        self.clock.now_ms()
    }

    /// Request builder for `path`, with the current access token attached
    /// when a session exists. Without a session the request carries no
    /// Authorization header at all.
    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = format!("{}{}", self.base_url, path);
        let mut request = self.client.request(method, url);
        if let Some(session) = self.store.read() {
            request = request.header(
                header::AUTHORIZATION,
                format!("Bearer {}", session.access_token),
            );
        }
        request
    }

    pub async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T, ApiError> {
        self.dispatch(path, || Ok(self.request(Method::GET, path).query(query)))
            .await
    }

    pub async fn post<T: DeserializeOwned, B: Serialize>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        self.dispatch(path, || Ok(self.request(Method::POST, path).json(body)))
            .await
    }

    pub async fn put<T: DeserializeOwned, B: Serialize>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        self.dispatch(path, || Ok(self.request(Method::PUT, path).json(body)))
            .await
    }

    pub async fn delete<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        self.dispatch(path, || Ok(self.request(Method::DELETE, path)))
            .await
    }

    /// Multipart POST. The form is built by a factory because a retried
    /// request needs a fresh body; the transport sets the boundary and no
    /// JSON content type is attached.
    pub async fn post_multipart<T: DeserializeOwned>(
        &self,
        path: &str,
        form: impl Fn() -> Result<reqwest::multipart::Form, ApiError>,
    ) -> Result<T, ApiError> {
        self.dispatch(path, || {
            Ok(self.request(Method::POST, path).multipart(form()?))
        })
        .await
    }

    /// Health probe against the bare origin, outside the versioned API
    /// prefix.
    pub async fn health(&self) -> Result<String, ApiError> {
        let origin = self
            .base_url
            .strip_suffix("/api/v1")
            .unwrap_or(&self.base_url);
        let response = self.client.get(format!("{origin}/health")).send().await?;
        let status = response.status();
        if status.is_success() {
            Ok(response.text().await?)
        } else {
            Err(ApiError::from_status(status.as_u16(), ""))
        }
    }

    /// Send a request; on 401, refresh once through the coordinator and
    /// retry the rebuilt request exactly once. A rebuilt request re-reads
    /// the store, so the retry carries the refreshed token.
    ///
    /// The refresh generation is captured before the first send: if a
    /// refresh lands between this request taking its token snapshot and
    /// its 401 coming back, the coordinator hands over that refresh's
    /// outcome instead of starting a second exchange.
    async fn dispatch<T, F>(&self, path: &str, build: F) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        F: Fn() -> Result<RequestBuilder, ApiError>,
    {
        let observed = self.refresher.generation();
        let response = build()?.send().await?;
        if response.status() == StatusCode::UNAUTHORIZED && path != REFRESH_PATH {
            match self.refresher.run(observed, || self.perform_refresh()).await {
                Ok(()) => {
                    let retried = build()?.send().await?;
                    return Self::decode(retried).await;
                }
                Err(err) => {
                    // Tokens stay put here; whether to end the session is
                    // the session controller's call.
                    tracing::warn!(error = %err, %path, "refresh failed, surfacing original 401");
                }
            }
        }
        Self::decode(response).await
    }

    /// Run a refresh through the single-flight coordinator.
    pub async fn force_refresh(&self) -> RefreshOutcome {
        let observed = self.refresher.generation();
        self.refresher.run(observed, || self.perform_refresh()).await
    }

    /// Exchange the refresh token for a new grant and persist it. Sent
    /// without bearer auth and outside the 401-retry path, so a failing
    /// refresh can never trigger another refresh.
    async fn perform_refresh(&self) -> RefreshOutcome {
        let Some(session) = self.store.read() else {
            return Err(RefreshError::MissingRefreshToken);
        };
        let request = RefreshTokenRequest {
            refresh_token: session.refresh_token,
        };
        let response = self
            .client
            .post(format!("{}{REFRESH_PATH}", self.base_url))
            .json(&request)
            .send()
            .await
            .map_err(|err| RefreshError::Transient(err.to_string()))?;

        let status = response.status();
        if status.is_client_error() {
            let body = response.text().await.unwrap_or_default();
            let parsed: ApiErrorBody = serde_json::from_str(&body).unwrap_or_default();
            let message = parsed
                .message
                .unwrap_or_else(|| format!("refresh rejected with status {status}"));
            return Err(RefreshError::Rejected(message));
        }
        if !status.is_success() {
            return Err(RefreshError::Transient(format!(
                "refresh endpoint answered {status}"
            )));
        }

        let body: RefreshTokenResponse = response
            .json()
            .await
            .map_err(|err| RefreshError::Transient(err.to_string()))?;
        match body.token_data {
            Some(grant) if body.success => {
                self.store.update_tokens(&grant, self.now_ms());
                tracing::debug!("access token refreshed");
                Ok(())
            }
            // The server answered authoritatively without a usable grant;
            // retrying the same exchange would never succeed.
            _ => Err(RefreshError::Rejected(
                "refresh response carried no token data".into(),
            )),
        }
    }

    async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, ApiError> {
        let status = response.status();
        if status.is_success() {
            let body = response.text().await?;
            // Endpoints that answer with an empty body (e.g. DELETE)
            // decode as unit via an explicit null.
            let body = if body.trim().is_empty() { "null" } else { &body };
            serde_json::from_str(body).map_err(|err| ApiError::Parse(err.to_string()))
        } else {
            let body = response.text().await.unwrap_or_default();
            Err(ApiError::from_status(status.as_u16(), &body))
        }
    }
}

/// Builder for [`ApiClient`].
#[derive(Default)]
pub struct ApiClientBuilder {
    base_url: Option<String>,
    #[cfg(not(target_arch = "wasm32"))]
    timeout: Option<Duration>,
    user_agent: Option<String>,
    store: Option<Arc<dyn CredentialStore>>,
    clock: Option<Arc<dyn Clock>>,
}

impl ApiClientBuilder {
    /// Set the base URL, e.g. `https://dashboard.example.com/api/v1`.
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Set the request timeout.
    #[cfg(not(target_arch = "wasm32"))]
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Set the user agent.
    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.user_agent = Some(agent.into());
        self
    }

    /// Set the credential store the client reads tokens from.
    pub fn credential_store(mut self, store: Arc<dyn CredentialStore>) -> Self {
        self.store = Some(store);
        self
    }

    /// Override the clock used for expiry arithmetic.
    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = Some(clock);
        self
    }

    /// Build the client.
    pub fn build(self) -> Result<ApiClient, ApiError> {
        let base_url = self
            .base_url
            .ok_or_else(|| ApiError::Configuration("base_url is required".into()))?
            .trim_end_matches('/')
            .to_string();
        let store = self
            .store
            .ok_or_else(|| ApiError::Configuration("credential store is required".into()))?;

        #[cfg(not(target_arch = "wasm32"))]
        let clock = self
            .clock
            .unwrap_or_else(|| Arc::new(shopdeck_core::SystemClock));
        #[cfg(target_arch = "wasm32")]
        let clock = self
            .clock
            .ok_or_else(|| ApiError::Configuration("clock is required".into()))?;

        let mut client_builder = ClientBuilder::new().user_agent(
            self.user_agent
                .unwrap_or_else(|| "shopdeck-client/0.1.0".to_string()),
        );

        #[cfg(not(target_arch = "wasm32"))]
        if let Some(timeout) = self.timeout {
            client_builder = client_builder.timeout(timeout);
        }

        let client = client_builder.build()?;

        Ok(ApiClient {
            client,
            base_url,
            store,
            clock,
            refresher: Arc::new(RefreshCoordinator::new()),
        })
    }
}
