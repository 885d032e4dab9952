//! Session lifecycle controller
//!
//! Owns the login/logout/refresh choreography the UI drives. The guiding
//! policy: a user is only logged out when the server authoritatively ends
//! the session; connectivity blips never do.

use crate::client::error::ApiError;
use crate::client::ApiClient;
use crate::types::{AuthResponse, LoginRequest, RegisterRequest};
use shopdeck_core::{CredentialStore, Session};
use std::sync::Arc;
use thiserror::Error;

/// Lifecycle state of the auth session as exposed to the UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionPhase {
    #[default]
    Uninitialized,
    Initializing,
    Authenticated,
    Unauthenticated,
}

/// Errors from session operations.
#[derive(Debug, Error)]
pub enum SessionError {
    /// Refresh failed terminally; the stored session was cleared.
    #[error("session expired, please log in again")]
    Expired,

    /// The server answered, but without a usable grant.
    #[error("{0}")]
    Rejected(String),

    /// Transport-level trouble; the stored session was preserved.
    #[error("could not reach the server: {0}")]
    Transient(String),

    #[error(transparent)]
    Api(#[from] ApiError),
}

impl SessionError {
    /// Message suitable for a user-facing notification.
    pub fn user_message(&self) -> String {
        match self {
            Self::Api(err) => err.user_message(),
            other => other.to_string(),
        }
    }
}

/// Drives session state over an [`ApiClient`]. Cheap to clone; clones
/// share the client, store and refresh coordinator.
#[derive(Clone)]
pub struct SessionController {
    client: ApiClient,
}

impl SessionController {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    /// The underlying client, for feature services built on the same
    /// authenticated transport.
    pub fn client(&self) -> &ApiClient {
        &self.client
    }

    fn store(&self) -> &Arc<dyn CredentialStore> {
        self.client.store()
    }

    /// Restore the session persisted by a previous page load.
    ///
    /// Returns the session to adopt, or `None` for a clean logged-out
    /// start. Expired tokens get one refresh attempt; an unreachable
    /// server is treated optimistically (the stored session is kept and
    /// the next API call will retry), while an authoritative rejection
    /// clears it.
    pub async fn initialize(&self) -> Option<Session> {
        let session = self.store().read()?;

        if session.is_expired(self.client.now_ms()) {
            return match self.refresh().await {
                Ok(()) => self.store().read(),
                Err(SessionError::Expired) => None,
                Err(err) => {
                    tracing::warn!(
                        error = %err,
                        "refresh failed during initialization, keeping stored session"
                    );
                    Some(session)
                }
            };
        }

        match self.client.validate_token(&session.access_token).await {
            Ok(result) if result.valid => Some(session),
            Ok(_) => {
                // Not valid despite an unexpired timestamp; one refresh
                // attempt before giving up.
                match self.refresh().await {
                    Ok(()) => self.store().read(),
                    Err(_) => {
                        self.store().clear();
                        None
                    }
                }
            }
            Err(ApiError::Network(err)) => {
                tracing::warn!(
                    error = %err,
                    "validation unreachable during initialization, assuming session is good"
                );
                Some(session)
            }
            Err(err) => {
                tracing::warn!(error = %err, "token validation errored during initialization");
                match self.refresh().await {
                    Ok(()) => self.store().read(),
                    Err(_) => {
                        self.store().clear();
                        None
                    }
                }
            }
        }
    }

    /// Log in and persist the returned grant and profile together.
    pub async fn login(&self, request: &LoginRequest) -> Result<Session, SessionError> {
        let response = self.client.login(request).await?;
        self.adopt(response, "Login failed")
    }

    /// Register and persist the returned grant and profile together.
    pub async fn register(&self, request: &RegisterRequest) -> Result<Session, SessionError> {
        let response = self.client.register(request).await?;
        self.adopt(response, "Registration failed")
    }

    /// End the session locally. Every storage key is removed regardless
    /// of prior state; other tabs observe the change and follow.
    pub fn logout(&self) {
        self.store().clear();
    }

    /// Ask the server whether the stored access token is still valid.
    pub async fn validate(&self) -> Result<bool, SessionError> {
        let Some(session) = self.store().read() else {
            return Ok(false);
        };
        let response = self.client.validate_token(&session.access_token).await?;
        Ok(response.valid)
    }

    /// Refresh through the single-flight coordinator. A terminal failure
    /// clears the session; a transient one preserves it.
    pub async fn refresh(&self) -> Result<(), SessionError> {
        match self.client.force_refresh().await {
            Ok(()) => Ok(()),
            Err(err) if err.is_terminal() => {
                tracing::warn!(error = %err, "refresh failed terminally, ending session");
                self.store().clear();
                Err(SessionError::Expired)
            }
            Err(err) => {
                tracing::debug!(error = %err, "transient refresh failure, session preserved");
                Err(SessionError::Transient(err.to_string()))
            }
        }
    }

    /// Proactive refresh for the background timer: only acts when the
    /// token is inside the threshold window of its expiry.
    pub async fn refresh_if_needed(&self, threshold_ms: i64) -> Result<(), SessionError> {
        let Some(session) = self.store().read() else {
            return Ok(());
        };
        if !session.expires_within(self.client.now_ms(), threshold_ms) {
            return Ok(());
        }
        self.refresh().await
    }

    fn adopt(&self, response: AuthResponse, fallback: &str) -> Result<Session, SessionError> {
        let AuthResponse {
            success,
            message,
            user_data,
            token_data,
        } = response;
        let grant = match (success, token_data) {
            (true, Some(grant)) => grant,
            _ => {
                return Err(SessionError::Rejected(
                    message.unwrap_or_else(|| fallback.to_string()),
                ))
            }
        };
        let mut session = Session::from_grant(&grant, self.client.now_ms());
        session.user = user_data;
        self.store().write(&session);
        Ok(session)
    }
}
