//! Authentication endpoints

use super::error::ApiError;
use super::ApiClient;
use crate::types::{
    AuthResponse, LoginRequest, ProfileResponse, RegisterRequest, ValidateTokenRequest,
    ValidateTokenResponse,
};

impl ApiClient {
    /// Create an account. The response carries the initial token grant.
    pub async fn register(&self, request: &RegisterRequest) -> Result<AuthResponse, ApiError> {
        self.post("/auth/register", request).await
    }

    /// Authenticate with email and password.
    pub async fn login(&self, request: &LoginRequest) -> Result<AuthResponse, ApiError> {
        self.post("/auth/login", request).await
    }

    /// Ask the server whether a token is still valid.
    pub async fn validate_token(&self, token: &str) -> Result<ValidateTokenResponse, ApiError> {
        let request = ValidateTokenRequest {
            token: token.to_owned(),
        };
        self.post("/auth/validate", &request).await
    }

    /// Fetch a user's profile.
    pub async fn profile(&self, user_id: &str) -> Result<ProfileResponse, ApiError> {
        self.get("/auth/profile", &[("userId", user_id.to_owned())])
            .await
    }
}
