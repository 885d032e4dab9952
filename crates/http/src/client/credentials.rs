//! Marketplace credential endpoints
//!
//! Per-marketplace API keys the seller configures in Settings; the
//! external marketplace client is built from these records.

use super::error::ApiError;
use super::ApiClient;
use crate::types::{MarketplaceCredential, SaveCredentialRequest};

const CREDENTIALS_PATH: &str = "/user/marketplace-credentials";

impl ApiClient {
    /// List stored credentials. A seller without any configured keys gets
    /// an empty list, not an error.
    pub async fn marketplace_credentials(&self) -> Result<Vec<MarketplaceCredential>, ApiError> {
        match self.get(CREDENTIALS_PATH, &[]).await {
            Ok(credentials) => Ok(credentials),
            Err(err) => {
                tracing::warn!(error = %err, "no marketplace credentials available");
                Ok(Vec::new())
            }
        }
    }

    pub async fn save_marketplace_credential(
        &self,
        request: &SaveCredentialRequest,
    ) -> Result<MarketplaceCredential, ApiError> {
        self.post(CREDENTIALS_PATH, request).await
    }

    pub async fn update_marketplace_credential(
        &self,
        id: &str,
        request: &SaveCredentialRequest,
    ) -> Result<MarketplaceCredential, ApiError> {
        self.put(&format!("{CREDENTIALS_PATH}/{id}"), request).await
    }

    pub async fn delete_marketplace_credential(&self, id: &str) -> Result<(), ApiError> {
        self.delete(&format!("{CREDENTIALS_PATH}/{id}")).await
    }
}
