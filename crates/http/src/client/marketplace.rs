//! External marketplace client
//!
//! Product CRUD against a marketplace's public API, authenticated with
//! the per-marketplace key from a stored credential. The key is static
//! for the life of the client, so these calls never enter the refresh
//! path.

use super::error::ApiError;
use crate::types::{
    CreateProductRequest, DeleteProductResponse, MarketplaceCredential, ProductResponse,
    ProductsResponse, UpdateProductRequest,
};
use reqwest::{header, Client, ClientBuilder, Method, RequestBuilder};
use serde::de::DeserializeOwned;

#[derive(Clone, Debug)]
pub struct MarketplaceApiClient {
    client: Client,
    base_url: String,
    api_key: String,
}

impl MarketplaceApiClient {
    pub fn new(
        base_url: impl Into<String>,
        api_key: impl Into<String>,
    ) -> Result<Self, ApiError> {
        let api_key = api_key.into();
        if api_key.trim().is_empty() {
            return Err(ApiError::Configuration(
                "Marketplace API key not found. Please configure it in Settings.".into(),
            ));
        }
        let client = ClientBuilder::new()
            .user_agent("shopdeck-client/0.1.0")
            .build()?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key,
        })
    }

    /// Build a client from a credential record stored in Settings.
    pub fn from_credential(
        base_url: impl Into<String>,
        credential: &MarketplaceCredential,
    ) -> Result<Self, ApiError> {
        Self::new(base_url, credential.api_key.clone())
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = format!("{}{}", self.base_url, path);
        self.client
            .request(method, url)
            .header(header::AUTHORIZATION, format!("Bearer {}", self.api_key))
    }

    async fn execute<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
    ) -> Result<T, ApiError> {
        let response = request.send().await?;
        let status = response.status();
        if status.is_success() {
            let body = response.text().await?;
            serde_json::from_str(&body).map_err(|err| ApiError::Parse(err.to_string()))
        } else {
            let body = response.text().await.unwrap_or_default();
            Err(ApiError::from_status(status.as_u16(), &body))
        }
    }

    /// Listings owned by the authenticated seller.
    pub async fn my_products(&self) -> Result<ProductsResponse, ApiError> {
        let request = self.request(Method::GET, "/Product/my-products");
        self.execute(request).await
    }

    pub async fn product(&self, id: &str) -> Result<ProductResponse, ApiError> {
        let request = self.request(Method::GET, &format!("/Product/{id}"));
        self.execute(request).await
    }

    pub async fn create_product(
        &self,
        product: &CreateProductRequest,
    ) -> Result<ProductResponse, ApiError> {
        let request = self.request(Method::POST, "/Product").json(product);
        self.execute(request).await
    }

    pub async fn update_product(
        &self,
        id: &str,
        product: &UpdateProductRequest,
    ) -> Result<ProductResponse, ApiError> {
        let request = self
            .request(Method::PUT, &format!("/Product/{id}"))
            .json(product);
        self.execute(request).await
    }

    pub async fn delete_product(&self, id: &str) -> Result<DeleteProductResponse, ApiError> {
        let request = self.request(Method::DELETE, &format!("/Product/{id}"));
        self.execute(request).await
    }
}
