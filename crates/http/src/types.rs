//! Request and response types for the Shopdeck API

use serde::{Deserialize, Serialize};
use shopdeck_core::{TokenGrant, UserProfile};
use std::collections::HashMap;

/// Error body the API returns on failure.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ApiErrorBody {
    pub message: Option<String>,
    #[serde(default)]
    pub errors: Vec<ApiFieldError>,
}

/// Per-field error inside an [`ApiErrorBody`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiFieldError {
    pub field: String,
    pub message: String,
}

// Auth

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
}

/// Shared response shape of `/auth/register` and `/auth/login`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    #[serde(default)]
    pub success: bool,
    pub message: Option<String>,
    pub user_data: Option<UserProfile>,
    pub token_data: Option<TokenGrant>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidateTokenRequest {
    pub token: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ValidateTokenResponse {
    pub valid: bool,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshTokenRequest {
    pub refresh_token: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshTokenResponse {
    #[serde(default)]
    pub success: bool,
    pub token_data: Option<TokenGrant>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileResponse {
    #[serde(default)]
    pub success: bool,
    pub message: Option<String>,
    pub user_data: Option<UserProfile>,
}

// Images

/// Stored object metadata returned by the upload endpoint.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageData {
    pub key: String,
    pub url: String,
    pub user_id: String,
    pub image_type: String,
    pub file_name: String,
    pub content_type: String,
    pub size: u64,
    pub uploaded_at: String,
    pub etag: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageUploadResponse {
    #[serde(default)]
    pub success: bool,
    pub message: Option<String>,
    pub original_image: ImageData,
    pub enhanced_image: Option<ImageData>,
    /// CDN-served address, distinct from the storage origin URL.
    pub cloud_front_url: String,
    pub enhanced_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageMetadata {
    pub image_id: String,
    pub file_name: String,
    pub original_name: String,
    pub file_size: u64,
    pub mime_type: String,
    pub url: String,
    pub cloud_front_url: String,
    pub uploaded_at: String,
    #[serde(default)]
    pub tags: Option<Vec<String>>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageListResponse {
    #[serde(default)]
    pub success: bool,
    pub message: Option<String>,
    pub images: Vec<ImageMetadata>,
    pub total_count: u64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageDeleteResponse {
    #[serde(default)]
    pub success: bool,
    pub message: Option<String>,
    pub deleted_image_id: String,
}

// AI chat

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    User,
    Assistant,
}

/// A prior turn sent along as conversation context.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatTurn {
    pub role: ChatRole,
    pub content: String,
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatContext {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub previous_messages: Option<Vec<ChatTurn>>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatMessageRequest {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub conversation_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<ChatContext>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatMessageResponse {
    #[serde(default)]
    pub success: bool,
    pub response: String,
    pub conversation_id: Option<String>,
    pub message_id: Option<String>,
    pub timestamp: Option<String>,
}

// SEO analysis

/// Image handed to the SEO analyzer: either bytes picked in the browser or
/// the URL of an already-uploaded image.
#[derive(Debug, Clone)]
pub enum SeoImageSource {
    File {
        file_name: String,
        content_type: String,
        bytes: Vec<u8>,
    },
    Url(String),
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SeoProductInfo {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SeoAnalysisType {
    #[default]
    Basic,
    Detailed,
    Competitive,
}

impl SeoAnalysisType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Basic => "basic",
            Self::Detailed => "detailed",
            Self::Competitive => "competitive",
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct SeoAnalysisRequest {
    pub images: Vec<SeoImageSource>,
    pub product_info: Option<SeoProductInfo>,
    pub target_marketplaces: Option<Vec<String>>,
    pub analysis_type: SeoAnalysisType,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeoScores {
    pub quality: f64,
    pub composition: f64,
    pub marketability: f64,
    pub seo_friendliness: f64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColorAnalysis {
    pub dominant_colors: Vec<String>,
    pub color_harmony: f64,
    pub brand_compatibility: f64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeoImageAnalysis {
    pub image_id: String,
    pub image_url: Option<String>,
    pub scores: SeoScores,
    pub detected_objects: Vec<String>,
    pub suggested_tags: Vec<String>,
    pub improvements: Vec<String>,
    pub color_analysis: ColorAnalysis,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceRange {
    pub min: f64,
    pub max: f64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PricingInsights {
    pub suggested_price_range: PriceRange,
    pub competitive_analysis: Vec<String>,
    pub market_positioning: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeoRecommendations {
    pub title_suggestions: Vec<String>,
    pub description_suggestions: Vec<String>,
    pub keyword_recommendations: Vec<String>,
    pub category_optimization: Vec<String>,
    pub pricing_insights: PricingInsights,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarketplaceOptimization {
    pub marketplace: String,
    pub optimization_score: f64,
    pub specific_recommendations: Vec<String>,
    pub required_changes: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimilarProduct {
    pub title: String,
    pub price: f64,
    pub marketplace: String,
    pub performance_score: f64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompetitiveAnalysis {
    pub similar_products: Vec<SimilarProduct>,
    pub market_gap: Vec<String>,
    pub opportunities: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeoAnalysis {
    pub overall_score: f64,
    pub image_analysis: Vec<SeoImageAnalysis>,
    pub seo_recommendations: SeoRecommendations,
    pub marketplace_optimization: Vec<MarketplaceOptimization>,
    pub competitive_analysis: Option<CompetitiveAnalysis>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeoAnalysisResponse {
    #[serde(default)]
    pub success: bool,
    pub message: Option<String>,
    pub analysis: SeoAnalysis,
    pub processing_time: Option<f64>,
    pub analysis_id: String,
}

// Marketplace credentials

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CredentialStatus {
    Active,
    Inactive,
    Error,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarketplaceCredential {
    pub id: String,
    pub marketplace: String,
    pub api_key: String,
    #[serde(default)]
    pub secret_key: Option<String>,
    #[serde(default)]
    pub additional_fields: Option<HashMap<String, String>>,
    pub status: CredentialStatus,
    #[serde(default)]
    pub last_sync: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveCredentialRequest {
    pub marketplace: String,
    pub api_key: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub secret_key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub additional_fields: Option<HashMap<String, String>>,
}

// External marketplace products

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarketplaceProduct {
    pub id: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    pub description: String,
    pub price: f64,
    pub category_id: String,
    #[serde(default)]
    pub seller_id: Option<String>,
    #[serde(default)]
    pub seller_name: Option<String>,
    #[serde(default)]
    pub category_name: Option<String>,
    #[serde(default)]
    pub stock: Option<u32>,
    #[serde(default)]
    pub status: Option<i32>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
    #[serde(default)]
    pub is_active: Option<bool>,
}

impl MarketplaceProduct {
    /// Marketplaces disagree on whether the display name is `title` or
    /// `name`; take whichever is present.
    pub fn display_name(&self) -> &str {
        self.title
            .as_deref()
            .or(self.name.as_deref())
            .unwrap_or("(untitled)")
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ProductsResponse {
    #[serde(default)]
    pub success: bool,
    pub data: Vec<MarketplaceProduct>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ProductResponse {
    #[serde(default)]
    pub success: bool,
    pub data: MarketplaceProduct,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateProductRequest {
    pub title: String,
    pub description: String,
    pub price: f64,
    pub category_id: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProductRequest {
    pub title: String,
    pub description: String,
    pub price: f64,
    pub category_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stock: Option<u32>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DeleteProductResponse {
    #[serde(default)]
    pub success: bool,
    pub message: Option<String>,
}
