//! AI assistant endpoints

use super::error::ApiError;
use super::ApiClient;
use crate::types::{
    ChatMessageRequest, ChatMessageResponse, SeoAnalysisRequest, SeoAnalysisResponse,
    SeoImageSource,
};
use reqwest::multipart::{Form, Part};

impl ApiClient {
    /// Send one chat turn to the AI backend.
    pub async fn send_chat_message(
        &self,
        request: &ChatMessageRequest,
    ) -> Result<ChatMessageResponse, ApiError> {
        self.post("/chat/message", request).await
    }

    /// Run SEO analysis over images and product info. Picked files go up
    /// as multipart parts; already-uploaded images are referenced by URL.
    pub async fn analyze_seo(
        &self,
        request: &SeoAnalysisRequest,
    ) -> Result<SeoAnalysisResponse, ApiError> {
        self.post_multipart("/chat/seo", || {
            let mut form = Form::new();
            for (index, image) in request.images.iter().enumerate() {
                match image {
                    SeoImageSource::File {
                        file_name,
                        content_type,
                        bytes,
                    } => {
                        let part = Part::bytes(bytes.clone())
                            .file_name(file_name.clone())
                            .mime_str(content_type)
                            .map_err(|err| {
                                ApiError::Configuration(format!("invalid content type: {err}"))
                            })?;
                        form = form.part("images", part);
                    }
                    SeoImageSource::Url(url) => {
                        form = form.text(format!("imageUrls[{index}]"), url.clone());
                    }
                }
            }
            if let Some(info) = &request.product_info {
                let serialized = serde_json::to_string(info)
                    .map_err(|err| ApiError::Parse(err.to_string()))?;
                form = form.text("productInfo", serialized);
            }
            if let Some(marketplaces) = &request.target_marketplaces {
                let serialized = serde_json::to_string(marketplaces)
                    .map_err(|err| ApiError::Parse(err.to_string()))?;
                form = form.text("targetMarketplaces", serialized);
            }
            form = form.text("analysisType", request.analysis_type.as_str());
            Ok(form)
        })
        .await
    }
}
