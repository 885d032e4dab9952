//! AI assistant service

use shopdeck_http::types::{
    ChatContext, ChatMessageRequest, ChatMessageResponse, ChatTurn, SeoAnalysisRequest,
    SeoAnalysisResponse, SeoImageSource,
};
use shopdeck_http::{ApiClient, ApiError};

#[derive(Clone)]
pub struct AiService {
    client: ApiClient,
}

impl AiService {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    /// Send the latest user turn, carrying prior turns as context.
    pub async fn send_message(
        &self,
        message: &str,
        conversation_id: Option<String>,
        history: Vec<ChatTurn>,
    ) -> Result<ChatMessageResponse, ApiError> {
        let context = (!history.is_empty()).then(|| ChatContext {
            previous_messages: Some(history),
            ..ChatContext::default()
        });
        let request = ChatMessageRequest {
            message: message.to_owned(),
            conversation_id,
            context,
        };
        self.client.send_chat_message(&request).await
    }

    pub async fn analyze_seo(
        &self,
        request: &SeoAnalysisRequest,
    ) -> Result<SeoAnalysisResponse, ApiError> {
        self.client.analyze_seo(request).await
    }

    /// Basic analysis of a single image.
    pub async fn quick_image_seo(
        &self,
        image: SeoImageSource,
    ) -> Result<SeoAnalysisResponse, ApiError> {
        self.analyze_seo(&SeoAnalysisRequest {
            images: vec![image],
            ..SeoAnalysisRequest::default()
        })
        .await
    }
}
