//! Image storage endpoints

use super::error::ApiError;
use super::ApiClient;
use crate::types::{ImageDeleteResponse, ImageListResponse, ImageUploadResponse};
use reqwest::multipart::{Form, Part};

/// A file picked for upload.
#[derive(Debug, Clone)]
pub struct UploadImage {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
    pub tags: Vec<String>,
}

impl ApiClient {
    /// Upload an image; the server stores the original and, when it can,
    /// an enhanced variant.
    pub async fn upload_image(
        &self,
        upload: &UploadImage,
    ) -> Result<ImageUploadResponse, ApiError> {
        self.post_multipart("/images/upload", || {
            let part = Part::bytes(upload.bytes.clone())
                .file_name(upload.file_name.clone())
                .mime_str(&upload.content_type)
                .map_err(|err| ApiError::Configuration(format!("invalid content type: {err}")))?;
            let mut form = Form::new().part("image", part);
            if !upload.tags.is_empty() {
                let tags = serde_json::to_string(&upload.tags)
                    .map_err(|err| ApiError::Parse(err.to_string()))?;
                form = form.text("tags", tags);
            }
            Ok(form)
        })
        .await
    }

    /// Page through the seller's uploaded images.
    pub async fn list_images(&self, page: u32, limit: u32) -> Result<ImageListResponse, ApiError> {
        self.get(
            "/images/list",
            &[("page", page.to_string()), ("limit", limit.to_string())],
        )
        .await
    }

    /// Remove an uploaded image.
    pub async fn delete_image(&self, image_id: &str) -> Result<ImageDeleteResponse, ApiError> {
        self.delete(&format!("/images/delete/{image_id}")).await
    }
}
