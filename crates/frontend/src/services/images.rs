//! Image management service

use shopdeck_http::client::images::UploadImage;
use shopdeck_http::types::{ImageDeleteResponse, ImageListResponse, ImageUploadResponse};
use shopdeck_http::{ApiClient, ApiError};

const MAX_UPLOAD_BYTES: u64 = 10 * 1024 * 1024;
const ALLOWED_TYPES: [&str; 4] = ["image/jpeg", "image/jpg", "image/png", "image/webp"];

#[derive(Clone)]
pub struct ImageService {
    client: ApiClient,
}

impl ImageService {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    /// Client-side checks before any bytes leave the browser.
    pub fn validate_file(name: &str, content_type: &str, size: u64) -> Result<(), String> {
        if !ALLOWED_TYPES.contains(&content_type) {
            return Err(format!(
                "{name}: unsupported format. Upload a JPG, PNG or WebP image."
            ));
        }
        if size > MAX_UPLOAD_BYTES {
            return Err(format!("{name}: file is too large. The limit is 10 MB."));
        }
        Ok(())
    }

    pub async fn upload(&self, upload: &UploadImage) -> Result<ImageUploadResponse, ApiError> {
        self.client.upload_image(upload).await
    }

    /// Upload a batch concurrently, tolerating individual failures.
    /// Returns the accepted responses and the names of the files that
    /// failed.
    pub async fn upload_many(
        &self,
        uploads: Vec<UploadImage>,
    ) -> (Vec<ImageUploadResponse>, Vec<String>) {
        let results = futures::future::join_all(
            uploads.iter().map(|upload| self.client.upload_image(upload)),
        )
        .await;

        let mut succeeded = Vec::new();
        let mut failed = Vec::new();
        for (upload, result) in uploads.iter().zip(results) {
            match result {
                Ok(response) => succeeded.push(response),
                Err(err) => {
                    log::warn!("upload of {} failed: {err}", upload.file_name);
                    failed.push(upload.file_name.clone());
                }
            }
        }
        (succeeded, failed)
    }

    pub async fn list(&self, page: u32, limit: u32) -> Result<ImageListResponse, ApiError> {
        self.client.list_images(page, limit).await
    }

    pub async fn delete(&self, image_id: &str) -> Result<ImageDeleteResponse, ApiError> {
        self.client.delete_image(image_id).await
    }
}
