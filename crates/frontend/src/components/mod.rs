//! Shared UI components

pub mod chat_panel;
pub mod credential_settings;
pub mod image_gallery;
pub mod listings;
pub mod spinner;
pub mod toast;
pub mod upload_zone;

pub use chat_panel::ChatPanel;
pub use credential_settings::CredentialSettings;
pub use image_gallery::ImageGallery;
pub use listings::ListingsPanel;
pub use spinner::LoadingSpinner;
pub use toast::{ToastProvider, use_toast};
pub use upload_zone::UploadZone;
