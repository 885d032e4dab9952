//! Feature services over the shared authenticated client
//!
//! Constructed from the client the auth provider owns and passed down
//! explicitly; there are no module-level singletons.

pub mod ai;
pub mod images;

pub use ai::AiService;
pub use images::ImageService;
