//! Shopdeck HTTP client
//!
//! Wraps the dashboard API behind a client that attaches the current
//! access token, recovers from expiry with a single silent refresh, and
//! retries the failed request once. Builds for native targets (tests,
//! tooling) and wasm32 (the frontend).

pub mod client;
pub mod session;
pub mod types;

pub use client::error::ApiError;
pub use client::marketplace::MarketplaceApiClient;
pub use client::refresh::RefreshError;
pub use client::{ApiClient, ApiClientBuilder};
pub use session::{SessionController, SessionError, SessionPhase};
