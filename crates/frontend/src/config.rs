//! Frontend configuration

/// Authentication configuration
pub struct AuthConfig;

impl AuthConfig {
    /// How often the background task re-checks the token, in milliseconds
    pub const REFRESH_CHECK_INTERVAL_MS: u32 = 5 * 60 * 1000;

    /// Refresh proactively when the token is within this window of expiry
    pub const EXPIRY_THRESHOLD_MS: i64 = 5 * 60 * 1000;

    /// Delay before the first background check, clear of initialization
    pub const INITIAL_CHECK_DELAY_MS: u32 = 10_000;
}

/// API endpoint configuration
pub struct ApiConfig;

impl ApiConfig {
    /// Versioned path prefix of the dashboard API
    pub const BASE_PATH: &'static str = "/api/v1";

    /// External marketplace API consumed with per-marketplace keys
    pub const MARKETPLACE_API_URL: &'static str = "https://mock-api.shopdeck.dev/api/v1";

    /// Marketplace identifier backing the Listings tab
    pub const DEFAULT_MARKETPLACE: &'static str = "mockmarket";
}
