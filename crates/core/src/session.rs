//! Session state shared between the API client and the UI

use serde::{Deserialize, Serialize};

/// Profile fields returned by the auth endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub id: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    #[serde(default)]
    pub role: Option<String>,
}

/// Token payload issued by login, register and refresh.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenGrant {
    pub access_token: String,
    pub refresh_token: String,
    /// Access token lifetime in seconds.
    pub expires_in: i64,
    pub token_type: String,
}

/// In-memory view of the persisted session.
///
/// Both tokens are required: the credential store never surfaces a session
/// with one of them missing, so the access/refresh pair cannot be observed
/// half-set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub access_token: String,
    pub refresh_token: String,
    /// Latest known expiry of the access token, epoch milliseconds. Absent
    /// means the token needs validation before trusted use.
    pub expires_at_ms: Option<i64>,
    pub user: Option<UserProfile>,
}

impl Session {
    /// Build a session from a freshly issued grant.
    pub fn from_grant(grant: &TokenGrant, now_ms: i64) -> Self {
        Self {
            access_token: grant.access_token.clone(),
            refresh_token: grant.refresh_token.clone(),
            expires_at_ms: Some(now_ms + grant.expires_in * 1000),
            user: None,
        }
    }

    /// Whether the access token has passed its known expiry. A session
    /// without a recorded expiry counts as expired.
    pub fn is_expired(&self, now_ms: i64) -> bool {
        match self.expires_at_ms {
            Some(at) => now_ms > at,
            None => true,
        }
    }

    /// Whether the access token expires within the given window.
    pub fn expires_within(&self, now_ms: i64, threshold_ms: i64) -> bool {
        match self.expires_at_ms {
            Some(at) => at - now_ms <= threshold_ms,
            None => true,
        }
    }

    /// Whole minutes until expiry, clamped at zero.
    pub fn minutes_until_expiry(&self, now_ms: i64) -> i64 {
        match self.expires_at_ms {
            Some(at) => ((at - now_ms) / 60_000).max(0),
            None => 0,
        }
    }
}
