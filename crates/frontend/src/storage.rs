//! Browser-backed credential store and clock

use shopdeck_core::store::{
    self, ACCESS_TOKEN_KEY, REFRESH_TOKEN_KEY, TOKEN_EXPIRY_KEY, USER_DATA_KEY,
};
use shopdeck_core::{Clock, CredentialStore, Session, TokenGrant, UserProfile};
use web_sys::Storage;

/// Get localStorage
fn local_storage() -> Option<Storage> {
    web_sys::window().and_then(|w| w.local_storage().ok().flatten())
}

/// Credential store over `window.localStorage`.
///
/// Raw strings under the token keys, JSON under the profile key; the same
/// layout `store::assemble` reads and `store::classify_change` maps from
/// storage events. Writes are visible to every same-origin tab; this
/// tab's own listener lives in the auth provider.
#[derive(Debug, Clone, Copy, Default)]
pub struct BrowserCredentialStore;

impl BrowserCredentialStore {
    pub fn new() -> Self {
        Self
    }

    fn get(key: &str) -> Option<String> {
        local_storage()?.get_item(key).ok().flatten()
    }

    fn set(key: &str, value: &str) {
        if let Some(storage) = local_storage() {
            let _ = storage.set_item(key, value);
        }
    }

    fn remove(key: &str) {
        if let Some(storage) = local_storage() {
            let _ = storage.remove_item(key);
        }
    }
}

impl CredentialStore for BrowserCredentialStore {
    fn read(&self) -> Option<Session> {
        store::assemble(|key| Self::get(key))
    }

    fn write(&self, session: &Session) {
        Self::set(ACCESS_TOKEN_KEY, &session.access_token);
        Self::set(REFRESH_TOKEN_KEY, &session.refresh_token);
        match session.expires_at_ms {
            Some(at) => Self::set(TOKEN_EXPIRY_KEY, &at.to_string()),
            None => Self::remove(TOKEN_EXPIRY_KEY),
        }
        match &session.user {
            Some(user) => self.update_profile(user),
            None => Self::remove(USER_DATA_KEY),
        }
    }

    fn update_tokens(&self, grant: &TokenGrant, now_ms: i64) {
        Self::set(ACCESS_TOKEN_KEY, &grant.access_token);
        Self::set(REFRESH_TOKEN_KEY, &grant.refresh_token);
        Self::set(
            TOKEN_EXPIRY_KEY,
            &(now_ms + grant.expires_in * 1000).to_string(),
        );
    }

    fn update_profile(&self, user: &UserProfile) {
        if let Ok(serialized) = serde_json::to_string(user) {
            Self::set(USER_DATA_KEY, &serialized);
        }
    }

    fn clear(&self) {
        Self::remove(ACCESS_TOKEN_KEY);
        Self::remove(REFRESH_TOKEN_KEY);
        Self::remove(TOKEN_EXPIRY_KEY);
        Self::remove(USER_DATA_KEY);
    }
}

/// Clock backed by the browser's `Date`.
#[derive(Debug, Clone, Copy, Default)]
pub struct BrowserClock;

impl Clock for BrowserClock {
    fn now_ms(&self) -> i64 {
        js_sys::Date::now() as i64
    }
}
