//! Durable credential persistence
//!
//! The key layout matches the browser localStorage the frontend reads:
//! three raw-string token keys plus a JSON-serialized profile. Any backend
//! that speaks these keys (localStorage in a tab, the in-memory store in
//! tests) yields the same sessions through [`assemble`], and the same
//! cross-tab events through [`classify_change`].

use crate::session::{Session, TokenGrant, UserProfile};
use std::collections::HashMap;
use std::sync::Mutex;

pub const ACCESS_TOKEN_KEY: &str = "accessToken";
pub const REFRESH_TOKEN_KEY: &str = "refreshToken";
pub const TOKEN_EXPIRY_KEY: &str = "tokenExpiry";
pub const USER_DATA_KEY: &str = "userData";

/// Change to the shared credential state, as observed from another tab.
#[derive(Debug, Clone, PartialEq)]
pub enum StoreEvent {
    AccessTokenChanged(Option<String>),
    ProfileChanged(Option<UserProfile>),
}

/// Map a raw storage change (key plus new value) to a store event.
///
/// Browser storage events and the in-memory store both go through this, so
/// cross-tab behavior is testable without a DOM. Keys other than the
/// session keys are ignored.
pub fn classify_change(key: &str, new_value: Option<&str>) -> Option<StoreEvent> {
    match key {
        ACCESS_TOKEN_KEY => Some(StoreEvent::AccessTokenChanged(
            new_value.map(str::to_owned),
        )),
        USER_DATA_KEY => {
            let user = new_value.and_then(|raw| serde_json::from_str(raw).ok());
            Some(StoreEvent::ProfileChanged(user))
        }
        _ => None,
    }
}

/// Assemble a session from per-key lookups.
///
/// Returns `None` unless both tokens are present; a malformed expiry or
/// profile degrades to `None` for that field rather than failing the read.
pub fn assemble(read_key: impl Fn(&str) -> Option<String>) -> Option<Session> {
    let access_token = read_key(ACCESS_TOKEN_KEY)?;
    let refresh_token = read_key(REFRESH_TOKEN_KEY)?;
    let expires_at_ms = read_key(TOKEN_EXPIRY_KEY).and_then(|raw| raw.parse().ok());
    let user = read_key(USER_DATA_KEY).and_then(|raw| serde_json::from_str(&raw).ok());
    Some(Session {
        access_token,
        refresh_token,
        expires_at_ms,
        user,
    })
}

/// Synchronous, durable persistence of session fields.
///
/// `read` never fails: absent or corrupt state reads as `None`. Writes are
/// sequential per-key; no other writer interleaves within one tab.
pub trait CredentialStore: Send + Sync {
    fn read(&self) -> Option<Session>;
    fn write(&self, session: &Session);
    /// Replace tokens and expiry from a fresh grant, keeping the stored
    /// profile. This is the refresh path.
    fn update_tokens(&self, grant: &TokenGrant, now_ms: i64);
    fn update_profile(&self, user: &UserProfile);
    fn clear(&self);
}

type Listener = Box<dyn Fn(&StoreEvent) + Send + Sync>;

/// In-memory credential store with the localStorage key layout.
///
/// Subscribers receive [`StoreEvent`]s on every effective change, playing
/// the role of the browser's storage events: sharing one instance between
/// two controllers models two same-origin tabs sharing localStorage.
#[derive(Default)]
pub struct MemoryCredentialStore {
    entries: Mutex<HashMap<String, String>>,
    listeners: Mutex<Vec<Listener>>,
}

impl MemoryCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&self, listener: impl Fn(&StoreEvent) + Send + Sync + 'static) {
        self.listeners
            .lock()
            .expect("listener lock poisoned")
            .push(Box::new(listener));
    }

    /// Raw value under a storage key, for tests asserting persisted shape.
    pub fn raw(&self, key: &str) -> Option<String> {
        self.entries
            .lock()
            .expect("entry lock poisoned")
            .get(key)
            .cloned()
    }

    fn set(&self, key: &str, value: String) {
        let previous = self
            .entries
            .lock()
            .expect("entry lock poisoned")
            .insert(key.to_owned(), value.clone());
        if previous.as_deref() != Some(value.as_str()) {
            self.publish(key, Some(&value));
        }
    }

    fn remove(&self, key: &str) {
        let previous = self
            .entries
            .lock()
            .expect("entry lock poisoned")
            .remove(key);
        if previous.is_some() {
            self.publish(key, None);
        }
    }

    fn publish(&self, key: &str, new_value: Option<&str>) {
        if let Some(event) = classify_change(key, new_value) {
            for listener in self.listeners.lock().expect("listener lock poisoned").iter() {
                listener(&event);
            }
        }
    }
}

impl CredentialStore for MemoryCredentialStore {
    fn read(&self) -> Option<Session> {
        assemble(|key| self.raw(key))
    }

    fn write(&self, session: &Session) {
        self.set(ACCESS_TOKEN_KEY, session.access_token.clone());
        self.set(REFRESH_TOKEN_KEY, session.refresh_token.clone());
        match session.expires_at_ms {
            Some(at) => self.set(TOKEN_EXPIRY_KEY, at.to_string()),
            None => self.remove(TOKEN_EXPIRY_KEY),
        }
        match &session.user {
            Some(user) => self.update_profile(user),
            None => self.remove(USER_DATA_KEY),
        }
    }

    fn update_tokens(&self, grant: &TokenGrant, now_ms: i64) {
        self.set(ACCESS_TOKEN_KEY, grant.access_token.clone());
        self.set(REFRESH_TOKEN_KEY, grant.refresh_token.clone());
        self.set(TOKEN_EXPIRY_KEY, (now_ms + grant.expires_in * 1000).to_string());
    }

    fn update_profile(&self, user: &UserProfile) {
        if let Ok(serialized) = serde_json::to_string(user) {
            self.set(USER_DATA_KEY, serialized);
        }
    }

    fn clear(&self) {
        self.remove(ACCESS_TOKEN_KEY);
        self.remove(REFRESH_TOKEN_KEY);
        self.remove(TOKEN_EXPIRY_KEY);
        self.remove(USER_DATA_KEY);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    fn profile() -> UserProfile {
        UserProfile {
            id: "u-1".into(),
            email: "seller@example.com".into(),
            first_name: "Ada".into(),
            last_name: "Seller".into(),
            role: Some("seller".into()),
        }
    }

    fn session() -> Session {
        Session {
            access_token: "access-1".into(),
            refresh_token: "refresh-1".into(),
            expires_at_ms: Some(1_723_000_000_000),
            user: Some(profile()),
        }
    }

    #[test]
    fn write_read_round_trip() {
        let store = MemoryCredentialStore::new();
        store.write(&session());
        assert_eq!(store.read(), Some(session()));
        assert_eq!(
            store.raw(TOKEN_EXPIRY_KEY).as_deref(),
            Some("1723000000000")
        );
    }

    #[test]
    fn read_requires_both_tokens() {
        let store = MemoryCredentialStore::new();
        store.set(ACCESS_TOKEN_KEY, "access-1".into());
        assert_eq!(store.read(), None);
    }

    #[test]
    fn corrupt_profile_degrades_to_none() {
        let store = MemoryCredentialStore::new();
        store.write(&session());
        store.set(USER_DATA_KEY, "{not json".into());
        let read = store.read().unwrap();
        assert_eq!(read.user, None);
        assert_eq!(read.access_token, "access-1");
    }

    #[test]
    fn clear_removes_every_key_from_any_state() {
        let store = MemoryCredentialStore::new();
        store.write(&session());
        store.clear();
        for key in [
            ACCESS_TOKEN_KEY,
            REFRESH_TOKEN_KEY,
            TOKEN_EXPIRY_KEY,
            USER_DATA_KEY,
        ] {
            assert_eq!(store.raw(key), None, "{key} should be gone");
        }
        // Clearing an already-empty store is a no-op, not an error.
        store.clear();
        assert_eq!(store.read(), None);
    }

    #[test]
    fn update_tokens_preserves_profile() {
        let store = MemoryCredentialStore::new();
        store.write(&session());
        let grant = TokenGrant {
            access_token: "access-2".into(),
            refresh_token: "refresh-2".into(),
            expires_in: 3600,
            token_type: "Bearer".into(),
        };
        store.update_tokens(&grant, 500);
        let read = store.read().unwrap();
        assert_eq!(read.access_token, "access-2");
        assert_eq!(read.expires_at_ms, Some(3_600_500));
        assert_eq!(read.user, Some(profile()));
    }

    #[test]
    fn logout_in_one_tab_is_observed_in_the_other() {
        let store = Arc::new(MemoryCredentialStore::new());
        store.write(&session());

        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = seen.clone();
        store.subscribe(move |event| sink.lock().unwrap().push(event.clone()));

        store.clear();
        let events = seen.lock().unwrap();
        assert!(events.contains(&StoreEvent::AccessTokenChanged(None)));
        assert!(events.contains(&StoreEvent::ProfileChanged(None)));
    }

    #[test]
    fn classify_ignores_unrelated_keys() {
        assert_eq!(classify_change("theme", Some("dark")), None);
        assert_eq!(
            classify_change(ACCESS_TOKEN_KEY, Some("tok")),
            Some(StoreEvent::AccessTokenChanged(Some("tok".into())))
        );
    }

    #[test]
    fn classify_parses_profile_payloads() {
        let raw = serde_json::to_string(&profile()).unwrap();
        assert_eq!(
            classify_change(USER_DATA_KEY, Some(&raw)),
            Some(StoreEvent::ProfileChanged(Some(profile())))
        );
        assert_eq!(
            classify_change(USER_DATA_KEY, None),
            Some(StoreEvent::ProfileChanged(None))
        );
    }
}
