//! Integration tests for the session controller

use serde_json::{json, Value};
use shopdeck_core::{
    store, CredentialStore, ManualClock, MemoryCredentialStore, Session, StoreEvent, UserProfile,
};
use shopdeck_http::types::LoginRequest;
use shopdeck_http::{ApiClient, SessionController, SessionError};
use std::sync::{Arc, Mutex};
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const NOW_MS: i64 = 1_700_000_000_000;

fn profile() -> UserProfile {
    UserProfile {
        id: "u-1".into(),
        email: "seller@example.com".into(),
        first_name: "Ada".into(),
        last_name: "Seller".into(),
        role: Some("seller".into()),
    }
}

fn stored_session(expires_at_ms: i64) -> Session {
    Session {
        access_token: "access-1".into(),
        refresh_token: "refresh-1".into(),
        expires_at_ms: Some(expires_at_ms),
        user: Some(profile()),
    }
}

fn grant_body(access: &str, refresh: &str) -> Value {
    json!({
        "success": true,
        "tokenData": {
            "accessToken": access,
            "refreshToken": refresh,
            "expiresIn": 3600,
            "tokenType": "Bearer"
        }
    })
}

fn controller_for(uri: &str, store: &Arc<MemoryCredentialStore>) -> SessionController {
    let client = ApiClient::builder()
        .base_url(uri)
        .credential_store(store.clone() as Arc<dyn CredentialStore>)
        .clock(Arc::new(ManualClock::new(NOW_MS)))
        .build()
        .unwrap();
    SessionController::new(client)
}

#[tokio::test]
async fn login_persists_grant_and_profile_together() {
    let mock_server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/auth/login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "message": "Welcome back!",
            "userData": {
                "id": "u-1",
                "email": "seller@example.com",
                "firstName": "Ada",
                "lastName": "Seller",
                "role": "seller"
            },
            "tokenData": {
                "accessToken": "access-1",
                "refreshToken": "refresh-1",
                "expiresIn": 3600,
                "tokenType": "Bearer"
            }
        })))
        .mount(&mock_server)
        .await;

    let credentials = Arc::new(MemoryCredentialStore::new());
    let controller = controller_for(&mock_server.uri(), &credentials);

    let session = controller
        .login(&LoginRequest {
            email: "seller@example.com".into(),
            password: "Str0ng!pass".into(),
        })
        .await
        .unwrap();

    assert_eq!(session.user, Some(profile()));
    // tokenExpiry is the issue time plus expiresIn, in milliseconds.
    assert_eq!(
        credentials.raw(store::TOKEN_EXPIRY_KEY).as_deref(),
        Some((NOW_MS + 3_600_000).to_string().as_str())
    );
    assert!(credentials.raw(store::ACCESS_TOKEN_KEY).is_some());
    assert!(credentials.raw(store::REFRESH_TOKEN_KEY).is_some());
    assert!(credentials.raw(store::USER_DATA_KEY).is_some());
}

#[tokio::test]
async fn a_success_false_login_is_rejected_with_the_server_message() {
    let mock_server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/auth/login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": false,
            "message": "Invalid credentials"
        })))
        .mount(&mock_server)
        .await;

    let credentials = Arc::new(MemoryCredentialStore::new());
    let controller = controller_for(&mock_server.uri(), &credentials);

    let err = controller
        .login(&LoginRequest {
            email: "seller@example.com".into(),
            password: "wrong".into(),
        })
        .await
        .unwrap_err();
    match err {
        SessionError::Rejected(message) => assert_eq!(message, "Invalid credentials"),
        other => panic!("unexpected error: {other:?}"),
    }
    assert_eq!(credentials.read(), None);
}

#[tokio::test]
async fn logout_clears_every_key_regardless_of_prior_state() {
    let credentials = Arc::new(MemoryCredentialStore::new());
    credentials.write(&stored_session(NOW_MS + 3_600_000));
    let controller = controller_for("http://127.0.0.1:9", &credentials);

    controller.logout();
    for key in [
        store::ACCESS_TOKEN_KEY,
        store::REFRESH_TOKEN_KEY,
        store::TOKEN_EXPIRY_KEY,
        store::USER_DATA_KEY,
    ] {
        assert_eq!(credentials.raw(key), None, "{key} should be gone");
    }

    // Logging out twice stays clean.
    controller.logout();
    assert_eq!(credentials.read(), None);
}

#[tokio::test]
async fn initialize_without_a_stored_session_is_unauthenticated() {
    let credentials = Arc::new(MemoryCredentialStore::new());
    let controller = controller_for("http://127.0.0.1:9", &credentials);
    assert_eq!(controller.initialize().await, None);
}

#[tokio::test]
async fn initialize_refreshes_an_expired_session_and_later_calls_use_the_new_token() {
    let mock_server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/auth/refresh"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(grant_body("access-2", "refresh-2")),
        )
        .expect(1)
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/images/list"))
        .and(header("authorization", "Bearer access-2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "images": [],
            "totalCount": 0
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let credentials = Arc::new(MemoryCredentialStore::new());
    credentials.write(&stored_session(NOW_MS - 1_000));
    let controller = controller_for(&mock_server.uri(), &credentials);

    let session = controller.initialize().await.unwrap();
    assert_eq!(session.access_token, "access-2");

    controller.client().list_images(1, 20).await.unwrap();
}

#[tokio::test]
async fn initialize_ends_the_session_when_refresh_is_rejected() {
    let mock_server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/auth/refresh"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "message": "refresh token has expired"
        })))
        .mount(&mock_server)
        .await;

    let credentials = Arc::new(MemoryCredentialStore::new());
    credentials.write(&stored_session(NOW_MS - 1_000));
    let controller = controller_for(&mock_server.uri(), &credentials);

    assert_eq!(controller.initialize().await, None);
    assert_eq!(credentials.read(), None);
}

#[tokio::test]
async fn initialize_keeps_the_session_through_a_transient_refresh_failure() {
    let mock_server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/auth/refresh"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&mock_server)
        .await;

    let credentials = Arc::new(MemoryCredentialStore::new());
    credentials.write(&stored_session(NOW_MS - 1_000));
    let controller = controller_for(&mock_server.uri(), &credentials);

    let session = controller.initialize().await.unwrap();
    assert_eq!(session.access_token, "access-1");
    assert!(credentials.read().is_some());
}

#[tokio::test]
async fn initialize_accepts_a_valid_unexpired_token() {
    let mock_server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/auth/validate"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "valid": true })))
        .expect(1)
        .mount(&mock_server)
        .await;
    Mock::given(method("POST"))
        .and(path("/auth/refresh"))
        .respond_with(ResponseTemplate::new(200).set_body_json(grant_body("x", "y")))
        .expect(0)
        .mount(&mock_server)
        .await;

    let credentials = Arc::new(MemoryCredentialStore::new());
    credentials.write(&stored_session(NOW_MS + 3_600_000));
    let controller = controller_for(&mock_server.uri(), &credentials);

    let session = controller.initialize().await.unwrap();
    assert_eq!(session.access_token, "access-1");
}

#[tokio::test]
async fn initialize_falls_back_to_refresh_when_the_token_is_invalid() {
    let mock_server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/auth/validate"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "valid": false })))
        .mount(&mock_server)
        .await;
    Mock::given(method("POST"))
        .and(path("/auth/refresh"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&mock_server)
        .await;

    let credentials = Arc::new(MemoryCredentialStore::new());
    credentials.write(&stored_session(NOW_MS + 3_600_000));
    let controller = controller_for(&mock_server.uri(), &credentials);

    assert_eq!(controller.initialize().await, None);
    assert_eq!(credentials.read(), None);
}

#[tokio::test]
async fn initialize_is_optimistic_when_validation_is_unreachable() {
    // Nothing is listening here; validation fails at the transport layer.
    let credentials = Arc::new(MemoryCredentialStore::new());
    credentials.write(&stored_session(NOW_MS + 3_600_000));
    let controller = controller_for("http://127.0.0.1:9", &credentials);

    let session = controller.initialize().await.unwrap();
    assert_eq!(session.access_token, "access-1");
    assert!(credentials.read().is_some());
}

#[tokio::test]
async fn refresh_if_needed_is_a_noop_outside_the_threshold_window() {
    let mock_server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/auth/refresh"))
        .respond_with(ResponseTemplate::new(200).set_body_json(grant_body("x", "y")))
        .expect(0)
        .mount(&mock_server)
        .await;

    let credentials = Arc::new(MemoryCredentialStore::new());
    credentials.write(&stored_session(NOW_MS + 3_600_000));
    let controller = controller_for(&mock_server.uri(), &credentials);

    controller.refresh_if_needed(5 * 60 * 1000).await.unwrap();
    assert_eq!(
        credentials.read().unwrap().access_token,
        "access-1",
        "token must be untouched outside the window"
    );
}

#[tokio::test]
async fn refresh_if_needed_refreshes_inside_the_threshold_window() {
    let mock_server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/auth/refresh"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(grant_body("access-2", "refresh-2")),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    let credentials = Arc::new(MemoryCredentialStore::new());
    // Two minutes to expiry, five-minute threshold.
    credentials.write(&stored_session(NOW_MS + 2 * 60 * 1000));
    let controller = controller_for(&mock_server.uri(), &credentials);

    controller.refresh_if_needed(5 * 60 * 1000).await.unwrap();
    assert_eq!(credentials.read().unwrap().access_token, "access-2");
}

#[tokio::test]
async fn terminal_background_refresh_ends_the_session() {
    let mock_server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/auth/refresh"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "message": "refresh token has expired"
        })))
        .mount(&mock_server)
        .await;

    let credentials = Arc::new(MemoryCredentialStore::new());
    credentials.write(&stored_session(NOW_MS + 1_000));
    let controller = controller_for(&mock_server.uri(), &credentials);

    let err = controller.refresh_if_needed(5 * 60 * 1000).await.unwrap_err();
    assert!(matches!(err, SessionError::Expired));
    assert_eq!(credentials.read(), None);
}

#[tokio::test]
async fn transient_background_refresh_preserves_the_session() {
    let mock_server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/auth/refresh"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&mock_server)
        .await;

    let credentials = Arc::new(MemoryCredentialStore::new());
    credentials.write(&stored_session(NOW_MS + 1_000));
    let controller = controller_for(&mock_server.uri(), &credentials);

    let err = controller.refresh_if_needed(5 * 60 * 1000).await.unwrap_err();
    assert!(matches!(err, SessionError::Transient(_)));
    assert_eq!(
        credentials.read(),
        Some(stored_session(NOW_MS + 1_000)),
        "a connectivity blip must not log the user out"
    );
}

#[tokio::test]
async fn validate_reports_the_server_verdict() {
    let mock_server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/auth/validate"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "valid": false })))
        .mount(&mock_server)
        .await;

    let credentials = Arc::new(MemoryCredentialStore::new());
    credentials.write(&stored_session(NOW_MS + 3_600_000));
    let controller = controller_for(&mock_server.uri(), &credentials);
    assert!(!controller.validate().await.unwrap());

    // Without a stored session there is nothing to validate.
    controller.logout();
    assert!(!controller.validate().await.unwrap());
}

#[tokio::test]
async fn logout_in_one_tab_reaches_the_other_through_store_events() {
    // Two controllers sharing one store stand in for two same-origin tabs
    // sharing localStorage.
    let credentials = Arc::new(MemoryCredentialStore::new());
    credentials.write(&stored_session(NOW_MS + 3_600_000));

    let tab_a = controller_for("http://127.0.0.1:9", &credentials);
    let tab_b_store = credentials.clone();

    let observed = Arc::new(Mutex::new(Vec::new()));
    let sink = observed.clone();
    credentials.subscribe(move |event| sink.lock().unwrap().push(event.clone()));

    tab_a.logout();

    assert_eq!(tab_b_store.read(), None);
    assert!(observed
        .lock()
        .unwrap()
        .contains(&StoreEvent::AccessTokenChanged(None)));
}
