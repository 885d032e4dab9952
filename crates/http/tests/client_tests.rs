//! Integration tests for the Shopdeck HTTP client

use serde_json::{json, Value};
use shopdeck_core::{
    CredentialStore, ManualClock, MemoryCredentialStore, Session, UserProfile,
};
use shopdeck_http::client::images::UploadImage;
use shopdeck_http::types::{
    ChatContext, ChatMessageRequest, ChatRole, ChatTurn, SeoAnalysisRequest, SeoAnalysisType,
    SeoImageSource, SeoProductInfo,
};
use shopdeck_http::{ApiClient, ApiError, MarketplaceApiClient, RefreshError};
use std::sync::Arc;
use wiremock::matchers::{body_partial_json, header, method, path, query_param};
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

fn new_grant_body() -> Value {
    json!({
        "success": true,
        "tokenData": {
            "accessToken": "access-2",
            "refreshToken": "refresh-2",
            "expiresIn": 3600,
            "tokenType": "Bearer"
        }
    })
}

fn client_for(uri: &str, store: &Arc<MemoryCredentialStore>) -> ApiClient {
    ApiClient::builder()
        .base_url(uri)
        .credential_store(store.clone() as Arc<dyn CredentialStore>)
        .clock(Arc::new(ManualClock::new(NOW_MS)))
        .build()
        .unwrap()
}

#[tokio::test]
async fn builder_requires_base_url_and_store() {
    let no_base = ApiClient::builder()
        .credential_store(Arc::new(MemoryCredentialStore::new()))
        .build();
    assert!(matches!(no_base, Err(ApiError::Configuration(_))));

    let no_store = ApiClient::builder().base_url("http://localhost:8080").build();
    assert!(matches!(no_store, Err(ApiError::Configuration(_))));
}

#[tokio::test]
async fn request_without_session_omits_authorization_entirely() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/images/list"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "images": [],
            "totalCount": 0
        })))
        .mount(&mock_server)
        .await;

    let store = Arc::new(MemoryCredentialStore::new());
    let client = client_for(&mock_server.uri(), &store);
    client.list_images(1, 20).await.unwrap();

    let requests = mock_server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);
    assert!(
        !requests[0].headers.contains_key("authorization"),
        "no token must mean no Authorization header, not a Bearer placeholder"
    );
}

#[tokio::test]
async fn bearer_token_is_attached_when_a_session_exists() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/images/list"))
        .and(header("authorization", "Bearer access-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "images": [],
            "totalCount": 0
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let store = Arc::new(MemoryCredentialStore::new());
    store.write(&stored_session(NOW_MS + 3_600_000));
    let client = client_for(&mock_server.uri(), &store);
    client.list_images(1, 20).await.unwrap();
}

#[tokio::test]
async fn a_401_triggers_one_refresh_and_one_retry_with_the_new_token() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/images/list"))
        .and(header("authorization", "Bearer access-1"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "message": "token expired"
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("POST"))
        .and(path("/auth/refresh"))
        .and(body_partial_json(json!({ "refreshToken": "refresh-1" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(new_grant_body()))
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

    let store = Arc::new(MemoryCredentialStore::new());
    store.write(&stored_session(NOW_MS + 3_600_000));
    let client = client_for(&mock_server.uri(), &store);

    client.list_images(1, 20).await.unwrap();

    let refreshed = store.read().unwrap();
    assert_eq!(refreshed.access_token, "access-2");
    assert_eq!(refreshed.refresh_token, "refresh-2");
    assert_eq!(refreshed.expires_at_ms, Some(NOW_MS + 3_600_000));
    // The profile survives a token-only update.
    assert_eq!(refreshed.user, Some(profile()));
}

#[tokio::test]
async fn concurrent_401s_share_a_single_refresh_call() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/images/list"))
        .and(header("authorization", "Bearer access-1"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&mock_server)
        .await;

    Mock::given(method("POST"))
        .and(path("/auth/refresh"))
        .respond_with(ResponseTemplate::new(200).set_body_json(new_grant_body()))
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
        .mount(&mock_server)
        .await;

    let store = Arc::new(MemoryCredentialStore::new());
    store.write(&stored_session(NOW_MS + 3_600_000));
    let client = client_for(&mock_server.uri(), &store);

    let calls = (0..5).map(|_| client.list_images(1, 20));
    let results = futures::future::join_all(calls).await;
    for result in results {
        result.unwrap();
    }
}

#[tokio::test]
async fn rejected_refresh_surfaces_the_original_401_and_keeps_tokens() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/images/list"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "message": "token expired"
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    // The refresh endpoint rejecting must not itself be retried.
    Mock::given(method("POST"))
        .and(path("/auth/refresh"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "message": "refresh token has expired"
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let store = Arc::new(MemoryCredentialStore::new());
    store.write(&stored_session(NOW_MS + 3_600_000));
    let client = client_for(&mock_server.uri(), &store);

    let err = client.list_images(1, 20).await.unwrap_err();
    assert!(err.is_unauthorized());
    // Clearing the session is the controller's decision, not the client's.
    assert_eq!(store.read(), Some(stored_session(NOW_MS + 3_600_000)));
}

#[tokio::test]
async fn transient_refresh_failure_preserves_the_session() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/images/list"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&mock_server)
        .await;

    Mock::given(method("POST"))
        .and(path("/auth/refresh"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&mock_server)
        .await;

    let store = Arc::new(MemoryCredentialStore::new());
    store.write(&stored_session(NOW_MS + 3_600_000));
    let client = client_for(&mock_server.uri(), &store);

    let err = client.list_images(1, 20).await.unwrap_err();
    assert_eq!(err.status(), Some(401));
    assert_eq!(store.read(), Some(stored_session(NOW_MS + 3_600_000)));
}

#[tokio::test]
async fn force_refresh_classifies_failure_causes() {
    let mock_server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/auth/refresh"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "message": "refresh token has expired"
        })))
        .mount(&mock_server)
        .await;

    // No stored session at all: terminal before any network call.
    let empty_store = Arc::new(MemoryCredentialStore::new());
    let client = client_for(&mock_server.uri(), &empty_store);
    assert_eq!(
        client.force_refresh().await,
        Err(RefreshError::MissingRefreshToken)
    );

    // A stored session, but the server rejects the exchange.
    let store = Arc::new(MemoryCredentialStore::new());
    store.write(&stored_session(NOW_MS));
    let client = client_for(&mock_server.uri(), &store);
    match client.force_refresh().await {
        Err(RefreshError::Rejected(message)) => {
            assert!(message.contains("refresh token has expired"));
        }
        other => panic!("expected rejection, got {other:?}"),
    }
}

#[tokio::test]
async fn a_success_body_without_token_data_is_terminal() {
    let mock_server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/auth/refresh"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "success": false })))
        .mount(&mock_server)
        .await;

    let store = Arc::new(MemoryCredentialStore::new());
    store.write(&stored_session(NOW_MS));
    let client = client_for(&mock_server.uri(), &store);

    assert!(matches!(
        client.force_refresh().await,
        Err(RefreshError::Rejected(_))
    ));
}

#[tokio::test]
async fn structured_error_bodies_reach_the_caller() {
    let mock_server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/auth/register"))
        .respond_with(ResponseTemplate::new(422).set_body_json(json!({
            "message": "Validation failed",
            "errors": [
                { "field": "email", "message": "Email is already registered" }
            ]
        })))
        .mount(&mock_server)
        .await;

    let store = Arc::new(MemoryCredentialStore::new());
    let client = client_for(&mock_server.uri(), &store);
    let request = shopdeck_http::types::RegisterRequest {
        email: "seller@example.com".into(),
        password: "Str0ng!pass".into(),
        first_name: "Ada".into(),
        last_name: "Seller".into(),
    };

    match client.register(&request).await.unwrap_err() {
        ApiError::Http {
            status,
            message,
            field_errors,
        } => {
            assert_eq!(status, 422);
            assert_eq!(message, "Validation failed");
            assert_eq!(field_errors[0].field, "email");
            assert_eq!(field_errors[0].message, "Email is already registered");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn image_upload_goes_up_as_multipart() {
    let mock_server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/images/upload"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "message": "uploaded",
            "originalImage": {
                "key": "img/u-1/photo.jpg",
                "url": "https://bucket.example.com/img/u-1/photo.jpg",
                "userId": "u-1",
                "imageType": "original",
                "fileName": "photo.jpg",
                "contentType": "image/jpeg",
                "size": 3,
                "uploadedAt": "2026-08-07T12:00:00Z",
                "etag": "abc"
            },
            "cloudFrontUrl": "https://cdn.example.com/img/u-1/photo.jpg"
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let store = Arc::new(MemoryCredentialStore::new());
    store.write(&stored_session(NOW_MS + 3_600_000));
    let client = client_for(&mock_server.uri(), &store);

    let upload = UploadImage {
        file_name: "photo.jpg".into(),
        content_type: "image/jpeg".into(),
        bytes: vec![1, 2, 3],
        tags: vec!["shoes".into()],
    };
    let response = client.upload_image(&upload).await.unwrap();
    assert_eq!(response.cloud_front_url, "https://cdn.example.com/img/u-1/photo.jpg");
    assert!(response.enhanced_image.is_none());

    let requests = mock_server.received_requests().await.unwrap();
    let content_type = requests[0]
        .headers
        .get("content-type")
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default();
    assert!(
        content_type.starts_with("multipart/form-data"),
        "expected multipart content type, got {content_type}"
    );
}

#[tokio::test]
async fn delete_endpoints_tolerate_empty_bodies() {
    let mock_server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/user/marketplace-credentials/cred-1"))
        .respond_with(ResponseTemplate::new(204))
        .mount(&mock_server)
        .await;

    let store = Arc::new(MemoryCredentialStore::new());
    store.write(&stored_session(NOW_MS + 3_600_000));
    let client = client_for(&mock_server.uri(), &store);

    client.delete_marketplace_credential("cred-1").await.unwrap();
}

#[tokio::test]
async fn credentials_list_degrades_to_empty_on_failure() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/user/marketplace-credentials"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&mock_server)
        .await;

    let store = Arc::new(MemoryCredentialStore::new());
    store.write(&stored_session(NOW_MS + 3_600_000));
    let client = client_for(&mock_server.uri(), &store);

    assert_eq!(client.marketplace_credentials().await.unwrap(), vec![]);
}

#[tokio::test]
async fn profile_lookup_passes_the_user_id_as_a_query_param() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/auth/profile"))
        .and(query_param("userId", "u-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "userData": {
                "id": "u-1",
                "email": "seller@example.com",
                "firstName": "Ada",
                "lastName": "Seller",
                "role": "seller"
            }
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let store = Arc::new(MemoryCredentialStore::new());
    store.write(&stored_session(NOW_MS + 3_600_000));
    let client = client_for(&mock_server.uri(), &store);

    let response = client.profile("u-1").await.unwrap();
    assert_eq!(response.user_data, Some(profile()));
}

#[tokio::test]
async fn chat_turns_carry_conversation_context() {
    let mock_server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/message"))
        .and(body_partial_json(json!({
            "message": "Write a title for red sneakers",
            "conversationId": "conv-1",
            "context": {
                "previousMessages": [
                    { "role": "user", "content": "hi" },
                    { "role": "assistant", "content": "hello" }
                ]
            }
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "response": "Bold Red Runners",
            "conversationId": "conv-1",
            "messageId": "msg-9",
            "timestamp": "2026-08-07T12:00:00Z"
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let store = Arc::new(MemoryCredentialStore::new());
    store.write(&stored_session(NOW_MS + 3_600_000));
    let client = client_for(&mock_server.uri(), &store);

    let request = ChatMessageRequest {
        message: "Write a title for red sneakers".into(),
        conversation_id: Some("conv-1".into()),
        context: Some(ChatContext {
            previous_messages: Some(vec![
                ChatTurn {
                    role: ChatRole::User,
                    content: "hi".into(),
                },
                ChatTurn {
                    role: ChatRole::Assistant,
                    content: "hello".into(),
                },
            ]),
            ..ChatContext::default()
        }),
    };
    let response = client.send_chat_message(&request).await.unwrap();
    assert_eq!(response.response, "Bold Red Runners");
    assert_eq!(response.conversation_id.as_deref(), Some("conv-1"));
}

#[tokio::test]
async fn seo_analysis_mixes_file_parts_and_url_fields() {
    let mock_server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/seo"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "message": "analyzed",
            "analysis": {
                "overallScore": 82.5,
                "imageAnalysis": [],
                "seoRecommendations": {
                    "titleSuggestions": ["Bold Red Runners"],
                    "descriptionSuggestions": [],
                    "keywordRecommendations": ["sneakers"],
                    "categoryOptimization": [],
                    "pricingInsights": {
                        "suggestedPriceRange": { "min": 39.0, "max": 59.0 },
                        "competitiveAnalysis": [],
                        "marketPositioning": "mid-range"
                    }
                },
                "marketplaceOptimization": []
            },
            "processingTime": 1.8,
            "analysisId": "an-1"
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let store = Arc::new(MemoryCredentialStore::new());
    store.write(&stored_session(NOW_MS + 3_600_000));
    let client = client_for(&mock_server.uri(), &store);

    let request = SeoAnalysisRequest {
        images: vec![
            SeoImageSource::File {
                file_name: "photo.jpg".into(),
                content_type: "image/jpeg".into(),
                bytes: vec![1, 2, 3],
            },
            SeoImageSource::Url("https://cdn.example.com/img/u-1/other.jpg".into()),
        ],
        product_info: Some(SeoProductInfo {
            title: Some("Red sneakers".into()),
            price: Some(49.0),
            ..SeoProductInfo::default()
        }),
        target_marketplaces: Some(vec!["mockmarket".into()]),
        analysis_type: SeoAnalysisType::Detailed,
    };
    let response = client.analyze_seo(&request).await.unwrap();
    assert_eq!(response.analysis.overall_score, 82.5);
    assert_eq!(
        response.analysis.seo_recommendations.title_suggestions,
        vec!["Bold Red Runners"]
    );
}

#[tokio::test]
async fn marketplace_client_uses_the_stored_credential_key() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/Product/my-products"))
        .and(header("authorization", "Bearer mk-key-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "data": [{
                "id": "p-1",
                "title": "Red sneakers",
                "description": "Bold red runners",
                "price": 49.0,
                "categoryId": "c-1",
                "stock": 12,
                "isActive": true
            }]
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let marketplace = MarketplaceApiClient::new(mock_server.uri(), "mk-key-1").unwrap();
    let response = marketplace.my_products().await.unwrap();
    assert_eq!(response.data.len(), 1);
    assert_eq!(response.data[0].display_name(), "Red sneakers");
}

#[tokio::test]
async fn marketplace_client_refuses_an_empty_key() {
    let err = MarketplaceApiClient::new("http://localhost:8080", "  ").unwrap_err();
    assert!(matches!(err, ApiError::Configuration(_)));
    assert!(err.user_message().contains("Settings"));
}

#[tokio::test]
async fn health_probe_skips_the_api_prefix() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/health"))
        .respond_with(ResponseTemplate::new(200).set_body_string("OK"))
        .mount(&mock_server)
        .await;

    let store = Arc::new(MemoryCredentialStore::new());
    let client = client_for(&format!("{}/api/v1", mock_server.uri()), &store);
    assert_eq!(client.health().await.unwrap(), "OK");
}
