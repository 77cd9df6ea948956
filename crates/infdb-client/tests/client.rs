//! Integration tests for `WebhookClient` using wiremock HTTP mocks.

use infdb_client::{WebhookClient, WebhookError};
use infdb_core::{AudienceSize, PackageStatus, PackageType, Platform, SearchQuery};
use serde_json::json;
use wiremock::matchers::{body_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn test_client(base_url: &str) -> WebhookClient {
    WebhookClient::with_base_url(base_url, 5, "infdb-test/0.1")
        .expect("client construction should not fail")
}

fn fashion_query() -> SearchQuery {
    SearchQuery {
        platform: Platform::Instagram,
        size: AudienceSize::Micro,
        location: "us".to_string(),
        category: "Fashion".to_string(),
        avg_views: 2500,
        er: 0.8,
    }
}

fn offer_body(id: i64, free_package_used: bool) -> serde_json::Value {
    json!({
        "id": id,
        "filters": {
            "platform": "instagram",
            "size": "micro",
            "location": "us",
            "category": "Fashion",
            "avg_views": 2500,
            "er": 0.8
        },
        "total": 1200,
        "metadata": {},
        "created_at": "2025-08-01T10:00:00Z",
        "updated_at": "2025-08-02T11:00:00Z",
        "packages": [{
            "id": 3,
            "offer_id": id,
            "email": "buyer@example.com",
            "type": "free",
            "platform": "instagram",
            "limit": 5,
            "advanced_data": false,
            "status": "completed",
            "created_at": "2025-08-01T10:05:00Z",
            "updated_at": "2025-08-01T10:06:00Z"
        }],
        "free_package_used": free_package_used,
        "packages_total": 5
    })
}

// ---------------------------------------------------------------------------
// search
// ---------------------------------------------------------------------------

#[tokio::test]
async fn search_posts_backend_field_names_and_parses_result() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/webhook/search"))
        .and(body_json(json!({
            "platform": "instagram",
            "size": "micro",
            "location": "us",
            "category": "Fashion",
            "avg_views": 2500,
            "er": 0.8
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 77,
            "accounts": [
                {
                    "user_id": "u1",
                    "profile": {
                        "full_name": "Emma Johnson",
                        "username": "emmaj_lifestyle",
                        "picture": "https://cdn.example.com/emma.jpg",
                        "followers": 245000,
                        "engagement_percent": 1.8
                    }
                },
                {
                    "user_id": "u2",
                    "profile": {
                        "full_name": "Alex Chen",
                        "username": "alexchen_tech",
                        "picture": "https://cdn.example.com/alex.jpg",
                        "followers": 158000,
                        "engagement_percent": 2.1
                    }
                }
            ],
            "total": 12,
            "platform": "instagram"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let result = client
        .search(&fashion_query())
        .await
        .expect("search should succeed");

    assert_eq!(result.offer_id, Some(77));
    assert_eq!(result.total, 12);
    assert_eq!(result.platform, "instagram");
    assert_eq!(result.accounts.len(), 2);
    assert_eq!(result.accounts[0].full_name, "Emma Johnson");
    assert_eq!(result.accounts[1].follower_count, 158_000);
}

#[tokio::test]
async fn search_non_success_status_is_unexpected_status() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/webhook/search"))
        .respond_with(ResponseTemplate::new(502).set_body_string("bad gateway"))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let err = client.search(&fashion_query()).await.unwrap_err();

    assert!(
        matches!(err, WebhookError::UnexpectedStatus { status: 502, message: None, .. }),
        "got: {err:?}"
    );
}

#[tokio::test]
async fn search_garbage_body_is_deserialize_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/webhook/search"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let err = client.search(&fashion_query()).await.unwrap_err();
    assert!(matches!(err, WebhookError::Deserialize { .. }), "got: {err:?}");
}

#[tokio::test]
async fn search_transport_failure_is_http_error() {
    // Nothing listens on port 9 locally; the connect fails immediately.
    let client = test_client("http://127.0.0.1:9");
    let err = client.search(&fashion_query()).await.unwrap_err();
    assert!(err.is_transport(), "got: {err:?}");
}

// ---------------------------------------------------------------------------
// locations
// ---------------------------------------------------------------------------

#[tokio::test]
async fn locations_are_scoped_by_platform_and_cleaned() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/webhook/locations"))
        .and(query_param("platform", "youtube"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            "United States",
            " Canada ",
            "",
            "United States",
            42,
            "Brazil"
        ])))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let labels = client.locations(Platform::Youtube).await.unwrap();
    assert_eq!(labels, vec!["United States", "Canada", "Brazil"]);
}

#[tokio::test]
async fn locations_object_body_is_deserialize_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/webhook/locations"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"locations": []})))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let err = client.locations(Platform::Twitch).await.unwrap_err();
    assert!(matches!(err, WebhookError::Deserialize { .. }), "got: {err:?}");
}

// ---------------------------------------------------------------------------
// trial
// ---------------------------------------------------------------------------

#[tokio::test]
async fn trial_success_returns_ok() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/webhook/trial"))
        .and(body_json(json!({"offer_id": 77, "email": "foo@bar.com"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"success": true})))
        .expect(1)
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    client
        .request_trial(77, "foo@bar.com")
        .await
        .expect("trial should succeed");
}

#[tokio::test]
async fn trial_success_false_carries_server_message() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/webhook/trial"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": false,
            "error": "Free package already used for this offer"
        })))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let err = client.request_trial(77, "foo@bar.com").await.unwrap_err();
    assert_eq!(
        err.server_message(),
        Some("Free package already used for this offer")
    );
    assert!(err.to_string().contains("already used"));
}

#[tokio::test]
async fn trial_success_false_without_message() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/webhook/trial"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"success": false})))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let err = client.request_trial(77, "foo@bar.com").await.unwrap_err();
    assert!(matches!(err, WebhookError::Api(None)), "got: {err:?}");
    assert_eq!(err.server_message(), None);
}

#[tokio::test]
async fn trial_error_status_keeps_body_message() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/webhook/trial"))
        .respond_with(
            ResponseTemplate::new(400).set_body_json(json!({"error": "Invalid email domain"})),
        )
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let err = client.request_trial(77, "foo@bar.com").await.unwrap_err();
    assert!(
        matches!(err, WebhookError::UnexpectedStatus { status: 400, .. }),
        "got: {err:?}"
    );
    assert_eq!(err.server_message(), Some("Invalid email domain"));
}

// ---------------------------------------------------------------------------
// offer
// ---------------------------------------------------------------------------

#[tokio::test]
async fn get_offer_parses_packages_and_flags() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/webhook/offer"))
        .and(query_param("id", "77"))
        .respond_with(ResponseTemplate::new(200).set_body_json(offer_body(77, true)))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let offer = client.get_offer(77).await.expect("offer should parse");

    assert_eq!(offer.id, 77);
    assert_eq!(offer.total, 1200);
    assert!(offer.free_trial_used);
    assert!(offer.needs_more_packages());
    assert_eq!(offer.filters.category, "Fashion");
    assert_eq!(offer.packages.len(), 1);
    assert_eq!(offer.packages[0].package_type, PackageType::Free);
    assert_eq!(offer.packages[0].status, PackageStatus::Completed);
    assert_eq!(offer.packages[0].record_limit, 5);
    assert!(offer.sample.is_none(), "no accounts were embedded");
}

#[tokio::test]
async fn get_offer_404_is_not_found() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/webhook/offer"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let err = client.get_offer(999).await.unwrap_err();
    assert!(matches!(err, WebhookError::NotFound { .. }), "got: {err:?}");
}

#[tokio::test]
async fn get_offer_empty_body_is_not_found() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/webhook/offer"))
        .and(query_param("id", "5"))
        .respond_with(ResponseTemplate::new(200).set_body_string(""))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/webhook/offer"))
        .and(query_param("id", "6"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    assert!(matches!(
        client.get_offer(5).await,
        Err(WebhookError::NotFound { .. })
    ));
    assert!(matches!(
        client.get_offer(6).await,
        Err(WebhookError::NotFound { .. })
    ));
}

#[tokio::test]
async fn get_offer_with_embedded_accounts_builds_sample() {
    let server = MockServer::start().await;

    let mut body = offer_body(12, false);
    body["accounts"] = json!([
        {"user_id": "a", "profile": {"full_name": "A", "username": "a", "followers": 10}}
    ]);
    body["platform"] = json!("instagram");

    Mock::given(method("GET"))
        .and(path("/webhook/offer"))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let offer = client.get_offer(12).await.unwrap();
    let sample = offer.sample.expect("sample should be present");
    assert_eq!(sample.offer_id, Some(12));
    assert_eq!(sample.accounts.len(), 1);
    assert_eq!(sample.total, 1200);
}
