use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use keycard_api::claims::{self, ClaimError};
use keycard_api::{
    ApiError, ClientCredentials, CreateZoneRequest, KeycardClient, Nullable, RetryConfig,
    StaticToken, TokenError, TokenSource, UpdateApplicationRequest, http_client,
};
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use wiremock::matchers::{body_json, body_string_contains, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn fast_retry(max_attempts: u32) -> RetryConfig {
    RetryConfig {
        max_attempts,
        initial_delay: Duration::from_millis(5),
        max_delay: Duration::from_millis(20),
        backoff_multiplier: 2.0,
    }
}

fn jwt(payload: serde_json::Value) -> String {
    format!(
        "{}.{}.sig",
        URL_SAFE_NO_PAD.encode(r#"{"alg":"none"}"#),
        URL_SAFE_NO_PAD.encode(payload.to_string())
    )
}

fn credentials(server: &MockServer, retry: RetryConfig) -> ClientCredentials {
    let http = http_client(Duration::from_secs(2)).unwrap();
    ClientCredentials::new(
        http,
        ClientCredentials::token_url_for(&server.uri()),
        "client-id",
        "client-secret",
    )
    .with_retry(retry)
}

fn static_client(server: &MockServer) -> KeycardClient {
    KeycardClient::builder(Arc::new(StaticToken::new("test-token")))
        .endpoint(server.uri())
        .build()
        .unwrap()
}

#[tokio::test]
async fn test_client_credentials_token_is_cached() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/oauth/token"))
        .and(body_string_contains("grant_type=client_credentials"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "abc",
            "token_type": "Bearer",
            "expires_in": 3600
        })))
        .expect(1)
        .mount(&server)
        .await;

    let source = credentials(&server, RetryConfig::none());
    assert_eq!(source.token().await.unwrap(), "abc");
    assert_eq!(source.token().await.unwrap(), "abc");
}

#[tokio::test]
async fn test_token_acquisition_retries_server_errors() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/oauth/token"))
        .respond_with(ResponseTemplate::new(503))
        .up_to_n_times(2)
        .expect(2)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/oauth/token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "after-retry",
            "expires_in": 60
        })))
        .expect(1)
        .mount(&server)
        .await;

    let source = credentials(&server, fast_retry(3));
    assert_eq!(source.token().await.unwrap(), "after-retry");
}

#[tokio::test]
async fn test_token_acquisition_does_not_retry_invalid_credentials() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/oauth/token"))
        .respond_with(ResponseTemplate::new(401).set_body_string("invalid_client"))
        .expect(1)
        .mount(&server)
        .await;

    let source = credentials(&server, fast_retry(5));
    let err = source.token().await.unwrap_err();
    assert!(matches!(err, TokenError::Rejected { .. }));
    assert!(err.to_string().contains("invalid_client"));
}

#[tokio::test]
async fn test_api_calls_are_not_retried() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/organizations/org-1/zones/z1"))
        .respond_with(ResponseTemplate::new(503).set_body_string("unavailable"))
        .expect(1)
        .mount(&server)
        .await;

    let client = static_client(&server);
    let err = client.get_zone("org-1", "z1").await.unwrap_err();
    assert_eq!(err.status().map(|s| s.as_u16()), Some(503));
    assert!(err.to_string().contains("unavailable"));
}

#[tokio::test]
async fn test_bearer_token_and_create_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/organizations/org-1/zones"))
        .and(header("authorization", "Bearer test-token"))
        .and(body_json(json!({ "name": "prod", "description": null })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "id": "z1",
            "name": "prod",
            "description": null,
            "oauth2Issuer": "https://z1.keycard.cloud"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = static_client(&server);
    let zone = client
        .create_zone(
            "org-1",
            &CreateZoneRequest {
                name: "prod".to_string(),
                description: Nullable::Null,
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(zone.id, "z1");
    assert_eq!(zone.description, Nullable::Null);
}

#[tokio::test]
async fn test_patch_sends_only_set_fields() {
    let server = MockServer::start().await;
    Mock::given(method("PATCH"))
        .and(path("/zones/z1/applications/a1"))
        .and(body_json(json!({ "description": "" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "a1",
            "zoneId": "z1",
            "name": "app",
            "identifier": "https://app.example.com",
            "description": ""
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = static_client(&server);
    let app = client
        .update_application(
            "z1",
            "a1",
            &UpdateApplicationRequest {
                description: Nullable::Present(String::new()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(app.description, Nullable::Present(String::new()));
}

#[tokio::test]
async fn test_not_found_and_delete() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/zones/z1/resources/r1"))
        .respond_with(ResponseTemplate::new(204))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/zones/z1/resources/r1"))
        .respond_with(ResponseTemplate::new(404).set_body_string("not found"))
        .mount(&server)
        .await;

    let client = static_client(&server);
    client.delete_resource("z1", "r1").await.unwrap();
    let err = client.delete_resource("z1", "r1").await.unwrap_err();
    assert!(err.is_not_found());
}

#[tokio::test]
async fn test_missing_body_is_distinct_from_transport_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/zones/z1/providers/p1"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;

    let client = static_client(&server);
    let err = client.get_provider("z1", "p1").await.unwrap_err();
    assert!(matches!(err, ApiError::MissingBody));
}

#[tokio::test]
async fn test_organization_id_from_client_credentials() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/oauth/token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": jwt(json!({ "https://keycard.ai/claims/organization_id": "org-123" })),
            "expires_in": 3600
        })))
        .mount(&server)
        .await;

    let source = credentials(&server, RetryConfig::none());
    assert_eq!(claims::organization_id(&source).await.unwrap(), "org-123");
}

#[tokio::test]
async fn test_network_failure_is_token_retrieval_error() {
    let http = http_client(Duration::from_secs(1)).unwrap();
    // Nothing listens on port 1
    let source = ClientCredentials::new(http, "http://127.0.0.1:1/oauth/token", "id", "secret")
        .with_retry(RetryConfig::none());

    let err = claims::organization_id(&source).await.unwrap_err();
    assert!(matches!(
        err,
        ClaimError::TokenRetrieval(TokenError::Request(_))
    ));
    assert!(err.to_string().starts_with("failed to get access token"));
}

#[tokio::test]
async fn test_ids_are_percent_encoded_in_paths() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/zones/z1/applications/a%2Fb%3Fx"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/zones/z1/applications/b"))
        .respond_with(ResponseTemplate::new(204))
        .expect(0)
        .mount(&server)
        .await;

    let client = static_client(&server);
    let err = client.get_application("z1", "a/b?x").await.unwrap_err();
    assert!(err.is_not_found());
    client.delete_application("z1/applications", "b").await.unwrap_err();
}
