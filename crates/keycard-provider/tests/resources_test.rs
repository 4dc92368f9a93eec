mod common;

use common::configured;
use keycard_provider::resources::{
    ApplicationModel, ApplicationResource, DependencyModel, DependencyResource, ProtectedResource,
    ResourceModel, SsoConnectionModel, SsoConnectionResource, TokenCredentialModel,
    TokenCredentialResource, UrlCredentialModel, UrlCredentialResource,
};
use keycard_provider::{KeycardProvider, ReadOutcome, Resource, Value};
use serde_json::json;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn mount_delete_twice(server: &MockServer, route: &str) {
    Mock::given(method("DELETE"))
        .and(path(route))
        .respond_with(ResponseTemplate::new(204))
        .up_to_n_times(1)
        .expect(1)
        .mount(server)
        .await;
    Mock::given(method("DELETE"))
        .and(path(route))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_application_create_and_clear_docs_url() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/zones/z1/applications"))
        .and(body_json(json!({
            "name": "App",
            "identifier": "https://app.example.com",
            "metadata": { "docsUrl": "https://docs.example.com" },
            "redirectUris": ["https://app.example.com/cb"]
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "id": "a1",
            "zoneId": "z1",
            "name": "App",
            "identifier": "https://app.example.com",
            "metadata": { "docsUrl": "https://docs.example.com" },
            "redirectUris": ["https://app.example.com/cb"]
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("PATCH"))
        .and(path("/zones/z1/applications/a1"))
        .and(body_json(json!({ "metadata": { "docsUrl": null } })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "a1",
            "zoneId": "z1",
            "name": "App",
            "identifier": "https://app.example.com",
            "metadata": { "docsUrl": null },
            "redirectUris": ["https://app.example.com/cb"]
        })))
        .expect(1)
        .mount(&server)
        .await;
    mount_delete_twice(&server, "/zones/z1/applications/a1").await;

    let resource = configured(ApplicationResource::new(), &server);
    let created = resource
        .create(ApplicationModel {
            zone_id: Value::from("z1"),
            name: Value::from("App"),
            identifier: Value::from("https://app.example.com"),
            docs_url: Value::from("https://docs.example.com"),
            redirect_uris: Value::Known(vec!["https://app.example.com/cb".to_string()]),
            ..ApplicationModel::default()
        })
        .await
        .unwrap();
    assert_eq!(created.id.as_str(), Some("a1"));
    assert_eq!(created.docs_url.as_str(), Some("https://docs.example.com"));

    let plan = ApplicationModel {
        docs_url: Value::Null,
        ..created.clone()
    };
    let updated = resource.update(plan, created.clone()).await.unwrap();
    assert!(updated.docs_url.is_null());

    resource.delete(updated.clone()).await.unwrap();
    resource.delete(updated).await.unwrap();
}

#[tokio::test]
async fn test_resource_update_sends_only_changed_fields() {
    let server = MockServer::start().await;
    Mock::given(method("PATCH"))
        .and(path("/zones/z1/resources/r1"))
        .and(body_json(json!({
            "description": null,
            "scopes": ["read", "write"]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "r1",
            "zoneId": "z1",
            "name": "API",
            "identifier": "https://api.example.com",
            "description": null,
            "applicationId": "a1",
            "scopes": ["read", "write"]
        })))
        .expect(1)
        .mount(&server)
        .await;
    mount_delete_twice(&server, "/zones/z1/resources/r1").await;

    let state = ResourceModel {
        id: Value::from("r1"),
        zone_id: Value::from("z1"),
        name: Value::from("API"),
        identifier: Value::from("https://api.example.com"),
        description: Value::from("Public API"),
        application_id: Value::from("a1"),
        credential_provider_id: Value::Null,
        scopes: Value::Known(vec!["read".to_string()]),
    };
    let plan = ResourceModel {
        description: Value::Null,
        scopes: Value::Known(vec!["read".to_string(), "write".to_string()]),
        ..state.clone()
    };

    let resource = configured(ProtectedResource::new(), &server);
    let updated = resource.update(plan, state).await.unwrap();
    assert!(updated.description.is_null());
    assert_eq!(updated.application_id.as_str(), Some("a1"));
    assert!(updated.credential_provider_id.is_unknown());

    resource.delete(updated.clone()).await.unwrap();
    resource.delete(updated).await.unwrap();
}

#[tokio::test]
async fn test_sso_connection_secret_sent_only_when_changed() {
    let server = MockServer::start().await;
    let connection = |client_id: &str| {
        json!({
            "id": "sso-1",
            "identifier": "https://idp.example.com",
            "clientId": client_id
        })
    };
    Mock::given(method("POST"))
        .and(path("/organizations/org-1/sso-connection"))
        .and(body_json(json!({
            "identifier": "https://idp.example.com",
            "clientId": "cid",
            "clientSecret": "s1"
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(connection("cid")))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("PATCH"))
        .and(path("/organizations/org-1/sso-connection"))
        .and(body_json(json!({ "clientId": "cid-2" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(connection("cid-2")))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("PATCH"))
        .and(path("/organizations/org-1/sso-connection"))
        .and(body_json(json!({ "clientSecret": "s2" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(connection("cid-2")))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/organizations/org-1/sso-connection"))
        .respond_with(ResponseTemplate::new(200).set_body_json(connection("cid-2")))
        .mount(&server)
        .await;
    mount_delete_twice(&server, "/organizations/org-1/sso-connection").await;

    let resource = configured(SsoConnectionResource::new(), &server);
    let created = resource
        .create(SsoConnectionModel {
            identifier: Value::from("https://idp.example.com"),
            client_id: Value::from("cid"),
            client_secret: Value::from("s1"),
            ..SsoConnectionModel::default()
        })
        .await
        .unwrap();
    assert_eq!(created.organization_id.as_str(), Some("org-1"));
    assert_eq!(created.client_secret.as_str(), Some("s1"));

    let renamed = resource
        .update(
            SsoConnectionModel {
                client_id: Value::from("cid-2"),
                ..created.clone()
            },
            created,
        )
        .await
        .unwrap();
    assert_eq!(renamed.client_secret.as_str(), Some("s1"));

    let rotated = resource
        .update(
            SsoConnectionModel {
                client_secret: Value::from("s2"),
                ..renamed.clone()
            },
            renamed,
        )
        .await
        .unwrap();
    assert_eq!(rotated.client_secret.as_str(), Some("s2"));

    let ReadOutcome::Found(read) = resource.read(rotated).await.unwrap() else {
        panic!("connection should exist");
    };
    assert_eq!(read.client_secret.as_str(), Some("s2"));
    assert_eq!(read.client_id.as_str(), Some("cid-2"));

    resource.delete(read.clone()).await.unwrap();
    resource.delete(read).await.unwrap();
}

#[tokio::test]
async fn test_dependency_paths() {
    let server = MockServer::start().await;
    let route = "/zones/z1/applications/a1/dependencies/r1";
    let dependency = json!({
        "applicationId": "a1",
        "resourceId": "r1",
        "createdAt": "2026-01-05T10:00:00Z"
    });
    Mock::given(method("PUT"))
        .and(path(route))
        .and(body_json(json!({})))
        .respond_with(ResponseTemplate::new(200).set_body_json(dependency.clone()))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(ResponseTemplate::new(200).set_body_json(dependency))
        .expect(1)
        .mount(&server)
        .await;
    mount_delete_twice(&server, route).await;

    let resource = configured(DependencyResource::new(), &server);
    let created = resource
        .create(DependencyModel {
            zone_id: Value::from("z1"),
            application_id: Value::from("a1"),
            resource_id: Value::from("r1"),
            ..DependencyModel::default()
        })
        .await
        .unwrap();
    assert_eq!(created.id.as_str(), Some("a1/r1"));
    assert_eq!(created.created_at.as_str(), Some("2026-01-05T10:00:00Z"));

    let ReadOutcome::Found(read) = resource.read(created.clone()).await.unwrap() else {
        panic!("dependency should exist");
    };
    assert_eq!(read, created);

    resource.delete(read.clone()).await.unwrap();
    resource.delete(read).await.unwrap();
}

#[tokio::test]
async fn test_url_and_token_credential_bodies() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/zones/z1/application-credentials"))
        .and(body_json(json!({
            "applicationId": "a1",
            "type": "url",
            "url": "https://app.example.com/.well-known/keycard"
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "id": "c2",
            "zoneId": "z1",
            "applicationId": "a1",
            "type": "url",
            "url": "https://app.example.com/.well-known/keycard"
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/zones/z1/application-credentials"))
        .and(body_json(json!({
            "applicationId": "a1",
            "type": "token",
            "providerId": "p1",
            "subject": "svc-account"
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "id": "c3",
            "zoneId": "z1",
            "applicationId": "a1",
            "type": "token",
            "providerId": "p1",
            "subject": "svc-account"
        })))
        .expect(1)
        .mount(&server)
        .await;
    mount_delete_twice(&server, "/zones/z1/application-credentials/c3").await;

    let url = configured(UrlCredentialResource::new(), &server)
        .create(UrlCredentialModel {
            zone_id: Value::from("z1"),
            application_id: Value::from("a1"),
            url: Value::from("https://app.example.com/.well-known/keycard"),
            ..UrlCredentialModel::default()
        })
        .await
        .unwrap();
    assert_eq!(url.id.as_str(), Some("c2"));

    let tokens = configured(TokenCredentialResource::new(), &server);
    let token = tokens
        .create(TokenCredentialModel {
            zone_id: Value::from("z1"),
            application_id: Value::from("a1"),
            provider_id: Value::from("p1"),
            subject: Value::from("svc-account"),
            ..TokenCredentialModel::default()
        })
        .await
        .unwrap();
    assert_eq!(token.id.as_str(), Some("c3"));
    assert_eq!(token.subject.as_str(), Some("svc-account"));

    tokens.delete(token.clone()).await.unwrap();
    tokens.delete(token).await.unwrap();
}

#[tokio::test]
async fn test_credential_of_other_variant_rejected() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/zones/z1/application-credentials/c1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "c1",
            "zoneId": "z1",
            "applicationId": "a1",
            "type": "password",
            "identifier": "user-1"
        })))
        .mount(&server)
        .await;

    let mut provider = KeycardProvider::new();
    provider.configure(Some(common::provider_data(&server)));
    let mut state = keycard_provider::GlobalState::new();
    let err = provider
        .import(
            "keycard_application_url_credential",
            "cred",
            "zones/z1/application-credentials/c1",
            &mut state,
        )
        .await
        .unwrap_err();
    assert!(err.to_string().contains("password credential"));
    assert!(state.resources.is_empty());
}
