use keycard_api::{KeycardClient, StaticToken};
use keycard_provider::{ProviderData, Resource};
use std::sync::Arc;
use wiremock::MockServer;

/// Client data pointing at `server`, for organization `org-1`
pub fn provider_data(server: &MockServer) -> ProviderData {
    let client = KeycardClient::builder(Arc::new(StaticToken::new("test-token")))
        .endpoint(server.uri())
        .build()
        .unwrap();
    ProviderData {
        client: Arc::new(client),
        organization_id: "org-1".to_string(),
    }
}

/// A handler configured against `server`
pub fn configured<R: Resource>(mut resource: R, server: &MockServer) -> R {
    resource.configure(Some(provider_data(server)));
    resource
}
