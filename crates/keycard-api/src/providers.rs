//! Identity providers: `/zones/{zone_id}/providers`

use crate::client::{KeycardClient, segment};
use crate::error::Result;
use crate::nullable::Nullable;
use serde::{Deserialize, Serialize};

/// An external or built-in identity/credential source.
///
/// `clientSecret` is write-only and never returned.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Provider {
    pub id: String,
    pub zone_id: String,
    pub name: String,
    pub identifier: String,
    #[serde(default)]
    pub description: Nullable<String>,
    #[serde(default)]
    pub client_id: Nullable<String>,
    #[serde(default)]
    pub authorization_endpoint: Nullable<String>,
    #[serde(default)]
    pub token_endpoint: Nullable<String>,
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateProviderRequest {
    pub name: String,
    pub identifier: String,
    #[serde(skip_serializing_if = "Nullable::is_omitted")]
    pub description: Nullable<String>,
    #[serde(skip_serializing_if = "Nullable::is_omitted")]
    pub client_id: Nullable<String>,
    #[serde(skip_serializing_if = "Nullable::is_omitted")]
    pub client_secret: Nullable<String>,
    #[serde(skip_serializing_if = "Nullable::is_omitted")]
    pub authorization_endpoint: Nullable<String>,
    #[serde(skip_serializing_if = "Nullable::is_omitted")]
    pub token_endpoint: Nullable<String>,
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProviderRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub identifier: Option<String>,
    #[serde(skip_serializing_if = "Nullable::is_omitted")]
    pub description: Nullable<String>,
    #[serde(skip_serializing_if = "Nullable::is_omitted")]
    pub client_id: Nullable<String>,
    #[serde(skip_serializing_if = "Nullable::is_omitted")]
    pub client_secret: Nullable<String>,
    #[serde(skip_serializing_if = "Nullable::is_omitted")]
    pub authorization_endpoint: Nullable<String>,
    #[serde(skip_serializing_if = "Nullable::is_omitted")]
    pub token_endpoint: Nullable<String>,
}

impl KeycardClient {
    pub async fn create_provider(&self, zone_id: &str, request: &CreateProviderRequest) -> Result<Provider> {
        self.post(&format!("/zones/{}/providers", segment(zone_id)), request)
            .await
    }

    pub async fn get_provider(&self, zone_id: &str, provider_id: &str) -> Result<Provider> {
        self.get(&format!("/zones/{}/providers/{}", segment(zone_id), segment(provider_id)))
            .await
    }

    pub async fn update_provider(
        &self,
        zone_id: &str,
        provider_id: &str,
        request: &UpdateProviderRequest,
    ) -> Result<Provider> {
        self.patch(&format!("/zones/{}/providers/{}", segment(zone_id), segment(provider_id)), request)
            .await
    }

    pub async fn delete_provider(&self, zone_id: &str, provider_id: &str) -> Result<()> {
        self.delete(&format!("/zones/{}/providers/{}", segment(zone_id), segment(provider_id)))
            .await
    }
}
