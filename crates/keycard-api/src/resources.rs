//! Protected resources: `/zones/{zone_id}/resources`

use crate::client::{KeycardClient, segment};
use crate::error::Result;
use crate::nullable::Nullable;
use serde::{Deserialize, Serialize};

/// A protected system requiring authenticated access
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Resource {
    pub id: String,
    pub zone_id: String,
    pub name: String,
    pub identifier: String,
    #[serde(default)]
    pub description: Nullable<String>,
    /// Application serving this resource
    #[serde(default)]
    pub application_id: Nullable<String>,
    /// Provider issuing credentials for this resource
    #[serde(default)]
    pub credential_provider_id: Nullable<String>,
    #[serde(default)]
    pub scopes: Nullable<Vec<String>>,
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateResourceRequest {
    pub name: String,
    pub identifier: String,
    #[serde(skip_serializing_if = "Nullable::is_omitted")]
    pub description: Nullable<String>,
    #[serde(skip_serializing_if = "Nullable::is_omitted")]
    pub application_id: Nullable<String>,
    #[serde(skip_serializing_if = "Nullable::is_omitted")]
    pub credential_provider_id: Nullable<String>,
    #[serde(skip_serializing_if = "Nullable::is_omitted")]
    pub scopes: Nullable<Vec<String>>,
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateResourceRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub identifier: Option<String>,
    #[serde(skip_serializing_if = "Nullable::is_omitted")]
    pub description: Nullable<String>,
    #[serde(skip_serializing_if = "Nullable::is_omitted")]
    pub application_id: Nullable<String>,
    #[serde(skip_serializing_if = "Nullable::is_omitted")]
    pub credential_provider_id: Nullable<String>,
    #[serde(skip_serializing_if = "Nullable::is_omitted")]
    pub scopes: Nullable<Vec<String>>,
}

impl KeycardClient {
    pub async fn create_resource(&self, zone_id: &str, request: &CreateResourceRequest) -> Result<Resource> {
        self.post(&format!("/zones/{}/resources", segment(zone_id)), request)
            .await
    }

    pub async fn get_resource(&self, zone_id: &str, resource_id: &str) -> Result<Resource> {
        self.get(&format!("/zones/{}/resources/{}", segment(zone_id), segment(resource_id)))
            .await
    }

    pub async fn update_resource(
        &self,
        zone_id: &str,
        resource_id: &str,
        request: &UpdateResourceRequest,
    ) -> Result<Resource> {
        self.patch(&format!("/zones/{}/resources/{}", segment(zone_id), segment(resource_id)), request)
            .await
    }

    pub async fn delete_resource(&self, zone_id: &str, resource_id: &str) -> Result<()> {
        self.delete(&format!("/zones/{}/resources/{}", segment(zone_id), segment(resource_id)))
            .await
    }
}
