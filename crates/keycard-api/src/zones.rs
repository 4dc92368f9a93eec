//! Zones: `/organizations/{organization_id}/zones`

use crate::client::{KeycardClient, segment};
use crate::error::Result;
use crate::nullable::Nullable;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Zone {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: Nullable<String>,
    #[serde(default)]
    pub oauth2: Nullable<ZoneOAuth2>,
    #[serde(default)]
    pub encryption_key: Nullable<EncryptionKey>,
    #[serde(default)]
    pub oauth2_issuer: Nullable<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ZoneOAuth2 {
    #[serde(default, skip_serializing_if = "Nullable::is_omitted")]
    pub pkce_required: Nullable<bool>,
    #[serde(default, skip_serializing_if = "Nullable::is_omitted")]
    pub dcr_enabled: Nullable<bool>,
}

/// Customer-managed AWS KMS key protecting zone secrets
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EncryptionKey {
    pub arn: String,
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateZoneRequest {
    pub name: String,
    #[serde(skip_serializing_if = "Nullable::is_omitted")]
    pub description: Nullable<String>,
    #[serde(skip_serializing_if = "Nullable::is_omitted")]
    pub oauth2: Nullable<ZoneOAuth2>,
    #[serde(skip_serializing_if = "Nullable::is_omitted")]
    pub encryption_key: Nullable<EncryptionKey>,
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateZoneRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Nullable::is_omitted")]
    pub description: Nullable<String>,
    #[serde(skip_serializing_if = "Nullable::is_omitted")]
    pub oauth2: Nullable<ZoneOAuth2>,
    #[serde(skip_serializing_if = "Nullable::is_omitted")]
    pub encryption_key: Nullable<EncryptionKey>,
}

impl KeycardClient {
    pub async fn create_zone(&self, organization_id: &str, request: &CreateZoneRequest) -> Result<Zone> {
        self.post(&format!("/organizations/{}/zones", segment(organization_id)), request)
            .await
    }

    pub async fn get_zone(&self, organization_id: &str, zone_id: &str) -> Result<Zone> {
        self.get(&format!("/organizations/{}/zones/{}", segment(organization_id), segment(zone_id)))
            .await
    }

    pub async fn update_zone(
        &self,
        organization_id: &str,
        zone_id: &str,
        request: &UpdateZoneRequest,
    ) -> Result<Zone> {
        self.patch(
            &format!("/organizations/{}/zones/{}", segment(organization_id), segment(zone_id)),
            request,
        )
        .await
    }

    pub async fn delete_zone(&self, organization_id: &str, zone_id: &str) -> Result<()> {
        self.delete(&format!("/organizations/{}/zones/{}", segment(organization_id), segment(zone_id)))
            .await
    }
}
