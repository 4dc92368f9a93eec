//! Applications: `/zones/{zone_id}/applications`

use crate::client::{KeycardClient, segment};
use crate::error::Result;
use crate::nullable::Nullable;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Application {
    pub id: String,
    pub zone_id: String,
    pub name: String,
    pub identifier: String,
    #[serde(default)]
    pub description: Nullable<String>,
    #[serde(default)]
    pub metadata: Nullable<ApplicationMetadata>,
    #[serde(default)]
    pub redirect_uris: Nullable<Vec<String>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationMetadata {
    #[serde(default, skip_serializing_if = "Nullable::is_omitted")]
    pub docs_url: Nullable<String>,
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateApplicationRequest {
    pub name: String,
    pub identifier: String,
    #[serde(skip_serializing_if = "Nullable::is_omitted")]
    pub description: Nullable<String>,
    #[serde(skip_serializing_if = "Nullable::is_omitted")]
    pub metadata: Nullable<ApplicationMetadata>,
    #[serde(skip_serializing_if = "Nullable::is_omitted")]
    pub redirect_uris: Nullable<Vec<String>>,
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateApplicationRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub identifier: Option<String>,
    #[serde(skip_serializing_if = "Nullable::is_omitted")]
    pub description: Nullable<String>,
    #[serde(skip_serializing_if = "Nullable::is_omitted")]
    pub metadata: Nullable<ApplicationMetadata>,
    #[serde(skip_serializing_if = "Nullable::is_omitted")]
    pub redirect_uris: Nullable<Vec<String>>,
}

impl KeycardClient {
    pub async fn create_application(
        &self,
        zone_id: &str,
        request: &CreateApplicationRequest,
    ) -> Result<Application> {
        self.post(&format!("/zones/{}/applications", segment(zone_id)), request)
            .await
    }

    pub async fn get_application(&self, zone_id: &str, application_id: &str) -> Result<Application> {
        self.get(&format!("/zones/{}/applications/{}", segment(zone_id), segment(application_id)))
            .await
    }

    pub async fn update_application(
        &self,
        zone_id: &str,
        application_id: &str,
        request: &UpdateApplicationRequest,
    ) -> Result<Application> {
        self.patch(
            &format!("/zones/{}/applications/{}", segment(zone_id), segment(application_id)),
            request,
        )
        .await
    }

    pub async fn delete_application(&self, zone_id: &str, application_id: &str) -> Result<()> {
        self.delete(&format!("/zones/{}/applications/{}", segment(zone_id), segment(application_id)))
            .await
    }
}
