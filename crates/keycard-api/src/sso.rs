//! Organization SSO connection: `/organizations/{organization_id}/sso-connection`
//!
//! An organization has at most one SSO connection.

use crate::client::{KeycardClient, segment};
use crate::error::Result;
use crate::nullable::Nullable;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SsoConnection {
    pub id: String,
    /// Issuer URL of the upstream identity provider
    pub identifier: String,
    #[serde(default)]
    pub client_id: Nullable<String>,
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateSsoConnectionRequest {
    pub identifier: String,
    #[serde(skip_serializing_if = "Nullable::is_omitted")]
    pub client_id: Nullable<String>,
    #[serde(skip_serializing_if = "Nullable::is_omitted")]
    pub client_secret: Nullable<String>,
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateSsoConnectionRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub identifier: Option<String>,
    #[serde(skip_serializing_if = "Nullable::is_omitted")]
    pub client_id: Nullable<String>,
    #[serde(skip_serializing_if = "Nullable::is_omitted")]
    pub client_secret: Nullable<String>,
}

impl KeycardClient {
    pub async fn create_sso_connection(
        &self,
        organization_id: &str,
        request: &CreateSsoConnectionRequest,
    ) -> Result<SsoConnection> {
        self.post(
            &format!("/organizations/{}/sso-connection", segment(organization_id)),
            request,
        )
        .await
    }

    pub async fn get_sso_connection(&self, organization_id: &str) -> Result<SsoConnection> {
        self.get(&format!("/organizations/{}/sso-connection", segment(organization_id)))
            .await
    }

    pub async fn update_sso_connection(
        &self,
        organization_id: &str,
        request: &UpdateSsoConnectionRequest,
    ) -> Result<SsoConnection> {
        self.patch(
            &format!("/organizations/{}/sso-connection", segment(organization_id)),
            request,
        )
        .await
    }

    pub async fn delete_sso_connection(&self, organization_id: &str) -> Result<()> {
        self.delete(&format!("/organizations/{}/sso-connection", segment(organization_id)))
            .await
    }
}
