//! Application credentials: `/zones/{zone_id}/application-credentials`
//!
//! Credentials are immutable; there is no update call.

use crate::client::{KeycardClient, segment};
use crate::error::Result;
use crate::nullable::Nullable;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationCredential {
    pub id: String,
    pub zone_id: String,
    pub application_id: String,
    #[serde(flatten)]
    pub kind: CredentialKind,
}

/// Credential variants as returned by the API
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CredentialKind {
    /// Client ID and secret; the secret is only returned by the create call
    #[serde(rename_all = "camelCase")]
    Password {
        identifier: String,
        #[serde(default)]
        password: Nullable<String>,
    },
    /// Application identified by a URL it controls
    #[serde(rename_all = "camelCase")]
    Url { url: String },
    /// Tokens issued by a provider for a fixed subject
    #[serde(rename_all = "camelCase")]
    Token { provider_id: String, subject: String },
}

impl CredentialKind {
    pub fn type_name(&self) -> &'static str {
        match self {
            CredentialKind::Password { .. } => "password",
            CredentialKind::Url { .. } => "url",
            CredentialKind::Token { .. } => "token",
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCredentialRequest {
    pub application_id: String,
    #[serde(flatten)]
    pub kind: NewCredential,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum NewCredential {
    Password,
    #[serde(rename_all = "camelCase")]
    Url { url: String },
    #[serde(rename_all = "camelCase")]
    Token { provider_id: String, subject: String },
}

impl KeycardClient {
    pub async fn create_application_credential(
        &self,
        zone_id: &str,
        request: &CreateCredentialRequest,
    ) -> Result<ApplicationCredential> {
        self.post(&format!("/zones/{}/application-credentials", segment(zone_id)), request)
            .await
    }

    pub async fn get_application_credential(
        &self,
        zone_id: &str,
        credential_id: &str,
    ) -> Result<ApplicationCredential> {
        self.get(&format!("/zones/{}/application-credentials/{}", segment(zone_id), segment(credential_id)))
        .await
    }

    pub async fn delete_application_credential(&self, zone_id: &str, credential_id: &str) -> Result<()> {
        self.delete(&format!("/zones/{}/application-credentials/{}", segment(zone_id), segment(credential_id)))
        .await
    }
}
