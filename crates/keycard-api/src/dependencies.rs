//! Application dependencies: resources an application may request access to

use crate::client::{KeycardClient, segment};
use crate::error::Result;
use crate::nullable::Nullable;
use serde::Deserialize;

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationDependency {
    pub application_id: String,
    pub resource_id: String,
    #[serde(default)]
    pub created_at: Nullable<String>,
}

fn dependency_path(zone_id: &str, application_id: &str, resource_id: &str) -> String {
    format!(
        "/zones/{}/applications/{}/dependencies/{}",
        segment(zone_id),
        segment(application_id),
        segment(resource_id)
    )
}

impl KeycardClient {
    /// Link `resource_id` to `application_id`; linking twice is a no-op on the server
    pub async fn add_application_dependency(
        &self,
        zone_id: &str,
        application_id: &str,
        resource_id: &str,
    ) -> Result<ApplicationDependency> {
        self.put(
            &dependency_path(zone_id, application_id, resource_id),
            &serde_json::json!({}),
        )
        .await
    }

    pub async fn get_application_dependency(
        &self,
        zone_id: &str,
        application_id: &str,
        resource_id: &str,
    ) -> Result<ApplicationDependency> {
        self.get(&dependency_path(zone_id, application_id, resource_id))
            .await
    }

    pub async fn remove_application_dependency(
        &self,
        zone_id: &str,
        application_id: &str,
        resource_id: &str,
    ) -> Result<()> {
        self.delete(&dependency_path(zone_id, application_id, resource_id))
            .await
    }
}
