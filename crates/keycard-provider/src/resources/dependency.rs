//! `keycard_application_dependency`: grants an application access to a resource

use crate::error::{ProviderError, Result};
use crate::import::ImportPattern;
use crate::reconcile::{from_wire, required};
use crate::resource::{ClientSlot, ProviderData, ReadOutcome, Resource, deleted, found};
use crate::schema::{Attribute, Schema};
use crate::value::Value;
use async_trait::async_trait;
use keycard_api::ApplicationDependency;
use serde::{Deserialize, Serialize};

pub const TYPE_NAME: &str = "keycard_application_dependency";
const IMPORT_PATTERN: &str = "zones/{zone_id}/applications/{application_id}/dependencies/{resource_id}";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DependencyModel {
    /// `{application_id}/{resource_id}`
    #[serde(default, skip_serializing_if = "Value::is_unknown")]
    pub id: Value<String>,
    #[serde(default, skip_serializing_if = "Value::is_unknown")]
    pub zone_id: Value<String>,
    #[serde(default, skip_serializing_if = "Value::is_unknown")]
    pub application_id: Value<String>,
    #[serde(default, skip_serializing_if = "Value::is_unknown")]
    pub resource_id: Value<String>,
    #[serde(default, skip_serializing_if = "Value::is_unknown")]
    pub created_at: Value<String>,
}

impl DependencyModel {
    fn from_dependency(zone_id: String, dependency: ApplicationDependency) -> Self {
        Self {
            id: Value::Known(format!(
                "{}/{}",
                dependency.application_id, dependency.resource_id
            )),
            zone_id: Value::Known(zone_id),
            application_id: Value::Known(dependency.application_id),
            resource_id: Value::Known(dependency.resource_id),
            created_at: from_wire(dependency.created_at),
        }
    }

    fn keys(&self) -> Result<(String, String, String)> {
        Ok((
            required(&self.zone_id, "zone_id")?,
            required(&self.application_id, "application_id")?,
            required(&self.resource_id, "resource_id")?,
        ))
    }
}

pub fn schema() -> Schema {
    Schema::new("Allows an application to obtain credentials for a resource")
        .attribute(Attribute::computed("id", "Composite ID of application and resource"))
        .attribute(Attribute::required("zone_id", "Zone of the application").requires_replace())
        .attribute(Attribute::required("application_id", "Dependent application").requires_replace())
        .attribute(Attribute::required("resource_id", "Resource depended on").requires_replace())
        .attribute(Attribute::computed("created_at", "When the dependency was added"))
}

#[derive(Debug, Default)]
pub struct DependencyResource {
    slot: ClientSlot,
}

impl DependencyResource {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Resource for DependencyResource {
    type Model = DependencyModel;

    fn type_name(&self) -> &'static str {
        TYPE_NAME
    }

    fn schema(&self) -> Schema {
        schema()
    }

    fn configure(&mut self, data: Option<ProviderData>) {
        self.slot.configure(data);
    }

    async fn create(&self, plan: DependencyModel) -> Result<DependencyModel> {
        let data = self.slot.get(TYPE_NAME)?;
        let (zone_id, application_id, resource_id) = plan.keys()?;

        let dependency = data
            .client
            .add_application_dependency(&zone_id, &application_id, &resource_id)
            .await?;
        tracing::info!(%application_id, %resource_id, "Added application dependency");
        Ok(DependencyModel::from_dependency(zone_id, dependency))
    }

    async fn read(&self, state: DependencyModel) -> Result<ReadOutcome<DependencyModel>> {
        let data = self.slot.get(TYPE_NAME)?;
        let (zone_id, application_id, resource_id) = state.keys()?;
        let id = format!("{}/{}", application_id, resource_id);
        let result = data
            .client
            .get_application_dependency(&zone_id, &application_id, &resource_id)
            .await;
        Ok(match found(TYPE_NAME, &id, result)? {
            Some(dependency) => ReadOutcome::Found(DependencyModel::from_dependency(zone_id, dependency)),
            None => ReadOutcome::Removed,
        })
    }

    async fn update(&self, _plan: DependencyModel, _state: DependencyModel) -> Result<DependencyModel> {
        Err(ProviderError::Immutable(format!(
            "{} cannot be updated in place; it must be replaced",
            TYPE_NAME
        )))
    }

    async fn delete(&self, state: DependencyModel) -> Result<()> {
        let data = self.slot.get(TYPE_NAME)?;
        let (zone_id, application_id, resource_id) = state.keys()?;
        let id = format!("{}/{}", application_id, resource_id);
        deleted(
            TYPE_NAME,
            &id,
            data.client
                .remove_application_dependency(&zone_id, &application_id, &resource_id)
                .await,
        )
    }

    fn import_state(&self, id: &str) -> Result<DependencyModel> {
        let parts = ImportPattern::new(IMPORT_PATTERN).parse(id)?;
        let application_id = parts.get("application_id");
        let resource_id = parts.get("resource_id");
        Ok(DependencyModel {
            id: Value::Known(format!("{}/{}", application_id, resource_id)),
            zone_id: Value::Known(parts.get("zone_id")),
            application_id: Value::Known(application_id),
            resource_id: Value::Known(resource_id),
            created_at: Value::Unknown,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_import_builds_composite_id() {
        let model = DependencyResource::new()
            .import_state("zones/z1/applications/a1/dependencies/r1")
            .unwrap();
        assert_eq!(model.id.as_str(), Some("a1/r1"));
        assert_eq!(model.zone_id.as_str(), Some("z1"));
        assert_eq!(model.resource_id.as_str(), Some("r1"));
    }

    #[test]
    fn test_import_rejects_short_id() {
        let err = DependencyResource::new()
            .import_state("zones/z1/applications/a1")
            .unwrap_err();
        assert!(err.to_string().contains(IMPORT_PATTERN));
    }

    #[test]
    fn test_missing_key_reported() {
        let model = DependencyModel {
            zone_id: Value::from("z1"),
            application_id: Value::from("a1"),
            ..DependencyModel::default()
        };
        let err = model.keys().unwrap_err();
        assert!(matches!(err, ProviderError::MissingAttribute("resource_id")));
    }
}
