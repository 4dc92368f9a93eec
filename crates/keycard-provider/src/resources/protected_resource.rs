//! `keycard_resource`: a protected resource (API) applications get access to

use crate::error::Result;
use crate::import::ImportPattern;
use crate::reconcile::{diff_field, diff_required, from_wire, required, to_wire};
use crate::resource::{ClientSlot, ProviderData, ReadOutcome, Resource, deleted, found};
use crate::schema::{Attribute, Schema};
use crate::value::Value;
use async_trait::async_trait;
use keycard_api::{CreateResourceRequest, Resource as ApiResource, UpdateResourceRequest};
use serde::{Deserialize, Serialize};

pub const TYPE_NAME: &str = "keycard_resource";
const IMPORT_PATTERN: &str = "zones/{zone_id}/resources/{id}";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResourceModel {
    #[serde(default, skip_serializing_if = "Value::is_unknown")]
    pub id: Value<String>,
    #[serde(default, skip_serializing_if = "Value::is_unknown")]
    pub zone_id: Value<String>,
    #[serde(default, skip_serializing_if = "Value::is_unknown")]
    pub name: Value<String>,
    #[serde(default, skip_serializing_if = "Value::is_unknown")]
    pub identifier: Value<String>,
    #[serde(default, skip_serializing_if = "Value::is_unknown")]
    pub description: Value<String>,
    #[serde(default, skip_serializing_if = "Value::is_unknown")]
    pub application_id: Value<String>,
    #[serde(default, skip_serializing_if = "Value::is_unknown")]
    pub credential_provider_id: Value<String>,
    #[serde(default, skip_serializing_if = "Value::is_unknown")]
    pub scopes: Value<Vec<String>>,
}

impl ResourceModel {
    pub(crate) fn from_resource(resource: ApiResource) -> Self {
        Self {
            id: Value::Known(resource.id),
            zone_id: Value::Known(resource.zone_id),
            name: Value::Known(resource.name),
            identifier: Value::Known(resource.identifier),
            description: from_wire(resource.description),
            application_id: from_wire(resource.application_id),
            credential_provider_id: from_wire(resource.credential_provider_id),
            scopes: from_wire(resource.scopes),
        }
    }
}

pub fn schema() -> Schema {
    Schema::new("A protected resource, such as an API, guarded by a zone")
        .attribute(Attribute::computed("id", "Resource ID"))
        .attribute(Attribute::required("zone_id", "Zone the resource belongs to").requires_replace())
        .attribute(Attribute::required("name", "Display name"))
        .attribute(Attribute::required("identifier", "Audience identifier, usually a URL"))
        .attribute(Attribute::optional("description", "Free-form description"))
        .attribute(Attribute::optional("application_id", "Application that serves the resource"))
        .attribute(Attribute::optional(
            "credential_provider_id",
            "Identity provider that issues credentials for the resource",
        ))
        .attribute(Attribute::optional("scopes", "OAuth2 scopes of the resource"))
}

#[derive(Debug, Default)]
pub struct ProtectedResource {
    slot: ClientSlot,
}

impl ProtectedResource {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Resource for ProtectedResource {
    type Model = ResourceModel;

    fn type_name(&self) -> &'static str {
        TYPE_NAME
    }

    fn schema(&self) -> Schema {
        schema()
    }

    fn configure(&mut self, data: Option<ProviderData>) {
        self.slot.configure(data);
    }

    async fn create(&self, plan: ResourceModel) -> Result<ResourceModel> {
        let data = self.slot.get(TYPE_NAME)?;
        let zone_id = required(&plan.zone_id, "zone_id")?;
        let request = CreateResourceRequest {
            name: required(&plan.name, "name")?,
            identifier: required(&plan.identifier, "identifier")?,
            description: to_wire(&plan.description),
            application_id: to_wire(&plan.application_id),
            credential_provider_id: to_wire(&plan.credential_provider_id),
            scopes: to_wire(&plan.scopes),
        };

        let resource = data.client.create_resource(&zone_id, &request).await?;
        tracing::info!(id = %resource.id, zone_id = %zone_id, "Created resource");
        Ok(ResourceModel::from_resource(resource))
    }

    async fn read(&self, state: ResourceModel) -> Result<ReadOutcome<ResourceModel>> {
        let data = self.slot.get(TYPE_NAME)?;
        let zone_id = required(&state.zone_id, "zone_id")?;
        let id = required(&state.id, "id")?;
        let result = data.client.get_resource(&zone_id, &id).await;
        Ok(match found(TYPE_NAME, &id, result)? {
            Some(resource) => ReadOutcome::Found(ResourceModel::from_resource(resource)),
            None => ReadOutcome::Removed,
        })
    }

    async fn update(&self, plan: ResourceModel, state: ResourceModel) -> Result<ResourceModel> {
        let data = self.slot.get(TYPE_NAME)?;
        let zone_id = required(&state.zone_id, "zone_id")?;
        let id = required(&state.id, "id")?;
        let request = UpdateResourceRequest {
            name: diff_required(&plan.name, &state.name),
            identifier: diff_required(&plan.identifier, &state.identifier),
            description: diff_field(&plan.description, &state.description),
            application_id: diff_field(&plan.application_id, &state.application_id),
            credential_provider_id: diff_field(
                &plan.credential_provider_id,
                &state.credential_provider_id,
            ),
            scopes: diff_field(&plan.scopes, &state.scopes),
        };

        let resource = data.client.update_resource(&zone_id, &id, &request).await?;
        tracing::info!(id = %resource.id, "Updated resource");
        Ok(ResourceModel::from_resource(resource))
    }

    async fn delete(&self, state: ResourceModel) -> Result<()> {
        let data = self.slot.get(TYPE_NAME)?;
        let zone_id = required(&state.zone_id, "zone_id")?;
        let id = required(&state.id, "id")?;
        deleted(
            TYPE_NAME,
            &id,
            data.client.delete_resource(&zone_id, &id).await,
        )
    }

    fn import_state(&self, id: &str) -> Result<ResourceModel> {
        let parts = ImportPattern::new(IMPORT_PATTERN).parse(id)?;
        Ok(ResourceModel {
            id: Value::Known(parts.get("id")),
            zone_id: Value::Known(parts.get("zone_id")),
            ..ResourceModel::default()
        })
    }
}
