//! `keycard_application`: a client application registered in a zone

use crate::error::Result;
use crate::import::ImportPattern;
use crate::reconcile::{diff_field, diff_required, from_wire, required, to_wire};
use crate::resource::{ClientSlot, ProviderData, ReadOutcome, Resource, deleted, found};
use crate::schema::{Attribute, Schema};
use crate::value::Value;
use async_trait::async_trait;
use keycard_api::{
    Application, ApplicationMetadata, CreateApplicationRequest, Nullable, UpdateApplicationRequest,
};
use serde::{Deserialize, Serialize};

pub const TYPE_NAME: &str = "keycard_application";
const IMPORT_PATTERN: &str = "zones/{zone_id}/applications/{id}";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ApplicationModel {
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
    pub docs_url: Value<String>,
    #[serde(default, skip_serializing_if = "Value::is_unknown")]
    pub redirect_uris: Value<Vec<String>>,
}

impl ApplicationModel {
    pub(crate) fn from_application(application: Application) -> Self {
        let docs_url = match application.metadata {
            Nullable::Present(metadata) => from_wire(metadata.docs_url),
            Nullable::Null => Value::Null,
            Nullable::Omitted => Value::Unknown,
        };
        Self {
            id: Value::Known(application.id),
            zone_id: Value::Known(application.zone_id),
            name: Value::Known(application.name),
            identifier: Value::Known(application.identifier),
            description: from_wire(application.description),
            docs_url,
            redirect_uris: from_wire(application.redirect_uris),
        }
    }
}

fn metadata(docs_url: Nullable<String>) -> Nullable<ApplicationMetadata> {
    if docs_url.is_omitted() {
        Nullable::Omitted
    } else {
        Nullable::Present(ApplicationMetadata { docs_url })
    }
}

pub fn schema() -> Schema {
    Schema::new("An application that obtains credentials from a zone")
        .attribute(Attribute::computed("id", "Application ID"))
        .attribute(Attribute::required("zone_id", "Zone the application belongs to").requires_replace())
        .attribute(Attribute::required("name", "Display name"))
        .attribute(Attribute::required("identifier", "Unique identifier, usually a URL"))
        .attribute(Attribute::optional("description", "Free-form description"))
        .attribute(Attribute::optional("docs_url", "Documentation URL"))
        .attribute(Attribute::optional("redirect_uris", "Allowed OAuth2 redirect URIs"))
}

#[derive(Debug, Default)]
pub struct ApplicationResource {
    slot: ClientSlot,
}

impl ApplicationResource {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Resource for ApplicationResource {
    type Model = ApplicationModel;

    fn type_name(&self) -> &'static str {
        TYPE_NAME
    }

    fn schema(&self) -> Schema {
        schema()
    }

    fn configure(&mut self, data: Option<ProviderData>) {
        self.slot.configure(data);
    }

    async fn create(&self, plan: ApplicationModel) -> Result<ApplicationModel> {
        let data = self.slot.get(TYPE_NAME)?;
        let zone_id = required(&plan.zone_id, "zone_id")?;
        let request = CreateApplicationRequest {
            name: required(&plan.name, "name")?,
            identifier: required(&plan.identifier, "identifier")?,
            description: to_wire(&plan.description),
            metadata: metadata(to_wire(&plan.docs_url)),
            redirect_uris: to_wire(&plan.redirect_uris),
        };

        let application = data.client.create_application(&zone_id, &request).await?;
        tracing::info!(id = %application.id, zone_id = %zone_id, "Created application");
        Ok(ApplicationModel::from_application(application))
    }

    async fn read(&self, state: ApplicationModel) -> Result<ReadOutcome<ApplicationModel>> {
        let data = self.slot.get(TYPE_NAME)?;
        let zone_id = required(&state.zone_id, "zone_id")?;
        let id = required(&state.id, "id")?;
        let result = data.client.get_application(&zone_id, &id).await;
        Ok(match found(TYPE_NAME, &id, result)? {
            Some(application) => ReadOutcome::Found(ApplicationModel::from_application(application)),
            None => ReadOutcome::Removed,
        })
    }

    async fn update(&self, plan: ApplicationModel, state: ApplicationModel) -> Result<ApplicationModel> {
        let data = self.slot.get(TYPE_NAME)?;
        let zone_id = required(&state.zone_id, "zone_id")?;
        let id = required(&state.id, "id")?;
        let request = UpdateApplicationRequest {
            name: diff_required(&plan.name, &state.name),
            identifier: diff_required(&plan.identifier, &state.identifier),
            description: diff_field(&plan.description, &state.description),
            metadata: metadata(diff_field(&plan.docs_url, &state.docs_url)),
            redirect_uris: diff_field(&plan.redirect_uris, &state.redirect_uris),
        };

        let application = data
            .client
            .update_application(&zone_id, &id, &request)
            .await?;
        tracing::info!(id = %application.id, "Updated application");
        Ok(ApplicationModel::from_application(application))
    }

    async fn delete(&self, state: ApplicationModel) -> Result<()> {
        let data = self.slot.get(TYPE_NAME)?;
        let zone_id = required(&state.zone_id, "zone_id")?;
        let id = required(&state.id, "id")?;
        deleted(
            TYPE_NAME,
            &id,
            data.client.delete_application(&zone_id, &id).await,
        )
    }

    fn import_state(&self, id: &str) -> Result<ApplicationModel> {
        let parts = ImportPattern::new(IMPORT_PATTERN).parse(id)?;
        Ok(ApplicationModel {
            id: Value::Known(parts.get("id")),
            zone_id: Value::Known(parts.get("zone_id")),
            ..ApplicationModel::default()
        })
    }
}
