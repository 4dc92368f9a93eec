//! `keycard_zone`: an isolated identity realm within the organization

use crate::error::Result;
use crate::import::ImportPattern;
use crate::reconcile::{diff_field, diff_required, from_wire, required, to_wire};
use crate::resource::{ClientSlot, ProviderData, ReadOutcome, Resource, deleted, found};
use crate::schema::{Attribute, Schema};
use crate::value::Value;
use async_trait::async_trait;
use keycard_api::{
    CreateZoneRequest, EncryptionKey, Nullable, UpdateZoneRequest, Zone, ZoneOAuth2,
};
use serde::{Deserialize, Serialize};

pub const TYPE_NAME: &str = "keycard_zone";
const IMPORT_PATTERN: &str = "zones/{zone_id}";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ZoneModel {
    #[serde(default, skip_serializing_if = "Value::is_unknown")]
    pub id: Value<String>,
    #[serde(default, skip_serializing_if = "Value::is_unknown")]
    pub name: Value<String>,
    #[serde(default, skip_serializing_if = "Value::is_unknown")]
    pub description: Value<String>,
    #[serde(default, skip_serializing_if = "Value::is_unknown")]
    pub oauth2_pkce_required: Value<bool>,
    #[serde(default, skip_serializing_if = "Value::is_unknown")]
    pub oauth2_dcr_enabled: Value<bool>,
    #[serde(default, skip_serializing_if = "Value::is_unknown")]
    pub encryption_key_arn: Value<String>,
    #[serde(default, skip_serializing_if = "Value::is_unknown")]
    pub oauth2_issuer: Value<String>,
}

impl ZoneModel {
    pub(crate) fn from_zone(zone: Zone) -> Self {
        let (oauth2_pkce_required, oauth2_dcr_enabled) = match zone.oauth2 {
            Nullable::Present(oauth2) => (from_wire(oauth2.pkce_required), from_wire(oauth2.dcr_enabled)),
            Nullable::Null => (Value::Null, Value::Null),
            Nullable::Omitted => (Value::Unknown, Value::Unknown),
        };
        Self {
            id: Value::Known(zone.id),
            name: Value::Known(zone.name),
            description: from_wire(zone.description),
            oauth2_pkce_required,
            oauth2_dcr_enabled,
            encryption_key_arn: from_wire(zone.encryption_key.map(|key| key.arn)),
            oauth2_issuer: from_wire(zone.oauth2_issuer),
        }
    }
}

fn oauth2_block(pkce_required: Nullable<bool>, dcr_enabled: Nullable<bool>) -> Nullable<ZoneOAuth2> {
    if pkce_required.is_omitted() && dcr_enabled.is_omitted() {
        Nullable::Omitted
    } else {
        Nullable::Present(ZoneOAuth2 {
            pkce_required,
            dcr_enabled,
        })
    }
}

pub fn schema() -> Schema {
    Schema::new("An isolated realm of applications, resources and identity providers")
        .attribute(Attribute::computed("id", "Zone ID"))
        .attribute(Attribute::required("name", "Display name"))
        .attribute(Attribute::optional("description", "Free-form description"))
        .attribute(Attribute::optional_computed(
            "oauth2_pkce_required",
            "Require PKCE for authorization code flows",
        ))
        .attribute(Attribute::optional_computed(
            "oauth2_dcr_enabled",
            "Allow dynamic client registration",
        ))
        .attribute(Attribute::optional(
            "encryption_key_arn",
            "ARN of a customer-managed AWS KMS key",
        ))
        .attribute(Attribute::computed("oauth2_issuer", "OAuth2 issuer URL of the zone"))
}

#[derive(Debug, Default)]
pub struct ZoneResource {
    slot: ClientSlot,
}

impl ZoneResource {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Resource for ZoneResource {
    type Model = ZoneModel;

    fn type_name(&self) -> &'static str {
        TYPE_NAME
    }

    fn schema(&self) -> Schema {
        schema()
    }

    fn configure(&mut self, data: Option<ProviderData>) {
        self.slot.configure(data);
    }

    async fn create(&self, plan: ZoneModel) -> Result<ZoneModel> {
        let data = self.slot.get(TYPE_NAME)?;
        let request = CreateZoneRequest {
            name: required(&plan.name, "name")?,
            description: to_wire(&plan.description),
            oauth2: oauth2_block(
                to_wire(&plan.oauth2_pkce_required),
                to_wire(&plan.oauth2_dcr_enabled),
            ),
            encryption_key: to_wire(&plan.encryption_key_arn).map(|arn| EncryptionKey { arn }),
        };

        let zone = data.client.create_zone(&data.organization_id, &request).await?;
        tracing::info!(id = %zone.id, name = %zone.name, "Created zone");
        Ok(ZoneModel::from_zone(zone))
    }

    async fn read(&self, state: ZoneModel) -> Result<ReadOutcome<ZoneModel>> {
        let data = self.slot.get(TYPE_NAME)?;
        let id = required(&state.id, "id")?;
        let result = data.client.get_zone(&data.organization_id, &id).await;
        Ok(match found(TYPE_NAME, &id, result)? {
            Some(zone) => ReadOutcome::Found(ZoneModel::from_zone(zone)),
            None => ReadOutcome::Removed,
        })
    }

    async fn update(&self, plan: ZoneModel, state: ZoneModel) -> Result<ZoneModel> {
        let data = self.slot.get(TYPE_NAME)?;
        let id = required(&state.id, "id")?;
        let request = UpdateZoneRequest {
            name: diff_required(&plan.name, &state.name),
            description: diff_field(&plan.description, &state.description),
            oauth2: oauth2_block(
                diff_field(&plan.oauth2_pkce_required, &state.oauth2_pkce_required),
                diff_field(&plan.oauth2_dcr_enabled, &state.oauth2_dcr_enabled),
            ),
            encryption_key: diff_field(&plan.encryption_key_arn, &state.encryption_key_arn)
                .map(|arn| EncryptionKey { arn }),
        };

        let zone = data
            .client
            .update_zone(&data.organization_id, &id, &request)
            .await?;
        tracing::info!(id = %zone.id, "Updated zone");
        Ok(ZoneModel::from_zone(zone))
    }

    async fn delete(&self, state: ZoneModel) -> Result<()> {
        let data = self.slot.get(TYPE_NAME)?;
        let id = required(&state.id, "id")?;
        deleted(
            TYPE_NAME,
            &id,
            data.client.delete_zone(&data.organization_id, &id).await,
        )
    }

    fn import_state(&self, id: &str) -> Result<ZoneModel> {
        let parts = ImportPattern::new(IMPORT_PATTERN).parse(id)?;
        Ok(ZoneModel {
            id: Value::Known(parts.get("zone_id")),
            ..ZoneModel::default()
        })
    }
}
