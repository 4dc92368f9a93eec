//! `keycard_provider`: an upstream OAuth2/OIDC identity provider in a zone

use crate::error::Result;
use crate::import::ImportPattern;
use crate::reconcile::{diff_field, diff_required, from_wire, required, to_wire};
use crate::resource::{ClientSlot, ProviderData, ReadOutcome, Resource, deleted, found};
use crate::schema::{Attribute, Schema};
use crate::value::Value;
use async_trait::async_trait;
use keycard_api::{CreateProviderRequest, Provider, UpdateProviderRequest};
use serde::{Deserialize, Serialize};

pub const TYPE_NAME: &str = "keycard_provider";
const IMPORT_PATTERN: &str = "zones/{zone_id}/providers/{id}";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProviderModel {
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
    pub client_id: Value<String>,
    /// Write-only; the API never returns it
    #[serde(default, skip_serializing_if = "Value::is_unknown")]
    pub client_secret: Value<String>,
    #[serde(default, skip_serializing_if = "Value::is_unknown")]
    pub authorization_endpoint: Value<String>,
    #[serde(default, skip_serializing_if = "Value::is_unknown")]
    pub token_endpoint: Value<String>,
}

impl ProviderModel {
    /// Map a response, carrying the write-only secret over from `client_secret`
    pub(crate) fn from_provider(provider: Provider, client_secret: Value<String>) -> Self {
        Self {
            id: Value::Known(provider.id),
            zone_id: Value::Known(provider.zone_id),
            name: Value::Known(provider.name),
            identifier: Value::Known(provider.identifier),
            description: from_wire(provider.description),
            client_id: from_wire(provider.client_id),
            client_secret,
            authorization_endpoint: from_wire(provider.authorization_endpoint),
            token_endpoint: from_wire(provider.token_endpoint),
        }
    }
}

pub fn schema() -> Schema {
    Schema::new("An upstream identity provider users authenticate with")
        .attribute(Attribute::computed("id", "Provider ID"))
        .attribute(Attribute::required("zone_id", "Zone the provider belongs to").requires_replace())
        .attribute(Attribute::required("name", "Display name"))
        .attribute(Attribute::required("identifier", "Issuer identifier of the provider"))
        .attribute(Attribute::optional("description", "Free-form description"))
        .attribute(Attribute::optional("client_id", "OAuth2 client ID at the provider"))
        .attribute(Attribute::optional("client_secret", "OAuth2 client secret at the provider").sensitive())
        .attribute(Attribute::optional_computed(
            "authorization_endpoint",
            "Authorization endpoint URL",
        ))
        .attribute(Attribute::optional_computed("token_endpoint", "Token endpoint URL"))
}

#[derive(Debug, Default)]
pub struct ProviderResource {
    slot: ClientSlot,
}

impl ProviderResource {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Resource for ProviderResource {
    type Model = ProviderModel;

    fn type_name(&self) -> &'static str {
        TYPE_NAME
    }

    fn schema(&self) -> Schema {
        schema()
    }

    fn configure(&mut self, data: Option<ProviderData>) {
        self.slot.configure(data);
    }

    async fn create(&self, plan: ProviderModel) -> Result<ProviderModel> {
        let data = self.slot.get(TYPE_NAME)?;
        let zone_id = required(&plan.zone_id, "zone_id")?;
        let request = CreateProviderRequest {
            name: required(&plan.name, "name")?,
            identifier: required(&plan.identifier, "identifier")?,
            description: to_wire(&plan.description),
            client_id: to_wire(&plan.client_id),
            client_secret: to_wire(&plan.client_secret),
            authorization_endpoint: to_wire(&plan.authorization_endpoint),
            token_endpoint: to_wire(&plan.token_endpoint),
        };

        let provider = data.client.create_provider(&zone_id, &request).await?;
        tracing::info!(id = %provider.id, zone_id = %zone_id, "Created identity provider");
        Ok(ProviderModel::from_provider(provider, plan.client_secret))
    }

    async fn read(&self, state: ProviderModel) -> Result<ReadOutcome<ProviderModel>> {
        let data = self.slot.get(TYPE_NAME)?;
        let zone_id = required(&state.zone_id, "zone_id")?;
        let id = required(&state.id, "id")?;
        let result = data.client.get_provider(&zone_id, &id).await;
        Ok(match found(TYPE_NAME, &id, result)? {
            Some(provider) => {
                ReadOutcome::Found(ProviderModel::from_provider(provider, state.client_secret))
            }
            None => ReadOutcome::Removed,
        })
    }

    async fn update(&self, plan: ProviderModel, state: ProviderModel) -> Result<ProviderModel> {
        let data = self.slot.get(TYPE_NAME)?;
        let zone_id = required(&state.zone_id, "zone_id")?;
        let id = required(&state.id, "id")?;
        let request = UpdateProviderRequest {
            name: diff_required(&plan.name, &state.name),
            identifier: diff_required(&plan.identifier, &state.identifier),
            description: diff_field(&plan.description, &state.description),
            client_id: diff_field(&plan.client_id, &state.client_id),
            client_secret: diff_field(&plan.client_secret, &state.client_secret),
            authorization_endpoint: diff_field(
                &plan.authorization_endpoint,
                &state.authorization_endpoint,
            ),
            token_endpoint: diff_field(&plan.token_endpoint, &state.token_endpoint),
        };

        let provider = data.client.update_provider(&zone_id, &id, &request).await?;
        tracing::info!(id = %provider.id, "Updated identity provider");
        let client_secret = plan.client_secret.or(state.client_secret);
        Ok(ProviderModel::from_provider(provider, client_secret))
    }

    async fn delete(&self, state: ProviderModel) -> Result<()> {
        let data = self.slot.get(TYPE_NAME)?;
        let zone_id = required(&state.zone_id, "zone_id")?;
        let id = required(&state.id, "id")?;
        deleted(
            TYPE_NAME,
            &id,
            data.client.delete_provider(&zone_id, &id).await,
        )
    }

    fn import_state(&self, id: &str) -> Result<ProviderModel> {
        let parts = ImportPattern::new(IMPORT_PATTERN).parse(id)?;
        Ok(ProviderModel {
            id: Value::Known(parts.get("id")),
            zone_id: Value::Known(parts.get("zone_id")),
            ..ProviderModel::default()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_secret_survives_mapping() {
        let provider: Provider = serde_json::from_value(json!({
            "id": "p1",
            "zoneId": "z1",
            "name": "Okta",
            "identifier": "https://example.okta.com",
            "clientId": "abc"
        }))
        .unwrap();

        let model = ProviderModel::from_provider(provider, Value::from("s3cret"));
        assert_eq!(model.client_secret.as_str(), Some("s3cret"));
        assert_eq!(model.client_id.as_str(), Some("abc"));
        assert!(model.description.is_unknown());
    }

    #[test]
    fn test_zone_change_requires_replace() {
        let schema = schema();
        assert!(schema.get("zone_id").unwrap().requires_replace);
        assert!(!schema.get("name").unwrap().requires_replace);
        assert!(schema.get("client_secret").unwrap().sensitive);
    }

    #[test]
    fn test_import() {
        let model = ProviderResource::new()
            .import_state("zones/z1/providers/p1")
            .unwrap();
        assert_eq!(model.zone_id.as_str(), Some("z1"));
        assert_eq!(model.id.as_str(), Some("p1"));
        assert!(ProviderResource::new().import_state("zones/z1/providers").is_err());
    }
}
