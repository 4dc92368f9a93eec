//! `keycard_sso_connection`: the single SSO connection of an organization

use crate::error::Result;
use crate::import::ImportPattern;
use crate::reconcile::{diff_field, diff_required, from_wire, required, to_wire};
use crate::resource::{ClientSlot, ProviderData, ReadOutcome, Resource, deleted, found};
use crate::schema::{Attribute, Schema};
use crate::value::Value;
use async_trait::async_trait;
use keycard_api::{CreateSsoConnectionRequest, SsoConnection, UpdateSsoConnectionRequest};
use serde::{Deserialize, Serialize};

pub const TYPE_NAME: &str = "keycard_sso_connection";
const IMPORT_PATTERN: &str = "organizations/{organization_id}/sso-connection";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SsoConnectionModel {
    #[serde(default, skip_serializing_if = "Value::is_unknown")]
    pub id: Value<String>,
    /// Defaults to the provider's organization
    #[serde(default, skip_serializing_if = "Value::is_unknown")]
    pub organization_id: Value<String>,
    #[serde(default, skip_serializing_if = "Value::is_unknown")]
    pub identifier: Value<String>,
    #[serde(default, skip_serializing_if = "Value::is_unknown")]
    pub client_id: Value<String>,
    #[serde(default, skip_serializing_if = "Value::is_unknown")]
    pub client_secret: Value<String>,
}

impl SsoConnectionModel {
    fn from_connection(
        organization_id: String,
        connection: SsoConnection,
        client_secret: Value<String>,
    ) -> Self {
        Self {
            id: Value::Known(connection.id),
            organization_id: Value::Known(organization_id),
            identifier: Value::Known(connection.identifier),
            client_id: from_wire(connection.client_id),
            client_secret,
        }
    }
}

pub fn schema() -> Schema {
    Schema::new("Single sign-on connection used by organization members")
        .attribute(Attribute::computed("id", "Connection ID"))
        .attribute(
            Attribute::optional_computed("organization_id", "Organization; defaults to the provider's")
                .requires_replace(),
        )
        .attribute(Attribute::required("identifier", "Issuer identifier of the SSO provider"))
        .attribute(Attribute::optional("client_id", "OAuth2 client ID at the SSO provider"))
        .attribute(
            Attribute::optional("client_secret", "OAuth2 client secret at the SSO provider").sensitive(),
        )
}

#[derive(Debug, Default)]
pub struct SsoConnectionResource {
    slot: ClientSlot,
}

impl SsoConnectionResource {
    pub fn new() -> Self {
        Self::default()
    }

    fn organization_id(&self, model: &SsoConnectionModel) -> Result<String> {
        match model.organization_id.as_str() {
            Some(organization_id) => Ok(organization_id.to_string()),
            None => Ok(self.slot.get(TYPE_NAME)?.organization_id.clone()),
        }
    }
}

#[async_trait]
impl Resource for SsoConnectionResource {
    type Model = SsoConnectionModel;

    fn type_name(&self) -> &'static str {
        TYPE_NAME
    }

    fn schema(&self) -> Schema {
        schema()
    }

    fn configure(&mut self, data: Option<ProviderData>) {
        self.slot.configure(data);
    }

    async fn create(&self, plan: SsoConnectionModel) -> Result<SsoConnectionModel> {
        let data = self.slot.get(TYPE_NAME)?;
        let organization_id = self.organization_id(&plan)?;
        let request = CreateSsoConnectionRequest {
            identifier: required(&plan.identifier, "identifier")?,
            client_id: to_wire(&plan.client_id),
            client_secret: to_wire(&plan.client_secret),
        };

        let connection = data
            .client
            .create_sso_connection(&organization_id, &request)
            .await?;
        tracing::info!(id = %connection.id, %organization_id, "Created SSO connection");
        Ok(SsoConnectionModel::from_connection(
            organization_id,
            connection,
            plan.client_secret,
        ))
    }

    async fn read(&self, state: SsoConnectionModel) -> Result<ReadOutcome<SsoConnectionModel>> {
        let data = self.slot.get(TYPE_NAME)?;
        let organization_id = self.organization_id(&state)?;
        let result = data.client.get_sso_connection(&organization_id).await;
        Ok(match found(TYPE_NAME, &organization_id, result)? {
            Some(connection) => ReadOutcome::Found(SsoConnectionModel::from_connection(
                organization_id,
                connection,
                state.client_secret,
            )),
            None => ReadOutcome::Removed,
        })
    }

    async fn update(
        &self,
        plan: SsoConnectionModel,
        state: SsoConnectionModel,
    ) -> Result<SsoConnectionModel> {
        let data = self.slot.get(TYPE_NAME)?;
        let organization_id = self.organization_id(&state)?;
        let request = UpdateSsoConnectionRequest {
            identifier: diff_required(&plan.identifier, &state.identifier),
            client_id: diff_field(&plan.client_id, &state.client_id),
            client_secret: diff_field(&plan.client_secret, &state.client_secret),
        };

        let connection = data
            .client
            .update_sso_connection(&organization_id, &request)
            .await?;
        tracing::info!(id = %connection.id, "Updated SSO connection");
        let client_secret = plan.client_secret.or(state.client_secret);
        Ok(SsoConnectionModel::from_connection(
            organization_id,
            connection,
            client_secret,
        ))
    }

    async fn delete(&self, state: SsoConnectionModel) -> Result<()> {
        let data = self.slot.get(TYPE_NAME)?;
        let organization_id = self.organization_id(&state)?;
        deleted(
            TYPE_NAME,
            &organization_id,
            data.client.delete_sso_connection(&organization_id).await,
        )
    }

    fn import_state(&self, id: &str) -> Result<SsoConnectionModel> {
        let parts = ImportPattern::new(IMPORT_PATTERN).parse(id)?;
        Ok(SsoConnectionModel {
            organization_id: Value::Known(parts.get("organization_id")),
            ..SsoConnectionModel::default()
        })
    }
}
