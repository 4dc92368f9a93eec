//! `keycard_provider` data source

use crate::error::Result;
use crate::reconcile::required;
use crate::resource::{ClientSlot, DataSource, ProviderData};
use crate::resources::identity_provider::{ProviderModel, TYPE_NAME};
use crate::schema::{Attribute, Schema};
use crate::value::Value;
use async_trait::async_trait;

#[derive(Debug, Default)]
pub struct ProviderDataSource {
    slot: ClientSlot,
}

impl ProviderDataSource {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl DataSource for ProviderDataSource {
    type Model = ProviderModel;

    fn type_name(&self) -> &'static str {
        TYPE_NAME
    }

    fn schema(&self) -> Schema {
        Schema::new("Look up an identity provider by zone and ID")
            .attribute(Attribute::required("zone_id", "Zone ID"))
            .attribute(Attribute::required("id", "Provider ID"))
            .attribute(Attribute::computed("name", "Display name"))
            .attribute(Attribute::computed("identifier", "Issuer identifier"))
            .attribute(Attribute::computed("description", "Free-form description"))
            .attribute(Attribute::computed("client_id", "OAuth2 client ID"))
            .attribute(Attribute::computed("authorization_endpoint", "Authorization endpoint URL"))
            .attribute(Attribute::computed("token_endpoint", "Token endpoint URL"))
    }

    fn configure(&mut self, data: Option<ProviderData>) {
        self.slot.configure(data);
    }

    async fn read(&self, config: ProviderModel) -> Result<ProviderModel> {
        let data = self.slot.get(TYPE_NAME)?;
        let zone_id = required(&config.zone_id, "zone_id")?;
        let id = required(&config.id, "id")?;
        let provider = data.client.get_provider(&zone_id, &id).await?;
        Ok(ProviderModel::from_provider(provider, Value::Unknown))
    }
}
