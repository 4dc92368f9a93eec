//! `keycard_resource` data source

use crate::error::Result;
use crate::reconcile::required;
use crate::resource::{ClientSlot, DataSource, ProviderData};
use crate::resources::protected_resource::{ResourceModel, TYPE_NAME};
use crate::schema::{Attribute, Schema};
use async_trait::async_trait;

#[derive(Debug, Default)]
pub struct ResourceDataSource {
    slot: ClientSlot,
}

impl ResourceDataSource {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl DataSource for ResourceDataSource {
    type Model = ResourceModel;

    fn type_name(&self) -> &'static str {
        TYPE_NAME
    }

    fn schema(&self) -> Schema {
        Schema::new("Look up a protected resource by zone and ID")
            .attribute(Attribute::required("zone_id", "Zone ID"))
            .attribute(Attribute::required("id", "Resource ID"))
            .attribute(Attribute::computed("name", "Display name"))
            .attribute(Attribute::computed("identifier", "Audience identifier"))
            .attribute(Attribute::computed("description", "Free-form description"))
            .attribute(Attribute::computed("application_id", "Serving application"))
            .attribute(Attribute::computed("credential_provider_id", "Credential provider"))
            .attribute(Attribute::computed("scopes", "OAuth2 scopes"))
    }

    fn configure(&mut self, data: Option<ProviderData>) {
        self.slot.configure(data);
    }

    async fn read(&self, config: ResourceModel) -> Result<ResourceModel> {
        let data = self.slot.get(TYPE_NAME)?;
        let zone_id = required(&config.zone_id, "zone_id")?;
        let id = required(&config.id, "id")?;
        let resource = data.client.get_resource(&zone_id, &id).await?;
        Ok(ResourceModel::from_resource(resource))
    }
}
