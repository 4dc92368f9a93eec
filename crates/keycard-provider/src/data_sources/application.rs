//! `keycard_application` data source

use crate::error::Result;
use crate::reconcile::required;
use crate::resource::{ClientSlot, DataSource, ProviderData};
use crate::resources::application::{ApplicationModel, TYPE_NAME};
use crate::schema::{Attribute, Schema};
use async_trait::async_trait;

#[derive(Debug, Default)]
pub struct ApplicationDataSource {
    slot: ClientSlot,
}

impl ApplicationDataSource {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl DataSource for ApplicationDataSource {
    type Model = ApplicationModel;

    fn type_name(&self) -> &'static str {
        TYPE_NAME
    }

    fn schema(&self) -> Schema {
        Schema::new("Look up an application by zone and ID")
            .attribute(Attribute::required("zone_id", "Zone ID"))
            .attribute(Attribute::required("id", "Application ID"))
            .attribute(Attribute::computed("name", "Display name"))
            .attribute(Attribute::computed("identifier", "Unique identifier"))
            .attribute(Attribute::computed("description", "Free-form description"))
            .attribute(Attribute::computed("docs_url", "Documentation URL"))
            .attribute(Attribute::computed("redirect_uris", "Allowed OAuth2 redirect URIs"))
    }

    fn configure(&mut self, data: Option<ProviderData>) {
        self.slot.configure(data);
    }

    async fn read(&self, config: ApplicationModel) -> Result<ApplicationModel> {
        let data = self.slot.get(TYPE_NAME)?;
        let zone_id = required(&config.zone_id, "zone_id")?;
        let id = required(&config.id, "id")?;
        let application = data.client.get_application(&zone_id, &id).await?;
        Ok(ApplicationModel::from_application(application))
    }
}
