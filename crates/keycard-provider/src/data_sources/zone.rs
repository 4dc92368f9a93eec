//! `keycard_zone` data source

use crate::error::Result;
use crate::reconcile::required;
use crate::resource::{ClientSlot, DataSource, ProviderData};
use crate::resources::zone::{TYPE_NAME, ZoneModel};
use crate::schema::{Attribute, Schema};
use async_trait::async_trait;

#[derive(Debug, Default)]
pub struct ZoneDataSource {
    slot: ClientSlot,
}

impl ZoneDataSource {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl DataSource for ZoneDataSource {
    type Model = ZoneModel;

    fn type_name(&self) -> &'static str {
        TYPE_NAME
    }

    fn schema(&self) -> Schema {
        Schema::new("Look up a zone by ID")
            .attribute(Attribute::required("id", "Zone ID"))
            .attribute(Attribute::computed("name", "Display name"))
            .attribute(Attribute::computed("description", "Free-form description"))
            .attribute(Attribute::computed("oauth2_pkce_required", "Whether PKCE is required"))
            .attribute(Attribute::computed("oauth2_dcr_enabled", "Whether DCR is enabled"))
            .attribute(Attribute::computed("encryption_key_arn", "Customer-managed KMS key"))
            .attribute(Attribute::computed("oauth2_issuer", "OAuth2 issuer URL"))
    }

    fn configure(&mut self, data: Option<ProviderData>) {
        self.slot.configure(data);
    }

    async fn read(&self, config: ZoneModel) -> Result<ZoneModel> {
        let data = self.slot.get(TYPE_NAME)?;
        let id = required(&config.id, "id")?;
        let zone = data.client.get_zone(&data.organization_id, &id).await?;
        Ok(ZoneModel::from_zone(zone))
    }
}
