//! `keycard_aws_kms_key_policy`: key policy statement a customer-managed KMS
//! key needs before a zone can use it

use crate::error::Result;
use crate::reconcile::required;
use crate::resource::{ClientSlot, DataSource, ProviderData};
use crate::schema::{Attribute, Schema};
use crate::value::Value;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

pub const TYPE_NAME: &str = "keycard_aws_kms_key_policy";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct KmsKeyPolicyModel {
    #[serde(default, skip_serializing_if = "Value::is_unknown")]
    pub zone_id: Value<String>,
    /// JSON-encoded policy document
    #[serde(default, skip_serializing_if = "Value::is_unknown")]
    pub policy: Value<String>,
    #[serde(default, skip_serializing_if = "Value::is_unknown")]
    pub principal_arn: Value<String>,
}

#[derive(Debug, Default)]
pub struct KmsKeyPolicyDataSource {
    slot: ClientSlot,
}

impl KmsKeyPolicyDataSource {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl DataSource for KmsKeyPolicyDataSource {
    type Model = KmsKeyPolicyModel;

    fn type_name(&self) -> &'static str {
        TYPE_NAME
    }

    fn schema(&self) -> Schema {
        Schema::new("AWS KMS key policy granting a zone use of a customer-managed key")
            .attribute(Attribute::required("zone_id", "Zone ID"))
            .attribute(Attribute::computed("policy", "Key policy document as JSON"))
            .attribute(Attribute::computed("principal_arn", "AWS principal Keycard uses"))
    }

    fn configure(&mut self, data: Option<ProviderData>) {
        self.slot.configure(data);
    }

    async fn read(&self, config: KmsKeyPolicyModel) -> Result<KmsKeyPolicyModel> {
        let data = self.slot.get(TYPE_NAME)?;
        let zone_id = required(&config.zone_id, "zone_id")?;
        let policy = data.client.get_kms_key_policy(&zone_id).await?;
        Ok(KmsKeyPolicyModel {
            zone_id: Value::Known(zone_id),
            policy: Value::Known(serde_json::to_string(&policy.policy)?),
            principal_arn: Value::Known(policy.principal_arn),
        })
    }
}
