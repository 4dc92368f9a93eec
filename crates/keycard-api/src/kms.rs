//! AWS KMS key policy required for zone encryption keys

use crate::client::{KeycardClient, segment};
use crate::error::Result;
use serde::Deserialize;

/// Key policy granting Keycard use of a customer-managed KMS key
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KmsKeyPolicy {
    /// IAM policy document
    pub policy: serde_json::Value,
    /// Principal Keycard uses to call KMS
    pub principal_arn: String,
}

impl KeycardClient {
    pub async fn get_kms_key_policy(&self, zone_id: &str) -> Result<KmsKeyPolicy> {
        self.get(&format!("/zones/{}/encryption-key/aws-policy", segment(zone_id)))
            .await
    }
}
