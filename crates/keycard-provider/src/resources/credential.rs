//! Application credentials: `keycard_application_password`,
//! `keycard_application_url_credential` and `keycard_application_token_credential`
//!
//! Credentials cannot be modified; every user attribute forces replacement.
//! All three share one endpoint and differ only in the `type` discriminator.

use crate::error::{ProviderError, Result};
use crate::import::ImportPattern;
use crate::reconcile::{from_wire, required};
use crate::resource::{ClientSlot, Model, ProviderData, ReadOutcome, Resource, deleted, found};
use crate::schema::{Attribute, Schema};
use crate::value::Value;
use async_trait::async_trait;
use keycard_api::{ApplicationCredential, CreateCredentialRequest, CredentialKind, NewCredential};
use serde::{Deserialize, Serialize};
use std::marker::PhantomData;

const IMPORT_PATTERN: &str = "zones/{zone_id}/application-credentials/{id}";

/// Model of one credential variant
pub trait CredentialModel: Model + Default + std::fmt::Debug {
    const TYPE_NAME: &'static str;
    /// Wire discriminator
    const KIND: &'static str;

    fn schema() -> Schema;

    fn id(&self) -> &Value<String>;
    fn zone_id(&self) -> &Value<String>;
    fn application_id(&self) -> &Value<String>;

    fn new_credential(&self) -> Result<NewCredential>;

    /// Map a response; `None` when it holds another variant
    fn from_credential(credential: ApplicationCredential, prior: &Self) -> Option<Self>;

    fn imported(zone_id: String, id: String) -> Self;
}

fn base_schema(description: &'static str) -> Schema {
    Schema::new(description)
        .attribute(Attribute::computed("id", "Credential ID"))
        .attribute(Attribute::required("zone_id", "Zone of the application").requires_replace())
        .attribute(
            Attribute::required("application_id", "Application the credential belongs to")
                .requires_replace(),
        )
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PasswordModel {
    #[serde(default, skip_serializing_if = "Value::is_unknown")]
    pub id: Value<String>,
    #[serde(default, skip_serializing_if = "Value::is_unknown")]
    pub zone_id: Value<String>,
    #[serde(default, skip_serializing_if = "Value::is_unknown")]
    pub application_id: Value<String>,
    #[serde(default, skip_serializing_if = "Value::is_unknown")]
    pub identifier: Value<String>,
    /// Only returned when the credential is created
    #[serde(default, skip_serializing_if = "Value::is_unknown")]
    pub password: Value<String>,
}

impl CredentialModel for PasswordModel {
    const TYPE_NAME: &'static str = "keycard_application_password";
    const KIND: &'static str = "password";

    fn schema() -> Schema {
        base_schema("A generated password an application authenticates with")
            .attribute(Attribute::computed("identifier", "Username paired with the password"))
            .attribute(Attribute::computed("password", "Generated password").sensitive())
    }

    fn id(&self) -> &Value<String> {
        &self.id
    }

    fn zone_id(&self) -> &Value<String> {
        &self.zone_id
    }

    fn application_id(&self) -> &Value<String> {
        &self.application_id
    }

    fn new_credential(&self) -> Result<NewCredential> {
        Ok(NewCredential::Password)
    }

    fn from_credential(credential: ApplicationCredential, prior: &Self) -> Option<Self> {
        let CredentialKind::Password {
            identifier,
            password,
        } = credential.kind
        else {
            return None;
        };
        Some(Self {
            id: Value::Known(credential.id),
            zone_id: Value::Known(credential.zone_id),
            application_id: Value::Known(credential.application_id),
            identifier: Value::Known(identifier),
            password: from_wire(password).or(prior.password.clone()),
        })
    }

    fn imported(zone_id: String, id: String) -> Self {
        Self {
            id: Value::Known(id),
            zone_id: Value::Known(zone_id),
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UrlCredentialModel {
    #[serde(default, skip_serializing_if = "Value::is_unknown")]
    pub id: Value<String>,
    #[serde(default, skip_serializing_if = "Value::is_unknown")]
    pub zone_id: Value<String>,
    #[serde(default, skip_serializing_if = "Value::is_unknown")]
    pub application_id: Value<String>,
    #[serde(default, skip_serializing_if = "Value::is_unknown")]
    pub url: Value<String>,
}

impl CredentialModel for UrlCredentialModel {
    const TYPE_NAME: &'static str = "keycard_application_url_credential";
    const KIND: &'static str = "url";

    fn schema() -> Schema {
        base_schema("Identifies an application by a URL it controls")
            .attribute(Attribute::required("url", "URL owned by the application").requires_replace())
    }

    fn id(&self) -> &Value<String> {
        &self.id
    }

    fn zone_id(&self) -> &Value<String> {
        &self.zone_id
    }

    fn application_id(&self) -> &Value<String> {
        &self.application_id
    }

    fn new_credential(&self) -> Result<NewCredential> {
        Ok(NewCredential::Url {
            url: required(&self.url, "url")?,
        })
    }

    fn from_credential(credential: ApplicationCredential, _prior: &Self) -> Option<Self> {
        let CredentialKind::Url { url } = credential.kind else {
            return None;
        };
        Some(Self {
            id: Value::Known(credential.id),
            zone_id: Value::Known(credential.zone_id),
            application_id: Value::Known(credential.application_id),
            url: Value::Known(url),
        })
    }

    fn imported(zone_id: String, id: String) -> Self {
        Self {
            id: Value::Known(id),
            zone_id: Value::Known(zone_id),
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TokenCredentialModel {
    #[serde(default, skip_serializing_if = "Value::is_unknown")]
    pub id: Value<String>,
    #[serde(default, skip_serializing_if = "Value::is_unknown")]
    pub zone_id: Value<String>,
    #[serde(default, skip_serializing_if = "Value::is_unknown")]
    pub application_id: Value<String>,
    #[serde(default, skip_serializing_if = "Value::is_unknown")]
    pub provider_id: Value<String>,
    #[serde(default, skip_serializing_if = "Value::is_unknown")]
    pub subject: Value<String>,
}

impl CredentialModel for TokenCredentialModel {
    const TYPE_NAME: &'static str = "keycard_application_token_credential";
    const KIND: &'static str = "token";

    fn schema() -> Schema {
        base_schema("Trusts tokens issued to a subject by an identity provider")
            .attribute(
                Attribute::required("provider_id", "Identity provider issuing the tokens")
                    .requires_replace(),
            )
            .attribute(Attribute::required("subject", "Token subject").requires_replace())
    }

    fn id(&self) -> &Value<String> {
        &self.id
    }

    fn zone_id(&self) -> &Value<String> {
        &self.zone_id
    }

    fn application_id(&self) -> &Value<String> {
        &self.application_id
    }

    fn new_credential(&self) -> Result<NewCredential> {
        Ok(NewCredential::Token {
            provider_id: required(&self.provider_id, "provider_id")?,
            subject: required(&self.subject, "subject")?,
        })
    }

    fn from_credential(credential: ApplicationCredential, _prior: &Self) -> Option<Self> {
        let CredentialKind::Token {
            provider_id,
            subject,
        } = credential.kind
        else {
            return None;
        };
        Some(Self {
            id: Value::Known(credential.id),
            zone_id: Value::Known(credential.zone_id),
            application_id: Value::Known(credential.application_id),
            provider_id: Value::Known(provider_id),
            subject: Value::Known(subject),
        })
    }

    fn imported(zone_id: String, id: String) -> Self {
        Self {
            id: Value::Known(id),
            zone_id: Value::Known(zone_id),
            ..Self::default()
        }
    }
}

/// Handler shared by the credential variants
#[derive(Debug)]
pub struct CredentialResource<M> {
    slot: ClientSlot,
    _model: PhantomData<fn() -> M>,
}

impl<M> Default for CredentialResource<M> {
    fn default() -> Self {
        Self {
            slot: ClientSlot::default(),
            _model: PhantomData,
        }
    }
}

impl<M: CredentialModel> CredentialResource<M> {
    pub fn new() -> Self {
        Self::default()
    }

    fn map(credential: ApplicationCredential, prior: &M) -> Result<M> {
        let id = credential.id.clone();
        let kind = credential.kind.type_name();
        M::from_credential(credential, prior).ok_or_else(|| {
            ProviderError::UnexpectedResponse(format!(
                "application credential {} is a {} credential, {} expects {}",
                id,
                kind,
                M::TYPE_NAME,
                M::KIND
            ))
        })
    }
}

pub type ApplicationPasswordResource = CredentialResource<PasswordModel>;
pub type UrlCredentialResource = CredentialResource<UrlCredentialModel>;
pub type TokenCredentialResource = CredentialResource<TokenCredentialModel>;

#[async_trait]
impl<M: CredentialModel> Resource for CredentialResource<M> {
    type Model = M;

    fn type_name(&self) -> &'static str {
        M::TYPE_NAME
    }

    fn schema(&self) -> Schema {
        M::schema()
    }

    fn configure(&mut self, data: Option<ProviderData>) {
        self.slot.configure(data);
    }

    async fn create(&self, plan: M) -> Result<M> {
        let data = self.slot.get(M::TYPE_NAME)?;
        let zone_id = required(plan.zone_id(), "zone_id")?;
        let request = CreateCredentialRequest {
            application_id: required(plan.application_id(), "application_id")?,
            kind: plan.new_credential()?,
        };

        let credential = data
            .client
            .create_application_credential(&zone_id, &request)
            .await?;
        tracing::info!(
            id = %credential.id,
            application_id = %credential.application_id,
            kind = M::KIND,
            "Created application credential"
        );
        Self::map(credential, &plan)
    }

    async fn read(&self, state: M) -> Result<ReadOutcome<M>> {
        let data = self.slot.get(M::TYPE_NAME)?;
        let zone_id = required(state.zone_id(), "zone_id")?;
        let id = required(state.id(), "id")?;
        let result = data.client.get_application_credential(&zone_id, &id).await;
        Ok(match found(M::TYPE_NAME, &id, result)? {
            Some(credential) => ReadOutcome::Found(Self::map(credential, &state)?),
            None => ReadOutcome::Removed,
        })
    }

    async fn update(&self, _plan: M, _state: M) -> Result<M> {
        Err(ProviderError::Immutable(format!(
            "{} cannot be updated in place; it must be replaced",
            M::TYPE_NAME
        )))
    }

    async fn delete(&self, state: M) -> Result<()> {
        let data = self.slot.get(M::TYPE_NAME)?;
        let zone_id = required(state.zone_id(), "zone_id")?;
        let id = required(state.id(), "id")?;
        deleted(
            M::TYPE_NAME,
            &id,
            data.client
                .delete_application_credential(&zone_id, &id)
                .await,
        )
    }

    fn import_state(&self, id: &str) -> Result<M> {
        let parts = ImportPattern::new(IMPORT_PATTERN).parse(id)?;
        Ok(M::imported(parts.get("zone_id"), parts.get("id")))
    }
}
