//! Resource and data source handler traits
//!
//! Every handler goes through the same lifecycle:
//! `configure` binds the shared client, then `create`, `read`, `update`,
//! `delete` and `import_state` operate on typed models. The dynamic traits
//! erase the model type so the provider can keep handlers in one registry.

use crate::error::{ProviderError, Result};
use crate::schema::Schema;
use async_trait::async_trait;
use keycard_api::{ApiError, KeycardClient};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::sync::Arc;

/// Shared handle given to every handler by the provider's configure step
#[derive(Debug, Clone)]
pub struct ProviderData {
    pub client: Arc<KeycardClient>,
    pub organization_id: String,
}

/// Holds the provider data once a handler has been configured
#[derive(Debug, Clone, Default)]
pub struct ClientSlot(Option<ProviderData>);

impl ClientSlot {
    /// Bind provider data; `None` leaves the slot untouched
    pub fn configure(&mut self, data: Option<ProviderData>) {
        if let Some(data) = data {
            self.0 = Some(data);
        }
    }

    pub fn get(&self, type_name: &'static str) -> Result<&ProviderData> {
        self.0.as_ref().ok_or(ProviderError::Unconfigured(type_name))
    }
}

/// Result of refreshing a resource
#[derive(Debug, Clone, PartialEq)]
pub enum ReadOutcome<M> {
    Found(M),
    /// Deleted outside of the provider; drop it from state
    Removed,
}

/// Typed model of a handler
pub trait Model: Serialize + DeserializeOwned + Clone + Send + Sync + 'static {}

impl<T> Model for T where T: Serialize + DeserializeOwned + Clone + Send + Sync + 'static {}

#[async_trait]
pub trait Resource: Send + Sync {
    type Model: Model;

    fn type_name(&self) -> &'static str;

    fn schema(&self) -> Schema;

    fn configure(&mut self, data: Option<ProviderData>);

    async fn create(&self, plan: Self::Model) -> Result<Self::Model>;

    async fn read(&self, state: Self::Model) -> Result<ReadOutcome<Self::Model>>;

    async fn update(&self, plan: Self::Model, state: Self::Model) -> Result<Self::Model>;

    async fn delete(&self, state: Self::Model) -> Result<()>;

    /// Build a partial model from an import ID; the caller reads it afterwards
    fn import_state(&self, id: &str) -> Result<Self::Model>;
}

#[async_trait]
pub trait DataSource: Send + Sync {
    type Model: Model;

    fn type_name(&self) -> &'static str;

    fn schema(&self) -> Schema;

    fn configure(&mut self, data: Option<ProviderData>);

    async fn read(&self, config: Self::Model) -> Result<Self::Model>;
}

/// Type-erased [`Resource`] working on JSON attribute objects
#[async_trait]
pub trait DynamicResource: Send + Sync {
    fn type_name(&self) -> &'static str;
    fn schema(&self) -> Schema;
    fn configure(&mut self, data: Option<ProviderData>);
    async fn create(&self, plan: serde_json::Value) -> Result<serde_json::Value>;
    async fn read(&self, state: serde_json::Value) -> Result<Option<serde_json::Value>>;
    async fn update(
        &self,
        plan: serde_json::Value,
        state: serde_json::Value,
    ) -> Result<serde_json::Value>;
    async fn delete(&self, state: serde_json::Value) -> Result<()>;
    fn import_state(&self, id: &str) -> Result<serde_json::Value>;
}

fn decode<M: Model>(type_name: &'static str, value: serde_json::Value) -> Result<M> {
    serde_json::from_value(value).map_err(|source| ProviderError::InvalidModel { type_name, source })
}

fn encode<M: Model>(model: &M) -> Result<serde_json::Value> {
    Ok(serde_json::to_value(model)?)
}

#[async_trait]
impl<R: Resource> DynamicResource for R {
    fn type_name(&self) -> &'static str {
        Resource::type_name(self)
    }

    fn schema(&self) -> Schema {
        Resource::schema(self)
    }

    fn configure(&mut self, data: Option<ProviderData>) {
        Resource::configure(self, data)
    }

    async fn create(&self, plan: serde_json::Value) -> Result<serde_json::Value> {
        let plan = decode(Resource::type_name(self), plan)?;
        encode(&Resource::create(self, plan).await?)
    }

    async fn read(&self, state: serde_json::Value) -> Result<Option<serde_json::Value>> {
        let state = decode(Resource::type_name(self), state)?;
        match Resource::read(self, state).await? {
            ReadOutcome::Found(model) => Ok(Some(encode(&model)?)),
            ReadOutcome::Removed => Ok(None),
        }
    }

    async fn update(
        &self,
        plan: serde_json::Value,
        state: serde_json::Value,
    ) -> Result<serde_json::Value> {
        let plan = decode(Resource::type_name(self), plan)?;
        let state = decode(Resource::type_name(self), state)?;
        encode(&Resource::update(self, plan, state).await?)
    }

    async fn delete(&self, state: serde_json::Value) -> Result<()> {
        let state = decode(Resource::type_name(self), state)?;
        Resource::delete(self, state).await
    }

    fn import_state(&self, id: &str) -> Result<serde_json::Value> {
        encode(&Resource::import_state(self, id)?)
    }
}

/// Type-erased [`DataSource`]
#[async_trait]
pub trait DynamicDataSource: Send + Sync {
    fn type_name(&self) -> &'static str;
    fn schema(&self) -> Schema;
    fn configure(&mut self, data: Option<ProviderData>);
    async fn read(&self, config: serde_json::Value) -> Result<serde_json::Value>;
}

#[async_trait]
impl<D: DataSource> DynamicDataSource for D {
    fn type_name(&self) -> &'static str {
        DataSource::type_name(self)
    }

    fn schema(&self) -> Schema {
        DataSource::schema(self)
    }

    fn configure(&mut self, data: Option<ProviderData>) {
        DataSource::configure(self, data)
    }

    async fn read(&self, config: serde_json::Value) -> Result<serde_json::Value> {
        let config = decode(DataSource::type_name(self), config)?;
        encode(&DataSource::read(self, config).await?)
    }
}

/// Map a fetch result for `read`: 404 means the object is gone
pub(crate) fn found<T>(type_name: &str, id: &str, result: std::result::Result<T, ApiError>) -> Result<Option<T>> {
    match result {
        Ok(value) => Ok(Some(value)),
        Err(e) if e.is_not_found() => {
            tracing::warn!(type_name, id, "Removed outside of Keycard provider, dropping from state");
            Ok(None)
        }
        Err(e) => Err(e.into()),
    }
}

/// Map a delete result: an object that is already gone counts as deleted
pub(crate) fn deleted(type_name: &str, id: &str, result: std::result::Result<(), ApiError>) -> Result<()> {
    match result {
        Ok(()) => {
            tracing::info!(type_name, id, "Deleted");
            Ok(())
        }
        Err(e) if e.is_not_found() => {
            tracing::debug!(type_name, id, "Already deleted");
            Ok(())
        }
        Err(e) => Err(e.into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use keycard_api::{StaticToken, StatusCode};

    fn status(status: StatusCode) -> ApiError {
        ApiError::Status {
            status,
            body: String::new(),
        }
    }

    fn data() -> ProviderData {
        let client = KeycardClient::builder(Arc::new(StaticToken::new("t")))
            .endpoint("http://localhost:1")
            .build()
            .unwrap();
        ProviderData {
            client: Arc::new(client),
            organization_id: "org-1".to_string(),
        }
    }

    #[test]
    fn test_slot_ignores_none() {
        let mut slot = ClientSlot::default();
        assert!(matches!(
            slot.get("keycard_zone"),
            Err(ProviderError::Unconfigured("keycard_zone"))
        ));

        slot.configure(Some(data()));
        slot.configure(None);
        assert_eq!(slot.get("keycard_zone").unwrap().organization_id, "org-1");
    }

    #[test]
    fn test_found_maps_not_found_to_none() {
        assert_eq!(found("t", "1", Ok(5)).unwrap(), Some(5));
        assert_eq!(
            found::<i32>("t", "1", Err(status(StatusCode::NOT_FOUND))).unwrap(),
            None
        );
        assert!(found::<i32>("t", "1", Err(status(StatusCode::FORBIDDEN))).is_err());
    }

    #[test]
    fn test_deleted_tolerates_not_found() {
        assert!(deleted("t", "1", Ok(())).is_ok());
        assert!(deleted("t", "1", Err(status(StatusCode::NOT_FOUND))).is_ok());
        let err = deleted("t", "1", Err(status(StatusCode::INTERNAL_SERVER_ERROR))).unwrap_err();
        assert!(!err.is_not_found());
    }
}
