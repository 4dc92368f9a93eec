//! Keycard provider: configuration, handler registry and the plan/apply loop

use crate::action::{Action, ActionType, ApplyResult, Plan, address, merge_prior, plan_change};
use crate::error::{ProviderError, Result};
use crate::references::{self, Resolved};
use crate::resource::{DynamicDataSource, DynamicResource, ProviderData};
use crate::state::{GlobalState, ResourceState};
use crate::{data_sources, resources};
use keycard_api::{ClientCredentials, KeycardClient, RetryConfig, claims, http_client};
use keycard_config::ResolvedConfig;
use serde::{Deserialize, Serialize};
use serde_json::Value as Json;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::time::Instant;

/// Placeholder shown for values that depend on pending creates
pub const KNOWN_AFTER_APPLY: &str = "(known after apply)";

/// One resource in a desired-state file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResourceConfig {
    #[serde(rename = "type")]
    pub resource_type: String,
    pub name: String,
    #[serde(default)]
    pub config: Json,
}

impl ResourceConfig {
    pub fn address(&self) -> String {
        address(&self.resource_type, &self.name)
    }

    fn config_object(&self) -> Json {
        match &self.config {
            Json::Null => Json::Object(Default::default()),
            other => other.clone(),
        }
    }
}

/// Desired resources, in file order
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ResourceSet {
    #[serde(default)]
    pub resources: Vec<ResourceConfig>,
}

impl ResourceSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, resource: ResourceConfig) {
        self.resources.push(resource);
    }

    pub fn get(&self, key: &str) -> Option<&ResourceConfig> {
        self.resources.iter().find(|r| r.address() == key)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ResourceConfig> {
        self.resources.iter()
    }

    /// Resources ordered so that referenced resources come first
    pub fn ordered(&self) -> Result<Vec<&ResourceConfig>> {
        let mut seen = HashSet::new();
        for resource in &self.resources {
            if !seen.insert(resource.address()) {
                return Err(ProviderError::State(format!(
                    "duplicate resource {}",
                    resource.address()
                )));
            }
        }

        let mut ordered = Vec::with_capacity(self.resources.len());
        let mut placed = HashSet::new();
        let mut pending: Vec<&ResourceConfig> = self.resources.iter().collect();
        while !pending.is_empty() {
            let before = pending.len();
            pending.retain(|resource| {
                let ready = references::dependencies(&resource.config)
                    .iter()
                    .all(|dep| placed.contains(dep) || !seen.contains(dep));
                if ready {
                    placed.insert(resource.address());
                    ordered.push(*resource);
                }
                !ready
            });
            if pending.len() == before {
                let names: Vec<String> = pending.iter().map(|r| r.address()).collect();
                return Err(ProviderError::Cycle(names.join(", ")));
            }
        }
        Ok(ordered)
    }
}

/// Build the shared API client from resolved configuration
///
/// The organization comes from configuration when set, otherwise from the
/// organization claim of the first access token.
pub async fn connect(config: ResolvedConfig) -> Result<ProviderData> {
    let http = http_client(config.timeout)?;
    let tokens = Arc::new(
        ClientCredentials::new(
            http.clone(),
            ClientCredentials::token_url_for(&config.endpoint),
            config.client_id,
            config.client_secret,
        )
        .with_retry(RetryConfig::default().with_max_attempts(config.token_attempts)),
    );

    let organization_id = match config.organization_id {
        Some(organization_id) => organization_id,
        None => {
            let organization_id = claims::organization_id(tokens.as_ref()).await?;
            tracing::info!(%organization_id, "Derived organization from access token");
            organization_id
        }
    };

    let client = KeycardClient::builder(tokens)
        .endpoint(config.endpoint)
        .http_client(http)
        .build()?;

    Ok(ProviderData {
        client: Arc::new(client),
        organization_id,
    })
}

/// Registry of every handler plus the operations the CLI drives
pub struct KeycardProvider {
    resources: Vec<Box<dyn DynamicResource>>,
    data_sources: Vec<Box<dyn DynamicDataSource>>,
}

impl Default for KeycardProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl KeycardProvider {
    pub fn new() -> Self {
        Self {
            resources: resources::all(),
            data_sources: data_sources::all(),
        }
    }

    /// Hand the client to every handler; `None` leaves them as they are
    pub fn configure(&mut self, data: Option<ProviderData>) {
        for resource in &mut self.resources {
            resource.configure(data.clone());
        }
        for data_source in &mut self.data_sources {
            data_source.configure(data.clone());
        }
    }

    pub fn resource_types(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.resources.iter().map(|r| r.type_name())
    }

    pub fn data_source_types(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.data_sources.iter().map(|d| d.type_name())
    }

    pub fn resource(&self, type_name: &str) -> Result<&dyn DynamicResource> {
        self.resources
            .iter()
            .find(|r| r.type_name() == type_name)
            .map(|r| r.as_ref())
            .ok_or_else(|| ProviderError::UnknownType(type_name.to_string()))
    }

    pub fn data_source(&self, type_name: &str) -> Result<&dyn DynamicDataSource> {
        self.data_sources
            .iter()
            .find(|d| d.type_name() == type_name)
            .map(|d| d.as_ref())
            .ok_or_else(|| ProviderError::UnknownType(type_name.to_string()))
    }

    /// Compare desired resources with state
    ///
    /// A reference to a resource that is about to be created or replaced is
    /// known only after apply and counts as a change of that attribute.
    pub fn plan(&self, desired: &ResourceSet, state: &GlobalState) -> Result<Plan> {
        let mut actions = Vec::new();
        let mut planning = state.clone();
        let mut pending = HashSet::new();

        for resource in desired.ordered()? {
            let handler = self.resource(&resource.resource_type)?;
            let schema = handler.schema();
            let key = resource.address();
            let resolved = references::resolve(&resource.config_object(), &planning);
            if !resolved.is_complete()
                && !references::dependencies(&resource.config)
                    .iter()
                    .any(|dep| pending.contains(dep))
            {
                complete(&key, resolved.clone())?;
            }

            let action = match state.get_resource(&key) {
                None => Action::new(ActionType::Create, &resource.resource_type, &resource.name)
                    .with_details(details(&resolved.known_config())),
                Some(prior) => {
                    let (mut action_type, mut changed) =
                        plan_change(&schema, &prior.attributes, &resolved.known_config());
                    for attribute in &resolved.unresolved {
                        changed.insert(attribute.clone(), Json::String(KNOWN_AFTER_APPLY.to_string()));
                        if schema.get(attribute).is_some_and(|a| a.requires_replace) {
                            action_type = ActionType::Replace;
                        } else if action_type == ActionType::NoOp {
                            action_type = ActionType::Update;
                        }
                    }
                    Action::new(action_type, &resource.resource_type, &resource.name)
                        .with_details(changed)
                }
            };

            if matches!(action.action_type, ActionType::Create | ActionType::Replace) {
                planning.remove_resource(&key);
                pending.insert(key);
            }
            actions.push(action);
        }

        let mut orphans: Vec<&ResourceState> = state
            .resources
            .values()
            .filter(|r| desired.get(&r.address()).is_none())
            .collect();
        orphans.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        for orphan in orphans {
            self.resource(&orphan.resource_type)?;
            actions.push(Action::new(
                ActionType::Delete,
                &orphan.resource_type,
                &orphan.name,
            ));
        }

        Ok(Plan::new(actions))
    }

    /// Execute a plan, updating `state` after every successful action
    ///
    /// Stops at the first failure; later actions are left unapplied.
    pub async fn apply(
        &self,
        plan: &Plan,
        desired: &ResourceSet,
        state: &mut GlobalState,
    ) -> ApplyResult {
        let start = Instant::now();
        let mut result = ApplyResult::new();

        for action in plan.actions.iter().filter(|a| a.action_type != ActionType::NoOp) {
            match self.apply_action(action, desired, state).await {
                Ok(message) => {
                    tracing::info!(address = %action.id, action = %action.action_type, "Applied");
                    result.add_success(action.id.clone(), message);
                }
                Err(e) => {
                    tracing::error!(address = %action.id, action = %action.action_type, "Apply failed: {}", e);
                    result.add_failure(action.id.clone(), e.to_string());
                    break;
                }
            }
        }

        result.duration_ms = start.elapsed().as_millis() as u64;
        result
    }

    async fn apply_action(
        &self,
        action: &Action,
        desired: &ResourceSet,
        state: &mut GlobalState,
    ) -> Result<String> {
        let handler = self.resource(&action.resource_type)?;

        if action.action_type == ActionType::Delete {
            if let Some(prior) = state.get_resource(&action.id) {
                handler.delete(prior.attributes.clone()).await?;
            }
            state.remove_resource(&action.id);
            return Ok(format!("{} deleted", action.id));
        }

        let resource = desired
            .get(&action.id)
            .ok_or_else(|| ProviderError::State(format!("{} is not in the desired set", action.id)))?;
        let config = complete(&action.id, references::resolve(&resource.config_object(), state))?;
        let schema = handler.schema();
        let prior = state.get_resource(&action.id).map(|r| r.attributes.clone());

        let attributes = match (action.action_type, prior) {
            (ActionType::Create, _) | (ActionType::Replace, None) => handler.create(config).await?,
            (ActionType::Update, Some(prior)) => {
                let plan = merge_prior(&schema, &prior, &config, false);
                handler.update(plan, prior).await?
            }
            (ActionType::Replace, Some(prior)) => {
                handler.delete(prior.clone()).await?;
                state.remove_resource(&action.id);
                let plan = merge_prior(&schema, &prior, &config, true);
                handler.create(plan).await?
            }
            (action_type, _) => {
                return Err(ProviderError::State(format!(
                    "cannot {} {}: no prior state",
                    action_type, action.id
                )));
            }
        };

        state.set_resource(ResourceState::new(
            &action.resource_type,
            &action.resource_name,
            attributes,
        ));
        Ok(format!("{} {}d", action.id, action.action_type))
    }

    /// Re-read every resource in state, dropping those deleted remotely
    ///
    /// Returns the addresses that were dropped.
    pub async fn refresh(&self, state: &mut GlobalState) -> Result<Vec<String>> {
        let mut removed = Vec::new();
        let entries: Vec<ResourceState> = state.resources.values().cloned().collect();

        for entry in entries {
            let handler = self.resource(&entry.resource_type)?;
            match handler.read(entry.attributes.clone()).await? {
                Some(attributes) => {
                    state.set_resource(ResourceState::new(&entry.resource_type, &entry.name, attributes));
                }
                None => {
                    state.remove_resource(&entry.address());
                    removed.push(entry.address());
                }
            }
        }

        Ok(removed)
    }

    /// Refresh `state`, then plan against it
    ///
    /// Resources deleted outside this tool drop out of `state` first and so
    /// plan as creates instead of in-place changes.
    pub async fn refresh_plan(&self, desired: &ResourceSet, state: &mut GlobalState) -> Result<Plan> {
        let removed = self.refresh(state).await?;
        if !removed.is_empty() {
            tracing::info!(count = removed.len(), "Dropped resources deleted remotely");
        }
        self.plan(desired, state)
    }

    /// Import an existing object into state under `type.name`
    pub async fn import(
        &self,
        resource_type: &str,
        name: &str,
        id: &str,
        state: &mut GlobalState,
    ) -> Result<Json> {
        let key = address(resource_type, name);
        if state.get_resource(&key).is_some() {
            return Err(ProviderError::State(format!("{} is already managed", key)));
        }

        let handler = self.resource(resource_type)?;
        let partial = handler.import_state(id)?;
        let attributes = handler
            .read(partial)
            .await?
            .ok_or_else(|| ProviderError::ImportMissing(id.to_string()))?;

        state.set_resource(ResourceState::new(resource_type, name, attributes.clone()));
        tracing::info!(address = %key, id, "Imported");
        Ok(attributes)
    }

    /// Delete one managed resource, or all of them in reverse creation order
    pub async fn destroy(&self, target: Option<&str>, state: &mut GlobalState) -> ApplyResult {
        let start = Instant::now();
        let mut result = ApplyResult::new();

        let mut entries: Vec<ResourceState> = state
            .resources
            .values()
            .filter(|r| target.is_none_or(|t| r.address() == t))
            .cloned()
            .collect();
        entries.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        for entry in entries {
            let key = entry.address();
            let outcome = match self.resource(&entry.resource_type) {
                Ok(handler) => handler.delete(entry.attributes).await,
                Err(e) => Err(e),
            };
            match outcome {
                Ok(()) => {
                    state.remove_resource(&key);
                    result.add_success(key.clone(), format!("{} deleted", key));
                }
                Err(e) => {
                    tracing::error!(address = %key, "Delete failed: {}", e);
                    result.add_failure(key, e.to_string());
                }
            }
        }

        result.duration_ms = start.elapsed().as_millis() as u64;
        result
    }

    /// Run a data source lookup
    pub async fn read_data_source(&self, type_name: &str, config: Json) -> Result<Json> {
        self.data_source(type_name)?.read(config).await
    }
}

fn details(config: &Json) -> HashMap<String, Json> {
    config
        .as_object()
        .map(|map| map.iter().map(|(k, v)| (k.clone(), v.clone())).collect())
        .unwrap_or_default()
}

fn complete(address: &str, resolved: Resolved) -> Result<Json> {
    if resolved.is_complete() {
        Ok(resolved.config)
    } else {
        Err(ProviderError::Unresolved {
            address: address.to_string(),
            attributes: resolved.unresolved.join(", "),
        })
    }
}
