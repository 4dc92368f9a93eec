//! Planned actions for Keycard resources

use crate::schema::Schema;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value as Json};
use std::collections::HashMap;

/// A planned action for one resource
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Action {
    /// Resource address, `type.name`
    pub id: String,

    pub action_type: ActionType,

    /// Resource type (e.g. "keycard_zone", "keycard_application")
    pub resource_type: String,

    /// Name given to the resource in the desired file
    pub resource_name: String,

    pub description: String,

    /// Changed attributes with their new values
    pub details: HashMap<String, Json>,
}

impl Action {
    pub fn new(action_type: ActionType, resource_type: &str, resource_name: &str) -> Self {
        let id = address(resource_type, resource_name);
        Self {
            description: format!("{} {}", action_type, id),
            id,
            action_type,
            resource_type: resource_type.to_string(),
            resource_name: resource_name.to_string(),
            details: HashMap::new(),
        }
    }

    pub fn with_details(mut self, details: HashMap<String, Json>) -> Self {
        self.details = details;
        self
    }
}

/// State key of a resource
pub fn address(resource_type: &str, resource_name: &str) -> String {
    format!("{}.{}", resource_type, resource_name)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionType {
    Create,
    Update,
    /// Delete then create; an immutable attribute changed
    Replace,
    Delete,
    NoOp,
}

impl std::fmt::Display for ActionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ActionType::Create => write!(f, "create"),
            ActionType::Update => write!(f, "update"),
            ActionType::Replace => write!(f, "replace"),
            ActionType::Delete => write!(f, "delete"),
            ActionType::NoOp => write!(f, "no-op"),
        }
    }
}

/// Result of applying a plan
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ApplyResult {
    pub succeeded: Vec<ActionResult>,
    pub failed: Vec<ActionResult>,
    pub duration_ms: u64,
}

impl ApplyResult {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }

    pub fn add_success(&mut self, action_id: String, message: String) {
        self.succeeded.push(ActionResult {
            action_id,
            success: true,
            message,
            error: None,
        });
    }

    pub fn add_failure(&mut self, action_id: String, error: String) {
        self.failed.push(ActionResult {
            action_id,
            success: false,
            message: String::new(),
            error: Some(error),
        });
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActionResult {
    pub action_id: String,
    pub success: bool,
    pub message: String,
    pub error: Option<String>,
}

/// All actions needed to reach the desired resources
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Plan {
    pub actions: Vec<Action>,
    pub has_changes: bool,
}

impl Plan {
    pub fn new(actions: Vec<Action>) -> Self {
        let has_changes = actions.iter().any(|a| a.action_type != ActionType::NoOp);
        Self {
            actions,
            has_changes,
        }
    }

    pub fn empty() -> Self {
        Self::new(Vec::new())
    }

    pub fn actions_by_type(&self, action_type: ActionType) -> Vec<&Action> {
        self.actions
            .iter()
            .filter(|a| a.action_type == action_type)
            .collect()
    }

    pub fn summary(&self) -> PlanSummary {
        PlanSummary {
            create: self.actions_by_type(ActionType::Create).len(),
            update: self.actions_by_type(ActionType::Update).len(),
            replace: self.actions_by_type(ActionType::Replace).len(),
            delete: self.actions_by_type(ActionType::Delete).len(),
            no_change: self.actions_by_type(ActionType::NoOp).len(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlanSummary {
    pub create: usize,
    pub update: usize,
    pub replace: usize,
    pub delete: usize,
    pub no_change: usize,
}

impl std::fmt::Display for PlanSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} to create, {} to update, {} to replace, {} to delete, {} unchanged",
            self.create, self.update, self.replace, self.delete, self.no_change
        )
    }
}

/// Compare desired configuration with prior state
///
/// Keys missing from `desired` carry no opinion and never produce a change.
/// Computed attributes are ignored. Returns the action and the changed
/// attributes with their desired values.
pub fn plan_change(schema: &Schema, prior: &Json, desired: &Json) -> (ActionType, HashMap<String, Json>) {
    let empty = Map::new();
    let prior = prior.as_object().unwrap_or(&empty);
    let desired = desired.as_object().unwrap_or(&empty);

    let mut changed = HashMap::new();
    let mut replace = false;
    for (key, value) in desired {
        let Some(attribute) = schema.get(key) else {
            continue;
        };
        if !attribute.is_configurable() {
            continue;
        }
        let before = prior.get(key).unwrap_or(&Json::Null);
        if before != value {
            replace |= attribute.requires_replace;
            changed.insert(key.clone(), value.clone());
        }
    }

    let action = if changed.is_empty() {
        ActionType::NoOp
    } else if replace {
        ActionType::Replace
    } else {
        ActionType::Update
    };
    (action, changed)
}

/// Desired configuration with prior values filled in for absent keys
///
/// Used as the plan for an update. With `configurable_only`, computed
/// attributes are left out so a replacement starts clean.
pub fn merge_prior(schema: &Schema, prior: &Json, desired: &Json, configurable_only: bool) -> Json {
    let mut merged = desired.as_object().cloned().unwrap_or_default();
    if let Some(prior) = prior.as_object() {
        for (key, value) in prior {
            if merged.contains_key(key) {
                continue;
            }
            let keep = match schema.get(key) {
                Some(attribute) => !configurable_only || attribute.is_configurable(),
                None => false,
            };
            if keep {
                merged.insert(key.clone(), value.clone());
            }
        }
    }
    Json::Object(merged)
}
