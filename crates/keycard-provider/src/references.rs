//! `${type.name.attribute}` references between resources in a desired file
//!
//! A string that is exactly one reference takes the referenced value with its
//! JSON type. References embedded in longer strings are interpolated and
//! must point at strings, numbers or booleans.

use crate::action::address;
use crate::state::GlobalState;
use regex::{Captures, Regex};
use serde_json::{Map, Value as Json};
use std::sync::LazyLock;

static REFERENCE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\$\{\s*([A-Za-z0-9_]+)\.([A-Za-z0-9_-]+)\.([A-Za-z0-9_]+)\s*\}")
        .expect("reference pattern is valid")
});

/// Configuration with references replaced by state values
#[derive(Debug, Clone, PartialEq)]
pub struct Resolved {
    pub config: Json,
    /// Top-level attributes holding references that state cannot satisfy yet
    pub unresolved: Vec<String>,
}

impl Resolved {
    pub fn is_complete(&self) -> bool {
        self.unresolved.is_empty()
    }

    /// Configuration without the unresolved attributes
    pub fn known_config(&self) -> Json {
        match &self.config {
            Json::Object(map) => Json::Object(
                map.iter()
                    .filter(|(key, _)| !self.unresolved.contains(key))
                    .map(|(key, value)| (key.clone(), value.clone()))
                    .collect(),
            ),
            other => other.clone(),
        }
    }
}

/// Addresses (`type.name`) referenced anywhere in `config`
pub fn dependencies(config: &Json) -> Vec<String> {
    let mut found = Vec::new();
    collect(config, &mut found);
    found.sort();
    found.dedup();
    found
}

fn collect(value: &Json, found: &mut Vec<String>) {
    match value {
        Json::String(s) => {
            for caps in REFERENCE.captures_iter(s) {
                found.push(address(&caps[1], &caps[2]));
            }
        }
        Json::Array(items) => items.iter().for_each(|item| collect(item, found)),
        Json::Object(map) => map.values().for_each(|item| collect(item, found)),
        _ => {}
    }
}

fn lookup(state: &GlobalState, caps: &Captures) -> Option<Json> {
    let resource = state.get_resource(&address(&caps[1], &caps[2]))?;
    resource
        .attributes
        .get(&caps[3])
        .filter(|value| !value.is_null())
        .cloned()
}

fn substitute(value: &Json, state: &GlobalState) -> Option<Json> {
    match value {
        Json::String(s) => {
            if let Some(caps) = REFERENCE.captures(s)
                && caps.get(0).map(|m| m.as_str().len()) == Some(s.len())
            {
                return lookup(state, &caps);
            }

            let mut complete = true;
            let replaced = REFERENCE.replace_all(s, |caps: &Captures| match lookup(state, caps) {
                Some(Json::String(v)) => v,
                Some(Json::Number(n)) => n.to_string(),
                Some(Json::Bool(b)) => b.to_string(),
                _ => {
                    complete = false;
                    caps[0].to_string()
                }
            });
            complete.then(|| Json::String(replaced.into_owned()))
        }
        Json::Array(items) => items
            .iter()
            .map(|item| substitute(item, state))
            .collect::<Option<Vec<_>>>()
            .map(Json::Array),
        Json::Object(map) => map
            .iter()
            .map(|(key, item)| substitute(item, state).map(|v| (key.clone(), v)))
            .collect::<Option<Map<_, _>>>()
            .map(Json::Object),
        other => Some(other.clone()),
    }
}

/// Replace references in a resource configuration object
pub fn resolve(config: &Json, state: &GlobalState) -> Resolved {
    let Json::Object(map) = config else {
        return Resolved {
            config: config.clone(),
            unresolved: Vec::new(),
        };
    };

    let mut resolved = Map::new();
    let mut unresolved = Vec::new();
    for (key, value) in map {
        match substitute(value, state) {
            Some(v) => {
                resolved.insert(key.clone(), v);
            }
            None => {
                unresolved.push(key.clone());
                resolved.insert(key.clone(), value.clone());
            }
        }
    }

    Resolved {
        config: Json::Object(resolved),
        unresolved,
    }
}
