//! Attribute schemas for resources and data sources

use serde::Serialize;

/// How an attribute is set
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AttributeMode {
    /// Must be set in configuration
    Required,
    /// May be set in configuration
    Optional,
    /// Set by the API only
    Computed,
    /// May be set in configuration; the API fills it otherwise
    OptionalComputed,
}

#[derive(Debug, Clone, Serialize)]
pub struct Attribute {
    pub name: &'static str,
    pub mode: AttributeMode,
    pub description: &'static str,
    pub sensitive: bool,
    /// A change forces delete-and-recreate instead of an update
    pub requires_replace: bool,
}

impl Attribute {
    fn new(name: &'static str, mode: AttributeMode, description: &'static str) -> Self {
        Self {
            name,
            mode,
            description,
            sensitive: false,
            requires_replace: false,
        }
    }

    pub fn required(name: &'static str, description: &'static str) -> Self {
        Self::new(name, AttributeMode::Required, description)
    }

    pub fn optional(name: &'static str, description: &'static str) -> Self {
        Self::new(name, AttributeMode::Optional, description)
    }

    pub fn computed(name: &'static str, description: &'static str) -> Self {
        Self::new(name, AttributeMode::Computed, description)
    }

    pub fn optional_computed(name: &'static str, description: &'static str) -> Self {
        Self::new(name, AttributeMode::OptionalComputed, description)
    }

    pub fn sensitive(mut self) -> Self {
        self.sensitive = true;
        self
    }

    pub fn requires_replace(mut self) -> Self {
        self.requires_replace = true;
        self
    }

    /// Whether the user may set this attribute
    pub fn is_configurable(&self) -> bool {
        self.mode != AttributeMode::Computed
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Schema {
    pub description: &'static str,
    pub attributes: Vec<Attribute>,
}

impl Schema {
    pub fn new(description: &'static str) -> Self {
        Self {
            description,
            attributes: Vec::new(),
        }
    }

    pub fn attribute(mut self, attribute: Attribute) -> Self {
        self.attributes.push(attribute);
        self
    }

    pub fn get(&self, name: &str) -> Option<&Attribute> {
        self.attributes.iter().find(|a| a.name == name)
    }
}
