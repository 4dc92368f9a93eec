//! Keycard provider
//!
//! Declarative management of Keycard zones, identity providers, applications,
//! protected resources, application credentials, dependencies and the
//! organization SSO connection.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────┐
//! │                   keycard CLI                    │
//! │        (plan / apply / refresh / import)         │
//! └─────────────────┬───────────────────────────────┘
//!                   │
//! ┌─────────────────▼───────────────────────────────┐
//! │                keycard-provider                  │
//! │  ┌──────────────────────────────────────────┐   │
//! │  │  KeycardProvider (registry, plan/apply)   │   │
//! │  └──────────────────────────────────────────┘   │
//! │  ┌──────────────┐  ┌──────────────┐             │
//! │  │   handlers   │  │  State Mgmt  │             │
//! │  └──────────────┘  └──────────────┘             │
//! └───────┬─────────────────────────────────────────┘
//!         │
//! ┌───────▼───────┐
//! │  keycard-api  │
//! └───────────────┘
//! ```
//!
//! Handlers work on typed models whose attributes are [`Value`]s, and map
//! them to the API's [`keycard_api::Nullable`] fields with the functions in
//! [`reconcile`].

pub mod action;
pub mod data_sources;
pub mod error;
pub mod import;
pub mod provider;
pub mod reconcile;
pub mod references;
pub mod resource;
pub mod resources;
pub mod schema;
pub mod state;
pub mod value;

pub use action::{Action, ActionResult, ActionType, ApplyResult, Plan, PlanSummary};
pub use error::{ProviderError, Result};
pub use import::{ImportError, ImportId, ImportPattern};
pub use provider::{KNOWN_AFTER_APPLY, KeycardProvider, ResourceConfig, ResourceSet, connect};
pub use resource::{
    ClientSlot, DataSource, DynamicDataSource, DynamicResource, ProviderData, ReadOutcome,
    Resource,
};
pub use schema::{Attribute, AttributeMode, Schema};
pub use state::{DEFAULT_STATE_DIR, GlobalState, ResourceState, StateLock, StateManager};
pub use value::Value;
