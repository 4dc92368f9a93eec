//! Provider error types

use crate::import::ImportError;
use keycard_api::{ApiError, ClaimError};
use keycard_config::ConfigError;
use thiserror::Error;

/// Errors surfaced to the user by handlers and the provider
#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("invalid provider configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("Keycard API error: {0}")]
    Api(#[from] ApiError),

    #[error("unable to determine organization: {0}")]
    Claim(#[from] ClaimError),

    #[error(transparent)]
    Import(#[from] ImportError),

    #[error("{0} used before the provider was configured")]
    Unconfigured(&'static str),

    #[error("missing required attribute `{0}`")]
    MissingAttribute(&'static str),

    #[error("invalid {type_name} model: {source}")]
    InvalidModel {
        type_name: &'static str,
        #[source]
        source: serde_json::Error,
    },

    #[error("{0}")]
    Immutable(String),

    #[error("unexpected response from Keycard API: {0}")]
    UnexpectedResponse(String),

    #[error("unknown type: {0}")]
    UnknownType(String),

    #[error("cannot import {0}: it does not exist")]
    ImportMissing(String),

    #[error("unresolved reference in {address}: {attributes}")]
    Unresolved { address: String, attributes: String },

    #[error("dependency cycle between {0}")]
    Cycle(String),

    #[error("state error: {0}")]
    State(String),

    #[error("lock acquisition failed: {0}")]
    Lock(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl ProviderError {
    /// True when the API reported the remote object as gone
    pub fn is_not_found(&self) -> bool {
        matches!(self, ProviderError::Api(e) if e.is_not_found())
    }
}

pub type Result<T> = std::result::Result<T, ProviderError>;
