//! Keycard API client
//!
//! Typed client for the Keycard identity and access management API.
//!
//! # Authentication
//!
//! Requests carry a bearer token from a [`TokenSource`]. The usual source is
//! [`ClientCredentials`], an OAuth2 client-credentials grant with token caching
//! and retries. Only token acquisition is retried; API calls fail on the
//! first error so callers see the real status.
//!
//! # Nullable fields
//!
//! Optional request and response fields use [`Nullable`], which keeps an
//! omitted field, an explicit `null` and a value apart.
//!
//! # Example
//!
//! ```ignore
//! use keycard_api::{ClientCredentials, KeycardClient, http_client};
//! use std::sync::Arc;
//!
//! let http = http_client(std::time::Duration::from_secs(5))?;
//! let tokens = Arc::new(ClientCredentials::new(
//!     http.clone(),
//!     ClientCredentials::token_url_for("https://api.keycard.ai"),
//!     "client-id",
//!     "client-secret",
//! ));
//! let client = KeycardClient::builder(tokens).http_client(http).build()?;
//!
//! let zone = client.get_zone("org-1", "zone-1").await?;
//! ```

pub mod applications;
pub mod auth;
pub mod claims;
pub mod client;
pub mod credentials;
pub mod dependencies;
pub mod error;
pub mod kms;
pub mod nullable;
pub mod providers;
pub mod resources;
pub mod retry;
pub mod sso;
pub mod zones;

pub use applications::{
    Application, ApplicationMetadata, CreateApplicationRequest, UpdateApplicationRequest,
};
pub use auth::{ClientCredentials, StaticToken, TokenSource};
pub use claims::{ClaimError, ORGANIZATION_ID_CLAIM};
pub use client::{KeycardClient, KeycardClientBuilder, http_client};
pub use credentials::{ApplicationCredential, CreateCredentialRequest, CredentialKind, NewCredential};
pub use dependencies::ApplicationDependency;
pub use error::{ApiError, Result, TokenError};
pub use kms::KmsKeyPolicy;
pub use nullable::Nullable;
pub use providers::{CreateProviderRequest, Provider, UpdateProviderRequest};
pub use resources::{CreateResourceRequest, Resource, UpdateResourceRequest};
pub use reqwest::StatusCode;
pub use retry::RetryConfig;
pub use sso::{CreateSsoConnectionRequest, SsoConnection, UpdateSsoConnectionRequest};
pub use zones::{CreateZoneRequest, EncryptionKey, UpdateZoneRequest, Zone, ZoneOAuth2};
