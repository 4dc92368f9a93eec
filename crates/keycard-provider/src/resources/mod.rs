//! Managed resource handlers

pub mod application;
pub mod credential;
pub mod dependency;
pub mod identity_provider;
pub mod protected_resource;
pub mod sso_connection;
pub mod zone;

pub use application::{ApplicationModel, ApplicationResource};
pub use credential::{
    ApplicationPasswordResource, CredentialModel, CredentialResource, PasswordModel,
    TokenCredentialModel, TokenCredentialResource, UrlCredentialModel, UrlCredentialResource,
};
pub use dependency::{DependencyModel, DependencyResource};
pub use identity_provider::{ProviderModel, ProviderResource};
pub use protected_resource::{ProtectedResource, ResourceModel};
pub use sso_connection::{SsoConnectionModel, SsoConnectionResource};
pub use zone::{ZoneModel, ZoneResource};

use crate::resource::DynamicResource;

/// Every resource handler, unconfigured
pub fn all() -> Vec<Box<dyn DynamicResource>> {
    vec![
        Box::new(ZoneResource::new()),
        Box::new(ProviderResource::new()),
        Box::new(ApplicationResource::new()),
        Box::new(ProtectedResource::new()),
        Box::new(ApplicationPasswordResource::new()),
        Box::new(UrlCredentialResource::new()),
        Box::new(TokenCredentialResource::new()),
        Box::new(DependencyResource::new()),
        Box::new(SsoConnectionResource::new()),
    ]
}
