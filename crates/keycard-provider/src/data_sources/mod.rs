//! Read-only lookups

pub mod application;
pub mod identity_provider;
pub mod kms_key_policy;
pub mod protected_resource;
pub mod zone;

pub use application::ApplicationDataSource;
pub use identity_provider::ProviderDataSource;
pub use kms_key_policy::{KmsKeyPolicyDataSource, KmsKeyPolicyModel};
pub use protected_resource::ResourceDataSource;
pub use zone::ZoneDataSource;

use crate::resource::DynamicDataSource;

/// Every data source, unconfigured
pub fn all() -> Vec<Box<dyn DynamicDataSource>> {
    vec![
        Box::new(ZoneDataSource::new()),
        Box::new(ApplicationDataSource::new()),
        Box::new(ProviderDataSource::new()),
        Box::new(ResourceDataSource::new()),
        Box::new(KmsKeyPolicyDataSource::new()),
    ]
}
