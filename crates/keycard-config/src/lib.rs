//! Keycard provider configuration
//!
//! Provider attributes come from an optional config file and are completed
//! from `KEYCARD_*` environment variables. An environment variable is only
//! consulted when the matching attribute is empty.

pub mod error;

pub use error::*;

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const DEFAULT_ENDPOINT: &str = "https://api.keycard.ai";
pub const DEFAULT_TIMEOUT_SECS: u64 = 5;
pub const DEFAULT_TOKEN_ATTEMPTS: u32 = 3;

pub const ENV_CLIENT_ID: &str = "KEYCARD_CLIENT_ID";
pub const ENV_CLIENT_SECRET: &str = "KEYCARD_CLIENT_SECRET";
pub const ENV_ORGANIZATION_ID: &str = "KEYCARD_ORGANIZATION_ID";
pub const ENV_ENDPOINT: &str = "KEYCARD_ENDPOINT";
pub const ENV_CONFIG_PATH: &str = "KEYCARD_CONFIG_PATH";

/// Provider attributes as written by the user.
///
/// Empty strings mean "not set" so that environment fallbacks apply.
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderConfig {
    pub client_id: String,
    pub client_secret: String,
    pub organization_id: String,
    pub endpoint: String,
    /// Transport timeout for every API call
    pub timeout_secs: Option<u64>,
    /// Attempts made when acquiring an access token
    pub token_attempts: Option<u32>,
}

impl fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProviderConfig")
            .field("client_id", &self.client_id)
            .field("client_secret", &redact(&self.client_secret))
            .field("organization_id", &self.organization_id)
            .field("endpoint", &self.endpoint)
            .field("timeout_secs", &self.timeout_secs)
            .field("token_attempts", &self.token_attempts)
            .finish()
    }
}

impl ProviderConfig {
    /// Load provider attributes from a YAML (or JSON) file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        let config = serde_yaml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        tracing::debug!("Loaded provider configuration from {}", path.display());
        Ok(config)
    }

    /// Load the discovered config file, or start empty when there is none
    pub fn discover() -> Result<Self> {
        match find_config_file() {
            Ok(path) => Self::load(path),
            Err(ConfigError::ConfigFileNotFound) => {
                tracing::debug!("No config file found, relying on environment variables");
                Ok(Self::default())
            }
            Err(e) => Err(e),
        }
    }

    /// Fill empty attributes from their environment variables
    pub fn with_env_fallbacks(mut self) -> Self {
        fill_from_env(&mut self.client_id, ENV_CLIENT_ID);
        fill_from_env(&mut self.client_secret, ENV_CLIENT_SECRET);
        fill_from_env(&mut self.organization_id, ENV_ORGANIZATION_ID);
        fill_from_env(&mut self.endpoint, ENV_ENDPOINT);
        self
    }

    /// Validate the attributes and apply defaults
    pub fn resolve(self) -> Result<ResolvedConfig> {
        if self.client_id.is_empty() {
            return Err(ConfigError::MissingCredential {
                attribute: "client_id",
                env_var: ENV_CLIENT_ID,
            });
        }
        if self.client_secret.is_empty() {
            return Err(ConfigError::MissingCredential {
                attribute: "client_secret",
                env_var: ENV_CLIENT_SECRET,
            });
        }

        let endpoint = if self.endpoint.is_empty() {
            DEFAULT_ENDPOINT.to_string()
        } else {
            self.endpoint.trim_end_matches('/').to_string()
        };
        if !endpoint.starts_with("https://") && !endpoint.starts_with("http://") {
            return Err(ConfigError::InvalidEndpoint(endpoint));
        }
        let timeout_secs = self.timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS);
        if timeout_secs == 0 {
            return Err(ConfigError::InvalidTimeout);
        }

        Ok(ResolvedConfig {
            client_id: self.client_id,
            client_secret: self.client_secret,
            organization_id: Some(self.organization_id).filter(|o| !o.is_empty()),
            endpoint,
            timeout: Duration::from_secs(timeout_secs),
            token_attempts: self.token_attempts.unwrap_or(DEFAULT_TOKEN_ATTEMPTS).max(1),
        })
    }
}

/// Validated provider configuration
#[derive(Clone)]
pub struct ResolvedConfig {
    pub client_id: String,
    pub client_secret: String,
    /// `None` means the organization is taken from the access token
    pub organization_id: Option<String>,
    pub endpoint: String,
    pub timeout: Duration,
    pub token_attempts: u32,
}

impl fmt::Debug for ResolvedConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResolvedConfig")
            .field("client_id", &self.client_id)
            .field("client_secret", &redact(&self.client_secret))
            .field("organization_id", &self.organization_id)
            .field("endpoint", &self.endpoint)
            .field("timeout", &self.timeout)
            .field("token_attempts", &self.token_attempts)
            .finish()
    }
}

fn redact(secret: &str) -> &'static str {
    if secret.is_empty() { "" } else { "<redacted>" }
}

fn fill_from_env(value: &mut String, env_var: &str) {
    if !value.is_empty() {
        return;
    }
    if let Ok(from_env) = std::env::var(env_var)
        && !from_env.is_empty()
    {
        tracing::debug!("Using {} from the environment", env_var);
        *value = from_env;
    }
}

/// Get the Keycard configuration directory
pub fn get_config_dir() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("keycard"))
}

/// Locate the provider config file
///
/// Search order:
/// 1. `KEYCARD_CONFIG_PATH` (direct path)
/// 2. Current directory: keycard.local.yaml, keycard.yaml
/// 3. ~/.config/keycard/config.yaml
pub fn find_config_file() -> Result<PathBuf> {
    if let Ok(config_path) = std::env::var(ENV_CONFIG_PATH) {
        let path = PathBuf::from(config_path);
        if path.exists() {
            return Ok(path);
        }
        tracing::warn!(
            "{} points at {} which does not exist",
            ENV_CONFIG_PATH,
            path.display()
        );
    }

    let current_dir = std::env::current_dir()?;
    for filename in ["keycard.local.yaml", "keycard.yaml"] {
        let path = current_dir.join(filename);
        if path.exists() {
            return Ok(path);
        }
    }

    if let Some(config_dir) = get_config_dir() {
        let global_config = config_dir.join("config.yaml");
        if global_config.exists() {
            return Ok(global_config);
        }
    }

    Err(ConfigError::ConfigFileNotFound)
}
