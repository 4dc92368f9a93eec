use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error(
        "missing provider attribute `{attribute}`: set it in the provider configuration \
        or through the {env_var} environment variable"
    )]
    MissingCredential {
        attribute: &'static str,
        env_var: &'static str,
    },

    #[error(
        "config file not found. Checked:\n\
        - KEYCARD_CONFIG_PATH\n\
        - current directory: keycard.local.yaml, keycard.yaml\n\
        - ~/.config/keycard/config.yaml"
    )]
    ConfigFileNotFound,

    #[error("invalid endpoint `{0}`: expected an http:// or https:// URL")]
    InvalidEndpoint(String),

    #[error("invalid timeout_secs: must be at least 1")]
    InvalidTimeout,

    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, ConfigError>;
