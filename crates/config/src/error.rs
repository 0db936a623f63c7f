use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to load configuration from environment: {0}")]
    EnvError(#[from] envy::Error),

    #[error("Configuration validation failed: {0}")]
    ValidateError(String),

    #[error("Network configuration error: {0}")]
    NetworkError(#[from] crate::network::NetworkConfigError),
}
