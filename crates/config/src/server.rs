use crate::ConfigError;
use serde::Deserialize;
use std::net::{IpAddr, SocketAddr};

/// Where the Rosetta HTTP server listens and how much it accepts per request.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Env: ROSETTA_HOST (default 0.0.0.0)
    pub bind_host: String,

    /// Env: ROSETTA_PORT (default 8080)
    pub port: u16,

    /// Largest request body accepted, in bytes. Larger bodies are rejected
    /// before reaching a handler.
    ///
    /// Env: ROSETTA_REQUEST_LIMIT (default 2 MiB)
    pub request_limit_bytes: usize,
}

pub(crate) fn default_bind_host() -> String {
    "0.0.0.0".to_string()
}

pub(crate) fn default_port() -> u16 {
    8080
}

pub(crate) fn default_request_limit() -> usize {
    2 * 1024 * 1024
}

impl ServerConfig {
    /// Socket address to bind. Only valid after [`ServerConfig::validate`].
    pub fn listen_addr(&self) -> Result<SocketAddr, ConfigError> {
        let ip: IpAddr = self.bind_host.parse().map_err(|_| {
            ConfigError::ValidateError(format!("Invalid bind host '{}'", self.bind_host))
        })?;
        Ok(SocketAddr::new(ip, self.port))
    }

    pub(crate) fn validate(&self) -> Result<(), ConfigError> {
        if self.port == 0 {
            return Err(ConfigError::ValidateError(
                "Server port cannot be 0".to_string(),
            ));
        }
        if self.request_limit_bytes == 0 {
            return Err(ConfigError::ValidateError(
                "Request limit cannot be 0".to_string(),
            ));
        }
        self.listen_addr().map(|_| ())
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_host: default_bind_host(),
            port: default_port(),
            request_limit_bytes: default_request_limit(),
        }
    }
}
