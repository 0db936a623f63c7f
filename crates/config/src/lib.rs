mod args;
mod error;
mod server;
mod gateway;
mod log;
mod network;

pub use args::Args;
pub use error::ConfigError;
pub use server::ServerConfig;
pub use gateway::GatewayConfig;
pub use log::LogConfig;
pub use network::{AddressFormat, NetworkConfig, NetworkConfigError, NetworkConfigs};

use serde::Deserialize;

/// Flat view of the `ROSETTA_*` environment, mapped onto the nested config below.
#[derive(Debug, Deserialize)]
struct EnvConfig {
    #[serde(default = "server::default_bind_host")]
    host: String,
    #[serde(default = "server::default_port")]
    port: u16,
    #[serde(default = "server::default_request_limit")]
    request_limit: usize,

    #[serde(default = "log::default_level")]
    log_level: String,
    #[serde(default)]
    log_json: bool,
    #[serde(default)]
    log_strip_ansi: bool,
    #[serde(default)]
    log_write: bool,
    #[serde(default = "log::default_write_path")]
    log_write_path: String,
    #[serde(default = "log::default_write_max_file_size")]
    log_write_max_file_size: u64,
    #[serde(default = "log::default_write_max_files")]
    log_write_max_files: usize,

    #[serde(default = "gateway::default_request_timeout_ms")]
    request_timeout_ms: u64,
    #[serde(default = "gateway::default_fee_timeout_ms")]
    fee_timeout_ms: u64,
    #[serde(default = "gateway::default_max_concurrency")]
    max_concurrency: usize,
    #[serde(default)]
    offline: bool,

    #[serde(default)]
    networks_file: Option<String>,
}

#[derive(Debug, Clone)]
pub struct RosettaConfig {
    pub server: ServerConfig,
    pub log: LogConfig,
    pub gateway: GatewayConfig,
    pub networks: NetworkConfigs,
}

impl RosettaConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        let env = envy::prefixed("ROSETTA_").from_env::<EnvConfig>()?;
        let config = Self::from_env_config(env)?;
        config.validate()?;
        Ok(config)
    }

    fn from_env_config(env: EnvConfig) -> Result<Self, ConfigError> {
        let networks = match env.networks_file.as_deref() {
            Some(path) if !path.is_empty() => NetworkConfigs::from_file(path)?,
            _ => NetworkConfigs::load_embedded()?,
        };

        Ok(Self {
            server: ServerConfig {
                bind_host: env.host,
                port: env.port,
                request_limit_bytes: env.request_limit,
            },
            log: LogConfig {
                level: env.log_level,
                json: env.log_json,
                strip_ansi: env.log_strip_ansi,
                write: env.log_write,
                write_path: env.log_write_path,
                write_max_file_size: env.log_write_max_file_size,
                write_max_files: env.log_write_max_files,
            },
            gateway: GatewayConfig {
                request_timeout_ms: env.request_timeout_ms,
                fee_timeout_ms: env.fee_timeout_ms,
                max_concurrency: env.max_concurrency,
                offline: env.offline,
            },
            networks,
        })
    }

    fn validate(&self) -> Result<(), ConfigError> {
        self.server.validate()?;
        self.log.validate()?;
        self.gateway.validate()?;
        Ok(())
    }
}

impl Default for RosettaConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            log: LogConfig::default(),
            gateway: GatewayConfig::default(),
            networks: NetworkConfigs::default(),
        }
    }
}
