use crate::ConfigError;

/// Settings for talking to the chain nodes.
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    /// Upper bound for a critical-path RPC call (block, events, account state)
    ///
    /// Env: ROSETTA_REQUEST_TIMEOUT_MS
    /// Default: 30000
    pub request_timeout_ms: u64,

    /// Upper bound for a single fee estimate; on expiry the fee defaults to zero
    ///
    /// Env: ROSETTA_FEE_TIMEOUT_MS
    /// Default: 5000
    pub fee_timeout_ms: u64,

    /// Number of fee lookups run in parallel while assembling a block
    ///
    /// Env: ROSETTA_MAX_CONCURRENCY
    /// Default: 4
    pub max_concurrency: usize,

    /// Serve only offline construction endpoints and never open a connection
    ///
    /// Env: ROSETTA_OFFLINE (or the --offline flag)
    /// Default: false
    pub offline: bool,
}

pub(crate) fn default_request_timeout_ms() -> u64 {
    30_000
}

pub(crate) fn default_fee_timeout_ms() -> u64 {
    5_000
}

pub(crate) fn default_max_concurrency() -> usize {
    4
}

impl GatewayConfig {
    pub(crate) fn validate(&self) -> Result<(), ConfigError> {
        if self.request_timeout_ms == 0 || self.fee_timeout_ms == 0 {
            return Err(ConfigError::ValidateError(
                "Gateway timeouts must be greater than 0".to_string(),
            ));
        }

        if self.max_concurrency == 0 {
            return Err(ConfigError::ValidateError(
                "Gateway concurrency must be at least 1".to_string(),
            ));
        }

        Ok(())
    }
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            request_timeout_ms: default_request_timeout_ms(),
            fee_timeout_ms: default_fee_timeout_ms(),
            max_concurrency: default_max_concurrency(),
            offline: false,
        }
    }
}
