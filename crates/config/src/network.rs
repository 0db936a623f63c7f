use serde::Deserialize;
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum NetworkConfigError {
    #[error("Failed to parse network catalogue JSON: {0}")]
    JsonParseError(#[from] serde_json::Error),

    #[error("Failed to read network catalogue '{path}': {source}")]
    ReadError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Network catalogue is empty")]
    Empty,

    #[error("Network {blockchain}/{network} is declared more than once")]
    Duplicate { blockchain: String, network: String },

    #[error("Invalid node address '{url}' for {network}: {reason}")]
    InvalidNodeAddress {
        network: String,
        url: String,
        reason: String,
    },

    #[error("Invalid genesis hash for {network}: expected 0x-prefixed 32-byte hex")]
    InvalidGenesisHash { network: String },

    #[error("Era period for {network} must be a power of two between 4 and 65536")]
    InvalidEraPeriod { network: String },
}

/// How the runtime encodes the sender and destination of a transfer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum AddressFormat {
    /// `MultiAddress::Id`, a 0x00 variant byte followed by the account id.
    #[default]
    MultiAddress,
    /// Bare 32-byte account id, as used by older runtimes.
    AccountId,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkConfig {
    pub blockchain: String,
    pub network: String,
    pub node_address: String,
    pub ss58_format: u16,
    pub token_symbol: String,
    pub token_decimals: u32,
    pub genesis_hash: String,
    pub spec_name: String,
    pub spec_version: u32,
    pub transaction_version: u32,

    #[serde(default)]
    pub address_format: AddressFormat,

    /// (pallet index, call index) of `Balances.transfer`
    #[serde(default = "default_transfer_call_index")]
    pub transfer_call_index: [u8; 2],

    #[serde(default = "default_era_period")]
    pub era_period: u64,

    /// Recipient of epoch-end treasury emissions
    #[serde(default)]
    pub treasury: Option<String>,
}

fn default_transfer_call_index() -> [u8; 2] {
    [5, 0]
}

fn default_era_period() -> u64 {
    64
}

impl NetworkConfig {
    fn label(&self) -> String {
        format!("{}/{}", self.blockchain, self.network)
    }

    fn validate(&self) -> Result<(), NetworkConfigError> {
        let parsed = url::Url::parse(&self.node_address).map_err(|e| {
            NetworkConfigError::InvalidNodeAddress {
                network: self.label(),
                url: self.node_address.clone(),
                reason: e.to_string(),
            }
        })?;

        match parsed.scheme() {
            "ws" | "wss" | "http" | "https" => {}
            scheme => {
                return Err(NetworkConfigError::InvalidNodeAddress {
                    network: self.label(),
                    url: self.node_address.clone(),
                    reason: format!(
                        "scheme '{}' must be ws://, wss://, http:// or https://",
                        scheme
                    ),
                });
            }
        }

        let genesis = self.genesis_hash.strip_prefix("0x").unwrap_or("");
        if genesis.len() != 64 || !genesis.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(NetworkConfigError::InvalidGenesisHash {
                network: self.label(),
            });
        }

        if !(4..=65536).contains(&self.era_period) || !self.era_period.is_power_of_two() {
            return Err(NetworkConfigError::InvalidEraPeriod {
                network: self.label(),
            });
        }

        Ok(())
    }
}

/// Every network this process serves, in declaration order.
#[derive(Debug, Clone)]
pub struct NetworkConfigs {
    networks: Vec<NetworkConfig>,
}

impl NetworkConfigs {
    pub fn load_embedded() -> Result<Self, NetworkConfigError> {
        const CONFIG_JSON: &str = include_str!("networks.json");
        Self::from_json(CONFIG_JSON)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, NetworkConfigError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| NetworkConfigError::ReadError {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json(&json)
    }

    pub fn from_json(json: &str) -> Result<Self, NetworkConfigError> {
        let networks: Vec<NetworkConfig> = serde_json::from_str(json)?;
        let configs = Self { networks };
        configs.validate()?;
        Ok(configs)
    }

    fn validate(&self) -> Result<(), NetworkConfigError> {
        if self.networks.is_empty() {
            return Err(NetworkConfigError::Empty);
        }

        let mut seen = std::collections::HashSet::new();
        for network in &self.networks {
            network.validate()?;
            let key = (
                network.blockchain.to_lowercase(),
                network.network.to_lowercase(),
            );
            if !seen.insert(key) {
                return Err(NetworkConfigError::Duplicate {
                    blockchain: network.blockchain.clone(),
                    network: network.network.clone(),
                });
            }
        }

        Ok(())
    }

    /// Case-insensitive lookup by (blockchain, network).
    pub fn get(&self, blockchain: &str, network: &str) -> Option<&NetworkConfig> {
        self.networks.iter().find(|n| {
            n.blockchain.eq_ignore_ascii_case(blockchain) && n.network.eq_ignore_ascii_case(network)
        })
    }

    pub fn iter(&self) -> impl Iterator<Item = &NetworkConfig> {
        self.networks.iter()
    }

    pub fn len(&self) -> usize {
        self.networks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.networks.is_empty()
    }
}

impl Default for NetworkConfigs {
    fn default() -> Self {
        Self::load_embedded().expect("Failed to load embedded network catalogue")
    }
}
