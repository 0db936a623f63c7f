// Copyright (C) 2026 Parity Technologies (UK) Ltd.
// SPDX-License-Identifier: GPL-3.0-or-later

//! Per-network encoding parameters.
//!
//! A [`ChainRegistry`] carries what the offline construction stages need to
//! build and read transfer extrinsics byte-for-byte: the address encoding,
//! the call index of `Balances.transfer`, runtime versions and the genesis
//! hash. It is built from configuration and refreshed from live metadata
//! when a connection to the network is first opened.

use crate::types::{BlockHash, Currency, HashParseError, NetworkIdentifier};
use config::{AddressFormat, NetworkConfig};
use sp_core::crypto::{AccountId32, Ss58AddressFormat, Ss58Codec};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("Invalid genesis hash for {network}: {source}")]
    InvalidGenesis {
        network: String,
        #[source]
        source: HashParseError,
    },
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum AddressError {
    #[error("Invalid SS58 address '{0}'")]
    Invalid(String),

    #[error("Address '{address}' uses SS58 format {found}, expected {expected}")]
    WrongFormat {
        address: String,
        found: u16,
        expected: u16,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChainRegistry {
    pub network: NetworkIdentifier,
    pub ss58_format: u16,
    pub address_format: AddressFormat,
    pub transfer_call_index: [u8; 2],
    pub spec_version: u32,
    pub transaction_version: u32,
    pub genesis_hash: BlockHash,
    pub currency: Currency,
    pub era_period: u64,
    pub treasury: Option<String>,
}

impl ChainRegistry {
    pub fn from_config(config: &NetworkConfig) -> Result<Self, RegistryError> {
        let genesis_hash =
            config
                .genesis_hash
                .parse()
                .map_err(|source| RegistryError::InvalidGenesis {
                    network: format!("{}/{}", config.blockchain, config.network),
                    source,
                })?;

        Ok(Self {
            network: NetworkIdentifier {
                blockchain: config.blockchain.clone(),
                network: config.network.clone(),
                sub_network_identifier: None,
            },
            ss58_format: config.ss58_format,
            address_format: config.address_format,
            transfer_call_index: config.transfer_call_index,
            spec_version: config.spec_version,
            transaction_version: config.transaction_version,
            genesis_hash,
            currency: Currency {
                symbol: config.token_symbol.clone(),
                decimals: config.token_decimals,
                metadata: None,
            },
            era_period: config.era_period,
            treasury: config.treasury.clone(),
        })
    }

    pub fn encode_address(&self, account: &AccountId32) -> String {
        account.to_ss58check_with_version(Ss58AddressFormat::custom(self.ss58_format))
    }

    /// Parses an SS58 address, requiring this network's address format.
    pub fn decode_address(&self, address: &str) -> Result<AccountId32, AddressError> {
        let (account, format) = AccountId32::from_ss58check_with_version(address)
            .map_err(|_| AddressError::Invalid(address.to_string()))?;
        let found = u16::from(format);
        if found != self.ss58_format {
            return Err(AddressError::WrongFormat {
                address: address.to_string(),
                found,
                expected: self.ss58_format,
            });
        }
        Ok(account)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_fixtures::test_registry;

    #[test]
    fn test_from_embedded_config() {
        let configs = config::NetworkConfigs::load_embedded().unwrap();
        let nodle = configs.get("Nodle", "mainnet").unwrap();
        let registry = ChainRegistry::from_config(nodle).unwrap();

        assert_eq!(registry.ss58_format, 37);
        assert_eq!(registry.currency.symbol, "NODL");
        assert_eq!(registry.address_format, AddressFormat::AccountId);
        assert_eq!(registry.era_period, 64);
    }

    #[test]
    fn test_address_round_trip() {
        let registry = test_registry();
        let account = AccountId32::new([7u8; 32]);
        let address = registry.encode_address(&account);
        assert_eq!(registry.decode_address(&address).unwrap(), account);
    }

    #[test]
    fn test_address_wrong_format_rejected() {
        let registry = test_registry();
        let account = AccountId32::new([7u8; 32]);
        let polkadot = account.to_ss58check_with_version(Ss58AddressFormat::custom(0));
        assert!(matches!(
            registry.decode_address(&polkadot),
            Err(AddressError::WrongFormat { found: 0, .. })
        ));
        assert!(matches!(
            registry.decode_address("not-an-address"),
            Err(AddressError::Invalid(_))
        ));
    }
}
