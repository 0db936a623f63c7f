// Copyright (C) 2026 Parity Technologies (UK) Ltd.
// SPDX-License-Identifier: GPL-3.0-or-later

//! [`ChainGateway`] over a Substrate node's JSON-RPC interface.
//!
//! Header, pool, fee and submission calls go through [`NodeRpc`].
//! Extrinsics, events and storage go through subxt's `OnlineClient`, which
//! decodes them against the metadata of the block being read.

use super::error::{ChainError, ChainResult, with_timeout};
use super::gateway::ChainGateway;
use super::node_rpc::NodeRpc;
use super::types::{
    AccountState, BlockHeader, EventPhase, NativeBlock, NativeEvent, NativeExtrinsic,
    RuntimeVersion,
};
use super::value::ValueConverter;
use crate::types::BlockHash;
use crate::utils::{json_to_u64, json_to_u128};
use async_trait::async_trait;
use parity_scale_codec::Decode;
use serde_json::Value;
use sp_core::H256;
use sp_core::crypto::{AccountId32, Ss58AddressFormat, Ss58Codec};
use subxt::{OnlineClient, SubstrateConfig};
use subxt_rpcs::client::RpcClient;
use tracing::{debug, instrument, warn};

// ================================================================================================
// SCALE Decode Types
// ================================================================================================

#[derive(Debug, Clone, Decode)]
#[allow(dead_code)]
struct AccountDataModern {
    free: u128,
    reserved: u128,
    frozen: u128,
    flags: u128,
}

#[derive(Debug, Clone, Decode)]
#[allow(dead_code)]
struct AccountDataLegacy {
    free: u128,
    reserved: u128,
    misc_frozen: u128,
    fee_frozen: u128,
}

#[derive(Debug, Clone, Decode)]
#[allow(dead_code)]
struct AccountInfoModern {
    nonce: u32,
    consumers: u32,
    providers: u32,
    sufficients: u32,
    data: AccountDataModern,
}

#[derive(Debug, Clone, Decode)]
#[allow(dead_code)]
struct AccountInfoLegacy {
    nonce: u32,
    consumers: u32,
    providers: u32,
    sufficients: u32,
    data: AccountDataLegacy,
}

/// Older runtimes without `sufficients`.
#[derive(Debug, Clone, Decode)]
#[allow(dead_code)]
struct AccountInfoRefCount {
    nonce: u32,
    refcount: u32,
    data: AccountDataLegacy,
}

/// Decodes `System::Account`, trying the current layout before older ones.
///
/// Modern and legacy layouts have the same size, so the first successful
/// decode wins and `free`/`nonce` sit at the same offsets in both.
fn decode_account_info(bytes: &[u8]) -> Option<AccountState> {
    if let Ok(info) = AccountInfoModern::decode(&mut &bytes[..]) {
        return Some(AccountState {
            nonce: info.nonce.into(),
            free: info.data.free,
        });
    }
    if let Ok(info) = AccountInfoLegacy::decode(&mut &bytes[..]) {
        return Some(AccountState {
            nonce: info.nonce.into(),
            free: info.data.free,
        });
    }
    AccountInfoRefCount::decode(&mut &bytes[..])
        .ok()
        .map(|info| AccountState {
            nonce: info.nonce.into(),
            free: info.data.free,
        })
}

/// Strips the `MultiAddress::Id` variant byte from a signer address, if present.
fn signer_account(address_bytes: &[u8]) -> Option<AccountId32> {
    let raw = match address_bytes.len() {
        33 if address_bytes[0] == 0 => &address_bytes[1..],
        32 => address_bytes,
        _ => return None,
    };
    <[u8; 32]>::try_from(raw).ok().map(AccountId32::from)
}

pub struct RpcGateway {
    client: OnlineClient<SubstrateConfig>,
    node: NodeRpc,
    converter: ValueConverter,
    ss58_format: u16,
    timeout_ms: u64,
}

impl RpcGateway {
    #[instrument(skip_all, fields(url = %url))]
    pub async fn connect(url: &str, ss58_format: u16, timeout_ms: u64) -> ChainResult<Self> {
        debug!("Connecting to node");
        let rpc = with_timeout("connect", timeout_ms, async {
            RpcClient::from_insecure_url(url)
                .await
                .map_err(|e| ChainError::ConnectionFailed(e.to_string()))
        })
        .await?;
        let gateway = Self::from_rpc_client(rpc, ss58_format, timeout_ms).await?;
        debug!("Connected successfully");
        Ok(gateway)
    }

    pub async fn from_rpc_client(
        rpc: RpcClient,
        ss58_format: u16,
        timeout_ms: u64,
    ) -> ChainResult<Self> {
        let client = with_timeout("connect", timeout_ms, async {
            OnlineClient::<SubstrateConfig>::from_rpc_client(rpc.clone())
                .await
                .map_err(|e| ChainError::ConnectionFailed(e.to_string()))
        })
        .await?;

        Ok(Self {
            client,
            node: NodeRpc::new(rpc, timeout_ms),
            converter: ValueConverter::new(ss58_format),
            ss58_format,
            timeout_ms,
        })
    }

    /// (pallet, call) index of the balance transfer call in the current runtime.
    pub async fn transfer_call_index(&self) -> ChainResult<Option<[u8; 2]>> {
        let at = self
            .client
            .at_current_block()
            .await
            .map_err(|e| ChainError::Rpc(e.to_string()))?;
        let metadata = at.metadata();

        let Some(pallet) = metadata.pallet_by_name("Balances") else {
            return Ok(None);
        };

        let call = ["transfer", "transfer_allow_death", "transfer_keep_alive"]
            .iter()
            .find_map(|name| pallet.call_variant_by_name(name));

        Ok(call.map(|variant| [pallet.call_index(), variant.index]))
    }

    async fn fetch_extrinsics(&self, hash: BlockHash) -> ChainResult<(Vec<NativeExtrinsic>, Option<u64>)> {
        let client_at_block = self
            .client
            .at_block(subxt::utils::H256(hash.0.0))
            .await
            .map_err(|e| ChainError::Rpc(e.to_string()))?;

        let extrinsics = client_at_block
            .extrinsics()
            .fetch()
            .await
            .map_err(|e| ChainError::Decode(e.to_string()))?;

        let mut native = Vec::new();
        let mut timestamp = None;

        for (index, ext_result) in extrinsics.iter().enumerate() {
            let ext = ext_result.map_err(|e| ChainError::Decode(e.to_string()))?;

            let args = match ext.decode_call_data_as::<scale_value::Value<()>>() {
                Ok(value) => self.converter.call_args(&value),
                Err(e) => {
                    warn!(index, error = %e, "Failed to decode call arguments");
                    Value::Null
                }
            };

            let signer = ext
                .address_bytes()
                .and_then(signer_account)
                .map(|account| self.encode_signer(&account));

            let extrinsic = NativeExtrinsic {
                index: index as u32,
                bytes: ext.bytes().to_vec(),
                pallet: ext.pallet_name().to_string(),
                call: ext.call_name().to_string(),
                signer,
                args,
            };

            if extrinsic.is("Timestamp", "set") {
                timestamp = extrinsic.args.get("now").and_then(json_to_u64);
            }

            native.push(extrinsic);
        }

        Ok((native, timestamp))
    }

    fn encode_signer(&self, account: &AccountId32) -> String {
        account.to_ss58check_with_version(Ss58AddressFormat::custom(self.ss58_format))
    }
}

#[async_trait]
impl ChainGateway for RpcGateway {
    async fn block_hash(&self, height: u64) -> ChainResult<Option<BlockHash>> {
        self.node.block_hash(height).await
    }

    async fn finalized_head(&self) -> ChainResult<BlockHash> {
        self.node.finalized_head().await
    }

    async fn header(&self, hash: BlockHash) -> ChainResult<Option<BlockHeader>> {
        self.node.header(hash).await
    }

    #[instrument(skip(self), fields(hash = %hash))]
    async fn block(&self, hash: BlockHash) -> ChainResult<NativeBlock> {
        let header = self
            .header(hash)
            .await?
            .ok_or_else(|| ChainError::NotFound(format!("block {}", hash)))?;

        let (extrinsics, timestamp) =
            with_timeout("extrinsics", self.timeout_ms, self.fetch_extrinsics(hash)).await?;

        Ok(NativeBlock {
            header,
            extrinsics,
            timestamp,
        })
    }

    #[instrument(skip(self), fields(hash = %hash))]
    async fn events(&self, hash: BlockHash) -> ChainResult<Vec<NativeEvent>> {
        with_timeout("events", self.timeout_ms, async {
            let client_at_block = self
                .client
                .at_block(subxt::utils::H256(hash.0.0))
                .await
                .map_err(|e| ChainError::Rpc(e.to_string()))?;

            let events = client_at_block
                .events()
                .fetch()
                .await
                .map_err(|e| ChainError::Decode(e.to_string()))?;

            let mut native = Vec::new();
            for (index, event_result) in events.iter().enumerate() {
                let event = match event_result {
                    Ok(event) => event,
                    Err(e) => {
                        warn!(index, error = %e, "Failed to decode event");
                        continue;
                    }
                };

                let phase = match event.phase() {
                    subxt::events::Phase::ApplyExtrinsic(idx) => EventPhase::ApplyExtrinsic(idx),
                    subxt::events::Phase::Initialization => EventPhase::Initialization,
                    subxt::events::Phase::Finalization => EventPhase::Finalization,
                };

                let data = match event.decode_fields_unchecked_as::<scale_value::Value<()>>() {
                    Ok(value) => self.converter.positional(&value),
                    Err(e) => {
                        warn!(index, error = %e, "Failed to decode event fields");
                        Vec::new()
                    }
                };

                native.push(NativeEvent {
                    phase,
                    pallet: event.pallet_name().to_string(),
                    name: event.event_name().to_string(),
                    data,
                });
            }

            Ok(native)
        })
        .await
    }

    #[instrument(skip(self, account), fields(hash = %hash))]
    async fn account_state(
        &self,
        hash: BlockHash,
        account: &AccountId32,
    ) -> ChainResult<AccountState> {
        with_timeout("account", self.timeout_ms, async {
            let client_at_block = self
                .client
                .at_block(subxt::utils::H256(hash.0.0))
                .await
                .map_err(|e| ChainError::Rpc(e.to_string()))?;

            let storage_addr = subxt::dynamic::storage::<_, ()>("System", "Account");
            let account_bytes: [u8; 32] = *account.as_ref();

            match client_at_block
                .storage()
                .fetch(storage_addr, (account_bytes,))
                .await
            {
                Ok(value) => {
                    let raw_bytes = value.into_bytes();
                    decode_account_info(&raw_bytes).ok_or_else(|| {
                        ChainError::Decode("System::Account has an unknown layout".to_string())
                    })
                }
                Err(subxt::error::StorageError::StorageEntryNotFound { .. }) => {
                    Ok(AccountState::default())
                }
                Err(e) => Err(ChainError::Rpc(e.to_string())),
            }
        })
        .await
    }

    async fn estimate_fee(&self, extrinsic: &[u8], hash: BlockHash) -> ChainResult<u128> {
        self.node.estimate_fee(extrinsic, hash).await
    }

    #[instrument(skip(self), fields(hash = %hash))]
    async fn epoch_treasury_emission(&self, hash: BlockHash, epoch: u64) -> ChainResult<u128> {
        with_timeout("epoch", self.timeout_ms, async {
            let client_at_block = self
                .client
                .at_block(subxt::utils::H256(hash.0.0))
                .await
                .map_err(|e| ChainError::Rpc(e.to_string()))?;

            let storage_addr =
                subxt::dynamic::storage::<_, scale_value::Value>("PoAModule", "Epochs");

            let value = match client_at_block.storage().fetch(storage_addr, (epoch,)).await {
                Ok(value) => value,
                Err(subxt::error::StorageError::StorageEntryNotFound { .. }) => {
                    return Err(ChainError::NotFound(format!("epoch {}", epoch)));
                }
                Err(e) => return Err(ChainError::Rpc(e.to_string())),
            };

            let decoded = value
                .decode_as::<scale_value::Value<()>>()
                .map_err(|e| ChainError::Decode(e.to_string()))?;

            self.converter
                .value(&decoded)
                .get("emission_for_treasury")
                .and_then(json_to_u128)
                .ok_or_else(|| {
                    ChainError::Decode(format!("epoch {} has no emission_for_treasury", epoch))
                })
        })
        .await
    }

    async fn runtime_version(&self, hash: BlockHash) -> ChainResult<RuntimeVersion> {
        self.node.runtime_version(hash).await
    }

    async fn pending_extrinsics(&self) -> ChainResult<Vec<Vec<u8>>> {
        self.node.pending_extrinsics().await
    }

    #[instrument(skip_all)]
    async fn submit(&self, extrinsic: &[u8]) -> ChainResult<H256> {
        self.node.submit(extrinsic).await
    }

    async fn peers(&self) -> ChainResult<Vec<String>> {
        self.node.peers().await
    }

    async fn node_version(&self) -> ChainResult<String> {
        self.node.node_version().await
    }
}
