// Copyright (C) 2026 Parity Technologies (UK) Ltd.
// SPDX-License-Identifier: GPL-3.0-or-later

//! Test fixtures: a scripted [`ChainGateway`], a connector that hands it out,
//! and builders for blocks, extrinsics and events.

use crate::chain::{
    AccountState, BlockHeader, ChainError, ChainGateway, ChainRegistry, ChainResult, EventPhase,
    GatewayConnector, NativeBlock, NativeEvent, NativeExtrinsic, OnlineNetwork, RuntimeVersion,
};
use crate::types::{BlockHash, NetworkIdentifier};
use async_trait::async_trait;
use config::{NetworkConfig, NetworkConfigs};
use parity_scale_codec::Encode;
use serde_json::{Value, json};
use sp_core::H256;
use sp_core::crypto::{AccountId32, Ss58AddressFormat, Ss58Codec};
use sp_core::hashing::blake2_256;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

pub const TEST_SS58: u16 = 42;
pub const TEST_SPEC_VERSION: u32 = 19;
pub const TEST_TRANSACTION_VERSION: u32 = 1;
pub const TEST_BLOCKCHAIN: &str = "Nodle";
pub const TEST_NETWORK: &str = "testnet";

pub fn account(n: u8) -> AccountId32 {
    AccountId32::new([n; 32])
}

pub fn address(n: u8) -> String {
    account(n).to_ss58check_with_version(Ss58AddressFormat::custom(TEST_SS58))
}

pub fn treasury_address() -> String {
    address(0x99)
}

/// Deterministic hash for the block at `number`.
pub fn block_hash_at(number: u64) -> BlockHash {
    let mut bytes = [0u8; 32];
    bytes[0] = 0xbb;
    bytes[24..].copy_from_slice(&number.to_be_bytes());
    BlockHash::from(bytes)
}

pub fn test_header(number: u64) -> BlockHeader {
    BlockHeader {
        hash: block_hash_at(number),
        parent_hash: if number == 0 {
            BlockHash::from([0u8; 32])
        } else {
            block_hash_at(number - 1)
        },
        number,
    }
}

fn test_networks_json() -> String {
    json!([{
        "blockchain": TEST_BLOCKCHAIN,
        "network": TEST_NETWORK,
        "nodeAddress": "ws://127.0.0.1:9944",
        "ss58Format": TEST_SS58,
        "tokenSymbol": "NODL",
        "tokenDecimals": 11,
        "genesisHash": block_hash_at(0).to_string(),
        "specName": "nodle-test",
        "specVersion": TEST_SPEC_VERSION,
        "transactionVersion": TEST_TRANSACTION_VERSION,
        "addressFormat": "multiAddress",
        "transferCallIndex": [5, 0],
        "eraPeriod": 64,
        "treasury": treasury_address()
    }])
    .to_string()
}

pub fn test_networks() -> NetworkConfigs {
    NetworkConfigs::from_json(&test_networks_json()).unwrap()
}

pub fn test_network_config() -> NetworkConfig {
    test_networks().iter().next().unwrap().clone()
}

pub fn test_registry() -> ChainRegistry {
    ChainRegistry::from_config(&test_network_config()).unwrap()
}

pub fn test_network_id() -> NetworkIdentifier {
    NetworkIdentifier {
        blockchain: TEST_BLOCKCHAIN.to_string(),
        network: TEST_NETWORK.to_string(),
        sub_network_identifier: None,
    }
}

// ================================================================================================
// Events and extrinsics
// ================================================================================================

pub fn native_event(phase: EventPhase, pallet: &str, name: &str, data: Vec<Value>) -> NativeEvent {
    NativeEvent {
        phase,
        pallet: pallet.to_string(),
        name: name.to_string(),
        data,
    }
}

fn dispatch_info(pays_fee: bool) -> Value {
    json!({
        "weight": { "ref_time": "125000000", "proof_size": "0" },
        "class": "Normal",
        "pays_fee": if pays_fee { "Yes" } else { "No" }
    })
}

pub fn extrinsic_success(index: u32, pays_fee: bool) -> NativeEvent {
    native_event(
        EventPhase::ApplyExtrinsic(index),
        "System",
        "ExtrinsicSuccess",
        vec![dispatch_info(pays_fee)],
    )
}

pub fn extrinsic_failed(index: u32, pays_fee: bool) -> NativeEvent {
    native_event(
        EventPhase::ApplyExtrinsic(index),
        "System",
        "ExtrinsicFailed",
        vec![
            json!({ "Module": { "index": 5, "error": "0x02000000" } }),
            dispatch_info(pays_fee),
        ],
    )
}

pub fn transfer_event(index: u32, from: &str, to: &str, value: u128) -> NativeEvent {
    native_event(
        EventPhase::ApplyExtrinsic(index),
        "Balances",
        "Transfer",
        vec![json!(from), json!(to), json!(value.to_string())],
    )
}

pub fn timestamp_extrinsic(now: u64) -> NativeExtrinsic {
    NativeExtrinsic {
        index: 0,
        bytes: (0u32, now).encode(),
        pallet: "Timestamp".to_string(),
        call: "set".to_string(),
        signer: None,
        args: json!({ "now": now }),
    }
}

pub fn transfer_extrinsic(index: u32, signer: Option<String>, dest: &str, value: u128) -> NativeExtrinsic {
    NativeExtrinsic {
        index,
        bytes: (index, dest.as_bytes().to_vec(), value).encode(),
        pallet: "Balances".to_string(),
        call: "transfer".to_string(),
        signer,
        args: json!({ "dest": dest, "value": value.to_string() }),
    }
}

pub fn native_block(number: u64, extrinsics: Vec<NativeExtrinsic>, timestamp: Option<u64>) -> NativeBlock {
    NativeBlock {
        header: test_header(number),
        extrinsics,
        timestamp,
    }
}

// ================================================================================================
// MockGateway
// ================================================================================================

/// Reply for one fee lookup.
#[derive(Debug, Clone, Copy)]
pub enum FeeReply {
    Fee(u128),
    Fail,
    Hang,
}

/// In-memory [`ChainGateway`] scripted per test.
pub struct MockGateway {
    blocks: HashMap<BlockHash, NativeBlock>,
    events: HashMap<BlockHash, Vec<NativeEvent>>,
    accounts: HashMap<(BlockHash, AccountId32), AccountState>,
    fees: HashMap<Vec<u8>, FeeReply>,
    default_fee: FeeReply,
    epochs: HashMap<u64, u128>,
    epoch_calls: AtomicUsize,
    runtime: RuntimeVersion,
    pending: Vec<Vec<u8>>,
    submitted: Mutex<Vec<Vec<u8>>>,
    submit_error: Option<String>,
    finalized: BlockHash,
    unreachable: bool,
}

impl Default for MockGateway {
    fn default() -> Self {
        Self::new()
    }
}

impl MockGateway {
    pub fn new() -> Self {
        let genesis = native_block(0, vec![], None);
        let finalized = genesis.header.hash;
        let mut blocks = HashMap::new();
        blocks.insert(genesis.header.hash, genesis);

        Self {
            blocks,
            events: HashMap::new(),
            accounts: HashMap::new(),
            fees: HashMap::new(),
            default_fee: FeeReply::Fee(0),
            epochs: HashMap::new(),
            epoch_calls: AtomicUsize::new(0),
            runtime: RuntimeVersion {
                spec_version: TEST_SPEC_VERSION,
                transaction_version: TEST_TRANSACTION_VERSION,
            },
            pending: Vec::new(),
            submitted: Mutex::new(Vec::new()),
            submit_error: None,
            finalized,
            unreachable: false,
        }
    }

    /// Adds a block and its events. The highest block added becomes the finalized head.
    pub fn with_block(mut self, block: NativeBlock, events: Vec<NativeEvent>) -> Self {
        let hash = block.header.hash;
        let is_head = self
            .blocks
            .get(&self.finalized)
            .is_none_or(|head| head.header.number <= block.header.number);
        if is_head {
            self.finalized = hash;
        }
        self.events.insert(hash, events);
        self.blocks.insert(hash, block);
        self
    }

    pub fn with_account(mut self, at: BlockHash, account: AccountId32, state: AccountState) -> Self {
        self.accounts.insert((at, account), state);
        self
    }

    pub fn with_fee(mut self, extrinsic: &[u8], reply: FeeReply) -> Self {
        self.fees.insert(extrinsic.to_vec(), reply);
        self
    }

    pub fn with_default_fee(mut self, reply: FeeReply) -> Self {
        self.default_fee = reply;
        self
    }

    pub fn with_epoch(mut self, epoch: u64, emission: u128) -> Self {
        self.epochs.insert(epoch, emission);
        self
    }

    pub fn with_pending(mut self, extrinsic: Vec<u8>) -> Self {
        self.pending.push(extrinsic);
        self
    }

    pub fn with_submit_error(mut self, error: &str) -> Self {
        self.submit_error = Some(error.to_string());
        self
    }

    /// Every call fails as if the node went away.
    pub fn unreachable(mut self) -> Self {
        self.unreachable = true;
        self
    }

    pub fn finalized(&self) -> BlockHash {
        self.finalized
    }

    pub fn submitted(&self) -> Vec<Vec<u8>> {
        self.submitted.lock().unwrap().clone()
    }

    pub fn epoch_calls(&self) -> usize {
        self.epoch_calls.load(Ordering::SeqCst)
    }

    fn check_reachable(&self) -> ChainResult<()> {
        if self.unreachable {
            Err(ChainError::ConnectionFailed("connection refused".to_string()))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl ChainGateway for MockGateway {
    async fn block_hash(&self, height: u64) -> ChainResult<Option<BlockHash>> {
        self.check_reachable()?;
        Ok(self
            .blocks
            .values()
            .find(|block| block.header.number == height)
            .map(|block| block.header.hash))
    }

    async fn finalized_head(&self) -> ChainResult<BlockHash> {
        self.check_reachable()?;
        Ok(self.finalized)
    }

    async fn header(&self, hash: BlockHash) -> ChainResult<Option<BlockHeader>> {
        self.check_reachable()?;
        Ok(self.blocks.get(&hash).map(|block| block.header.clone()))
    }

    async fn block(&self, hash: BlockHash) -> ChainResult<NativeBlock> {
        self.check_reachable()?;
        self.blocks
            .get(&hash)
            .cloned()
            .ok_or_else(|| ChainError::NotFound(format!("block {}", hash)))
    }

    async fn events(&self, hash: BlockHash) -> ChainResult<Vec<NativeEvent>> {
        self.check_reachable()?;
        Ok(self.events.get(&hash).cloned().unwrap_or_default())
    }

    async fn account_state(&self, hash: BlockHash, account: &AccountId32) -> ChainResult<AccountState> {
        self.check_reachable()?;
        Ok(self
            .accounts
            .get(&(hash, account.clone()))
            .copied()
            .unwrap_or_default())
    }

    async fn estimate_fee(&self, extrinsic: &[u8], _hash: BlockHash) -> ChainResult<u128> {
        self.check_reachable()?;
        match self.fees.get(extrinsic).copied().unwrap_or(self.default_fee) {
            FeeReply::Fee(fee) => Ok(fee),
            FeeReply::Fail => Err(ChainError::Rpc("payment_queryInfo failed".to_string())),
            FeeReply::Hang => {
                tokio::time::sleep(Duration::from_secs(3600)).await;
                Ok(0)
            }
        }
    }

    async fn epoch_treasury_emission(&self, _hash: BlockHash, epoch: u64) -> ChainResult<u128> {
        self.check_reachable()?;
        self.epoch_calls.fetch_add(1, Ordering::SeqCst);
        self.epochs
            .get(&epoch)
            .copied()
            .ok_or_else(|| ChainError::NotFound(format!("epoch {}", epoch)))
    }

    async fn runtime_version(&self, _hash: BlockHash) -> ChainResult<RuntimeVersion> {
        self.check_reachable()?;
        Ok(self.runtime)
    }

    async fn pending_extrinsics(&self) -> ChainResult<Vec<Vec<u8>>> {
        self.check_reachable()?;
        Ok(self.pending.clone())
    }

    async fn submit(&self, extrinsic: &[u8]) -> ChainResult<H256> {
        self.check_reachable()?;
        if let Some(error) = &self.submit_error {
            return Err(ChainError::Rpc(error.clone()));
        }
        self.submitted.lock().unwrap().push(extrinsic.to_vec());
        Ok(H256::from(blake2_256(extrinsic)))
    }

    async fn peers(&self) -> ChainResult<Vec<String>> {
        self.check_reachable()?;
        Ok(vec!["12D3KooWMockPeer".to_string()])
    }

    async fn node_version(&self) -> ChainResult<String> {
        self.check_reachable()?;
        Ok("2.0.0-mock".to_string())
    }
}

// ================================================================================================
// MockConnector
// ================================================================================================

/// Hands out a shared [`MockGateway`] and counts connection attempts.
#[derive(Clone)]
pub struct MockConnector {
    gateway: Arc<MockGateway>,
    connects: Arc<AtomicUsize>,
    fail_first: usize,
    live_call_index: Option<[u8; 2]>,
}

impl Default for MockConnector {
    fn default() -> Self {
        Self::with_gateway(Arc::new(MockGateway::new()))
    }
}

impl MockConnector {
    pub fn with_gateway(gateway: Arc<MockGateway>) -> Self {
        Self {
            gateway,
            connects: Arc::new(AtomicUsize::new(0)),
            fail_first: 0,
            live_call_index: None,
        }
    }

    /// Fails the first `n` connection attempts.
    pub fn failing_first(n: usize) -> Self {
        Self {
            fail_first: n,
            ..Self::default()
        }
    }

    /// Reports a transfer call index from "live metadata" that differs from configuration.
    pub fn with_live_call_index(mut self, index: [u8; 2]) -> Self {
        self.live_call_index = Some(index);
        self
    }

    pub fn arc(self) -> Arc<dyn GatewayConnector> {
        Arc::new(self)
    }

    pub fn connects(&self) -> usize {
        self.connects.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl GatewayConnector for MockConnector {
    async fn connect(&self, _network: &NetworkConfig, mut registry: ChainRegistry) -> ChainResult<OnlineNetwork> {
        let attempt = self.connects.fetch_add(1, Ordering::SeqCst);
        tokio::time::sleep(Duration::from_millis(10)).await;
        if attempt < self.fail_first {
            return Err(ChainError::ConnectionFailed("connection refused".to_string()));
        }
        if let Some(index) = self.live_call_index {
            registry.transfer_call_index = index;
        }
        Ok(OnlineNetwork {
            gateway: self.gateway.clone(),
            registry: Arc::new(registry),
        })
    }
}
