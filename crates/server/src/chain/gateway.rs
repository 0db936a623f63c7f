// Copyright (C) 2026 Parity Technologies (UK) Ltd.
// SPDX-License-Identifier: GPL-3.0-or-later

use super::error::ChainResult;
use super::types::{AccountState, BlockHeader, NativeBlock, NativeEvent, RuntimeVersion};
use crate::types::BlockHash;
use async_trait::async_trait;
use sp_core::{H256, crypto::AccountId32};

/// Everything the service needs from a live node.
///
/// Every method is a network boundary. Implementations translate their
/// transport errors into [`super::ChainError`].
#[async_trait]
pub trait ChainGateway: Send + Sync {
    /// Hash of the canonical block at `height`, `None` past the chain head.
    async fn block_hash(&self, height: u64) -> ChainResult<Option<BlockHash>>;

    async fn finalized_head(&self) -> ChainResult<BlockHash>;

    async fn header(&self, hash: BlockHash) -> ChainResult<Option<BlockHeader>>;

    async fn block(&self, hash: BlockHash) -> ChainResult<NativeBlock>;

    async fn events(&self, hash: BlockHash) -> ChainResult<Vec<NativeEvent>>;

    async fn account_state(&self, hash: BlockHash, account: &AccountId32)
    -> ChainResult<AccountState>;

    /// Partial fee the runtime would charge for `extrinsic` at `hash`.
    async fn estimate_fee(&self, extrinsic: &[u8], hash: BlockHash) -> ChainResult<u128>;

    /// Treasury share of the emission for `epoch`, read at `hash`.
    async fn epoch_treasury_emission(&self, hash: BlockHash, epoch: u64) -> ChainResult<u128>;

    async fn runtime_version(&self, hash: BlockHash) -> ChainResult<RuntimeVersion>;

    /// Encoded extrinsics currently in the node's pool.
    async fn pending_extrinsics(&self) -> ChainResult<Vec<Vec<u8>>>;

    /// Broadcast a signed extrinsic, returning the node's transaction hash.
    async fn submit(&self, extrinsic: &[u8]) -> ChainResult<H256>;

    async fn peers(&self) -> ChainResult<Vec<String>>;

    async fn node_version(&self) -> ChainResult<String>;
}
