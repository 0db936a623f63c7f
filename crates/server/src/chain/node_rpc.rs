// Copyright (C) 2026 Parity Technologies (UK) Ltd.
// SPDX-License-Identifier: GPL-3.0-or-later

//! Raw JSON-RPC calls that need no runtime metadata.

use super::error::{ChainError, ChainResult, with_timeout};
use super::types::{BlockHeader, RuntimeVersion};
use crate::types::BlockHash;
use crate::utils::{header_from_json, json_to_u64, json_to_u128};
use serde_json::Value;
use sp_core::H256;
use subxt_rpcs::client::{RpcClient, RpcParams, rpc_params};

fn to_hex(bytes: &[u8]) -> String {
    format!("0x{}", hex::encode(bytes))
}

fn parse_hash(hash: &str) -> ChainResult<BlockHash> {
    hash.parse()
        .map_err(|e| ChainError::Decode(format!("block hash '{}': {}", hash, e)))
}

#[derive(Clone)]
pub struct NodeRpc {
    rpc: RpcClient,
    timeout_ms: u64,
}

impl NodeRpc {
    pub fn new(rpc: RpcClient, timeout_ms: u64) -> Self {
        Self { rpc, timeout_ms }
    }

    pub fn client(&self) -> &RpcClient {
        &self.rpc
    }

    async fn request_json(&self, method: &'static str, params: RpcParams) -> ChainResult<Value> {
        with_timeout(method, self.timeout_ms, async {
            Ok(self.rpc.request::<Value>(method, params).await?)
        })
        .await
    }

    pub async fn block_hash(&self, height: u64) -> ChainResult<Option<BlockHash>> {
        let reply = self
            .request_json("chain_getBlockHash", rpc_params![height])
            .await?;
        match reply.as_str() {
            Some(hash) => parse_hash(hash).map(Some),
            None => Ok(None),
        }
    }

    pub async fn finalized_head(&self) -> ChainResult<BlockHash> {
        let reply = self
            .request_json("chain_getFinalizedHead", rpc_params![])
            .await?;
        let hash = reply
            .as_str()
            .ok_or_else(|| ChainError::Decode("finalized head is not a string".to_string()))?;
        parse_hash(hash)
    }

    pub async fn header(&self, hash: BlockHash) -> ChainResult<Option<BlockHeader>> {
        let reply = self
            .request_json("chain_getHeader", rpc_params![hash.to_string()])
            .await?;
        if reply.is_null() {
            return Ok(None);
        }
        header_from_json(hash, &reply)
            .map(Some)
            .map_err(|e| ChainError::Decode(e.to_string()))
    }

    pub async fn estimate_fee(&self, extrinsic: &[u8], hash: BlockHash) -> ChainResult<u128> {
        let info = self
            .request_json(
                "payment_queryInfo",
                rpc_params![to_hex(extrinsic), hash.to_string()],
            )
            .await?;
        info.get("partialFee")
            .and_then(json_to_u128)
            .ok_or_else(|| ChainError::Decode("payment_queryInfo without partialFee".to_string()))
    }

    pub async fn runtime_version(&self, hash: BlockHash) -> ChainResult<RuntimeVersion> {
        let reply = self
            .request_json("state_getRuntimeVersion", rpc_params![hash.to_string()])
            .await?;

        let field = |name: &str| {
            reply
                .get(name)
                .and_then(json_to_u64)
                .and_then(|v| u32::try_from(v).ok())
                .ok_or_else(|| ChainError::Decode(format!("runtime version without {}", name)))
        };

        Ok(RuntimeVersion {
            spec_version: field("specVersion")?,
            transaction_version: field("transactionVersion")?,
        })
    }

    pub async fn pending_extrinsics(&self) -> ChainResult<Vec<Vec<u8>>> {
        let reply = self
            .request_json("author_pendingExtrinsics", rpc_params![])
            .await?;

        reply
            .as_array()
            .ok_or_else(|| ChainError::Decode("pending extrinsics is not a list".to_string()))?
            .iter()
            .map(|ext| {
                let hex_str = ext
                    .as_str()
                    .ok_or_else(|| ChainError::Decode(format!("pending extrinsic {} is not a string", ext)))?;
                hex::decode(hex_str.trim_start_matches("0x")).map_err(|e| ChainError::Decode(e.to_string()))
            })
            .collect()
    }

    pub async fn submit(&self, extrinsic: &[u8]) -> ChainResult<H256> {
        let reply = self
            .request_json("author_submitExtrinsic", rpc_params![to_hex(extrinsic)])
            .await?;
        let hash = reply
            .as_str()
            .ok_or_else(|| ChainError::Decode("submission reply is not a hash".to_string()))?;
        parse_hash(hash).map(H256::from)
    }

    pub async fn peers(&self) -> ChainResult<Vec<String>> {
        let reply = self.request_json("system_peers", rpc_params![]).await?;
        Ok(reply
            .as_array()
            .map(|peers| {
                peers
                    .iter()
                    .filter_map(|peer| {
                        peer.get("peerId")
                            .and_then(|v| v.as_str())
                            .map(str::to_string)
                    })
                    .collect()
            })
            .unwrap_or_default())
    }

    pub async fn node_version(&self) -> ChainResult<String> {
        let reply = self.request_json("system_version", rpc_params![]).await?;
        reply
            .as_str()
            .map(str::to_string)
            .ok_or_else(|| ChainError::Decode("system_version is not a string".to_string()))
    }
}
