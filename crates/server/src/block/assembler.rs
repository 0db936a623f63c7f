// Copyright (C) 2026 Parity Technologies (UK) Ltd.
// SPDX-License-Identifier: GPL-3.0-or-later

//! Rosetta blocks from native blocks and their events.

use super::fees::FeeLookup;
use crate::chain::{BlockHeader, ChainGateway, ChainRegistry, NativeBlock, NativeEvent, NativeExtrinsic};
use crate::error::{ApiError, ApiResult};
use crate::operations::{
    MapperContext, OperationKind, OperationMapper, OperationsBuilder, TxStatus, classify, Delta,
};
use crate::types::{
    Block, BlockHash, BlockIdentifier, PartialBlockIdentifier, Transaction, TransactionIdentifier,
};
use crate::utils::{normalize_transaction_hash, transaction_hash};
use futures::future::join_all;
use std::collections::HashMap;
use tracing::{debug, instrument};

pub fn block_identifier(header: &BlockHeader) -> BlockIdentifier {
    BlockIdentifier {
        index: header.number,
        hash: header.hash.to_string(),
    }
}

fn parent_identifier(header: &BlockHeader) -> BlockIdentifier {
    if header.number == 0 {
        return block_identifier(header);
    }
    BlockIdentifier {
        index: header.number - 1,
        hash: header.parent_hash.to_string(),
    }
}

pub struct BlockAssembler<'a> {
    pub gateway: &'a dyn ChainGateway,
    pub registry: &'a ChainRegistry,
    pub mapper: &'a OperationMapper,
    pub fees: FeeLookup,
}

impl BlockAssembler<'_> {
    /// Resolves a possibly partial identifier to a header. With neither field
    /// set, the finalized head is used.
    pub async fn resolve(&self, id: Option<&PartialBlockIdentifier>) -> ApiResult<BlockHeader> {
        let (index, hash) = match id {
            Some(id) => (id.index, id.hash.as_deref()),
            None => (None, None),
        };

        let hash = match (hash, index) {
            (Some(hash), _) => hash
                .parse::<BlockHash>()
                .map_err(|e| ApiError::InvalidRequest(format!("Invalid block hash: {}", e)))?,
            (None, Some(index)) => self
                .gateway
                .block_hash(index)
                .await?
                .ok_or_else(|| ApiError::InvalidRequest(format!("Block {} not found", index)))?,
            (None, None) => self.gateway.finalized_head().await?,
        };

        let header = self
            .gateway
            .header(hash)
            .await?
            .ok_or_else(|| ApiError::InvalidRequest(format!("Block {} not found", hash)))?;

        if let Some(index) = index {
            if index != header.number {
                return Err(ApiError::InvalidRequest(format!(
                    "Block {} is at height {}, not {}",
                    hash, header.number, index
                )));
            }
        }

        Ok(header)
    }

    #[instrument(skip_all, fields(network = %self.registry.network.network))]
    pub async fn block(&self, id: Option<&PartialBlockIdentifier>) -> ApiResult<Block> {
        let header = self.resolve(id).await?;

        if header.number == 0 {
            return Ok(Block {
                block_identifier: block_identifier(&header),
                parent_block_identifier: parent_identifier(&header),
                timestamp: 0,
                transactions: Vec::new(),
                metadata: None,
            });
        }

        let (native, events) = tokio::try_join!(
            self.gateway.block(header.hash),
            self.gateway.events(header.hash)
        )?;
        let transactions = self.transactions(&native, &events).await;

        Ok(Block {
            block_identifier: block_identifier(&header),
            parent_block_identifier: parent_identifier(&header),
            timestamp: native.timestamp.unwrap_or_default(),
            transactions,
            metadata: None,
        })
    }

    /// One transaction of a known block. A transaction that yields no
    /// operations comes back empty rather than as an error.
    pub async fn transaction(
        &self,
        block: &BlockIdentifier,
        transaction: &TransactionIdentifier,
    ) -> ApiResult<Transaction> {
        let partial = PartialBlockIdentifier {
            index: Some(block.index),
            hash: Some(block.hash.clone()),
        };
        let found = self
            .block(Some(&partial))
            .await?
            .transactions
            .into_iter()
            .find(|tx| {
                tx.transaction_identifier.hash == normalize_transaction_hash(&transaction.hash)
            });

        Ok(found.unwrap_or_else(|| Transaction {
            transaction_identifier: TransactionIdentifier {
                hash: normalize_transaction_hash(&transaction.hash),
            },
            operations: Vec::new(),
            metadata: None,
        }))
    }

    /// Transactions in block order, the synthetic system-events transaction last.
    pub async fn transactions(&self, block: &NativeBlock, events: &[NativeEvent]) -> Vec<Transaction> {
        let mut by_extrinsic: HashMap<u32, Vec<&NativeEvent>> = HashMap::new();
        let mut system_events = Vec::new();
        for event in events {
            match event.extrinsic_index() {
                Some(index) => by_extrinsic.entry(index).or_default().push(event),
                None => system_events.push(event),
            }
        }

        let candidates: Vec<&NativeExtrinsic> = block
            .extrinsics
            .iter()
            .filter(|ext| !ext.is("Timestamp", "set"))
            .collect();

        let signed: Vec<&NativeExtrinsic> =
            candidates.iter().copied().filter(|ext| ext.is_signed()).collect();
        let signed_bytes: Vec<&[u8]> = signed.iter().map(|ext| ext.bytes.as_slice()).collect();
        let fees: HashMap<u32, u128> = signed
            .iter()
            .map(|ext| ext.index)
            .zip(
                self.fees
                    .estimate_all(self.gateway, &signed_bytes, block.header.parent_hash)
                    .await,
            )
            .collect();

        let ctx = MapperContext {
            gateway: self.gateway,
            registry: self.registry,
            header: &block.header,
        };
        let no_events = Vec::new();

        let extrinsic_txs = join_all(candidates.iter().map(|ext| {
            let events = by_extrinsic.get(&ext.index).unwrap_or(&no_events);
            self.extrinsic_transaction(&ctx, ext, events, fees.get(&ext.index).copied())
        }))
        .await;

        let mut transactions: Vec<Transaction> = extrinsic_txs.into_iter().flatten().collect();

        if !system_events.is_empty() {
            let mut ops = OperationsBuilder::new(self.registry.currency.clone());
            self.mapper
                .map_events(&ctx, &system_events, TxStatus::Success, &mut ops)
                .await;
            if !ops.is_empty() {
                transactions.push(Transaction {
                    transaction_identifier: TransactionIdentifier {
                        hash: normalize_transaction_hash(&block.header.hash.to_string()),
                    },
                    operations: ops.finish(),
                    metadata: None,
                });
            }
        }

        transactions
    }

    async fn extrinsic_transaction(
        &self,
        ctx: &MapperContext<'_>,
        extrinsic: &NativeExtrinsic,
        events: &[&NativeEvent],
        fee: Option<u128>,
    ) -> Option<Transaction> {
        let classification = classify(events);
        let mut ops = OperationsBuilder::new(self.registry.currency.clone());

        if classification.status.successful() {
            self.mapper
                .map_events(ctx, events, classification.status, &mut ops)
                .await;
        } else {
            self.mapper
                .map_call(extrinsic, Some(classification.status), &mut ops);
        }

        if let (Some(signer), true) = (&extrinsic.signer, classification.pays_fee) {
            ops.push(
                OperationKind::Fee,
                Some(classification.status),
                signer,
                Delta::debit(fee.unwrap_or_default()),
            );
        }

        if ops.is_empty() {
            debug!(index = extrinsic.index, call = %extrinsic.key(), "Extrinsic has no operations");
            return None;
        }

        Some(Transaction {
            transaction_identifier: TransactionIdentifier {
                hash: transaction_hash(&extrinsic.bytes),
            },
            operations: ops.finish(),
            metadata: None,
        })
    }
}
