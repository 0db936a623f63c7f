// Copyright (C) 2026 Parity Technologies (UK) Ltd.
// SPDX-License-Identifier: GPL-3.0-or-later

//! The data threaded between construction stages.
//!
//! `metadata` hands out a [`ConstructionMetadata`], `payloads` folds it together
//! with the transfer into an [`UnsignedTransactionIntent`], and the offline
//! stages after it rebuild every byte from that intent alone.

use super::codec::{SigningContext, TransferCall, signing_payload};
use crate::chain::ChainRegistry;
use crate::error::{ApiError, ApiResult};
use crate::operations::{Delta, OperationKind, OperationsBuilder, TxStatus};
use crate::types::{BlockHash, Operation};
use serde::{Deserialize, Serialize};
use sp_runtime::generic::Era;

/// Chain state a transfer is built against, as returned by `/construction/metadata`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConstructionMetadata {
    pub nonce: u64,
    /// Hash of the block the mortal era is anchored at.
    pub block_hash: BlockHash,
    pub block_number: u64,
    pub era_period: u64,
    pub spec_version: u32,
    pub transaction_version: u32,
    /// `Balances.transfer` index in the live runtime.
    pub call_index: [u8; 2],
}

impl ConstructionMetadata {
    pub fn from_value(value: Option<&serde_json::Value>) -> ApiResult<Self> {
        let value =
            value.ok_or_else(|| ApiError::InvalidRequest("metadata is required".to_string()))?;
        serde_json::from_value(value.clone())
            .map_err(|e| ApiError::InvalidRequest(format!("Invalid metadata: {}", e)))
    }

    pub fn to_value(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or_default()
    }
}

/// A transfer the signer has not signed yet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnsignedTransactionIntent {
    pub from: String,
    pub to: String,
    /// Decimal `u128`.
    pub value: String,
    pub nonce: u64,
    pub era_period: u64,
    pub block_number: u64,
    pub block_hash: BlockHash,
    pub genesis_hash: BlockHash,
    pub spec_version: u32,
    pub transaction_version: u32,
    pub call_index: [u8; 2],
}

impl UnsignedTransactionIntent {
    pub fn new(
        registry: &ChainRegistry,
        transfer: &TransferIntent,
        metadata: &ConstructionMetadata,
    ) -> Self {
        Self {
            from: transfer.from.clone(),
            to: transfer.to.clone(),
            value: transfer.value.to_string(),
            nonce: metadata.nonce,
            era_period: metadata.era_period,
            block_number: metadata.block_number,
            block_hash: metadata.block_hash,
            genesis_hash: registry.genesis_hash,
            spec_version: metadata.spec_version,
            transaction_version: metadata.transaction_version,
            call_index: metadata.call_index,
        }
    }

    pub fn to_json(&self) -> ApiResult<String> {
        serde_json::to_string(self)
            .map_err(|e| ApiError::InvalidRequest(format!("Unencodable transaction: {}", e)))
    }

    pub fn from_json(text: &str) -> ApiResult<Self> {
        serde_json::from_str(text)
            .map_err(|e| ApiError::InvalidRequest(format!("Invalid unsigned transaction: {}", e)))
    }

    pub fn value(&self) -> ApiResult<u128> {
        self.value
            .parse()
            .map_err(|_| ApiError::InvalidRequest(format!("Invalid transfer value '{}'", self.value)))
    }

    pub fn era(&self) -> Era {
        Era::mortal(self.era_period, self.block_number)
    }

    pub fn call(&self, registry: &ChainRegistry) -> ApiResult<TransferCall> {
        Ok(TransferCall {
            call_index: self.call_index,
            dest: registry.decode_address(&self.to)?,
            value: self.value()?,
        })
    }

    pub fn signing_context(&self) -> SigningContext {
        SigningContext {
            era: self.era(),
            nonce: self.nonce,
            tip: 0,
            spec_version: self.spec_version,
            transaction_version: self.transaction_version,
            genesis_hash: *self.genesis_hash.as_bytes(),
            era_block_hash: *self.block_hash.as_bytes(),
        }
    }

    pub fn signing_payload(&self, registry: &ChainRegistry) -> ApiResult<Vec<u8>> {
        let call = self.call(registry)?.encode(registry.address_format);
        Ok(signing_payload(&call, &self.signing_context()))
    }

    pub fn operations(&self, registry: &ChainRegistry) -> ApiResult<Vec<Operation>> {
        Ok(transfer_operations(
            registry,
            &self.from,
            &self.to,
            self.value()?,
            None,
        ))
    }
}

/// Sender, recipient and amount of a simple transfer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferIntent {
    pub from: String,
    pub to: String,
    pub value: u128,
}

fn signed_amount(op: &Operation) -> Option<(bool, u128)> {
    let value = &op.amount.as_ref()?.value;
    match value.strip_prefix('-') {
        Some(magnitude) => magnitude.parse().ok().map(|m| (true, m)),
        None => value.parse().ok().map(|m| (false, m)),
    }
}

fn op_address(op: &Operation) -> Option<&str> {
    op.account.as_ref().map(|a| a.address.as_str())
}

/// The one account debited by `operations`.
pub fn sender(operations: &[Operation]) -> ApiResult<String> {
    let mut senders: Vec<&str> = Vec::new();
    for op in operations {
        let Some((true, _)) = signed_amount(op) else {
            continue;
        };
        let Some(address) = op_address(op) else {
            return Err(ApiError::InvalidRequest(format!(
                "Operation {} has a negative amount but no account",
                op.operation_identifier.index
            )));
        };
        if !senders.contains(&address) {
            senders.push(address);
        }
    }

    match senders.as_slice() {
        [sender] => Ok(sender.to_string()),
        [] => Err(ApiError::InvalidRequest(
            "No operation with a negative amount".to_string(),
        )),
        many => Err(ApiError::InvalidRequest(format!(
            "Expected one sender, found {}",
            many.len()
        ))),
    }
}

impl TransferIntent {
    /// Accepts exactly one `Transfer` debit and one `Transfer` credit of equal,
    /// non-zero magnitude in the network's currency.
    pub fn from_operations(operations: &[Operation], registry: &ChainRegistry) -> ApiResult<Self> {
        let unsupported = |reason: &str| ApiError::UnsupportedOperationSet(reason.to_string());

        if operations.len() != 2 {
            return Err(ApiError::UnsupportedOperationSet(format!(
                "Expected 2 operations, got {}",
                operations.len()
            )));
        }

        let mut debit = None;
        let mut credit = None;
        for op in operations {
            if op.kind != OperationKind::Transfer.as_str() {
                return Err(ApiError::UnsupportedOperationSet(format!(
                    "Unsupported operation type '{}'",
                    op.kind
                )));
            }
            if let Some(amount) = &op.amount
                && amount.currency.symbol != registry.currency.symbol
            {
                return Err(ApiError::UnsupportedOperationSet(format!(
                    "Unsupported currency '{}'",
                    amount.currency.symbol
                )));
            }
            let address = op_address(op).ok_or_else(|| unsupported("Operation without account"))?;
            let (negative, magnitude) =
                signed_amount(op).ok_or_else(|| unsupported("Operation without a valid amount"))?;
            let slot = if negative { &mut debit } else { &mut credit };
            if slot.replace((address, magnitude)).is_some() {
                return Err(unsupported("Expected one debit and one credit"));
            }
        }

        let (Some((from, sent)), Some((to, received))) = (debit, credit) else {
            return Err(unsupported("Expected one debit and one credit"));
        };
        if sent == 0 {
            return Err(unsupported("Transfer value must be positive"));
        }
        if sent != received {
            return Err(ApiError::UnsupportedOperationSet(format!(
                "Debit {} does not match credit {}",
                sent, received
            )));
        }

        registry.decode_address(from)?;
        registry.decode_address(to)?;

        Ok(Self {
            from: from.to_string(),
            to: to.to_string(),
            value: sent,
        })
    }
}

/// The debit and credit operations of a transfer.
pub fn transfer_operations(
    registry: &ChainRegistry,
    from: &str,
    to: &str,
    value: u128,
    status: Option<TxStatus>,
) -> Vec<Operation> {
    let mut ops = OperationsBuilder::new(registry.currency.clone());
    ops.push_pair(
        OperationKind::Transfer,
        status,
        Some(from),
        to,
        Delta::credit(value),
    );
    ops.finish()
}
