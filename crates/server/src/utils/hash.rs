// Copyright (C) 2026 Parity Technologies (UK) Ltd.
// SPDX-License-Identifier: GPL-3.0-or-later

use crate::chain::BlockHeader;
use crate::types::BlockHash;
use crate::utils::json::json_to_u64;
use sp_core::hashing::blake2_256;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum HashError {
    #[error("Missing header field: {0}")]
    MissingField(String),

    #[error("Invalid hex format: {0}")]
    InvalidHex(String),

    #[error("Invalid number format: {0}")]
    InvalidNumber(String),
}

/// Transaction identifier of an encoded extrinsic: blake2-256 hex without `0x`.
pub fn transaction_hash(extrinsic: &[u8]) -> String {
    hex::encode(blake2_256(extrinsic))
}

/// Normalizes a hex hash into the transaction identifier form (lowercase, no `0x`).
pub fn normalize_transaction_hash(hash: &str) -> String {
    hash.trim_start_matches("0x").to_lowercase()
}

/// Builds a [`BlockHeader`] from a `chain_getHeader` reply for the block `hash`.
pub fn header_from_json(
    hash: BlockHash,
    header_json: &serde_json::Value,
) -> Result<BlockHeader, HashError> {
    let parent = header_json
        .get("parentHash")
        .and_then(|v| v.as_str())
        .ok_or_else(|| HashError::MissingField("parentHash".to_string()))?;
    let parent_hash = parent
        .parse::<BlockHash>()
        .map_err(|e| HashError::InvalidHex(format!("parentHash: {}", e)))?;

    let number_json = header_json
        .get("number")
        .ok_or_else(|| HashError::MissingField("number".to_string()))?;
    let number = json_to_u64(number_json)
        .ok_or_else(|| HashError::InvalidNumber(number_json.to_string()))?;

    Ok(BlockHeader {
        hash,
        parent_hash,
        number,
    })
}
