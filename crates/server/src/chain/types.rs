// Copyright (C) 2026 Parity Technologies (UK) Ltd.
// SPDX-License-Identifier: GPL-3.0-or-later

//! Chain-native data as returned by a [`super::ChainGateway`].

use crate::types::BlockHash;
use serde_json::Value;
use sp_core::hashing::blake2_256;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockHeader {
    pub hash: BlockHash,
    pub parent_hash: BlockHash,
    pub number: u64,
}

/// Point in block execution at which an event was emitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventPhase {
    Initialization,
    ApplyExtrinsic(u32),
    Finalization,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NativeEvent {
    pub phase: EventPhase,
    pub pallet: String,
    pub name: String,
    /// Positional event fields. Accounts are SS58 strings, balances decimal strings.
    pub data: Vec<Value>,
}

impl NativeEvent {
    /// Lowercase `pallet.event` lookup key.
    pub fn key(&self) -> String {
        format!("{}.{}", self.pallet, self.name).to_lowercase()
    }

    pub fn extrinsic_index(&self) -> Option<u32> {
        match self.phase {
            EventPhase::ApplyExtrinsic(index) => Some(index),
            _ => None,
        }
    }

    pub fn is(&self, pallet: &str, name: &str) -> bool {
        self.pallet.eq_ignore_ascii_case(pallet) && self.name.eq_ignore_ascii_case(name)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct NativeExtrinsic {
    pub index: u32,
    /// Full encoding, length prefix included.
    pub bytes: Vec<u8>,
    pub pallet: String,
    pub call: String,
    /// SS58 address of the signer for signed extrinsics.
    pub signer: Option<String>,
    /// Named call arguments.
    pub args: Value,
}

impl NativeExtrinsic {
    pub fn hash(&self) -> [u8; 32] {
        blake2_256(&self.bytes)
    }

    pub fn is_signed(&self) -> bool {
        self.signer.is_some()
    }

    /// Lowercase `pallet.call` lookup key.
    pub fn key(&self) -> String {
        format!("{}.{}", self.pallet, self.call).to_lowercase()
    }

    pub fn is(&self, pallet: &str, call: &str) -> bool {
        self.pallet.eq_ignore_ascii_case(pallet) && self.call.eq_ignore_ascii_case(call)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct NativeBlock {
    pub header: BlockHeader,
    pub extrinsics: Vec<NativeExtrinsic>,
    /// Value of the `Timestamp.set` inherent, in milliseconds.
    pub timestamp: Option<u64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AccountState {
    pub nonce: u64,
    pub free: u128,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RuntimeVersion {
    pub spec_version: u32,
    pub transaction_version: u32,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_event_key_and_phase() {
        let event = NativeEvent {
            phase: EventPhase::ApplyExtrinsic(3),
            pallet: "Balances".to_string(),
            name: "Transfer".to_string(),
            data: vec![],
        };
        assert_eq!(event.key(), "balances.transfer");
        assert_eq!(event.extrinsic_index(), Some(3));
        assert!(event.is("balances", "TRANSFER"));

        let system = NativeEvent {
            phase: EventPhase::Finalization,
            ..event
        };
        assert_eq!(system.extrinsic_index(), None);
    }

    #[test]
    fn test_extrinsic_hash_covers_full_bytes() {
        let ext = NativeExtrinsic {
            index: 0,
            bytes: vec![0x10, 0x04, 0x00, 0x01, 0x02],
            pallet: "Timestamp".to_string(),
            call: "set".to_string(),
            signer: None,
            args: json!({}),
        };
        assert_eq!(ext.hash(), blake2_256(&[0x10, 0x04, 0x00, 0x01, 0x02]));
        assert!(!ext.is_signed());
        assert!(ext.is("timestamp", "set"));
    }
}
