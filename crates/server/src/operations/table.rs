// Copyright (C) 2026 Parity Technologies (UK) Ltd.
// SPDX-License-Identifier: GPL-3.0-or-later

//! Runtime event to operation type lookup.

use std::collections::HashMap;
use std::fmt;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OperationKind {
    Transfer,
    Fee,
    Reserved,
    Unreserved,
    Deposit,
    DustLost,
    BalanceSet,
    Endowed,
    Create,
    EpochEnds,
    NewAllocation,
}

impl OperationKind {
    pub const ALL: [OperationKind; 11] = [
        OperationKind::Transfer,
        OperationKind::Fee,
        OperationKind::Reserved,
        OperationKind::Unreserved,
        OperationKind::Deposit,
        OperationKind::DustLost,
        OperationKind::BalanceSet,
        OperationKind::Endowed,
        OperationKind::Create,
        OperationKind::EpochEnds,
        OperationKind::NewAllocation,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            OperationKind::Transfer => "Transfer",
            OperationKind::Fee => "Fee",
            OperationKind::Reserved => "Reserved",
            OperationKind::Unreserved => "Unreserved",
            OperationKind::Deposit => "Deposit",
            OperationKind::DustLost => "DustLost",
            OperationKind::BalanceSet => "BalanceSet",
            OperationKind::Endowed => "Endowed",
            OperationKind::Create => "Create",
            OperationKind::EpochEnds => "EpochEnds",
            OperationKind::NewAllocation => "NewAllocation",
        }
    }
}

impl fmt::Display for OperationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome recorded on every operation of a block transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TxStatus {
    Success,
    Failure,
    Unknown,
}

impl TxStatus {
    pub const ALL: [TxStatus; 3] = [TxStatus::Success, TxStatus::Failure, TxStatus::Unknown];

    pub fn as_str(&self) -> &'static str {
        match self {
            TxStatus::Success => "SUCCESS",
            TxStatus::Failure => "FAILURE",
            TxStatus::Unknown => "UNKNOWN",
        }
    }

    pub fn successful(&self) -> bool {
        matches!(self, TxStatus::Success)
    }
}

/// Which event the mapper is looking at. Argument positions depend on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKey {
    BalancesTransfer,
    BalancesTransferKeepAlive,
    BalancesReserved,
    BalancesUnreserved,
    BalancesDeposit,
    BalancesDustLost,
    BalancesBalanceSet,
    BalancesEndowed,
    SystemNewAccount,
    PoaTxnFeesGiven,
    PoaEpochEnds,
    AllocationsAllocate,
}

const MAPPINGS: &[(&str, EventKey, OperationKind)] = &[
    ("balances.transfer", EventKey::BalancesTransfer, OperationKind::Transfer),
    (
        "balances.transferkeepalive",
        EventKey::BalancesTransferKeepAlive,
        OperationKind::Transfer,
    ),
    ("balances.reserved", EventKey::BalancesReserved, OperationKind::Reserved),
    ("balances.unreserved", EventKey::BalancesUnreserved, OperationKind::Unreserved),
    ("balances.deposit", EventKey::BalancesDeposit, OperationKind::Deposit),
    ("balances.dustlost", EventKey::BalancesDustLost, OperationKind::DustLost),
    ("balances.balanceset", EventKey::BalancesBalanceSet, OperationKind::BalanceSet),
    ("balances.endowed", EventKey::BalancesEndowed, OperationKind::Endowed),
    ("system.newaccount", EventKey::SystemNewAccount, OperationKind::Create),
    ("poamodule.txnfeesgiven", EventKey::PoaTxnFeesGiven, OperationKind::Fee),
    ("poamodule.epochends", EventKey::PoaEpochEnds, OperationKind::EpochEnds),
    ("allocations.allocate", EventKey::AllocationsAllocate, OperationKind::NewAllocation),
];

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TableError {
    #[error("Duplicate operation mapping for '{0}'")]
    DuplicateKey(String),
}

/// Normalizes `Pallet.EventName` or `pallet.call_name` into a table key.
pub fn normalize_key(pallet: &str, name: &str) -> String {
    format!("{}.{}", pallet, name).to_lowercase().replace('_', "")
}

#[derive(Debug, Clone)]
pub struct OperationTable {
    entries: HashMap<&'static str, (EventKey, OperationKind)>,
}

impl OperationTable {
    pub fn new() -> Result<Self, TableError> {
        Self::from_entries(MAPPINGS)
    }

    fn from_entries(mappings: &[(&'static str, EventKey, OperationKind)]) -> Result<Self, TableError> {
        let mut entries = HashMap::with_capacity(mappings.len());
        for (key, event, kind) in mappings {
            if entries.insert(*key, (*event, *kind)).is_some() {
                return Err(TableError::DuplicateKey(key.to_string()));
            }
        }
        Ok(Self { entries })
    }

    pub fn lookup(&self, pallet: &str, name: &str) -> Option<(EventKey, OperationKind)> {
        self.entries.get(normalize_key(pallet, name).as_str()).copied()
    }

    /// Operation types this table can emit, in declaration order.
    pub fn operation_types(&self) -> Vec<String> {
        OperationKind::ALL
            .iter()
            .filter(|kind| self.entries.values().any(|(_, k)| k == *kind))
            .map(|kind| kind.to_string())
            .collect()
    }
}
