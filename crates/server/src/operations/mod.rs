// Copyright (C) 2026 Parity Technologies (UK) Ltd.
// SPDX-License-Identifier: GPL-3.0-or-later

pub mod epoch;
pub mod mapper;
pub mod table;

pub use epoch::EpochEmissionCache;
pub use mapper::{
    Classification, Delta, MapperContext, OperationMapper, OperationsBuilder, classify,
    is_transfer_call,
};
pub use table::{OperationKind, OperationTable, TableError, TxStatus};
