// Copyright (C) 2026 Parity Technologies (UK) Ltd.
// SPDX-License-Identifier: GPL-3.0-or-later

//! Mempool handlers.

mod list_pending;
mod mempool_transaction;

pub use list_pending::mempool;
pub use mempool_transaction::mempool_transaction;
