// Copyright (C) 2026 Parity Technologies (UK) Ltd.
// SPDX-License-Identifier: GPL-3.0-or-later

//! Block handlers.

mod get_block;
mod block_transaction;

pub use get_block::block;
pub use block_transaction::block_transaction;
