// Copyright (C) 2026 Parity Technologies (UK) Ltd.
// SPDX-License-Identifier: GPL-3.0-or-later

pub mod concurrency;
pub mod hash;
pub mod json;

pub use concurrency::run_with_concurrency_ordered;
pub use hash::{HashError, header_from_json, normalize_transaction_hash, transaction_hash};
pub use json::{json_to_u64, json_to_u128};
