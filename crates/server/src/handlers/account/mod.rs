// Copyright (C) 2026 Parity Technologies (UK) Ltd.
// SPDX-License-Identifier: GPL-3.0-or-later

//! Account handlers.

mod account_balance;
mod account_coins;

pub use account_balance::account_balance;
pub use account_coins::account_coins;
