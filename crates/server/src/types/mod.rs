// Copyright (C) 2026 Parity Technologies (UK) Ltd.
// SPDX-License-Identifier: GPL-3.0-or-later

//! Wire types of the Rosetta API.

pub mod hash;
pub mod requests;
pub mod rosetta;

pub use hash::{BlockHash, HashParseError};
pub use requests::*;
pub use rosetta::*;
