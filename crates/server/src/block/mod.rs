// Copyright (C) 2026 Parity Technologies (UK) Ltd.
// SPDX-License-Identifier: GPL-3.0-or-later

pub mod assembler;
pub mod fees;

pub use assembler::{BlockAssembler, block_identifier};
pub use fees::{DEFAULT_FEE, FeeLookup};
