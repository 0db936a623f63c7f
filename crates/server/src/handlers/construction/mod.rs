// Copyright (C) 2026 Parity Technologies (UK) Ltd.
// SPDX-License-Identifier: GPL-3.0-or-later

//! Construction handlers.
//!
//! Offline stages resolve only the network registry, so they keep working
//! when the service runs with `--offline`.

mod offline;
mod online;

pub use offline::{
    construction_combine, construction_derive, construction_hash, construction_parse,
    construction_payloads, construction_preprocess,
};
pub use online::{construction_metadata, construction_submit};
