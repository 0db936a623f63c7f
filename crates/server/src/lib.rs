// Copyright (C) 2026 Parity Technologies (UK) Ltd.
// SPDX-License-Identifier: GPL-3.0-or-later

pub mod app;
pub mod block;
pub mod chain;
pub mod consts;
pub mod construction;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod logging;
pub mod operations;
pub mod routes;
pub mod state;
pub mod types;
pub mod utils;

#[cfg(test)]
pub mod test_fixtures;
