// Copyright (C) 2026 Parity Technologies (UK) Ltd.
// SPDX-License-Identifier: GPL-3.0-or-later

pub mod account;
pub mod block;
pub mod construction;
pub mod mempool;
pub mod network;
