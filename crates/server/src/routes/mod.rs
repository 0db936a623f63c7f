// Copyright (C) 2026 Parity Technologies (UK) Ltd.
// SPDX-License-Identifier: GPL-3.0-or-later

pub mod construction;
pub mod network;
pub mod registry;
pub mod root;

pub use registry::{RegisterRoute, RouteInfo, RouteRegistry};
