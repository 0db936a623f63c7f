// Copyright (C) 2026 Parity Technologies (UK) Ltd.
// SPDX-License-Identifier: GPL-3.0-or-later

/// Rosetta API version implemented by this service.
pub const ROSETTA_VERSION: &str = "1.4.0";
