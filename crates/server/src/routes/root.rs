// Copyright (C) 2026 Parity Technologies (UK) Ltd.
// SPDX-License-Identifier: GPL-3.0-or-later

use crate::consts::ROSETTA_VERSION;
use crate::state::AppState;
use axum::{Json, extract::State};
use serde_json::{Value, json};

/// Handler for GET /
///
/// Service version, mode and every registered route.
pub async fn root_handler(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "version": env!("CARGO_PKG_VERSION"),
        "rosetta_version": ROSETTA_VERSION,
        "offline": state.networks.is_offline(),
        "listen": format!("{}:{}", state.config.server.bind_host, state.config.server.port),
        "routes": state.route_registry.routes()
    }))
}
