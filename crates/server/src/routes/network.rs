// Copyright (C) 2026 Parity Technologies (UK) Ltd.
// SPDX-License-Identifier: GPL-3.0-or-later

use axum::{Router, routing::post};

use crate::{
    handlers::{account, block, mempool, network},
    routes::{RegisterRoute, RouteRegistry},
    state::AppState,
};

/// Data API routes: network, block, account and mempool.
pub fn routes(registry: &RouteRegistry) -> Router<AppState> {
    Router::new()
        .route_registered(registry, "/network/list", "post", post(network::network_list))
        .route_registered(registry, "/network/options", "post", post(network::network_options))
        .route_registered(registry, "/network/status", "post", post(network::network_status))
        .route_registered(registry, "/block", "post", post(block::block))
        .route_registered(registry, "/block/transaction", "post", post(block::block_transaction))
        .route_registered(registry, "/account/balance", "post", post(account::account_balance))
        .route_registered(registry, "/account/coins", "post", post(account::account_coins))
        .route_registered(registry, "/mempool", "post", post(mempool::mempool))
        .route_registered(
            registry,
            "/mempool/transaction",
            "post",
            post(mempool::mempool_transaction),
        )
}
