// Copyright (C) 2026 Parity Technologies (UK) Ltd.
// SPDX-License-Identifier: GPL-3.0-or-later

use crate::{logging::http_logger_middleware, routes, state::AppState};
use axum::{Router, middleware, routing::get};
use tower_http::{cors::CorsLayer, limit::RequestBodyLimitLayer};

pub fn create_app(state: AppState) -> Router {
    let registry = &state.route_registry;
    let request_limit = state.config.server.request_limit_bytes;

    Router::new()
        .route("/", get(routes::root::root_handler))
        .merge(routes::network::routes(registry))
        .merge(routes::construction::routes(registry))
        .layer(RequestBodyLimitLayer::new(request_limit))
        .layer(CorsLayer::permissive())
        .layer(middleware::from_fn(http_logger_middleware))
        .with_state(state)
}
