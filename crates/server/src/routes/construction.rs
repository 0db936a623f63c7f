// Copyright (C) 2026 Parity Technologies (UK) Ltd.
// SPDX-License-Identifier: GPL-3.0-or-later

use axum::{Router, routing::post};

use crate::{
    handlers::construction,
    routes::{RegisterRoute, RouteRegistry},
    state::AppState,
};

/// Construction API routes.
pub fn routes(registry: &RouteRegistry) -> Router<AppState> {
    Router::new()
        .route_registered(
            registry,
            "/construction/derive",
            "post",
            post(construction::construction_derive),
        )
        .route_registered(
            registry,
            "/construction/preprocess",
            "post",
            post(construction::construction_preprocess),
        )
        .route_registered(
            registry,
            "/construction/metadata",
            "post",
            post(construction::construction_metadata),
        )
        .route_registered(
            registry,
            "/construction/payloads",
            "post",
            post(construction::construction_payloads),
        )
        .route_registered(
            registry,
            "/construction/combine",
            "post",
            post(construction::construction_combine),
        )
        .route_registered(
            registry,
            "/construction/parse",
            "post",
            post(construction::construction_parse),
        )
        .route_registered(
            registry,
            "/construction/hash",
            "post",
            post(construction::construction_hash),
        )
        .route_registered(
            registry,
            "/construction/submit",
            "post",
            post(construction::construction_submit),
        )
}
