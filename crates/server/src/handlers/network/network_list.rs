// Copyright (C) 2026 Parity Technologies (UK) Ltd.
// SPDX-License-Identifier: GPL-3.0-or-later

use crate::error::ApiResult;
use crate::extractors::JsonBody;
use crate::state::AppState;
use crate::types::{MetadataRequest, NetworkListResponse};
use axum::{Json, extract::State};

/// Handler for POST /network/list
pub async fn network_list(
    State(state): State<AppState>,
    JsonBody(_request): JsonBody<MetadataRequest>,
) -> ApiResult<Json<NetworkListResponse>> {
    Ok(Json(NetworkListResponse {
        network_identifiers: state.networks.identifiers(),
    }))
}
