// Copyright (C) 2026 Parity Technologies (UK) Ltd.
// SPDX-License-Identifier: GPL-3.0-or-later

use crate::consts::ROSETTA_VERSION;
use crate::error::{ApiError, ApiResult};
use crate::extractors::JsonBody;
use crate::operations::TxStatus;
use crate::state::AppState;
use crate::types::{Allow, NetworkOptionsResponse, NetworkRequest, OperationStatus, Version};
use axum::{Json, extract::State};
use tracing::warn;

/// Handler for POST /network/options
///
/// Works offline: the node version falls back to this service's version when
/// no node can be reached.
pub async fn network_options(
    State(state): State<AppState>,
    JsonBody(request): JsonBody<NetworkRequest>,
) -> ApiResult<Json<NetworkOptionsResponse>> {
    state.registry(&request.network_identifier)?;
    let middleware_version = env!("CARGO_PKG_VERSION").to_string();

    let node_version = if state.networks.is_offline() {
        middleware_version.clone()
    } else {
        let online = state.online(&request.network_identifier).await;
        let version = match online {
            Ok(online) => online.gateway.node_version().await.map_err(ApiError::from),
            Err(e) => Err(e),
        };
        version.unwrap_or_else(|e| {
            warn!(error = %e, "Node version unavailable");
            middleware_version.clone()
        })
    };

    let operation_statuses = TxStatus::ALL
        .iter()
        .map(|status| OperationStatus {
            status: status.as_str().to_string(),
            successful: status.successful(),
        })
        .collect();

    Ok(Json(NetworkOptionsResponse {
        version: Version {
            rosetta_version: ROSETTA_VERSION.to_string(),
            node_version,
            middleware_version: Some(middleware_version),
        },
        allow: Allow {
            operation_statuses,
            operation_types: state.mapper.table().operation_types(),
            errors: ApiError::all(),
            historical_balance_lookup: true,
        },
    }))
}
