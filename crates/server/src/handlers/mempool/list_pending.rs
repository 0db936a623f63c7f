// Copyright (C) 2026 Parity Technologies (UK) Ltd.
// SPDX-License-Identifier: GPL-3.0-or-later

use crate::error::ApiResult;
use crate::extractors::JsonBody;
use crate::state::AppState;
use crate::types::{MempoolResponse, NetworkRequest, TransactionIdentifier};
use crate::utils::transaction_hash;
use axum::{Json, extract::State};

/// Handler for POST /mempool
pub async fn mempool(
    State(state): State<AppState>,
    JsonBody(request): JsonBody<NetworkRequest>,
) -> ApiResult<Json<MempoolResponse>> {
    let online = state.online(&request.network_identifier).await?;
    let pending = online.gateway.pending_extrinsics().await?;

    Ok(Json(MempoolResponse {
        transaction_identifiers: pending
            .iter()
            .map(|extrinsic| TransactionIdentifier {
                hash: transaction_hash(extrinsic),
            })
            .collect(),
    }))
}
