// Copyright (C) 2026 Parity Technologies (UK) Ltd.
// SPDX-License-Identifier: GPL-3.0-or-later

use crate::error::ApiResult;
use crate::extractors::JsonBody;
use crate::state::AppState;
use crate::types::{BlockRequest, BlockResponse};
use axum::{Json, extract::State};

/// Handler for POST /block
///
/// Resolves the block by hash or index (the finalized head when neither is
/// given) and returns every transaction with its operations.
pub async fn block(
    State(state): State<AppState>,
    JsonBody(request): JsonBody<BlockRequest>,
) -> ApiResult<Json<BlockResponse>> {
    let online = state.online(&request.network_identifier).await?;
    let block = state
        .assembler(&online)
        .block(Some(&request.block_identifier))
        .await?;

    Ok(Json(BlockResponse {
        block,
        other_transactions: None,
    }))
}
