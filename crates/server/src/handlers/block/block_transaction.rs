// Copyright (C) 2026 Parity Technologies (UK) Ltd.
// SPDX-License-Identifier: GPL-3.0-or-later

use crate::error::ApiResult;
use crate::extractors::JsonBody;
use crate::state::AppState;
use crate::types::{BlockTransactionRequest, BlockTransactionResponse};
use axum::{Json, extract::State};

/// Handler for POST /block/transaction
pub async fn block_transaction(
    State(state): State<AppState>,
    JsonBody(request): JsonBody<BlockTransactionRequest>,
) -> ApiResult<Json<BlockTransactionResponse>> {
    let online = state.online(&request.network_identifier).await?;
    let transaction = state
        .assembler(&online)
        .transaction(&request.block_identifier, &request.transaction_identifier)
        .await?;

    Ok(Json(BlockTransactionResponse { transaction }))
}
