// Copyright (C) 2026 Parity Technologies (UK) Ltd.
// SPDX-License-Identifier: GPL-3.0-or-later

use crate::block::block_identifier;
use crate::error::ApiResult;
use crate::extractors::JsonBody;
use crate::state::AppState;
use crate::types::{AccountBalanceRequest, AccountBalanceResponse, Amount};
use axum::{Json, extract::State};
use serde_json::json;

/// Handler for POST /account/balance
///
/// Free balance at the requested block, with the account nonce in metadata.
pub async fn account_balance(
    State(state): State<AppState>,
    JsonBody(request): JsonBody<AccountBalanceRequest>,
) -> ApiResult<Json<AccountBalanceResponse>> {
    let registry = state.registry(&request.network_identifier)?;
    let account = registry.decode_address(&request.account_identifier.address)?;

    let online = state.online(&request.network_identifier).await?;
    let header = state
        .assembler(&online)
        .resolve(request.block_identifier.as_ref())
        .await?;
    let account_state = online.gateway.account_state(header.hash, &account).await?;

    Ok(Json(AccountBalanceResponse {
        block_identifier: block_identifier(&header),
        balances: vec![Amount {
            value: account_state.free.to_string(),
            currency: online.registry.currency.clone(),
            metadata: None,
        }],
        metadata: Some(json!({ "nonce": account_state.nonce })),
    }))
}
