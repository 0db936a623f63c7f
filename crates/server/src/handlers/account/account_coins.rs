// Copyright (C) 2026 Parity Technologies (UK) Ltd.
// SPDX-License-Identifier: GPL-3.0-or-later

use crate::error::{ApiError, ApiResult};
use crate::extractors::JsonBody;
use crate::state::AppState;
use crate::types::AccountCoinsRequest;
use axum::{Json, extract::State};
use serde_json::Value;

/// Handler for POST /account/coins
///
/// Account-based chain: there are no coins to list.
pub async fn account_coins(
    State(state): State<AppState>,
    JsonBody(request): JsonBody<AccountCoinsRequest>,
) -> ApiResult<Json<Value>> {
    state.registry(&request.network_identifier)?;
    Err(ApiError::NotImplemented("/account/coins"))
}
