// Copyright (C) 2026 Parity Technologies (UK) Ltd.
// SPDX-License-Identifier: GPL-3.0-or-later

use crate::construction::online;
use crate::error::ApiResult;
use crate::extractors::JsonBody;
use crate::state::AppState;
use crate::types::{
    ConstructionMetadataRequest, ConstructionMetadataResponse, ConstructionSubmitRequest,
    TransactionIdentifierResponse,
};
use axum::{Json, extract::State};

/// Handler for POST /construction/metadata
pub async fn construction_metadata(
    State(state): State<AppState>,
    JsonBody(request): JsonBody<ConstructionMetadataRequest>,
) -> ApiResult<Json<ConstructionMetadataResponse>> {
    let network = state.online(&request.network_identifier).await?;
    online::metadata(
        network.gateway.as_ref(),
        &network.registry,
        &state.fee_lookup(),
        &request,
    )
    .await
    .map(Json)
}

/// Handler for POST /construction/submit
pub async fn construction_submit(
    State(state): State<AppState>,
    JsonBody(request): JsonBody<ConstructionSubmitRequest>,
) -> ApiResult<Json<TransactionIdentifierResponse>> {
    let network = state.online(&request.network_identifier).await?;
    online::submit(network.gateway.as_ref(), &network.registry, &request)
        .await
        .map(Json)
}
