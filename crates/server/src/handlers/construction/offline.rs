// Copyright (C) 2026 Parity Technologies (UK) Ltd.
// SPDX-License-Identifier: GPL-3.0-or-later

use crate::construction::offline;
use crate::error::ApiResult;
use crate::extractors::JsonBody;
use crate::state::AppState;
use crate::types::{
    ConstructionCombineRequest, ConstructionCombineResponse, ConstructionDeriveRequest,
    ConstructionDeriveResponse, ConstructionHashRequest, ConstructionParseRequest,
    ConstructionParseResponse, ConstructionPayloadsRequest, ConstructionPayloadsResponse,
    ConstructionPreprocessRequest, ConstructionPreprocessResponse, TransactionIdentifierResponse,
};
use axum::{Json, extract::State};

/// Handler for POST /construction/derive
pub async fn construction_derive(
    State(state): State<AppState>,
    JsonBody(request): JsonBody<ConstructionDeriveRequest>,
) -> ApiResult<Json<ConstructionDeriveResponse>> {
    let registry = state.registry(&request.network_identifier)?;
    offline::derive(&registry, &request).map(Json)
}

/// Handler for POST /construction/preprocess
pub async fn construction_preprocess(
    State(state): State<AppState>,
    JsonBody(request): JsonBody<ConstructionPreprocessRequest>,
) -> ApiResult<Json<ConstructionPreprocessResponse>> {
    let registry = state.registry(&request.network_identifier)?;
    offline::preprocess(&registry, &request).map(Json)
}

/// Handler for POST /construction/payloads
pub async fn construction_payloads(
    State(state): State<AppState>,
    JsonBody(request): JsonBody<ConstructionPayloadsRequest>,
) -> ApiResult<Json<ConstructionPayloadsResponse>> {
    let registry = state.registry(&request.network_identifier)?;
    offline::payloads(&registry, &request).map(Json)
}

/// Handler for POST /construction/combine
pub async fn construction_combine(
    State(state): State<AppState>,
    JsonBody(request): JsonBody<ConstructionCombineRequest>,
) -> ApiResult<Json<ConstructionCombineResponse>> {
    let registry = state.registry(&request.network_identifier)?;
    offline::combine(&registry, &request).map(Json)
}

/// Handler for POST /construction/parse
pub async fn construction_parse(
    State(state): State<AppState>,
    JsonBody(request): JsonBody<ConstructionParseRequest>,
) -> ApiResult<Json<ConstructionParseResponse>> {
    let registry = state.registry(&request.network_identifier)?;
    offline::parse(&registry, &request).map(Json)
}

/// Handler for POST /construction/hash
pub async fn construction_hash(
    State(state): State<AppState>,
    JsonBody(request): JsonBody<ConstructionHashRequest>,
) -> ApiResult<Json<TransactionIdentifierResponse>> {
    state.registry(&request.network_identifier)?;
    offline::hash(&request).map(Json)
}
