// Copyright (C) 2026 Parity Technologies (UK) Ltd.
// SPDX-License-Identifier: GPL-3.0-or-later

use crate::block::block_identifier;
use crate::chain::ChainError;
use crate::error::ApiResult;
use crate::extractors::JsonBody;
use crate::state::AppState;
use crate::types::{BlockIdentifier, NetworkRequest, NetworkStatusResponse, Peer};
use axum::{Json, extract::State};

/// Handler for POST /network/status
///
/// Reports the finalized head as the current block.
pub async fn network_status(
    State(state): State<AppState>,
    JsonBody(request): JsonBody<NetworkRequest>,
) -> ApiResult<Json<NetworkStatusResponse>> {
    let online = state.online(&request.network_identifier).await?;
    let gateway = online.gateway.as_ref();

    let head = gateway.finalized_head().await?;
    let (block, genesis, peers) = tokio::try_join!(
        gateway.block(head),
        gateway.block_hash(0),
        gateway.peers()
    )?;
    let genesis = genesis.ok_or_else(|| ChainError::NotFound("genesis block".to_string()))?;

    Ok(Json(NetworkStatusResponse {
        current_block_identifier: block_identifier(&block.header),
        current_block_timestamp: block.timestamp.unwrap_or_default(),
        genesis_block_identifier: BlockIdentifier {
            index: 0,
            hash: genesis.to_string(),
        },
        peers: peers
            .into_iter()
            .map(|peer_id| Peer {
                peer_id,
                metadata: None,
            })
            .collect(),
    }))
}
