// Copyright (C) 2026 Parity Technologies (UK) Ltd.
// SPDX-License-Identifier: GPL-3.0-or-later

use crate::construction::{SignedTransfer, transfer_operations};
use crate::error::{ApiError, ApiResult};
use crate::extractors::JsonBody;
use crate::state::AppState;
use crate::types::{
    MempoolTransactionRequest, MempoolTransactionResponse, Transaction, TransactionIdentifier,
};
use crate::utils::{normalize_transaction_hash, transaction_hash};
use axum::{Json, extract::State};
use tracing::debug;

/// Handler for POST /mempool/transaction
///
/// Pending transfers come back as a debit/credit pair without status. Other
/// pending calls have no operations until they are included.
pub async fn mempool_transaction(
    State(state): State<AppState>,
    JsonBody(request): JsonBody<MempoolTransactionRequest>,
) -> ApiResult<Json<MempoolTransactionResponse>> {
    let online = state.online(&request.network_identifier).await?;
    let registry = online.registry.as_ref();
    let wanted = normalize_transaction_hash(&request.transaction_identifier.hash);

    let pending = online.gateway.pending_extrinsics().await?;
    let extrinsic = pending
        .iter()
        .find(|extrinsic| transaction_hash(extrinsic) == wanted)
        .ok_or_else(|| ApiError::TransactionNotFound(wanted.clone()))?;

    let operations = match SignedTransfer::decode(
        extrinsic,
        registry.address_format,
        Some(registry.transfer_call_index),
    ) {
        Ok(transfer) => transfer_operations(
            registry,
            &registry.encode_address(&transfer.signer),
            &registry.encode_address(&transfer.call.dest),
            transfer.call.value,
            None,
        ),
        Err(e) => {
            debug!(hash = %wanted, error = %e, "Pending extrinsic is not a transfer");
            Vec::new()
        }
    };

    Ok(Json(MempoolTransactionResponse {
        transaction: Transaction {
            transaction_identifier: TransactionIdentifier { hash: wanted },
            operations,
            metadata: None,
        },
        metadata: None,
    }))
}
