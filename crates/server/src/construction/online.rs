// Copyright (C) 2026 Parity Technologies (UK) Ltd.
// SPDX-License-Identifier: GPL-3.0-or-later

//! Construction stages that read live chain state.

use super::codec::{SignedTransfer, TransferCall};
use super::crypto::decode_hex;
use super::intent::ConstructionMetadata;
use crate::block::FeeLookup;
use crate::chain::{ChainError, ChainGateway, ChainRegistry};
use crate::error::{ApiError, ApiResult};
use crate::types::{
    Amount, ConstructionMetadataRequest, ConstructionMetadataResponse,
    ConstructionSubmitRequest, TransactionIdentifier, TransactionIdentifierResponse,
};
use crate::utils::transaction_hash;
use sp_core::sr25519;
use sp_runtime::MultiSignature;
use sp_runtime::generic::Era;
use tracing::{debug, info, warn};

/// Nonce, era anchor and runtime versions for a transfer from `options.from`.
pub async fn metadata(
    gateway: &dyn ChainGateway,
    registry: &ChainRegistry,
    fees: &FeeLookup,
    request: &ConstructionMetadataRequest,
) -> ApiResult<ConstructionMetadataResponse> {
    let from = request
        .options
        .as_ref()
        .and_then(|options| options.get("from"))
        .and_then(|from| from.as_str())
        .ok_or_else(|| ApiError::InvalidRequest("options.from is required".to_string()))?;
    let account = registry.decode_address(from)?;

    let head = gateway.finalized_head().await?;
    let header = gateway
        .header(head)
        .await?
        .ok_or_else(|| ChainError::NotFound(format!("header {}", head)))?;
    let (state, runtime) = tokio::try_join!(
        gateway.account_state(head, &account),
        gateway.runtime_version(head)
    )?;

    let era = Era::mortal(registry.era_period, header.number);
    let birth = era.birth(header.number);
    let block_hash = if birth == header.number {
        head
    } else {
        gateway
            .block_hash(birth)
            .await?
            .ok_or_else(|| ChainError::NotFound(format!("block {}", birth)))?
    };

    let metadata = ConstructionMetadata {
        nonce: state.nonce,
        block_hash,
        block_number: header.number,
        era_period: registry.era_period,
        spec_version: runtime.spec_version,
        transaction_version: runtime.transaction_version,
        call_index: registry.transfer_call_index,
    };
    debug!(from, nonce = metadata.nonce, block = header.number, "Construction metadata");

    // Zero-signed self transfer: the fee depends on weight and length only.
    let fee_sample = SignedTransfer {
        signer: account.clone(),
        signature: MultiSignature::Sr25519(sr25519::Signature::from_raw([0u8; 64])),
        era,
        nonce: metadata.nonce,
        tip: 0,
        call: TransferCall {
            call_index: registry.transfer_call_index,
            dest: account,
            value: 0,
        },
    };
    let suggested_fee = fees
        .try_estimate(gateway, &fee_sample.encode(registry.address_format), head)
        .await
        .map(|fee| {
            vec![Amount {
                value: fee.to_string(),
                currency: registry.currency.clone(),
                metadata: None,
            }]
        });

    Ok(ConstructionMetadataResponse {
        metadata: metadata.to_value(),
        suggested_fee,
    })
}

/// Broadcasts a signed transfer after checking its nonce is still current.
pub async fn submit(
    gateway: &dyn ChainGateway,
    registry: &ChainRegistry,
    request: &ConstructionSubmitRequest,
) -> ApiResult<TransactionIdentifierResponse> {
    let bytes = decode_hex(&request.signed_transaction)?;
    let signed = SignedTransfer::decode(
        &bytes,
        registry.address_format,
        Some(registry.transfer_call_index),
    )
    .map_err(|e| ApiError::UnexpectedTransactionShape(e.to_string()))?;

    let head = gateway.finalized_head().await?;
    let live = gateway.account_state(head, &signed.signer).await?.nonce;
    if live != signed.nonce {
        warn!(embedded = signed.nonce, live, "Refusing to submit with stale nonce");
        return Err(ApiError::StaleNonce {
            embedded: signed.nonce,
            live,
        });
    }

    let node_hash = gateway
        .submit(&bytes)
        .await
        .map_err(|e| ApiError::BroadcastFailed(e.to_string()))?;
    let hash = transaction_hash(&bytes);
    info!(hash = %hash, node_hash = ?node_hash, "Submitted transaction");

    Ok(TransactionIdentifierResponse {
        transaction_identifier: TransactionIdentifier { hash },
        metadata: None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chain::AccountState;
    use crate::test_fixtures::{
        FeeReply, MockGateway, TEST_SPEC_VERSION, TEST_TRANSACTION_VERSION, account, address,
        native_block, test_network_id, test_registry,
    };
    use serde_json::json;

    const FEES: FeeLookup = FeeLookup {
        timeout_ms: 50,
        max_concurrency: 1,
    };

    fn metadata_request(from: &str) -> ConstructionMetadataRequest {
        ConstructionMetadataRequest {
            network_identifier: test_network_id(),
            options: Some(json!({ "from": from })),
            public_keys: None,
        }
    }

    fn signed_with_nonce(nonce: u64) -> String {
        let transfer = SignedTransfer {
            signer: account(1),
            signature: MultiSignature::Sr25519(sr25519::Signature::from_raw([1u8; 64])),
            era: Era::mortal(64, 10),
            nonce,
            tip: 0,
            call: TransferCall {
                call_index: test_registry().transfer_call_index,
                dest: account(2),
                value: 100,
            },
        };
        format!("0x{}", hex::encode(transfer.encode(test_registry().address_format)))
    }

    fn chain_at(number: u64) -> MockGateway {
        (1..=number).fold(MockGateway::new(), |gateway, n| {
            gateway.with_block(native_block(n, vec![], None), vec![])
        })
    }

    #[tokio::test]
    async fn test_metadata_reads_live_state() {
        let gateway = chain_at(10).with_default_fee(FeeReply::Fee(125));
        let head = gateway.finalized();
        let gateway = gateway.with_account(head, account(1), AccountState { nonce: 3, free: 10 });

        let response = metadata(&gateway, &test_registry(), &FEES, &metadata_request(&address(1)))
            .await
            .unwrap();

        let parsed = ConstructionMetadata::from_value(Some(&response.metadata)).unwrap();
        assert_eq!(parsed.nonce, 3);
        assert_eq!(parsed.block_number, 10);
        assert_eq!(parsed.block_hash, head);
        assert_eq!(parsed.era_period, 64);
        assert_eq!(parsed.spec_version, TEST_SPEC_VERSION);
        assert_eq!(parsed.transaction_version, TEST_TRANSACTION_VERSION);
        assert_eq!(parsed.call_index, test_registry().transfer_call_index);

        let fee = response.suggested_fee.unwrap();
        assert_eq!(fee[0].value, "125");
        assert_eq!(fee[0].currency.symbol, "NODL");
    }

    #[tokio::test]
    async fn test_metadata_without_fee_estimate() {
        let gateway = chain_at(3).with_default_fee(FeeReply::Fail);
        let response = metadata(&gateway, &test_registry(), &FEES, &metadata_request(&address(1)))
            .await
            .unwrap();
        assert!(response.suggested_fee.is_none());
        assert_eq!(response.metadata["nonce"], 0);
    }

    #[tokio::test]
    async fn test_metadata_requires_sender() {
        let request = ConstructionMetadataRequest {
            network_identifier: test_network_id(),
            options: None,
            public_keys: None,
        };
        let result = metadata(&MockGateway::new(), &test_registry(), &FEES, &request).await;
        assert!(matches!(result, Err(ApiError::InvalidRequest(_))));
    }

    #[tokio::test]
    async fn test_metadata_upstream_failure_is_retriable() {
        let gateway = MockGateway::new().unreachable();
        let err = metadata(&gateway, &test_registry(), &FEES, &metadata_request(&address(1)))
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::UpstreamUnavailable(_)));
        assert!(err.retriable());
    }

    #[tokio::test]
    async fn test_submit_broadcasts_with_current_nonce() {
        let gateway = chain_at(2);
        let head = gateway.finalized();
        let gateway = gateway.with_account(head, account(1), AccountState { nonce: 5, free: 0 });

        let signed_transaction = signed_with_nonce(5);
        let request = ConstructionSubmitRequest {
            network_identifier: test_network_id(),
            signed_transaction: signed_transaction.clone(),
        };
        let response = submit(&gateway, &test_registry(), &request).await.unwrap();

        let bytes = hex::decode(signed_transaction.trim_start_matches("0x")).unwrap();
        assert_eq!(response.transaction_identifier.hash, transaction_hash(&bytes));
        assert_eq!(gateway.submitted(), vec![bytes]);
    }

    #[tokio::test]
    async fn test_submit_stale_nonce_is_not_broadcast() {
        let gateway = chain_at(2);
        let head = gateway.finalized();
        let gateway = gateway.with_account(head, account(1), AccountState { nonce: 6, free: 0 });

        let request = ConstructionSubmitRequest {
            network_identifier: test_network_id(),
            signed_transaction: signed_with_nonce(5),
        };
        let err = submit(&gateway, &test_registry(), &request).await.unwrap_err();
        assert!(matches!(err, ApiError::StaleNonce { embedded: 5, live: 6 }));
        assert!(err.retriable());
        assert!(gateway.submitted().is_empty());
    }

    #[tokio::test]
    async fn test_submit_reports_broadcast_cause() {
        let gateway = chain_at(1).with_submit_error("1010: Invalid Transaction");
        let request = ConstructionSubmitRequest {
            network_identifier: test_network_id(),
            signed_transaction: signed_with_nonce(0),
        };
        let err = submit(&gateway, &test_registry(), &request).await.unwrap_err();
        match err {
            ApiError::BroadcastFailed(cause) => assert!(cause.contains("1010")),
            other => panic!("unexpected error {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_submit_rejects_foreign_extrinsic() {
        let request = ConstructionSubmitRequest {
            network_identifier: test_network_id(),
            signed_transaction: "0x280403000b207eba5c9001".to_string(),
        };
        let err = submit(&MockGateway::new(), &test_registry(), &request)
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::UnexpectedTransactionShape(_)));
    }
}
