// Copyright (C) 2026 Parity Technologies (UK) Ltd.
// SPDX-License-Identifier: GPL-3.0-or-later

//! Construction stages that never touch the chain.

use super::codec::{SignedTransfer, TransferCall};
use super::crypto::{KeyScheme, decode_hex};
use super::intent::{
    ConstructionMetadata, TransferIntent, UnsignedTransactionIntent, sender, transfer_operations,
};
use crate::chain::ChainRegistry;
use crate::error::{ApiError, ApiResult};
use crate::types::{
    AccountIdentifier, ConstructionCombineRequest, ConstructionCombineResponse,
    ConstructionDeriveRequest, ConstructionDeriveResponse, ConstructionHashRequest,
    ConstructionParseRequest, ConstructionParseResponse, ConstructionPayloadsRequest,
    ConstructionPayloadsResponse, ConstructionPreprocessRequest, ConstructionPreprocessResponse,
    PublicKey, SignatureType, SigningPayload, TransactionIdentifier, TransactionIdentifierResponse,
};
use crate::utils::transaction_hash;
use serde_json::json;
use tracing::debug;

pub fn derive(
    registry: &ChainRegistry,
    request: &ConstructionDeriveRequest,
) -> ApiResult<ConstructionDeriveResponse> {
    let scheme = KeyScheme::from_curve(request.public_key.curve_type)?;
    let public = decode_hex(&request.public_key.hex_bytes)?;
    let account = scheme
        .account_id(&public)
        .map_err(|e| ApiError::InvalidRequest(e.to_string()))?;
    let address = registry.encode_address(&account);

    Ok(ConstructionDeriveResponse {
        account_identifier: AccountIdentifier::new(address.clone()),
        address,
    })
}

pub fn preprocess(
    registry: &ChainRegistry,
    request: &ConstructionPreprocessRequest,
) -> ApiResult<ConstructionPreprocessResponse> {
    let from = sender(&request.operations)?;
    registry.decode_address(&from)?;

    Ok(ConstructionPreprocessResponse {
        options: json!({ "from": from }),
        required_public_keys: vec![AccountIdentifier::new(from)],
    })
}

/// Signature type of the key among `public_keys` that controls `address`.
fn signature_type_for(
    registry: &ChainRegistry,
    address: &str,
    public_keys: Option<&[PublicKey]>,
) -> Option<SignatureType> {
    let account = registry.decode_address(address).ok()?;
    public_keys?.iter().find_map(|key| {
        let scheme = KeyScheme::from_curve(key.curve_type).ok()?;
        let public = decode_hex(&key.hex_bytes).ok()?;
        (scheme.account_id(&public).ok()? == account).then(|| scheme.signature_type())
    })
}

pub fn payloads(
    registry: &ChainRegistry,
    request: &ConstructionPayloadsRequest,
) -> ApiResult<ConstructionPayloadsResponse> {
    let transfer = TransferIntent::from_operations(&request.operations, registry)?;
    let metadata = ConstructionMetadata::from_value(request.metadata.as_ref())?;
    let intent = UnsignedTransactionIntent::new(registry, &transfer, &metadata);
    let payload = intent.signing_payload(registry)?;

    let signature_type =
        signature_type_for(registry, &intent.from, request.public_keys.as_deref());

    Ok(ConstructionPayloadsResponse {
        unsigned_transaction: intent.to_json()?,
        payloads: vec![SigningPayload {
            address: None,
            account_identifier: Some(AccountIdentifier::new(intent.from.clone())),
            hex_bytes: hex::encode(payload),
            signature_type,
        }],
    })
}

pub fn combine(
    registry: &ChainRegistry,
    request: &ConstructionCombineRequest,
) -> ApiResult<ConstructionCombineResponse> {
    let intent = UnsignedTransactionIntent::from_json(&request.unsigned_transaction)?;

    let [signature] = request.signatures.as_slice() else {
        return Err(ApiError::InvalidRequest(format!(
            "Expected exactly one signature, got {}",
            request.signatures.len()
        )));
    };

    let scheme = KeyScheme::from_curve(signature.public_key.curve_type)?;
    let public = decode_hex(&signature.public_key.hex_bytes)?;
    let signer = scheme
        .account_id(&public)
        .map_err(|e| ApiError::InvalidSignature(e.to_string()))?;
    let from = registry.decode_address(&intent.from)?;
    if signer != from {
        return Err(ApiError::InvalidSignature(format!(
            "Public key does not control sender {}",
            intent.from
        )));
    }

    let call = intent.call(registry)?;
    let call_bytes = call.encode(registry.address_format);
    let rebuilt = TransferCall::decode(
        &call_bytes,
        registry.address_format,
        Some(intent.call_index),
    )
    .map_err(|e| ApiError::UnexpectedTransactionShape(e.to_string()))?;
    if rebuilt != call {
        return Err(ApiError::UnexpectedTransactionShape(
            "Rebuilt call does not match the intent".to_string(),
        ));
    }

    let payload = intent.signing_payload(registry)?;
    let signature_bytes = decode_hex(&signature.hex_bytes)?;
    let multi = scheme
        .verify(&payload, &signature_bytes, &public, signature.signature_type)?
        .ok_or_else(|| {
            ApiError::InvalidSignature(format!(
                "Signature does not verify for {}",
                intent.from
            ))
        })?;

    let signed = SignedTransfer {
        signer: from,
        signature: multi,
        era: intent.era(),
        nonce: intent.nonce,
        tip: 0,
        call,
    };

    Ok(ConstructionCombineResponse {
        signed_transaction: format!("0x{}", hex::encode(signed.encode(registry.address_format))),
    })
}

/// Decodes a signed extrinsic produced by [`combine`]. The call index is the
/// one the intent carried from `metadata`, unknown to the offline registry.
pub fn decode_signed(registry: &ChainRegistry, signed_transaction: &str) -> ApiResult<SignedTransfer> {
    let bytes = decode_hex(signed_transaction)?;
    SignedTransfer::decode(
        &bytes,
        registry.address_format,
        None,
    )
    .map_err(|e| ApiError::UnexpectedTransactionShape(e.to_string()))
}

pub fn parse(
    registry: &ChainRegistry,
    request: &ConstructionParseRequest,
) -> ApiResult<ConstructionParseResponse> {
    let text = request.transaction.trim();
    let is_intent = text.starts_with('{');
    debug!(signed = request.signed, is_intent, "Parsing transaction");

    match (request.signed, is_intent) {
        (false, true) => {
            let intent = UnsignedTransactionIntent::from_json(text)?;
            Ok(ConstructionParseResponse {
                operations: intent.operations(registry)?,
                account_identifier_signers: vec![],
                metadata: None,
            })
        }
        (true, false) => {
            let signed = decode_signed(registry, text)?;
            let from = registry.encode_address(&signed.signer);
            let to = registry.encode_address(&signed.call.dest);
            Ok(ConstructionParseResponse {
                operations: transfer_operations(registry, &from, &to, signed.call.value, None),
                account_identifier_signers: vec![AccountIdentifier::new(from)],
                metadata: Some(json!({ "nonce": signed.nonce })),
            })
        }
        (signed, _) => Err(ApiError::InvalidRequest(format!(
            "Transaction is {} but request says signed={}",
            if is_intent { "unsigned" } else { "signed" },
            signed
        ))),
    }
}

pub fn hash(request: &ConstructionHashRequest) -> ApiResult<TransactionIdentifierResponse> {
    let bytes = decode_hex(&request.signed_transaction)?;
    if bytes.is_empty() {
        return Err(ApiError::InvalidRequest("Empty transaction".to_string()));
    }

    Ok(TransactionIdentifierResponse {
        transaction_identifier: TransactionIdentifier {
            hash: transaction_hash(&bytes),
        },
        metadata: None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_fixtures::{address, block_hash_at, test_network_id, test_registry};
    use crate::types::{CurveType, Operation, Signature};
    use sp_core::crypto::{AccountId32, Pair};
    use sp_core::hashing::blake2_256;
    use sp_core::{ecdsa, ed25519, sr25519};

    fn metadata() -> serde_json::Value {
        ConstructionMetadata {
            nonce: 7,
            block_hash: block_hash_at(120),
            block_number: 120,
            era_period: 64,
            spec_version: 19,
            transaction_version: 1,
            call_index: [5, 0],
        }
        .to_value()
    }

    fn sr_key(pair: &sr25519::Pair) -> PublicKey {
        PublicKey {
            hex_bytes: hex::encode(pair.public().0),
            curve_type: CurveType::Sr25519,
        }
    }

    fn transfer_ops(from: &str, to: &str, value: u128) -> Vec<Operation> {
        transfer_operations(&test_registry(), from, to, value, None)
    }

    fn payloads_for(from: &str, value: u128, keys: Option<Vec<PublicKey>>) -> ConstructionPayloadsResponse {
        payloads(
            &test_registry(),
            &ConstructionPayloadsRequest {
                network_identifier: test_network_id(),
                operations: transfer_ops(from, &address(2), value),
                metadata: Some(metadata()),
                public_keys: keys,
            },
        )
        .unwrap()
    }

    fn combine_with(
        unsigned: &str,
        payload: &SigningPayload,
        public_key: PublicKey,
        signature_type: SignatureType,
        signature: Vec<u8>,
    ) -> ApiResult<ConstructionCombineResponse> {
        combine(
            &test_registry(),
            &ConstructionCombineRequest {
                network_identifier: test_network_id(),
                unsigned_transaction: unsigned.to_string(),
                signatures: vec![Signature {
                    signing_payload: payload.clone(),
                    public_key,
                    signature_type,
                    hex_bytes: hex::encode(signature),
                }],
            },
        )
    }

    fn sr_address(pair: &sr25519::Pair) -> String {
        test_registry().encode_address(&AccountId32::from(pair.public()))
    }

    #[test]
    fn test_derive_per_curve() {
        let registry = test_registry();
        let derive_with = |hex_bytes: String, curve_type| {
            derive(
                &registry,
                &ConstructionDeriveRequest {
                    network_identifier: test_network_id(),
                    public_key: PublicKey { hex_bytes, curve_type },
                    metadata: None,
                },
            )
        };

        let response = derive_with(hex::encode([1u8; 32]), CurveType::Edwards25519).unwrap();
        assert_eq!(response.address, address(1));
        assert_eq!(response.account_identifier.address, address(1));

        let ec = ecdsa::Pair::from_seed(&[9u8; 32]);
        let response = derive_with(hex::encode(ec.public().0), CurveType::Secp256k1).unwrap();
        let expected = registry.encode_address(&AccountId32::new(blake2_256(&ec.public().0)));
        assert_eq!(response.address, expected);

        assert!(matches!(
            derive_with(hex::encode([1u8; 32]), CurveType::Secp256r1),
            Err(ApiError::UnsupportedCurve(_))
        ));
        assert!(matches!(
            derive_with("zz".to_string(), CurveType::Sr25519),
            Err(ApiError::InvalidRequest(_))
        ));
    }

    #[test]
    fn test_preprocess_returns_sender() {
        let response = preprocess(
            &test_registry(),
            &ConstructionPreprocessRequest {
                network_identifier: test_network_id(),
                operations: transfer_ops(&address(1), &address(2), 10),
                metadata: None,
            },
        )
        .unwrap();
        assert_eq!(response.options["from"], address(1));
        assert_eq!(response.required_public_keys, vec![AccountIdentifier::new(address(1))]);
    }

    #[test]
    fn test_payloads_reports_signature_type_of_matching_key() {
        let pair = sr25519::Pair::from_seed(&[1u8; 32]);
        let from = sr_address(&pair);

        let response = payloads_for(&from, 10, Some(vec![sr_key(&pair)]));
        assert_eq!(response.payloads.len(), 1);
        assert_eq!(response.payloads[0].signature_type, Some(SignatureType::Sr25519));
        assert_eq!(response.payloads[0].signer(), Some(from.as_str()));

        let other = sr25519::Pair::from_seed(&[2u8; 32]);
        let response = payloads_for(&from, 10, Some(vec![sr_key(&other)]));
        assert_eq!(response.payloads[0].signature_type, None);
    }

    #[test]
    fn test_payloads_requires_metadata() {
        let result = payloads(
            &test_registry(),
            &ConstructionPayloadsRequest {
                network_identifier: test_network_id(),
                operations: transfer_ops(&address(1), &address(2), 10),
                metadata: None,
                public_keys: None,
            },
        );
        assert!(matches!(result, Err(ApiError::InvalidRequest(_))));
    }

    #[test]
    fn test_full_offline_round_trip() {
        let registry = test_registry();
        let pair = sr25519::Pair::from_seed(&[1u8; 32]);
        let from = sr_address(&pair);
        let ops = transfer_ops(&from, &address(2), 1_234_567);

        let unsigned = payloads_for(&from, 1_234_567, None);
        let parsed_unsigned = parse(
            &registry,
            &ConstructionParseRequest {
                network_identifier: test_network_id(),
                signed: false,
                transaction: unsigned.unsigned_transaction.clone(),
            },
        )
        .unwrap();
        assert_eq!(parsed_unsigned.operations, ops);
        assert!(parsed_unsigned.account_identifier_signers.is_empty());

        let payload = &unsigned.payloads[0];
        let message = hex::decode(&payload.hex_bytes).unwrap();
        let signature = pair.sign(&message);
        let signed = combine_with(
            &unsigned.unsigned_transaction,
            payload,
            sr_key(&pair),
            SignatureType::Sr25519,
            signature.0.to_vec(),
        )
        .unwrap();
        assert!(signed.signed_transaction.starts_with("0x"));

        let parsed_signed = parse(
            &registry,
            &ConstructionParseRequest {
                network_identifier: test_network_id(),
                signed: true,
                transaction: signed.signed_transaction.clone(),
            },
        )
        .unwrap();
        assert_eq!(parsed_signed.operations, ops);
        assert_eq!(
            parsed_signed.account_identifier_signers,
            vec![AccountIdentifier::new(from)]
        );
        assert_eq!(parsed_signed.metadata.unwrap()["nonce"], 7);

        let hashed = hash(&ConstructionHashRequest {
            network_identifier: test_network_id(),
            signed_transaction: signed.signed_transaction.clone(),
        })
        .unwrap();
        let bytes = hex::decode(signed.signed_transaction.trim_start_matches("0x")).unwrap();
        assert_eq!(hashed.transaction_identifier.hash, hex::encode(blake2_256(&bytes)));
        assert!(!hashed.transaction_identifier.hash.starts_with("0x"));
    }

    #[test]
    fn test_combine_accepts_ed25519_and_ecdsa() {
        let registry = test_registry();

        let ed = ed25519::Pair::from_seed(&[3u8; 32]);
        let from = registry.encode_address(&AccountId32::new(ed.public().0));
        let unsigned = payloads_for(&from, 5, None);
        let message = hex::decode(&unsigned.payloads[0].hex_bytes).unwrap();
        let key = PublicKey {
            hex_bytes: hex::encode(ed.public().0),
            curve_type: CurveType::Edwards25519,
        };
        assert!(
            combine_with(
                &unsigned.unsigned_transaction,
                &unsigned.payloads[0],
                key,
                SignatureType::Ed25519,
                ed.sign(&message).0.to_vec(),
            )
            .is_ok()
        );

        let ec = ecdsa::Pair::from_seed(&[4u8; 32]);
        let from = registry.encode_address(&AccountId32::new(blake2_256(&ec.public().0)));
        let unsigned = payloads_for(&from, 5, None);
        let message = hex::decode(&unsigned.payloads[0].hex_bytes).unwrap();
        let key = PublicKey {
            hex_bytes: hex::encode(ec.public().0),
            curve_type: CurveType::Secp256k1,
        };
        assert!(
            combine_with(
                &unsigned.unsigned_transaction,
                &unsigned.payloads[0],
                key,
                SignatureType::EcdsaRecovery,
                ec.sign(&message).0.to_vec(),
            )
            .is_ok()
        );
    }

    #[test]
    fn test_combine_rejects_bad_signature() {
        let pair = sr25519::Pair::from_seed(&[1u8; 32]);
        let unsigned = payloads_for(&sr_address(&pair), 10, None);
        let signature = pair.sign(b"not the payload");

        let result = combine_with(
            &unsigned.unsigned_transaction,
            &unsigned.payloads[0],
            sr_key(&pair),
            SignatureType::Sr25519,
            signature.0.to_vec(),
        );
        assert!(matches!(result, Err(ApiError::InvalidSignature(_))));
    }

    #[test]
    fn test_combine_rejects_key_of_other_account() {
        let pair = sr25519::Pair::from_seed(&[1u8; 32]);
        let other = sr25519::Pair::from_seed(&[2u8; 32]);
        let unsigned = payloads_for(&sr_address(&pair), 10, None);
        let message = hex::decode(&unsigned.payloads[0].hex_bytes).unwrap();

        let result = combine_with(
            &unsigned.unsigned_transaction,
            &unsigned.payloads[0],
            sr_key(&other),
            SignatureType::Sr25519,
            other.sign(&message).0.to_vec(),
        );
        assert!(matches!(result, Err(ApiError::InvalidSignature(_))));
    }

    #[test]
    fn test_live_call_index_travels_in_the_intent() {
        let registry = test_registry();
        let pair = sr25519::Pair::from_seed(&[1u8; 32]);
        let from = sr_address(&pair);
        let mut live = ConstructionMetadata::from_value(Some(&metadata())).unwrap();
        live.call_index = [6, 7];

        let unsigned = payloads(
            &registry,
            &ConstructionPayloadsRequest {
                network_identifier: test_network_id(),
                operations: transfer_ops(&from, &address(2), 10),
                metadata: Some(live.to_value()),
                public_keys: None,
            },
        )
        .unwrap();
        let payload = &unsigned.payloads[0];
        let message = hex::decode(&payload.hex_bytes).unwrap();

        let signed = combine_with(
            &unsigned.unsigned_transaction,
            payload,
            sr_key(&pair),
            SignatureType::Sr25519,
            pair.sign(&message).0.to_vec(),
        )
        .unwrap();

        let decoded = decode_signed(&registry, &signed.signed_transaction).unwrap();
        assert_eq!(decoded.call.call_index, [6, 7]);
        assert_ne!(registry.transfer_call_index, [6, 7]);

        let parsed = parse(
            &registry,
            &ConstructionParseRequest {
                network_identifier: test_network_id(),
                signed: true,
                transaction: signed.signed_transaction,
            },
        )
        .unwrap();
        assert_eq!(parsed.operations, transfer_ops(&from, &address(2), 10));
    }

    #[test]
    fn test_combine_rejects_call_index_edited_after_signing() {
        let pair = sr25519::Pair::from_seed(&[1u8; 32]);
        let unsigned = payloads_for(&sr_address(&pair), 10, None);
        let message = hex::decode(&unsigned.payloads[0].hex_bytes).unwrap();
        let mut intent = UnsignedTransactionIntent::from_json(&unsigned.unsigned_transaction).unwrap();
        intent.call_index = [9, 9];

        let result = combine_with(
            &intent.to_json().unwrap(),
            &unsigned.payloads[0],
            sr_key(&pair),
            SignatureType::Sr25519,
            pair.sign(&message).0.to_vec(),
        );
        assert!(matches!(result, Err(ApiError::InvalidSignature(_))));
    }

    #[test]
    fn test_parse_rejects_mismatched_signed_flag() {
        let unsigned = payloads_for(&address(1), 10, None);
        let result = parse(
            &test_registry(),
            &ConstructionParseRequest {
                network_identifier: test_network_id(),
                signed: true,
                transaction: unsigned.unsigned_transaction,
            },
        );
        assert!(matches!(result, Err(ApiError::InvalidRequest(_))));
    }

    #[test]
    fn test_hash_rejects_garbage() {
        let result = hash(&ConstructionHashRequest {
            network_identifier: test_network_id(),
            signed_transaction: "0xnothex".to_string(),
        });
        assert!(matches!(result, Err(ApiError::InvalidRequest(_))));
    }
}
