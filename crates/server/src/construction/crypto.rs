// Copyright (C) 2026 Parity Technologies (UK) Ltd.
// SPDX-License-Identifier: GPL-3.0-or-later

//! Key schemes accepted by the construction endpoints.

use crate::types::{CurveType, SignatureType};
use sp_core::crypto::{AccountId32, Pair};
use sp_core::hashing::blake2_256;
use sp_core::{ecdsa, ed25519, sr25519};
use sp_runtime::MultiSignature;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CryptoError {
    #[error("Unsupported curve type {0:?}")]
    UnsupportedCurve(CurveType),

    #[error("Invalid hex: {0}")]
    InvalidHex(String),

    #[error("{scheme} public key must be {expected} bytes, got {found}")]
    PublicKeyLength {
        scheme: &'static str,
        expected: usize,
        found: usize,
    },

    #[error("{scheme} signature must be {expected} bytes, got {found}")]
    SignatureLength {
        scheme: &'static str,
        expected: usize,
        found: usize,
    },

    #[error("Signature type {found:?} does not match the {scheme} key")]
    SignatureTypeMismatch {
        scheme: &'static str,
        found: SignatureType,
    },
}

pub fn decode_hex(hex_str: &str) -> Result<Vec<u8>, CryptoError> {
    hex::decode(hex_str.trim_start_matches("0x")).map_err(|e| CryptoError::InvalidHex(e.to_string()))
}

fn fixed<const N: usize>(
    bytes: &[u8],
    scheme: &'static str,
    signature: bool,
) -> Result<[u8; N], CryptoError> {
    <[u8; N]>::try_from(bytes).map_err(|_| {
        if signature {
            CryptoError::SignatureLength {
                scheme,
                expected: N,
                found: bytes.len(),
            }
        } else {
            CryptoError::PublicKeyLength {
                scheme,
                expected: N,
                found: bytes.len(),
            }
        }
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyScheme {
    Ed25519,
    Sr25519,
    Ecdsa,
}

impl KeyScheme {
    pub fn from_curve(curve: CurveType) -> Result<Self, CryptoError> {
        match curve {
            CurveType::Edwards25519 => Ok(KeyScheme::Ed25519),
            CurveType::Sr25519 => Ok(KeyScheme::Sr25519),
            CurveType::Secp256k1 => Ok(KeyScheme::Ecdsa),
            other => Err(CryptoError::UnsupportedCurve(other)),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            KeyScheme::Ed25519 => "ed25519",
            KeyScheme::Sr25519 => "sr25519",
            KeyScheme::Ecdsa => "ecdsa",
        }
    }

    pub fn signature_type(&self) -> SignatureType {
        match self {
            KeyScheme::Ed25519 => SignatureType::Ed25519,
            KeyScheme::Sr25519 => SignatureType::Sr25519,
            KeyScheme::Ecdsa => SignatureType::EcdsaRecovery,
        }
    }

    /// Account id of a public key. Ecdsa accounts are the blake2-256 of the
    /// compressed key.
    pub fn account_id(&self, public: &[u8]) -> Result<AccountId32, CryptoError> {
        match self {
            KeyScheme::Ed25519 | KeyScheme::Sr25519 => {
                Ok(AccountId32::new(fixed::<32>(public, self.name(), false)?))
            }
            KeyScheme::Ecdsa => {
                let key = fixed::<33>(public, self.name(), false)?;
                Ok(AccountId32::new(blake2_256(&key)))
            }
        }
    }

    /// Checks `signature` over `message` and wraps it for the extrinsic.
    ///
    /// Returns `Ok(None)` when the bytes are well formed but do not verify.
    /// Ecdsa signatures carry the recovery byte, so only `ecdsa_recovery`
    /// is accepted for that scheme.
    pub fn verify(
        &self,
        message: &[u8],
        signature: &[u8],
        public: &[u8],
        signature_type: SignatureType,
    ) -> Result<Option<MultiSignature>, CryptoError> {
        if signature_type != self.signature_type() {
            return Err(CryptoError::SignatureTypeMismatch {
                scheme: self.name(),
                found: signature_type,
            });
        }

        let scheme = self.name();
        let verified = match self {
            KeyScheme::Ed25519 => {
                let sig = ed25519::Signature::from_raw(fixed::<64>(signature, scheme, true)?);
                let key = ed25519::Public::from_raw(fixed::<32>(public, scheme, false)?);
                ed25519::Pair::verify(&sig, message, &key).then(|| MultiSignature::Ed25519(sig))
            }
            KeyScheme::Sr25519 => {
                let sig = sr25519::Signature::from_raw(fixed::<64>(signature, scheme, true)?);
                let key = sr25519::Public::from_raw(fixed::<32>(public, scheme, false)?);
                sr25519::Pair::verify(&sig, message, &key).then(|| MultiSignature::Sr25519(sig))
            }
            KeyScheme::Ecdsa => {
                let sig = ecdsa::Signature::from_raw(fixed::<65>(signature, scheme, true)?);
                let key = ecdsa::Public::from_raw(fixed::<33>(public, scheme, false)?);
                ecdsa::Pair::verify(&sig, message, &key).then(|| MultiSignature::Ecdsa(sig))
            }
        };

        Ok(verified)
    }
}
