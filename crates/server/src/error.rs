// Copyright (C) 2026 Parity Technologies (UK) Ltd.
// SPDX-License-Identifier: GPL-3.0-or-later

//! Rosetta error taxonomy and its HTTP representation.

use crate::chain::{AddressError, ChainError};
use crate::construction::CryptoError;
use crate::types::ErrorObject;
use axum::{Json, http::StatusCode, response::IntoResponse};
use serde_json::json;
use thiserror::Error;

pub type ApiResult<T> = Result<T, ApiError>;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Endpoint not implemented: {0}")]
    NotImplemented(&'static str),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Network {blockchain}/{network} is not supported")]
    NetworkNotSupported { blockchain: String, network: String },

    #[error("Unsupported curve type: {0}")]
    UnsupportedCurve(String),

    #[error("Unsupported operation set: {0}")]
    UnsupportedOperationSet(String),

    #[error("Invalid signature: {0}")]
    InvalidSignature(String),

    #[error("Unexpected transaction shape: {0}")]
    UnexpectedTransactionShape(String),

    #[error("Stale nonce: transaction carries {embedded}, account is at {live}")]
    StaleNonce { embedded: u64, live: u64 },

    #[error("Broadcast failed: {0}")]
    BroadcastFailed(String),

    #[error("Upstream unavailable: {0}")]
    UpstreamUnavailable(String),

    #[error("Transaction {0} not found")]
    TransactionNotFound(String),
}

/// Stable code, fixed message and retriable flag of every error kind.
const CATALOGUE: &[(u32, &str, bool)] = &[
    (1, "Endpoint not implemented", false),
    (2, "Invalid request", false),
    (3, "Network not supported", false),
    (4, "Unsupported curve type", false),
    (5, "Unsupported operation set", false),
    (6, "Invalid signature", false),
    (7, "Unexpected transaction shape", false),
    (8, "Stale nonce", true),
    (9, "Broadcast failed", false),
    (10, "Upstream unavailable", true),
    (11, "Transaction not found", false),
];

impl ApiError {
    pub fn code(&self) -> u32 {
        match self {
            ApiError::NotImplemented(_) => 1,
            ApiError::InvalidRequest(_) => 2,
            ApiError::NetworkNotSupported { .. } => 3,
            ApiError::UnsupportedCurve(_) => 4,
            ApiError::UnsupportedOperationSet(_) => 5,
            ApiError::InvalidSignature(_) => 6,
            ApiError::UnexpectedTransactionShape(_) => 7,
            ApiError::StaleNonce { .. } => 8,
            ApiError::BroadcastFailed(_) => 9,
            ApiError::UpstreamUnavailable(_) => 10,
            ApiError::TransactionNotFound(_) => 11,
        }
    }

    fn entry(&self) -> (u32, &'static str, bool) {
        let code = self.code();
        CATALOGUE
            .iter()
            .copied()
            .find(|(c, _, _)| *c == code)
            .unwrap_or((code, "Internal error", false))
    }

    pub fn message(&self) -> &'static str {
        self.entry().1
    }

    pub fn retriable(&self) -> bool {
        self.entry().2
    }

    pub fn to_error_object(&self) -> ErrorObject {
        ErrorObject {
            code: self.code(),
            message: self.message().to_string(),
            description: Some(self.to_string()),
            retriable: self.retriable(),
            details: self.details(),
        }
    }

    fn details(&self) -> Option<serde_json::Value> {
        match self {
            ApiError::StaleNonce { embedded, live } => {
                Some(json!({ "embedded_nonce": embedded, "live_nonce": live }))
            }
            ApiError::BroadcastFailed(cause) | ApiError::UpstreamUnavailable(cause) => {
                Some(json!({ "cause": cause }))
            }
            _ => None,
        }
    }

    /// Every error this service can return, for `/network/options`.
    pub fn all() -> Vec<ErrorObject> {
        CATALOGUE
            .iter()
            .map(|(code, message, retriable)| ErrorObject {
                code: *code,
                message: message.to_string(),
                description: None,
                retriable: *retriable,
                details: None,
            })
            .collect()
    }
}

impl From<ChainError> for ApiError {
    fn from(err: ChainError) -> Self {
        match err {
            ChainError::NotFound(what) => ApiError::InvalidRequest(format!("{} not found", what)),
            other => ApiError::UpstreamUnavailable(other.to_string()),
        }
    }
}

impl From<AddressError> for ApiError {
    fn from(err: AddressError) -> Self {
        ApiError::InvalidRequest(err.to_string())
    }
}

impl From<CryptoError> for ApiError {
    fn from(err: CryptoError) -> Self {
        match err {
            CryptoError::UnsupportedCurve(curve) => {
                ApiError::UnsupportedCurve(format!("{:?}", curve).to_lowercase())
            }
            CryptoError::SignatureLength { .. } | CryptoError::SignatureTypeMismatch { .. } => {
                ApiError::InvalidSignature(err.to_string())
            }
            other => ApiError::InvalidRequest(other.to_string()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        if self.retriable() {
            tracing::warn!(code = self.code(), "{}", self);
        } else {
            tracing::debug!(code = self.code(), "{}", self);
        }
        (StatusCode::INTERNAL_SERVER_ERROR, Json(self.to_error_object())).into_response()
    }
}
