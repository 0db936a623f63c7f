// Copyright (C) 2026 Parity Technologies (UK) Ltd.
// SPDX-License-Identifier: GPL-3.0-or-later

//! Transfer construction: derive, preprocess, metadata, payloads, combine,
//! parse, hash and submit.
//!
//! Only [`online`] talks to the chain. Everything it needs from the offline
//! stages travels in the request blobs.

pub mod codec;
pub mod crypto;
pub mod intent;
pub mod offline;
pub mod online;

pub use codec::{CodecError, SignedTransfer, SigningContext, TransferCall, signing_payload};
pub use crypto::{CryptoError, KeyScheme, decode_hex};
pub use intent::{
    ConstructionMetadata, TransferIntent, UnsignedTransactionIntent, sender, transfer_operations,
};
