// Copyright (C) 2026 Parity Technologies (UK) Ltd.
// SPDX-License-Identifier: GPL-3.0-or-later

//! Byte layout of balance transfers as signed v4 extrinsics.
//!
//! ```text
//! extrinsic = compact(len) ++ 0x84 ++ address ++ signature ++ era ++ compact(nonce) ++ compact(tip) ++ call
//! call      = pallet_index ++ call_index ++ address ++ compact(value)
//! payload   = call ++ era ++ compact(nonce) ++ compact(tip)
//!             ++ spec_version ++ transaction_version ++ genesis_hash ++ era_block_hash
//! ```
//!
//! Payloads longer than 256 bytes are signed as their blake2-256 hash.

use config::AddressFormat;
use parity_scale_codec::{Compact, Decode, Encode};
use sp_core::crypto::AccountId32;
use sp_core::hashing::blake2_256;
use sp_runtime::generic::Era;
use sp_runtime::{MultiAddress, MultiSignature};
use thiserror::Error;

/// Version byte of a signed v4 extrinsic.
pub const SIGNED_V4: u8 = 0x84;

const MAX_UNHASHED_PAYLOAD: usize = 256;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CodecError {
    #[error("SCALE decoding failed: {0}")]
    Scale(String),

    #[error("Unsupported extrinsic version byte 0x{0:02x}")]
    UnsupportedVersion(u8),

    #[error("Unsupported address variant {0}")]
    UnsupportedAddress(u8),

    #[error("Call index {found:?} is not the transfer call {expected:?}")]
    UnexpectedCall { expected: [u8; 2], found: [u8; 2] },

    #[error("{0} unexpected trailing bytes")]
    TrailingBytes(usize),
}

impl From<parity_scale_codec::Error> for CodecError {
    fn from(err: parity_scale_codec::Error) -> Self {
        CodecError::Scale(err.to_string())
    }
}

fn encode_address(account: &AccountId32, format: AddressFormat, out: &mut Vec<u8>) {
    match format {
        AddressFormat::MultiAddress => {
            MultiAddress::<AccountId32, u32>::Id(account.clone()).encode_to(out)
        }
        AddressFormat::AccountId => account.encode_to(out),
    }
}

fn decode_address(cursor: &mut &[u8], format: AddressFormat) -> Result<AccountId32, CodecError> {
    match format {
        AddressFormat::MultiAddress => match MultiAddress::<AccountId32, u32>::decode(cursor)? {
            MultiAddress::Id(account) => Ok(account),
            MultiAddress::Index(_) => Err(CodecError::UnsupportedAddress(1)),
            MultiAddress::Raw(_) => Err(CodecError::UnsupportedAddress(2)),
            MultiAddress::Address32(_) => Err(CodecError::UnsupportedAddress(3)),
            MultiAddress::Address20(_) => Err(CodecError::UnsupportedAddress(4)),
        },
        AddressFormat::AccountId => Ok(AccountId32::decode(cursor)?),
    }
}

fn ensure_consumed(cursor: &[u8]) -> Result<(), CodecError> {
    if cursor.is_empty() {
        Ok(())
    } else {
        Err(CodecError::TrailingBytes(cursor.len()))
    }
}

/// `Balances.transfer(dest, value)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferCall {
    pub call_index: [u8; 2],
    pub dest: AccountId32,
    pub value: u128,
}

impl TransferCall {
    pub fn encode(&self, format: AddressFormat) -> Vec<u8> {
        let mut out = self.call_index.to_vec();
        encode_address(&self.dest, format, &mut out);
        Compact(self.value).encode_to(&mut out);
        out
    }

    /// `expected` of `None` accepts any call index with the transfer layout.
    fn decode_from(
        cursor: &mut &[u8],
        format: AddressFormat,
        expected: Option<[u8; 2]>,
    ) -> Result<Self, CodecError> {
        let found = <[u8; 2]>::decode(cursor)?;
        if let Some(expected) = expected.filter(|expected| *expected != found) {
            return Err(CodecError::UnexpectedCall { expected, found });
        }
        let dest = decode_address(cursor, format)?;
        let value = Compact::<u128>::decode(cursor)?.0;
        Ok(Self {
            call_index: found,
            dest,
            value,
        })
    }

    pub fn decode(
        bytes: &[u8],
        format: AddressFormat,
        expected: Option<[u8; 2]>,
    ) -> Result<Self, CodecError> {
        let mut cursor = bytes;
        let call = Self::decode_from(&mut cursor, format, expected)?;
        ensure_consumed(cursor)?;
        Ok(call)
    }
}

/// Everything besides the call that the signer commits to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SigningContext {
    pub era: Era,
    pub nonce: u64,
    pub tip: u128,
    pub spec_version: u32,
    pub transaction_version: u32,
    pub genesis_hash: [u8; 32],
    pub era_block_hash: [u8; 32],
}

/// The exact bytes a signer signs for `call`.
pub fn signing_payload(call: &[u8], ctx: &SigningContext) -> Vec<u8> {
    let mut payload = call.to_vec();
    ctx.era.encode_to(&mut payload);
    Compact(ctx.nonce).encode_to(&mut payload);
    Compact(ctx.tip).encode_to(&mut payload);
    ctx.spec_version.encode_to(&mut payload);
    ctx.transaction_version.encode_to(&mut payload);
    payload.extend_from_slice(&ctx.genesis_hash);
    payload.extend_from_slice(&ctx.era_block_hash);

    if payload.len() > MAX_UNHASHED_PAYLOAD {
        blake2_256(&payload).to_vec()
    } else {
        payload
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedTransfer {
    pub signer: AccountId32,
    pub signature: MultiSignature,
    pub era: Era,
    pub nonce: u64,
    pub tip: u128,
    pub call: TransferCall,
}

impl SignedTransfer {
    /// Full extrinsic, length prefix included.
    pub fn encode(&self, format: AddressFormat) -> Vec<u8> {
        let mut body = vec![SIGNED_V4];
        encode_address(&self.signer, format, &mut body);
        self.signature.encode_to(&mut body);
        self.era.encode_to(&mut body);
        Compact(self.nonce).encode_to(&mut body);
        Compact(self.tip).encode_to(&mut body);
        body.extend(self.call.encode(format));
        body.encode()
    }

    pub fn decode(
        bytes: &[u8],
        format: AddressFormat,
        transfer_call_index: Option<[u8; 2]>,
    ) -> Result<Self, CodecError> {
        let mut input = bytes;
        let body = Vec::<u8>::decode(&mut input)?;
        ensure_consumed(input)?;

        let mut cursor = body.as_slice();
        let version = u8::decode(&mut cursor)?;
        if version != SIGNED_V4 {
            return Err(CodecError::UnsupportedVersion(version));
        }

        let signer = decode_address(&mut cursor, format)?;
        let signature = MultiSignature::decode(&mut cursor)?;
        let era = Era::decode(&mut cursor)?;
        let nonce = Compact::<u64>::decode(&mut cursor)?.0;
        let tip = Compact::<u128>::decode(&mut cursor)?.0;
        let call = TransferCall::decode_from(&mut cursor, format, transfer_call_index)?;
        ensure_consumed(cursor)?;

        Ok(Self {
            signer,
            signature,
            era,
            nonce,
            tip,
            call,
        })
    }
}
