// Copyright (C) 2026 Parity Technologies (UK) Ltd.
// SPDX-License-Identifier: GPL-3.0-or-later

//! Numeric extraction from loosely-typed JSON (RPC replies and decoded event fields).

use serde_json::Value;

/// Reads an unsigned integer given as a JSON number, a decimal string or a 0x-hex string.
pub fn json_to_u128(value: &Value) -> Option<u128> {
    match value {
        Value::Number(n) => n.as_u64().map(u128::from),
        Value::String(s) => parse_numeric_str(s),
        _ => None,
    }
}

pub fn json_to_u64(value: &Value) -> Option<u64> {
    json_to_u128(value).and_then(|n| u64::try_from(n).ok())
}

fn parse_numeric_str(s: &str) -> Option<u128> {
    let s = s.trim();
    if let Some(hex) = s.strip_prefix("0x") {
        if hex.is_empty() {
            return Some(0);
        }
        u128::from_str_radix(hex, 16).ok()
    } else {
        s.replace(',', "").parse().ok()
    }
}
