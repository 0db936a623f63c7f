// Copyright (C) 2026 Parity Technologies (UK) Ltd.
// SPDX-License-Identifier: GPL-3.0-or-later

//! Dynamic SCALE value to JSON conversion.
//!
//! 32-byte arrays render as SS58 addresses, since the fields read downstream
//! are account ids. 20- and 64-byte arrays render as hex, integers as decimal
//! strings, unit variants as their name.

use scale_value::{Composite, Primitive, Value, ValueDef};
use serde_json::{Map, Value as Json};
use sp_core::crypto::{AccountId32, Ss58AddressFormat, Ss58Codec};

#[derive(Debug, Clone, Copy)]
pub struct ValueConverter {
    ss58_format: u16,
}

impl ValueConverter {
    pub fn new(ss58_format: u16) -> Self {
        Self { ss58_format }
    }

    /// Top-level fields of an event, in declaration order.
    pub fn positional<T>(&self, value: &Value<T>) -> Vec<Json> {
        match &value.value {
            ValueDef::Composite(Composite::Named(fields)) => {
                fields.iter().map(|(_, v)| self.value(v)).collect()
            }
            ValueDef::Composite(Composite::Unnamed(values)) => {
                values.iter().map(|v| self.value(v)).collect()
            }
            _ => vec![self.value(value)],
        }
    }

    /// Fields of a call keyed by name (or position when unnamed).
    ///
    /// Call data decoded against the runtime's outer call enum arrives as
    /// `Pallet(call { .. })`; both variant layers are peeled before the
    /// fields are rendered.
    pub fn call_args<T>(&self, call: &Value<T>) -> Json {
        match &call.value {
            ValueDef::Variant(pallet) => match single(&pallet.values).map(|v| &v.value) {
                Some(ValueDef::Variant(inner)) => self.fields(&inner.values),
                _ => self.fields(&pallet.values),
            },
            ValueDef::Composite(composite) => self.fields(composite),
            _ => self.value(call),
        }
    }

    fn fields<T>(&self, composite: &Composite<T>) -> Json {
        match composite {
            Composite::Named(fields) => Json::Object(
                fields
                    .iter()
                    .map(|(name, v)| (name.clone(), self.value(v)))
                    .collect(),
            ),
            Composite::Unnamed(values) => Json::Object(
                values
                    .iter()
                    .enumerate()
                    .map(|(i, v)| (i.to_string(), self.value(v)))
                    .collect(),
            ),
        }
    }

    pub fn value<T>(&self, value: &Value<T>) -> Json {
        match &value.value {
            ValueDef::Composite(composite) => self.composite(composite),
            ValueDef::Variant(variant) => {
                let name = variant.name.as_str();
                if variant.values.is_empty() {
                    return match name {
                        "None" => Json::Null,
                        _ => Json::String(name.to_string()),
                    };
                }

                let inner = self.composite(&variant.values);
                match name {
                    "Some" | "Id" | "Address32" => inner,
                    _ => {
                        let mut map = Map::new();
                        map.insert(name.to_string(), inner);
                        Json::Object(map)
                    }
                }
            }
            ValueDef::Primitive(primitive) => primitive_to_json(primitive),
            ValueDef::BitSequence(bits) => Json::String(format!("{:?}", bits)),
        }
    }

    fn composite<T>(&self, composite: &Composite<T>) -> Json {
        match composite {
            Composite::Unnamed(values) => {
                if let Some(bytes) = as_byte_array(values) {
                    return self.bytes_to_json(bytes);
                }
                if values.len() == 1 {
                    return self.value(&values[0]);
                }
                Json::Array(values.iter().map(|v| self.value(v)).collect())
            }
            Composite::Named(fields) => Json::Object(
                fields
                    .iter()
                    .map(|(name, v)| (name.clone(), self.value(v)))
                    .collect(),
            ),
        }
    }

    fn bytes_to_json(&self, bytes: Vec<u8>) -> Json {
        match <[u8; 32]>::try_from(bytes.as_slice()) {
            Ok(account) => Json::String(
                AccountId32::from(account)
                    .to_ss58check_with_version(Ss58AddressFormat::custom(self.ss58_format)),
            ),
            Err(_) => Json::String(format!("0x{}", hex::encode(bytes))),
        }
    }
}

fn single<T>(composite: &Composite<T>) -> Option<&Value<T>> {
    match composite {
        Composite::Unnamed(values) if values.len() == 1 => values.first(),
        _ => None,
    }
}

fn as_byte_array<T>(values: &[Value<T>]) -> Option<Vec<u8>> {
    if !matches!(values.len(), 20 | 32 | 64) {
        return None;
    }

    values
        .iter()
        .map(|value| match &value.value {
            ValueDef::Primitive(Primitive::U128(n)) => u8::try_from(*n).ok(),
            _ => None,
        })
        .collect()
}

fn primitive_to_json(primitive: &Primitive) -> Json {
    match primitive {
        Primitive::Bool(b) => Json::Bool(*b),
        Primitive::Char(c) => Json::String(c.to_string()),
        Primitive::String(s) => Json::String(s.clone()),
        Primitive::U128(n) => Json::String(n.to_string()),
        Primitive::I128(n) => Json::String(n.to_string()),
        Primitive::U256(n) => Json::String(format!("0x{}", hex::encode(n))),
        Primitive::I256(n) => Json::String(format!("0x{}", hex::encode(n))),
    }
}
