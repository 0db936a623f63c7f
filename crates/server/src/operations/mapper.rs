// Copyright (C) 2026 Parity Technologies (UK) Ltd.
// SPDX-License-Identifier: GPL-3.0-or-later

//! Runtime events and calls to Rosetta operations.
//!
//! Events are the source of truth for successful extrinsics. Failed or
//! unclassified extrinsics leave no reliable event trail, so their transfer is
//! rebuilt from the call arguments instead.

use super::epoch::EpochEmissionCache;
use super::table::{EventKey, OperationKind, OperationTable, TxStatus};
use crate::chain::{BlockHeader, ChainGateway, ChainRegistry, NativeEvent, NativeExtrinsic};
use crate::types::{AccountIdentifier, Amount, Currency, Operation, OperationIdentifier};
use crate::utils::{json_to_u64, json_to_u128};
use futures::future::join_all;
use serde_json::Value;
use std::fmt;
use tracing::{debug, warn};

/// Signed balance change over the full `u128` range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Delta {
    negative: bool,
    magnitude: u128,
}

impl Delta {
    pub const ZERO: Delta = Delta {
        negative: false,
        magnitude: 0,
    };

    pub fn credit(magnitude: u128) -> Self {
        Self {
            negative: false,
            magnitude,
        }
    }

    pub fn debit(magnitude: u128) -> Self {
        Self {
            negative: magnitude != 0,
            magnitude,
        }
    }

    /// `new - old`.
    pub fn between(new: u128, old: u128) -> Self {
        if new >= old {
            Self::credit(new - old)
        } else {
            Self::debit(old - new)
        }
    }

    pub fn negate(self) -> Self {
        Self {
            negative: !self.negative && self.magnitude != 0,
            magnitude: self.magnitude,
        }
    }
}

impl fmt::Display for Delta {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.negative {
            write!(f, "-{}", self.magnitude)
        } else {
            write!(f, "{}", self.magnitude)
        }
    }
}

/// Accumulates operations for one transaction with contiguous indices.
#[derive(Debug, Clone)]
pub struct OperationsBuilder {
    currency: Currency,
    operations: Vec<Operation>,
}

impl OperationsBuilder {
    pub fn new(currency: Currency) -> Self {
        Self {
            currency,
            operations: Vec::new(),
        }
    }

    pub fn push(
        &mut self,
        kind: OperationKind,
        status: Option<TxStatus>,
        address: &str,
        delta: Delta,
    ) -> &mut Self {
        self.operations.push(Operation {
            operation_identifier: OperationIdentifier::new(self.operations.len() as u64),
            related_operations: None,
            kind: kind.to_string(),
            status: status.map(|s| s.as_str().to_string()),
            account: Some(AccountIdentifier::new(address)),
            amount: Some(Amount {
                value: delta.to_string(),
                currency: self.currency.clone(),
                metadata: None,
            }),
            metadata: None,
        });
        self
    }

    /// Debit from `source` (when known) followed by the matching credit.
    pub fn push_pair(
        &mut self,
        kind: OperationKind,
        status: Option<TxStatus>,
        source: Option<&str>,
        destination: &str,
        delta: Delta,
    ) -> &mut Self {
        if let Some(source) = source {
            self.push(kind, status, source, delta.negate());
        }
        self.push(kind, status, destination, delta)
    }

    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }

    pub fn finish(self) -> Vec<Operation> {
        self.operations
    }
}

/// Where a block's operations are being derived.
pub struct MapperContext<'a> {
    pub gateway: &'a dyn ChainGateway,
    pub registry: &'a ChainRegistry,
    pub header: &'a BlockHeader,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct MappedEvent {
    kind: OperationKind,
    source: Option<String>,
    destination: String,
    delta: Delta,
}

/// Outcome of an extrinsic as read from its `System` marker event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Classification {
    pub status: TxStatus,
    pub pays_fee: bool,
}

const TRANSFER_CALLS: [&str; 3] = ["transfer", "transfer_keep_alive", "transfer_allow_death"];

pub fn is_transfer_call(pallet: &str, call: &str) -> bool {
    pallet.eq_ignore_ascii_case("Balances")
        && TRANSFER_CALLS.iter().any(|name| call.eq_ignore_ascii_case(name))
}

/// Reads success/failure and fee liability from an extrinsic's events.
pub fn classify(events: &[&NativeEvent]) -> Classification {
    let mut classification = Classification {
        status: TxStatus::Unknown,
        pays_fee: false,
    };

    for event in events {
        let info_index = if event.is("System", "ExtrinsicSuccess") {
            classification.status = TxStatus::Success;
            0
        } else if event.is("System", "ExtrinsicFailed") {
            classification.status = TxStatus::Failure;
            1
        } else {
            continue;
        };

        if event.data.get(info_index).is_some_and(dispatch_pays_fee) {
            classification.pays_fee = true;
        }
    }

    classification
}

fn dispatch_pays_fee(info: &Value) -> bool {
    let pays = info.get("pays_fee").or_else(|| info.get("paysFee"));
    match pays {
        Some(Value::String(s)) => s == "Yes",
        Some(Value::Bool(b)) => *b,
        Some(Value::Object(map)) => map.contains_key("Yes"),
        _ => false,
    }
}

pub struct OperationMapper {
    table: OperationTable,
    epochs: EpochEmissionCache,
}

impl OperationMapper {
    pub fn new(table: OperationTable, epochs: EpochEmissionCache) -> Self {
        Self { table, epochs }
    }

    pub fn table(&self) -> &OperationTable {
        &self.table
    }

    /// Maps events in encounter order into `ops`. Side lookups run concurrently.
    pub async fn map_events(
        &self,
        ctx: &MapperContext<'_>,
        events: &[&NativeEvent],
        status: TxStatus,
        ops: &mut OperationsBuilder,
    ) {
        let mapped = join_all(events.iter().map(|event| self.resolve(ctx, event))).await;
        for event in mapped.into_iter().flatten() {
            ops.push_pair(
                event.kind,
                Some(status),
                event.source.as_deref(),
                &event.destination,
                event.delta,
            );
        }
    }

    /// Rebuilds a transfer from the call arguments. Other calls yield nothing.
    pub fn map_call(
        &self,
        extrinsic: &NativeExtrinsic,
        status: Option<TxStatus>,
        ops: &mut OperationsBuilder,
    ) {
        if !is_transfer_call(&extrinsic.pallet, &extrinsic.call) {
            debug!(call = %extrinsic.key(), "No call-based operations for extrinsic");
            return;
        }

        let destination = extrinsic.args.get("dest").and_then(Value::as_str);
        let value = extrinsic.args.get("value").and_then(json_to_u128);

        match (destination, value) {
            (Some(destination), Some(value)) => {
                ops.push_pair(
                    OperationKind::Transfer,
                    status,
                    extrinsic.signer.as_deref(),
                    destination,
                    Delta::credit(value),
                );
            }
            _ => {
                debug!(index = extrinsic.index, args = %extrinsic.args, "Unrecognized transfer arguments");
            }
        }
    }

    async fn resolve(&self, ctx: &MapperContext<'_>, event: &NativeEvent) -> Option<MappedEvent> {
        let Some((key, kind)) = self.table.lookup(&event.pallet, &event.name) else {
            debug!(
                event = %format!("{}.{}", event.pallet, event.name),
                phase = ?event.phase,
                "Unprocessed event"
            );
            return None;
        };

        let address = |i: usize| event.data.get(i).and_then(Value::as_str).map(str::to_string);
        let amount = |i: usize| {
            event
                .data
                .get(i)
                .and_then(json_to_u128)
                .map(Delta::credit)
                .unwrap_or(Delta::ZERO)
        };

        let (source, destination, delta) = match key {
            EventKey::BalancesTransfer | EventKey::BalancesTransferKeepAlive => {
                (address(0), address(1), amount(2))
            }
            EventKey::PoaTxnFeesGiven => (None, address(1), amount(2)),
            EventKey::BalancesReserved
            | EventKey::BalancesUnreserved
            | EventKey::BalancesEndowed
            | EventKey::BalancesDeposit
            | EventKey::BalancesDustLost => (None, address(0), amount(1)),
            EventKey::BalancesBalanceSet => {
                let who = address(0);
                let delta = match (&who, event.data.get(1).and_then(json_to_u128)) {
                    (Some(who), Some(new_free)) => self.balance_set_delta(ctx, who, new_free).await,
                    _ => Delta::ZERO,
                };
                (None, who, delta)
            }
            EventKey::PoaEpochEnds => {
                let delta = match event.data.first().and_then(json_to_u64) {
                    Some(epoch) => self.epoch_emission(ctx, epoch).await,
                    None => Delta::ZERO,
                };
                (None, ctx.registry.treasury.clone(), delta)
            }
            EventKey::SystemNewAccount | EventKey::AllocationsAllocate => {
                (None, address(0), Delta::ZERO)
            }
        };

        let Some(destination) = destination else {
            debug!(event = %event.key(), "Event without a resolvable account");
            return None;
        };

        Some(MappedEvent {
            kind,
            source,
            destination,
            delta,
        })
    }

    async fn balance_set_delta(&self, ctx: &MapperContext<'_>, who: &str, new_free: u128) -> Delta {
        let account = match ctx.registry.decode_address(who) {
            Ok(account) => account,
            Err(e) => {
                warn!(account = %who, error = %e, "BalanceSet for undecodable account");
                return Delta::ZERO;
            }
        };

        match ctx
            .gateway
            .account_state(ctx.header.parent_hash, &account)
            .await
        {
            Ok(previous) => Delta::between(new_free, previous.free),
            Err(e) => {
                warn!(account = %who, error = %e, "Failed to read previous balance for BalanceSet");
                Delta::ZERO
            }
        }
    }

    async fn epoch_emission(&self, ctx: &MapperContext<'_>, epoch: u64) -> Delta {
        let emission = self
            .epochs
            .get_or_fetch(&ctx.registry.network.network, epoch, || {
                ctx.gateway
                    .epoch_treasury_emission(ctx.header.hash, epoch)
            })
            .await;

        match emission {
            Ok(emission) => Delta::credit(emission),
            Err(e) => {
                warn!(epoch, error = %e, "Failed to look up epoch emission");
                Delta::ZERO
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chain::{AccountState, EventPhase};
    use crate::test_fixtures::{
        MockGateway, account, address, extrinsic_failed, extrinsic_success, native_event,
        test_header, test_registry, transfer_event, transfer_extrinsic,
    };
    use serde_json::json;

    fn mapper() -> OperationMapper {
        OperationMapper::new(OperationTable::new().unwrap(), EpochEmissionCache::new())
    }

    fn values(ops: &[Operation]) -> Vec<(String, String)> {
        ops.iter()
            .map(|op| {
                (
                    op.account.as_ref().unwrap().address.clone(),
                    op.amount.as_ref().unwrap().value.clone(),
                )
            })
            .collect()
    }

    #[test]
    fn test_delta_display() {
        assert_eq!(Delta::credit(5).to_string(), "5");
        assert_eq!(Delta::debit(5).to_string(), "-5");
        assert_eq!(Delta::credit(5).negate().to_string(), "-5");
        assert_eq!(Delta::ZERO.negate().to_string(), "0");
        assert_eq!(Delta::between(3, 10).to_string(), "-7");
        assert_eq!(Delta::between(u128::MAX, 0).to_string(), u128::MAX.to_string());
    }

    #[test]
    fn test_classify_markers() {
        let ok = extrinsic_success(1, true);
        assert_eq!(
            classify(&[&ok]),
            Classification {
                status: TxStatus::Success,
                pays_fee: true
            }
        );

        let failed = extrinsic_failed(1, false);
        assert_eq!(
            classify(&[&failed]),
            Classification {
                status: TxStatus::Failure,
                pays_fee: false
            }
        );

        assert_eq!(classify(&[]).status, TxStatus::Unknown);
    }

    #[test]
    fn test_pays_fee_shapes() {
        assert!(dispatch_pays_fee(&json!({"pays_fee": "Yes"})));
        assert!(dispatch_pays_fee(&json!({"paysFee": true})));
        assert!(dispatch_pays_fee(&json!({"pays_fee": {"Yes": null}})));
        assert!(!dispatch_pays_fee(&json!({"pays_fee": "No"})));
        assert!(!dispatch_pays_fee(&json!("Yes")));
    }

    #[tokio::test]
    async fn test_transfer_event_pair_balances() {
        let registry = test_registry();
        let gateway = MockGateway::new();
        let header = test_header(10);
        let ctx = MapperContext {
            gateway: &gateway,
            registry: &registry,
            header: &header,
        };

        let transfer = transfer_event(1, &address(1), &address(2), 1_000);
        let success = extrinsic_success(1, true);
        let mut ops = OperationsBuilder::new(registry.currency.clone());
        mapper()
            .map_events(&ctx, &[&transfer, &success], TxStatus::Success, &mut ops)
            .await;
        let ops = ops.finish();

        assert_eq!(
            values(&ops),
            vec![(address(1), "-1000".to_string()), (address(2), "1000".to_string())]
        );
        assert!(ops.iter().all(|op| op.kind == "Transfer"));
        assert!(ops.iter().all(|op| op.status.as_deref() == Some("SUCCESS")));
        assert_eq!(ops[0].operation_identifier.index, 0);
        assert_eq!(ops[1].operation_identifier.index, 1);
    }

    #[tokio::test]
    async fn test_indices_contiguous_across_events() {
        let registry = test_registry();
        let gateway = MockGateway::new();
        let header = test_header(10);
        let ctx = MapperContext {
            gateway: &gateway,
            registry: &registry,
            header: &header,
        };

        let endowed = native_event(
            EventPhase::ApplyExtrinsic(1),
            "Balances",
            "Endowed",
            vec![json!(address(2)), json!("700")],
        );
        let new_account = native_event(
            EventPhase::ApplyExtrinsic(1),
            "System",
            "NewAccount",
            vec![json!(address(2))],
        );
        let transfer = transfer_event(1, &address(1), &address(2), 700);
        let unmapped = native_event(
            EventPhase::ApplyExtrinsic(1),
            "Treasury",
            "Deposit",
            vec![json!("5")],
        );
        let mut ops = OperationsBuilder::new(registry.currency.clone());
        mapper()
            .map_events(
                &ctx,
                &[&new_account, &endowed, &unmapped, &transfer],
                TxStatus::Success,
                &mut ops,
            )
            .await;
        let ops = ops.finish();

        let indices: Vec<u64> = ops.iter().map(|op| op.operation_identifier.index).collect();
        assert_eq!(indices, vec![0, 1, 2, 3]);
        let kinds: Vec<&str> = ops.iter().map(|op| op.kind.as_str()).collect();
        assert_eq!(kinds, vec!["Create", "Endowed", "Transfer", "Transfer"]);
        assert_eq!(ops[0].amount.as_ref().unwrap().value, "0");
    }

    #[tokio::test]
    async fn test_epoch_ends_credits_treasury_and_memoizes() {
        let registry = test_registry();
        let gateway = MockGateway::new().with_epoch(4, 12_345);
        let header = test_header(10);
        let ctx = MapperContext {
            gateway: &gateway,
            registry: &registry,
            header: &header,
        };
        let mapper = mapper();

        for _ in 0..2 {
            let epoch_ends =
                native_event(EventPhase::Finalization, "PoAModule", "EpochEnds", vec![json!(4)]);
            let mut ops = OperationsBuilder::new(registry.currency.clone());
            mapper
                .map_events(&ctx, &[&epoch_ends], TxStatus::Success, &mut ops)
                .await;
            let ops = ops.finish();
            assert_eq!(
                values(&ops),
                vec![(registry.treasury.clone().unwrap(), "12345".to_string())]
            );
        }
        assert_eq!(gateway.epoch_calls(), 1);
    }

    #[tokio::test]
    async fn test_epoch_lookup_failure_defaults_to_zero() {
        let registry = test_registry();
        let gateway = MockGateway::new();
        let header = test_header(10);
        let ctx = MapperContext {
            gateway: &gateway,
            registry: &registry,
            header: &header,
        };

        let epoch_ends =
            native_event(EventPhase::Finalization, "PoAModule", "EpochEnds", vec![json!(9)]);
        let mut ops = OperationsBuilder::new(registry.currency.clone());
        mapper()
            .map_events(&ctx, &[&epoch_ends], TxStatus::Success, &mut ops)
            .await;
        assert_eq!(ops.finish()[0].amount.as_ref().unwrap().value, "0");
    }

    #[tokio::test]
    async fn test_balance_set_uses_parent_balance() {
        let registry = test_registry();
        let header = test_header(10);
        let gateway = MockGateway::new().with_account(
            header.parent_hash,
            account(3),
            AccountState { nonce: 0, free: 900 },
        );
        let ctx = MapperContext {
            gateway: &gateway,
            registry: &registry,
            header: &header,
        };

        let balance_set = native_event(
            EventPhase::ApplyExtrinsic(1),
            "Balances",
            "BalanceSet",
            vec![json!(address(3)), json!("400"), json!("0")],
        );
        let mut ops = OperationsBuilder::new(registry.currency.clone());
        mapper()
            .map_events(&ctx, &[&balance_set], TxStatus::Success, &mut ops)
            .await;
        assert_eq!(values(&ops.finish()), vec![(address(3), "-500".to_string())]);
    }

    #[tokio::test]
    async fn test_balance_set_undecodable_account_is_zero() {
        let registry = test_registry();
        let header = test_header(10);
        let gateway = MockGateway::new();
        let ctx = MapperContext {
            gateway: &gateway,
            registry: &registry,
            header: &header,
        };

        let balance_set = native_event(
            EventPhase::ApplyExtrinsic(1),
            "Balances",
            "BalanceSet",
            vec![json!("0xdeadbeef"), json!("400"), json!("0")],
        );
        let mut ops = OperationsBuilder::new(registry.currency.clone());
        mapper()
            .map_events(&ctx, &[&balance_set], TxStatus::Success, &mut ops)
            .await;
        assert_eq!(values(&ops.finish()), vec![("0xdeadbeef".to_string(), "0".to_string())]);
    }

    #[tokio::test]
    async fn test_fees_given_credits_recipient() {
        let registry = test_registry();
        let gateway = MockGateway::new();
        let header = test_header(10);
        let ctx = MapperContext {
            gateway: &gateway,
            registry: &registry,
            header: &header,
        };

        let fees = native_event(
            EventPhase::ApplyExtrinsic(1),
            "PoAModule",
            "TxnFeesGiven",
            vec![json!(address(1)), json!(address(5)), json!("33")],
        );
        let mut ops = OperationsBuilder::new(registry.currency.clone());
        mapper()
            .map_events(&ctx, &[&fees], TxStatus::Success, &mut ops)
            .await;
        let ops = ops.finish();
        assert_eq!(values(&ops), vec![(address(5), "33".to_string())]);
        assert_eq!(ops[0].kind, "Fee");
    }

    #[test]
    fn test_failed_transfer_rebuilt_from_call() {
        let registry = test_registry();
        let extrinsic = transfer_extrinsic(1, Some(address(1)), &address(2), 250);
        let mut ops = OperationsBuilder::new(registry.currency.clone());
        mapper().map_call(&extrinsic, Some(TxStatus::Failure), &mut ops);
        let ops = ops.finish();

        assert_eq!(
            values(&ops),
            vec![(address(1), "-250".to_string()), (address(2), "250".to_string())]
        );
        assert!(ops.iter().all(|op| op.status.as_deref() == Some("FAILURE")));
    }

    #[test]
    fn test_failed_non_transfer_yields_nothing() {
        let registry = test_registry();
        let mut extrinsic = transfer_extrinsic(1, Some(address(1)), &address(2), 250);
        extrinsic.pallet = "System".to_string();
        extrinsic.call = "remark".to_string();
        let mut ops = OperationsBuilder::new(registry.currency.clone());
        mapper().map_call(&extrinsic, Some(TxStatus::Failure), &mut ops);
        assert!(ops.is_empty());
    }
}
