// Copyright (C) 2026 Parity Technologies (UK) Ltd.
// SPDX-License-Identifier: GPL-3.0-or-later

//! Per-extrinsic fee lookups.
//!
//! Fees are off the critical path: a failed or slow lookup is logged and
//! reported as zero instead of failing the block.

use crate::chain::ChainGateway;
use crate::types::BlockHash;
use crate::utils::run_with_concurrency_ordered;
use std::time::Duration;
use tracing::{debug, warn};

pub const DEFAULT_FEE: u128 = 0;

#[derive(Debug, Clone, Copy)]
pub struct FeeLookup {
    pub timeout_ms: u64,
    pub max_concurrency: usize,
}

impl FeeLookup {
    /// Partial fee of each extrinsic at `at`, in input order.
    pub async fn estimate_all(
        &self,
        gateway: &dyn ChainGateway,
        extrinsics: &[&[u8]],
        at: BlockHash,
    ) -> Vec<u128> {
        let tasks = extrinsics
            .iter()
            .enumerate()
            .map(|(index, bytes)| self.estimate_one(gateway, index, bytes, at));
        run_with_concurrency_ordered(self.max_concurrency, tasks).await
    }

    pub async fn estimate_one(
        &self,
        gateway: &dyn ChainGateway,
        index: usize,
        extrinsic: &[u8],
        at: BlockHash,
    ) -> u128 {
        self.try_estimate(gateway, extrinsic, at)
            .await
            .unwrap_or_else(|| {
                debug!(index, "Using default fee");
                DEFAULT_FEE
            })
    }

    /// Partial fee of `extrinsic`, or `None` when the node cannot tell in time.
    pub async fn try_estimate(
        &self,
        gateway: &dyn ChainGateway,
        extrinsic: &[u8],
        at: BlockHash,
    ) -> Option<u128> {
        let lookup = gateway.estimate_fee(extrinsic, at);
        match tokio::time::timeout(Duration::from_millis(self.timeout_ms), lookup).await {
            Ok(Ok(fee)) => Some(fee),
            Ok(Err(e)) => {
                warn!(len = extrinsic.len(), error = %e, "Fee lookup failed");
                None
            }
            Err(_) => {
                warn!(len = extrinsic.len(), timeout_ms = self.timeout_ms, "Fee lookup timed out");
                None
            }
        }
    }
}
