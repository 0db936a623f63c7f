// Copyright (C) 2026 Parity Technologies (UK) Ltd.
// SPDX-License-Identifier: GPL-3.0-or-later

//! Memoized treasury emissions per epoch.
//!
//! Epoch ids only grow and a network sees few of them, so entries are never
//! evicted. Failed lookups are not stored.

use crate::chain::ChainResult;
use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;
use tokio::sync::{Mutex, OnceCell};

type EpochKey = (String, u64);

#[derive(Debug, Default, Clone)]
pub struct EpochEmissionCache {
    entries: Arc<Mutex<HashMap<EpochKey, Arc<OnceCell<u128>>>>>,
}

impl EpochEmissionCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Concurrent misses on the same epoch share a single `fetch`.
    pub async fn get_or_fetch<F, Fut>(&self, network: &str, epoch: u64, fetch: F) -> ChainResult<u128>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = ChainResult<u128>>,
    {
        let cell = self
            .entries
            .lock()
            .await
            .entry((network.to_string(), epoch))
            .or_default()
            .clone();

        cell.get_or_try_init(fetch).await.copied()
    }

    pub async fn len(&self) -> usize {
        self.entries
            .lock()
            .await
            .values()
            .filter(|cell| cell.initialized())
            .count()
    }
}
