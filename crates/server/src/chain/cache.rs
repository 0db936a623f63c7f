// Copyright (C) 2026 Parity Technologies (UK) Ltd.
// SPDX-License-Identifier: GPL-3.0-or-later

//! Per-network connection cache.
//!
//! Every configured network owns a slot holding its offline registry and a
//! lazily opened connection. The first request that needs the node opens it;
//! concurrent first requests wait on the same attempt. A failed attempt is not
//! cached, so the next request tries again.

use super::error::{ChainError, ChainResult};
use super::gateway::ChainGateway;
use super::registry::{ChainRegistry, RegistryError};
use super::rpc::RpcGateway;
use crate::error::{ApiError, ApiResult};
use crate::types::NetworkIdentifier;
use async_trait::async_trait;
use config::{NetworkConfig, NetworkConfigs};
use std::sync::Arc;
use tokio::sync::OnceCell;
use tracing::{info, warn};

/// A live connection together with the registry refreshed from it.
#[derive(Clone)]
pub struct OnlineNetwork {
    pub gateway: Arc<dyn ChainGateway>,
    pub registry: Arc<ChainRegistry>,
}

/// Opens a connection to a configured network.
#[async_trait]
pub trait GatewayConnector: Send + Sync {
    async fn connect(
        &self,
        network: &NetworkConfig,
        registry: ChainRegistry,
    ) -> ChainResult<OnlineNetwork>;
}

pub struct RpcConnector {
    timeout_ms: u64,
}

impl RpcConnector {
    pub fn new(timeout_ms: u64) -> Self {
        Self { timeout_ms }
    }
}

#[async_trait]
impl GatewayConnector for RpcConnector {
    async fn connect(
        &self,
        network: &NetworkConfig,
        mut registry: ChainRegistry,
    ) -> ChainResult<OnlineNetwork> {
        let gateway =
            RpcGateway::connect(&network.node_address, network.ss58_format, self.timeout_ms)
                .await?;

        match gateway.transfer_call_index().await {
            Ok(Some(index)) => {
                if index != registry.transfer_call_index {
                    info!(
                        network = %network.network,
                        configured = ?registry.transfer_call_index,
                        live = ?index,
                        "Using transfer call index from runtime metadata"
                    );
                }
                registry.transfer_call_index = index;
            }
            Ok(None) => {
                warn!(network = %network.network, "Runtime has no Balances transfer call");
            }
            Err(e) => {
                warn!(network = %network.network, error = %e, "Could not read runtime metadata");
            }
        }

        Ok(OnlineNetwork {
            gateway: Arc::new(gateway),
            registry: Arc::new(registry),
        })
    }
}

struct NetworkSlot {
    config: NetworkConfig,
    registry: Arc<ChainRegistry>,
    online: OnceCell<OnlineNetwork>,
}

impl NetworkSlot {
    fn matches(&self, id: &NetworkIdentifier) -> bool {
        self.registry
            .network
            .blockchain
            .eq_ignore_ascii_case(&id.blockchain)
            && self.registry.network.network.eq_ignore_ascii_case(&id.network)
    }
}

pub struct NetworkCache {
    slots: Vec<NetworkSlot>,
    connector: Arc<dyn GatewayConnector>,
    offline: bool,
}

impl NetworkCache {
    pub fn new(
        networks: &NetworkConfigs,
        connector: Arc<dyn GatewayConnector>,
        offline: bool,
    ) -> Result<Self, RegistryError> {
        let slots = networks
            .iter()
            .map(|config| {
                Ok(NetworkSlot {
                    config: config.clone(),
                    registry: Arc::new(ChainRegistry::from_config(config)?),
                    online: OnceCell::new(),
                })
            })
            .collect::<Result<Vec<_>, RegistryError>>()?;

        Ok(Self {
            slots,
            connector,
            offline,
        })
    }

    pub fn is_offline(&self) -> bool {
        self.offline
    }

    pub fn identifiers(&self) -> Vec<NetworkIdentifier> {
        self.slots
            .iter()
            .map(|slot| slot.registry.network.clone())
            .collect()
    }

    fn slot(&self, id: &NetworkIdentifier) -> ApiResult<&NetworkSlot> {
        self.slots
            .iter()
            .find(|slot| slot.matches(id))
            .ok_or_else(|| ApiError::NetworkNotSupported {
                blockchain: id.blockchain.clone(),
                network: id.network.clone(),
            })
    }

    /// Registry for offline stages, built from configuration only. It never
    /// picks up what a live connection refreshed.
    pub fn registry(&self, id: &NetworkIdentifier) -> ApiResult<Arc<ChainRegistry>> {
        Ok(self.slot(id)?.registry.clone())
    }

    /// Connection for online stages, opened on first use.
    pub async fn online(&self, id: &NetworkIdentifier) -> ApiResult<OnlineNetwork> {
        let slot = self.slot(id)?;
        if self.offline {
            return Err(ChainError::Offline.into());
        }

        let online = slot
            .online
            .get_or_try_init(|| async {
                info!(network = %slot.config.network, url = %slot.config.node_address, "Opening node connection");
                self.connector
                    .connect(&slot.config, slot.registry.as_ref().clone())
                    .await
                    .inspect_err(|e| {
                        warn!(network = %slot.config.network, error = %e, "Node connection failed");
                    })
            })
            .await?;

        Ok(online.clone())
    }
}
