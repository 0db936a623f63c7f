// Copyright (C) 2026 Parity Technologies (UK) Ltd.
// SPDX-License-Identifier: GPL-3.0-or-later

use crate::block::{BlockAssembler, FeeLookup};
use crate::chain::{
    ChainRegistry, GatewayConnector, NetworkCache, OnlineNetwork, RegistryError, RpcConnector,
};
use crate::error::ApiResult;
use crate::operations::{EpochEmissionCache, OperationMapper, OperationTable, TableError};
use crate::routes::RouteRegistry;
use crate::types::NetworkIdentifier;
use config::RosettaConfig;
use std::sync::Arc;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StateError {
    #[error(transparent)]
    Registry(#[from] RegistryError),

    #[error(transparent)]
    Table(#[from] TableError),
}

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<RosettaConfig>,
    pub networks: Arc<NetworkCache>,
    pub mapper: Arc<OperationMapper>,
    pub route_registry: RouteRegistry,
}

impl AppState {
    /// State backed by real node connections.
    pub fn new(config: RosettaConfig) -> Result<Self, StateError> {
        let connector = Arc::new(RpcConnector::new(config.gateway.request_timeout_ms));
        Self::with_connector(config, connector)
    }

    pub fn with_connector(
        config: RosettaConfig,
        connector: Arc<dyn GatewayConnector>,
    ) -> Result<Self, StateError> {
        let networks = NetworkCache::new(&config.networks, connector, config.gateway.offline)?;
        let mapper = OperationMapper::new(OperationTable::new()?, EpochEmissionCache::new());

        Ok(Self {
            config: Arc::new(config),
            networks: Arc::new(networks),
            mapper: Arc::new(mapper),
            route_registry: RouteRegistry::new(),
        })
    }

    pub fn fee_lookup(&self) -> FeeLookup {
        FeeLookup {
            timeout_ms: self.config.gateway.fee_timeout_ms,
            max_concurrency: self.config.gateway.max_concurrency,
        }
    }

    pub fn registry(&self, network: &NetworkIdentifier) -> ApiResult<Arc<ChainRegistry>> {
        self.networks.registry(network)
    }

    pub async fn online(&self, network: &NetworkIdentifier) -> ApiResult<OnlineNetwork> {
        self.networks.online(network).await
    }

    pub fn assembler<'a>(&'a self, online: &'a OnlineNetwork) -> BlockAssembler<'a> {
        BlockAssembler {
            gateway: online.gateway.as_ref(),
            registry: online.registry.as_ref(),
            mapper: self.mapper.as_ref(),
            fees: self.fee_lookup(),
        }
    }
}
