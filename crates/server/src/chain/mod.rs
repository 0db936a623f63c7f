// Copyright (C) 2026 Parity Technologies (UK) Ltd.
// SPDX-License-Identifier: GPL-3.0-or-later

//! Node access: the gateway port, its RPC adapter and per-network state.

pub mod cache;
pub mod error;
pub mod gateway;
pub mod node_rpc;
pub mod registry;
pub mod rpc;
pub mod types;
pub mod value;

pub use cache::{GatewayConnector, NetworkCache, OnlineNetwork, RpcConnector};
pub use error::{ChainError, ChainResult, with_timeout};
pub use gateway::ChainGateway;
pub use node_rpc::NodeRpc;
pub use registry::{AddressError, ChainRegistry, RegistryError};
pub use rpc::RpcGateway;
pub use types::{
    AccountState, BlockHeader, EventPhase, NativeBlock, NativeEvent, NativeExtrinsic,
    RuntimeVersion,
};
pub use value::ValueConverter;
