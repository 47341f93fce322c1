//! Configuration types for the liquidity-ops tooling.
//!
//! This crate provides:
//! - Arbitrum network presets (mainnet, Sepolia) and address overrides
//! - Environment lookups (`OWNER_KEY`, `RPC_<chainID>`)
//! - The deployed-contracts JSON store shared between CLI steps

pub mod deployments;
pub mod env;
pub mod error;
pub mod network;

pub use deployments::{Deployments, WithdrawalRecord, L1_BRIDGE_ADAPTER, L2_BRIDGE_ADAPTER};
pub use env::Environment;
pub use error::ConfigError;
pub use network::{
    ArbitrumNetwork, ArbitrumNetworkBuilder, L1Config, L2Config, NetworkOverrides, NetworkType,
};
