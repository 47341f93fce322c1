//! Network configuration for Arbitrum bridging.
//!
//! Provides the L1 and L2 protocol contract addresses for each supported
//! Arbitrum deployment (mainnet, testnet).

use crate::ConfigError;
use alloy_primitives::{address, Address};
use serde::{Deserialize, Serialize};

/// Network type (mainnet or testnet).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NetworkType {
    Mainnet,
    Testnet,
}

/// Parent chain (L1) contracts of an Arbitrum deployment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct L1Config {
    /// Chain ID
    pub chain_id: u64,
    /// L1GatewayRouter address
    pub gateway_router: Address,
    /// Delayed inbox address
    pub inbox: Address,
    /// Rollup (RollupProxy) address emitting `NodeConfirmed`
    pub rollup: Address,
    /// Outbox address
    pub outbox: Address,
    /// Block time in seconds (12 for Ethereum mainnet)
    pub block_time_secs: u64,
}

impl L1Config {
    /// Ethereum mainnet, parent of Arbitrum One.
    pub const fn mainnet() -> Self {
        Self {
            chain_id: 1,
            gateway_router: address!("0x72Ce9c846789fdB6fC1f34aC4AD25Dd9ef7031ef"),
            inbox: address!("0x4Dbd4fc535Ac27206064B68FfCf827b0A60BAB3f"),
            rollup: address!("0x5eF0D09d1E6204141B4d37530808eD19f60FBa35"),
            outbox: address!("0x0B9857ae2D4A3DBe74ffE1d7DF045bb7F96E4840"),
            block_time_secs: 12,
        }
    }

    /// Ethereum Sepolia, parent of Arbitrum Sepolia.
    pub const fn sepolia() -> Self {
        Self {
            chain_id: 11155111,
            gateway_router: address!("0xcE18836b233C83325Cc8848CA4487e94C6288264"),
            inbox: address!("0xaAe29B0366299461418F5324a79Afc425BE5ae21"),
            rollup: address!("0xd80810638dbDF9081b72C1B33c65375e807281C8"),
            outbox: address!("0x65f07C7D521164a4d5DaC6eB8Fac8DA067A3B78F"),
            block_time_secs: 12,
        }
    }
}

/// Child chain (L2) contracts of an Arbitrum deployment.
///
/// ArbSys and NodeInterface live at fixed addresses on every chain and are not configured.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct L2Config {
    /// Chain ID
    pub chain_id: u64,
    /// L2GatewayRouter address
    pub gateway_router: Address,
    /// Block time in seconds (0.25 on Arbitrum, rounded up)
    pub block_time_secs: u64,
}

impl L2Config {
    /// Arbitrum One.
    pub const fn mainnet() -> Self {
        Self {
            chain_id: 42161,
            gateway_router: address!("0x5288c571Fd7aD117beA99bF60FE0846C4E84F933"),
            block_time_secs: 1,
        }
    }

    /// Arbitrum Sepolia.
    pub const fn sepolia() -> Self {
        Self {
            chain_id: 421614,
            gateway_router: address!("0x9fDD1C4E4AA24EEc1d913FABea925594a20d43C7"),
            block_time_secs: 1,
        }
    }
}

/// Complete configuration of one Arbitrum deployment and its parent chain.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArbitrumNetwork {
    /// Network type (mainnet or testnet)
    pub network_type: NetworkType,
    /// Parent chain configuration
    pub l1: L1Config,
    /// Arbitrum chain configuration
    pub l2: L2Config,
}

impl ArbitrumNetwork {
    /// Create mainnet configuration.
    pub const fn mainnet() -> Self {
        Self {
            network_type: NetworkType::Mainnet,
            l1: L1Config::mainnet(),
            l2: L2Config::mainnet(),
        }
    }

    /// Create testnet (Sepolia) configuration.
    pub const fn sepolia() -> Self {
        Self {
            network_type: NetworkType::Testnet,
            l1: L1Config::sepolia(),
            l2: L2Config::sepolia(),
        }
    }

    /// Create configuration from network type.
    pub const fn from_network_type(network_type: NetworkType) -> Self {
        match network_type {
            NetworkType::Mainnet => Self::mainnet(),
            NetworkType::Testnet => Self::sepolia(),
        }
    }

    /// Resolve the preset for an L1/L2 chain id pair.
    ///
    /// Each chain id must have a preset, checked L1 first, and both must be the same one.
    pub fn from_chain_ids(l1_chain_id: u64, l2_chain_id: u64) -> Result<Self, ConfigError> {
        let presets = [Self::mainnet(), Self::sepolia()];

        let network = presets
            .iter()
            .find(|n| n.l1.chain_id == l1_chain_id)
            .ok_or(ConfigError::UnknownChain(l1_chain_id))?;

        if !presets.iter().any(|n| n.l2.chain_id == l2_chain_id) {
            return Err(ConfigError::UnknownChain(l2_chain_id));
        }

        if network.l2.chain_id != l2_chain_id {
            return Err(ConfigError::ChainPairMismatch {
                l1_chain_id,
                l2_chain_id,
            });
        }

        Ok(network.clone())
    }
}

/// Address overrides, typically read from the `[network]` table of the CLI config file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct NetworkOverrides {
    pub l1_gateway_router: Option<Address>,
    pub l1_inbox: Option<Address>,
    pub l1_rollup: Option<Address>,
    pub l1_outbox: Option<Address>,
    pub l2_gateway_router: Option<Address>,
}

/// Builder for custom network configurations.
#[derive(Debug, Clone)]
pub struct ArbitrumNetworkBuilder {
    network: ArbitrumNetwork,
}

impl ArbitrumNetworkBuilder {
    /// Start with mainnet defaults.
    pub const fn mainnet() -> Self {
        Self::from_network(ArbitrumNetwork::mainnet())
    }

    /// Start with testnet defaults.
    pub const fn testnet() -> Self {
        Self::from_network(ArbitrumNetwork::sepolia())
    }

    /// Start from an already resolved network.
    pub const fn from_network(network: ArbitrumNetwork) -> Self {
        Self { network }
    }

    /// Override the L1GatewayRouter address.
    pub const fn l1_gateway_router(mut self, address: Address) -> Self {
        self.network.l1.gateway_router = address;
        self
    }

    /// Override the delayed inbox address.
    pub const fn l1_inbox(mut self, address: Address) -> Self {
        self.network.l1.inbox = address;
        self
    }

    /// Override the rollup address.
    pub const fn l1_rollup(mut self, address: Address) -> Self {
        self.network.l1.rollup = address;
        self
    }

    /// Override the outbox address.
    pub const fn l1_outbox(mut self, address: Address) -> Self {
        self.network.l1.outbox = address;
        self
    }

    /// Override the L2GatewayRouter address.
    pub const fn l2_gateway_router(mut self, address: Address) -> Self {
        self.network.l2.gateway_router = address;
        self
    }

    /// Apply every override that is set.
    pub fn overrides(mut self, overrides: &NetworkOverrides) -> Self {
        if let Some(address) = overrides.l1_gateway_router {
            self = self.l1_gateway_router(address);
        }
        if let Some(address) = overrides.l1_inbox {
            self = self.l1_inbox(address);
        }
        if let Some(address) = overrides.l1_rollup {
            self = self.l1_rollup(address);
        }
        if let Some(address) = overrides.l1_outbox {
            self = self.l1_outbox(address);
        }
        if let Some(address) = overrides.l2_gateway_router {
            self = self.l2_gateway_router(address);
        }
        self
    }

    /// Build the network configuration.
    pub const fn build(self) -> ArbitrumNetwork {
        self.network
    }
}
