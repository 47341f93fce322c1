use alloy_primitives::B256;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    /// No network preset covers this chain id
    #[error("Unknown chain id {0}: no Arbitrum network preset")]
    UnknownChain(u64),

    /// L1 and L2 chain ids belong to different networks
    #[error("Chain {l2_chain_id} does not settle on chain {l1_chain_id}")]
    ChainPairMismatch { l1_chain_id: u64, l2_chain_id: u64 },

    /// Required environment variable is not set
    #[error("Missing environment variable {0}")]
    MissingEnv(String),

    /// Contract not recorded in the deployments file
    #[error("No {name} recorded for chain {chain_id} in deployments")]
    MissingDeployment { chain_id: u64, name: String },

    /// Withdrawal not recorded in the deployments file
    #[error("Withdrawal {0} is not recorded in deployments")]
    UnknownWithdrawal(B256),

    #[error("Deployments file I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Deployments file is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
}
