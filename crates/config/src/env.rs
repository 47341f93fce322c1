//! Environment lookups.
//!
//! Endpoints are configured per chain as `RPC_<chainID>` so the same shell can drive
//! any L1/L2 pair. The owner key is read from `OWNER_KEY`.

use crate::ConfigError;
use std::collections::HashMap;

/// Name of the variable holding the owner's private key.
pub const OWNER_KEY_ENV: &str = "OWNER_KEY";

/// Name of the variable holding the HTTP RPC endpoint of `chain_id`.
pub fn rpc_env_name(chain_id: u64) -> String {
    format!("RPC_{chain_id}")
}

/// Snapshot of the process environment.
#[derive(Debug, Clone, Default)]
pub struct Environment {
    vars: HashMap<String, String>,
}

impl Environment {
    /// Capture the current process environment.
    pub fn from_env() -> Self {
        Self::from_vars(std::env::vars())
    }

    /// Build an environment from explicit key/value pairs.
    pub fn from_vars<I, K, V>(vars: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            vars: vars
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    fn require(&self, name: &str) -> Result<&str, ConfigError> {
        self.vars
            .get(name)
            .map(|v| v.trim())
            .filter(|v| !v.is_empty())
            .ok_or_else(|| ConfigError::MissingEnv(name.to_string()))
    }

    /// HTTP RPC endpoint for `chain_id`.
    pub fn rpc_url(&self, chain_id: u64) -> Result<&str, ConfigError> {
        self.require(&rpc_env_name(chain_id))
    }

    /// Owner private key.
    pub fn owner_key(&self) -> Result<&str, ConfigError> {
        self.require(OWNER_KEY_ENV)
    }
}
