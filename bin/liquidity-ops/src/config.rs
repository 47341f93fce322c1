use alloy_primitives::U256;
use ::config::NetworkOverrides;
use retryable::GasOverrides;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use withdrawal::proof::NODE_CONFIRMED_LOOKBACK;

/// Deployments file used when neither the CLI nor the config file names one.
pub const DEFAULT_DEPLOYMENTS_PATH: &str = "deployments.json";

/// Optional liquidity-ops configuration file.
///
/// Every field has a default, so an empty file (or no file) is a valid configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Deployed-contracts JSON store
    pub deployments: PathBuf,

    /// Address overrides applied on top of the network preset
    pub network: NetworkOverrides,

    /// Padding applied to retryable ticket estimates
    pub retryable: RetryableConfig,

    /// L1 blocks searched backwards for the latest confirmed rollup node
    pub node_confirmed_lookback: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            deployments: PathBuf::from(DEFAULT_DEPLOYMENTS_PATH),
            network: NetworkOverrides::default(),
            retryable: RetryableConfig::default(),
            node_confirmed_lookback: NODE_CONFIRMED_LOOKBACK,
        }
    }
}

impl Config {
    pub fn from_file(path: impl AsRef<Path>) -> eyre::Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&contents)?;

        Ok(config)
    }
}

/// `[retryable]` table. Unset fields keep the estimator defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RetryableConfig {
    pub gas_limit_percent_increase: Option<u64>,
    pub min_gas_limit: Option<u64>,
    pub max_fee_per_gas_percent_increase: Option<u64>,
    pub max_submission_fee_percent_increase: Option<u64>,
}

impl RetryableConfig {
    pub fn gas_overrides(&self) -> GasOverrides {
        let defaults = GasOverrides::default();
        GasOverrides {
            gas_limit_percent_increase: self
                .gas_limit_percent_increase
                .unwrap_or(defaults.gas_limit_percent_increase),
            min_gas_limit: self
                .min_gas_limit
                .map_or(defaults.min_gas_limit, U256::from),
            max_fee_per_gas_percent_increase: self
                .max_fee_per_gas_percent_increase
                .unwrap_or(defaults.max_fee_per_gas_percent_increase),
            max_submission_fee_percent_increase: self
                .max_submission_fee_percent_increase
                .unwrap_or(defaults.max_submission_fee_percent_increase),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::Address;

    #[test]
    fn test_empty_config() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.deployments, PathBuf::from("deployments.json"));
        assert_eq!(config.node_confirmed_lookback, 1200);
        assert_eq!(config.retryable.gas_overrides(), GasOverrides::default());
    }

    #[test]
    fn test_full_config() {
        let config: Config = toml::from_str(
            r#"
            deployments = "state/sepolia.json"
            node_confirmed_lookback = 5000

            [network]
            l1_outbox = "0x1111111111111111111111111111111111111111"

            [retryable]
            gas_limit_percent_increase = 20
            min_gas_limit = 300000
            "#,
        )
        .unwrap();

        assert_eq!(config.deployments, PathBuf::from("state/sepolia.json"));
        assert_eq!(config.node_confirmed_lookback, 5000);
        assert_eq!(config.network.l1_outbox, Some(Address::repeat_byte(0x11)));

        let overrides = config.retryable.gas_overrides();
        assert_eq!(overrides.gas_limit_percent_increase, 20);
        assert_eq!(overrides.min_gas_limit, U256::from(300_000));
        assert_eq!(overrides.max_fee_per_gas_percent_increase, 200);
        assert_eq!(overrides.max_submission_fee_percent_increase, 300);
    }

    #[test]
    fn test_unknown_field_rejected() {
        assert!(toml::from_str::<Config>("l2_rpc_url = \"http://localhost\"").is_err());
    }
}
