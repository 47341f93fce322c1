//! Deployed-contracts store.
//!
//! A JSON file shared between CLI invocations. It records contract addresses per chain
//! (bridge adapters, tokens) and the withdrawals initiated on L2, so a later
//! `arb-finalize-l1` run can pick them up without the operator copying tx hashes around.

use crate::ConfigError;
use alloy_primitives::{Address, B256, U256};
use serde::{Deserialize, Serialize};
use std::{collections::BTreeMap, fs, path::Path};
use tracing::debug;

/// Deployments key of the L1 bridge adapter.
pub const L1_BRIDGE_ADAPTER: &str = "ArbitrumL1BridgeAdapter";

/// Deployments key of the L2 bridge adapter.
pub const L2_BRIDGE_ADAPTER: &str = "ArbitrumL2BridgeAdapter";

/// A withdrawal initiated on L2 through the bridge adapter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WithdrawalRecord {
    pub l1_chain_id: u64,
    pub l2_chain_id: u64,
    /// Hash of the L2 transaction that emitted the withdrawal logs
    pub l2_tx_hash: B256,
    pub l2_token: Address,
    pub l1_token: Address,
    pub recipient: Address,
    pub amount: U256,
    /// Executed on L1
    #[serde(default)]
    pub finalized: bool,
    /// L1 finalize transaction, when it was sent from here
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub finalized_tx_hash: Option<B256>,
}

impl WithdrawalRecord {
    pub const fn is_pending(&self) -> bool {
        !self.finalized
    }
}

/// Contents of the deployments file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Deployments {
    /// chain id → contract name → address
    #[serde(default)]
    pub chains: BTreeMap<u64, BTreeMap<String, Address>>,
    /// Withdrawals in initiation order
    #[serde(default)]
    pub withdrawals: Vec<WithdrawalRecord>,
}

impl Deployments {
    /// Load the store. A missing file is an empty store.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if !path.exists() {
            debug!(path = %path.display(), "Deployments file not found, starting empty");
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&contents)?)
    }

    /// Write the store as pretty JSON.
    ///
    /// The file is written next to the target and renamed over it, so an interrupted run
    /// never leaves a truncated store behind.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();
        let tmp = path.with_extension("json.tmp");

        let mut contents = serde_json::to_string_pretty(self)?;
        contents.push('\n');
        fs::write(&tmp, contents)?;
        fs::rename(&tmp, path)?;

        debug!(path = %path.display(), "Deployments saved");
        Ok(())
    }

    /// Address recorded under `name` for `chain_id`.
    pub fn address(&self, chain_id: u64, name: &str) -> Result<Address, ConfigError> {
        self.chains
            .get(&chain_id)
            .and_then(|contracts| contracts.get(name))
            .copied()
            .ok_or_else(|| ConfigError::MissingDeployment {
                chain_id,
                name: name.to_string(),
            })
    }

    /// Record `address` under `name` for `chain_id`, replacing any previous entry.
    pub fn set_address(&mut self, chain_id: u64, name: impl Into<String>, address: Address) {
        self.chains
            .entry(chain_id)
            .or_default()
            .insert(name.into(), address);
    }

    /// Record an initiated withdrawal. Recording the same L2 tx twice keeps one entry.
    pub fn record_withdrawal(&mut self, record: WithdrawalRecord) {
        match self
            .withdrawals
            .iter_mut()
            .find(|w| w.l2_tx_hash == record.l2_tx_hash)
        {
            Some(existing) => *existing = record,
            None => self.withdrawals.push(record),
        }
    }

    /// Mark the withdrawal initiated by `l2_tx_hash` as finalized.
    ///
    /// `l1_tx_hash` is unknown when the withdrawal was found already executed.
    pub fn mark_finalized(
        &mut self,
        l2_tx_hash: B256,
        l1_tx_hash: Option<B256>,
    ) -> Result<(), ConfigError> {
        let record = self
            .withdrawals
            .iter_mut()
            .find(|w| w.l2_tx_hash == l2_tx_hash)
            .ok_or(ConfigError::UnknownWithdrawal(l2_tx_hash))?;

        record.finalized = true;
        record.finalized_tx_hash = l1_tx_hash;
        Ok(())
    }

    /// Pending withdrawals between `l2_chain_id` and `l1_chain_id`, oldest first.
    pub fn pending_withdrawals(
        &self,
        l1_chain_id: u64,
        l2_chain_id: u64,
    ) -> impl Iterator<Item = &WithdrawalRecord> {
        self.withdrawals.iter().filter(move |w| {
            w.is_pending() && w.l1_chain_id == l1_chain_id && w.l2_chain_id == l2_chain_id
        })
    }
}
