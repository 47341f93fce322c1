pub mod approve;
pub mod finalize;
pub mod send_to_l2;
pub mod withdraw;

use alloy_primitives::{TxHash, U256};
use alloy_provider::Provider;
use alloy_rpc_types::TransactionRequest;
pub use client::SignerFn;
use eyre::bail;
use std::future::Future;
use tracing::{debug, info};

/// Trait for executable onchain actions.
pub trait Action: Send + Sync {
    /// Check to see if the action is ready to be executed.
    ///
    /// Returns true if all predictions are met.
    fn is_ready(&self) -> impl Future<Output = eyre::Result<bool>> + Send;

    /// Check if the action has already been completed.
    ///
    /// Returns true if the action was already executed successfully.
    fn is_completed(&self) -> impl Future<Output = eyre::Result<bool>> + Send;

    /// Execute the action.
    ///
    /// Returns the result of the last transaction the action sent.
    fn execute(&mut self) -> impl Future<Output = eyre::Result<Result>> + Send;

    /// Get a human-readable description of this action.
    fn description(&self) -> String;
}

/// Result of an action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Result {
    /// Transaction hash, `None` for a dry run
    pub tx_hash: Option<TxHash>,
    /// Block number where transaction was included
    pub block_number: Option<u64>,
    /// Gas used
    pub gas_used: Option<U256>,
}

impl Result {
    /// Result of a transaction that was only logged.
    pub const fn dry_run() -> Self {
        Self {
            tx_hash: None,
            block_number: None,
            gas_used: None,
        }
    }

    pub const fn is_dry_run(&self) -> bool {
        self.tx_hash.is_none()
    }
}

/// How actions get their transactions onchain.
#[derive(Clone)]
pub enum Submitter {
    /// Sign, broadcast and wait for the receipt
    Sign(SignerFn),
    /// Log the transaction request and send nothing
    DryRun,
}

impl Submitter {
    /// Submit `tx` through `provider`.
    ///
    /// The signer fills nonce, fees and gas. A reverted receipt is an error.
    pub async fn submit<P>(&self, provider: &P, tx: TransactionRequest) -> eyre::Result<Result>
    where
        P: Provider,
    {
        let signer = match self {
            Self::Sign(signer) => signer,
            Self::DryRun => {
                info!(
                    request = %serde_json::to_string(&tx)?,
                    "Dry run, transaction not sent"
                );
                return Ok(Result::dry_run());
            }
        };

        let signed_tx = signer(tx).await?;

        let pending = provider.send_raw_transaction(&signed_tx).await?;
        let tx_hash = *pending.tx_hash();
        debug!(tx_hash = %tx_hash, "Transaction sent, waiting for receipt");

        let receipt = pending.get_receipt().await?;
        if !receipt.status() {
            bail!("Transaction {} reverted", tx_hash);
        }

        Ok(Result {
            tx_hash: Some(tx_hash),
            block_number: receipt.block_number,
            gas_used: Some(U256::from(receipt.gas_used)),
        })
    }
}
