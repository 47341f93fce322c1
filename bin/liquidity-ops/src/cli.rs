//! Command line interface.

use alloy_primitives::{Address, B256, U256};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "liquidity-ops")]
#[command(about = "Operator steps for moving liquidity between Ethereum and Arbitrum")]
pub struct Cli {
    /// Path to an optional TOML configuration file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Deployed-contracts JSON store [default: deployments.json]
    #[arg(long, global = true)]
    pub deployments: Option<PathBuf>,

    /// Owner private key (hex string, with or without 0x prefix). Falls back to OWNER_KEY.
    #[arg(short = 'k', long, global = true)]
    pub owner_key: Option<String>,

    /// Remote signer proxy used instead of the owner key
    #[arg(long, global = true, requires = "signer_address")]
    pub signer_url: Option<String>,

    /// Address the remote signer signs for
    #[arg(long, global = true)]
    pub signer_address: Option<Address>,

    /// Dry-run mode: log transaction requests without signing or sending them
    #[arg(long, global = true)]
    pub dry_run: bool,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    pub log_json: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Deposit tokens from L1 to L2 through the L1 bridge adapter
    #[command(name = "arb-send-to-l2")]
    ArbSendToL2(SendToL2Args),

    /// Withdraw tokens from L2 to L1 through the L2 bridge adapter
    #[command(name = "arb-withdraw-from-l2")]
    ArbWithdrawFromL2(WithdrawFromL2Args),

    /// Finalize an L2→L1 withdrawal on L1
    #[command(name = "arb-finalize-l1")]
    ArbFinalizeL1(FinalizeL1Args),

    /// Show where an L2→L1 withdrawal stands
    #[command(name = "arb-withdrawal-status")]
    ArbWithdrawalStatus(WithdrawalStatusArgs),

    /// Estimate the retryable ticket of an L1→L2 deposit without sending it
    #[command(name = "arb-estimate-retryable")]
    ArbEstimateRetryable(EstimateRetryableArgs),

    /// Record a deployed contract address
    #[command(name = "set-address")]
    SetAddress(SetAddressArgs),
}

/// The L1/L2 pair a command runs against.
#[derive(Debug, Clone, Copy, Args)]
pub struct ChainPair {
    /// Parent chain id (1 or 11155111)
    #[arg(long)]
    pub l1_chain_id: u64,

    /// Arbitrum chain id (42161 or 421614)
    #[arg(long)]
    pub l2_chain_id: u64,
}

#[derive(Debug, Args)]
pub struct SendToL2Args {
    #[command(flatten)]
    pub chains: ChainPair,

    #[arg(long)]
    pub l1_token: Address,

    #[arg(long)]
    pub l2_token: Address,

    /// Amount in wei
    #[arg(long)]
    pub amount: U256,

    /// Receiver on L2 [default: owner]
    #[arg(long)]
    pub recipient: Option<Address>,

    /// L1 bridge adapter [default: ArbitrumL1BridgeAdapter from deployments]
    #[arg(long)]
    pub adapter: Option<Address>,
}

#[derive(Debug, Args)]
pub struct WithdrawFromL2Args {
    #[command(flatten)]
    pub chains: ChainPair,

    #[arg(long)]
    pub l2_token: Address,

    #[arg(long)]
    pub l1_token: Address,

    /// Amount in wei
    #[arg(long)]
    pub amount: U256,

    /// Receiver on L1 [default: owner]
    #[arg(long)]
    pub recipient: Option<Address>,

    /// L2 bridge adapter [default: ArbitrumL2BridgeAdapter from deployments]
    #[arg(long)]
    pub adapter: Option<Address>,
}

#[derive(Debug, Args)]
pub struct FinalizeL1Args {
    #[command(flatten)]
    pub chains: ChainPair,

    /// L2 withdrawal transaction [default: oldest pending recorded withdrawal]
    #[arg(long)]
    pub l2_tx_hash: Option<B256>,

    /// L1 bridge adapter [default: ArbitrumL1BridgeAdapter from deployments]
    #[arg(long)]
    pub adapter: Option<Address>,
}

#[derive(Debug, Args)]
pub struct WithdrawalStatusArgs {
    #[command(flatten)]
    pub chains: ChainPair,

    /// L2 withdrawal transaction
    #[arg(long)]
    pub l2_tx_hash: B256,
}

#[derive(Debug, Args)]
pub struct EstimateRetryableArgs {
    #[command(flatten)]
    pub chains: ChainPair,

    #[arg(long)]
    pub l1_token: Address,

    /// Amount in wei
    #[arg(long)]
    pub amount: U256,

    /// Receiver on L2 [default: the sender]
    #[arg(long)]
    pub recipient: Option<Address>,

    /// Caller of the gateway router [default: ArbitrumL1BridgeAdapter from deployments]
    #[arg(long)]
    pub from: Option<Address>,
}

#[derive(Debug, Args)]
pub struct SetAddressArgs {
    #[arg(long)]
    pub chain_id: u64,

    /// Contract name, e.g. ArbitrumL1BridgeAdapter
    #[arg(long)]
    pub name: String,

    #[arg(long)]
    pub address: Address,
}
