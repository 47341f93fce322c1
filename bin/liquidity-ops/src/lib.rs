//! Operator flows behind the `liquidity-ops` subcommands.
//!
//! Each flow resolves the network preset for a chain pair, connects to `RPC_<chainID>`,
//! builds one action and runs it. State that must survive between invocations (deployed
//! adapters, initiated withdrawals) lives in the deployments JSON store.

pub mod cli;
pub mod config;

use crate::{
    cli::{
        ChainPair, Cli, EstimateRetryableArgs, FinalizeL1Args, SendToL2Args, SetAddressArgs,
        WithdrawFromL2Args, WithdrawalStatusArgs,
    },
    config::Config,
};
use ::config::{
    ArbitrumNetwork, ArbitrumNetworkBuilder, ConfigError, Deployments, Environment,
    WithdrawalRecord, L1_BRIDGE_ADAPTER, L2_BRIDGE_ADAPTER,
};
use action::{
    finalize::{Finalize, FinalizeAction},
    send_to_l2::{SendToL2, SendToL2Action},
    withdraw::{Withdraw, WithdrawAction},
    Action, Submitter,
};
use alloy_primitives::{Address, B256};
use alloy_provider::{DynProvider, Provider};
use client::RemoteSigner;
use eyre::eyre;
use retryable::{outbound_retryable_data, RetryableEstimator, RetryableGasParams};
use std::path::PathBuf;
use tracing::{debug, info, warn};
use withdrawal::{logs::fetch_withdrawal_logs, state::OutboxState, types::WithdrawalStatus};

/// Signs on behalf of the owner.
pub enum Owner {
    /// Hex private key, from `--owner-key` or `OWNER_KEY`
    Key(String),
    /// Remote signer proxy holding the key of `address`
    Remote { url: String, address: Address },
}

impl Owner {
    pub fn address(&self) -> eyre::Result<Address> {
        match self {
            Self::Key(key) => Ok(client::signer_address(key)?),
            Self::Remote { address, .. } => Ok(*address),
        }
    }

    /// Submitter for transactions on `chain_id`. Nothing is signed in dry-run mode.
    pub fn submitter<P>(&self, chain_id: u64, provider: P, dry_run: bool) -> eyre::Result<Submitter>
    where
        P: Provider + Clone + 'static,
    {
        if dry_run {
            return Ok(Submitter::DryRun);
        }

        let signer = match self {
            Self::Key(key) => client::local_signer_fn(key, chain_id, provider)?,
            Self::Remote { url, address } => client::remote_signer_fn(
                RemoteSigner::new(url.clone(), *address, chain_id),
                provider,
            ),
        };

        Ok(Submitter::Sign(signer))
    }
}

/// Everything a flow needs besides its own arguments.
pub struct Context {
    pub env: Environment,
    pub config: Config,
    pub deployments_path: PathBuf,
    pub deployments: Deployments,
    pub dry_run: bool,
    owner_key: Option<String>,
    signer_url: Option<String>,
    signer_address: Option<Address>,
}

impl Context {
    /// Load the configuration file and the deployments store named on the command line.
    pub fn new(cli: &Cli, env: Environment) -> eyre::Result<Self> {
        let config = match &cli.config {
            Some(path) => Config::from_file(path)?,
            None => Config::default(),
        };

        let deployments_path = cli
            .deployments
            .clone()
            .unwrap_or_else(|| config.deployments.clone());
        let deployments = Deployments::load(&deployments_path)?;

        Ok(Self {
            env,
            config,
            deployments_path,
            deployments,
            dry_run: cli.dry_run,
            owner_key: cli.owner_key.clone(),
            signer_url: cli.signer_url.clone(),
            signer_address: cli.signer_address,
        })
    }

    /// Owner signer. A remote signer wins over the key; the key falls back to `OWNER_KEY`.
    pub fn owner(&self) -> eyre::Result<Owner> {
        if let Some(url) = &self.signer_url {
            let address = self
                .signer_address
                .ok_or_else(|| eyre!("--signer-url requires --signer-address"))?;
            return Ok(Owner::Remote {
                url: url.clone(),
                address,
            });
        }

        let key = match &self.owner_key {
            Some(key) => key.clone(),
            None => self.env.owner_key()?.to_string(),
        };

        Ok(Owner::Key(key))
    }

    pub fn network(&self, chains: ChainPair) -> eyre::Result<ArbitrumNetwork> {
        let preset = ArbitrumNetwork::from_chain_ids(chains.l1_chain_id, chains.l2_chain_id)?;
        Ok(ArbitrumNetworkBuilder::from_network(preset)
            .overrides(&self.config.network)
            .build())
    }

    /// Provider for `RPC_<chain_id>`, checked against `chain_id`.
    pub async fn provider(&self, chain_id: u64) -> eyre::Result<DynProvider> {
        let provider = client::connect(self.env.rpc_url(chain_id)?, chain_id).await?;
        debug!(chain_id, "Connected");
        Ok(provider)
    }

    /// Resolve the network and connect to both chains.
    pub async fn connect(
        &self,
        chains: ChainPair,
    ) -> eyre::Result<(ArbitrumNetwork, DynProvider, DynProvider)> {
        let network = self.network(chains)?;
        let l1_provider = self.provider(network.l1.chain_id).await?;
        let l2_provider = self.provider(network.l2.chain_id).await?;

        info!(
            network = ?network.network_type,
            l1_chain_id = network.l1.chain_id,
            l2_chain_id = network.l2.chain_id,
            "Connected to chain pair"
        );

        Ok((network, l1_provider, l2_provider))
    }

    /// An explicit address, or the one recorded under `name` for `chain_id`.
    pub fn address_or_deployed(
        &self,
        explicit: Option<Address>,
        chain_id: u64,
        name: &str,
    ) -> eyre::Result<Address> {
        match explicit {
            Some(address) => Ok(address),
            None => Ok(self.deployments.address(chain_id, name)?),
        }
    }

    /// Write the deployments store back. Dry runs leave it untouched.
    pub fn save_deployments(&self) -> eyre::Result<()> {
        if self.dry_run {
            info!(path = %self.deployments_path.display(), "Dry run, deployments not written");
            return Ok(());
        }

        Ok(self.deployments.save(&self.deployments_path)?)
    }
}

async fn run_action<A: Action>(action: &mut A) -> eyre::Result<action::Result> {
    info!("{}", action.description());

    if !action.is_ready().await? {
        eyre::bail!("Not ready: {}", action.description());
    }

    action.execute().await
}

/// `arb-send-to-l2`: deposit tokens to L2 through the L1 bridge adapter.
pub async fn send_to_l2(ctx: &Context, args: &SendToL2Args) -> eyre::Result<action::Result> {
    let (network, l1_provider, l2_provider) = ctx.connect(args.chains).await?;
    let adapter = ctx.address_or_deployed(args.adapter, network.l1.chain_id, L1_BRIDGE_ADAPTER)?;

    let owner = ctx.owner()?;
    let owner_address = owner.address()?;
    let submitter = owner.submitter(network.l1.chain_id, l1_provider.clone(), ctx.dry_run)?;

    let mut action = SendToL2Action::new(
        l1_provider,
        l2_provider,
        submitter,
        SendToL2 {
            adapter,
            gateway_router: network.l1.gateway_router,
            inbox: network.l1.inbox,
            l1_token: args.l1_token,
            l2_token: args.l2_token,
            owner: owner_address,
            recipient: args.recipient.unwrap_or(owner_address),
            amount: args.amount,
            gas_overrides: ctx.config.retryable.gas_overrides(),
        },
    );

    run_action(&mut action).await
}

/// `arb-withdraw-from-l2`: start a withdrawal and record it for a later `arb-finalize-l1`.
pub async fn withdraw_from_l2(
    ctx: &mut Context,
    args: &WithdrawFromL2Args,
) -> eyre::Result<action::Result> {
    let network = ctx.network(args.chains)?;
    let l2_provider = ctx.provider(network.l2.chain_id).await?;
    let adapter = ctx.address_or_deployed(args.adapter, network.l2.chain_id, L2_BRIDGE_ADAPTER)?;

    let owner = ctx.owner()?;
    let owner_address = owner.address()?;
    let submitter = owner.submitter(network.l2.chain_id, l2_provider.clone(), ctx.dry_run)?;
    let recipient = args.recipient.unwrap_or(owner_address);

    let mut action = WithdrawAction::new(
        l2_provider,
        submitter,
        Withdraw {
            adapter,
            l2_token: args.l2_token,
            l1_token: args.l1_token,
            owner: owner_address,
            recipient,
            amount: args.amount,
            tx_hash: None,
        },
    );

    // A sent withdrawal is recorded even when a later step of the action fails.
    let outcome = run_action(&mut action).await;
    if let Some(l2_tx_hash) = action.tx_hash() {
        record_withdrawal(ctx, &network, args, recipient, l2_tx_hash)?;
    }

    outcome
}

fn record_withdrawal(
    ctx: &mut Context,
    network: &ArbitrumNetwork,
    args: &WithdrawFromL2Args,
    recipient: Address,
    l2_tx_hash: B256,
) -> eyre::Result<()> {
    ctx.deployments.record_withdrawal(WithdrawalRecord {
        l1_chain_id: network.l1.chain_id,
        l2_chain_id: network.l2.chain_id,
        l2_tx_hash,
        l2_token: args.l2_token,
        l1_token: args.l1_token,
        recipient,
        amount: args.amount,
        finalized: false,
        finalized_tx_hash: None,
    });
    info!(l2_tx_hash = %l2_tx_hash, "Withdrawal recorded");
    ctx.save_deployments()
}

/// Withdrawal finalized by `arb-finalize-l1`.
#[derive(Debug, Clone)]
pub enum Finalized {
    /// Sent now (or logged, in dry-run mode)
    Submitted(action::Result),
    /// The outbox had already executed it
    AlreadyExecuted,
}

/// `arb-finalize-l1`: execute a confirmed withdrawal on L1.
///
/// Without an explicit hash the oldest pending recorded withdrawal for the chain pair is
/// used.
pub async fn finalize_on_l1(ctx: &mut Context, args: &FinalizeL1Args) -> eyre::Result<Finalized> {
    let (network, l1_provider, l2_provider) = ctx.connect(args.chains).await?;
    let adapter = ctx.address_or_deployed(args.adapter, network.l1.chain_id, L1_BRIDGE_ADAPTER)?;

    let l2_tx_hash = match args.l2_tx_hash {
        Some(hash) => hash,
        None => ctx
            .deployments
            .pending_withdrawals(network.l1.chain_id, network.l2.chain_id)
            .next()
            .map(|record| record.l2_tx_hash)
            .ok_or_else(|| {
                eyre!(
                    "No pending withdrawal recorded from chain {} to chain {}",
                    network.l2.chain_id,
                    network.l1.chain_id
                )
            })?,
    };

    let owner = ctx.owner()?;
    let owner_address = owner.address()?;
    let submitter = owner.submitter(network.l1.chain_id, l1_provider.clone(), ctx.dry_run)?;

    let finalize = Finalize {
        lookback: ctx.config.node_confirmed_lookback,
        ..Finalize::new(
            adapter,
            network.l1.rollup,
            network.l1.outbox,
            l2_tx_hash,
            owner_address,
        )
    };
    let mut action = FinalizeAction::new(l1_provider, l2_provider, submitter, finalize);
    info!("{}", action.description());

    if action.is_completed().await? {
        info!(l2_tx_hash = %l2_tx_hash, "Withdrawal already executed on L1");
        mark_finalized(ctx, l2_tx_hash, None)?;
        return Ok(Finalized::AlreadyExecuted);
    }

    let result = action.execute().await?;
    if let Some(l1_tx_hash) = result.tx_hash {
        mark_finalized(ctx, l2_tx_hash, Some(l1_tx_hash))?;
    }

    Ok(Finalized::Submitted(result))
}

fn mark_finalized(ctx: &mut Context, l2_tx_hash: B256, l1_tx_hash: Option<B256>) -> eyre::Result<()> {
    match ctx.deployments.mark_finalized(l2_tx_hash, l1_tx_hash) {
        Ok(()) => ctx.save_deployments(),
        Err(ConfigError::UnknownWithdrawal(_)) => {
            debug!(l2_tx_hash = %l2_tx_hash, "Withdrawal not recorded in deployments");
            Ok(())
        }
        Err(e) => Err(e.into()),
    }
}

/// `arb-withdrawal-status`: where a withdrawal stands. Read-only, no owner needed.
pub async fn withdrawal_status(
    ctx: &Context,
    args: &WithdrawalStatusArgs,
) -> eyre::Result<WithdrawalStatus> {
    let (network, l1_provider, l2_provider) = ctx.connect(args.chains).await?;

    let logs = fetch_withdrawal_logs(&l2_provider, args.l2_tx_hash).await?;
    let state = OutboxState::new(
        l1_provider,
        l2_provider,
        network.l1.rollup,
        network.l1.outbox,
    )
    .with_lookback(ctx.config.node_confirmed_lookback);

    state.withdrawal_status(&logs).await
}

/// `arb-estimate-retryable`: price the retryable ticket a deposit would create.
pub async fn estimate_retryable(
    ctx: &Context,
    args: &EstimateRetryableArgs,
) -> eyre::Result<RetryableGasParams> {
    let (network, l1_provider, l2_provider) = ctx.connect(args.chains).await?;
    let from = ctx.address_or_deployed(args.from, network.l1.chain_id, L1_BRIDGE_ADAPTER)?;
    let recipient = args.recipient.unwrap_or(from);

    let data = outbound_retryable_data(
        &l1_provider,
        network.l1.gateway_router,
        args.l1_token,
        from,
        recipient,
        args.amount,
    )
    .await?;

    let estimator = RetryableEstimator::new(l1_provider, l2_provider, network.l1.inbox);
    estimator
        .estimate_all(&data, &ctx.config.retryable.gas_overrides())
        .await
}

/// `set-address`: record a deployed contract.
pub fn set_address(ctx: &mut Context, args: &SetAddressArgs) -> eyre::Result<()> {
    if args.name.trim().is_empty() {
        eyre::bail!("Contract name must not be empty");
    }

    if let Ok(previous) = ctx.deployments.address(args.chain_id, &args.name) {
        warn!(
            chain_id = args.chain_id,
            name = %args.name,
            %previous,
            "Replacing recorded address"
        );
    }

    ctx.deployments
        .set_address(args.chain_id, args.name.clone(), args.address);
    ctx.save_deployments()
}
