use clap::Parser;
use config::Environment;
use liquidity_ops::{
    cli::{Cli, Command},
    estimate_retryable, finalize_on_l1, send_to_l2, set_address, withdraw_from_l2,
    withdrawal_status, Context, Finalized,
};
use tracing::info;
use tracing_subscriber::EnvFilter;

fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

fn print_result(result: &action::Result) {
    match result.tx_hash {
        Some(tx_hash) => println!("{tx_hash}"),
        None => info!("Dry run, nothing sent"),
    }
}

#[tokio::main]
async fn main() -> eyre::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.log_json);

    let mut ctx = Context::new(&cli, Environment::from_env())?;
    if ctx.dry_run {
        info!("Mode: DRY-RUN (no transactions will be signed or sent)");
    }

    match &cli.command {
        Command::ArbSendToL2(args) => {
            let result = send_to_l2(&ctx, args).await?;
            print_result(&result);
        }
        Command::ArbWithdrawFromL2(args) => {
            let result = withdraw_from_l2(&mut ctx, args).await?;
            print_result(&result);
        }
        Command::ArbFinalizeL1(args) => match finalize_on_l1(&mut ctx, args).await? {
            Finalized::Submitted(result) => print_result(&result),
            Finalized::AlreadyExecuted => println!("already finalized"),
        },
        Command::ArbWithdrawalStatus(args) => {
            let status = withdrawal_status(&ctx, args).await?;
            println!("{status}");
        }
        Command::ArbEstimateRetryable(args) => {
            let params = estimate_retryable(&ctx, args).await?;
            println!("gasLimit:          {}", params.gas_limit);
            println!("maxFeePerGas:      {}", params.max_fee_per_gas);
            println!("maxSubmissionCost: {}", params.max_submission_cost);
            println!("deposit:           {}", params.deposit);
        }
        Command::SetAddress(args) => {
            set_address(&mut ctx, args)?;
            info!(chain_id = args.chain_id, name = %args.name, address = %args.address, "Address recorded");
        }
    }

    Ok(())
}
