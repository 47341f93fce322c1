//! Integration tests against Arbitrum Sepolia.
//!
//! Read-only: they inspect an existing withdrawal and never send a transaction.
//! Run with `RPC_11155111`, `RPC_421614` and `TEST_L2_TX_HASH` set.

use crate::setup::{network, setup_provider, test_l2_tx_hash, L1_CHAIN_ID, L2_CHAIN_ID};
use action::{
    finalize::{Finalize, FinalizeAction},
    Submitter,
};
use alloy_primitives::Address;
use withdrawal::{
    logs::fetch_withdrawal_logs,
    payload::{encode_finalization_payload, finalization_payload},
    state::OutboxState,
    types::WithdrawalStatus,
};


#[tokio::test]
#[ignore = "requires RPC_11155111, RPC_421614 and TEST_L2_TX_HASH"]
async fn test_withdrawal_status() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init();

    let network = network();
    let l1_provider = setup_provider(L1_CHAIN_ID).await;
    let l2_provider = setup_provider(L2_CHAIN_ID).await;
    let l2_tx_hash = test_l2_tx_hash();

    let logs = fetch_withdrawal_logs(&l2_provider, l2_tx_hash)
        .await
        .expect("Failed to read withdrawal logs");
    let leaf = logs.leaf().unwrap();
    println!("Withdrawal {l2_tx_hash} at position {leaf}");

    let state = OutboxState::new(
        l1_provider,
        l2_provider,
        network.l1.rollup,
        network.l1.outbox,
    );
    let status = state.withdrawal_status(&logs).await.unwrap();
    println!("Status: {status}");

    if let WithdrawalStatus::Confirmed { send_count } = status {
        assert!(leaf < send_count);

        let proof = state.fetcher().fetch(leaf).await.unwrap();
        assert_eq!(proof.leaf, leaf);
        assert_eq!(proof.size, send_count);
        println!("Proof has {} nodes", proof.proof.len());

        let payload = finalization_payload(&logs, &proof);
        let encoded = encode_finalization_payload(&payload);
        assert!(!encoded.is_empty());
    }
}

#[tokio::test]
#[ignore = "requires RPC_11155111, RPC_421614 and TEST_L2_TX_HASH"]
async fn test_finalize_dry_run() {
    let network = network();
    let l1_provider = setup_provider(L1_CHAIN_ID).await;
    let l2_provider = setup_provider(L2_CHAIN_ID).await;

    let action = FinalizeAction::new(
        l1_provider,
        l2_provider,
        Submitter::DryRun,
        Finalize::new(
            Address::ZERO,
            network.l1.rollup,
            network.l1.outbox,
            test_l2_tx_hash(),
            Address::ZERO,
        ),
    );

    let status = action.status().await.unwrap();
    println!("Status: {status}");
}
