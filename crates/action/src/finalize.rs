//! Finalize withdrawal action.
//!
//! Executes an L2→L1 withdrawal on L1 through the bridge adapter once the rollup node
//! covering it is confirmed: receipt → logs → outbox proof → payload → submit.

use crate::{Action, Submitter};
use alloy_primitives::{Address, B256};
use alloy_provider::Provider;
use binding::adapter::IArbitrumL1BridgeAdapter;
use tracing::info;
use withdrawal::{
    logs::{fetch_withdrawal_logs, WithdrawalLogs},
    payload::{encode_finalization_payload, finalization_payload},
    proof::NODE_CONFIRMED_LOOKBACK,
    state::OutboxState,
    types::WithdrawalStatus,
};

/// Input data for finalizing a withdrawal on L1.
#[derive(Clone, Debug)]
pub struct Finalize {
    /// ArbitrumL1BridgeAdapter address on L1
    pub adapter: Address,
    /// Rollup address emitting `NodeConfirmed`
    pub rollup: Address,
    /// Outbox address
    pub outbox: Address,
    /// Hash of the L2 transaction that initiated the withdrawal
    pub l2_tx_hash: B256,
    /// Address that will submit the finalize transaction
    pub from: Address,
    /// L1 blocks searched for the latest confirmed node
    pub lookback: u64,
}

impl Finalize {
    pub const fn new(
        adapter: Address,
        rollup: Address,
        outbox: Address,
        l2_tx_hash: B256,
        from: Address,
    ) -> Self {
        Self {
            adapter,
            rollup,
            outbox,
            l2_tx_hash,
            from,
            lookback: NODE_CONFIRMED_LOOKBACK,
        }
    }
}

/// Action to finalize an L2→L1 withdrawal on L1.
pub struct FinalizeAction<P1, P2> {
    l1_provider: P1,
    l2_provider: P2,
    submitter: Submitter,
    action: Finalize,
}

impl<P1, P2> FinalizeAction<P1, P2>
where
    P1: Provider + Clone,
    P2: Provider + Clone,
{
    pub const fn new(
        l1_provider: P1,
        l2_provider: P2,
        submitter: Submitter,
        action: Finalize,
    ) -> Self {
        Self {
            l1_provider,
            l2_provider,
            submitter,
            action,
        }
    }

    /// Get the L2 transaction hash for this action.
    pub const fn l2_tx_hash(&self) -> B256 {
        self.action.l2_tx_hash
    }

    fn outbox_state(&self) -> OutboxState<P1, P2> {
        OutboxState::new(
            self.l1_provider.clone(),
            self.l2_provider.clone(),
            self.action.rollup,
            self.action.outbox,
        )
        .with_lookback(self.action.lookback)
    }

    /// Withdrawal logs of the L2 transaction.
    pub async fn logs(&self) -> eyre::Result<WithdrawalLogs> {
        fetch_withdrawal_logs(&self.l2_provider, self.action.l2_tx_hash).await
    }

    /// Where the withdrawal stands on L1.
    pub async fn status(&self) -> eyre::Result<WithdrawalStatus> {
        let logs = self.logs().await?;
        self.outbox_state().withdrawal_status(&logs).await
    }
}

impl<P1, P2> Action for FinalizeAction<P1, P2>
where
    P1: Provider + Clone,
    P2: Provider + Clone,
{
    async fn is_ready(&self) -> eyre::Result<bool> {
        Ok(self.status().await?.is_finalizable())
    }

    async fn is_completed(&self) -> eyre::Result<bool> {
        let leaf = self.logs().await?.leaf()?;
        self.outbox_state().is_spent(leaf).await
    }

    async fn execute(&mut self) -> eyre::Result<crate::Result> {
        let logs = self.logs().await?;
        let leaf = logs.leaf()?;

        let state = self.outbox_state();
        if state.is_spent(leaf).await? {
            eyre::bail!("Withdrawal already finalized")
        }

        let proof = state.fetcher().fetch(leaf).await?;
        let payload = finalization_payload(&logs, &proof);

        info!(
            l2_tx_hash = %self.action.l2_tx_hash,
            leaf,
            send_count = proof.size,
            proof_len = proof.proof.len(),
            "Finalizing withdrawal"
        );

        let adapter = IArbitrumL1BridgeAdapter::new(self.action.adapter, &self.l1_provider);
        let tx_request = adapter
            .finalizeWithdrawERC20(
                Address::ZERO,
                Address::ZERO,
                encode_finalization_payload(&payload),
            )
            .into_transaction_request()
            .from(self.action.from);

        let result = self.submitter.submit(&self.l1_provider, tx_request).await?;

        info!(
            tx_hash = ?result.tx_hash,
            block_number = result.block_number,
            gas_used = ?result.gas_used,
            l2_tx_hash = %self.action.l2_tx_hash,
            "Withdrawal finalized on L1"
        );

        Ok(result)
    }

    fn description(&self) -> String {
        format!(
            "Finalizing withdrawal {} on L1",
            self.action.l2_tx_hash
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{mock_signer, MockProvider};
    use alloy_primitives::{address, b256};

    fn create_test_finalize_action() -> FinalizeAction<MockProvider, MockProvider> {
        let finalize = Finalize::new(
            address!("0d83dab629f0e0F9d36c0Cbc89B69a489f0751bD"),
            address!("d80810638dbDF9081b72C1B33c65375e807281C8"),
            address!("65f07C7D521164a4d5DaC6eB8Fac8DA067A3B78F"),
            b256!("1111111111111111111111111111111111111111111111111111111111111111"),
            address!("5CFFA347b0aE99cc01E5c01714cA5658e54a23D1"),
        );

        FinalizeAction::new(
            MockProvider,
            MockProvider,
            Submitter::Sign(mock_signer()),
            finalize,
        )
    }

    #[test]
    fn test_finalize_action_description() {
        let action = create_test_finalize_action();
        let desc = action.description();
        assert!(desc.contains("Finalizing withdrawal"));
        assert!(desc.contains("1111111111111111111111111111111111111111111111111111111111111111"));
    }

    #[test]
    fn test_finalize_action_l2_tx_hash() {
        let action = create_test_finalize_action();
        assert_eq!(
            action.l2_tx_hash(),
            b256!("1111111111111111111111111111111111111111111111111111111111111111")
        );
    }

    mod pipeline {
        use super::*;
        use alloy_primitives::{Bytes, Log, U256, U64};
        use alloy_provider::ProviderBuilder;
        use alloy_rpc_types_eth::{Block, Header};
        use alloy_sol_types::{SolEvent, SolValue};
        use alloy_transport::mock::Asserter;
        use binding::arbitrum::{IArbSys, IL2ArbitrumGateway, IRollupCore, ARB_SYS_ADDRESS};

        const L2_TX: B256 = B256::repeat_byte(0x1f);
        const GATEWAY: Address = Address::repeat_byte(0x09);
        const ROLLUP: Address = Address::repeat_byte(0x70);
        const NODE_BLOCK: B256 = B256::repeat_byte(0x71);
        const SEND_ROOT: B256 = B256::repeat_byte(0x72);

        fn log<E: SolEvent>(address: Address, event: &E) -> Log {
            Log {
                address,
                data: event.encode_log_data(),
            }
        }

        fn withdrawal_receipt(position: u64) -> serde_json::Value {
            let logs: Vec<alloy_rpc_types_eth::Log> = vec![
                log(
                    GATEWAY,
                    &IL2ArbitrumGateway::WithdrawalInitiated {
                        l1Token: Address::repeat_byte(0x01),
                        _from: Address::repeat_byte(0x02),
                        _to: Address::repeat_byte(0x03),
                        _l2ToL1Id: U256::from(position),
                        _exitNum: U256::ZERO,
                        _amount: U256::from(500),
                    },
                ),
                log(
                    ARB_SYS_ADDRESS,
                    &IArbSys::L2ToL1Tx {
                        caller: GATEWAY,
                        destination: Address::repeat_byte(0x0a),
                        hash: U256::from(77),
                        position: U256::from(position),
                        arbBlockNum: U256::from(1_000),
                        ethBlockNum: U256::from(900),
                        timestamp: U256::from(1_700_000_000u64),
                        callvalue: U256::ZERO,
                        data: Bytes::from(vec![0x2e, 0x56, 0x7b, 0x36]),
                    },
                ),
                log(
                    GATEWAY,
                    &IL2ArbitrumGateway::TxToL1 {
                        _from: Address::repeat_byte(0x02),
                        _to: Address::repeat_byte(0x0a),
                        _id: U256::from(position),
                        _data: Bytes::from(vec![0x2e, 0x56, 0x7b, 0x36]),
                    },
                ),
            ]
            .into_iter()
            .map(|inner| alloy_rpc_types_eth::Log {
                inner,
                transaction_hash: Some(L2_TX),
                ..Default::default()
            })
            .collect();

            serde_json::json!({
                "type": "0x2",
                "status": "0x1",
                "cumulativeGasUsed": "0x30d40",
                "logs": logs,
                "logsBloom": alloy_primitives::Bloom::default(),
                "transactionHash": L2_TX,
                "transactionIndex": "0x1",
                "blockHash": B256::repeat_byte(0xbb),
                "blockNumber": "0x3e8",
                "gasUsed": "0x30d40",
                "effectiveGasPrice": "0x5f5e100",
                "from": Address::repeat_byte(0x02),
                "to": GATEWAY,
                "contractAddress": null,
            })
        }

        fn node_confirmed_log() -> alloy_rpc_types_eth::Log {
            alloy_rpc_types_eth::Log {
                inner: log(
                    ROLLUP,
                    &IRollupCore::NodeConfirmed {
                        nodeNum: 9,
                        blockHash: NODE_BLOCK,
                        sendRoot: SEND_ROOT,
                    },
                ),
                block_number: Some(4_900),
                ..Default::default()
            }
        }

        fn confirmed_block(send_count: u64) -> Block {
            let mut mix_hash = B256::ZERO;
            mix_hash[..8].copy_from_slice(&send_count.to_be_bytes());
            Block {
                header: Header {
                    hash: NODE_BLOCK,
                    inner: alloy_consensus::Header {
                        number: 77,
                        mix_hash,
                        extra_data: Bytes::copy_from_slice(SEND_ROOT.as_slice()),
                        ..Default::default()
                    },
                    ..Default::default()
                },
                ..Default::default()
            }
        }

        fn action(
            l1: &Asserter,
            l2: &Asserter,
        ) -> FinalizeAction<impl Provider + Clone, impl Provider + Clone> {
            FinalizeAction::new(
                ProviderBuilder::new().connect_mocked_client(l1.clone()),
                ProviderBuilder::new().connect_mocked_client(l2.clone()),
                Submitter::DryRun,
                Finalize::new(
                    Address::repeat_byte(0x0d),
                    ROLLUP,
                    Address::repeat_byte(0x80),
                    L2_TX,
                    Address::repeat_byte(0x5c),
                ),
            )
        }

        #[tokio::test]
        async fn test_execute_builds_finalize_request() {
            let l1 = Asserter::new();
            let l2 = Asserter::new();

            // receipt, confirmed block, proof
            l2.push_success(&withdrawal_receipt(4));
            l2.push_success(&confirmed_block(10));
            l2.push_success(&Bytes::from(
                (
                    B256::repeat_byte(0x0e),
                    SEND_ROOT,
                    vec![B256::repeat_byte(1), B256::repeat_byte(2)],
                )
                    .abi_encode_params(),
            ));
            // isSpent, latest block, NodeConfirmed logs
            l1.push_success(&Bytes::from(false.abi_encode()));
            l1.push_success(&U64::from(5_000));
            l1.push_success(&vec![node_confirmed_log()]);

            let result = action(&l1, &l2).execute().await.unwrap();
            assert!(result.is_dry_run());
        }

        #[tokio::test]
        async fn test_execute_rejects_spent_withdrawal() {
            let l1 = Asserter::new();
            let l2 = Asserter::new();
            l2.push_success(&withdrawal_receipt(4));
            l1.push_success(&Bytes::from(true.abi_encode()));

            let err = action(&l1, &l2).execute().await.unwrap_err();
            assert!(err.to_string().contains("already finalized"));
        }

        #[tokio::test]
        async fn test_execute_waits_for_confirmation() {
            let l1 = Asserter::new();
            let l2 = Asserter::new();
            l2.push_success(&withdrawal_receipt(12));
            l2.push_success(&confirmed_block(10));
            l1.push_success(&Bytes::from(false.abi_encode()));
            l1.push_success(&U64::from(5_000));
            l1.push_success(&vec![node_confirmed_log()]);

            let err = action(&l1, &l2).execute().await.unwrap_err();
            assert!(err.to_string().contains("try again later"));
        }

        #[tokio::test]
        async fn test_completed_when_spent() {
            let l1 = Asserter::new();
            let l2 = Asserter::new();
            l2.push_success(&withdrawal_receipt(4));
            l1.push_success(&Bytes::from(true.abi_encode()));

            assert!(action(&l1, &l2).is_completed().await.unwrap());
        }
    }

    #[test]
    fn test_default_lookback() {
        let finalize = Finalize::new(
            Address::ZERO,
            Address::ZERO,
            Address::ZERO,
            B256::ZERO,
            Address::ZERO,
        );
        assert_eq!(finalize.lookback, 1200);
    }
}
