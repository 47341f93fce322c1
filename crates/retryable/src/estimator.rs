//! Gas and fee estimation for L1→L2 retryable tickets.

use alloy_primitives::{Address, Bytes, U256};
use alloy_provider::Provider;
use alloy_rpc_types_eth::BlockNumberOrTag;
use alloy_sol_types::SolValue;
use binding::{
    adapter::SendERC20Params,
    arbitrum::{IInbox, INodeInterface, NODE_INTERFACE_ADDRESS},
};
use eyre::eyre;
use tracing::debug;

/// Default increase applied to the L2 gas price.
pub const DEFAULT_GAS_PRICE_PERCENT_INCREASE: u64 = 200;

/// Default increase applied to the submission fee.
pub const DEFAULT_SUBMISSION_FEE_PERCENT_INCREASE: u64 = 300;

/// Added to the call value when simulating the ticket so the simulated deposit covers it.
pub const ESTIMATE_DEPOSIT_PADDING: U256 = U256::from_limbs([1_000_000_000_000_000_000, 0, 0, 0]);

/// Inputs of a retryable ticket.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryableData {
    /// Sender of the ticket on L1 (the L1 gateway for token deposits)
    pub from: Address,
    /// Target of the L2 call
    pub to: Address,
    pub l2_call_value: U256,
    pub excess_fee_refund_address: Address,
    pub call_value_refund_address: Address,
    pub data: Bytes,
}

/// Estimated ticket parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryableGasParams {
    pub gas_limit: U256,
    pub max_fee_per_gas: U256,
    pub max_submission_cost: U256,
    /// ETH to send with the L1 transaction
    pub deposit: U256,
}

/// Padding applied to the raw estimates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GasOverrides {
    pub gas_limit_percent_increase: u64,
    /// Floor for the padded gas limit
    pub min_gas_limit: U256,
    pub max_fee_per_gas_percent_increase: u64,
    pub max_submission_fee_percent_increase: u64,
}

impl Default for GasOverrides {
    fn default() -> Self {
        Self {
            gas_limit_percent_increase: 0,
            min_gas_limit: U256::ZERO,
            max_fee_per_gas_percent_increase: DEFAULT_GAS_PRICE_PERCENT_INCREASE,
            max_submission_fee_percent_increase: DEFAULT_SUBMISSION_FEE_PERCENT_INCREASE,
        }
    }
}

/// `value * (100 + percent) / 100`
pub fn percent_increase(value: U256, percent: u64) -> U256 {
    value.saturating_mul(U256::from(100u64.saturating_add(percent))) / U256::from(100)
}

/// ETH a ticket needs: gas for the L2 call, the submission fee and the call value.
pub fn deposit(
    gas_limit: U256,
    max_fee_per_gas: U256,
    max_submission_cost: U256,
    l2_call_value: U256,
) -> U256 {
    gas_limit
        .saturating_mul(max_fee_per_gas)
        .saturating_add(max_submission_cost)
        .saturating_add(l2_call_value)
}

/// `abi.encode(SendERC20Params)`, the bridge payload of `ArbitrumL1BridgeAdapter.sendERC20`.
pub fn encode_send_params(params: &RetryableGasParams) -> Bytes {
    SendERC20Params {
        maxSubmissionCost: params.max_submission_cost,
        maxGas: params.gas_limit,
        gasPriceBid: params.max_fee_per_gas,
    }
    .abi_encode()
    .into()
}

pub struct RetryableEstimator<P1, P2> {
    l1_provider: P1,
    l2_provider: P2,
    inbox: Address,
}

impl<P1, P2> RetryableEstimator<P1, P2>
where
    P1: Provider + Clone,
    P2: Provider + Clone,
{
    pub const fn new(l1_provider: P1, l2_provider: P2, inbox: Address) -> Self {
        Self {
            l1_provider,
            l2_provider,
            inbox,
        }
    }

    /// Base fee of the latest L1 block.
    pub async fn l1_base_fee(&self) -> eyre::Result<U256> {
        let block = self
            .l1_provider
            .get_block_by_number(BlockNumberOrTag::Latest)
            .await?
            .ok_or_else(|| eyre!("Latest L1 block not found"))?;

        let base_fee = block
            .header
            .base_fee_per_gas
            .ok_or_else(|| eyre!("L1 block {} has no base fee", block.header.number))?;

        Ok(U256::from(base_fee))
    }

    /// Padded L2 gas price.
    pub async fn estimate_max_fee_per_gas(&self, percent_increase_by: u64) -> eyre::Result<U256> {
        let gas_price = self.l2_provider.get_gas_price().await?;
        Ok(percent_increase(U256::from(gas_price), percent_increase_by))
    }

    /// Padded submission fee for `data_len` bytes of L2 calldata at `l1_base_fee`.
    pub async fn estimate_submission_fee(
        &self,
        data_len: usize,
        l1_base_fee: U256,
        percent_increase_by: u64,
    ) -> eyre::Result<U256> {
        let inbox = IInbox::new(self.inbox, &self.l1_provider);
        let fee = inbox
            .calculateRetryableSubmissionFee(U256::from(data_len), l1_base_fee)
            .call()
            .await?;

        Ok(percent_increase(fee, percent_increase_by))
    }

    /// Gas limit of the L2 call, simulated through `NodeInterface.estimateRetryableTicket`.
    pub async fn estimate_gas_limit(
        &self,
        data: &RetryableData,
        overrides: &GasOverrides,
    ) -> eyre::Result<U256> {
        let node_interface = INodeInterface::new(NODE_INTERFACE_ADDRESS, &self.l2_provider);
        let estimate = node_interface
            .estimateRetryableTicket(
                data.from,
                data.l2_call_value.saturating_add(ESTIMATE_DEPOSIT_PADDING),
                data.to,
                data.l2_call_value,
                data.excess_fee_refund_address,
                data.call_value_refund_address,
                data.data.clone(),
            )
            .estimate_gas()
            .await?;

        let gas_limit = percent_increase(U256::from(estimate), overrides.gas_limit_percent_increase);
        Ok(gas_limit.max(overrides.min_gas_limit))
    }

    /// Estimate every ticket parameter and the deposit covering them.
    pub async fn estimate_all(
        &self,
        data: &RetryableData,
        overrides: &GasOverrides,
    ) -> eyre::Result<RetryableGasParams> {
        let max_fee_per_gas = self
            .estimate_max_fee_per_gas(overrides.max_fee_per_gas_percent_increase)
            .await?;

        let l1_base_fee = self.l1_base_fee().await?;
        let max_submission_cost = self
            .estimate_submission_fee(
                data.data.len(),
                l1_base_fee,
                overrides.max_submission_fee_percent_increase,
            )
            .await?;

        let gas_limit = self.estimate_gas_limit(data, overrides).await?;

        let deposit = deposit(
            gas_limit,
            max_fee_per_gas,
            max_submission_cost,
            data.l2_call_value,
        );

        debug!(
            gas_limit = %gas_limit,
            max_fee_per_gas = %max_fee_per_gas,
            max_submission_cost = %max_submission_cost,
            deposit = %deposit,
            "Estimated retryable ticket"
        );

        Ok(RetryableGasParams {
            gas_limit,
            max_fee_per_gas,
            max_submission_cost,
            deposit,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::{U128, U64};
    use alloy_provider::ProviderBuilder;
    use alloy_rpc_types_eth::{Block, Header};
    use alloy_transport::mock::Asserter;

    fn data() -> RetryableData {
        RetryableData {
            from: Address::repeat_byte(1),
            to: Address::repeat_byte(2),
            l2_call_value: U256::from(5),
            excess_fee_refund_address: Address::repeat_byte(3),
            call_value_refund_address: Address::repeat_byte(3),
            data: Bytes::from(vec![0u8; 100]),
        }
    }

    fn block_with_base_fee(base_fee: Option<u64>) -> Block {
        Block {
            header: Header {
                inner: alloy_consensus::Header {
                    number: 100,
                    base_fee_per_gas: base_fee,
                    ..Default::default()
                },
                ..Default::default()
            },
            ..Default::default()
        }
    }

    #[test]
    fn test_percent_increase() {
        assert_eq!(percent_increase(U256::from(100), 0), U256::from(100));
        assert_eq!(percent_increase(U256::from(100), 200), U256::from(300));
        assert_eq!(percent_increase(U256::from(7), 300), U256::from(28));
        // Rounds down
        assert_eq!(percent_increase(U256::from(3), 50), U256::from(4));
    }

    #[test]
    fn test_deposit() {
        let total = deposit(
            U256::from(100_000),
            U256::from(30),
            U256::from(4_000),
            U256::from(5),
        );
        assert_eq!(total, U256::from(3_004_005));
    }

    #[test]
    fn test_default_overrides() {
        let overrides = GasOverrides::default();
        assert_eq!(overrides.max_fee_per_gas_percent_increase, 200);
        assert_eq!(overrides.max_submission_fee_percent_increase, 300);
        assert_eq!(overrides.gas_limit_percent_increase, 0);
        assert_eq!(overrides.min_gas_limit, U256::ZERO);
    }

    #[test]
    fn test_estimate_padding_is_one_ether() {
        assert_eq!(
            ESTIMATE_DEPOSIT_PADDING,
            U256::from(10).pow(U256::from(18))
        );
    }

    #[test]
    fn test_encode_send_params() {
        let params = RetryableGasParams {
            gas_limit: U256::from(2),
            max_fee_per_gas: U256::from(3),
            max_submission_cost: U256::from(1),
            deposit: U256::from(99),
        };

        let encoded = encode_send_params(&params);

        assert_eq!(encoded.len(), 96);
        assert_eq!(U256::from_be_slice(&encoded[..32]), U256::from(1));
        assert_eq!(U256::from_be_slice(&encoded[32..64]), U256::from(2));
        assert_eq!(U256::from_be_slice(&encoded[64..]), U256::from(3));
    }

    #[tokio::test]
    async fn test_estimate_all() {
        let l1 = Asserter::new();
        let l2 = Asserter::new();
        let estimator = RetryableEstimator::new(
            ProviderBuilder::new().connect_mocked_client(l1.clone()),
            ProviderBuilder::new().connect_mocked_client(l2.clone()),
            Address::repeat_byte(0x10),
        );

        // eth_gasPrice on L2
        l2.push_success(&U128::from(10));
        // latest L1 block, then calculateRetryableSubmissionFee
        l1.push_success(&block_with_base_fee(Some(7)));
        l1.push_success(&Bytes::from(U256::from(1_000).abi_encode()));
        // eth_estimateGas of estimateRetryableTicket on L2
        l2.push_success(&U64::from(50_000));

        let params = estimator
            .estimate_all(&data(), &GasOverrides::default())
            .await
            .unwrap();

        assert_eq!(params.max_fee_per_gas, U256::from(30));
        assert_eq!(params.max_submission_cost, U256::from(4_000));
        assert_eq!(params.gas_limit, U256::from(50_000));
        assert_eq!(params.deposit, U256::from(50_000 * 30 + 4_000 + 5));
    }

    #[tokio::test]
    async fn test_gas_limit_floor_and_padding() {
        let l2 = Asserter::new();
        let estimator = RetryableEstimator::new(
            ProviderBuilder::new().connect_mocked_client(Asserter::new()),
            ProviderBuilder::new().connect_mocked_client(l2.clone()),
            Address::ZERO,
        );

        let padded = GasOverrides {
            gas_limit_percent_increase: 10,
            ..Default::default()
        };
        l2.push_success(&U64::from(1_000));
        let gas_limit = estimator.estimate_gas_limit(&data(), &padded).await.unwrap();
        assert_eq!(gas_limit, U256::from(1_100));

        let floored = GasOverrides {
            min_gas_limit: U256::from(300_000),
            ..Default::default()
        };
        l2.push_success(&U64::from(1_000));
        let gas_limit = estimator.estimate_gas_limit(&data(), &floored).await.unwrap();
        assert_eq!(gas_limit, U256::from(300_000));
    }

    #[tokio::test]
    async fn test_missing_base_fee() {
        let l1 = Asserter::new();
        let estimator = RetryableEstimator::new(
            ProviderBuilder::new().connect_mocked_client(l1.clone()),
            ProviderBuilder::new().connect_mocked_client(Asserter::new()),
            Address::ZERO,
        );

        l1.push_success(&block_with_base_fee(None));
        let err = estimator.l1_base_fee().await.unwrap_err();
        assert!(err.to_string().contains("no base fee"));
    }
}
