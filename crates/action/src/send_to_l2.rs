//! Send tokens from L1 to L2.
//!
//! Deposits through `ArbitrumL1BridgeAdapter.sendERC20`, which forwards the tokens to the
//! Arbitrum gateway router. The router creates a retryable ticket on L2 that must be
//! paid for up front, so the ticket is estimated first and its deposit sent as value.

use crate::{
    approve::{Approve, ApproveAction},
    Action, Submitter,
};
use alloy_primitives::{Address, U256};
use alloy_provider::Provider;
use binding::{adapter::IArbitrumL1BridgeAdapter, token::IERC20};
use retryable::{
    encode_send_params, outbound_retryable_data, GasOverrides, RetryableEstimator,
    RetryableGasParams,
};
use tracing::info;

/// Input data for an L1→L2 token transfer.
#[derive(Debug, Clone)]
pub struct SendToL2 {
    /// ArbitrumL1BridgeAdapter address
    pub adapter: Address,
    /// L1GatewayRouter address
    pub gateway_router: Address,
    /// Delayed inbox address
    pub inbox: Address,
    pub l1_token: Address,
    pub l2_token: Address,
    /// Token holder on L1, sender of both transactions
    pub owner: Address,
    /// Receiver on L2
    pub recipient: Address,
    pub amount: U256,
    pub gas_overrides: GasOverrides,
}

pub struct SendToL2Action<P1, P2> {
    l1_provider: P1,
    l2_provider: P2,
    submitter: Submitter,
    action: SendToL2,
}

impl<P1, P2> SendToL2Action<P1, P2>
where
    P1: Provider + Clone,
    P2: Provider + Clone,
{
    pub const fn new(
        l1_provider: P1,
        l2_provider: P2,
        submitter: Submitter,
        action: SendToL2,
    ) -> Self {
        Self {
            l1_provider,
            l2_provider,
            submitter,
            action,
        }
    }

    fn validate(&self) -> eyre::Result<()> {
        if self.action.adapter == Address::ZERO {
            eyre::bail!("L1 bridge adapter must not be zero");
        }

        if self.action.l1_token == Address::ZERO {
            eyre::bail!("L1 token must not be zero");
        }

        if self.action.l2_token == Address::ZERO {
            eyre::bail!("L2 token must not be zero");
        }

        if self.action.recipient == Address::ZERO {
            eyre::bail!("Recipient must not be zero");
        }

        if self.action.amount == U256::ZERO {
            eyre::bail!("Amount must not be zero");
        }

        Ok(())
    }

    fn approve_action(&self) -> ApproveAction<P1> {
        ApproveAction::new(
            self.l1_provider.clone(),
            self.submitter.clone(),
            Approve {
                token: self.action.l1_token,
                owner: self.action.owner,
                spender: self.action.adapter,
                amount: self.action.amount,
            },
        )
    }

    /// Estimate the retryable ticket the deposit will create.
    pub async fn estimate(&self) -> eyre::Result<RetryableGasParams> {
        // The adapter is the router's caller, so it is the `from` of the outbound calldata.
        let data = outbound_retryable_data(
            &self.l1_provider,
            self.action.gateway_router,
            self.action.l1_token,
            self.action.adapter,
            self.action.recipient,
            self.action.amount,
        )
        .await?;

        let estimator = RetryableEstimator::new(
            self.l1_provider.clone(),
            self.l2_provider.clone(),
            self.action.inbox,
        );
        estimator.estimate_all(&data, &self.action.gas_overrides).await
    }
}

impl<P1, P2> Action for SendToL2Action<P1, P2>
where
    P1: Provider + Clone,
    P2: Provider + Clone,
{
    async fn is_ready(&self) -> eyre::Result<bool> {
        if self.validate().is_err() {
            return Ok(false);
        }

        let token = IERC20::new(self.action.l1_token, &self.l1_provider);
        let balance = token.balanceOf(self.action.owner).call().await?;
        Ok(balance >= self.action.amount)
    }

    async fn is_completed(&self) -> eyre::Result<bool> {
        // Deposits are not idempotent. Every execution sends a new one.
        Ok(false)
    }

    async fn execute(&mut self) -> eyre::Result<crate::Result> {
        self.validate()?;

        let mut approve = self.approve_action();
        if approve.is_completed().await? {
            info!(spender = %self.action.adapter, "Allowance already sufficient");
        } else {
            approve.execute().await?;
        }

        let params = self.estimate().await?;
        info!(
            gas_limit = %params.gas_limit,
            max_fee_per_gas = %params.max_fee_per_gas,
            max_submission_cost = %params.max_submission_cost,
            deposit = %params.deposit,
            "Estimated retryable ticket"
        );

        let adapter = IArbitrumL1BridgeAdapter::new(self.action.adapter, &self.l1_provider);
        let tx_request = adapter
            .sendERC20(
                self.action.l1_token,
                self.action.l2_token,
                self.action.recipient,
                self.action.amount,
                encode_send_params(&params),
            )
            .value(params.deposit)
            .into_transaction_request()
            .from(self.action.owner);

        let result = self.submitter.submit(&self.l1_provider, tx_request).await?;

        info!(
            tx_hash = ?result.tx_hash,
            block_number = result.block_number,
            amount = %self.action.amount,
            recipient = %self.action.recipient,
            "Sent tokens to L2"
        );

        Ok(result)
    }

    fn description(&self) -> String {
        format!(
            "Send {} of L1 token {} to {} on L2",
            self.action.amount, self.action.l1_token, self.action.recipient
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{mock_signer, MockProvider};

    fn send() -> SendToL2 {
        SendToL2 {
            adapter: Address::repeat_byte(1),
            gateway_router: Address::repeat_byte(2),
            inbox: Address::repeat_byte(3),
            l1_token: Address::repeat_byte(4),
            l2_token: Address::repeat_byte(5),
            owner: Address::repeat_byte(6),
            recipient: Address::repeat_byte(7),
            amount: U256::from(1_000_000),
            gas_overrides: GasOverrides::default(),
        }
    }

    fn action(input: SendToL2) -> SendToL2Action<MockProvider, MockProvider> {
        SendToL2Action::new(
            MockProvider,
            MockProvider,
            Submitter::Sign(mock_signer()),
            input,
        )
    }

    #[test]
    fn test_validate() {
        assert!(action(send()).validate().is_ok());
    }

    #[test]
    fn test_validate_zero_adapter() {
        let mut input = send();
        input.adapter = Address::ZERO;

        let result = action(input).validate();
        assert!(result.unwrap_err().to_string().contains("adapter"));
    }

    #[test]
    fn test_validate_zero_recipient() {
        let mut input = send();
        input.recipient = Address::ZERO;

        let result = action(input).validate();
        assert!(result.unwrap_err().to_string().contains("Recipient"));
    }

    #[test]
    fn test_validate_zero_amount() {
        let mut input = send();
        input.amount = U256::ZERO;

        let result = action(input).validate();
        assert!(result.unwrap_err().to_string().contains("Amount"));
    }

    #[tokio::test]
    async fn test_is_ready_rejects_invalid_input() {
        let mut input = send();
        input.l1_token = Address::ZERO;

        assert!(!action(input).is_ready().await.unwrap());
    }

    #[tokio::test]
    async fn test_never_completed() {
        assert!(!action(send()).is_completed().await.unwrap());
    }

    #[test]
    fn test_approves_adapter_for_amount() {
        let approve = action(send()).approve_action();
        let desc = approve.description();

        assert!(desc.contains("Approve 1000000"));
        assert!(desc.contains("0x0101010101010101010101010101010101010101")); // adapter
    }

    #[test]
    fn test_description() {
        let desc = action(send()).description();
        assert!(desc.contains("Send 1000000"));
        assert!(desc.contains("0x0707070707070707070707070707070707070707")); // recipient
    }
}
