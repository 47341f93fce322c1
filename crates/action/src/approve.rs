use crate::{Action, Submitter};
use alloy_primitives::{Address, U256};
use alloy_provider::Provider;
use binding::token::IERC20;
use tracing::info;

/// Approve input data.
#[derive(Debug, Clone)]
pub struct Approve {
    pub token: Address,
    /// Token holder, sender of the approve transaction
    pub owner: Address,
    pub spender: Address,
    pub amount: U256,
}

/// ERC20 approval of a bridge adapter.
pub struct ApproveAction<P> {
    provider: P,
    submitter: Submitter,
    action: Approve,
}

impl<P> ApproveAction<P>
where
    P: Provider + Clone,
{
    pub const fn new(provider: P, submitter: Submitter, action: Approve) -> Self {
        Self {
            provider,
            submitter,
            action,
        }
    }

    fn validate(&self) -> eyre::Result<()> {
        if self.action.token == Address::ZERO {
            eyre::bail!("Token must not be zero");
        }

        if self.action.spender == Address::ZERO {
            eyre::bail!("Spender must not be zero");
        }

        if self.action.amount == U256::ZERO {
            eyre::bail!("Approve amount must not be zero");
        }

        Ok(())
    }

    /// Current allowance of the spender.
    pub async fn allowance(&self) -> eyre::Result<U256> {
        let token = IERC20::new(self.action.token, &self.provider);
        let allowance = token
            .allowance(self.action.owner, self.action.spender)
            .call()
            .await?;
        Ok(allowance)
    }
}

impl<P> Action for ApproveAction<P>
where
    P: Provider + Clone,
{
    async fn is_ready(&self) -> eyre::Result<bool> {
        Ok(self.allowance().await? < self.action.amount)
    }

    async fn is_completed(&self) -> eyre::Result<bool> {
        Ok(self.allowance().await? >= self.action.amount)
    }

    async fn execute(&mut self) -> eyre::Result<crate::Result> {
        self.validate()?;

        let token = IERC20::new(self.action.token, &self.provider);
        let tx_request = token
            .approve(self.action.spender, self.action.amount)
            .into_transaction_request()
            .from(self.action.owner);

        let result = self.submitter.submit(&self.provider, tx_request).await?;

        info!(
            tx_hash = ?result.tx_hash,
            token = %self.action.token,
            spender = %self.action.spender,
            amount = %self.action.amount,
            "Approved token"
        );

        Ok(result)
    }

    fn description(&self) -> String {
        format!(
            "Approve {} of token {} to {}",
            self.action.amount, self.action.token, self.action.spender
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{mock_signer, MockProvider};

    fn approve() -> Approve {
        Approve {
            token: Address::repeat_byte(1),
            owner: Address::repeat_byte(2),
            spender: Address::repeat_byte(3),
            amount: U256::from(1_000),
        }
    }

    #[test]
    fn test_validate() {
        let action = ApproveAction::new(MockProvider, Submitter::Sign(mock_signer()), approve());
        assert!(action.validate().is_ok());
    }

    #[test]
    fn test_validate_zero_spender() {
        let mut input = approve();
        input.spender = Address::ZERO;

        let action = ApproveAction::new(MockProvider, Submitter::DryRun, input);
        let result = action.validate();
        assert!(result.unwrap_err().to_string().contains("Spender"));
    }

    #[test]
    fn test_validate_zero_amount() {
        let mut input = approve();
        input.amount = U256::ZERO;

        let action = ApproveAction::new(MockProvider, Submitter::DryRun, input);
        assert!(action.validate().is_err());
    }

    #[test]
    fn test_description() {
        let action = ApproveAction::new(MockProvider, Submitter::DryRun, approve());
        let desc = action.description();

        assert!(desc.contains("Approve 1000"));
        assert!(desc.contains("0x0101010101010101010101010101010101010101")); // token
        assert!(desc.contains("0x0303030303030303030303030303030303030303")); // spender
    }
}
