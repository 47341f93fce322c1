use crate::{
    approve::{Approve, ApproveAction},
    Action, Submitter,
};
use alloy_primitives::{Address, Bytes, B256, U256};
use alloy_provider::Provider;
use binding::{adapter::IArbitrumL2BridgeAdapter, token::IERC20};
use tracing::{info, warn};
use withdrawal::logs::{fetch_withdrawal_logs, scan_withdrawal_logs};

/// Withdraw input data.
#[derive(Debug, Clone)]
pub struct Withdraw {
    /// ArbitrumL2BridgeAdapter address
    pub adapter: Address,
    pub l2_token: Address,
    pub l1_token: Address,
    /// Token holder on L2, sender of the withdrawal
    pub owner: Address,
    /// Receiver on L1
    pub recipient: Address,
    pub amount: U256,
    /// Optional: only exists on initiated withdrawal
    /// transaction hash from execution
    pub tx_hash: Option<B256>,
}

pub struct WithdrawAction<P> {
    provider: P,
    submitter: Submitter,
    action: Withdraw,
}

impl<P: Provider + Clone> WithdrawAction<P> {
    pub const fn new(provider: P, submitter: Submitter, action: Withdraw) -> Self {
        Self {
            provider,
            submitter,
            action,
        }
    }

    /// Hash of the withdrawal transaction, once known.
    pub const fn tx_hash(&self) -> Option<B256> {
        self.action.tx_hash
    }

    /// Log the outbox position of a sent withdrawal.
    ///
    /// The withdrawal is already onchain at this point, so a failed read only warns and
    /// returns false.
    async fn report_position(&self, tx_hash: B256) -> bool {
        match fetch_withdrawal_logs(&self.provider, tx_hash).await {
            Ok(logs) => {
                info!(
                    tx_hash = %tx_hash,
                    position = %logs.l2_to_l1_tx.position,
                    amount = %logs.withdrawal_initiated._amount,
                    "Withdrawal position in outbox"
                );
                true
            }
            Err(e) => {
                warn!(
                    tx_hash = %tx_hash,
                    error = %e,
                    "Withdrawal sent but its logs could not be read, check it with arb-withdrawal-status"
                );
                false
            }
        }
    }

    fn validate(&self) -> eyre::Result<()> {
        if self.action.adapter == Address::ZERO {
            eyre::bail!("L2 bridge adapter must not be zero");
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
}

impl<P> Action for WithdrawAction<P>
where
    P: Provider + Clone,
{
    async fn is_ready(&self) -> eyre::Result<bool> {
        if self.validate().is_err() {
            return Ok(false);
        }

        let token = IERC20::new(self.action.l2_token, &self.provider);
        let balance = token.balanceOf(self.action.owner).call().await?;
        Ok(balance >= self.action.amount)
    }

    async fn is_completed(&self) -> eyre::Result<bool> {
        let Some(tx_hash) = self.action.tx_hash else {
            return Ok(false);
        };

        // Transaction must exist and be mined
        let Some(receipt) = self.provider.get_transaction_receipt(tx_hash).await? else {
            return Ok(false);
        };

        if !receipt.status() {
            return Ok(false);
        }

        // A withdrawal is only finalizable with all three logs present
        let logs = scan_withdrawal_logs(receipt.logs().iter().map(|log| &log.inner));
        Ok(logs.is_ok())
    }

    async fn execute(&mut self) -> eyre::Result<crate::Result> {
        if self.is_completed().await? {
            eyre::bail!("Withdrawal already initiated")
        }

        self.validate()?;

        let mut approve = ApproveAction::new(
            self.provider.clone(),
            self.submitter.clone(),
            Approve {
                token: self.action.l2_token,
                owner: self.action.owner,
                spender: self.action.adapter,
                amount: self.action.amount,
            },
        );
        if !approve.is_completed().await? {
            approve.execute().await?;
        }

        let adapter = IArbitrumL2BridgeAdapter::new(self.action.adapter, &self.provider);
        let tx_request = adapter
            .sendERC20(
                self.action.l2_token,
                self.action.l1_token,
                self.action.recipient,
                self.action.amount,
                Bytes::new(),
            )
            .into_transaction_request()
            .from(self.action.owner);

        let result = self.submitter.submit(&self.provider, tx_request).await?;

        let Some(tx_hash) = result.tx_hash else {
            return Ok(result);
        };
        self.action.tx_hash = Some(tx_hash);

        info!(
            tx_hash = %tx_hash,
            block_number = result.block_number,
            gas_used = ?result.gas_used,
            "Withdrawal initiated."
        );
        self.report_position(tx_hash).await;

        Ok(result)
    }

    fn description(&self) -> String {
        format!(
            "Withdraw {} of L2 token {} to {} on L1",
            self.action.amount, self.action.l2_token, self.action.recipient
        )
    }
}
