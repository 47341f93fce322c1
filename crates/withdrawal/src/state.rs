use crate::{logs::WithdrawalLogs, proof::OutboxProofFetcher, types::WithdrawalStatus};
use alloy_primitives::{Address, U256};
use alloy_provider::Provider;
use binding::arbitrum::IOutbox;
use tracing::debug;

/// Outbox view of L2→L1 messages.
pub struct OutboxState<P1, P2> {
    fetcher: OutboxProofFetcher<P1, P2>,
    l1_provider: P1,
    outbox: Address,
}

impl<P1, P2> OutboxState<P1, P2>
where
    P1: Provider + Clone,
    P2: Provider + Clone,
{
    pub fn new(l1_provider: P1, l2_provider: P2, rollup: Address, outbox: Address) -> Self {
        Self {
            fetcher: OutboxProofFetcher::new(l1_provider.clone(), l2_provider, rollup),
            l1_provider,
            outbox,
        }
    }

    /// Search `lookback` L1 blocks for confirmations instead of the default.
    pub fn with_lookback(mut self, lookback: u64) -> Self {
        self.fetcher = self.fetcher.with_lookback(lookback);
        self
    }

    pub const fn fetcher(&self) -> &OutboxProofFetcher<P1, P2> {
        &self.fetcher
    }

    /// Whether the outbox leaf at `index` has been executed.
    pub async fn is_spent(&self, index: u64) -> eyre::Result<bool> {
        let outbox = IOutbox::new(self.outbox, &self.l1_provider);
        let spent = outbox.isSpent(U256::from(index)).call().await?;
        Ok(spent)
    }

    /// Where the message at outbox leaf `leaf` stands.
    pub async fn status(&self, leaf: u64) -> eyre::Result<WithdrawalStatus> {
        if self.is_spent(leaf).await? {
            return Ok(WithdrawalStatus::Executed);
        }

        let send_count = self.fetcher.confirmed_send_count().await?;
        debug!(leaf, send_count, "Checked outbox leaf against confirmed sends");

        Ok(status_from_send_count(leaf, send_count))
    }

    /// Status of the message carried by a withdrawal's logs.
    pub async fn withdrawal_status(&self, logs: &WithdrawalLogs) -> eyre::Result<WithdrawalStatus> {
        self.status(logs.leaf()?).await
    }
}

/// Status of an unspent leaf given the confirmed send count.
pub const fn status_from_send_count(leaf: u64, send_count: u64) -> WithdrawalStatus {
    if leaf < send_count {
        WithdrawalStatus::Confirmed { send_count }
    } else {
        WithdrawalStatus::Unconfirmed { send_count }
    }
}
