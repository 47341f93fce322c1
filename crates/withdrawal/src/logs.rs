//! Withdrawal log scanner.
//!
//! A token withdrawal through the Arbitrum gateways emits three logs in one L2
//! transaction: `WithdrawalInitiated` and `TxToL1` from the L2 gateway, and `L2ToL1Tx`
//! from ArbSys. Finalization needs all three.

use crate::WithdrawalError;
use alloy_primitives::{Log, B256};
use alloy_provider::Provider;
use alloy_sol_types::SolEvent;
use binding::arbitrum::{IArbSys, IL2ArbitrumGateway, ARB_SYS_ADDRESS};
use tracing::debug;

/// The decoded withdrawal logs of one L2 transaction.
#[derive(Debug, Clone)]
pub struct WithdrawalLogs {
    pub l2_to_l1_tx: IArbSys::L2ToL1Tx,
    pub withdrawal_initiated: IL2ArbitrumGateway::WithdrawalInitiated,
    pub tx_to_l1: IL2ArbitrumGateway::TxToL1,
}

impl WithdrawalLogs {
    /// Leaf index of the message in the outbox tree.
    pub fn leaf(&self) -> Result<u64, WithdrawalError> {
        let position = self.l2_to_l1_tx.position;
        position
            .try_into()
            .map_err(|_| WithdrawalError::InvalidPosition(position))
    }
}

/// Pick the withdrawal logs out of a receipt's logs.
///
/// Logs are matched by their first topic. `L2ToL1Tx` is only accepted from ArbSys. When an
/// event appears more than once the last occurrence wins.
pub fn scan_withdrawal_logs<'a>(
    logs: impl IntoIterator<Item = &'a Log>,
) -> Result<WithdrawalLogs, WithdrawalError> {
    let mut l2_to_l1_tx = None;
    let mut withdrawal_initiated = None;
    let mut tx_to_l1 = None;

    for log in logs {
        let Some(topic) = log.data.topics().first() else {
            continue;
        };

        if *topic == IArbSys::L2ToL1Tx::SIGNATURE_HASH && log.address == ARB_SYS_ADDRESS {
            l2_to_l1_tx = Some(decode::<IArbSys::L2ToL1Tx>(log, "L2ToL1Tx")?);
        } else if *topic == IL2ArbitrumGateway::WithdrawalInitiated::SIGNATURE_HASH {
            withdrawal_initiated = Some(decode::<IL2ArbitrumGateway::WithdrawalInitiated>(
                log,
                "WithdrawalInitiated",
            )?);
        } else if *topic == IL2ArbitrumGateway::TxToL1::SIGNATURE_HASH {
            tx_to_l1 = Some(decode::<IL2ArbitrumGateway::TxToL1>(log, "TxToL1")?);
        }
    }

    match (l2_to_l1_tx, withdrawal_initiated, tx_to_l1) {
        (Some(l2_to_l1_tx), Some(withdrawal_initiated), Some(tx_to_l1)) => Ok(WithdrawalLogs {
            l2_to_l1_tx,
            withdrawal_initiated,
            tx_to_l1,
        }),
        (l2_to_l1_tx, withdrawal_initiated, tx_to_l1) => Err(WithdrawalError::MissingLogs {
            l2_to_l1_tx: l2_to_l1_tx.is_some(),
            withdrawal_initiated: withdrawal_initiated.is_some(),
            tx_to_l1: tx_to_l1.is_some(),
        }),
    }
}

fn decode<E: SolEvent>(log: &Log, event: &'static str) -> Result<E, WithdrawalError> {
    E::decode_log_data(&log.data).map_err(|source| WithdrawalError::Decode { event, source })
}

/// Fetch the receipt of an L2 withdrawal transaction and scan its logs.
pub async fn fetch_withdrawal_logs<P>(
    l2_provider: &P,
    l2_tx_hash: B256,
) -> eyre::Result<WithdrawalLogs>
where
    P: Provider,
{
    let receipt = l2_provider
        .get_transaction_receipt(l2_tx_hash)
        .await?
        .ok_or(WithdrawalError::ReceiptNotFound(l2_tx_hash))?;

    if !receipt.status() {
        return Err(WithdrawalError::Reverted(l2_tx_hash).into());
    }

    debug!(
        tx_hash = %l2_tx_hash,
        block_number = receipt.block_number,
        log_count = receipt.logs().len(),
        "Scanning withdrawal receipt"
    );

    let logs = scan_withdrawal_logs(receipt.logs().iter().map(|log| &log.inner))?;
    Ok(logs)
}
