use alloy_primitives::{B256, U256};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum WithdrawalError {
    /// The L2 transaction has no receipt (unknown or still pending)
    #[error("Receipt not found for L2 transaction {0}")]
    ReceiptNotFound(B256),

    /// The L2 transaction reverted, so it initiated nothing
    #[error("L2 transaction {0} reverted")]
    Reverted(B256),

    /// The receipt lacks one of the three withdrawal logs
    #[error(
        "missing logs, L2ToL1Tx found: {l2_to_l1_tx}, WithdrawalInitiated found: {withdrawal_initiated}, TxToL1 found: {tx_to_l1}"
    )]
    MissingLogs {
        l2_to_l1_tx: bool,
        withdrawal_initiated: bool,
        tx_to_l1: bool,
    },

    /// A log matched an event signature but its body did not decode
    #[error("Failed to decode {event} log: {source}")]
    Decode {
        event: &'static str,
        #[source]
        source: alloy_sol_types::Error,
    },

    /// The outbox position does not fit the 64-bit leaf index of the proof call
    #[error("Outbox position {0} does not fit in 64 bits")]
    InvalidPosition(U256),

    /// No rollup node was confirmed inside the lookback window
    #[error("No NodeConfirmed event in the last {lookback} L1 blocks")]
    NoConfirmedNode { lookback: u64 },

    /// The L2 block referenced by the confirmed node is unknown to the L2 endpoint
    #[error("L2 block {0} not found")]
    BlockNotFound(B256),

    /// The batch holding the message has not been confirmed on L1 yet
    #[error(
        "Batch containing outbox message {leaf} is not confirmed on L1 yet ({send_count} sends confirmed), wait and try again later"
    )]
    BatchNotConfirmed { leaf: u64, send_count: u64 },

    /// NodeInterface refused to build the proof
    #[error(
        "Outbox proof unavailable for message {leaf}: {reason}. The batch may not be confirmed yet, try again later"
    )]
    ProofUnavailable { leaf: u64, reason: String },
}
