//! Finalization payload for `ArbitrumL1BridgeAdapter.finalizeWithdrawERC20`.

use crate::{logs::WithdrawalLogs, proof::OutboxProof};
use alloy_primitives::Bytes;
use alloy_sol_types::SolValue;
use binding::adapter::ArbitrumFinalizationPayload;

/// Pack the outbox execution arguments of a withdrawal.
///
/// Every field except the proof comes from the `L2ToL1Tx` log.
pub fn finalization_payload(
    logs: &WithdrawalLogs,
    proof: &OutboxProof,
) -> ArbitrumFinalizationPayload {
    let message = &logs.l2_to_l1_tx;
    ArbitrumFinalizationPayload {
        proof: proof.proof.clone(),
        index: message.position,
        l2Sender: message.caller,
        to: message.destination,
        l2Block: message.arbBlockNum,
        l1Block: message.ethBlockNum,
        l2Timestamp: message.timestamp,
        value: message.callvalue,
        data: message.data.clone(),
    }
}

/// `abi.encode(payload)`, the bytes the L1 adapter decodes.
pub fn encode_finalization_payload(payload: &ArbitrumFinalizationPayload) -> Bytes {
    payload.abi_encode().into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logs::{scan_withdrawal_logs, tests::withdrawal_receipt_logs};
    use alloy_primitives::{B256, U256};

    fn proof(leaf: u64) -> OutboxProof {
        OutboxProof {
            send: B256::repeat_byte(0x51),
            root: B256::repeat_byte(0x52),
            proof: vec![B256::repeat_byte(0x01), B256::repeat_byte(0x02)],
            size: leaf + 10,
            leaf,
        }
    }

    #[test]
    fn test_payload_from_logs() {
        let logs = scan_withdrawal_logs(&withdrawal_receipt_logs(U256::from(7))).unwrap();

        let payload = finalization_payload(&logs, &proof(7));

        let message = &logs.l2_to_l1_tx;
        assert_eq!(payload.proof, proof(7).proof);
        assert_eq!(payload.index, U256::from(7));
        assert_eq!(payload.l2Sender, message.caller);
        assert_eq!(payload.to, message.destination);
        assert_eq!(payload.l2Block, message.arbBlockNum);
        assert_eq!(payload.l1Block, message.ethBlockNum);
        assert_eq!(payload.l2Timestamp, message.timestamp);
        assert_eq!(payload.value, message.callvalue);
        assert_eq!(payload.data, message.data);
    }

    #[test]
    fn test_encoded_payload_is_a_single_tuple() {
        let logs = scan_withdrawal_logs(&withdrawal_receipt_logs(U256::from(3))).unwrap();
        let payload = finalization_payload(&logs, &proof(3));

        let encoded = encode_finalization_payload(&payload);

        // Dynamic tuple: the head is the offset of the tuple body.
        assert_eq!(U256::from_be_slice(&encoded[..32]), U256::from(32));
        assert_eq!(
            ArbitrumFinalizationPayload::abi_decode(&encoded).unwrap(),
            payload
        );
    }

    #[test]
    fn test_payload_with_empty_proof() {
        let logs = scan_withdrawal_logs(&withdrawal_receipt_logs(U256::ZERO)).unwrap();
        let empty = OutboxProof {
            proof: vec![],
            ..proof(0)
        };

        let payload = finalization_payload(&logs, &empty);
        assert!(payload.proof.is_empty());
        assert_eq!(payload.index, U256::ZERO);
    }
}
