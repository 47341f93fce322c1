//! Arbitrum protocol contract bindings.
//!
//! Includes contracts for L1→L2 retryable tickets and L2→L1 withdrawals:
//! - ArbSys (L2 precompile, emits `L2ToL1Tx`)
//! - NodeInterface (L2 virtual contract for proofs and retryable gas estimation)
//! - RollupCore, Outbox, Inbox (L1 contracts)
//! - Token gateway routers and gateways on both layers

use alloy_primitives::{address, Address};
use alloy_sol_types::sol;

/// ArbSys precompile address on every Arbitrum chain.
pub const ARB_SYS_ADDRESS: Address = address!("0000000000000000000000000000000000000064");

/// NodeInterface address on every Arbitrum chain.
///
/// This contract is not deployed. The node answers calls to this address virtually, so it
/// only works through `eth_call` and `eth_estimateGas`.
pub const NODE_INTERFACE_ADDRESS: Address = address!("00000000000000000000000000000000000000C8");

sol! {
    /// ArbSys - L2 precompile at 0x64
    #[derive(Debug)]
    #[sol(rpc)]
    interface IArbSys {
        /// Emitted for every L2→L1 message. `position` is the leaf index in the outbox tree.
        event L2ToL1Tx(
            address caller,
            address indexed destination,
            uint256 indexed hash,
            uint256 indexed position,
            uint256 arbBlockNum,
            uint256 ethBlockNum,
            uint256 timestamp,
            uint256 callvalue,
            bytes data
        );
    }

    /// NodeInterface - virtual L2 contract at 0xC8
    #[sol(rpc)]
    interface INodeInterface {
        /// Build the merkle proof for outbox leaf `leaf` in a tree of `size` sends
        function constructOutboxProof(uint64 size, uint64 leaf)
            external view returns (bytes32 send, bytes32 root, bytes32[] memory proof);

        /// Simulate a retryable ticket. Only meaningful through eth_estimateGas.
        function estimateRetryableTicket(
            address sender,
            uint256 deposit,
            address to,
            uint256 l2CallValue,
            address excessFeeRefundAddress,
            address callValueRefundAddress,
            bytes calldata data
        ) external;
    }

    /// RollupCore - L1 rollup contract holding confirmed assertions
    #[derive(Debug)]
    #[sol(rpc)]
    interface IRollupCore {
        /// Emitted when a rollup node is confirmed on L1
        event NodeConfirmed(
            uint64 indexed nodeNum,
            bytes32 blockHash,
            bytes32 sendRoot
        );
    }

    /// Outbox - L1 contract executing L2→L1 messages
    #[sol(rpc)]
    interface IOutbox {
        /// Whether the outbox leaf at `index` has already been executed
        function isSpent(uint256 index) external view returns (bool);
    }

    /// Delayed inbox - L1 entry point for retryable tickets
    #[sol(rpc)]
    interface IInbox {
        /// Submission fee for a retryable with `dataLength` bytes of calldata
        function calculateRetryableSubmissionFee(uint256 dataLength, uint256 baseFee)
            external view returns (uint256);
    }

    /// L1GatewayRouter - routes token deposits to the token's gateway
    #[sol(rpc)]
    interface IL1GatewayRouter {
        /// Gateway registered for an L1 token
        function getGateway(address _token) external view returns (address gateway);

        /// Calldata the gateway will deliver to its L2 counterpart
        function getOutboundCalldata(
            address _token,
            address _from,
            address _to,
            uint256 _amount,
            bytes memory _data
        ) external view returns (bytes memory);
    }

    /// Token gateway on either layer
    #[sol(rpc)]
    interface ITokenGateway {
        /// Address of the gateway on the other layer
        function counterpartGateway() external view returns (address);
    }

    /// L2ArbitrumGateway - L2 side of a token gateway
    #[derive(Debug)]
    #[sol(rpc)]
    interface IL2ArbitrumGateway {
        /// Emitted when a token withdrawal to L1 is initiated
        event WithdrawalInitiated(
            address l1Token,
            address indexed _from,
            address indexed _to,
            uint256 indexed _l2ToL1Id,
            uint256 _exitNum,
            uint256 _amount
        );

        /// Emitted with the outbound message sent to L1
        event TxToL1(
            address indexed _from,
            address indexed _to,
            uint256 indexed _id,
            bytes _data
        );
    }
}
