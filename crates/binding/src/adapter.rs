//! Liquidity-manager bridge adapter bindings.
//!
//! The L1 adapter wraps the Arbitrum L1 gateway router (deposits) and the outbox
//! (withdrawal finalization). The L2 adapter wraps the L2 gateway router.

use alloy_sol_types::sol;

sol! {
    /// ArbitrumL1BridgeAdapter - L1 side of the token bridge
    #[sol(rpc)]
    interface IArbitrumL1BridgeAdapter {
        /// Deposit `amount` of `localToken` to `recipient` on L2.
        ///
        /// `bridgeSpecificPayload` is an abi-encoded `SendERC20Params` and `msg.value` must
        /// cover the retryable ticket.
        function sendERC20(
            address localToken,
            address remoteToken,
            address recipient,
            uint256 amount,
            bytes calldata bridgeSpecificPayload
        ) external payable returns (bytes memory);

        /// Execute an L2→L1 withdrawal through the outbox.
        ///
        /// `arbitrumFinalizationPayload` is an abi-encoded `ArbitrumFinalizationPayload`.
        function finalizeWithdrawERC20(
            address remoteSender,
            address localReceiver,
            bytes calldata arbitrumFinalizationPayload
        ) external returns (bool);
    }

    /// ArbitrumL2BridgeAdapter - L2 side of the token bridge
    #[sol(rpc)]
    interface IArbitrumL2BridgeAdapter {
        /// Withdraw `amount` of `localToken` to `recipient` on L1
        function sendERC20(
            address localToken,
            address remoteToken,
            address recipient,
            uint256 amount,
            bytes calldata bridgeSpecificPayload
        ) external payable returns (bytes memory);
    }

    /// Retryable ticket parameters passed to the L1 adapter
    #[derive(Debug, PartialEq, Eq)]
    struct SendERC20Params {
        uint256 maxSubmissionCost;
        uint256 maxGas;
        uint256 gasPriceBid;
    }

    /// Outbox execution arguments passed to the L1 adapter
    #[derive(Debug, PartialEq, Eq)]
    struct ArbitrumFinalizationPayload {
        bytes32[] proof;
        uint256 index;
        address l2Sender;
        address to;
        uint256 l2Block;
        uint256 l1Block;
        uint256 l2Timestamp;
        uint256 value;
        bytes data;
    }
}
