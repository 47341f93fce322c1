//! L1→L2 retryable tickets for Arbitrum token deposits.
//!
//! A deposit through the L1 gateway router creates a retryable ticket on L2. The ticket
//! must be funded up front: the L2 gas limit, the max fee per gas and the submission fee
//! are estimated here and paid as `msg.value` of the deposit.

pub mod estimator;
pub mod gateway;

pub use estimator::{
    deposit, encode_send_params, percent_increase, GasOverrides, RetryableData,
    RetryableEstimator, RetryableGasParams,
};
pub use gateway::outbound_retryable_data;
