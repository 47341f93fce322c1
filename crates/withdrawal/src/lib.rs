//! Arbitrum L2→L1 withdrawal finalization.
//!
//! A withdrawal is finalized on L1 from three pieces of data:
//! - the withdrawal logs of the L2 transaction ([`logs`])
//! - an outbox merkle proof built against the latest confirmed rollup node ([`proof`])
//! - the finalization payload packed from both ([`payload`])
//!
//! [`state`] answers where a withdrawal currently stands.

pub mod error;
pub mod logs;
pub mod payload;
pub mod proof;
pub mod state;
pub mod types;

pub use error::WithdrawalError;
