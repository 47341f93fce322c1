//! Contract bindings for all external contracts.
//!
//! This crate consolidates the Solidity interfaces used across the project:
//! - Arbitrum protocol contracts (ArbSys, NodeInterface, RollupCore, Outbox, Inbox, gateways)
//! - Liquidity-manager bridge adapters on L1 and L2
//! - ERC20 tokens
//!
//! Only the functions and events the tooling touches are declared. All bindings are
//! generated using alloy's `sol!` macro.

pub mod adapter;
pub mod arbitrum;
pub mod token;
