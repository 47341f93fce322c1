//! Outbox proof retrieval for L2→L1 messages.
//!
//! An L2→L1 message can only be executed once the rollup node covering it is confirmed
//! on L1. The proof is built against the send count of the latest confirmed node, which
//! is read from the Arbitrum header of the node's L2 block.

use crate::WithdrawalError;
use alloy_primitives::{Address, B256};
use alloy_provider::Provider;
use binding::arbitrum::{INodeInterface, IRollupCore, NODE_INTERFACE_ADDRESS};
use tokio_retry::{strategy::ExponentialBackoff, Retry};
use tracing::{debug, warn};

/// Number of L1 blocks searched backwards for `NodeConfirmed`.
pub const NODE_CONFIRMED_LOOKBACK: u64 = 1200;

/// Merkle proof of one outbox leaf, as returned by `NodeInterface.constructOutboxProof`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutboxProof {
    pub send: B256,
    pub root: B256,
    pub proof: Vec<B256>,
    /// Tree size the proof was built for
    pub size: u64,
    pub leaf: u64,
}

/// A rollup node confirmed on L1.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConfirmedNode {
    pub node_num: u64,
    /// L2 block the node asserts
    pub block_hash: B256,
    pub send_root: B256,
}

impl From<IRollupCore::NodeConfirmed> for ConfirmedNode {
    fn from(event: IRollupCore::NodeConfirmed) -> Self {
        Self {
            node_num: event.nodeNum,
            block_hash: event.blockHash,
            send_root: event.sendRoot,
        }
    }
}

/// Send count of an Arbitrum block, stored in the first 8 bytes of `mixHash`.
pub fn header_send_count(mix_hash: &B256) -> u64 {
    let mut count = [0u8; 8];
    count.copy_from_slice(&mix_hash[..8]);
    u64::from_be_bytes(count)
}

/// Send root of an Arbitrum block, stored as the whole of `extraData`.
pub fn header_send_root(extra_data: &[u8]) -> Option<B256> {
    (extra_data.len() == 32).then(|| B256::from_slice(extra_data))
}

pub struct OutboxProofFetcher<P1, P2> {
    l1_provider: P1,
    l2_provider: P2,
    rollup: Address,
    lookback: u64,
}

impl<P1, P2> OutboxProofFetcher<P1, P2>
where
    P1: Provider + Clone,
    P2: Provider + Clone,
{
    pub const fn new(l1_provider: P1, l2_provider: P2, rollup: Address) -> Self {
        Self {
            l1_provider,
            l2_provider,
            rollup,
            lookback: NODE_CONFIRMED_LOOKBACK,
        }
    }

    /// Search `lookback` L1 blocks for confirmations instead of the default.
    pub const fn with_lookback(mut self, lookback: u64) -> Self {
        self.lookback = lookback;
        self
    }

    /// Most recent `NodeConfirmed` inside the lookback window.
    pub async fn latest_confirmed_node(&self) -> eyre::Result<ConfirmedNode> {
        let latest = self.l1_provider.get_block_number().await?;
        let from_block = latest.saturating_sub(self.lookback);

        // Exponential backoff: 100ms, 200ms, 400ms, 800ms (max 5 attempts)
        let retry_strategy = ExponentialBackoff::from_millis(2).factor(50).take(4);

        let nodes = Retry::spawn(retry_strategy, || async {
            self.query_confirmed_nodes(from_block, latest)
                .await
                .map_err(|e| {
                    warn!(
                        from = from_block,
                        to = latest,
                        error = %e,
                        "NodeConfirmed query failed, will retry"
                    );
                    e
                })
        })
        .await?;

        let node = nodes.last().copied().ok_or(WithdrawalError::NoConfirmedNode {
            lookback: self.lookback,
        })?;

        debug!(
            node_num = node.node_num,
            block_hash = %node.block_hash,
            events = nodes.len(),
            "Found latest confirmed node"
        );
        Ok(node)
    }

    async fn query_confirmed_nodes(
        &self,
        from_block: u64,
        to_block: u64,
    ) -> eyre::Result<Vec<ConfirmedNode>> {
        let rollup = IRollupCore::new(self.rollup, &self.l1_provider);
        let events = rollup
            .NodeConfirmed_filter()
            .from_block(from_block)
            .to_block(to_block)
            .query()
            .await?;

        Ok(events.into_iter().map(|(event, _)| event.into()).collect())
    }

    /// Number of L2→L1 messages covered by the latest confirmed node.
    pub async fn confirmed_send_count(&self) -> eyre::Result<u64> {
        let node = self.latest_confirmed_node().await?;

        let block = self
            .l2_provider
            .get_block_by_hash(node.block_hash)
            .await?
            .ok_or(WithdrawalError::BlockNotFound(node.block_hash))?;

        let send_count = header_send_count(&block.header.mix_hash);

        if header_send_root(&block.header.extra_data) != Some(node.send_root) {
            warn!(
                node_num = node.node_num,
                block_hash = %node.block_hash,
                send_root = %node.send_root,
                extra_data = %block.header.extra_data,
                "Send root in L2 header does not match the confirmed node"
            );
        }

        debug!(
            l2_block = block.header.number,
            send_count, "Read send count from confirmed L2 block"
        );
        Ok(send_count)
    }

    /// Build the outbox proof of `leaf` against the latest confirmed send count.
    pub async fn fetch(&self, leaf: u64) -> eyre::Result<OutboxProof> {
        let send_count = self.confirmed_send_count().await?;
        if leaf >= send_count {
            return Err(WithdrawalError::BatchNotConfirmed { leaf, send_count }.into());
        }

        let node_interface = INodeInterface::new(NODE_INTERFACE_ADDRESS, &self.l2_provider);
        let result = node_interface
            .constructOutboxProof(send_count, leaf)
            .call()
            .await
            .map_err(|e| WithdrawalError::ProofUnavailable {
                leaf,
                reason: e.to_string(),
            })?;

        debug!(
            leaf,
            size = send_count,
            root = %result.root,
            proof_len = result.proof.len(),
            "Constructed outbox proof"
        );

        Ok(OutboxProof {
            send: result.send,
            root: result.root,
            proof: result.proof,
            size: send_count,
            leaf,
        })
    }
}
