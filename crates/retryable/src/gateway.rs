//! Retryable inputs of a token deposit through the L1 gateway router.

use crate::RetryableData;
use alloy_primitives::{Address, Bytes, U256};
use alloy_provider::Provider;
use binding::arbitrum::{IL1GatewayRouter, ITokenGateway};
use eyre::bail;
use tracing::debug;

/// Build the ticket a deposit of `amount` of `token` from `from` to `to` will create.
///
/// The ticket is sent by the token's L1 gateway to its L2 counterpart. Both refund
/// addresses are the recipient.
pub async fn outbound_retryable_data<P>(
    l1_provider: &P,
    router: Address,
    token: Address,
    from: Address,
    to: Address,
    amount: U256,
) -> eyre::Result<RetryableData>
where
    P: Provider,
{
    let router = IL1GatewayRouter::new(router, l1_provider);

    let gateway = router.getGateway(token).call().await?;
    if gateway.is_zero() {
        bail!("No L1 gateway registered for token {}", token);
    }

    let counterpart = ITokenGateway::new(gateway, l1_provider)
        .counterpartGateway()
        .call()
        .await?;

    let data = router
        .getOutboundCalldata(token, from, to, amount, Bytes::new())
        .call()
        .await?;

    debug!(
        token = %token,
        gateway = %gateway,
        counterpart = %counterpart,
        calldata_len = data.len(),
        "Resolved deposit gateway"
    );

    Ok(RetryableData {
        from: gateway,
        to: counterpart,
        l2_call_value: U256::ZERO,
        excess_fee_refund_address: to,
        call_value_refund_address: to,
        data,
    })
}
