mod remote_signer;

use alloy_consensus::TxEnvelope;
use alloy_network::{eip2718::Encodable2718, EthereumWallet, TransactionBuilder};
use alloy_primitives::{Address, Bytes};
use alloy_provider::{DynProvider, Provider, ProviderBuilder};
use alloy_rpc_types::TransactionRequest;
use alloy_signer_local::PrivateKeySigner;
pub use remote_signer::RemoteSigner;
use std::{future::Future, pin::Pin, sync::Arc};
use thiserror::Error;

/// A function that signs a transaction request and returns signed bytes.
///
/// Implementations fill the missing transaction fields first, so callers only need to
/// provide `to`, `from`, `value` and `input`.
pub type SignerFn = Arc<
    dyn Fn(TransactionRequest) -> Pin<Box<dyn Future<Output = eyre::Result<Bytes>> + Send>>
        + Send
        + Sync,
>;

#[derive(Error, Debug)]
pub enum ClientError {
    /// Error parsing or validating URLs
    #[error("Invalid RPC URL: {0}")]
    InvalidUrl(String),

    /// Error connecting to the RPC endpoint
    #[error("Connection error: {0}")]
    Connection(String),

    /// The endpoint serves a different chain than the one requested
    #[error("RPC endpoint serves chain {actual}, expected {expected}")]
    ChainMismatch { expected: u64, actual: u64 },

    /// Error with private key
    #[error("Invalid private key: {0}")]
    InvalidPrivateKey(String),

    /// The remote signer rejected or failed the request
    #[error("Remote signer error: {0}")]
    Signer(String),
}

/// Convenience function to create an ethereum rpc provider from url.
///
/// The provider is type-erased so it does not borrow from `rpc_url`.
pub async fn create_provider(rpc_url: &str) -> Result<DynProvider, ClientError> {
    let url = rpc_url
        .parse()
        .map_err(|e| ClientError::InvalidUrl(format!("{}", e)))?;
    let provider = ProviderBuilder::new().connect_http(url).erased();

    Ok(provider)
}

/// Create a provider and check that it serves `expected_chain_id`.
///
/// `RPC_<chainID>` variables are easy to mix up between L1 and L2, and a transaction
/// signed for the wrong chain id would only fail at broadcast.
pub async fn connect(rpc_url: &str, expected_chain_id: u64) -> Result<DynProvider, ClientError> {
    let provider = create_provider(rpc_url).await?;
    let actual = provider
        .get_chain_id()
        .await
        .map_err(|e| ClientError::Connection(format!("{}", e)))?;

    if actual != expected_chain_id {
        return Err(ClientError::ChainMismatch {
            expected: expected_chain_id,
            actual,
        });
    }

    Ok(provider)
}

/// Address controlled by a hex-encoded private key.
pub fn signer_address(private_key: &str) -> Result<Address, ClientError> {
    let signer: PrivateKeySigner = private_key
        .parse()
        .map_err(|e| ClientError::InvalidPrivateKey(format!("{}", e)))?;
    Ok(signer.address())
}

/// Create a SignerFn from a RemoteSigner and provider.
///
/// The provider is used to fill transaction fields (nonce, gas, fees) before
/// sending to the remote signer for signing.
pub fn remote_signer_fn<P>(remote: RemoteSigner, provider: P) -> SignerFn
where
    P: Provider + Clone + 'static,
{
    let from_address = remote.address();
    let chain_id = remote.chain_id();

    Arc::new(move |tx| {
        let remote = remote.clone();
        let provider = provider.clone();
        Box::pin(async move {
            let filled_tx = fill_transaction(tx, &provider, from_address, chain_id).await?;
            Ok(remote.sign_transaction(filled_tx).await?)
        })
    })
}

/// Create a SignerFn from a local private key and provider.
///
/// The provider is used to fill transaction fields (nonce, gas, fees) before
/// signing locally with the private key.
pub fn local_signer_fn<P>(
    private_key: &str,
    chain_id: u64,
    provider: P,
) -> Result<SignerFn, ClientError>
where
    P: Provider + Clone + 'static,
{
    let signer: PrivateKeySigner = private_key
        .parse()
        .map_err(|e| ClientError::InvalidPrivateKey(format!("{}", e)))?;
    let from_address = signer.address();
    let wallet = EthereumWallet::from(signer);

    Ok(Arc::new(move |tx: TransactionRequest| {
        let wallet = wallet.clone();
        let provider = provider.clone();
        Box::pin(async move {
            let filled_tx = fill_transaction(tx, &provider, from_address, chain_id).await?;

            let tx_envelope: TxEnvelope = filled_tx
                .build(&wallet)
                .await
                .map_err(|e| eyre::eyre!("{}", e))?;

            let mut encoded = Vec::new();
            tx_envelope.encode_2718(&mut encoded);
            Ok(Bytes::from(encoded))
        })
    }))
}

/// Fill missing transaction fields using the provider.
pub async fn fill_transaction<P>(
    mut tx: TransactionRequest,
    provider: &P,
    from: Address,
    chain_id: u64,
) -> eyre::Result<TransactionRequest>
where
    P: Provider,
{
    if tx.from.is_none() {
        tx.from = Some(from);
    }

    if tx.chain_id.is_none() {
        tx.chain_id = Some(chain_id);
    }

    if tx.nonce.is_none() {
        let nonce = provider.get_transaction_count(from).await?;
        tx.nonce = Some(nonce);
    }

    // Fees before gas: some nodes need fee fields to estimate payable calls.
    if tx.max_fee_per_gas.is_none() || tx.max_priority_fee_per_gas.is_none() {
        let fee_estimate = provider.estimate_eip1559_fees().await?;
        if tx.max_fee_per_gas.is_none() {
            tx.max_fee_per_gas = Some(fee_estimate.max_fee_per_gas);
        }
        if tx.max_priority_fee_per_gas.is_none() {
            tx.max_priority_fee_per_gas = Some(fee_estimate.max_priority_fee_per_gas);
        }
    }

    if tx.gas.is_none() {
        let gas_estimate = provider.estimate_gas(tx.clone()).await?;
        // 20% buffer
        tx.gas = Some(gas_estimate + gas_estimate / 5);
    }

    Ok(tx)
}

#[cfg(test)]
mod tests {
    use super::*;

    // Anvil's first default account.
    const TEST_KEY: &str = "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";

    #[tokio::test]
    async fn test_invalid_url() {
        let result = create_provider("not a url").await;
        assert!(matches!(result, Err(ClientError::InvalidUrl(_))));
    }

    #[test]
    fn test_signer_address() {
        let address = signer_address(TEST_KEY).unwrap();
        assert_eq!(
            address,
            alloy_primitives::address!("f39Fd6e51aad88F6F4ce6aB8827279cffFb92266")
        );
    }

    #[test]
    fn test_signer_address_invalid_key() {
        let result = signer_address("0x1234");
        assert!(matches!(result, Err(ClientError::InvalidPrivateKey(_))));
    }

    #[tokio::test]
    async fn test_local_signer_fn_rejects_bad_key() {
        let provider = create_provider("http://localhost:8545").await.unwrap();
        let result = local_signer_fn("not a key", 1, provider);
        assert!(matches!(result, Err(ClientError::InvalidPrivateKey(_))));
    }
}
