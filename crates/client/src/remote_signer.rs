//! Transaction signer that delegates to a remote signing service.
//!
//! Sends `eth_signTransaction` JSON-RPC requests to a proxy that holds the owner key
//! (typically backed by an HSM or KMS), so the key never has to be exported as
//! `OWNER_KEY`.

use crate::ClientError;
use alloy_primitives::{Address, Bytes};
use alloy_rpc_types::eth::TransactionRequest;
use serde::{Deserialize, Serialize};

/// A signer that delegates transaction signing to a remote service.
///
/// ```ignore
/// let signer = RemoteSigner::new("http://localhost:9060", owner, 42161);
/// let raw = signer.sign_transaction(tx_request).await?;
/// provider.send_raw_transaction(&raw).await?;
/// ```
#[derive(Debug, Clone)]
pub struct RemoteSigner {
    client: reqwest::Client,
    url: String,
    address: Address,
    chain_id: u64,
}

impl RemoteSigner {
    /// Creates a remote signer for `address` on `chain_id`.
    pub fn new(url: impl Into<String>, address: Address, chain_id: u64) -> Self {
        Self {
            client: reqwest::Client::new(),
            url: url.into(),
            address,
            chain_id,
        }
    }

    /// Returns the signer's address.
    pub const fn address(&self) -> Address {
        self.address
    }

    /// Returns the chain ID.
    pub const fn chain_id(&self) -> u64 {
        self.chain_id
    }

    /// Signs a filled transaction and returns the raw EIP-2718 bytes.
    pub async fn sign_transaction(&self, tx: TransactionRequest) -> Result<Bytes, ClientError> {
        let request = JsonRpcRequest {
            jsonrpc: "2.0",
            method: "eth_signTransaction",
            params: [tx],
            id: 1,
        };

        let response = self
            .client
            .post(&self.url)
            .json(&request)
            .send()
            .await
            .map_err(|e| ClientError::Connection(format!("{}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ClientError::Signer(format!("HTTP {status}: {body}")));
        }

        let rpc_response: JsonRpcResponse = response
            .json()
            .await
            .map_err(|e| ClientError::Signer(format!("malformed response: {}", e)))?;

        rpc_response.into_raw()
    }
}

#[derive(Debug, Serialize)]
struct JsonRpcRequest<T> {
    jsonrpc: &'static str,
    method: &'static str,
    params: T,
    id: u32,
}

#[derive(Debug, Deserialize)]
struct JsonRpcResponse {
    result: Option<SignedTransaction>,
    error: Option<JsonRpcError>,
}

impl JsonRpcResponse {
    fn into_raw(self) -> Result<Bytes, ClientError> {
        match (self.result, self.error) {
            (_, Some(error)) => Err(ClientError::Signer(format!(
                "JSON-RPC error {}: {}",
                error.code, error.message
            ))),
            (Some(SignedTransaction::Raw(raw)), None)
            | (Some(SignedTransaction::Envelope { raw }), None) => Ok(raw),
            (None, None) => Err(ClientError::Signer("empty response".to_string())),
        }
    }
}

#[derive(Debug, Deserialize)]
struct JsonRpcError {
    code: i64,
    message: String,
}

/// Signers disagree on the result shape: geth-style nodes return `{ raw, tx }`, most
/// proxies return the raw hex string.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum SignedTransaction {
    Raw(Bytes),
    Envelope { raw: Bytes },
}
