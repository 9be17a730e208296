use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use alloy_primitives::{Address, Bytes};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::debug;

use crate::error::Error;

/// Read-only contract call against a chain at the latest block
#[async_trait]
pub trait EthCall: Send + Sync {
    /// Execute `eth_call` with ABI-encoded calldata and return the raw result bytes
    async fn call(&self, to: Address, data: Bytes) -> Result<Bytes, Error>;
}

#[async_trait]
impl<T: EthCall + ?Sized> EthCall for Arc<T> {
    async fn call(&self, to: Address, data: Bytes) -> Result<Bytes, Error> {
        (**self).call(to, data).await
    }
}

#[derive(Debug, Serialize)]
struct CallObject {
    to: Address,
    data: Bytes,
}

#[derive(Debug, Deserialize)]
struct RpcResponse {
    result: Option<Bytes>,
    error: Option<RpcErrorBody>,
}

#[derive(Debug, Deserialize)]
struct RpcErrorBody {
    code: i64,
    message: String,
}

/// JSON-RPC over HTTP
pub struct HttpRpc {
    /// HTTP client
    http: reqwest::Client,
    /// JSON-RPC endpoint
    url: String,
    /// Request id counter
    next_id: AtomicU64,
}

impl HttpRpc {
    /// Create a new JSON-RPC client for the given endpoint
    pub fn new(url: impl Into<String>) -> Self {
        Self::with_client(reqwest::Client::new(), url)
    }

    /// Create a JSON-RPC client reusing an existing HTTP client
    pub fn with_client(http: reqwest::Client, url: impl Into<String>) -> Self {
        Self {
            http,
            url: url.into(),
            next_id: AtomicU64::new(1),
        }
    }

    /// Endpoint URL
    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl EthCall for HttpRpc {
    async fn call(&self, to: Address, data: Bytes) -> Result<Bytes, Error> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let call = CallObject { to, data };
        let request = json!({
            "jsonrpc": "2.0",
            "id": id,
            "method": "eth_call",
            "params": [call, "latest"],
        });
        debug!("eth_call #{} to {} via {}", id, to, self.url);

        let response: RpcResponse = self
            .http
            .post(&self.url)
            .json(&request)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        decode_response(response)
    }
}

fn decode_response(response: RpcResponse) -> Result<Bytes, Error> {
    if let Some(error) = response.error {
        return Err(Error::Rpc(format!(
            "eth_call failed ({}): {}",
            error.code, error.message
        )));
    }
    response
        .result
        .ok_or_else(|| Error::Rpc("eth_call response has no result".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_response_result() {
        let response: RpcResponse =
            serde_json::from_str(r#"{"jsonrpc":"2.0","id":1,"result":"0x0102"}"#).unwrap();
        assert_eq!(&decode_response(response).unwrap()[..], &[1u8, 2]);
    }

    #[test]
    fn test_decode_response_error() {
        let response: RpcResponse = serde_json::from_str(
            r#"{"jsonrpc":"2.0","id":1,"error":{"code":-32000,"message":"execution reverted"}}"#,
        )
        .unwrap();
        let err = decode_response(response).unwrap_err();
        assert!(err.to_string().contains("execution reverted"));
    }

    #[test]
    fn test_call_object_serializes_hex() {
        let call = CallObject {
            to: Address::repeat_byte(0x11),
            data: Bytes::from(vec![0xde, 0xad]),
        };
        let value = serde_json::to_value(&call).unwrap();
        assert_eq!(value["data"], "0xdead");
        assert_eq!(
            value["to"].as_str().map(str::to_lowercase).as_deref(),
            Some("0x1111111111111111111111111111111111111111")
        );
    }

    #[test]
    fn test_decode_response_empty_and_garbage() {
        let response: RpcResponse = serde_json::from_str(r#"{"id":1,"result":"0x"}"#).unwrap();
        assert!(decode_response(response).unwrap().is_empty());

        assert!(serde_json::from_str::<RpcResponse>(r#"{"id":1,"result":"0xzz"}"#).is_err());

        let response: RpcResponse = serde_json::from_str(r#"{"id":1}"#).unwrap();
        assert!(matches!(decode_response(response), Err(Error::Rpc(_))));
    }
}
