//! JSON-RPC transport to the FTR node
//!
//! The [`Transport`] trait is the seam between the wallet and the network.
//! Raw results are decoded per method into [`RpcReply`] here, so callers
//! never inspect untyped JSON.

mod client;
#[cfg(test)]
pub(crate) mod mock;
mod reply;

use crate::config::TransportConfig;
use async_trait::async_trait;
use serde_json::Value;

pub use client::JsonRpcClient;
pub use reply::{HistoryPage, RpcCall, RpcMethod, RpcReply, SendReceipt, TransactionRecord};

/// Failure of a single RPC round trip
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("request to {url} failed: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("node returned error {code}: {message}")]
    Rpc { code: i64, message: String },

    #[error("malformed {method} response: {body}")]
    Malformed { method: String, body: String },
}

/// Performs RPC calls against the endpoint described by a [`TransportConfig`]
#[async_trait]
pub trait Transport: Send + Sync {
    /// Invoke `method` with positional `params`, returning the raw result
    async fn call(
        &self,
        config: &TransportConfig,
        method: &str,
        params: Vec<Value>,
    ) -> Result<Value, TransportError>;

    /// Invoke a known wallet call and decode its result
    async fn request(
        &self,
        config: &TransportConfig,
        call: RpcCall,
    ) -> Result<RpcReply, TransportError> {
        let (method, params) = call.into_parts();
        let result = self.call(config, method.name(), params).await?;
        RpcReply::decode(method, result)
    }
}
