//! JSON-RPC 2.0 over HTTP with basic auth

use super::{Transport, TransportError};
use crate::config::TransportConfig;
use crate::{Error, Result};
use async_trait::async_trait;
use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

/// JSON-RPC 2.0 request
#[derive(Debug, Serialize)]
struct JsonRpcRequest<'a> {
    jsonrpc: &'static str,
    id: String,
    method: &'a str,
    params: Vec<Value>,
}

/// JSON-RPC 2.0 response
#[derive(Debug, Deserialize)]
struct JsonRpcResponse {
    #[serde(default)]
    result: Value,
    #[serde(default)]
    error: Option<JsonRpcError>,
}

#[derive(Debug, Deserialize)]
struct JsonRpcError {
    code: i64,
    message: String,
}

/// HTTP transport; endpoint, credentials and timeout come from the
/// [`TransportConfig`] passed to each call
#[derive(Debug, Clone)]
pub struct JsonRpcClient {
    http: reqwest::Client,
}

impl JsonRpcClient {
    pub fn new() -> Result<Self> {
        let http = reqwest::Client::builder()
            .user_agent(concat!("ftr-wallet/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| Error::Config(format!("Failed to create HTTP client: {}", e)))?;
        Ok(Self { http })
    }
}

#[async_trait]
impl Transport for JsonRpcClient {
    async fn call(
        &self,
        config: &TransportConfig,
        method: &str,
        params: Vec<Value>,
    ) -> std::result::Result<Value, TransportError> {
        let request = JsonRpcRequest {
            jsonrpc: "2.0",
            id: Uuid::new_v4().to_string(),
            method,
            params,
        };

        tracing::debug!(method, url = config.url(), id = %request.id, "Sending RPC request");

        let request_failed = |source: reqwest::Error| TransportError::Request {
            url: config.url().to_string(),
            source,
        };

        let response = self
            .http
            .post(config.url())
            .basic_auth(config.user(), Some(config.password().expose_secret()))
            .timeout(config.timeout())
            .json(&request)
            .send()
            .await
            .map_err(request_failed)?;

        let status = response.status().as_u16();
        let body = response.text().await.map_err(request_failed)?;

        decode_response(method, status, &body)
    }
}

/// Turn an HTTP status and body into the call's result
fn decode_response(
    method: &str,
    status: u16,
    body: &str,
) -> std::result::Result<Value, TransportError> {
    if !(200..300).contains(&status) {
        tracing::warn!(method, status, "RPC call rejected");
        return Err(TransportError::Status {
            status,
            body: body.to_string(),
        });
    }

    let response: JsonRpcResponse =
        serde_json::from_str(body).map_err(|_| TransportError::Malformed {
            method: method.to_string(),
            body: body.to_string(),
        })?;

    if let Some(error) = response.error {
        return Err(TransportError::Rpc {
            code: error.code,
            message: error.message,
        });
    }

    Ok(response.result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn request_envelope_shape() {
        let request = JsonRpcRequest {
            jsonrpc: "2.0",
            id: "1".to_string(),
            method: "getbalance",
            params: vec![json!("abc")],
        };
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(
            value,
            json!({"jsonrpc": "2.0", "id": "1", "method": "getbalance", "params": ["abc"]})
        );
    }

    #[test]
    fn returns_result_on_success() {
        let body = r#"{"jsonrpc":"2.0","id":"1","result":42.5}"#;
        assert_eq!(decode_response("getbalance", 200, body).unwrap(), json!(42.5));

        let body = r#"{"result":null,"error":null,"id":"1"}"#;
        assert_eq!(decode_response("sendtoaddress", 200, body).unwrap(), Value::Null);
    }

    #[test]
    fn non_success_status_carries_body() {
        let err = decode_response("getbalance", 401, "Unauthorized").unwrap_err();
        match err {
            TransportError::Status { status, body } => {
                assert_eq!(status, 401);
                assert_eq!(body, "Unauthorized");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn rpc_error_member_is_surfaced() {
        let body = r#"{"result":null,"error":{"code":-6,"message":"Insufficient funds"},"id":"1"}"#;
        let err = decode_response("sendtoaddress", 200, body).unwrap_err();
        assert!(matches!(err, TransportError::Rpc { code: -6, .. }));
        assert!(err.to_string().contains("Insufficient funds"));
    }

    #[test]
    fn unparsable_body_is_malformed() {
        let err = decode_response("getbalance", 200, "<html>").unwrap_err();
        match err {
            TransportError::Malformed { method, body } => {
                assert_eq!(method, "getbalance");
                assert_eq!(body, "<html>");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn unreachable_node_is_request_error() {
        let client = JsonRpcClient::new().unwrap();
        let config = TransportConfig::new("http://127.0.0.1:9", "u", "p")
            .unwrap()
            .with_timeout(std::time::Duration::from_secs(2));

        let err = client
            .call(&config, "getbalance", vec![json!("abc")])
            .await
            .unwrap_err();
        assert!(matches!(err, TransportError::Request { .. }));
    }
}
