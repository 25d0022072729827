//! Node client configuration and JSON-RPC envelope types.

use serde::{Deserialize, Serialize};

/// Configuration for a [`NodeClient`](crate::NodeClient).
///
/// Replaces environment-variable globals with an explicit value passed
/// into the client.
#[derive(Debug, Clone)]
pub struct NodeConfig {
    /// Base URL of the node's RPC endpoint (e.g. `http://127.0.0.1:8332`).
    pub url: String,
    /// RPC username for HTTP basic auth.
    pub username: String,
    /// RPC password for HTTP basic auth.
    pub password: String,
    /// Request timeout in seconds for each RPC call.
    pub timeout_secs: u64,
}

impl Default for NodeConfig {
    fn default() -> Self {
        NodeConfig {
            url: "http://127.0.0.1:8332".to_string(),
            username: String::new(),
            password: String::new(),
            timeout_secs: 30,
        }
    }
}

/// A JSON-RPC 1.0 request envelope as bitcoind expects it.
#[derive(Debug, Serialize)]
pub struct RpcRequest<'a> {
    /// Protocol version tag.
    pub jsonrpc: &'static str,
    /// Request identifier echoed back by the node.
    pub id: &'static str,
    /// The RPC method name.
    pub method: &'a str,
    /// Positional parameters.
    pub params: serde_json::Value,
}

impl<'a> RpcRequest<'a> {
    /// Build a request for the given method and positional params.
    pub fn new(method: &'a str, params: serde_json::Value) -> Self {
        RpcRequest {
            jsonrpc: "1.0",
            id: "txkit",
            method,
            params,
        }
    }
}

/// The error member of a JSON-RPC response.
#[derive(Debug, Clone, Deserialize)]
pub struct RpcErrorObject {
    /// Node-assigned error code (e.g. -5 for "not found").
    pub code: i64,
    /// Human-readable error message.
    pub message: String,
}

/// A JSON-RPC response envelope.
#[derive(Debug, Deserialize)]
pub struct RpcResponse<T> {
    /// The result payload, present on success.
    pub result: Option<T>,
    /// The error object, present on failure.
    pub error: Option<RpcErrorObject>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_serialization() {
        let req = RpcRequest::new("getrawtransaction", serde_json::json!(["abcd", false]));
        let json = serde_json::to_value(&req).unwrap();
        assert_eq!(json["jsonrpc"], "1.0");
        assert_eq!(json["method"], "getrawtransaction");
        assert_eq!(json["params"][0], "abcd");
        assert_eq!(json["params"][1], false);
    }

    #[test]
    fn test_response_deserialization_success() {
        let resp: RpcResponse<String> =
            serde_json::from_str(r#"{"result":"deadbeef","error":null,"id":"txkit"}"#).unwrap();
        assert_eq!(resp.result.as_deref(), Some("deadbeef"));
        assert!(resp.error.is_none());
    }

    #[test]
    fn test_response_deserialization_error() {
        let resp: RpcResponse<String> = serde_json::from_str(
            r#"{"result":null,"error":{"code":-5,"message":"No such mempool or blockchain transaction"},"id":"txkit"}"#,
        )
        .unwrap();
        assert!(resp.result.is_none());
        let err = resp.error.unwrap();
        assert_eq!(err.code, -5);
        assert!(err.message.contains("No such"));
    }

    #[test]
    fn test_config_defaults() {
        let config = NodeConfig::default();
        assert_eq!(config.url, "http://127.0.0.1:8332");
        assert_eq!(config.timeout_secs, 30);
    }
}
