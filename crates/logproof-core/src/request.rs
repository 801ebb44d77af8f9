//! JSON-RPC 2.0 messages exchanged with the chain node.
//!
//! The pipeline only ever sends one `eth_call`; the types stay general
//! enough to carry any method so transports can be tested in isolation.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

const VERSION: &str = "2.0";

/// Request id echoed back by the node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RpcId {
    Number(u64),
    String(String),
    Null,
}

/// An outgoing call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonRpcRequest {
    pub jsonrpc: String,
    pub id: RpcId,
    pub method: String,
    #[serde(default)]
    pub params: Vec<Value>,
}

impl JsonRpcRequest {
    pub fn new(id: u64, method: impl Into<String>, params: Vec<Value>) -> Self {
        Self {
            jsonrpc: VERSION.to_string(),
            id: RpcId::Number(id),
            method: method.into(),
            params,
        }
    }

    /// Read-only call of `data` on `to` against the `latest` block.
    pub fn eth_call(id: u64, to: &str, data: &str) -> Self {
        Self::new(id, "eth_call", vec![json!({ "to": to, "data": data }), json!("latest")])
    }
}

/// Error member of a failed response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JsonRpcError {
    pub code: i64,
    pub message: String,
    /// Revert payload for `eth_call` failures; nodes differ in where they put it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

impl JsonRpcError {
    /// Hex revert data, whether given as `data: "0x.."` or `data: { data: "0x.." }`.
    pub fn revert_data(&self) -> Option<&str> {
        match self.data.as_ref()? {
            Value::String(s) => Some(s.as_str()),
            Value::Object(map) => map.get("data").and_then(Value::as_str),
            _ => None,
        }
    }
}

impl std::fmt::Display for JsonRpcError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} (code {})", self.message, self.code)
    }
}

/// A node reply: exactly one of `result` / `error` is expected.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonRpcResponse {
    #[serde(default)]
    pub jsonrpc: String,
    pub id: RpcId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<JsonRpcError>,
}

impl JsonRpcResponse {
    pub fn success(id: RpcId, result: Value) -> Self {
        Self {
            jsonrpc: VERSION.to_string(),
            id,
            result: Some(result),
            error: None,
        }
    }

    pub fn failure(id: RpcId, error: JsonRpcError) -> Self {
        Self {
            jsonrpc: VERSION.to_string(),
            id,
            result: None,
            error: Some(error),
        }
    }

    /// `error` wins when present; a missing `result` reads as `null`.
    pub fn into_result(self) -> Result<Value, JsonRpcError> {
        match self.error {
            Some(err) => Err(err),
            None => Ok(self.result.unwrap_or(Value::Null)),
        }
    }
}
