//! The `RpcTransport` trait, the capability the state verifier is given to
//! reach the chain.

use async_trait::async_trait;

use crate::error::TransportError;
use crate::request::{JsonRpcRequest, JsonRpcResponse};

/// Sends one JSON-RPC payload and returns the parsed reply.
///
/// A JSON-RPC `error` member is a successful exchange and comes back inside
/// the response; `Err` is reserved for failures to get a reply at all.
/// Implementations make a single attempt per call.
#[async_trait]
pub trait RpcTransport: Send + Sync {
    async fn send(&self, req: JsonRpcRequest) -> Result<JsonRpcResponse, TransportError>;

    /// Endpoint identifier, for logging.
    fn url(&self) -> &str;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::request::{JsonRpcError, RpcId};

    /// Echoes the request id; fails every method but `eth_call`.
    struct EchoNode;

    #[async_trait]
    impl RpcTransport for EchoNode {
        async fn send(&self, req: JsonRpcRequest) -> Result<JsonRpcResponse, TransportError> {
            if req.method == "eth_call" {
                Ok(JsonRpcResponse::success(req.id, req.params[0]["data"].clone()))
            } else {
                Ok(JsonRpcResponse::failure(
                    req.id,
                    JsonRpcError {
                        code: -32601,
                        message: "method not found".into(),
                        data: None,
                    },
                ))
            }
        }

        fn url(&self) -> &str {
            "mock://echo"
        }
    }

    #[tokio::test]
    async fn usable_as_trait_object() {
        let node: &dyn RpcTransport = &EchoNode;
        let resp = node
            .send(JsonRpcRequest::eth_call(42, "0xabc", "0x701da98e"))
            .await
            .unwrap();
        assert_eq!(resp.id, RpcId::Number(42));
        assert_eq!(resp.into_result().unwrap(), "0x701da98e");
        assert_eq!(node.url(), "mock://echo");
    }

    #[tokio::test]
    async fn rpc_error_is_not_a_transport_error() {
        let resp = EchoNode
            .send(JsonRpcRequest::new(1, "eth_chainId", vec![]))
            .await
            .unwrap();
        assert_eq!(resp.into_result().unwrap_err().code, -32601);
    }
}
