//! State verifier: reads the contract's committed hash and compares.

use serde_json::Value;

use logproof_core::{
    JsonRpcError, JsonRpcRequest, ParseError, RpcError, RpcTransport, TransportError,
};
use logproof_evm::revert::revert_reason;
use logproof_evm::selector;

/// Reads a zero-argument `bytes32` view function through an injected transport.
pub struct StateVerifier<'a> {
    transport: &'a dyn RpcTransport,
    accessor: String,
    calldata: String,
}

impl<'a> StateVerifier<'a> {
    /// `accessor` is a zero-argument function signature such as `stateHash()`.
    pub fn new(transport: &'a dyn RpcTransport, accessor: &str) -> Result<Self, ParseError> {
        let accessor = accessor.trim();
        if !is_zero_arg_signature(accessor) {
            return Err(ParseError::InvalidAccessor(accessor.to_string()));
        }
        Ok(Self {
            transport,
            accessor: accessor.to_string(),
            calldata: format!("0x{}", hex::encode(selector(accessor))),
        })
    }

    /// `0x` + the four selector bytes.
    pub fn calldata(&self) -> &str {
        &self.calldata
    }

    /// `eth_call` the accessor on `target` at `latest`.
    pub async fn read_state_hash(&self, target: &str) -> Result<[u8; 32], RpcError> {
        let req = JsonRpcRequest::eth_call(1, target, &self.calldata);
        tracing::debug!(
            url = %self.transport.url(),
            contract = %target,
            accessor = %self.accessor,
            "reading on-chain state hash"
        );
        let resp = self.transport.send(req).await?;
        let result = resp.into_result().map_err(rpc_failure)?;
        parse_word(&result)
    }

    /// Whether the on-chain value equals `hash`, byte for byte.
    pub async fn verify(&self, target: &str, hash: &[u8; 32]) -> Result<bool, RpcError> {
        let onchain = self.read_state_hash(target).await?;
        let matched = &onchain == hash;
        tracing::debug!(
            onchain = %format!("0x{}", hex::encode(onchain)),
            computed = %format!("0x{}", hex::encode(hash)),
            matched,
            "state hash compared"
        );
        Ok(matched)
    }
}

/// `name()` with a non-empty identifier and no arguments.
fn is_zero_arg_signature(s: &str) -> bool {
    let Some(name) = s.strip_suffix("()") else {
        return false;
    };
    let mut chars = name.chars();
    matches!(chars.next(), Some(c) if c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// A reverted call becomes [`RpcError::Reverted`] when the node supplied an
/// `Error(string)` payload; anything else stays a JSON-RPC error.
fn rpc_failure(err: JsonRpcError) -> RpcError {
    match err.revert_data().and_then(revert_reason) {
        Some(message) => RpcError::Reverted { message },
        None => RpcError::Transport(TransportError::Rpc(err)),
    }
}

/// The result must be `0x` + exactly 64 hex digits.
fn parse_word(result: &Value) -> Result<[u8; 32], RpcError> {
    let text = result
        .as_str()
        .ok_or_else(|| RpcError::MalformedResult(format!("expected a hex string, got {result}")))?;
    let digits = text
        .strip_prefix("0x")
        .ok_or_else(|| RpcError::MalformedResult(format!("missing 0x prefix: {text}")))?;
    let bytes = hex::decode(digits)
        .map_err(|e| RpcError::MalformedResult(format!("{text}: {e}")))?;
    <[u8; 32]>::try_from(bytes.as_slice())
        .map_err(|_| RpcError::MalformedResult(format!("expected 32 bytes, got {}", bytes.len())))
}
