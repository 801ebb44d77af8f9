//! Error types for the logproof pipeline.
//!
//! Every stage returns its own error enum. [`OracleError`] unifies them and
//! [`ErrorReport`] is the only shape that crosses the output boundary: a
//! UTF-8 string `"<tag>: <details>"` whose numeric tag names the failing stage.

use std::fmt;

use thiserror::Error;

use crate::request::JsonRpcError;

/// Missing or malformed positional input.
#[derive(Debug, Error)]
pub enum ArgumentError {
    #[error("missing argument [{index}] ({name})")]
    Missing { index: usize, name: &'static str },

    #[error("invalid {name} '{value}': expected a block number, 'earliest' or 'latest'")]
    InvalidBlock { name: &'static str, value: String },

    #[error("invalid contract address '{0}'")]
    InvalidAddress(String),

    #[error("unknown variant '{0}' (expected bool, block or hash)")]
    UnknownVariant(String),

    #[error("invalid endpoint config: {0}")]
    Endpoint(String),
}

/// The event declaration does not match `event Name(...)`.
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("Invalid event declaration: {input}")]
    InvalidDeclaration { input: String },

    #[error("empty parameter at position {position}")]
    EmptyParam { position: usize },

    #[error("invalid accessor signature '{0}'")]
    InvalidAccessor(String),
}

/// The explorer was unreachable or answered with a non-success envelope.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("HTTP error: {0}")]
    Http(String),

    #[error("explorer returned HTTP {status}: {message}")]
    Status { status: u16, message: String },

    #[error("Error making request: {message}")]
    Api { message: String },

    #[error("unexpected explorer response: {0}")]
    Body(String),
}

/// A raw log does not decode against the parsed signature.
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("unsupported ABI type '{ty}': {reason}")]
    UnknownType { ty: String, reason: String },

    #[error("log {index}: invalid raw log: {reason}")]
    InvalidRawLog { index: usize, reason: String },

    #[error("log {index}: topic0 {got} does not match event topic {expected}")]
    SelectorMismatch {
        index: usize,
        expected: String,
        got: String,
    },

    #[error("log {index}: expected {expected} topics, got {got}")]
    TopicCount {
        index: usize,
        expected: usize,
        got: usize,
    },

    #[error("log {index}: ABI decode failed: {reason}")]
    AbiDecodeFailed { index: usize, reason: String },
}

/// A decoded value cannot be encoded as its declared ABI type.
#[derive(Debug, Error)]
pub enum EncodeError {
    #[error("invalid tuple component type '{ty}': {reason}")]
    InvalidType { ty: String, reason: String },

    #[error("event {event}: expected {expected} values, got {got}")]
    Arity {
        event: usize,
        expected: usize,
        got: usize,
    },

    #[error("event {event} field {field}: value does not match declared type {expected}")]
    TypeMismatch {
        event: usize,
        field: usize,
        expected: String,
    },
}

/// Transport-level failures of a single JSON-RPC exchange.
#[derive(Debug, Error)]
pub enum TransportError {
    /// HTTP request failed (connection refused, timeout, non-2xx, ...).
    #[error("HTTP error: {0}")]
    Http(String),

    /// JSON-RPC protocol-level error returned by the node.
    #[error("RPC error {}: {}", .0.code, .0.message)]
    Rpc(JsonRpcError),

    /// Request timed out after the configured duration.
    #[error("Request timed out after {ms}ms")]
    Timeout { ms: u64 },

    /// Response could not be deserialized.
    #[error("Deserialization error: {0}")]
    Deserialization(#[from] serde_json::Error),

    #[error("{0}")]
    Other(String),
}

/// The on-chain read failed or returned an unexpected shape.
#[derive(Debug, Error)]
pub enum RpcError {
    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error("execution reverted: {message}")]
    Reverted { message: String },

    #[error("malformed state hash result: {0}")]
    MalformedResult(String),
}

/// Any pipeline failure.
#[derive(Debug, Error)]
pub enum OracleError {
    #[error(transparent)]
    Argument(#[from] ArgumentError),

    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    Decode(#[from] DecodeError),

    /// Carries the decoded events (count and JSON rendering) that failed to encode.
    #[error("{source} ({events} decoded logs: {rendered})")]
    Encode {
        #[source]
        source: EncodeError,
        events: usize,
        rendered: String,
    },

    #[error(transparent)]
    Rpc(#[from] RpcError),
}

impl OracleError {
    /// The pipeline stage this error belongs to.
    pub fn stage(&self) -> Stage {
        match self {
            Self::Argument(_) | Self::Parse(_) => Stage::Setup,
            Self::Fetch(_) => Stage::Fetch,
            Self::Decode(_) => Stage::Decode,
            Self::Encode { .. } => Stage::Encode,
            Self::Rpc(_) => Stage::Verify,
        }
    }

    /// Convert into the tagged report that crosses the output boundary.
    pub fn report(&self) -> ErrorReport {
        ErrorReport {
            stage: self.stage(),
            details: self.to_string(),
        }
    }
}

/// Pipeline stages in execution order. The discriminant is the output tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    /// Argument validation and event declaration parsing.
    Setup = 1,
    Fetch = 2,
    Decode = 3,
    Encode = 4,
    /// The on-chain state hash read.
    Verify = 5,
}

impl Stage {
    pub fn tag(self) -> u8 {
        self as u8
    }

    pub fn from_tag(tag: u8) -> Option<Self> {
        match tag {
            1 => Some(Self::Setup),
            2 => Some(Self::Fetch),
            3 => Some(Self::Decode),
            4 => Some(Self::Encode),
            5 => Some(Self::Verify),
            _ => None,
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Setup => write!(f, "setup"),
            Self::Fetch => write!(f, "fetch"),
            Self::Decode => write!(f, "decode"),
            Self::Encode => write!(f, "encode"),
            Self::Verify => write!(f, "verify"),
        }
    }
}

/// A tagged error string `"<tag>: <details>"`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorReport {
    pub stage: Stage,
    pub details: String,
}

impl ErrorReport {
    /// UTF-8 bytes of the tagged string.
    pub fn into_bytes(self) -> Vec<u8> {
        self.to_string().into_bytes()
    }

    /// Interpret output bytes as a tagged report.
    ///
    /// Returns `None` unless the bytes are UTF-8 starting with a known tag
    /// followed by `": "`.
    pub fn parse(bytes: &[u8]) -> Option<Self> {
        let text = std::str::from_utf8(bytes).ok()?;
        let (tag, details) = text.split_once(": ")?;
        let stage = Stage::from_tag(tag.parse().ok()?)?;
        Some(Self {
            stage,
            details: details.to_string(),
        })
    }
}

impl fmt::Display for ErrorReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.stage.tag(), self.details)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stages_map_to_tags() {
        let fetch: OracleError = FetchError::Api {
            message: "NOTOK".into(),
        }
        .into();
        assert_eq!(fetch.stage(), Stage::Fetch);
        assert_eq!(fetch.report().to_string(), "2: Error making request: NOTOK");

        let parse: OracleError = ParseError::InvalidDeclaration {
            input: "Transfer(address)".into(),
        }
        .into();
        assert_eq!(parse.report().stage.tag(), 1);

        let rpc: OracleError = RpcError::MalformedResult("0x".into()).into();
        assert_eq!(rpc.report().stage, Stage::Verify);
    }

    #[test]
    fn encode_report_carries_context() {
        let err = OracleError::Encode {
            source: EncodeError::TypeMismatch {
                event: 0,
                field: 1,
                expected: "string".into(),
            },
            events: 1,
            rendered: "[]".into(),
        };
        let report = err.report();
        assert_eq!(report.stage, Stage::Encode);
        assert!(report.to_string().starts_with("4: event 0 field 1"));
        assert!(report.details.ends_with("(1 decoded logs: [])"));
    }

    #[test]
    fn report_parse_roundtrip() {
        let report = ErrorReport {
            stage: Stage::Decode,
            details: "log 3: ABI decode failed: buffer overrun".into(),
        };
        let bytes = report.clone().into_bytes();
        assert_eq!(ErrorReport::parse(&bytes), Some(report));
    }

    #[test]
    fn report_parse_rejects_abi_words() {
        let mut word = [0u8; 32];
        word[31] = 1;
        assert!(ErrorReport::parse(&word).is_none());
        assert!(ErrorReport::parse(b"9: unknown stage").is_none());
        assert!(ErrorReport::parse(b"no tag here").is_none());
    }
}
