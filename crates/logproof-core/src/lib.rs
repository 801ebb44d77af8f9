//! # logproof-core
//!
//! Shared primitives for the logproof oracle pipeline:
//!
//! - [`types`]: event parameters, raw logs, block tags and verdicts
//! - [`error`]: the per-stage error taxonomy and the tagged [`ErrorReport`]
//! - [`config`]: per-invocation [`OracleConfig`] and [`EndpointConfig`]
//! - [`request`] / [`transport`]: JSON-RPC wire types and the [`RpcTransport`] seam
//! - [`source`]: the [`LogSource`] seam and block-explorer envelope handling

pub mod config;
pub mod error;
pub mod request;
pub mod source;
pub mod transport;
pub mod types;

pub use config::{EndpointConfig, OracleConfig, API_KEY_SECRET};
pub use error::{
    ArgumentError, DecodeError, EncodeError, ErrorReport, FetchError, OracleError, ParseError,
    RpcError, Stage, TransportError,
};
pub use request::{JsonRpcError, JsonRpcRequest, JsonRpcResponse, RpcId};
pub use source::{LogQuery, LogSource};
pub use transport::RpcTransport;
pub use types::{BlockTag, EventParam, EventSignature, RawLog, Variant, Verdict};
