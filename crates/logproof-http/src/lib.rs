//! # logproof-http
//!
//! Network implementations of the two capabilities the oracle pipeline is
//! handed: [`ExplorerClient`] fetches logs from an Etherscan-style `getLogs`
//! API and [`HttpRpcClient`] reads contract state over JSON-RPC.
//!
//! Both perform exactly one HTTP exchange per call.

pub mod client;
pub mod explorer;

pub use client::{HttpClientConfig, HttpRpcClient};
pub use explorer::ExplorerClient;
