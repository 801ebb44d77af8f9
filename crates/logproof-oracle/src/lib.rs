//! # logproof-oracle
//!
//! The verification pipeline. One call to [`Pipeline::run`] takes an
//! [`OracleConfig`](logproof_core::OracleConfig) through
//!
//! parse → fetch → decode → encode/hash → verify → verdict
//!
//! and stops at the first failing stage. [`OracleOutput`] is the boundary
//! where a result becomes the single byte string handed back to the caller.

pub mod output;
pub mod pipeline;
pub mod verifier;

pub use output::{classify, OracleOutput};
pub use pipeline::Pipeline;
pub use verifier::StateVerifier;
