//! # logproof-evm
//!
//! The EVM half of the oracle pipeline:
//!
//! - [`signature`]: `event Name(type indexed name, ...)` → [`EventSignature`](logproof_core::EventSignature)
//! - [`fingerprint`]: keccak-256 topic0 and function selectors
//! - [`decoder`]: raw explorer logs → ordered [`DecodedEvent`]s
//! - [`encoder`]: `abi.encode(tuple(...)[])` of the decoded sequence and its keccak-256
//! - [`verdict`]: ABI encoding of the final answer
//! - [`revert`]: `Error(string)` payloads returned by reverted calls
//!
//! ## Implementation notes
//! - Uses `alloy-core` dynamic ABI types, so event types are only known at runtime
//! - Topics[1..] hold indexed parameters, each one 32-byte word; reference
//!   types only appear there as their keccak-256 hash
//! - `data` holds the non-indexed parameters as an ABI parameter sequence

pub mod decoder;
pub mod encoder;
pub mod fingerprint;
pub mod normalizer;
pub mod revert;
pub mod signature;
pub mod verdict;

pub use decoder::{DecodedEvent, LogDecoder};
pub use encoder::{encode_canonical, tuple_type_string, CanonicalEncoding};
pub use fingerprint::{keccak256, selector, topic0};
pub use signature::parse_event_declaration;
pub use verdict::{decode_verdict, encode_verdict};
