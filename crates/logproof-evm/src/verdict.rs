//! Result encoder: the ABI word the oracle hands back to the requesting contract.

use alloy_core::dyn_abi::{DynSolType, DynSolValue};
use alloy_primitives::{B256, U256};
use logproof_core::{Variant, Verdict};

/// ABI-encode a verdict: `bool`, `uint256` or `bytes32`, one word each.
pub fn encode_verdict(verdict: &Verdict) -> Vec<u8> {
    let value = match verdict {
        Verdict::Matched(b) => DynSolValue::Bool(*b),
        Verdict::BlockNumber(n) => DynSolValue::Uint(U256::from(*n), 256),
        Verdict::Hash(h) => DynSolValue::FixedBytes(B256::from(*h), 32),
    };
    value.abi_encode()
}

/// Try to read `bytes` as the ABI encoding a `variant` produces.
///
/// Callers use this before falling back to reading the bytes as a tagged
/// error string.
pub fn decode_verdict(bytes: &[u8], variant: Variant) -> Option<Verdict> {
    if bytes.len() != 32 {
        return None;
    }
    let ty = match variant {
        Variant::Bool => DynSolType::Bool,
        Variant::Block => DynSolType::Uint(256),
        Variant::Hash => DynSolType::FixedBytes(32),
    };
    // Non-canonical words (e.g. a bool of 2) only fail under validation.
    if variant == Variant::Bool && (bytes[..31].iter().any(|b| *b != 0) || bytes[31] > 1) {
        return None;
    }
    match ty.abi_decode(bytes).ok()? {
        DynSolValue::Bool(b) => Some(Verdict::Matched(b)),
        DynSolValue::Uint(n, _) => u64::try_from(n).ok().map(Verdict::BlockNumber),
        DynSolValue::FixedBytes(word, _) => Some(Verdict::Hash(word.0)),
        _ => None,
    }
}
