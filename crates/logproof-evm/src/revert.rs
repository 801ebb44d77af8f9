//! Decode `Error(string)` revert payloads returned by a failed `eth_call`.
//!
//! EVM encodes `require(cond, "message")` as:
//! `0x08c379a0` ++ ABI-encode(string)

use alloy_core::dyn_abi::{DynSolType, DynSolValue};

/// `keccak256("Error(string)")[..4]`
pub const ERROR_STRING_SELECTOR: [u8; 4] = [0x08, 0xc3, 0x79, 0xa0];

/// Revert message carried by `data`, if it is an `Error(string)` payload.
pub fn decode_error_string(data: &[u8]) -> Option<String> {
    let payload = data.strip_prefix(&ERROR_STRING_SELECTOR[..])?;
    match DynSolType::String.abi_decode(payload) {
        Ok(DynSolValue::String(s)) => Some(s),
        _ => None,
    }
}

/// Same as [`decode_error_string`] for the `0x` hex a node puts in `error.data`.
pub fn revert_reason(data_hex: &str) -> Option<String> {
    let digits = data_hex.strip_prefix("0x").unwrap_or(data_hex);
    decode_error_string(&hex::decode(digits).ok()?)
}
