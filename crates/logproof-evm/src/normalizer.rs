//! Converts alloy-core `DynSolValue` → `serde_json::Value` for diagnostics.
//!
//! Used to render decoded events into error reports and debug logs. The JSON
//! form never feeds the hash.

use alloy_core::dyn_abi::DynSolValue;
use serde_json::Value;

use crate::decoder::DecodedEvent;

/// Convert a decoded value into JSON.
///
/// Integers become decimal strings (they may exceed 64 bits), addresses are
/// EIP-55 checksummed, byte strings are `0x` hex, tuples become arrays.
pub fn to_json(val: &DynSolValue) -> Value {
    match val {
        DynSolValue::Bool(b) => Value::Bool(*b),
        DynSolValue::Int(i, _) => Value::String(i.to_string()),
        DynSolValue::Uint(u, _) => Value::String(u.to_string()),
        DynSolValue::FixedBytes(word, size) => {
            Value::String(format!("0x{}", hex::encode(&word[..*size])))
        }
        DynSolValue::Bytes(b) => Value::String(format!("0x{}", hex::encode(b))),
        DynSolValue::String(s) => Value::String(s.clone()),
        DynSolValue::Address(a) => Value::String(a.to_checksum(None)),
        DynSolValue::Function(f) => Value::String(format!("0x{}", hex::encode(f.as_slice()))),
        DynSolValue::Array(vals) | DynSolValue::FixedArray(vals) | DynSolValue::Tuple(vals) => {
            Value::Array(vals.iter().map(to_json).collect())
        }
    }
}

/// Render a decoded sequence as a compact JSON array of argument arrays.
pub fn render_events(events: &[DecodedEvent]) -> String {
    let rows: Vec<Value> = events
        .iter()
        .map(|e| Value::Array(e.values.iter().map(to_json).collect()))
        .collect();
    Value::Array(rows).to_string()
}
