//! `LogDecoder`: decodes explorer logs against a parsed event signature.
//!
//! Decoding is all-or-nothing: the first log that fails aborts the whole
//! batch, because a partial sequence would hash to a meaningless value.

use alloy_core::dyn_abi::{DynSolType, DynSolValue};
use alloy_primitives::B256;
use logproof_core::{DecodeError, EventSignature, RawLog};

use crate::fingerprint::keccak256;

/// One decoded log: a value per event parameter, in declaration order.
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedEvent {
    pub block_number: u64,
    pub values: Vec<DynSolValue>,
}

/// Decoder bound to one event signature. Types are resolved once, up front.
#[derive(Debug, Clone)]
pub struct LogDecoder {
    signature: EventSignature,
    types: Vec<DynSolType>,
    /// `types` with every `string` read as `bytes`, so UTF-8 is checked here
    /// rather than replaced lossily by the ABI decoder.
    wire: Vec<DynSolType>,
    topic0: B256,
}

impl LogDecoder {
    pub fn new(signature: EventSignature) -> Result<Self, DecodeError> {
        let types = signature
            .params
            .iter()
            .map(|p| resolve_type(&p.ty))
            .collect::<Result<Vec<_>, _>>()?;
        let wire = types.iter().map(strings_as_bytes).collect();
        let topic0 = B256::from(keccak256(signature.canonical().as_bytes()));
        Ok(Self {
            signature,
            types,
            wire,
            topic0,
        })
    }

    /// `typeInfo`: the ordered type names the canonical tuple is built from.
    pub fn type_info(&self) -> Vec<&str> {
        self.signature.type_info()
    }

    pub fn topic0_hex(&self) -> String {
        format!("{:#x}", self.topic0)
    }

    /// Decode every log, preserving order (`decoded[i]` comes from `raw[i]`).
    pub fn decode_all(&self, raws: &[RawLog]) -> Result<Vec<DecodedEvent>, DecodeError> {
        let decoded = raws
            .iter()
            .enumerate()
            .map(|(index, raw)| self.decode_log(index, raw))
            .collect::<Result<Vec<_>, _>>()?;
        tracing::debug!(
            event = %self.signature.name,
            logs = decoded.len(),
            "decoded logs"
        );
        Ok(decoded)
    }

    /// Decode a single log. `index` is only used in error reports.
    pub fn decode_log(&self, index: usize, raw: &RawLog) -> Result<DecodedEvent, DecodeError> {
        let topics = raw
            .topics
            .iter()
            .enumerate()
            .map(|(pos, t)| {
                let bytes = parse_hex(index, t)?;
                if bytes.len() != 32 {
                    return Err(DecodeError::InvalidRawLog {
                        index,
                        reason: format!("topic {pos} is {} bytes, expected 32", bytes.len()),
                    });
                }
                Ok(B256::from_slice(&bytes))
            })
            .collect::<Result<Vec<_>, _>>()?;

        let expected_topics = 1 + self.signature.indexed_params().count();
        match topics.first() {
            None => {
                return Err(DecodeError::TopicCount {
                    index,
                    expected: expected_topics,
                    got: 0,
                })
            }
            Some(t0) if *t0 != self.topic0 => {
                return Err(DecodeError::SelectorMismatch {
                    index,
                    expected: self.topic0_hex(),
                    got: format!("{t0:#x}"),
                })
            }
            Some(_) => {}
        }
        if topics.len() != expected_topics {
            return Err(DecodeError::TopicCount {
                index,
                expected: expected_topics,
                got: topics.len(),
            });
        }

        let mut values: Vec<Option<DynSolValue>> = vec![None; self.types.len()];

        // Indexed params → topics[1..]
        for ((pos, _), topic) in self.signature.indexed_params().zip(&topics[1..]) {
            let ty = &self.types[pos];
            let value = if is_hashed_when_indexed(ty) {
                DynSolValue::FixedBytes(*topic, 32)
            } else {
                ty.abi_decode(topic.as_slice())
                    .map_err(|e| DecodeError::AbiDecodeFailed {
                        index,
                        reason: format!("topic for param {pos}: {e}"),
                    })?
            };
            values[pos] = Some(value);
        }

        // Non-indexed params → data
        let data_positions: Vec<usize> = self.signature.data_params().map(|(i, _)| i).collect();
        if !data_positions.is_empty() {
            let data = parse_hex(index, &raw.data)?;
            let body = DynSolType::Tuple(data_positions.iter().map(|&i| self.wire[i].clone()).collect());
            let decoded = body
                .abi_decode_params(&data)
                .map_err(|e| DecodeError::AbiDecodeFailed {
                    index,
                    reason: format!("data: {e}"),
                })?;
            let fields = match decoded {
                DynSolValue::Tuple(vals) => vals,
                other => vec![other],
            };
            if fields.len() != data_positions.len() {
                return Err(DecodeError::AbiDecodeFailed {
                    index,
                    reason: format!(
                        "data decoded to {} values, expected {}",
                        fields.len(),
                        data_positions.len()
                    ),
                });
            }
            for (pos, value) in data_positions.into_iter().zip(fields) {
                let value = restore_strings(&self.types[pos], value).map_err(|reason| {
                    DecodeError::AbiDecodeFailed {
                        index,
                        reason: format!("data for param {pos}: {reason}"),
                    }
                })?;
                values[pos] = Some(value);
            }
        }

        let values = values
            .into_iter()
            .collect::<Option<Vec<_>>>()
            .ok_or_else(|| DecodeError::AbiDecodeFailed {
                index,
                reason: "not every parameter was decoded".into(),
            })?;

        let block_number = raw
            .block_number_u64()
            .ok_or_else(|| DecodeError::InvalidRawLog {
                index,
                reason: format!("invalid blockNumber '{}'", raw.block_number),
            })?;

        Ok(DecodedEvent {
            block_number,
            values,
        })
    }
}

/// Resolve an ABI type name such as `uint256` or `(address,bool)[]`.
pub fn resolve_type(ty: &str) -> Result<DynSolType, DecodeError> {
    DynSolType::parse(ty).map_err(|e| DecodeError::UnknownType {
        ty: ty.to_string(),
        reason: e.to_string(),
    })
}

/// Replace `string` with `bytes` at any depth.
fn strings_as_bytes(ty: &DynSolType) -> DynSolType {
    match ty {
        DynSolType::String => DynSolType::Bytes,
        DynSolType::Array(inner) => DynSolType::Array(Box::new(strings_as_bytes(inner))),
        DynSolType::FixedArray(inner, len) => {
            DynSolType::FixedArray(Box::new(strings_as_bytes(inner)), *len)
        }
        DynSolType::Tuple(inner) => DynSolType::Tuple(inner.iter().map(strings_as_bytes).collect()),
        other => other.clone(),
    }
}

/// Walk `value` (decoded against `strings_as_bytes(ty)`) alongside `ty` and
/// turn every `string` position back into a string, rejecting invalid UTF-8.
fn restore_strings(ty: &DynSolType, value: DynSolValue) -> Result<DynSolValue, String> {
    match (ty, value) {
        (DynSolType::String, DynSolValue::Bytes(raw)) => String::from_utf8(raw)
            .map(DynSolValue::String)
            .map_err(|e| format!("invalid UTF-8 in string: {e}")),
        (DynSolType::Array(inner), DynSolValue::Array(items)) => items
            .into_iter()
            .map(|v| restore_strings(inner, v))
            .collect::<Result<_, _>>()
            .map(DynSolValue::Array),
        (DynSolType::FixedArray(inner, _), DynSolValue::FixedArray(items)) => items
            .into_iter()
            .map(|v| restore_strings(inner, v))
            .collect::<Result<_, _>>()
            .map(DynSolValue::FixedArray),
        (DynSolType::Tuple(inner), DynSolValue::Tuple(items)) => inner
            .iter()
            .zip(items)
            .map(|(t, v)| restore_strings(t, v))
            .collect::<Result<_, _>>()
            .map(DynSolValue::Tuple),
        (_, value) => Ok(value),
    }
}

/// Reference types are stored in a topic as the keccak-256 of their encoding;
/// the value itself is unrecoverable.
fn is_hashed_when_indexed(ty: &DynSolType) -> bool {
    matches!(
        ty,
        DynSolType::String
            | DynSolType::Bytes
            | DynSolType::Array(_)
            | DynSolType::FixedArray(..)
            | DynSolType::Tuple(_)
    )
}

fn parse_hex(index: usize, s: &str) -> Result<Vec<u8>, DecodeError> {
    let digits = s.strip_prefix("0x").unwrap_or(s);
    hex::decode(digits).map_err(|e| DecodeError::InvalidRawLog {
        index,
        reason: format!("invalid hex '{s}': {e}"),
    })
}
