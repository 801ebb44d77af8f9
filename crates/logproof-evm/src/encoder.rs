//! Canonical encoder/hasher.
//!
//! Reproduces what a contract computes with
//! `keccak256(abi.encode(events))` where `events` is a
//! `tuple(t1,t2,...)[]` holding one tuple per log, in fetch order.

use alloy_core::dyn_abi::{DynSolType, DynSolValue};
use logproof_core::EncodeError;

use crate::decoder::DecodedEvent;
use crate::fingerprint::keccak256;

/// The pre-image and its digest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CanonicalEncoding {
    /// `tuple(t1,t2,...)[]`
    pub type_string: String,
    pub bytes: Vec<u8>,
    pub hash: [u8; 32],
}

impl CanonicalEncoding {
    pub fn hash_hex(&self) -> String {
        format!("0x{}", hex::encode(self.hash))
    }
}

/// `tuple(t1,t2,...)[]` for the given ordered type names.
pub fn tuple_type_string(type_info: &[&str]) -> String {
    format!("tuple({})[]", type_info.join(","))
}

/// ABI-encode `[events]` as `tuple(type_info...)[]` and hash the result.
///
/// Every value is checked against its declared type first; a value whose
/// shape does not match (e.g. the hash standing in for an indexed `string`)
/// is an error rather than a silently different encoding.
pub fn encode_canonical(
    events: &[DecodedEvent],
    type_info: &[&str],
) -> Result<CanonicalEncoding, EncodeError> {
    let types = type_info
        .iter()
        .map(|ty| {
            DynSolType::parse(ty).map_err(|e| EncodeError::InvalidType {
                ty: ty.to_string(),
                reason: e.to_string(),
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    let mut rows = Vec::with_capacity(events.len());
    for (event_idx, event) in events.iter().enumerate() {
        if event.values.len() != types.len() {
            return Err(EncodeError::Arity {
                event: event_idx,
                expected: types.len(),
                got: event.values.len(),
            });
        }
        for (field, (ty, value)) in types.iter().zip(&event.values).enumerate() {
            if !ty.matches(value) {
                return Err(EncodeError::TypeMismatch {
                    event: event_idx,
                    field,
                    expected: type_info[field].to_string(),
                });
            }
        }
        rows.push(DynSolValue::Tuple(event.values.clone()));
    }

    // abi.encode(events): a one-element parameter sequence.
    let bytes = DynSolValue::Tuple(vec![DynSolValue::Array(rows)]).abi_encode_params();
    let hash = keccak256(&bytes);

    let encoding = CanonicalEncoding {
        type_string: tuple_type_string(type_info),
        bytes,
        hash,
    };
    tracing::debug!(
        ty = %encoding.type_string,
        events = events.len(),
        bytes = encoding.bytes.len(),
        hash = %encoding.hash_hex(),
        "canonical encoding"
    );
    Ok(encoding)
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::{Address, B256, U256};

    const TRANSFER_TYPES: [&str; 3] = ["address", "address", "uint256"];

    fn transfer(from: u8, to: u8, value: u64, block: u64) -> DecodedEvent {
        DecodedEvent {
            block_number: block,
            values: vec![
                DynSolValue::Address(Address::repeat_byte(from)),
                DynSolValue::Address(Address::repeat_byte(to)),
                DynSolValue::Uint(U256::from(value), 256),
            ],
        }
    }

    #[test]
    fn type_string() {
        assert_eq!(
            tuple_type_string(&TRANSFER_TYPES),
            "tuple(address,address,uint256)[]"
        );
        assert_eq!(tuple_type_string(&[]), "tuple()[]");
    }

    #[test]
    fn two_transfers_reference_hash() {
        let events = vec![transfer(0x11, 0x22, 1000, 100), transfer(0x22, 0x11, 2500, 105)];
        let enc = encode_canonical(&events, &TRANSFER_TYPES).unwrap();
        // offset + length + 2 × 3 static words
        assert_eq!(enc.bytes.len(), 8 * 32);
        assert_eq!(
            enc.hash_hex(),
            "0xf03ddf5e090c1ed945c6897d508ed8c30deb3b477d8d5d57a9c1c9f580eb050f"
        );
    }

    #[test]
    fn deterministic() {
        let events = vec![transfer(0x11, 0x22, 1000, 100), transfer(0x22, 0x11, 2500, 105)];
        let a = encode_canonical(&events, &TRANSFER_TYPES).unwrap();
        let b = encode_canonical(&events.clone(), &TRANSFER_TYPES).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn order_sensitive() {
        let forward = vec![transfer(0x11, 0x22, 1000, 100), transfer(0x22, 0x11, 2500, 105)];
        let reversed: Vec<_> = forward.iter().rev().cloned().collect();
        let a = encode_canonical(&forward, &TRANSFER_TYPES).unwrap();
        let b = encode_canonical(&reversed, &TRANSFER_TYPES).unwrap();
        assert_ne!(a.hash, b.hash);
        assert_eq!(
            b.hash_hex(),
            "0x588da604610a7ac72543345456c6f16e25a05fd2910f3dd64f67e8ed50e66ea0"
        );
    }

    #[test]
    fn empty_sequence() {
        let enc = encode_canonical(&[], &TRANSFER_TYPES).unwrap();
        let mut expected = vec![0u8; 64];
        expected[31] = 0x20;
        assert_eq!(enc.bytes, expected);
        assert_eq!(
            enc.hash_hex(),
            "0x569e75fc77c1a856f6daaf9e69d8a9566ca34aa47f9133711ce065a571af0cfd"
        );
    }

    #[test]
    fn dynamic_members() {
        let events = vec![
            DecodedEvent {
                block_number: 1,
                values: vec![
                    DynSolValue::Address(Address::repeat_byte(0x11)),
                    DynSolValue::String("hello".into()),
                    DynSolValue::Uint(U256::from(7u64), 256),
                ],
            },
            DecodedEvent {
                block_number: 2,
                values: vec![
                    DynSolValue::Address(Address::repeat_byte(0x22)),
                    DynSolValue::String(String::new()),
                    DynSolValue::Uint(U256::from(9u64), 256),
                ],
            },
        ];
        let enc = encode_canonical(&events, &["address", "string", "uint256"]).unwrap();
        assert_eq!(
            enc.hash_hex(),
            "0xf2835989f2f744e303ecedc44cc56e07ddaa7c9f79bb0c9533780c28fea37459"
        );
    }

    #[test]
    fn hashed_indexed_string_does_not_encode() {
        let events = vec![DecodedEvent {
            block_number: 1,
            values: vec![DynSolValue::FixedBytes(B256::repeat_byte(1), 32)],
        }];
        let err = encode_canonical(&events, &["string"]).unwrap_err();
        assert!(matches!(err, EncodeError::TypeMismatch { event: 0, field: 0, .. }));
    }

    #[test]
    fn arity_mismatch() {
        let events = vec![transfer(1, 2, 3, 4)];
        assert!(matches!(
            encode_canonical(&events, &["address"]),
            Err(EncodeError::Arity { expected: 1, got: 3, .. })
        ));
    }
}
