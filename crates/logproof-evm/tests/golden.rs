//! Golden fixture integration tests.
//!
//! Each fixture in `fixtures/explorer/` holds a recorded `getLogs` reply and
//! the topic0, tuple type, encoding and hash a contract would compute over it.

use logproof_core::source::parse_explorer_response;
use logproof_evm::{encode_canonical, parse_event_declaration, tuple_type_string, LogDecoder};

// ─── Helpers ──────────────────────────────────────────────────────────────────

/// The fixtures live two levels above the crate root.
fn load_fixture(name: &str) -> serde_json::Value {
    let mut p = std::path::PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    p.push("../../fixtures/explorer");
    p.push(name);
    let text = std::fs::read_to_string(&p).unwrap_or_else(|e| panic!("{}: {e}", p.display()));
    serde_json::from_str(&text).unwrap()
}

fn check_fixture(name: &str) {
    let fixture = load_fixture(name);
    let expected = &fixture["expected"];

    let sig = parse_event_declaration(fixture["eventDeclaration"].as_str().unwrap())
        .expect("declaration should parse");
    let decoder = LogDecoder::new(sig).expect("types should resolve");
    assert_eq!(decoder.topic0_hex(), expected["topic0"].as_str().unwrap());

    let type_info = decoder.type_info();
    let expected_types: Vec<&str> = expected["typeInfo"]
        .as_array()
        .unwrap()
        .iter()
        .map(|v| v.as_str().unwrap())
        .collect();
    assert_eq!(type_info, expected_types);
    assert_eq!(tuple_type_string(&type_info), expected["tupleType"].as_str().unwrap());

    let raws = parse_explorer_response(200, &fixture["response"]).expect("envelope should parse");
    let events = decoder.decode_all(&raws).expect("logs should decode");
    assert_eq!(events.len(), raws.len());

    let max_block = events.iter().map(|e| e.block_number).max().unwrap_or(0);
    assert_eq!(max_block, expected["maxBlock"].as_u64().unwrap());

    let enc = encode_canonical(&events, &type_info).expect("events should encode");
    if let Some(bytes) = expected["encoding"].as_str() {
        assert_eq!(format!("0x{}", hex::encode(&enc.bytes)), bytes, "{name}: encoding");
    }
    assert_eq!(enc.hash_hex(), expected["hash"].as_str().unwrap(), "{name}: hash");
}

// ─── Fixtures ─────────────────────────────────────────────────────────────────

#[test]
fn two_transfers_golden() {
    check_fixture("two-transfers.json");
}

#[test]
fn deposits_with_dynamic_string_golden() {
    check_fixture("deposits.json");
}

#[test]
fn empty_range_golden() {
    check_fixture("no-records.json");
}
