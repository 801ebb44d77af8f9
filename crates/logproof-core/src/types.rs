//! Shared types for the oracle pipeline.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ArgumentError;

// ─── EventParam / EventSignature ──────────────────────────────────────────────

/// One parameter of a parsed event declaration, in emission order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventParam {
    /// ABI type name, e.g. `uint256`, `address[]`, `tuple(uint8,bool)`.
    #[serde(rename = "type")]
    pub ty: String,
    /// Parameter name; empty when the declaration omits it.
    pub name: String,
    /// `true` when the parameter lives in a topic rather than in `data`.
    pub indexed: bool,
}

impl EventParam {
    pub fn new(ty: impl Into<String>, name: impl Into<String>, indexed: bool) -> Self {
        Self {
            ty: ty.into(),
            name: name.into(),
            indexed,
        }
    }
}

/// A parsed event declaration: name, ordered params and the canonical
/// `Name(type1,type2,...)` signature.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventSignature {
    pub name: String,
    pub params: Vec<EventParam>,
}

impl EventSignature {
    /// `Name(type1,type2,...)` with names and `indexed` stripped.
    pub fn canonical(&self) -> String {
        format!("{}({})", self.name, self.type_info().join(","))
    }

    /// Ordered type names, used to build the canonical tuple type.
    pub fn type_info(&self) -> Vec<&str> {
        self.params.iter().map(|p| p.ty.as_str()).collect()
    }

    pub fn indexed_params(&self) -> impl Iterator<Item = (usize, &EventParam)> {
        self.params.iter().enumerate().filter(|(_, p)| p.indexed)
    }

    pub fn data_params(&self) -> impl Iterator<Item = (usize, &EventParam)> {
        self.params.iter().enumerate().filter(|(_, p)| !p.indexed)
    }
}

impl fmt::Display for EventSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.canonical())
    }
}

// ─── RawLog ───────────────────────────────────────────────────────────────────

/// A raw log entry as returned by the explorer's `getLogs` action.
///
/// Only `topics`, `data` and `blockNumber` take part in verification; the
/// remaining explorer fields are kept for diagnostics.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawLog {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    pub topics: Vec<String>,
    pub data: String,
    #[serde(rename = "blockNumber")]
    pub block_number: String,
    #[serde(
        rename = "transactionHash",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub tx_hash: Option<String>,
    #[serde(rename = "logIndex", default, skip_serializing_if = "Option::is_none")]
    pub log_index: Option<String>,
}

impl RawLog {
    pub fn new(topics: Vec<String>, data: impl Into<String>, block_number: impl Into<String>) -> Self {
        Self {
            address: None,
            topics,
            data: data.into(),
            block_number: block_number.into(),
            tx_hash: None,
            log_index: None,
        }
    }

    /// Block number parsed from its `0x` hex form.
    pub fn block_number_u64(&self) -> Option<u64> {
        parse_hex_u64(&self.block_number)
    }
}

/// Parse a hex-encoded quantity (with or without `0x`) to u64.
pub fn parse_hex_u64(s: &str) -> Option<u64> {
    let s = strip_hex_prefix(s).unwrap_or(s);
    if s.is_empty() {
        return None;
    }
    u64::from_str_radix(s, 16).ok()
}

// ─── BlockTag ─────────────────────────────────────────────────────────────────

fn strip_hex_prefix(s: &str) -> Option<&str> {
    s.strip_prefix("0x").or_else(|| s.strip_prefix("0X"))
}

/// A block bound accepted by the explorer's `fromBlock` / `toBlock`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockTag {
    Earliest,
    Latest,
    Number(u64),
}

impl BlockTag {
    /// Parse a positional argument: decimal, `0x` hex, `earliest` or `latest`.
    pub fn parse_arg(name: &'static str, value: &str) -> Result<Self, ArgumentError> {
        value.parse().map_err(|_| ArgumentError::InvalidBlock {
            name,
            value: value.to_string(),
        })
    }
}

impl FromStr for BlockTag {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        match s.to_ascii_lowercase().as_str() {
            "earliest" => return Ok(Self::Earliest),
            "latest" => return Ok(Self::Latest),
            _ => {}
        }
        if let Some(hex) = strip_hex_prefix(s) {
            return u64::from_str_radix(hex, 16).map(Self::Number).map_err(|_| ());
        }
        s.parse().map(Self::Number).map_err(|_| ())
    }
}

impl fmt::Display for BlockTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Earliest => write!(f, "earliest"),
            Self::Latest => write!(f, "latest"),
            Self::Number(n) => write!(f, "{n}"),
        }
    }
}

// ─── Variant / Verdict ────────────────────────────────────────────────────────

/// Which answer the pipeline returns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Variant {
    /// ABI `bool`: does the local hash equal the on-chain state hash.
    #[default]
    Bool,
    /// ABI `uint256`: highest fetched block number on match, else zero.
    Block,
    /// ABI `bytes32`: the local hash; no on-chain read.
    Hash,
}

impl Variant {
    /// Whether this variant reads the on-chain state hash.
    pub fn verifies(self) -> bool {
        !matches!(self, Self::Hash)
    }
}

impl FromStr for Variant {
    type Err = ArgumentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "bool" | "a" => Ok(Self::Bool),
            "block" | "b" => Ok(Self::Block),
            "hash" | "c" => Ok(Self::Hash),
            other => Err(ArgumentError::UnknownVariant(other.to_string())),
        }
    }
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool => write!(f, "bool"),
            Self::Block => write!(f, "block"),
            Self::Hash => write!(f, "hash"),
        }
    }
}

/// The single datum that survives to the output boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Matched(bool),
    BlockNumber(u64),
    Hash([u8; 32]),
}

#[cfg(test)]
mod tests {
    use super::*;

    fn transfer() -> EventSignature {
        EventSignature {
            name: "Transfer".into(),
            params: vec![
                EventParam::new("address", "from", true),
                EventParam::new("address", "to", true),
                EventParam::new("uint256", "value", false),
            ],
        }
    }

    #[test]
    fn canonical_signature() {
        assert_eq!(transfer().canonical(), "Transfer(address,address,uint256)");
        assert_eq!(transfer().type_info(), vec!["address", "address", "uint256"]);
    }

    #[test]
    fn indexed_and_data_positions() {
        let sig = transfer();
        let indexed: Vec<_> = sig.indexed_params().map(|(i, _)| i).collect();
        let data: Vec<_> = sig.data_params().map(|(i, _)| i).collect();
        assert_eq!(indexed, vec![0, 1]);
        assert_eq!(data, vec![2]);
    }

    #[test]
    fn block_tag_parsing() {
        assert_eq!("latest".parse::<BlockTag>(), Ok(BlockTag::Latest));
        assert_eq!("EARLIEST".parse::<BlockTag>(), Ok(BlockTag::Earliest));
        assert_eq!("12345".parse::<BlockTag>(), Ok(BlockTag::Number(12345)));
        assert_eq!("0x64".parse::<BlockTag>(), Ok(BlockTag::Number(100)));
        assert_eq!("0X64".parse::<BlockTag>(), Ok(BlockTag::Number(100)));
        assert_eq!(
            BlockTag::parse_arg("toBlock", " 0XFF ").unwrap(),
            BlockTag::Number(255)
        );
        assert!("0X".parse::<BlockTag>().is_err());
        assert!(BlockTag::parse_arg("fromBlock", "soon").is_err());
        assert_eq!(BlockTag::Number(7).to_string(), "7");
    }

    #[test]
    fn raw_log_block_number() {
        let log = RawLog::new(vec![], "0x", "0x69");
        assert_eq!(log.block_number_u64(), Some(105));
        assert_eq!(parse_hex_u64("0x"), None);
        assert_eq!(parse_hex_u64("zz"), None);
        assert_eq!(parse_hex_u64("0X1f"), Some(31));
    }

    #[test]
    fn raw_log_from_explorer_json() {
        let json = r#"{
            "address": "0xabc",
            "topics": ["0x01"],
            "data": "0x",
            "blockNumber": "0x10",
            "timeStamp": "0x65",
            "transactionHash": "0xdead",
            "logIndex": "0x"
        }"#;
        let log: RawLog = serde_json::from_str(json).unwrap();
        assert_eq!(log.block_number_u64(), Some(16));
        assert_eq!(log.tx_hash.as_deref(), Some("0xdead"));
    }

    #[test]
    fn variant_parsing() {
        assert_eq!("block".parse::<Variant>().unwrap(), Variant::Block);
        assert!(!Variant::Hash.verifies());
        assert!("maybe".parse::<Variant>().is_err());
    }
}
