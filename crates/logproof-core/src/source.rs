//! The `LogSource` trait and block-explorer `getLogs` envelope handling.

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;

use crate::error::FetchError;
use crate::types::{BlockTag, RawLog};

/// Message the explorer pairs with `status: "0"` when the range is empty.
const NO_RECORDS: &str = "No records found";

/// One `getLogs` request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogQuery {
    pub address: String,
    pub from_block: BlockTag,
    pub to_block: BlockTag,
    /// keccak-256 of the canonical event signature, `0x`-prefixed.
    pub topic0: String,
    /// Empty when no key is configured.
    pub api_key: String,
}

impl LogQuery {
    /// Query-string pairs in the order the explorer documents them.
    pub fn params(&self) -> Vec<(&'static str, String)> {
        vec![
            ("module", "logs".to_string()),
            ("action", "getLogs".to_string()),
            ("fromBlock", self.from_block.to_string()),
            ("toBlock", self.to_block.to_string()),
            ("address", self.address.clone()),
            ("topic0", self.topic0.clone()),
            ("apikey", self.api_key.clone()),
        ]
    }
}

/// Fetches raw logs for a query. One request per call, no retry.
#[async_trait]
pub trait LogSource: Send + Sync {
    async fn get_logs(&self, query: &LogQuery) -> Result<Vec<RawLog>, FetchError>;
}

/// The explorer's JSON envelope.
#[derive(Debug, Deserialize)]
struct Envelope {
    status: String,
    #[serde(default)]
    message: String,
    #[serde(default)]
    result: Value,
}

/// Interpret an explorer reply.
///
/// Succeeds iff the HTTP status is 200 and the body's `status` is `"1"`, or
/// the body is the explorer's empty-range reply (`"0"` / `No records found`
/// with an empty result array). Anything else fails with the body's `message`.
pub fn parse_explorer_response(http_status: u16, body: &Value) -> Result<Vec<RawLog>, FetchError> {
    let envelope: Option<Envelope> = serde_json::from_value(body.clone()).ok();

    if http_status != 200 {
        let message = envelope
            .map(|e| e.message)
            .filter(|m| !m.is_empty())
            .unwrap_or_else(|| "no message".to_string());
        return Err(FetchError::Status {
            status: http_status,
            message,
        });
    }

    let envelope = envelope.ok_or_else(|| FetchError::Body(format!("not a getLogs envelope: {body}")))?;

    match envelope.status.as_str() {
        "1" => serde_json::from_value(envelope.result)
            .map_err(|e| FetchError::Body(format!("invalid result array: {e}"))),
        "0" if envelope.message == NO_RECORDS
            && envelope.result.as_array().is_some_and(|a| a.is_empty()) =>
        {
            Ok(Vec::new())
        }
        _ => {
            let message = match envelope.result.as_str() {
                Some(detail) if !detail.is_empty() => format!("{} ({detail})", envelope.message),
                _ => envelope.message,
            };
            Err(FetchError::Api { message })
        }
    }
}
