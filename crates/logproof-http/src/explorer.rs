//! Etherscan-compatible `getLogs` client.

use async_trait::async_trait;
use serde_json::Value;

use logproof_core::source::{parse_explorer_response, LogQuery, LogSource};
use logproof_core::{FetchError, RawLog};

use crate::client::HttpClientConfig;

/// Fetches logs with a single GET against an explorer `api` endpoint.
pub struct ExplorerClient {
    base_url: String,
    http: reqwest::Client,
}

impl ExplorerClient {
    pub fn new(base_url: impl Into<String>, config: HttpClientConfig) -> Result<Self, FetchError> {
        let http = config
            .build()
            .map_err(|e| FetchError::Http(format!("failed to build HTTP client: {e}")))?;
        Ok(Self {
            base_url: base_url.into(),
            http,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[async_trait]
impl LogSource for ExplorerClient {
    async fn get_logs(&self, query: &LogQuery) -> Result<Vec<RawLog>, FetchError> {
        tracing::debug!(
            url = %self.base_url,
            address = %query.address,
            from = %query.from_block,
            to = %query.to_block,
            topic0 = %query.topic0,
            "getLogs"
        );

        let resp = self
            .http
            .get(&self.base_url)
            .query(&query.params())
            .send()
            .await
            .map_err(|e| FetchError::Http(e.to_string()))?;

        let status = resp.status().as_u16();
        let text = resp
            .text()
            .await
            .map_err(|e| FetchError::Http(e.to_string()))?;

        let body: Value = match serde_json::from_str(&text) {
            Ok(v) => v,
            // A non-200 reply need not be JSON; the status alone decides.
            Err(_) if status != 200 => Value::Null,
            Err(e) => return Err(FetchError::Body(format!("invalid JSON: {e}"))),
        };

        let logs = parse_explorer_response(status, &body)?;
        tracing::debug!(count = logs.len(), "getLogs returned");
        Ok(logs)
    }
}
