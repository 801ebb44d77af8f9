//! HTTP JSON-RPC client backed by `reqwest`.

use async_trait::async_trait;
use std::time::Duration;

use logproof_core::request::{JsonRpcRequest, JsonRpcResponse};
use logproof_core::transport::RpcTransport;
use logproof_core::TransportError;

/// Shared settings for the HTTP clients.
#[derive(Debug, Clone)]
pub struct HttpClientConfig {
    pub request_timeout: Duration,
    pub user_agent: String,
}

impl Default for HttpClientConfig {
    fn default() -> Self {
        Self {
            request_timeout: Duration::from_secs(30),
            user_agent: concat!("logproof/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

impl HttpClientConfig {
    pub fn with_timeout_secs(secs: u64) -> Self {
        Self {
            request_timeout: Duration::from_secs(secs),
            ..Self::default()
        }
    }

    pub(crate) fn build(&self) -> Result<reqwest::Client, reqwest::Error> {
        reqwest::Client::builder()
            .timeout(self.request_timeout)
            .user_agent(self.user_agent.clone())
            .build()
    }
}

/// JSON-RPC over HTTP POST.
pub struct HttpRpcClient {
    url: String,
    http: reqwest::Client,
    request_timeout: Duration,
}

impl HttpRpcClient {
    /// Create a client for the given JSON-RPC endpoint URL.
    pub fn new(url: impl Into<String>, config: HttpClientConfig) -> Result<Self, TransportError> {
        let http = config
            .build()
            .map_err(|e| TransportError::Other(format!("failed to build HTTP client: {e}")))?;
        Ok(Self {
            url: url.into(),
            http,
            request_timeout: config.request_timeout,
        })
    }

    pub fn default_for(url: impl Into<String>) -> Result<Self, TransportError> {
        Self::new(url, HttpClientConfig::default())
    }

    fn map_reqwest(&self, e: reqwest::Error) -> TransportError {
        if e.is_timeout() {
            TransportError::Timeout {
                ms: self.request_timeout.as_millis() as u64,
            }
        } else {
            TransportError::Http(e.to_string())
        }
    }
}

#[async_trait]
impl RpcTransport for HttpRpcClient {
    async fn send(&self, req: JsonRpcRequest) -> Result<JsonRpcResponse, TransportError> {
        tracing::debug!(url = %self.url, method = %req.method, "json-rpc request");

        let resp = self
            .http
            .post(&self.url)
            .json(&req)
            .send()
            .await
            .map_err(|e| self.map_reqwest(e))?;

        let status = resp.status();
        let body = resp.text().await.map_err(|e| self.map_reqwest(e))?;

        if !status.is_success() {
            // Some nodes report execution errors with a 4xx/5xx status and a
            // regular JSON-RPC error body.
            if let Ok(parsed) = serde_json::from_str::<JsonRpcResponse>(&body) {
                if parsed.error.is_some() {
                    return Ok(parsed);
                }
            }
            return Err(TransportError::Http(format!(
                "HTTP {}: {body}",
                status.as_u16()
            )));
        }

        Ok(serde_json::from_str::<JsonRpcResponse>(&body)?)
    }

    fn url(&self) -> &str {
        &self.url
    }
}
