//! Pipeline configuration.
//!
//! [`OracleConfig`] holds what one invocation is asked to verify: the host's
//! positional arguments plus secrets. [`EndpointConfig`] holds where to ask:
//! explorer and RPC URLs, the state accessor and the request timeout.

use std::collections::HashMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ArgumentError;
use crate::types::{BlockTag, Variant};

/// Secret holding the block-explorer API key.
pub const API_KEY_SECRET: &str = "BASE_SCAN_API_KEY";

/// Env var overriding [`EndpointConfig::explorer_url`].
pub const EXPLORER_URL_ENV: &str = "LOGPROOF_EXPLORER_URL";
/// Env var overriding [`EndpointConfig::rpc_url`].
pub const RPC_URL_ENV: &str = "LOGPROOF_RPC_URL";

/// Inputs of a single oracle invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OracleConfig {
    /// `args[0]`: first block of the range.
    pub from_block: BlockTag,
    /// `args[1]`: Solidity event declaration, e.g. `event Foo(uint256 indexed a)`.
    pub event_declaration: String,
    /// `args[2]`: contract that emitted the logs and exposes the state hash.
    pub target: String,
    /// `args[3]`, optional: last block of the range; `latest` when absent.
    pub to_block: BlockTag,
    /// Explorer API key; `None` is sent as an empty key.
    pub api_key: Option<String>,
    pub variant: Variant,
}

impl OracleConfig {
    /// Build from the host's positional `args` and `secrets`.
    ///
    /// `[0] fromBlock`, `[1] eventDeclaration`, `[2] target`, `[3] toBlock?`.
    /// Empty strings count as missing.
    pub fn from_args(
        args: &[String],
        secrets: &HashMap<String, String>,
        variant: Variant,
    ) -> Result<Self, ArgumentError> {
        let arg = |index: usize, name: &'static str| {
            args.get(index)
                .map(|s| s.trim())
                .filter(|s| !s.is_empty())
                .ok_or(ArgumentError::Missing { index, name })
        };

        let from_block = BlockTag::parse_arg("fromBlock", arg(0, "fromBlock")?)?;
        let event_declaration = arg(1, "eventSignatureDeclaration")?.to_string();
        let target = arg(2, "targetContractAddress")?;
        if !is_address(target) {
            return Err(ArgumentError::InvalidAddress(target.to_string()));
        }
        let to_block = match args.get(3).map(|s| s.trim()).filter(|s| !s.is_empty()) {
            Some(v) => BlockTag::parse_arg("toBlock", v)?,
            None => BlockTag::Latest,
        };

        Ok(Self {
            from_block,
            event_declaration,
            target: target.to_string(),
            to_block,
            api_key: secrets.get(API_KEY_SECRET).cloned(),
            variant,
        })
    }

    /// The key to send, empty when none is configured.
    pub fn api_key_or_empty(&self) -> &str {
        self.api_key.as_deref().unwrap_or("")
    }
}

/// `0x` followed by 40 hex digits.
pub fn is_address(s: &str) -> bool {
    s.strip_prefix("0x")
        .or_else(|| s.strip_prefix("0X"))
        .is_some_and(|h| h.len() == 40 && h.chars().all(|c| c.is_ascii_hexdigit()))
}

/// Where the pipeline sends its two requests.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EndpointConfig {
    /// Block-explorer `api` endpoint.
    #[serde(default = "default_explorer_url")]
    pub explorer_url: String,
    /// Chain JSON-RPC endpoint for the state hash read.
    #[serde(default = "default_rpc_url")]
    pub rpc_url: String,
    /// Zero-argument view function returning `bytes32`.
    #[serde(default = "default_state_accessor")]
    pub state_accessor: String,
    /// Per-request HTTP timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub request_timeout_secs: u64,
}

fn default_explorer_url() -> String {
    "https://api-sepolia.basescan.org/api".into()
}
fn default_rpc_url() -> String {
    "https://sepolia.base.org".into()
}
fn default_state_accessor() -> String {
    "stateHash()".into()
}
fn default_timeout_secs() -> u64 {
    30
}

impl Default for EndpointConfig {
    fn default() -> Self {
        Self {
            explorer_url: default_explorer_url(),
            rpc_url: default_rpc_url(),
            state_accessor: default_state_accessor(),
            request_timeout_secs: default_timeout_secs(),
        }
    }
}

impl EndpointConfig {
    /// Parse a YAML document; missing keys take their defaults.
    pub fn from_yaml_str(yaml: &str) -> Result<Self, ArgumentError> {
        let cfg: Self =
            serde_yaml::from_str(yaml).map_err(|e| ArgumentError::Endpoint(e.to_string()))?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn from_file(path: &Path) -> Result<Self, ArgumentError> {
        let text = std::fs::read_to_string(path)
            .map_err(|e| ArgumentError::Endpoint(format!("{}: {e}", path.display())))?;
        Self::from_yaml_str(&text)
    }

    /// Apply overrides from a variable lookup (normally `std::env::var`).
    pub fn with_overrides<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup(EXPLORER_URL_ENV) {
            self.explorer_url = url;
        }
        if let Some(url) = lookup(RPC_URL_ENV) {
            self.rpc_url = url;
        }
        self
    }

    pub fn validate(&self) -> Result<(), ArgumentError> {
        for (name, value) in [("explorer_url", &self.explorer_url), ("rpc_url", &self.rpc_url)] {
            let parsed = url::Url::parse(value)
                .map_err(|e| ArgumentError::Endpoint(format!("{name} '{value}': {e}")))?;
            if !matches!(parsed.scheme(), "http" | "https") {
                return Err(ArgumentError::Endpoint(format!(
                    "{name} '{value}': scheme must be http or https"
                )));
            }
        }
        if self.request_timeout_secs == 0 {
            return Err(ArgumentError::Endpoint(
                "request_timeout_secs must be positive".into(),
            ));
        }
        Ok(())
    }
}
