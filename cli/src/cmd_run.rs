//! `logproof run`: one oracle invocation against live endpoints.

use anyhow::{Context, Result};
use std::collections::HashMap;
use std::path::PathBuf;

use logproof_core::{EndpointConfig, OracleConfig, OracleError, RpcError, Variant, API_KEY_SECRET};
use logproof_http::{ExplorerClient, HttpClientConfig, HttpRpcClient};
use logproof_oracle::{OracleOutput, Pipeline};

/// Endpoint settings given on the command line; each wins over env and file.
pub struct EndpointOverrides {
    pub config: Option<PathBuf>,
    pub explorer: Option<String>,
    pub rpc: Option<String>,
    pub accessor: Option<String>,
}

impl EndpointOverrides {
    /// file (or defaults) → `LOGPROOF_*` env → flags.
    fn resolve(self) -> Result<EndpointConfig> {
        let base = match &self.config {
            Some(path) => EndpointConfig::from_file(path)?,
            None => EndpointConfig::default(),
        };
        let mut endpoints = base.with_overrides(|key| std::env::var(key).ok());
        if let Some(url) = self.explorer {
            endpoints.explorer_url = url;
        }
        if let Some(url) = self.rpc {
            endpoints.rpc_url = url;
        }
        if let Some(accessor) = self.accessor {
            endpoints.state_accessor = accessor;
        }
        endpoints.validate()?;
        Ok(endpoints)
    }
}

/// Secrets the host would inject; only the explorer key is read.
fn secrets_from_env() -> HashMap<String, String> {
    std::env::var(API_KEY_SECRET)
        .ok()
        .map(|key| HashMap::from([(API_KEY_SECRET.to_string(), key)]))
        .unwrap_or_default()
}

/// A client that cannot be built fails the stage that would have used it.
fn explorer_client(
    endpoints: &EndpointConfig,
    http: HttpClientConfig,
) -> Result<ExplorerClient, OracleError> {
    Ok(ExplorerClient::new(endpoints.explorer_url.clone(), http)?)
}

fn rpc_client(
    endpoints: &EndpointConfig,
    http: HttpClientConfig,
) -> Result<HttpRpcClient, OracleError> {
    HttpRpcClient::new(endpoints.rpc_url.clone(), http).map_err(|e| RpcError::from(e).into())
}

/// Every failure past endpoint resolution ends up as a tagged report.
async fn verify(
    args: &[String],
    secrets: &HashMap<String, String>,
    variant: Variant,
    endpoints: &EndpointConfig,
    http: HttpClientConfig,
) -> OracleOutput {
    let prepared = OracleConfig::from_args(args, secrets, variant)
        .map_err(OracleError::from)
        .and_then(|config| {
            let explorer = explorer_client(endpoints, http.clone())?;
            let rpc = rpc_client(endpoints, http)?;
            Ok((config, explorer, rpc))
        });
    let (config, explorer, rpc) = match prepared {
        Ok(parts) => parts,
        Err(e) => return OracleOutput::from(Err(e)),
    };

    tracing::info!(
        explorer = %explorer.base_url(),
        rpc = %endpoints.rpc_url,
        variant = %variant,
        "starting verification"
    );
    Pipeline::from_endpoints(&explorer, &rpc, endpoints)
        .execute(&config)
        .await
}

pub async fn run(args: &[String], variant: Variant, overrides: EndpointOverrides) -> Result<()> {
    let endpoints = overrides.resolve().context("endpoint configuration")?;
    let http = HttpClientConfig::with_timeout_secs(endpoints.request_timeout_secs);
    let output = verify(args, &secrets_from_env(), variant, &endpoints, http).await;

    println!("{}", output.to_hex());
    match &output {
        OracleOutput::Error(report) => {
            eprintln!("✗ {report}");
            std::process::exit(1);
        }
        OracleOutput::Verdict(_) => eprintln!("✓ {variant}: {output}"),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args() -> Vec<String> {
        vec![
            "100".into(),
            "event Transfer(address indexed from, address indexed to, uint256 value)".into(),
            "0x5FbDB2315678afecb367f032d93F642f64180aa3".into(),
        ]
    }

    /// reqwest refuses a header value containing a newline.
    fn unbuildable() -> HttpClientConfig {
        HttpClientConfig {
            user_agent: "logproof\nbroken".into(),
            ..HttpClientConfig::default()
        }
    }

    #[tokio::test]
    async fn explorer_client_failure_is_tagged_two() {
        let out = verify(
            &args(),
            &HashMap::new(),
            Variant::Bool,
            &EndpointConfig::default(),
            unbuildable(),
        )
        .await;
        assert!(out.is_error());
        assert!(out.to_string().starts_with("2: "), "{out}");
    }

    #[test]
    fn rpc_client_failure_is_tagged_five() {
        let err = rpc_client(&EndpointConfig::default(), unbuildable())
            .err()
            .expect("client build should fail");
        let out = OracleOutput::from(Err(err));
        assert!(out.to_string().starts_with("5: "), "{out}");
    }

    #[tokio::test]
    async fn bad_arguments_win_over_client_failures() {
        let out = verify(
            &["100".to_string()],
            &HashMap::new(),
            Variant::Bool,
            &EndpointConfig::default(),
            unbuildable(),
        )
        .await;
        assert!(out.to_string().starts_with("1: "), "{out}");
    }
}
