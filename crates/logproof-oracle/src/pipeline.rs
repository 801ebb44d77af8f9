//! The pipeline entry point.

use logproof_core::{
    EndpointConfig, LogQuery, LogSource, OracleConfig, OracleError, RpcTransport, Variant, Verdict,
};
use logproof_evm::normalizer::render_events;
use logproof_evm::{encode_canonical, parse_event_declaration, topic0, LogDecoder};

use crate::output::OracleOutput;
use crate::verifier::StateVerifier;

const DEFAULT_STATE_ACCESSOR: &str = "stateHash()";

/// One verification run over injected network capabilities.
///
/// ```ignore
/// let explorer = ExplorerClient::new(&endpoints.explorer_url, http_cfg.clone())?;
/// let rpc = HttpRpcClient::new(&endpoints.rpc_url, http_cfg)?;
/// let output = Pipeline::from_endpoints(&explorer, &rpc, &endpoints)
///     .execute(&config)
///     .await;
/// ```
pub struct Pipeline<'a> {
    source: &'a dyn LogSource,
    transport: &'a dyn RpcTransport,
    state_accessor: String,
}

impl<'a> Pipeline<'a> {
    pub fn new(source: &'a dyn LogSource, transport: &'a dyn RpcTransport) -> Self {
        Self {
            source,
            transport,
            state_accessor: DEFAULT_STATE_ACCESSOR.to_string(),
        }
    }

    pub fn from_endpoints(
        source: &'a dyn LogSource,
        transport: &'a dyn RpcTransport,
        endpoints: &EndpointConfig,
    ) -> Self {
        Self::new(source, transport).with_state_accessor(endpoints.state_accessor.clone())
    }

    /// Override the zero-argument `bytes32` view read in the verify stage.
    pub fn with_state_accessor(mut self, accessor: impl Into<String>) -> Self {
        self.state_accessor = accessor.into();
        self
    }

    /// Run every stage and convert the outcome into the output byte string.
    pub async fn execute(&self, config: &OracleConfig) -> OracleOutput {
        let result = self.run(config).await;
        if let Err(e) = &result {
            tracing::warn!(stage = %e.stage(), tag = e.stage().tag(), error = %e, "pipeline failed");
        }
        OracleOutput::from(result)
    }

    /// Run every stage, stopping at the first failure.
    pub async fn run(&self, config: &OracleConfig) -> Result<Verdict, OracleError> {
        // Setup
        let signature = parse_event_declaration(&config.event_declaration)?;
        let verifier = if config.variant.verifies() {
            Some(StateVerifier::new(self.transport, &self.state_accessor)?)
        } else {
            None
        };
        let topic = topic0(&signature.canonical());
        tracing::debug!(
            stage = "parse",
            signature = %signature,
            topic0 = %topic,
            variant = %config.variant,
            "event declaration parsed"
        );

        // Fetch
        let query = LogQuery {
            address: config.target.clone(),
            from_block: config.from_block,
            to_block: config.to_block,
            topic0: topic,
            api_key: config.api_key_or_empty().to_string(),
        };
        let raws = self.source.get_logs(&query).await?;
        tracing::debug!(stage = "fetch", logs = raws.len(), "logs fetched");

        // Decode
        let decoder = LogDecoder::new(signature)?;
        let events = decoder.decode_all(&raws)?;

        // Encode
        let type_info = decoder.type_info();
        let encoding =
            encode_canonical(&events, &type_info).map_err(|source| OracleError::Encode {
                source,
                events: events.len(),
                rendered: render_events(&events),
            })?;
        tracing::debug!(
            stage = "encode",
            ty = %encoding.type_string,
            hash = %encoding.hash_hex(),
            "sequence hashed"
        );

        // Verify
        let verdict = match verifier {
            None => Verdict::Hash(encoding.hash),
            Some(verifier) => {
                let matched = verifier.verify(&config.target, &encoding.hash).await?;
                match config.variant {
                    Variant::Block if matched => Verdict::BlockNumber(
                        events.iter().map(|e| e.block_number).max().unwrap_or(0),
                    ),
                    Variant::Block => Verdict::BlockNumber(0),
                    _ => Verdict::Matched(matched),
                }
            }
        };

        tracing::info!(
            target_contract = %config.target,
            logs = events.len(),
            verdict = ?verdict,
            "verification complete"
        );
        Ok(verdict)
    }
}
