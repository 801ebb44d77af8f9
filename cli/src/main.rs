//! logproof CLI: plays the oracle host for one verification run.
//!
//! # Commands
//! ```text
//! logproof run           <fromBlock> <event> <target> [toBlock] --variant bool|block|hash
//! logproof parse         <event>
//! logproof decode-output <hex> --variant bool|block|hash
//! ```

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use logproof_core::Variant;
use logproof_observability::{init_tracing, LogConfig};

mod cmd_decode;
mod cmd_parse;
mod cmd_run;

#[derive(Parser)]
#[command(
    name = "logproof",
    about = "Verify that a contract's on-chain state hash commits to its emitted logs",
    long_about = "
logproof fetches every log of one event from a block explorer, ABI-encodes the
decoded sequence as tuple(...)[] and compares its keccak-256 with the value the
contract reports from its state accessor.

ENVIRONMENT VARIABLES:
  BASE_SCAN_API_KEY       Explorer API key (sent empty when unset)
  LOGPROOF_EXPLORER_URL   Explorer getLogs endpoint
  LOGPROOF_RPC_URL        JSON-RPC endpoint for the state read
  RUST_LOG                Log filter, overrides -v
",
    version
)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Emit logs as JSON lines on stderr
    #[arg(long, global = true)]
    json_logs: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the verification pipeline and print the output bytes
    Run {
        /// First block of the range: number or 'earliest'
        from_block: String,
        /// Solidity event declaration, e.g. "event Transfer(address indexed from, address indexed to, uint256 value)"
        event: String,
        /// Contract that emitted the logs and exposes the state hash
        target: String,
        /// Last block of the range: number or 'latest' (default)
        to_block: Option<String>,
        /// Which answer to return
        #[arg(long, default_value = "bool")]
        variant: Variant,
        /// YAML endpoint configuration file
        #[arg(long)]
        config: Option<PathBuf>,
        /// Explorer getLogs endpoint (overrides config and env)
        #[arg(long)]
        explorer: Option<String>,
        /// JSON-RPC endpoint (overrides config and env)
        #[arg(long)]
        rpc: Option<String>,
        /// Zero-argument bytes32 view to compare against, e.g. "stateHash()"
        #[arg(long)]
        accessor: Option<String>,
    },

    /// Parse an event declaration and show its signature and topic0
    Parse {
        event: String,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Interpret an oracle output: ABI verdict or tagged error
    #[command(name = "decode-output")]
    DecodeOutput {
        /// Output bytes as 0x-prefixed hex
        hex: String,
        #[arg(long, default_value = "bool")]
        variant: Variant,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_config = LogConfig {
        json: cli.json_logs,
        ..LogConfig::from_verbosity(cli.verbose)
    };
    if let Err(e) = init_tracing(&log_config) {
        eprintln!("warning: logging disabled: {e}");
    }

    match cli.command {
        Commands::Run {
            from_block,
            event,
            target,
            to_block,
            variant,
            config,
            explorer,
            rpc,
            accessor,
        } => {
            let mut args = vec![from_block, event, target];
            args.extend(to_block);
            let overrides = cmd_run::EndpointOverrides {
                config,
                explorer,
                rpc,
                accessor,
            };
            cmd_run::run(&args, variant, overrides).await
        }

        Commands::Parse { event, json } => cmd_parse::run(&event, json),

        Commands::DecodeOutput { hex, variant } => cmd_decode::run(&hex, variant),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn run_accepts_optional_to_block_and_variant() {
        let cli = Cli::try_parse_from([
            "logproof",
            "run",
            "100",
            "event Transfer(address indexed from, address indexed to, uint256 value)",
            "0x5FbDB2315678afecb367f032d93F642f64180aa3",
            "--variant",
            "block",
        ])
        .unwrap();
        match cli.command {
            Commands::Run {
                to_block, variant, ..
            } => {
                assert_eq!(to_block, None);
                assert_eq!(variant, Variant::Block);
            }
            _ => panic!("expected run"),
        }
    }

    #[test]
    fn unknown_variant_is_rejected() {
        assert!(Cli::try_parse_from(["logproof", "decode-output", "0x", "--variant", "maybe"]).is_err());
    }

    #[test]
    fn verbosity_counts() {
        let cli = Cli::try_parse_from(["logproof", "-vv", "parse", "event A()"]).unwrap();
        assert_eq!(cli.verbose, 2);
        assert!(!cli.json_logs);
    }
}
