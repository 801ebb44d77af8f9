//! `logproof decode-output`: classify an output the way a caller would.

use anyhow::{bail, Context, Result};
use logproof_core::Variant;
use logproof_oracle::{classify, OracleOutput};

pub fn run(hex_str: &str, variant: Variant) -> Result<()> {
    let bytes = hex::decode(hex_str.strip_prefix("0x").unwrap_or(hex_str))
        .context("invalid output hex")?;

    match classify(&bytes, variant) {
        Some(out @ OracleOutput::Verdict(_)) => println!("verdict ({variant}): {out}"),
        Some(OracleOutput::Error(report)) => println!(
            "error at stage {} (tag {}): {}",
            report.stage,
            report.stage.tag(),
            report.details
        ),
        None => bail!("{} bytes are neither a {variant} verdict nor a tagged error", bytes.len()),
    }
    Ok(())
}
