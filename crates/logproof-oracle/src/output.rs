//! The output boundary: one byte string per invocation.

use std::fmt;

use logproof_core::{ErrorReport, OracleError, Variant, Verdict};
use logproof_evm::{decode_verdict, encode_verdict};

/// What a run hands back: an ABI-encoded verdict or a tagged error string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OracleOutput {
    Verdict(Verdict),
    Error(ErrorReport),
}

impl From<Result<Verdict, OracleError>> for OracleOutput {
    fn from(result: Result<Verdict, OracleError>) -> Self {
        match result {
            Ok(v) => Self::Verdict(v),
            Err(e) => Self::Error(e.report()),
        }
    }
}

impl OracleOutput {
    pub fn is_error(&self) -> bool {
        matches!(self, Self::Error(_))
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        match self {
            Self::Verdict(v) => encode_verdict(v),
            Self::Error(report) => report.to_string().into_bytes(),
        }
    }

    pub fn into_bytes(self) -> Vec<u8> {
        match self {
            Self::Verdict(v) => encode_verdict(&v),
            Self::Error(report) => report.into_bytes(),
        }
    }

    pub fn to_hex(&self) -> String {
        format!("0x{}", hex::encode(self.to_bytes()))
    }
}

impl fmt::Display for OracleOutput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Verdict(Verdict::Matched(b)) => write!(f, "{b}"),
            Self::Verdict(Verdict::BlockNumber(n)) => write!(f, "{n}"),
            Self::Verdict(Verdict::Hash(h)) => write!(f, "0x{}", hex::encode(h)),
            Self::Error(report) => write!(f, "{report}"),
        }
    }
}

/// Caller-side reading of an output.
///
/// ABI decoding for `variant` is attempted first; bytes that do not decode
/// are read as a tagged error string. `None` when they are neither.
pub fn classify(bytes: &[u8], variant: Variant) -> Option<OracleOutput> {
    decode_verdict(bytes, variant)
        .map(OracleOutput::Verdict)
        .or_else(|| ErrorReport::parse(bytes).map(OracleOutput::Error))
}
