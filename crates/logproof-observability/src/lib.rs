//! # logproof-observability
//!
//! Logging setup for the logproof binaries. Logs go to stderr so stdout only
//! ever carries the oracle output; levels are configurable per component and
//! the format is either human-readable text or JSON lines.

pub mod tracing_setup;

pub use tracing_setup::{init_tracing, LogConfig};
