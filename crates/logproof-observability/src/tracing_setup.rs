//! Subscriber setup: filter directives plus a text or JSON formatter on stderr.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing_subscriber::util::TryInitError;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Logging settings for one process.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogConfig {
    /// Level for everything not listed in `components`.
    #[serde(default = "default_level")]
    pub level: String,
    /// Crate name (dashes allowed) to level.
    #[serde(default)]
    pub components: BTreeMap<String, String>,
    /// One JSON object per line instead of human-readable text.
    #[serde(default)]
    pub json: bool,
}

fn default_level() -> String {
    "warn".to_string()
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_level(),
            components: BTreeMap::new(),
            json: false,
        }
    }
}

impl LogConfig {
    /// Map `-v` counts onto the global level.
    pub fn from_verbosity(verbose: u8) -> Self {
        let level = match verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        };
        Self {
            level: level.into(),
            ..Self::default()
        }
    }

    pub fn with_component(mut self, component: &str, level: &str) -> Self {
        self.components.insert(component.into(), level.into());
        self
    }

    /// `EnvFilter` directives: `"warn,logproof_oracle=debug"` etc.
    pub fn directives(&self) -> String {
        let mut directives = self.level.clone();
        for (component, level) in &self.components {
            directives.push_str(&format!(",{}={}", component.replace('-', "_"), level));
        }
        directives
    }
}

/// Install the global subscriber. `RUST_LOG`, when set, wins over `config`.
///
/// Fails if a global subscriber is already installed.
pub fn init_tracing(config: &LogConfig) -> Result<(), TryInitError> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.directives()))
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    if config.json {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .try_init()
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().with_writer(std::io::stderr))
            .try_init()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn directives_include_components() {
        let cfg = LogConfig::from_verbosity(1)
            .with_component("logproof-oracle", "debug")
            .with_component("logproof-http", "trace");
        assert_eq!(
            cfg.directives(),
            "info,logproof_http=trace,logproof_oracle=debug"
        );
    }

    #[test]
    fn verbosity_levels() {
        assert_eq!(LogConfig::from_verbosity(0).level, "warn");
        assert_eq!(LogConfig::from_verbosity(2).level, "debug");
        assert_eq!(LogConfig::from_verbosity(9).level, "trace");
    }

    #[test]
    fn yaml_defaults() {
        let cfg: LogConfig = serde_yaml::from_str("json: true").unwrap();
        assert_eq!(cfg.level, "warn");
        assert!(cfg.json);
        assert!(cfg.components.is_empty());
    }
}
