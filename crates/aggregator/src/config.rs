//! Service configuration

use anyhow::Result;
use serde::Deserialize;

/// Aggregator service configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AggregatorConfig {
    /// Port for the aggregation and report endpoints
    #[serde(default = "default_api_port")]
    pub api_port: u16,

    /// Emit human-readable logs instead of JSON
    #[serde(default)]
    pub pretty_logs: bool,
}

fn default_api_port() -> u16 {
    9090
}

impl Default for AggregatorConfig {
    fn default() -> Self {
        Self {
            api_port: default_api_port(),
            pretty_logs: false,
        }
    }
}

impl AggregatorConfig {
    /// Load configuration from the environment (`AGGREGATOR_` prefix)
    pub fn load() -> Result<Self> {
        let config = config::Config::builder()
            .add_source(config::Environment::with_prefix("AGGREGATOR"))
            .build()?;

        Ok(config.try_deserialize().unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AggregatorConfig::default();
        assert_eq!(config.api_port, 9090);
        assert!(!config.pretty_logs);
    }
}
