//! Gateway configuration.

use serde::{Deserialize, Serialize};

/// Where Reset and ResetAll take their "factory settings" from.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResetSource {
    /// The defaults declared on each node.
    #[default]
    Declared,
    /// The snapshot captured once startup finished.
    ///
    /// Nodes missing from the baseline fall back to their declared default.
    Baseline,
}

/// Settings for a [`ResetGateway`](crate::ResetGateway).
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResetConfig {
    /// Where Reset and ResetAll restore from.
    pub reset_source: ResetSource,
}

impl ResetConfig {
    /// Set the reset source (builder pattern).
    pub fn with_reset_source(mut self, source: ResetSource) -> Self {
        self.reset_source = source;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_defaults_to_declared() {
        let config: ResetConfig = serde_json::from_value(json!({})).unwrap();
        assert_eq!(config.reset_source, ResetSource::Declared);
    }

    #[test]
    fn test_baseline_from_json() {
        let config: ResetConfig =
            serde_json::from_value(json!({"reset_source": "baseline"})).unwrap();
        assert_eq!(config, ResetConfig::default().with_reset_source(ResetSource::Baseline));
    }
}
