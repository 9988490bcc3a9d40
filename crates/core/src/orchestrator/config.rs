//! Orchestrator configuration.

use serde::{Deserialize, Serialize};

/// Configuration for the batch orchestrator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrchestratorConfig {
    /// Width of the `=` rule logged before each item (0 = no rule).
    #[serde(default = "default_separator_width")]
    pub separator_width: usize,
}

fn default_separator_width() -> usize {
    60
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self {
            separator_width: default_separator_width(),
        }
    }
}

impl OrchestratorConfig {
    /// The separator line, if enabled.
    pub fn separator(&self) -> Option<String> {
        (self.separator_width > 0).then(|| "=".repeat(self.separator_width))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = OrchestratorConfig::default();
        assert_eq!(config.separator_width, 60);
        assert_eq!(config.separator().unwrap().len(), 60);
    }

    #[test]
    fn test_deserialize_minimal() {
        let config: OrchestratorConfig = toml::from_str("").unwrap();
        assert_eq!(config.separator_width, 60);
    }

    #[test]
    fn test_zero_width_disables_separator() {
        let config: OrchestratorConfig = toml::from_str("separator_width = 0").unwrap();
        assert!(config.separator().is_none());
    }
}
