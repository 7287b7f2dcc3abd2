//! Session configuration.
//!
//! A session names the definition file to load and, optionally, the
//! switching operations to apply to it in order.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::loader::Dialect;

/// Top-level session configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Config {
    #[serde(default)]
    pub general: GeneralConfig,
    pub network: NetworkSource,
    /// Written as single-key maps, e.g. `- toggle: sw3`
    #[serde(default, with = "serde_yaml::with::singleton_map_recursive")]
    pub operations: Vec<Operation>,
    /// Keep applying operations after one is rejected
    #[serde(default = "default_continue_on_rejection")]
    pub continue_on_rejection: bool,
}

fn default_continue_on_rejection() -> bool {
    true
}

/// Shared general configuration
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct GeneralConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub log_level: Option<String>,
}

/// Where the network definition comes from
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct NetworkSource {
    pub path: PathBuf,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dialect: Option<Dialect>,
}

/// A switching operation to apply to the loaded network
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum Operation {
    Toggle(String),
}

impl Operation {
    pub fn switch_name(&self) -> &str {
        match self {
            Operation::Toggle(name) => name,
        }
    }
}

/// Configuration validation errors
#[derive(Debug, thiserror::Error)]
pub enum ValidationError {
    #[error("Invalid general configuration: {0}")]
    InvalidGeneral(String),
    #[error("Invalid network configuration: {0}")]
    InvalidNetwork(String),
    #[error("Invalid operation: {0}")]
    InvalidOperation(String),
}

const LOG_LEVELS: [&str; 6] = ["off", "error", "warn", "info", "debug", "trace"];

impl Config {
    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if let Some(level) = &self.general.log_level {
            if !LOG_LEVELS.contains(&level.to_lowercase().as_str()) {
                return Err(ValidationError::InvalidGeneral(format!(
                    "unknown log_level '{}'",
                    level
                )));
            }
        }

        if self.network.path.as_os_str().is_empty() {
            return Err(ValidationError::InvalidNetwork(
                "network path cannot be empty".to_string(),
            ));
        }

        for (i, operation) in self.operations.iter().enumerate() {
            if operation.switch_name().trim().is_empty() {
                return Err(ValidationError::InvalidOperation(format!(
                    "operation {} names no switch",
                    i + 1
                )));
            }
        }

        Ok(())
    }

    /// Resolve a relative network path against the directory holding the
    /// configuration file
    pub fn resolve_paths(&mut self, config_path: &Path) {
        if self.network.path.is_relative() {
            if let Some(dir) = config_path.parent() {
                self.network.path = dir.join(&self.network.path);
            }
        }
    }

    /// The dialect to parse the network with
    pub fn dialect(&self) -> Dialect {
        self.network
            .dialect
            .unwrap_or_else(|| Dialect::from_path(&self.network.path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_session_config() {
        let yaml = r#"
general:
  log_level: debug
network:
  path: feeder/master.dss
operations:
  - toggle: sw3
  - toggle: "671692"
continue_on_rejection: false
"#;

        let config: Config = serde_yaml::from_str(yaml).unwrap();
        assert!(config.validate().is_ok());
        assert_eq!(config.general.log_level.as_deref(), Some("debug"));
        assert_eq!(config.dialect(), Dialect::Dss);
        assert_eq!(
            config.operations,
            vec![
                Operation::Toggle("sw3".to_string()),
                Operation::Toggle("671692".to_string())
            ]
        );
        assert!(!config.continue_on_rejection);
    }

    #[test]
    fn test_defaults() {
        let yaml = r#"
network:
  path: master.schg
"#;

        let config: Config = serde_yaml::from_str(yaml).unwrap();
        assert!(config.validate().is_ok());
        assert!(config.operations.is_empty());
        assert!(config.continue_on_rejection);
        assert_eq!(config.dialect(), Dialect::Plain);
    }

    #[test]
    fn test_explicit_dialect_wins() {
        let yaml = r#"
network:
  path: master.txt
  dialect: dss
"#;

        let config: Config = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.dialect(), Dialect::Dss);
    }

    #[test]
    fn test_validation_errors() {
        let yaml = r#"
network:
  path: ""
"#;
        let config: Config = serde_yaml::from_str(yaml).unwrap();
        assert!(matches!(config.validate(), Err(ValidationError::InvalidNetwork(_))));

        let yaml = r#"
general:
  log_level: loud
network:
  path: master.dss
"#;
        let config: Config = serde_yaml::from_str(yaml).unwrap();
        assert!(matches!(config.validate(), Err(ValidationError::InvalidGeneral(_))));

        let yaml = r#"
network:
  path: master.dss
operations:
  - toggle: "  "
"#;
        let config: Config = serde_yaml::from_str(yaml).unwrap();
        assert!(matches!(config.validate(), Err(ValidationError::InvalidOperation(_))));
    }

    #[test]
    fn test_operations_round_trip_as_maps() {
        let yaml = r#"
network:
  path: master.dss
operations:
  - toggle: sw3
"#;
        let config: Config = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.operations, vec![Operation::Toggle("sw3".to_string())]);

        let written = serde_yaml::to_string(&config).unwrap();
        assert!(written.contains("- toggle: sw3"));
    }

    #[test]
    fn test_resolve_paths() {
        let yaml = r#"
network:
  path: feeder/master.dss
"#;
        let mut config: Config = serde_yaml::from_str(yaml).unwrap();
        config.resolve_paths(Path::new("/etc/schg/session.yaml"));
        assert_eq!(config.network.path, PathBuf::from("/etc/schg/feeder/master.dss"));
    }
}
