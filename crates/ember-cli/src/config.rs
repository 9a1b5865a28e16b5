//! CLI configuration management

use crate::error::CliError;
use ember_evm::EvmConfig;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Config file looked up in the working directory when `--config` is absent
pub const DEFAULT_CONFIG_FILE: &str = "ember.toml";

/// CLI configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CliConfig {
    /// Log level used when `RUST_LOG` is unset
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// Interpreter limits
    #[serde(default)]
    pub evm: EvmConfig,
    /// Stop fixture runs at the first failure
    #[serde(default)]
    pub fail_fast: bool,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            evm: EvmConfig::default(),
            fail_fast: false,
        }
    }
}

impl CliConfig {
    /// Load from `path`, else `./ember.toml` if present, else defaults
    pub fn load(path: Option<&Path>) -> Result<Self, CliError> {
        match path {
            Some(path) => Self::from_file(path),
            None => {
                let path = Path::new(DEFAULT_CONFIG_FILE);
                if path.exists() {
                    Self::from_file(path)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }

    /// Load config from a TOML file
    pub fn from_file(path: &Path) -> Result<Self, CliError> {
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content)
            .map_err(|e| CliError::Config(format!("{}: {}", path.display(), e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_config_default() {
        let config = CliConfig::default();
        assert_eq!(config.log_level, "info");
        assert_eq!(config.evm, EvmConfig::default());
        assert!(!config.fail_fast);
    }

    #[test]
    fn test_config_deserialize() {
        let toml = r#"
            log_level = "debug"
            fail_fast = true

            [evm]
            max_call_depth = 8
        "#;
        let config: CliConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.log_level, "debug");
        assert!(config.fail_fast);
        assert_eq!(config.evm.max_call_depth, 8);
        assert_eq!(
            config.evm.max_memory_bytes,
            EvmConfig::default().max_memory_bytes
        );
    }

    #[test]
    fn test_config_empty_is_default() {
        let config: CliConfig = toml::from_str("").unwrap();
        assert_eq!(config.log_level, "info");
        assert_eq!(config.evm, EvmConfig::default());
    }

    #[test]
    fn test_config_serialize() {
        let toml = toml::to_string(&CliConfig::default()).unwrap();
        assert!(toml.contains("log_level"));
        assert!(toml.contains("max_call_depth"));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "log_level = \"warn\"").unwrap();
        let config = CliConfig::load(Some(file.path())).unwrap();
        assert_eq!(config.log_level, "warn");
    }

    #[test]
    fn test_load_invalid_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "log_level = [").unwrap();
        let err = CliConfig::load(Some(file.path())).unwrap_err();
        assert!(matches!(err, CliError::Config(_)));
    }

    #[test]
    fn test_load_missing_file() {
        let err = CliConfig::load(Some(Path::new("/nonexistent/ember.toml"))).unwrap_err();
        assert!(matches!(err, CliError::Io(_)));
    }
}
