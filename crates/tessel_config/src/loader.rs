//! Configuration file loading and validation.

use crate::error::ConfigError;
use crate::types::TesselConfig;
use std::collections::HashSet;
use std::path::Path;

/// The file name looked up by [`load_config`].
pub const CONFIG_FILE_NAME: &str = "tessel.toml";

/// Loads and validates `tessel.toml` from a directory.
pub fn load_config(dir: &Path) -> Result<TesselConfig, ConfigError> {
    let content = std::fs::read_to_string(dir.join(CONFIG_FILE_NAME))?;
    load_config_from_str(&content)
}

/// Parses and validates a configuration from a string.
pub fn load_config_from_str(content: &str) -> Result<TesselConfig, ConfigError> {
    let config: TesselConfig =
        toml::from_str(content).map_err(|e| ConfigError::ParseError(e.to_string()))?;
    validate_config(&config)?;
    Ok(config)
}

fn validate_config(config: &TesselConfig) -> Result<(), ConfigError> {
    if config.layout.unit <= 0 {
        return Err(ConfigError::ValidationError(format!(
            "layout.unit must be positive, got {}",
            config.layout.unit
        )));
    }
    let mut seen = HashSet::new();
    for rule in &config.rules.input {
        if rule.port.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "rules.input entry with empty port".to_string(),
            ));
        }
        if !seen.insert(rule.port.as_str()) {
            return Err(ConfigError::ValidationError(format!(
                "duplicate input rule for port '{}'",
                rule.port
            )));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::RangeOrder;

    #[test]
    fn empty_config_uses_defaults() {
        let config = load_config_from_str("").unwrap();
        assert_eq!(config.layout.unit, 8);
        assert_eq!(config.labels.range_order, RangeOrder::Preserve);
        assert!(config.rules.enabled);
        assert!(config.rules.input.is_empty());
    }

    #[test]
    fn parse_full_config() {
        let toml = r#"
[layout]
unit = 10

[labels]
range_order = "normalize"

[rules]
enabled = false

[[rules.input]]
port = "clk"
pin = "21"

[[rules.input]]
port = "rst"
pin = "NULL"
"#;
        let config = load_config_from_str(toml).unwrap();
        assert_eq!(config.layout.unit, 10);
        assert_eq!(config.labels.range_order, RangeOrder::Normalize);
        assert!(!config.rules.enabled);
        assert_eq!(config.rules.input.len(), 2);
        assert_eq!(config.rules.input[0].port, "clk");
        assert_eq!(config.rules.input[1].pin, "NULL");
    }

    #[test]
    fn zero_unit_rejected() {
        let err = load_config_from_str("[layout]\nunit = 0\n").unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError(_)));
    }

    #[test]
    fn unknown_range_order_rejected() {
        let err = load_config_from_str("[labels]\nrange_order = \"sideways\"\n").unwrap_err();
        assert!(matches!(err, ConfigError::ParseError(_)));
    }

    #[test]
    fn duplicate_rule_rejected() {
        let toml = r#"
[[rules.input]]
port = "clk"
pin = "21"

[[rules.input]]
port = "clk"
pin = "35"
"#;
        let err = load_config_from_str(toml).unwrap_err();
        assert!(err.to_string().contains("duplicate input rule"));
    }

    #[test]
    fn empty_rule_port_rejected() {
        let err = load_config_from_str("[[rules.input]]\nport = \" \"\npin = \"1\"\n").unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError(_)));
    }

    #[test]
    fn invalid_toml_errors() {
        let err = load_config_from_str("this is not valid toml {{{}}}").unwrap_err();
        assert!(matches!(err, ConfigError::ParseError(_)));
    }

    #[test]
    fn load_from_directory() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(CONFIG_FILE_NAME), "[layout]\nunit = 16\n").unwrap();
        let config = load_config(dir.path()).unwrap();
        assert_eq!(config.layout.unit, 16);
    }

    #[test]
    fn io_error_from_nonexistent_dir() {
        let err = load_config(Path::new("/nonexistent/dir")).unwrap_err();
        assert!(matches!(err, ConfigError::IoError(_)));
    }
}
