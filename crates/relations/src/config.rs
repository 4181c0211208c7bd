//! Relationship configuration loaded from the environment

use std::env;
use std::str::FromStr;
use thiserror::Error;

use crate::naming::ForeignKeyConvention;

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid value for {field}: {value}, expected {expected}")]
    InvalidValue {
        field: String,
        value: String,
        expected: String,
    },

    #[error("Validation failed for {field}: {reason}")]
    ValidationFailed { field: String, reason: String },
}

/// Settings shared by every relationship definition
#[derive(Debug, Clone, PartialEq)]
pub struct RelationConfig {
    /// Boot relationships on first key-dependent access instead of failing
    pub auto_boot: bool,
    /// Convention used by the default naming strategy for foreign keys
    pub foreign_key_convention: ForeignKeyConvention,
}

impl Default for RelationConfig {
    fn default() -> Self {
        Self {
            auto_boot: true,
            foreign_key_convention: ForeignKeyConvention::Underscore,
        }
    }
}

impl RelationConfig {
    /// Load configuration from `ELIF_RELATIONS_*` environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        let auto_boot = get_env_or_default("ELIF_RELATIONS_AUTO_BOOT", "true");
        let auto_boot = parse_bool("auto_boot", &auto_boot)?;

        let convention = get_env_or_default("ELIF_RELATIONS_FOREIGN_KEY_CONVENTION", "underscore");
        let foreign_key_convention = ForeignKeyConvention::from_str(&convention)?;

        let config = Self {
            auto_boot,
            foreign_key_convention,
        };
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let ForeignKeyConvention::Custom(pattern) = self.foreign_key_convention {
            if !pattern.contains("{model}") {
                return Err(ConfigError::ValidationFailed {
                    field: "foreign_key_convention".to_string(),
                    reason: "custom pattern must contain a {model} placeholder".to_string(),
                });
            }
        }
        Ok(())
    }
}

fn get_env_or_default(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

fn parse_bool(field: &str, value: &str) -> Result<bool, ConfigError> {
    match value.to_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Ok(true),
        "false" | "0" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::InvalidValue {
            field: field.to_string(),
            value: value.to_string(),
            expected: "true or false".to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    fn clear_env() {
        env::remove_var("ELIF_RELATIONS_AUTO_BOOT");
        env::remove_var("ELIF_RELATIONS_FOREIGN_KEY_CONVENTION");
    }

    #[test]
    #[serial]
    fn test_defaults_when_env_is_empty() {
        clear_env();
        let config = RelationConfig::from_env().unwrap();
        assert_eq!(config, RelationConfig::default());
    }

    #[test]
    #[serial]
    fn test_reads_env_overrides() {
        clear_env();
        env::set_var("ELIF_RELATIONS_AUTO_BOOT", "off");
        env::set_var("ELIF_RELATIONS_FOREIGN_KEY_CONVENTION", "camel");

        let config = RelationConfig::from_env().unwrap();
        assert!(!config.auto_boot);
        assert_eq!(config.foreign_key_convention, ForeignKeyConvention::CamelCase);

        clear_env();
    }

    #[test]
    #[serial]
    fn test_rejects_invalid_values() {
        clear_env();
        env::set_var("ELIF_RELATIONS_AUTO_BOOT", "sometimes");
        assert!(matches!(
            RelationConfig::from_env(),
            Err(ConfigError::InvalidValue { .. })
        ));

        env::set_var("ELIF_RELATIONS_AUTO_BOOT", "true");
        env::set_var("ELIF_RELATIONS_FOREIGN_KEY_CONVENTION", "kebab");
        assert!(matches!(
            RelationConfig::from_env(),
            Err(ConfigError::InvalidValue { .. })
        ));

        clear_env();
    }

    #[test]
    fn test_custom_pattern_requires_placeholder() {
        let config = RelationConfig {
            auto_boot: true,
            foreign_key_convention: ForeignKeyConvention::Custom("fk_model"),
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::ValidationFailed { .. })
        ));

        let config = RelationConfig {
            auto_boot: true,
            foreign_key_convention: ForeignKeyConvention::Custom("fk_{model}"),
        };
        assert!(config.validate().is_ok());
    }
}
