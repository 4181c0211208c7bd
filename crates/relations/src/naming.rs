//! Naming strategies - default key names for relationships
//!
//! A naming strategy supplies the key names a relationship falls back to when
//! no explicit key is configured. Strategies are passed to relationships
//! explicitly so that tests and applications can substitute their own.

use std::str::FromStr;

use crate::config::{ConfigError, RelationConfig};
use crate::model::ModelDescriptor;
use crate::relationships::metadata::RelationshipType;

/// Contract for deriving default relationship keys
pub trait NamingStrategy: Send + Sync {
    /// Key on `model` that `related` points at
    fn relation_local_key(
        &self,
        relation: RelationshipType,
        model: &ModelDescriptor,
        related: &ModelDescriptor,
        relation_name: &str,
    ) -> String;

    /// Key on `related` that points back at `model`
    fn relation_foreign_key(
        &self,
        relation: RelationshipType,
        model: &ModelDescriptor,
        related: &ModelDescriptor,
        relation_name: &str,
    ) -> String;
}

/// Foreign key naming conventions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ForeignKeyConvention {
    /// model_id (e.g., user_id)
    Underscore,
    /// modelId (camelCase)
    CamelCase,
    /// modelID (PascalCase with ID suffix)
    PascalCase,
    /// Custom pattern with {model} placeholder
    Custom(&'static str),
}

impl FromStr for ForeignKeyConvention {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "underscore" | "snake" | "snake_case" => Ok(ForeignKeyConvention::Underscore),
            "camel" | "camelcase" => Ok(ForeignKeyConvention::CamelCase),
            "pascal" | "pascalcase" => Ok(ForeignKeyConvention::PascalCase),
            _ => Err(ConfigError::InvalidValue {
                field: "foreign_key_convention".to_string(),
                value: s.to_string(),
                expected: "underscore, camel or pascal".to_string(),
            }),
        }
    }
}

/// Default strategy: local keys are the model's primary key, foreign keys
/// are derived from the model name and primary key using a convention.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConventionalNamingStrategy {
    convention: ForeignKeyConvention,
}

impl Default for ConventionalNamingStrategy {
    fn default() -> Self {
        Self::new(ForeignKeyConvention::Underscore)
    }
}

impl From<&RelationConfig> for ConventionalNamingStrategy {
    fn from(config: &RelationConfig) -> Self {
        Self::new(config.foreign_key_convention)
    }
}

impl ConventionalNamingStrategy {
    pub fn new(convention: ForeignKeyConvention) -> Self {
        Self { convention }
    }

    pub fn convention(&self) -> ForeignKeyConvention {
        self.convention
    }

    /// Foreign key name for a model, e.g. `CarOwner` + `id` -> `car_owner_id`
    pub fn foreign_key_for(&self, model: &ModelDescriptor) -> String {
        let base = to_snake_case(model.name());
        let key = model.primary_key();

        match self.convention {
            ForeignKeyConvention::Underscore => format!("{}_{}", base, to_snake_case(key)),
            ForeignKeyConvention::CamelCase => to_camel_case(&format!("{}_{}", base, key)),
            ForeignKeyConvention::PascalCase => {
                format!("{}{}", to_pascal_case(&base), key.to_uppercase())
            }
            ForeignKeyConvention::Custom(pattern) => pattern.replace("{model}", &base),
        }
    }
}

impl NamingStrategy for ConventionalNamingStrategy {
    fn relation_local_key(
        &self,
        _relation: RelationshipType,
        model: &ModelDescriptor,
        _related: &ModelDescriptor,
        _relation_name: &str,
    ) -> String {
        model.primary_key().to_string()
    }

    fn relation_foreign_key(
        &self,
        _relation: RelationshipType,
        model: &ModelDescriptor,
        _related: &ModelDescriptor,
        _relation_name: &str,
    ) -> String {
        self.foreign_key_for(model)
    }
}

/// Convert to snake_case
pub fn to_snake_case(s: &str) -> String {
    let mut result = String::with_capacity(s.len() + 4);
    let mut prev_lower_or_digit = false;

    for c in s.chars() {
        if c.is_uppercase() {
            if prev_lower_or_digit {
                result.push('_');
            }
            result.extend(c.to_lowercase());
            prev_lower_or_digit = false;
        } else if c == '-' || c == ' ' {
            result.push('_');
            prev_lower_or_digit = false;
        } else {
            result.push(c);
            prev_lower_or_digit = c.is_lowercase() || c.is_ascii_digit();
        }
    }

    result
}

/// Convert to camelCase
pub fn to_camel_case(s: &str) -> String {
    let parts: Vec<&str> = s.split('_').collect();
    if parts.is_empty() {
        return s.to_string();
    }

    let mut result = parts[0].to_lowercase();
    for part in &parts[1..] {
        let mut chars = part.chars();
        if let Some(first) = chars.next() {
            result.extend(first.to_uppercase());
            result.extend(chars.flat_map(|c| c.to_lowercase()));
        }
    }

    result
}

/// Convert to PascalCase
pub fn to_pascal_case(s: &str) -> String {
    let camel = to_camel_case(s);
    let mut chars = camel.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => camel,
    }
}
