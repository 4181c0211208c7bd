//! Relationship metadata - relation kinds, options and resolved keys

use std::fmt;
use serde::{Deserialize, Serialize};

use crate::model::ModelRef;
use super::has_one_through::QueryHook;

/// Kind tag passed to naming strategies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RelationshipType {
    /// One related model reached through an intermediate model
    HasOneThrough,
}

impl RelationshipType {
    pub fn as_str(self) -> &'static str {
        match self {
            RelationshipType::HasOneThrough => "hasOneThrough",
        }
    }
}

impl fmt::Display for RelationshipType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Explicit key overrides. Unset (or empty) keys fall back to the naming strategy.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyOverrides {
    pub local_key: Option<String>,
    pub foreign_key: Option<String>,
    pub through_local_key: Option<String>,
    pub through_foreign_key: Option<String>,
}

/// Options for a relationship reaching its related model through another model
#[derive(Clone)]
pub struct ThroughRelationOptions {
    pub through: ModelRef,
    pub keys: KeyOverrides,
    pub serialize_as: Option<String>,
    pub on_query: Option<QueryHook>,
}

impl ThroughRelationOptions {
    pub fn new(through: impl Into<ModelRef>) -> Self {
        Self {
            through: through.into(),
            keys: KeyOverrides::default(),
            serialize_as: None,
            on_query: None,
        }
    }

    /// Key on the parent model
    pub fn local_key(mut self, key: &str) -> Self {
        self.keys.local_key = Some(key.to_string());
        self
    }

    /// Key on the through model pointing at the parent
    pub fn foreign_key(mut self, key: &str) -> Self {
        self.keys.foreign_key = Some(key.to_string());
        self
    }

    /// Key on the through model the related model points at
    pub fn through_local_key(mut self, key: &str) -> Self {
        self.keys.through_local_key = Some(key.to_string());
        self
    }

    /// Key on the related model pointing at the through model
    pub fn through_foreign_key(mut self, key: &str) -> Self {
        self.keys.through_foreign_key = Some(key.to_string());
        self
    }

    pub fn serialize_as(mut self, alias: &str) -> Self {
        self.serialize_as = Some(alias.to_string());
        self
    }

    /// Hook invoked on every query built for the relationship
    pub fn on_query(mut self, hook: QueryHook) -> Self {
        self.on_query = Some(hook);
        self
    }
}

impl fmt::Debug for ThroughRelationOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ThroughRelationOptions")
            .field("keys", &self.keys)
            .field("serialize_as", &self.serialize_as)
            .field("on_query", &if self.on_query.is_some() { "Some" } else { "None" })
            .finish()
    }
}

/// A key resolved against its model: attribute name plus physical column
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedKey {
    pub attribute: String,
    pub column: String,
}

/// The four keys binding parent -> through -> related
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThroughKeys {
    /// On the parent model
    pub local_key: ResolvedKey,
    /// On the through model, matches `local_key`
    pub foreign_key: ResolvedKey,
    /// On the through model
    pub through_local_key: ResolvedKey,
    /// On the related model, matches `through_local_key`
    pub through_foreign_key: ResolvedKey,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ModelDescriptor;

    #[test]
    fn test_relationship_type_tag() {
        assert_eq!(RelationshipType::HasOneThrough.to_string(), "hasOneThrough");
        assert_eq!(
            serde_json::to_value(RelationshipType::HasOneThrough).unwrap(),
            serde_json::json!("hasOneThrough")
        );
    }

    #[test]
    fn test_options_builder() {
        let options = ThroughRelationOptions::new(ModelDescriptor::new("Car", "cars"))
            .local_key("uuid")
            .foreign_key("mechanicUuid")
            .through_local_key("id")
            .through_foreign_key("carId")
            .serialize_as("owner");

        assert_eq!(options.keys.local_key.as_deref(), Some("uuid"));
        assert_eq!(options.keys.foreign_key.as_deref(), Some("mechanicUuid"));
        assert_eq!(options.keys.through_local_key.as_deref(), Some("id"));
        assert_eq!(options.keys.through_foreign_key.as_deref(), Some("carId"));
        assert_eq!(options.serialize_as.as_deref(), Some("owner"));
        assert!(options.on_query.is_none());
        assert_eq!(options.through.resolve().table(), "cars");
    }
}
