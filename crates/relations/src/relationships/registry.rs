//! Relationship Registry - per-model storage of relationship definitions

use std::collections::HashMap;
use std::sync::Arc;

use dashmap::DashMap;
use tracing::debug;

use crate::error::{RelationError, RelationResult};
use crate::model::ModelRef;

use super::has_one_through::HasOneThrough;

/// Thread-safe registry of relationship definitions, keyed by model name
#[derive(Debug, Clone, Default)]
pub struct RelationRegistry {
    /// Map of model name -> relationship name -> definition
    relations: Arc<DashMap<String, HashMap<String, Arc<HasOneThrough>>>>,
}

impl RelationRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a relationship for a model. Names are unique per model.
    pub fn register(&self, model_name: &str, relation: HasOneThrough) -> RelationResult<Arc<HasOneThrough>> {
        let mut model_relations = self.relations.entry(model_name.to_string()).or_default();

        if model_relations.contains_key(relation.relation_name()) {
            return Err(RelationError::DuplicateRelation {
                model: model_name.to_string(),
                relation: relation.relation_name().to_string(),
            });
        }

        let relation = Arc::new(relation);
        model_relations.insert(relation.relation_name().to_string(), Arc::clone(&relation));
        Ok(relation)
    }

    /// Get a relationship by model and relationship name
    pub fn get(&self, model_name: &str, relation_name: &str) -> Option<Arc<HasOneThrough>> {
        self.relations.get(model_name)?.get(relation_name).cloned()
    }

    /// Check if a relationship exists
    pub fn has(&self, model_name: &str, relation_name: &str) -> bool {
        self.relations
            .get(model_name)
            .map(|relations| relations.contains_key(relation_name))
            .unwrap_or(false)
    }

    /// Relationship names registered for a model, sorted
    pub fn names(&self, model_name: &str) -> Vec<String> {
        let mut names: Vec<String> = self
            .relations
            .get(model_name)
            .map(|relations| relations.keys().cloned().collect())
            .unwrap_or_default();
        names.sort();
        names
    }

    /// Copy every relationship of `parent_model` onto `child_model`, rebinding
    /// the owner. Relationships the child already declares are kept as they
    /// are. Returns the number of relationships copied.
    pub fn inherit(
        &self,
        parent_model: &str,
        child_model: &str,
        child_owner: impl Into<ModelRef>,
    ) -> usize {
        let child_owner = child_owner.into();

        // Collect first; holding a parent shard guard while inserting the
        // child entry can deadlock when both keys share a shard.
        let inherited: Vec<Arc<HasOneThrough>> = match self.relations.get(parent_model) {
            Some(relations) => relations.values().cloned().collect(),
            None => return 0,
        };

        let mut child_relations = self.relations.entry(child_model.to_string()).or_default();
        let mut copied = 0;
        for relation in inherited {
            if child_relations.contains_key(relation.relation_name()) {
                continue;
            }
            let clone = relation.clone_for(child_owner.clone());
            child_relations.insert(clone.relation_name().to_string(), Arc::new(clone));
            copied += 1;
        }

        debug!(parent = parent_model, child = child_model, copied, "inherited relationships");
        copied
    }

    /// Clear all registered relationships
    pub fn clear(&self) {
        self.relations.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ModelDescriptor;
    use crate::relationships::metadata::ThroughRelationOptions;

    fn models() -> (ModelDescriptor, ModelDescriptor, ModelDescriptor) {
        (
            ModelDescriptor::new("Mechanic", "mechanics").attribute("id"),
            ModelDescriptor::new("Car", "cars")
                .attribute("id")
                .attribute("mechanic_id")
                .attribute("senior_mechanic_id"),
            ModelDescriptor::new("Owner", "owners")
                .attribute("id")
                .attribute("car_id"),
        )
    }

    fn car_owner() -> HasOneThrough {
        let (mechanic, car, owner) = models();
        HasOneThrough::new("carOwner", owner, ThroughRelationOptions::new(car), mechanic)
    }

    #[test]
    fn test_register_and_lookup() {
        let registry = RelationRegistry::new();
        registry.register("Mechanic", car_owner()).unwrap();

        assert!(registry.has("Mechanic", "carOwner"));
        assert!(!registry.has("Mechanic", "car"));
        assert!(!registry.has("Owner", "carOwner"));
        assert_eq!(registry.names("Mechanic"), vec!["carOwner".to_string()]);
        assert!(registry.names("Owner").is_empty());

        let relation = registry.get("Mechanic", "carOwner").unwrap();
        assert_eq!(relation.relation_name(), "carOwner");
        assert!(registry.get("Mechanic", "missing").is_none());
    }

    #[test]
    fn test_duplicate_registration_is_rejected() {
        let registry = RelationRegistry::new();
        registry.register("Mechanic", car_owner()).unwrap();

        let err = registry.register("Mechanic", car_owner()).unwrap_err();
        assert!(matches!(
            err,
            RelationError::DuplicateRelation { ref model, ref relation }
                if model == "Mechanic" && relation == "carOwner"
        ));
    }

    #[test]
    fn test_inherit_rebinds_owner() {
        let registry = RelationRegistry::new();
        let parent = registry.register("Mechanic", car_owner()).unwrap();
        parent.boot().unwrap();

        let senior = ModelDescriptor::new("SeniorMechanic", "mechanics").attribute("id");
        assert_eq!(registry.inherit("Mechanic", "SeniorMechanic", senior), 1);

        let child = registry.get("SeniorMechanic", "carOwner").unwrap();
        assert!(!child.is_booted());
        assert!(parent.is_booted());

        child.boot().unwrap();
        assert_eq!(child.keys().unwrap().foreign_key.attribute, "senior_mechanic_id");
        assert_eq!(parent.keys().unwrap().foreign_key.attribute, "mechanic_id");
    }

    #[test]
    fn test_inherit_keeps_child_definitions() {
        let registry = RelationRegistry::new();
        registry.register("Mechanic", car_owner()).unwrap();
        let own = registry.register("Apprentice", car_owner()).unwrap();

        let apprentice = ModelDescriptor::new("Apprentice", "apprentices").attribute("id");
        assert_eq!(registry.inherit("Mechanic", "Apprentice", apprentice), 0);
        assert_eq!(registry.inherit("Unknown", "Apprentice", ModelDescriptor::new("A", "a")), 0);

        let kept = registry.get("Apprentice", "carOwner").unwrap();
        assert!(Arc::ptr_eq(&own, &kept));
    }
}
