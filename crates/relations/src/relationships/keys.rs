//! Key resolution for relationships reaching a model through another model

use crate::error::{RelationError, RelationResult};
use crate::model::ModelDescriptor;
use crate::naming::NamingStrategy;

use super::metadata::{KeyOverrides, RelationshipType, ResolvedKey, ThroughKeys};

/// Resolves the four keys of a through relationship and checks that each
/// one exists on the model it belongs to.
///
/// Resolution is pure: the same inputs always produce the same keys.
pub struct KeyResolver<'a> {
    pub relation: RelationshipType,
    pub relation_name: &'a str,
    pub owner: &'a ModelDescriptor,
    pub through: &'a ModelDescriptor,
    pub related: &'a ModelDescriptor,
    pub naming: &'a dyn NamingStrategy,
}

impl<'a> KeyResolver<'a> {
    pub fn resolve(&self, overrides: &KeyOverrides) -> RelationResult<ThroughKeys> {
        let local_key = self.extract(
            self.owner,
            overrides.local_key.as_deref(),
            || self.naming.relation_local_key(self.relation, self.owner, self.related, self.relation_name),
        )?;

        let foreign_key = self.extract(
            self.through,
            overrides.foreign_key.as_deref(),
            || self.naming.relation_foreign_key(self.relation, self.owner, self.through, self.relation_name),
        )?;

        let through_local_key = self.extract(
            self.through,
            overrides.through_local_key.as_deref(),
            || self.naming.relation_local_key(self.relation, self.through, self.related, self.relation_name),
        )?;

        let through_foreign_key = self.extract(
            self.related,
            overrides.through_foreign_key.as_deref(),
            || self.naming.relation_foreign_key(self.relation, self.through, self.related, self.relation_name),
        )?;

        Ok(ThroughKeys {
            local_key,
            foreign_key,
            through_local_key,
            through_foreign_key,
        })
    }

    fn extract<F>(
        &self,
        model: &ModelDescriptor,
        explicit: Option<&str>,
        default: F,
    ) -> RelationResult<ResolvedKey>
    where
        F: FnOnce() -> String,
    {
        let attribute = match explicit {
            Some(key) if !key.is_empty() => key.to_string(),
            _ => default(),
        };

        match model.column_name(&attribute) {
            Some(column) if !attribute.is_empty() => Ok(ResolvedKey {
                column: column.to_string(),
                attribute,
            }),
            _ => Err(RelationError::MissingKeyDefinition {
                relation: format!("{}.{}", self.owner.name(), self.relation_name),
                key: attribute,
                model: model.name().to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::naming::ConventionalNamingStrategy;

    fn models() -> (ModelDescriptor, ModelDescriptor, ModelDescriptor) {
        let mechanic = ModelDescriptor::new("Mechanic", "mechanics").attribute("id");
        let car = ModelDescriptor::new("Car", "cars")
            .attribute("id")
            .attribute("mechanic_id");
        let owner = ModelDescriptor::new("Owner", "owners")
            .attribute("id")
            .attribute("car_id");
        (mechanic, car, owner)
    }

    fn key(attribute: &str, column: &str) -> ResolvedKey {
        ResolvedKey {
            attribute: attribute.to_string(),
            column: column.to_string(),
        }
    }

    #[test]
    fn test_defaults_come_from_naming_strategy() {
        let (mechanic, car, owner) = models();
        let naming = ConventionalNamingStrategy::default();
        let resolver = KeyResolver {
            relation: RelationshipType::HasOneThrough,
            relation_name: "carOwner",
            owner: &mechanic,
            through: &car,
            related: &owner,
            naming: &naming,
        };

        let keys = resolver.resolve(&KeyOverrides::default()).unwrap();
        assert_eq!(keys.local_key, key("id", "id"));
        assert_eq!(keys.foreign_key, key("mechanic_id", "mechanic_id"));
        assert_eq!(keys.through_local_key, key("id", "id"));
        assert_eq!(keys.through_foreign_key, key("car_id", "car_id"));
    }

    #[test]
    fn test_explicit_keys_are_returned_unchanged() {
        let mechanic = ModelDescriptor::new("Mechanic", "mechanics").attribute_as("uid", "mechanic_uid");
        let car = ModelDescriptor::new("Car", "cars")
            .attribute_as("workerUid", "worker_uid")
            .attribute_as("serial", "serial_no");
        let owner = ModelDescriptor::new("Owner", "owners").attribute_as("carSerial", "car_serial");
        let naming = ConventionalNamingStrategy::default();

        let overrides = KeyOverrides {
            local_key: Some("uid".to_string()),
            foreign_key: Some("workerUid".to_string()),
            through_local_key: Some("serial".to_string()),
            through_foreign_key: Some("carSerial".to_string()),
        };
        let keys = KeyResolver {
            relation: RelationshipType::HasOneThrough,
            relation_name: "carOwner",
            owner: &mechanic,
            through: &car,
            related: &owner,
            naming: &naming,
        }
        .resolve(&overrides)
        .unwrap();

        assert_eq!(keys.local_key, key("uid", "mechanic_uid"));
        assert_eq!(keys.foreign_key, key("workerUid", "worker_uid"));
        assert_eq!(keys.through_local_key, key("serial", "serial_no"));
        assert_eq!(keys.through_foreign_key, key("carSerial", "car_serial"));
    }

    #[test]
    fn test_empty_override_falls_back_to_default() {
        let (mechanic, car, owner) = models();
        let naming = ConventionalNamingStrategy::default();
        let overrides = KeyOverrides {
            foreign_key: Some(String::new()),
            ..KeyOverrides::default()
        };

        let keys = KeyResolver {
            relation: RelationshipType::HasOneThrough,
            relation_name: "carOwner",
            owner: &mechanic,
            through: &car,
            related: &owner,
            naming: &naming,
        }
        .resolve(&overrides)
        .unwrap();

        assert_eq!(keys.foreign_key.attribute, "mechanic_id");
    }

    #[test]
    fn test_missing_attribute_names_key_and_model() {
        let (_, car, owner) = models();
        let mechanic = ModelDescriptor::new("Mechanic", "mechanics").attribute("name");
        let naming = ConventionalNamingStrategy::default();

        let err = KeyResolver {
            relation: RelationshipType::HasOneThrough,
            relation_name: "carOwner",
            owner: &mechanic,
            through: &car,
            related: &owner,
            naming: &naming,
        }
        .resolve(&KeyOverrides::default())
        .unwrap_err();

        match err {
            RelationError::MissingKeyDefinition { relation, key, model } => {
                assert_eq!(relation, "Mechanic.carOwner");
                assert_eq!(key, "id");
                assert_eq!(model, "Mechanic");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_missing_through_foreign_key_on_related_model() {
        let (mechanic, car, _) = models();
        let owner = ModelDescriptor::new("Owner", "owners").attribute("id");
        let naming = ConventionalNamingStrategy::default();

        let err = KeyResolver {
            relation: RelationshipType::HasOneThrough,
            relation_name: "carOwner",
            owner: &mechanic,
            through: &car,
            related: &owner,
            naming: &naming,
        }
        .resolve(&KeyOverrides::default())
        .unwrap_err();

        assert!(matches!(
            err,
            RelationError::MissingKeyDefinition { ref key, ref model, .. }
                if key == "car_id" && model == "Owner"
        ));
    }
}
