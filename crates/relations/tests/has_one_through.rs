use std::sync::Arc;

use elif_relations::{
    ForeignKeyConvention, HasOneThrough, ModelDescriptor, ModelRef, OneOrMany, PostgresQueryClient,
    QueryBuilder, Record, RelationConfig, RelationError, RelationRegistry, ThroughRelationOptions,
};
use once_cell::sync::Lazy;
use serde_json::json;

static MECHANIC: Lazy<Arc<ModelDescriptor>> = Lazy::new(|| {
    Arc::new(
        ModelDescriptor::new("Mechanic", "mechanics")
            .attribute("id")
            .attribute("name")
            .attribute("active"),
    )
});

static CAR: Lazy<Arc<ModelDescriptor>> = Lazy::new(|| {
    Arc::new(
        ModelDescriptor::new("Car", "cars")
            .attribute("id")
            .attribute_as("mechanicId", "mechanic_id"),
    )
});

static OWNER: Lazy<Arc<ModelDescriptor>> = Lazy::new(|| {
    Arc::new(
        ModelDescriptor::new("Owner", "owners")
            .attribute("id")
            .attribute("name")
            .attribute_as("carId", "car_id"),
    )
});

fn init_tracing() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
}

fn camel_case_config() -> RelationConfig {
    RelationConfig {
        foreign_key_convention: ForeignKeyConvention::CamelCase,
        ..RelationConfig::default()
    }
}

fn car_owner() -> HasOneThrough {
    HasOneThrough::new(
        "carOwner",
        ModelRef::new(|| OWNER.clone()),
        ThroughRelationOptions::new(ModelRef::new(|| CAR.clone())),
        ModelRef::new(|| MECHANIC.clone()),
    )
    .with_config(camel_case_config())
}

fn row(value: serde_json::Value) -> Record {
    Record::from_json(value).expect("row fixtures are JSON objects")
}

#[test]
fn test_preload_round_trip() {
    init_tracing();

    let registry = RelationRegistry::new();
    let relation = registry.register("Mechanic", car_owner()).unwrap();
    let client = PostgresQueryClient::new();

    let mut mechanics = vec![
        row(json!({"id": 1, "name": "Joe"})),
        row(json!({"id": 2, "name": "Ann"})),
        row(json!({"id": 3, "name": "Bob"})),
    ];

    let query = relation
        .eager_query(&client, OneOrMany::Many(&mechanics))
        .unwrap();
    let (sql, params) = query.to_sql_with_params();
    assert_eq!(
        sql,
        "SELECT owners.*, cars.mechanic_id AS through_mechanic_id FROM owners \
         INNER JOIN cars ON cars.id = owners.car_id WHERE cars.mechanic_id IN ($1, $2, $3)"
    );
    assert_eq!(params, vec![json!(1), json!(2), json!(3)]);

    // Rows as the database would return them for the query above
    let owners = vec![
        row(json!({"id": 20, "name": "Virk", "car_id": 7, "through_mechanic_id": 2})),
        row(json!({"id": 21, "name": "Romain", "car_id": 8, "through_mechanic_id": 3})),
    ];
    relation.set_related_for_many(&mut mechanics, &owners).unwrap();

    assert_eq!(
        serde_json::to_value(&mechanics).unwrap(),
        json!([
            {"id": 1, "name": "Joe", "carOwner": null},
            {
                "id": 2,
                "name": "Ann",
                "carOwner": {"id": 20, "name": "Virk", "car_id": 7, "through_mechanic_id": 2}
            },
            {
                "id": 3,
                "name": "Bob",
                "carOwner": {"id": 21, "name": "Romain", "car_id": 8, "through_mechanic_id": 3}
            }
        ])
    );
}

#[test]
fn test_correlated_sub_query_inside_exists() {
    init_tracing();

    let relation = car_owner();
    let client = PostgresQueryClient::new();

    let mut sub = relation.sub_query(&client).unwrap().correlate("mechanics");
    sub.map(|builder| builder.where_eq("owners.name", "Virk"));

    let (sql, params) = QueryBuilder::new()
        .from("mechanics")
        .where_exists(sub.into_builder())
        .where_eq("mechanics.active", true)
        .to_sql_with_params();

    assert_eq!(
        sql,
        "SELECT * FROM mechanics WHERE EXISTS (SELECT owners.* FROM owners \
         INNER JOIN cars ON cars.id = owners.car_id \
         WHERE cars.mechanic_id = mechanics.id AND owners.name = $1) \
         AND mechanics.active = $2"
    );
    assert_eq!(params, vec![json!("Virk"), json!(true)]);
}

#[test]
fn test_client_query_for_single_owner() {
    init_tracing();

    let relation = car_owner();
    let client = PostgresQueryClient::new();
    let mechanic = row(json!({"id": 5, "name": "Joe"}));

    let keys = relation.keys().unwrap();
    assert_eq!(keys.foreign_key.attribute, "mechanicId");
    assert_eq!(keys.foreign_key.column, "mechanic_id");
    assert_eq!(keys.through_foreign_key.attribute, "carId");

    let (sql, params) = relation
        .client(&mechanic, &client)
        .unwrap()
        .query()
        .unwrap()
        .to_sql_with_params();

    assert_eq!(
        sql,
        "SELECT owners.* FROM owners INNER JOIN cars ON cars.id = owners.car_id \
         WHERE cars.mechanic_id = $1"
    );
    assert_eq!(params, vec![json!(5)]);
}

#[test]
fn test_inherited_relationship_boots_for_child() {
    init_tracing();

    let registry = RelationRegistry::new();
    registry.register("Mechanic", car_owner()).unwrap();

    let trainee = ModelDescriptor::new("Trainee", "trainees").attribute("id");
    assert_eq!(registry.inherit("Mechanic", "Trainee", trainee), 1);

    let inherited = registry.get("Trainee", "carOwner").unwrap();
    let err = inherited.boot().unwrap_err();
    assert_eq!(
        err.to_string(),
        "\"Trainee.carOwner\" expects \"traineeId\" to exist on \"Car\" model, but is missing"
    );
    assert!(matches!(err, RelationError::MissingKeyDefinition { .. }));
}
