//! Row contract used by relationships, plus a JSON-backed record

use std::collections::BTreeMap;

use serde::ser::{Serialize, SerializeMap, Serializer};
use serde_json::{Map, Value};

/// Read access to a row's attributes
pub trait ModelRow {
    /// Value of an attribute, `None` when the row does not carry it
    fn get_attribute(&self, name: &str) -> Option<&Value>;
}

/// Rows that can hold related rows under an alias
pub trait RelatedHolder<R>: ModelRow {
    /// Attach at most one related row. `None` marks the relation as loaded
    /// without a match.
    fn set_related(&mut self, alias: &str, related: Option<R>);

    /// Attach a collection of related rows
    fn set_related_many(&mut self, alias: &str, related: Vec<R>);
}

/// Related data attached to a [`Record`]
#[derive(Debug, Clone, PartialEq)]
pub enum RelatedValue {
    One(Option<Box<Record>>),
    Many(Vec<Record>),
}

/// A row of attribute values with related rows attached by alias
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Record {
    attributes: Map<String, Value>,
    related: BTreeMap<String, RelatedValue>,
}

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a record from a JSON object, `None` for any other JSON value
    pub fn from_json(value: Value) -> Option<Self> {
        match value {
            Value::Object(attributes) => Some(Self {
                attributes,
                related: BTreeMap::new(),
            }),
            _ => None,
        }
    }

    /// Set an attribute, builder style
    pub fn with<V: Into<Value>>(mut self, name: &str, value: V) -> Self {
        self.set_attribute(name, value);
        self
    }

    pub fn set_attribute<V: Into<Value>>(&mut self, name: &str, value: V) {
        self.attributes.insert(name.to_string(), value.into());
    }

    pub fn attributes(&self) -> &Map<String, Value> {
        &self.attributes
    }

    /// Related data under an alias; `None` when it was never loaded
    pub fn related(&self, alias: &str) -> Option<&RelatedValue> {
        self.related.get(alias)
    }

    /// The single related record under an alias, if one was attached
    pub fn related_one(&self, alias: &str) -> Option<&Record> {
        match self.related.get(alias) {
            Some(RelatedValue::One(Some(record))) => Some(record),
            _ => None,
        }
    }

    pub fn is_loaded(&self, alias: &str) -> bool {
        self.related.contains_key(alias)
    }
}

impl ModelRow for Record {
    fn get_attribute(&self, name: &str) -> Option<&Value> {
        self.attributes.get(name)
    }
}

/// Plain JSON objects can be read as rows
impl ModelRow for Value {
    fn get_attribute(&self, name: &str) -> Option<&Value> {
        self.get(name)
    }
}

impl RelatedHolder<Record> for Record {
    fn set_related(&mut self, alias: &str, related: Option<Record>) {
        self.related
            .insert(alias.to_string(), RelatedValue::One(related.map(Box::new)));
    }

    fn set_related_many(&mut self, alias: &str, related: Vec<Record>) {
        self.related
            .insert(alias.to_string(), RelatedValue::Many(related));
    }
}

impl Serialize for RelatedValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            RelatedValue::One(record) => record.serialize(serializer),
            RelatedValue::Many(records) => records.serialize(serializer),
        }
    }
}

impl Serialize for Record {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.attributes.len() + self.related.len()))?;
        for (name, value) in &self.attributes {
            map.serialize_entry(name, value)?;
        }
        for (alias, related) in &self.related {
            map.serialize_entry(alias, related)?;
        }
        map.end()
    }
}
