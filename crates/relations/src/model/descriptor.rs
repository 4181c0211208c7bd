//! Model descriptors and lazy model references

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Static description of a model: its name, table, primary key and the
/// attributes it declares together with their physical column names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelDescriptor {
    name: String,
    table: String,
    primary_key: String,
    columns: HashMap<String, String>,
}

impl ModelDescriptor {
    /// Create a descriptor with the conventional `id` primary key and no attributes
    pub fn new(name: &str, table: &str) -> Self {
        Self {
            name: name.to_string(),
            table: table.to_string(),
            primary_key: "id".to_string(),
            columns: HashMap::new(),
        }
    }

    /// Set the primary key attribute name
    pub fn with_primary_key(mut self, primary_key: &str) -> Self {
        self.primary_key = primary_key.to_string();
        self
    }

    /// Declare an attribute stored in a column of the same name
    pub fn attribute(self, name: &str) -> Self {
        self.attribute_as(name, name)
    }

    /// Declare an attribute stored in a differently named column
    pub fn attribute_as(mut self, name: &str, column: &str) -> Self {
        self.columns.insert(name.to_string(), column.to_string());
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn table(&self) -> &str {
        &self.table
    }

    pub fn primary_key(&self) -> &str {
        &self.primary_key
    }

    /// Check whether the model declares the given attribute
    pub fn has_attribute(&self, attribute: &str) -> bool {
        self.columns.contains_key(attribute)
    }

    /// Physical column backing an attribute
    pub fn column_name(&self, attribute: &str) -> Option<&str> {
        self.columns.get(attribute).map(String::as_str)
    }

    /// Declared attribute names, sorted
    pub fn attributes(&self) -> Vec<&str> {
        let mut attributes: Vec<&str> = self.columns.keys().map(String::as_str).collect();
        attributes.sort_unstable();
        attributes
    }
}

/// Lazily evaluated reference to a model descriptor.
///
/// Relationships hold `ModelRef`s instead of descriptors so that two models
/// can reference each other before either is fully declared. The accessor is
/// only invoked when a relationship boots.
#[derive(Clone)]
pub struct ModelRef(Arc<dyn Fn() -> Arc<ModelDescriptor> + Send + Sync>);

impl ModelRef {
    pub fn new<F>(accessor: F) -> Self
    where
        F: Fn() -> Arc<ModelDescriptor> + Send + Sync + 'static,
    {
        Self(Arc::new(accessor))
    }

    /// Dereference the accessor
    pub fn resolve(&self) -> Arc<ModelDescriptor> {
        (self.0)()
    }
}

impl From<Arc<ModelDescriptor>> for ModelRef {
    fn from(descriptor: Arc<ModelDescriptor>) -> Self {
        ModelRef::new(move || descriptor.clone())
    }
}

impl From<ModelDescriptor> for ModelRef {
    fn from(descriptor: ModelDescriptor) -> Self {
        Arc::new(descriptor).into()
    }
}

impl fmt::Debug for ModelRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ModelRef(..)")
    }
}
