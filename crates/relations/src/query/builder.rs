//! Query Builder - Core builder implementation

use super::types::*;

/// Query builder for constructing SELECT queries
#[derive(Debug, Clone, Default)]
pub struct QueryBuilder {
    pub(crate) select_fields: Vec<String>,
    pub(crate) from_tables: Vec<String>,
    pub(crate) where_conditions: Vec<WhereCondition>,
    pub(crate) joins: Vec<JoinClause>,
    pub(crate) order_by: Vec<(String, OrderDirection)>,
    pub(crate) limit_count: Option<i64>,
    pub(crate) offset_value: Option<i64>,
    pub(crate) preload: bool,
}

impl QueryBuilder {
    /// Create a new query builder
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark the query as a relationship preload query
    pub fn preload(mut self, preload: bool) -> Self {
        self.preload = preload;
        self
    }

    pub fn set_preload(&mut self, preload: bool) {
        self.preload = preload;
    }

    /// Whether the query loads relationships for many parents at once
    pub fn is_preload(&self) -> bool {
        self.preload
    }

    pub fn select_fields(&self) -> &[String] {
        &self.select_fields
    }

    pub fn from_tables(&self) -> &[String] {
        &self.from_tables
    }

    pub fn joins(&self) -> &[JoinClause] {
        &self.joins
    }

    pub fn where_conditions(&self) -> &[WhereCondition] {
        &self.where_conditions
    }
}
