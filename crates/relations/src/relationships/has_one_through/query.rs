//! Query object produced for has-one-through relationships

use std::sync::Arc;

use serde_json::Value;

use crate::error::RelationResult;
use crate::query::QueryBuilder;

/// Hook run on every freshly composed relationship query
pub type QueryHook = Arc<dyn Fn(&mut HasOneThroughQuery) -> RelationResult<()> + Send + Sync>;

/// Shape of a composed query
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryKind {
    /// Constrained to one or many owners
    Related,
    /// Constrained to many owners and flagged for preloading
    Preload,
    /// No owner constraint, meant to be embedded in another query
    Sub,
}

/// A composed has-one-through query.
///
/// Wraps the underlying [`QueryBuilder`] together with the table and column
/// names the relationship resolved, so callers can keep refining the query
/// and column selection can be decided when the query is rendered.
#[derive(Debug, Clone)]
pub struct HasOneThroughQuery {
    builder: QueryBuilder,
    kind: QueryKind,
    related_table: String,
    through_foreign_column: String,
    through_alias: String,
    local_column: String,
}

/// Sub queries share the query type; the alias names intent at call sites
pub type HasOneThroughSubQuery = HasOneThroughQuery;

impl HasOneThroughQuery {
    pub(crate) fn new(
        builder: QueryBuilder,
        kind: QueryKind,
        related_table: &str,
        through_foreign_column: &str,
        through_alias: &str,
        local_column: &str,
    ) -> Self {
        Self {
            builder,
            kind,
            related_table: related_table.to_string(),
            through_foreign_column: through_foreign_column.to_string(),
            through_alias: through_alias.to_string(),
            local_column: local_column.to_string(),
        }
    }

    pub fn kind(&self) -> QueryKind {
        self.kind
    }

    pub fn builder(&self) -> &QueryBuilder {
        &self.builder
    }

    /// Refine the underlying builder in place
    pub fn map<F>(&mut self, f: F) -> &mut Self
    where
        F: FnOnce(QueryBuilder) -> QueryBuilder,
    {
        let builder = std::mem::take(&mut self.builder);
        self.builder = f(builder);
        self
    }

    pub fn set_preload(&mut self, preload: bool) -> &mut Self {
        self.builder.set_preload(preload);
        self
    }

    pub fn is_preload(&self) -> bool {
        self.builder.is_preload()
    }

    /// Qualified through-table column holding the owner key
    pub fn through_foreign_column(&self) -> &str {
        &self.through_foreign_column
    }

    /// Correlate with an outer query selecting from `owner_table`
    pub fn correlate(mut self, owner_table: &str) -> Self {
        let owner_column = format!("{}.{}", owner_table, self.local_column);
        self.builder = self
            .builder
            .where_column(&self.through_foreign_column, &owner_column);
        self
    }

    /// Consume the query, returning the builder with default columns applied
    pub fn into_builder(self) -> QueryBuilder {
        let mut builder = self.builder;
        if builder.select_fields().is_empty() {
            builder = builder.select(&format!("{}.*", self.related_table));
            if builder.is_preload() {
                builder = builder.select_as(&self.through_foreign_column, &self.through_alias);
            }
        }
        builder
    }

    pub fn to_sql_with_params(&self) -> (String, Vec<Value>) {
        self.clone().into_builder().to_sql_with_params()
    }

    pub fn to_sql(&self) -> String {
        self.to_sql_with_params().0
    }
}
