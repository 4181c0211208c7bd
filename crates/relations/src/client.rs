//! Query execution client abstraction
//!
//! Relationships never execute queries. They only ask a client for a fresh
//! builder, compose it, and hand it back to the caller, who executes it
//! against whatever backend the client represents.

use crate::query::QueryBuilder;

/// Factory for fresh, empty query builders bound to a backend
pub trait QueryClient: Send + Sync {
    /// Produce a new query builder with no state
    fn query_builder(&self) -> QueryBuilder;

    /// Backend identifier, used in log output
    fn backend_name(&self) -> &'static str {
        "unknown"
    }
}

/// PostgreSQL client. Builders render `$n` placeholders.
#[derive(Debug, Clone, Copy, Default)]
pub struct PostgresQueryClient;

impl PostgresQueryClient {
    pub fn new() -> Self {
        Self
    }
}

impl QueryClient for PostgresQueryClient {
    fn query_builder(&self) -> QueryBuilder {
        QueryBuilder::new()
    }

    fn backend_name(&self) -> &'static str {
        "postgres"
    }
}
