//! Query Builder Module - fluent SELECT builder used to compose relationship queries

pub mod builder;
pub mod joins;
pub mod ordering;
pub mod select;
pub mod sql_generation;
pub mod types;
pub mod where_clause;

pub use builder::QueryBuilder;
pub use types::{JoinClause, JoinType, OrderDirection, QueryOperator, WhereCondition};
