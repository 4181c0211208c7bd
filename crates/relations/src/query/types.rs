//! Query Builder Types - Core types and enums for query building

use std::fmt;
use serde_json::Value;

use super::builder::QueryBuilder;

/// Query operator types
#[derive(Debug, Clone, PartialEq)]
pub enum QueryOperator {
    Equal,
    NotEqual,
    In,
    IsNotNull,
    /// Column compared with another column rather than a bound value
    ColumnEqual,
    Exists,
}

impl fmt::Display for QueryOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QueryOperator::Equal | QueryOperator::ColumnEqual => write!(f, "="),
            QueryOperator::NotEqual => write!(f, "!="),
            QueryOperator::In => write!(f, "IN"),
            QueryOperator::IsNotNull => write!(f, "IS NOT NULL"),
            QueryOperator::Exists => write!(f, "EXISTS"),
        }
    }
}

/// Where clause condition
#[derive(Debug, Clone)]
pub struct WhereCondition {
    pub column: String,
    pub operator: QueryOperator,
    pub value: Option<Value>,
    pub values: Vec<Value>, // For IN
    pub other_column: Option<String>, // For column comparisons
    pub subquery: Option<Box<QueryBuilder>>, // For EXISTS
}

impl WhereCondition {
    pub(crate) fn new(column: &str, operator: QueryOperator) -> Self {
        Self {
            column: column.to_string(),
            operator,
            value: None,
            values: Vec::new(),
            other_column: None,
            subquery: None,
        }
    }
}

/// Join types
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum JoinType {
    Inner,
    Left,
}

impl fmt::Display for JoinType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            JoinType::Inner => write!(f, "INNER JOIN"),
            JoinType::Left => write!(f, "LEFT JOIN"),
        }
    }
}

/// Join clause
#[derive(Debug, Clone, PartialEq)]
pub struct JoinClause {
    pub join_type: JoinType,
    pub table: String,
    pub on_conditions: Vec<(String, String)>, // (left_column, right_column)
}

/// Order by direction
#[derive(Debug, Clone, PartialEq)]
pub enum OrderDirection {
    Asc,
    Desc,
}

impl fmt::Display for OrderDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OrderDirection::Asc => write!(f, "ASC"),
            OrderDirection::Desc => write!(f, "DESC"),
        }
    }
}
