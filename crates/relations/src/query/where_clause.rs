//! Query Builder WHERE clause operations

use super::builder::QueryBuilder;
use super::types::*;
use serde_json::Value;

impl QueryBuilder {
    /// Add WHERE condition with equality
    pub fn where_eq<T>(mut self, column: &str, value: T) -> Self
    where
        T: Into<Value>,
    {
        let mut condition = WhereCondition::new(column, QueryOperator::Equal);
        condition.value = Some(value.into());
        self.where_conditions.push(condition);
        self
    }

    /// Add WHERE condition with not equal
    pub fn where_ne<T: Into<Value>>(mut self, column: &str, value: T) -> Self {
        let mut condition = WhereCondition::new(column, QueryOperator::NotEqual);
        condition.value = Some(value.into());
        self.where_conditions.push(condition);
        self
    }

    /// Add WHERE condition with IN
    pub fn where_in<T: Into<Value>>(mut self, column: &str, values: Vec<T>) -> Self {
        let mut condition = WhereCondition::new(column, QueryOperator::In);
        condition.values = values.into_iter().map(|v| v.into()).collect();
        self.where_conditions.push(condition);
        self
    }

    /// Add WHERE condition with IS NOT NULL
    pub fn where_not_null(mut self, column: &str) -> Self {
        self.where_conditions
            .push(WhereCondition::new(column, QueryOperator::IsNotNull));
        self
    }

    /// Compare two columns, e.g. to correlate a subquery with its outer query
    pub fn where_column(mut self, column: &str, other_column: &str) -> Self {
        let mut condition = WhereCondition::new(column, QueryOperator::ColumnEqual);
        condition.other_column = Some(other_column.to_string());
        self.where_conditions.push(condition);
        self
    }

    /// Add EXISTS subquery condition
    pub fn where_exists(mut self, subquery: QueryBuilder) -> Self {
        let mut condition = WhereCondition::new("", QueryOperator::Exists);
        condition.subquery = Some(Box::new(subquery));
        self.where_conditions.push(condition);
        self
    }
}
