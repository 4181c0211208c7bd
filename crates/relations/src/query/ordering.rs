//! Query Builder ORDER BY and pagination operations

use super::builder::QueryBuilder;
use super::types::*;

impl QueryBuilder {
    /// Add ORDER BY clause (ascending)
    pub fn order_by(mut self, column: &str) -> Self {
        self.order_by.push((column.to_string(), OrderDirection::Asc));
        self
    }

    /// Add ORDER BY clause (descending)
    pub fn order_by_desc(mut self, column: &str) -> Self {
        self.order_by.push((column.to_string(), OrderDirection::Desc));
        self
    }

    pub fn limit(mut self, count: i64) -> Self {
        self.limit_count = Some(count);
        self
    }

    pub fn offset(mut self, offset: i64) -> Self {
        self.offset_value = Some(offset);
        self
    }
}
