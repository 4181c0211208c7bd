//! Query Builder JOIN operations

use super::builder::QueryBuilder;
use super::types::{JoinClause, JoinType};

impl QueryBuilder {
    /// `INNER JOIN table ON left = right`
    pub fn join(self, table: &str, left_col: &str, right_col: &str) -> Self {
        self.push_join(JoinType::Inner, table, left_col, right_col)
    }

    /// `LEFT JOIN table ON left = right`, for optional rows added by query hooks
    pub fn left_join(self, table: &str, left_col: &str, right_col: &str) -> Self {
        self.push_join(JoinType::Left, table, left_col, right_col)
    }

    fn push_join(mut self, join_type: JoinType, table: &str, left_col: &str, right_col: &str) -> Self {
        let on = (left_col.to_string(), right_col.to_string());
        self.joins.push(JoinClause {
            join_type,
            table: table.to_string(),
            on_conditions: vec![on],
        });
        self
    }
}
