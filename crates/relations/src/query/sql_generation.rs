//! Query Builder SQL generation

use serde_json::Value;
use super::builder::QueryBuilder;
use super::types::*;

impl QueryBuilder {
    /// Generate SQL with `$n` placeholders and return the bound parameters
    pub fn to_sql_with_params(&self) -> (String, Vec<Value>) {
        let mut params = Vec::new();
        let sql = self.build_select_sql(&mut params);
        (sql, params)
    }

    /// Convert the query to a SQL string, discarding parameters
    pub fn to_sql(&self) -> String {
        self.to_sql_with_params().0
    }

    /// Build SELECT SQL. Parameters are appended to `params`, which nested
    /// subqueries share with their parent query.
    fn build_select_sql(&self, params: &mut Vec<Value>) -> String {
        let mut sql = String::new();

        // SELECT clause
        sql.push_str("SELECT ");

        if self.select_fields.is_empty() {
            sql.push('*');
        } else {
            sql.push_str(&self.select_fields.join(", "));
        }

        // FROM clause
        if !self.from_tables.is_empty() {
            sql.push_str(" FROM ");
            sql.push_str(&self.from_tables.join(", "));
        }

        // JOIN clauses
        for join in &self.joins {
            sql.push(' ');
            sql.push_str(&join.join_type.to_string());
            sql.push(' ');
            sql.push_str(&join.table);
            sql.push_str(" ON ");
            for (i, (left, right)) in join.on_conditions.iter().enumerate() {
                if i > 0 {
                    sql.push_str(" AND ");
                }
                sql.push_str(&format!("{} = {}", left, right));
            }
        }

        self.build_where_clause(&mut sql, params);
        self.build_order_limit_clause(&mut sql);

        sql
    }

    /// Helper method to build WHERE clauses
    fn build_where_clause(&self, sql: &mut String, params: &mut Vec<Value>) {
        if self.where_conditions.is_empty() {
            return;
        }

        sql.push_str(" WHERE ");
        for (i, condition) in self.where_conditions.iter().enumerate() {
            if i > 0 {
                sql.push_str(" AND ");
            }

            match condition.operator {
                QueryOperator::Exists => {
                    sql.push_str("EXISTS (");
                    if let Some(ref subquery) = condition.subquery {
                        sql.push_str(&subquery.build_select_sql(params));
                    }
                    sql.push(')');
                }
                // An empty IN list is a syntax error in SQL; match nothing instead
                QueryOperator::In if condition.values.is_empty() => {
                    sql.push_str("1 = 0");
                }
                QueryOperator::In => {
                    sql.push_str(&condition.column);
                    sql.push_str(" IN (");
                    for (j, value) in condition.values.iter().enumerate() {
                        if j > 0 {
                            sql.push_str(", ");
                        }
                        params.push(value.clone());
                        sql.push_str(&format!("${}", params.len()));
                    }
                    sql.push(')');
                }
                QueryOperator::IsNotNull => {
                    sql.push_str(&condition.column);
                    sql.push_str(" IS NOT NULL");
                }
                QueryOperator::ColumnEqual => {
                    let other = condition.other_column.as_deref().unwrap_or("NULL");
                    sql.push_str(&format!("{} = {}", condition.column, other));
                }
                QueryOperator::Equal | QueryOperator::NotEqual => {
                    sql.push_str(&condition.column);
                    sql.push(' ');
                    sql.push_str(&condition.operator.to_string());
                    if let Some(ref value) = condition.value {
                        params.push(value.clone());
                        sql.push_str(&format!(" ${}", params.len()));
                    }
                }
            }
        }
    }

    /// Helper method to build ORDER BY and LIMIT clauses
    fn build_order_limit_clause(&self, sql: &mut String) {
        // ORDER BY clause
        if !self.order_by.is_empty() {
            sql.push_str(" ORDER BY ");
            for (i, (column, direction)) in self.order_by.iter().enumerate() {
                if i > 0 {
                    sql.push_str(", ");
                }
                sql.push_str(&format!("{} {}", column, direction));
            }
        }

        // LIMIT clause
        if let Some(limit) = self.limit_count {
            sql.push_str(&format!(" LIMIT {}", limit));
        }

        // OFFSET clause
        if let Some(offset) = self.offset_value {
            sql.push_str(&format!(" OFFSET {}", offset));
        }
    }
}
