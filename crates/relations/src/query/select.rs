//! Query Builder SELECT operations

use super::builder::QueryBuilder;

impl QueryBuilder {
    /// Add SELECT fields to the query
    pub fn select(mut self, fields: &str) -> Self {
        if fields == "*" {
            self.select_fields.push("*".to_string());
        } else {
            self.select_fields.extend(
                fields
                    .split(',')
                    .map(|f| f.trim().to_string())
                    .filter(|f| !f.is_empty()),
            );
        }
        self
    }

    /// Select a column under an alias
    pub fn select_as(mut self, column: &str, alias: &str) -> Self {
        self.select_fields.push(format!("{} AS {}", column, alias));
        self
    }

    /// Set the FROM table
    pub fn from(mut self, table: &str) -> Self {
        self.from_tables = vec![table.to_string()];
        self
    }
}
