use chrono::NaiveDate;
use sqlx::query::{QueryAs, QueryScalar};
use sqlx::sqlite::SqliteArguments;
use sqlx::{FromRow, Sqlite};

/// Query builder for constructing SQL queries with dynamic WHERE conditions
pub struct QueryBuilder {
    conditions: Vec<String>,
    bindings: Vec<QueryValue>,
}

#[derive(Clone)]
pub enum QueryValue {
    Text(String),
    Integer(i64),
}

impl QueryBuilder {
    pub fn new() -> Self {
        Self {
            conditions: Vec::new(),
            bindings: Vec::new(),
        }
    }

    /// Add a condition; bind its placeholders right after
    pub fn add_condition(&mut self, condition: &str) -> &mut Self {
        self.conditions.push(condition.to_string());
        self
    }

    /// Add a text binding
    pub fn bind_text(&mut self, value: impl Into<String>) -> &mut Self {
        self.bindings.push(QueryValue::Text(value.into()));
        self
    }

    /// Add an integer binding
    pub fn bind_i64(&mut self, value: i64) -> &mut Self {
        self.bindings.push(QueryValue::Integer(value));
        self
    }

    /// Add a date binding (stored as `YYYY-MM-DD` text)
    pub fn bind_date(&mut self, value: NaiveDate) -> &mut Self {
        self.bindings
            .push(QueryValue::Text(value.format("%Y-%m-%d").to_string()));
        self
    }

    /// Add LIKE search condition over several fields. Blank searches are ignored.
    pub fn add_search_condition(&mut self, fields: &[&str], search: &str) -> &mut Self {
        let search = search.trim();
        if search.is_empty() || fields.is_empty() {
            return self;
        }

        let field_conditions: Vec<String> = fields
            .iter()
            .map(|field| format!("{} LIKE ?", field))
            .collect();

        let condition = format!("({})", field_conditions.join(" OR "));
        self.conditions.push(condition);

        let search_pattern = format!("%{}%", search);
        for _ in fields {
            self.bindings.push(QueryValue::Text(search_pattern.clone()));
        }

        self
    }

    /// Add IN condition over text values
    pub fn add_in_condition(&mut self, field: &str, values: &[&str]) -> &mut Self {
        let placeholders: Vec<&str> = values.iter().map(|_| "?").collect();
        let condition = format!("{} IN ({})", field, placeholders.join(", "));
        self.conditions.push(condition);

        for val in values {
            self.bindings.push(QueryValue::Text(val.to_string()));
        }

        self
    }

    /// Build WHERE clause (empty if no conditions)
    pub fn build_where_clause(&self) -> String {
        if self.conditions.is_empty() {
            String::new()
        } else {
            format!(" WHERE {}", self.conditions.join(" AND "))
        }
    }

    /// Apply bindings to a SQLx query_as
    pub fn apply_bindings_as<'a, 'b, O>(
        &'b self,
        mut query: QueryAs<'a, Sqlite, O, SqliteArguments<'a>>,
    ) -> QueryAs<'a, Sqlite, O, SqliteArguments<'a>>
    where
        O: for<'r> FromRow<'r, sqlx::sqlite::SqliteRow>,
        'b: 'a,
    {
        for binding in &self.bindings {
            query = match binding {
                QueryValue::Text(s) => query.bind(s.as_str()),
                QueryValue::Integer(i) => query.bind(*i),
            };
        }
        query
    }

    /// Apply bindings to a SQLx query_scalar
    pub fn apply_bindings_scalar<'a, 'b, O>(
        &'b self,
        mut query: QueryScalar<'a, Sqlite, O, SqliteArguments<'a>>,
    ) -> QueryScalar<'a, Sqlite, O, SqliteArguments<'a>>
    where
        O: Send + Unpin,
        'b: 'a,
    {
        for binding in &self.bindings {
            query = match binding {
                QueryValue::Text(s) => query.bind(s.as_str()),
                QueryValue::Integer(i) => query.bind(*i),
            };
        }
        query
    }
}

impl Default for QueryBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_where_clause() {
        let builder = QueryBuilder::new();
        assert_eq!(builder.build_where_clause(), "");
    }

    #[test]
    fn test_multiple_conditions() {
        let mut builder = QueryBuilder::new();
        builder
            .add_condition("b.deleted_at IS NULL")
            .add_condition("b.status = ?")
            .bind_text("confirmed")
            .add_condition("b.hall_id = ?")
            .bind_i64(3);
        assert_eq!(
            builder.build_where_clause(),
            " WHERE b.deleted_at IS NULL AND b.status = ? AND b.hall_id = ?"
        );
    }

    #[test]
    fn test_search_condition() {
        let mut builder = QueryBuilder::new();
        builder.add_search_condition(&["customer_code", "name"], "tan");
        assert_eq!(
            builder.build_where_clause(),
            " WHERE (customer_code LIKE ? OR name LIKE ?)"
        );
    }

    #[test]
    fn test_blank_search_is_ignored() {
        let mut builder = QueryBuilder::new();
        builder.add_search_condition(&["name"], "   ");
        assert_eq!(builder.build_where_clause(), "");
    }

    #[test]
    fn test_in_condition() {
        let mut builder = QueryBuilder::new();
        builder.add_in_condition("status", &["pending", "confirmed"]);
        assert_eq!(builder.build_where_clause(), " WHERE status IN (?, ?)");
    }
}
