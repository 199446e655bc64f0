//! Code assignment against the live tables

use sqlx::SqliteConnection;

use crate::services::codes::CodeScheme;

/// Assign the next code for `scheme` in `table.column`.
///
/// Run inside the inserting transaction. Soft-deleted rows count, so codes
/// are never reused; the UNIQUE index on the column catches any race.
pub async fn next_code(
    conn: &mut SqliteConnection,
    table: &'static str,
    column: &'static str,
    scheme: CodeScheme,
    year: i32,
) -> Result<String, sqlx::Error> {
    let stem = scheme.stem(year);
    let sql = format!(
        "SELECT {column} FROM {table} WHERE {column} LIKE ? \
         ORDER BY LENGTH({column}) DESC, {column} DESC LIMIT 1"
    );
    let last: Option<String> = sqlx::query_scalar(&sql)
        .bind(format!("{stem}%"))
        .fetch_optional(&mut *conn)
        .await?;
    Ok(scheme.next(year, last.as_deref()))
}
