//! Database access layer
//!
//! SQLite pool setup, migrations and per-table query functions. Query
//! functions return `sqlx::Error`; business rules live in the handlers.

pub mod billing_items;
pub mod bookings;
pub mod catering_vendors;
pub mod codes;
pub mod customers;
pub mod dashboard;
pub mod devotees;
pub mod dinner_packages;
pub mod halls;
pub mod payments;
pub mod query_builder;
pub mod quotations;
pub mod revoked_tokens;
pub mod system_settings;
pub mod users;

pub use query_builder::QueryBuilder;

use shared::response::PageRequest;
use sqlx::sqlite::{
    SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteRow, SqliteSynchronous,
};
use sqlx::{FromRow, SqlitePool};
use std::str::FromStr;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Open the pool (WAL, foreign keys on) and apply migrations
pub async fn connect(database_url: &str, max_connections: u32) -> Result<SqlitePool, BoxError> {
    let in_memory = database_url.contains(":memory:");

    let mut options = SqliteConnectOptions::from_str(database_url)?
        .create_if_missing(true)
        .foreign_keys(true)
        .busy_timeout(std::time::Duration::from_secs(5));
    if !in_memory {
        options = options
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal);
    }

    // An in-memory database lives and dies with its single connection
    let mut pool_options = SqlitePoolOptions::new();
    pool_options = if in_memory {
        pool_options
            .max_connections(1)
            .idle_timeout(None::<std::time::Duration>)
            .max_lifetime(None::<std::time::Duration>)
    } else {
        pool_options.max_connections(max_connections)
    };

    let pool = pool_options.connect_with(options).await?;
    tracing::info!(in_memory, "Database connection established");

    sqlx::migrate!("./migrations").run(&pool).await?;
    tracing::info!("Database migrations applied");

    Ok(pool)
}

/// Rows matched by a paginated list query
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: u64,
}

/// Run a count query and a page query sharing the same FROM and WHERE.
///
/// `from` includes any joins, `order_by` is appended verbatim.
pub async fn fetch_page<T>(
    pool: &SqlitePool,
    qb: &QueryBuilder,
    columns: &str,
    from: &str,
    order_by: &str,
    page: PageRequest,
) -> Result<Page<T>, sqlx::Error>
where
    T: for<'r> FromRow<'r, SqliteRow> + Send + Unpin,
{
    let where_clause = qb.build_where_clause();

    let count_sql = format!("SELECT COUNT(*) FROM {from}{where_clause}");
    let total: i64 = qb
        .apply_bindings_scalar(sqlx::query_scalar(&count_sql))
        .fetch_one(pool)
        .await?;

    let (limit, offset) = page.limit_offset();
    let sql = format!("SELECT {columns} FROM {from}{where_clause} ORDER BY {order_by} LIMIT ? OFFSET ?");
    let items = qb
        .apply_bindings_as(sqlx::query_as::<_, T>(&sql))
        .bind(limit)
        .bind(offset)
        .fetch_all(pool)
        .await?;

    Ok(Page {
        items,
        total: total.max(0) as u64,
    })
}
