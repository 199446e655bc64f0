//! Hall queries (soft-deleted rows are invisible)

use shared::models::{Hall, HallCreate, HallListQuery, HallUpdate};
use shared::response::PageRequest;
use sqlx::{SqliteExecutor, SqlitePool};

use super::{Page, QueryBuilder};

const COLUMNS: &str =
    "id, name, capacity, location, base_price, description, is_active, created_at, updated_at";

pub async fn list(pool: &SqlitePool, query: &HallListQuery) -> Result<Page<Hall>, sqlx::Error> {
    let mut qb = QueryBuilder::new();
    qb.add_condition("deleted_at IS NULL");
    if query.active_only.unwrap_or(false) {
        qb.add_condition("is_active = 1");
    }
    if let Some(search) = &query.search {
        qb.add_search_condition(&["name", "location"], search);
    }
    super::fetch_page(
        pool,
        &qb,
        COLUMNS,
        "halls",
        "name",
        PageRequest::new(query.page, query.per_page),
    )
    .await
}

pub async fn find_by_id(db: impl SqliteExecutor<'_>, id: i64) -> Result<Option<Hall>, sqlx::Error> {
    sqlx::query_as::<_, Hall>(&format!(
        "SELECT {COLUMNS} FROM halls WHERE id = ? AND deleted_at IS NULL"
    ))
    .bind(id)
    .fetch_optional(db)
    .await
}

/// Whether another live hall already uses `name` (case-insensitive)
pub async fn name_taken(
    pool: &SqlitePool,
    name: &str,
    exclude_id: Option<i64>,
) -> Result<bool, sqlx::Error> {
    let found: Option<i64> = sqlx::query_scalar(
        "SELECT id FROM halls WHERE name = ?1 COLLATE NOCASE AND deleted_at IS NULL \
         AND (?2 IS NULL OR id != ?2) LIMIT 1",
    )
    .bind(name.trim())
    .bind(exclude_id)
    .fetch_optional(pool)
    .await?;
    Ok(found.is_some())
}

pub async fn create(pool: &SqlitePool, data: &HallCreate) -> Result<i64, sqlx::Error> {
    let now = shared::util::now_millis();
    sqlx::query_scalar(
        "INSERT INTO halls (name, capacity, location, base_price, description, is_active, created_at, updated_at) \
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?7) RETURNING id",
    )
    .bind(data.name.trim())
    .bind(data.capacity.unwrap_or(0))
    .bind(&data.location)
    .bind(data.base_price.unwrap_or(0.0))
    .bind(&data.description)
    .bind(data.is_active.unwrap_or(true))
    .bind(now)
    .fetch_one(pool)
    .await
}

pub async fn update(pool: &SqlitePool, id: i64, data: &HallUpdate) -> Result<bool, sqlx::Error> {
    let result = sqlx::query(
        "UPDATE halls SET \
            name = COALESCE(?1, name), \
            capacity = COALESCE(?2, capacity), \
            location = CASE WHEN ?3 THEN ?4 ELSE location END, \
            base_price = COALESCE(?5, base_price), \
            description = CASE WHEN ?6 THEN ?7 ELSE description END, \
            is_active = COALESCE(?8, is_active), \
            updated_at = ?9 \
         WHERE id = ?10 AND deleted_at IS NULL",
    )
    .bind(data.name.as_deref().map(str::trim))
    .bind(data.capacity)
    .bind(data.location.is_some())
    .bind(data.location.as_ref().and_then(Option::as_deref))
    .bind(data.base_price)
    .bind(data.description.is_some())
    .bind(data.description.as_ref().and_then(Option::as_deref))
    .bind(data.is_active)
    .bind(shared::util::now_millis())
    .bind(id)
    .execute(pool)
    .await?;
    Ok(result.rows_affected() > 0)
}

pub async fn soft_delete(pool: &SqlitePool, id: i64) -> Result<bool, sqlx::Error> {
    let now = shared::util::now_millis();
    let result = sqlx::query(
        "UPDATE halls SET deleted_at = ?1, updated_at = ?1 WHERE id = ?2 AND deleted_at IS NULL",
    )
    .bind(now)
    .bind(id)
    .execute(pool)
    .await?;
    Ok(result.rows_affected() > 0)
}

pub async fn count_active(pool: &SqlitePool) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar("SELECT COUNT(*) FROM halls WHERE deleted_at IS NULL AND is_active = 1")
        .fetch_one(pool)
        .await
}
