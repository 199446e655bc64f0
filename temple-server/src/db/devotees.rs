//! Devotee registry queries (soft-deleted rows are invisible)

use shared::models::{Devotee, DevoteeCreate, DevoteeListQuery, DevoteeUpdate};
use shared::response::PageRequest;
use sqlx::{SqliteExecutor, SqlitePool};

use super::{Page, QueryBuilder, codes};
use crate::services::codes::DEVOTEE;

const COLUMNS: &str = "id, devotee_code, name, chinese_name, phone, email, address, date_of_birth, \
     notes, is_active, created_at, updated_at";

pub async fn list(
    pool: &SqlitePool,
    query: &DevoteeListQuery,
) -> Result<Page<Devotee>, sqlx::Error> {
    let mut qb = QueryBuilder::new();
    qb.add_condition("deleted_at IS NULL");
    if query.active_only.unwrap_or(false) {
        qb.add_condition("is_active = 1");
    }
    if let Some(search) = &query.search {
        qb.add_search_condition(&["devotee_code", "name", "chinese_name", "phone"], search);
    }
    super::fetch_page(
        pool,
        &qb,
        COLUMNS,
        "devotees",
        "id DESC",
        PageRequest::new(query.page, query.per_page),
    )
    .await
}

pub async fn find_by_id(
    db: impl SqliteExecutor<'_>,
    id: i64,
) -> Result<Option<Devotee>, sqlx::Error> {
    sqlx::query_as::<_, Devotee>(&format!(
        "SELECT {COLUMNS} FROM devotees WHERE id = ? AND deleted_at IS NULL"
    ))
    .bind(id)
    .fetch_optional(db)
    .await
}

/// Insert with the next `DEV#####` code. Returns the new id.
pub async fn create(pool: &SqlitePool, data: &DevoteeCreate) -> Result<i64, sqlx::Error> {
    let mut tx = pool.begin().await?;
    let code = codes::next_code(
        &mut tx,
        "devotees",
        "devotee_code",
        DEVOTEE,
        shared::util::current_year(),
    )
    .await?;

    let now = shared::util::now_millis();
    let id = sqlx::query_scalar(
        "INSERT INTO devotees (devotee_code, name, chinese_name, phone, email, address, date_of_birth, notes, is_active, created_at, updated_at) \
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?10) RETURNING id",
    )
    .bind(&code)
    .bind(data.name.trim())
    .bind(&data.chinese_name)
    .bind(&data.phone)
    .bind(&data.email)
    .bind(&data.address)
    .bind(data.date_of_birth)
    .bind(&data.notes)
    .bind(data.is_active.unwrap_or(true))
    .bind(now)
    .fetch_one(&mut *tx)
    .await?;

    tx.commit().await?;
    Ok(id)
}

pub async fn update(pool: &SqlitePool, id: i64, data: &DevoteeUpdate) -> Result<bool, sqlx::Error> {
    let result = sqlx::query(
        "UPDATE devotees SET \
            name = COALESCE(?1, name), \
            chinese_name = CASE WHEN ?2 THEN ?3 ELSE chinese_name END, \
            phone = CASE WHEN ?4 THEN ?5 ELSE phone END, \
            email = CASE WHEN ?6 THEN ?7 ELSE email END, \
            address = CASE WHEN ?8 THEN ?9 ELSE address END, \
            date_of_birth = CASE WHEN ?10 THEN ?11 ELSE date_of_birth END, \
            notes = CASE WHEN ?12 THEN ?13 ELSE notes END, \
            is_active = COALESCE(?14, is_active), \
            updated_at = ?15 \
         WHERE id = ?16 AND deleted_at IS NULL",
    )
    .bind(data.name.as_deref().map(str::trim))
    .bind(data.chinese_name.is_some())
    .bind(data.chinese_name.as_ref().and_then(Option::as_deref))
    .bind(data.phone.is_some())
    .bind(data.phone.as_ref().and_then(Option::as_deref))
    .bind(data.email.is_some())
    .bind(data.email.as_ref().and_then(Option::as_deref))
    .bind(data.address.is_some())
    .bind(data.address.as_ref().and_then(Option::as_deref))
    .bind(data.date_of_birth.is_some())
    .bind(data.date_of_birth.flatten())
    .bind(data.notes.is_some())
    .bind(data.notes.as_ref().and_then(Option::as_deref))
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
        "UPDATE devotees SET deleted_at = ?1, updated_at = ?1 WHERE id = ?2 AND deleted_at IS NULL",
    )
    .bind(now)
    .bind(id)
    .execute(pool)
    .await?;
    Ok(result.rows_affected() > 0)
}

pub async fn count(pool: &SqlitePool) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar("SELECT COUNT(*) FROM devotees WHERE deleted_at IS NULL")
        .fetch_one(pool)
        .await
}
