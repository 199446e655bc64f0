//! User queries

use shared::models::{Role, User, UserListQuery};
use shared::response::PageRequest;
use sqlx::{SqliteExecutor, SqlitePool};

use super::{Page, QueryBuilder};

const COLUMNS: &str = "id, name, email, password_hash, role, is_active, created_at, updated_at";

pub async fn find_by_id(db: impl SqliteExecutor<'_>, id: i64) -> Result<Option<User>, sqlx::Error> {
    sqlx::query_as::<_, User>(&format!("SELECT {COLUMNS} FROM users WHERE id = ?"))
        .bind(id)
        .fetch_optional(db)
        .await
}

pub async fn find_by_email(pool: &SqlitePool, email: &str) -> Result<Option<User>, sqlx::Error> {
    sqlx::query_as::<_, User>(&format!("SELECT {COLUMNS} FROM users WHERE email = ?"))
        .bind(email)
        .fetch_optional(pool)
        .await
}

pub async fn count(pool: &SqlitePool) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar("SELECT COUNT(*) FROM users")
        .fetch_one(pool)
        .await
}

pub async fn list(pool: &SqlitePool, query: &UserListQuery) -> Result<Page<User>, sqlx::Error> {
    let mut qb = QueryBuilder::new();
    if let Some(search) = &query.search {
        qb.add_search_condition(&["name", "email"], search);
    }
    if let Some(role) = query.role {
        qb.add_condition("role = ?").bind_text(role.as_str());
    }
    super::fetch_page(
        pool,
        &qb,
        COLUMNS,
        "users",
        "id",
        PageRequest::new(query.page, query.per_page),
    )
    .await
}

/// Row values for insert and update
pub struct UserRow<'a> {
    pub name: &'a str,
    pub email: &'a str,
    pub password_hash: &'a str,
    pub role: Role,
    pub is_active: bool,
}

pub async fn create(pool: &SqlitePool, row: UserRow<'_>) -> Result<i64, sqlx::Error> {
    let now = shared::util::now_millis();
    sqlx::query_scalar(
        "INSERT INTO users (name, email, password_hash, role, is_active, created_at, updated_at) \
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?6) RETURNING id",
    )
    .bind(row.name)
    .bind(row.email)
    .bind(row.password_hash)
    .bind(row.role)
    .bind(row.is_active)
    .bind(now)
    .fetch_one(pool)
    .await
}

pub async fn update(pool: &SqlitePool, id: i64, row: UserRow<'_>) -> Result<(), sqlx::Error> {
    let now = shared::util::now_millis();
    sqlx::query(
        "UPDATE users SET name = ?1, email = ?2, password_hash = ?3, role = ?4, is_active = ?5, \
         updated_at = ?6 WHERE id = ?7",
    )
    .bind(row.name)
    .bind(row.email)
    .bind(row.password_hash)
    .bind(row.role)
    .bind(row.is_active)
    .bind(now)
    .bind(id)
    .execute(pool)
    .await?;
    Ok(())
}

pub async fn update_password(
    pool: &SqlitePool,
    id: i64,
    password_hash: &str,
) -> Result<(), sqlx::Error> {
    sqlx::query("UPDATE users SET password_hash = ?1, updated_at = ?2 WHERE id = ?3")
        .bind(password_hash)
        .bind(shared::util::now_millis())
        .bind(id)
        .execute(pool)
        .await?;
    Ok(())
}

/// Hard delete. Returns whether a row was removed.
pub async fn delete(pool: &SqlitePool, id: i64) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM users WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}
