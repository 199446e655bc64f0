//! Customer queries (soft-deleted rows are invisible)

use shared::models::{Customer, CustomerCreate, CustomerListQuery, CustomerUpdate};
use shared::response::PageRequest;
use sqlx::{SqliteExecutor, SqlitePool};

use super::{Page, QueryBuilder, codes};
use crate::services::codes::CUSTOMER;

const COLUMNS: &str =
    "id, customer_code, name, phone, email, address, ic_number, notes, created_at, updated_at";

pub async fn list(
    pool: &SqlitePool,
    query: &CustomerListQuery,
) -> Result<Page<Customer>, sqlx::Error> {
    let mut qb = QueryBuilder::new();
    qb.add_condition("deleted_at IS NULL");
    if let Some(search) = &query.search {
        qb.add_search_condition(&["customer_code", "name", "phone", "email"], search);
    }
    super::fetch_page(
        pool,
        &qb,
        COLUMNS,
        "customers",
        "id DESC",
        PageRequest::new(query.page, query.per_page),
    )
    .await
}

pub async fn find_by_id(
    db: impl SqliteExecutor<'_>,
    id: i64,
) -> Result<Option<Customer>, sqlx::Error> {
    sqlx::query_as::<_, Customer>(&format!(
        "SELECT {COLUMNS} FROM customers WHERE id = ? AND deleted_at IS NULL"
    ))
    .bind(id)
    .fetch_optional(db)
    .await
}

/// Insert with the next `CUST#####` code. Returns the new id.
pub async fn create(pool: &SqlitePool, data: &CustomerCreate) -> Result<i64, sqlx::Error> {
    let mut tx = pool.begin().await?;
    let code = codes::next_code(
        &mut tx,
        "customers",
        "customer_code",
        CUSTOMER,
        shared::util::current_year(),
    )
    .await?;

    let now = shared::util::now_millis();
    let id = sqlx::query_scalar(
        "INSERT INTO customers (customer_code, name, phone, email, address, ic_number, notes, created_at, updated_at) \
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?8) RETURNING id",
    )
    .bind(&code)
    .bind(data.name.trim())
    .bind(&data.phone)
    .bind(&data.email)
    .bind(&data.address)
    .bind(&data.ic_number)
    .bind(&data.notes)
    .bind(now)
    .fetch_one(&mut *tx)
    .await?;

    tx.commit().await?;
    Ok(id)
}

/// Apply the present fields; an explicit `null` clears a nullable column.
/// Returns whether a live row was updated.
pub async fn update(pool: &SqlitePool, id: i64, data: &CustomerUpdate) -> Result<bool, sqlx::Error> {
    let result = sqlx::query(
        "UPDATE customers SET \
            name = COALESCE(?1, name), \
            phone = CASE WHEN ?2 THEN ?3 ELSE phone END, \
            email = CASE WHEN ?4 THEN ?5 ELSE email END, \
            address = CASE WHEN ?6 THEN ?7 ELSE address END, \
            ic_number = CASE WHEN ?8 THEN ?9 ELSE ic_number END, \
            notes = CASE WHEN ?10 THEN ?11 ELSE notes END, \
            updated_at = ?12 \
         WHERE id = ?13 AND deleted_at IS NULL",
    )
    .bind(data.name.as_deref().map(str::trim))
    .bind(data.phone.is_some())
    .bind(data.phone.as_ref().and_then(Option::as_deref))
    .bind(data.email.is_some())
    .bind(data.email.as_ref().and_then(Option::as_deref))
    .bind(data.address.is_some())
    .bind(data.address.as_ref().and_then(Option::as_deref))
    .bind(data.ic_number.is_some())
    .bind(data.ic_number.as_ref().and_then(Option::as_deref))
    .bind(data.notes.is_some())
    .bind(data.notes.as_ref().and_then(Option::as_deref))
    .bind(shared::util::now_millis())
    .bind(id)
    .execute(pool)
    .await?;
    Ok(result.rows_affected() > 0)
}

pub async fn soft_delete(pool: &SqlitePool, id: i64) -> Result<bool, sqlx::Error> {
    let now = shared::util::now_millis();
    let result = sqlx::query(
        "UPDATE customers SET deleted_at = ?1, updated_at = ?1 WHERE id = ?2 AND deleted_at IS NULL",
    )
    .bind(now)
    .bind(id)
    .execute(pool)
    .await?;
    Ok(result.rows_affected() > 0)
}

pub async fn count(pool: &SqlitePool) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar("SELECT COUNT(*) FROM customers WHERE deleted_at IS NULL")
        .fetch_one(pool)
        .await
}
