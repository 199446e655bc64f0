//! Catering vendor queries

use shared::models::{
    CateringVendor, CateringVendorCreate, CateringVendorListQuery, CateringVendorUpdate,
};
use shared::response::PageRequest;
use sqlx::{SqliteExecutor, SqlitePool};

use super::{Page, QueryBuilder};

const COLUMNS: &str =
    "id, name, contact_person, phone, email, address, is_active, created_at, updated_at";

pub async fn list(
    pool: &SqlitePool,
    query: &CateringVendorListQuery,
) -> Result<Page<CateringVendor>, sqlx::Error> {
    let mut qb = QueryBuilder::new();
    if query.active_only.unwrap_or(false) {
        qb.add_condition("is_active = 1");
    }
    if let Some(search) = &query.search {
        qb.add_search_condition(&["name", "contact_person", "phone"], search);
    }
    super::fetch_page(
        pool,
        &qb,
        COLUMNS,
        "catering_vendors",
        "name",
        PageRequest::new(query.page, query.per_page),
    )
    .await
}

pub async fn find_by_id(
    db: impl SqliteExecutor<'_>,
    id: i64,
) -> Result<Option<CateringVendor>, sqlx::Error> {
    sqlx::query_as::<_, CateringVendor>(&format!(
        "SELECT {COLUMNS} FROM catering_vendors WHERE id = ?"
    ))
    .bind(id)
    .fetch_optional(db)
    .await
}

pub async fn create(pool: &SqlitePool, data: &CateringVendorCreate) -> Result<i64, sqlx::Error> {
    let now = shared::util::now_millis();
    sqlx::query_scalar(
        "INSERT INTO catering_vendors (name, contact_person, phone, email, address, is_active, created_at, updated_at) \
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?7) RETURNING id",
    )
    .bind(data.name.trim())
    .bind(&data.contact_person)
    .bind(&data.phone)
    .bind(&data.email)
    .bind(&data.address)
    .bind(data.is_active.unwrap_or(true))
    .bind(now)
    .fetch_one(pool)
    .await
}

pub async fn update(
    pool: &SqlitePool,
    id: i64,
    data: &CateringVendorUpdate,
) -> Result<bool, sqlx::Error> {
    let result = sqlx::query(
        "UPDATE catering_vendors SET \
            name = COALESCE(?1, name), \
            contact_person = CASE WHEN ?2 THEN ?3 ELSE contact_person END, \
            phone = CASE WHEN ?4 THEN ?5 ELSE phone END, \
            email = CASE WHEN ?6 THEN ?7 ELSE email END, \
            address = CASE WHEN ?8 THEN ?9 ELSE address END, \
            is_active = COALESCE(?10, is_active), \
            updated_at = ?11 \
         WHERE id = ?12",
    )
    .bind(data.name.as_deref().map(str::trim))
    .bind(data.contact_person.is_some())
    .bind(data.contact_person.as_ref().and_then(Option::as_deref))
    .bind(data.phone.is_some())
    .bind(data.phone.as_ref().and_then(Option::as_deref))
    .bind(data.email.is_some())
    .bind(data.email.as_ref().and_then(Option::as_deref))
    .bind(data.address.is_some())
    .bind(data.address.as_ref().and_then(Option::as_deref))
    .bind(data.is_active)
    .bind(shared::util::now_millis())
    .bind(id)
    .execute(pool)
    .await?;
    Ok(result.rows_affected() > 0)
}

/// Number of dinner packages offered by the vendor
pub async fn count_packages(pool: &SqlitePool, id: i64) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar("SELECT COUNT(*) FROM dinner_packages WHERE catering_vendor_id = ?")
        .bind(id)
        .fetch_one(pool)
        .await
}

pub async fn delete(pool: &SqlitePool, id: i64) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM catering_vendors WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}
