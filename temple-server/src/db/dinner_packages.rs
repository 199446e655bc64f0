//! Dinner package queries, joined with the vendor name

use shared::models::{
    DinnerPackage, DinnerPackageCreate, DinnerPackageListQuery, DinnerPackageUpdate,
};
use shared::response::PageRequest;
use sqlx::{SqliteExecutor, SqlitePool};

use super::{Page, QueryBuilder};

const COLUMNS: &str = "p.id, p.catering_vendor_id, v.name AS vendor_name, p.name, p.price_per_table, \
     p.min_tables, p.description, p.is_active, p.created_at, p.updated_at";

const FROM: &str =
    "dinner_packages p LEFT JOIN catering_vendors v ON v.id = p.catering_vendor_id";

pub async fn list(
    pool: &SqlitePool,
    query: &DinnerPackageListQuery,
) -> Result<Page<DinnerPackage>, sqlx::Error> {
    let mut qb = QueryBuilder::new();
    if let Some(vendor_id) = query.catering_vendor_id {
        qb.add_condition("p.catering_vendor_id = ?").bind_i64(vendor_id);
    }
    if query.active_only.unwrap_or(false) {
        qb.add_condition("p.is_active = 1");
    }
    if let Some(search) = &query.search {
        qb.add_search_condition(&["p.name", "p.description", "v.name"], search);
    }
    super::fetch_page(
        pool,
        &qb,
        COLUMNS,
        FROM,
        "p.price_per_table, p.name",
        PageRequest::new(query.page, query.per_page),
    )
    .await
}

pub async fn list_for_vendor(
    pool: &SqlitePool,
    vendor_id: i64,
) -> Result<Vec<DinnerPackage>, sqlx::Error> {
    sqlx::query_as::<_, DinnerPackage>(&format!(
        "SELECT {COLUMNS} FROM {FROM} WHERE p.catering_vendor_id = ? ORDER BY p.price_per_table, p.name"
    ))
    .bind(vendor_id)
    .fetch_all(pool)
    .await
}

pub async fn find_by_id(
    db: impl SqliteExecutor<'_>,
    id: i64,
) -> Result<Option<DinnerPackage>, sqlx::Error> {
    sqlx::query_as::<_, DinnerPackage>(&format!("SELECT {COLUMNS} FROM {FROM} WHERE p.id = ?"))
        .bind(id)
        .fetch_optional(db)
        .await
}

pub async fn create(pool: &SqlitePool, data: &DinnerPackageCreate) -> Result<i64, sqlx::Error> {
    let now = shared::util::now_millis();
    sqlx::query_scalar(
        "INSERT INTO dinner_packages (catering_vendor_id, name, price_per_table, min_tables, description, is_active, created_at, updated_at) \
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?7) RETURNING id",
    )
    .bind(data.catering_vendor_id)
    .bind(data.name.trim())
    .bind(data.price_per_table)
    .bind(data.min_tables.unwrap_or(1))
    .bind(&data.description)
    .bind(data.is_active.unwrap_or(true))
    .bind(now)
    .fetch_one(pool)
    .await
}

pub async fn update(
    pool: &SqlitePool,
    id: i64,
    data: &DinnerPackageUpdate,
) -> Result<bool, sqlx::Error> {
    let result = sqlx::query(
        "UPDATE dinner_packages SET \
            catering_vendor_id = COALESCE(?1, catering_vendor_id), \
            name = COALESCE(?2, name), \
            price_per_table = COALESCE(?3, price_per_table), \
            min_tables = COALESCE(?4, min_tables), \
            description = CASE WHEN ?5 THEN ?6 ELSE description END, \
            is_active = COALESCE(?7, is_active), \
            updated_at = ?8 \
         WHERE id = ?9",
    )
    .bind(data.catering_vendor_id)
    .bind(data.name.as_deref().map(str::trim))
    .bind(data.price_per_table)
    .bind(data.min_tables)
    .bind(data.description.is_some())
    .bind(data.description.as_ref().and_then(Option::as_deref))
    .bind(data.is_active)
    .bind(shared::util::now_millis())
    .bind(id)
    .execute(pool)
    .await?;
    Ok(result.rows_affected() > 0)
}

/// Whether any booking or quotation still references the package
pub async fn is_referenced(pool: &SqlitePool, id: i64) -> Result<bool, sqlx::Error> {
    sqlx::query_scalar(
        "SELECT EXISTS (SELECT 1 FROM booking_dinner_packages WHERE dinner_package_id = ?1) \
             OR EXISTS (SELECT 1 FROM quotations WHERE dinner_package_id = ?1)",
    )
    .bind(id)
    .fetch_one(pool)
    .await
}

pub async fn delete(pool: &SqlitePool, id: i64) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM dinner_packages WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}
