//! Billing item queries

use shared::models::{BillingItem, BillingItemCreate, BillingItemListQuery, BillingItemUpdate};
use shared::response::PageRequest;
use sqlx::{SqliteExecutor, SqlitePool};

use super::{Page, QueryBuilder};

const COLUMNS: &str =
    "id, name, category, unit, unit_price, description, is_active, created_at, updated_at";

pub async fn list(
    pool: &SqlitePool,
    query: &BillingItemListQuery,
) -> Result<Page<BillingItem>, sqlx::Error> {
    let mut qb = QueryBuilder::new();
    if let Some(category) = query.category.as_deref().filter(|c| !c.is_empty()) {
        qb.add_condition("category = ?").bind_text(category);
    }
    if query.active_only.unwrap_or(false) {
        qb.add_condition("is_active = 1");
    }
    if let Some(search) = &query.search {
        qb.add_search_condition(&["name", "description"], search);
    }
    super::fetch_page(
        pool,
        &qb,
        COLUMNS,
        "billing_items",
        "category, name",
        PageRequest::new(query.page, query.per_page),
    )
    .await
}

pub async fn find_by_id(
    db: impl SqliteExecutor<'_>,
    id: i64,
) -> Result<Option<BillingItem>, sqlx::Error> {
    sqlx::query_as::<_, BillingItem>(&format!("SELECT {COLUMNS} FROM billing_items WHERE id = ?"))
        .bind(id)
        .fetch_optional(db)
        .await
}

pub async fn create(pool: &SqlitePool, data: &BillingItemCreate) -> Result<i64, sqlx::Error> {
    let now = shared::util::now_millis();
    sqlx::query_scalar(
        "INSERT INTO billing_items (name, category, unit, unit_price, description, is_active, created_at, updated_at) \
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?7) RETURNING id",
    )
    .bind(data.name.trim())
    .bind(&data.category)
    .bind(&data.unit)
    .bind(data.unit_price)
    .bind(&data.description)
    .bind(data.is_active.unwrap_or(true))
    .bind(now)
    .fetch_one(pool)
    .await
}

pub async fn update(
    pool: &SqlitePool,
    id: i64,
    data: &BillingItemUpdate,
) -> Result<bool, sqlx::Error> {
    let result = sqlx::query(
        "UPDATE billing_items SET \
            name = COALESCE(?1, name), \
            category = CASE WHEN ?2 THEN ?3 ELSE category END, \
            unit = CASE WHEN ?4 THEN ?5 ELSE unit END, \
            unit_price = COALESCE(?6, unit_price), \
            description = CASE WHEN ?7 THEN ?8 ELSE description END, \
            is_active = COALESCE(?9, is_active), \
            updated_at = ?10 \
         WHERE id = ?11",
    )
    .bind(data.name.as_deref().map(str::trim))
    .bind(data.category.is_some())
    .bind(data.category.as_ref().and_then(Option::as_deref))
    .bind(data.unit.is_some())
    .bind(data.unit.as_ref().and_then(Option::as_deref))
    .bind(data.unit_price)
    .bind(data.description.is_some())
    .bind(data.description.as_ref().and_then(Option::as_deref))
    .bind(data.is_active)
    .bind(shared::util::now_millis())
    .bind(id)
    .execute(pool)
    .await?;
    Ok(result.rows_affected() > 0)
}

/// Hard delete; line items keep their copied description and price
pub async fn delete(pool: &SqlitePool, id: i64) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM billing_items WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}
