//! Quotation queries
//!
//! Stored statuses never read `expired` on their own; the list filter applies
//! the same validity rule as [`QuotationStatus::effective`].

use chrono::NaiveDate;
use shared::models::{Quotation, QuotationItem, QuotationListQuery, QuotationStatus, TimeSlot};
use shared::response::PageRequest;
use sqlx::{SqliteConnection, SqliteExecutor, SqlitePool};

use super::{Page, QueryBuilder, codes};
use crate::services::codes::QUOTATION;
use crate::services::pricing::{PricedItem, Pricing};

const COLUMNS: &str = "q.id, q.quotation_code, q.customer_id, c.name AS customer_name, q.hall_id, \
     h.name AS hall_name, q.event_date, q.time_slot, q.valid_until, q.status, q.notes, q.subtotal, \
     q.dinner_package_id, q.table_count, q.dinner_price_per_table, q.dinner_total, q.total_amount, \
     q.booking_id, q.created_by, q.created_at, q.updated_at";

const FROM: &str = "quotations q \
     LEFT JOIN customers c ON c.id = q.customer_id \
     LEFT JOIN halls h ON h.id = q.hall_id";

const ITEM_COLUMNS: &str =
    "id, quotation_id, billing_item_id, description, quantity, unit_price, subtotal";

pub async fn list(
    pool: &SqlitePool,
    query: &QuotationListQuery,
    today: NaiveDate,
) -> Result<Page<Quotation>, sqlx::Error> {
    let mut qb = QueryBuilder::new();
    match query.status {
        Some(QuotationStatus::Expired) => {
            qb.add_condition(
                "(q.status = 'expired' OR (q.status IN ('draft', 'sent') AND q.valid_until < ?))",
            )
            .bind_date(today);
        }
        Some(status) if status.is_open() => {
            qb.add_condition("q.status = ? AND q.valid_until >= ?")
                .bind_text(status.as_str())
                .bind_date(today);
        }
        Some(status) => {
            qb.add_condition("q.status = ?").bind_text(status.as_str());
        }
        None => {}
    }
    if let Some(customer_id) = query.customer_id {
        qb.add_condition("q.customer_id = ?").bind_i64(customer_id);
    }
    if let Some(search) = &query.search {
        qb.add_search_condition(&["q.quotation_code", "c.name", "h.name"], search);
    }
    let page: Page<Quotation> = super::fetch_page(
        pool,
        &qb,
        COLUMNS,
        FROM,
        "q.id DESC",
        PageRequest::new(query.page, query.per_page),
    )
    .await?;
    Ok(Page {
        items: page
            .items
            .into_iter()
            .map(|q| q.with_effective_status(today))
            .collect(),
        total: page.total,
    })
}

/// Stored row; callers apply the effective status
pub async fn find_by_id(
    db: impl SqliteExecutor<'_>,
    id: i64,
) -> Result<Option<Quotation>, sqlx::Error> {
    sqlx::query_as::<_, Quotation>(&format!("SELECT {COLUMNS} FROM {FROM} WHERE q.id = ?"))
        .bind(id)
        .fetch_optional(db)
        .await
}

pub async fn items(
    db: impl SqliteExecutor<'_>,
    quotation_id: i64,
) -> Result<Vec<QuotationItem>, sqlx::Error> {
    sqlx::query_as::<_, QuotationItem>(&format!(
        "SELECT {ITEM_COLUMNS} FROM quotation_items WHERE quotation_id = ? ORDER BY id"
    ))
    .bind(quotation_id)
    .fetch_all(db)
    .await
}

/// Draft or sent quotations still within their validity
pub async fn count_open(pool: &SqlitePool, today: NaiveDate) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar(
        "SELECT COUNT(*) FROM quotations WHERE status IN ('draft', 'sent') AND valid_until >= ?",
    )
    .bind(today)
    .fetch_one(pool)
    .await
}

/// Quotation columns a handler settles before writing
pub struct QuotationRow<'a> {
    pub customer_id: i64,
    pub hall_id: i64,
    pub event_date: NaiveDate,
    pub time_slot: TimeSlot,
    pub valid_until: NaiveDate,
    pub notes: Option<&'a str>,
}

/// Insert a draft quotation with its items under the next `QT` code.
///
/// Returns the new id.
pub async fn insert(
    conn: &mut SqliteConnection,
    row: &QuotationRow<'_>,
    pricing: &Pricing,
    created_by: Option<i64>,
) -> Result<i64, sqlx::Error> {
    let code = codes::next_code(
        conn,
        "quotations",
        "quotation_code",
        QUOTATION,
        shared::util::current_year(),
    )
    .await?;

    let package = pricing.package.as_ref();
    let now = shared::util::now_millis();
    let id: i64 = sqlx::query_scalar(
        "INSERT INTO quotations (quotation_code, customer_id, hall_id, event_date, time_slot, \
            valid_until, status, notes, subtotal, dinner_package_id, table_count, \
            dinner_price_per_table, dinner_total, total_amount, created_by, created_at, updated_at) \
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, 'draft', ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?15) \
         RETURNING id",
    )
    .bind(&code)
    .bind(row.customer_id)
    .bind(row.hall_id)
    .bind(row.event_date)
    .bind(row.time_slot)
    .bind(row.valid_until)
    .bind(row.notes)
    .bind(pricing.subtotal)
    .bind(package.map(|p| p.dinner_package_id))
    .bind(package.map(|p| p.table_count))
    .bind(package.map(|p| p.price_per_table))
    .bind(pricing.dinner_total)
    .bind(pricing.total_amount)
    .bind(created_by)
    .bind(now)
    .fetch_one(&mut *conn)
    .await?;

    replace_items(conn, id, &pricing.items).await?;
    Ok(id)
}

/// Rewrite the quotation columns, package and totals
pub async fn update(
    conn: &mut SqliteConnection,
    id: i64,
    row: &QuotationRow<'_>,
    pricing: &Pricing,
) -> Result<(), sqlx::Error> {
    let package = pricing.package.as_ref();
    sqlx::query(
        "UPDATE quotations SET customer_id = ?1, hall_id = ?2, event_date = ?3, time_slot = ?4, \
            valid_until = ?5, notes = ?6, subtotal = ?7, dinner_package_id = ?8, table_count = ?9, \
            dinner_price_per_table = ?10, dinner_total = ?11, total_amount = ?12, updated_at = ?13 \
         WHERE id = ?14",
    )
    .bind(row.customer_id)
    .bind(row.hall_id)
    .bind(row.event_date)
    .bind(row.time_slot)
    .bind(row.valid_until)
    .bind(row.notes)
    .bind(pricing.subtotal)
    .bind(package.map(|p| p.dinner_package_id))
    .bind(package.map(|p| p.table_count))
    .bind(package.map(|p| p.price_per_table))
    .bind(pricing.dinner_total)
    .bind(pricing.total_amount)
    .bind(shared::util::now_millis())
    .bind(id)
    .execute(&mut *conn)
    .await?;
    Ok(())
}

pub async fn replace_items(
    conn: &mut SqliteConnection,
    quotation_id: i64,
    items: &[PricedItem],
) -> Result<(), sqlx::Error> {
    sqlx::query("DELETE FROM quotation_items WHERE quotation_id = ?")
        .bind(quotation_id)
        .execute(&mut *conn)
        .await?;
    for item in items {
        sqlx::query(
            "INSERT INTO quotation_items (quotation_id, billing_item_id, description, quantity, unit_price, subtotal) \
             VALUES (?, ?, ?, ?, ?, ?)",
        )
        .bind(quotation_id)
        .bind(item.billing_item_id)
        .bind(&item.description)
        .bind(item.quantity)
        .bind(item.unit_price)
        .bind(item.subtotal)
        .execute(&mut *conn)
        .await?;
    }
    Ok(())
}

/// Move a quotation to `status` only while its stored status is one of
/// `from`. Returns whether the row changed.
pub async fn set_status(
    db: impl SqliteExecutor<'_>,
    id: i64,
    from: &[QuotationStatus],
    status: QuotationStatus,
) -> Result<bool, sqlx::Error> {
    let placeholders = vec!["?"; from.len()].join(", ");
    let sql = format!(
        "UPDATE quotations SET status = ?, updated_at = ? WHERE id = ? AND status IN ({placeholders})"
    );
    let mut query = sqlx::query(&sql)
        .bind(status)
        .bind(shared::util::now_millis())
        .bind(id);
    for allowed in from {
        query = query.bind(*allowed);
    }
    let result = query.execute(db).await?;
    Ok(result.rows_affected() > 0)
}

/// Link an accepted quotation to its booking. Returns false when the
/// quotation is no longer accepted.
pub async fn mark_converted(
    conn: &mut SqliteConnection,
    id: i64,
    booking_id: i64,
) -> Result<bool, sqlx::Error> {
    let result = sqlx::query(
        "UPDATE quotations SET status = 'converted', booking_id = ?, updated_at = ? \
         WHERE id = ? AND status = 'accepted'",
    )
    .bind(booking_id)
    .bind(shared::util::now_millis())
    .bind(id)
    .execute(&mut *conn)
    .await?;
    Ok(result.rows_affected() > 0)
}

/// Hard delete; items go with it
pub async fn delete(pool: &SqlitePool, id: i64) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM quotations WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}
