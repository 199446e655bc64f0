//! Booking queries
//!
//! Writes take a `SqliteConnection` so the handler can run the slot check,
//! the code assignment and the insert in one transaction.

use chrono::NaiveDate;
use shared::models::{
    Booking, BookingDinnerPackage, BookingItem, BookingListQuery, BookingStatus, TimeSlot,
};
use shared::response::PageRequest;
use sqlx::{SqliteConnection, SqliteExecutor, SqlitePool};

use super::{Page, QueryBuilder, codes};
use crate::services::codes::BOOKING;
use crate::services::pricing::{self, PricedItem, PricedPackage, Pricing};

const COLUMNS: &str = "b.id, b.booking_code, b.customer_id, c.name AS customer_name, b.hall_id, \
     h.name AS hall_name, b.event_date, b.time_slot, b.event_type, b.guest_count, b.status, b.notes, \
     b.subtotal, b.dinner_total, b.total_amount, b.paid_amount, b.balance, b.quotation_id, \
     b.created_by, b.created_at, b.updated_at";

const FROM: &str = "bookings b \
     LEFT JOIN customers c ON c.id = b.customer_id \
     LEFT JOIN halls h ON h.id = b.hall_id";

const ITEM_COLUMNS: &str =
    "id, booking_id, billing_item_id, description, quantity, unit_price, subtotal";

const PACKAGE_COLUMNS: &str =
    "id, booking_id, dinner_package_id, package_name, table_count, price_per_table, total";

pub async fn list(pool: &SqlitePool, query: &BookingListQuery) -> Result<Page<Booking>, sqlx::Error> {
    let mut qb = QueryBuilder::new();
    qb.add_condition("b.deleted_at IS NULL");
    if let Some(status) = query.status {
        qb.add_condition("b.status = ?").bind_text(status.as_str());
    }
    if let Some(hall_id) = query.hall_id {
        qb.add_condition("b.hall_id = ?").bind_i64(hall_id);
    }
    if let Some(customer_id) = query.customer_id {
        qb.add_condition("b.customer_id = ?").bind_i64(customer_id);
    }
    if let Some(from) = query.date_from {
        qb.add_condition("b.event_date >= ?").bind_date(from);
    }
    if let Some(to) = query.date_to {
        qb.add_condition("b.event_date <= ?").bind_date(to);
    }
    if let Some(search) = &query.search {
        qb.add_search_condition(&["b.booking_code", "c.name", "h.name", "b.event_type"], search);
    }
    super::fetch_page(
        pool,
        &qb,
        COLUMNS,
        FROM,
        "b.event_date DESC, b.id DESC",
        PageRequest::new(query.page, query.per_page),
    )
    .await
}

pub async fn find_by_id(
    db: impl SqliteExecutor<'_>,
    id: i64,
) -> Result<Option<Booking>, sqlx::Error> {
    sqlx::query_as::<_, Booking>(&format!(
        "SELECT {COLUMNS} FROM {FROM} WHERE b.id = ? AND b.deleted_at IS NULL"
    ))
    .bind(id)
    .fetch_optional(db)
    .await
}

pub async fn list_for_customer(
    pool: &SqlitePool,
    customer_id: i64,
) -> Result<Vec<Booking>, sqlx::Error> {
    sqlx::query_as::<_, Booking>(&format!(
        "SELECT {COLUMNS} FROM {FROM} WHERE b.customer_id = ? AND b.deleted_at IS NULL \
         ORDER BY b.event_date DESC, b.id DESC"
    ))
    .bind(customer_id)
    .fetch_all(pool)
    .await
}

/// Pending and confirmed bookings with `from <= event_date <= to`
pub async fn upcoming(
    pool: &SqlitePool,
    from: NaiveDate,
    to: NaiveDate,
    limit: i64,
) -> Result<Vec<Booking>, sqlx::Error> {
    sqlx::query_as::<_, Booking>(&format!(
        "SELECT {COLUMNS} FROM {FROM} WHERE b.deleted_at IS NULL \
         AND b.status IN ('pending', 'confirmed') AND b.event_date >= ? AND b.event_date <= ? \
         ORDER BY b.event_date, b.time_slot LIMIT ?"
    ))
    .bind(from)
    .bind(to)
    .bind(limit)
    .fetch_all(pool)
    .await
}

/// Pending and confirmed bookings that still owe money
pub async fn with_outstanding_balance(pool: &SqlitePool) -> Result<Vec<Booking>, sqlx::Error> {
    sqlx::query_as::<_, Booking>(&format!(
        "SELECT {COLUMNS} FROM {FROM} WHERE b.deleted_at IS NULL \
         AND b.status IN ('pending', 'confirmed') AND b.balance > 0.01 \
         ORDER BY b.event_date"
    ))
    .fetch_all(pool)
    .await
}

pub async fn items(
    db: impl SqliteExecutor<'_>,
    booking_id: i64,
) -> Result<Vec<BookingItem>, sqlx::Error> {
    sqlx::query_as::<_, BookingItem>(&format!(
        "SELECT {ITEM_COLUMNS} FROM booking_items WHERE booking_id = ? ORDER BY id"
    ))
    .bind(booking_id)
    .fetch_all(db)
    .await
}

pub async fn dinner_package(
    db: impl SqliteExecutor<'_>,
    booking_id: i64,
) -> Result<Option<BookingDinnerPackage>, sqlx::Error> {
    sqlx::query_as::<_, BookingDinnerPackage>(&format!(
        "SELECT {PACKAGE_COLUMNS} FROM booking_dinner_packages WHERE booking_id = ?"
    ))
    .bind(booking_id)
    .fetch_optional(db)
    .await
}

/// Code of a live booking whose slot clashes with the requested one.
///
/// `full_day` clashes with every slot on the same hall and date.
pub async fn slot_conflict(
    db: impl SqliteExecutor<'_>,
    hall_id: i64,
    event_date: NaiveDate,
    time_slot: TimeSlot,
    exclude_id: Option<i64>,
) -> Result<Option<String>, sqlx::Error> {
    sqlx::query_scalar(
        "SELECT booking_code FROM bookings \
         WHERE hall_id = ?1 AND event_date = ?2 AND status != 'cancelled' AND deleted_at IS NULL \
           AND (time_slot = ?3 OR time_slot = 'full_day' OR ?3 = 'full_day') \
           AND (?4 IS NULL OR id != ?4) \
         LIMIT 1",
    )
    .bind(hall_id)
    .bind(event_date)
    .bind(time_slot)
    .bind(exclude_id)
    .fetch_optional(db)
    .await
}

/// Live bookings of a hall on one date, as `(slot, booking_code)`
pub async fn booked_slots(
    pool: &SqlitePool,
    hall_id: i64,
    event_date: NaiveDate,
) -> Result<Vec<(TimeSlot, String)>, sqlx::Error> {
    sqlx::query_as(
        "SELECT time_slot, booking_code FROM bookings \
         WHERE hall_id = ? AND event_date = ? AND status != 'cancelled' AND deleted_at IS NULL",
    )
    .bind(hall_id)
    .bind(event_date)
    .fetch_all(pool)
    .await
}

/// Booking columns a handler settles before writing
pub struct BookingRow<'a> {
    pub customer_id: i64,
    pub hall_id: i64,
    pub event_date: NaiveDate,
    pub time_slot: TimeSlot,
    pub event_type: Option<&'a str>,
    pub guest_count: Option<i32>,
    pub status: BookingStatus,
    pub notes: Option<&'a str>,
}

/// Insert a booking with its items and package under the next `BK` code.
///
/// Returns `(id, booking_code)`.
pub async fn insert(
    conn: &mut SqliteConnection,
    row: &BookingRow<'_>,
    pricing: &Pricing,
    quotation_id: Option<i64>,
    created_by: Option<i64>,
) -> Result<(i64, String), sqlx::Error> {
    let code = codes::next_code(
        conn,
        "bookings",
        "booking_code",
        BOOKING,
        shared::util::current_year(),
    )
    .await?;

    let now = shared::util::now_millis();
    let id: i64 = sqlx::query_scalar(
        "INSERT INTO bookings (booking_code, customer_id, hall_id, event_date, time_slot, event_type, \
            guest_count, status, notes, subtotal, dinner_total, total_amount, paid_amount, balance, \
            quotation_id, created_by, created_at, updated_at) \
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, 0, ?12, ?13, ?14, ?15, ?15) \
         RETURNING id",
    )
    .bind(&code)
    .bind(row.customer_id)
    .bind(row.hall_id)
    .bind(row.event_date)
    .bind(row.time_slot)
    .bind(row.event_type)
    .bind(row.guest_count)
    .bind(row.status)
    .bind(row.notes)
    .bind(pricing.subtotal)
    .bind(pricing.dinner_total)
    .bind(pricing.total_amount)
    .bind(quotation_id)
    .bind(created_by)
    .bind(now)
    .fetch_one(&mut *conn)
    .await?;

    replace_items(conn, id, &pricing.items).await?;
    replace_package(conn, id, pricing.package.as_ref()).await?;
    Ok((id, code))
}

/// Rewrite the booking columns and totals. The balance follows the stored
/// paid amount.
pub async fn update(
    conn: &mut SqliteConnection,
    id: i64,
    row: &BookingRow<'_>,
    subtotal: f64,
    dinner_total: f64,
    total_amount: f64,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        "UPDATE bookings SET customer_id = ?1, hall_id = ?2, event_date = ?3, time_slot = ?4, \
            event_type = ?5, guest_count = ?6, status = ?7, notes = ?8, subtotal = ?9, \
            dinner_total = ?10, total_amount = ?11, balance = ROUND(?11 - paid_amount, 2), \
            updated_at = ?12 \
         WHERE id = ?13 AND deleted_at IS NULL",
    )
    .bind(row.customer_id)
    .bind(row.hall_id)
    .bind(row.event_date)
    .bind(row.time_slot)
    .bind(row.event_type)
    .bind(row.guest_count)
    .bind(row.status)
    .bind(row.notes)
    .bind(subtotal)
    .bind(dinner_total)
    .bind(total_amount)
    .bind(shared::util::now_millis())
    .bind(id)
    .execute(&mut *conn)
    .await?;
    Ok(())
}

pub async fn replace_items(
    conn: &mut SqliteConnection,
    booking_id: i64,
    items: &[PricedItem],
) -> Result<(), sqlx::Error> {
    sqlx::query("DELETE FROM booking_items WHERE booking_id = ?")
        .bind(booking_id)
        .execute(&mut *conn)
        .await?;
    for item in items {
        sqlx::query(
            "INSERT INTO booking_items (booking_id, billing_item_id, description, quantity, unit_price, subtotal) \
             VALUES (?, ?, ?, ?, ?, ?)",
        )
        .bind(booking_id)
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

pub async fn replace_package(
    conn: &mut SqliteConnection,
    booking_id: i64,
    package: Option<&PricedPackage>,
) -> Result<(), sqlx::Error> {
    sqlx::query("DELETE FROM booking_dinner_packages WHERE booking_id = ?")
        .bind(booking_id)
        .execute(&mut *conn)
        .await?;
    if let Some(pkg) = package {
        sqlx::query(
            "INSERT INTO booking_dinner_packages (booking_id, dinner_package_id, package_name, table_count, price_per_table, total) \
             VALUES (?, ?, ?, ?, ?, ?)",
        )
        .bind(booking_id)
        .bind(pkg.dinner_package_id)
        .bind(&pkg.package_name)
        .bind(pkg.table_count)
        .bind(pkg.price_per_table)
        .bind(pkg.total)
        .execute(&mut *conn)
        .await?;
    }
    Ok(())
}

/// Recompute `paid_amount` and `balance` from the payments table
pub async fn recompute_balance(conn: &mut SqliteConnection, booking_id: i64) -> Result<(), sqlx::Error> {
    let amounts: Vec<f64> = sqlx::query_scalar("SELECT amount FROM payments WHERE booking_id = ?")
        .bind(booking_id)
        .fetch_all(&mut *conn)
        .await?;
    let total: f64 = sqlx::query_scalar("SELECT total_amount FROM bookings WHERE id = ?")
        .bind(booking_id)
        .fetch_one(&mut *conn)
        .await?;
    let paid = pricing::sum_money(amounts);

    sqlx::query("UPDATE bookings SET paid_amount = ?1, balance = ?2, updated_at = ?3 WHERE id = ?4")
        .bind(paid)
        .bind(pricing::balance(total, paid))
        .bind(shared::util::now_millis())
        .bind(booking_id)
        .execute(&mut *conn)
        .await?;
    Ok(())
}

pub async fn has_payments(pool: &SqlitePool, booking_id: i64) -> Result<bool, sqlx::Error> {
    sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM payments WHERE booking_id = ?)")
        .bind(booking_id)
        .fetch_one(pool)
        .await
}

pub async fn soft_delete(pool: &SqlitePool, id: i64) -> Result<bool, sqlx::Error> {
    let now = shared::util::now_millis();
    let result = sqlx::query(
        "UPDATE bookings SET deleted_at = ?1, updated_at = ?1 WHERE id = ?2 AND deleted_at IS NULL",
    )
    .bind(now)
    .bind(id)
    .execute(pool)
    .await?;
    Ok(result.rows_affected() > 0)
}
