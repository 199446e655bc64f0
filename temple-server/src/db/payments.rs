//! Payment queries
//!
//! Every write runs on the caller's transaction so the booking balance can
//! be recomputed before commit.

use chrono::NaiveDate;
use shared::models::{Payment, PaymentListQuery, PaymentMethod};
use shared::response::PageRequest;
use sqlx::{SqliteConnection, SqliteExecutor, SqlitePool};

use super::{Page, QueryBuilder, codes};
use crate::services::codes::PAYMENT;
use crate::services::pricing;

const COLUMNS: &str = "p.id, p.payment_code, p.booking_id, b.booking_code, p.amount, p.method, \
     p.reference, p.paid_at, p.notes, p.received_by, p.created_at, p.updated_at";

const FROM: &str = "payments p LEFT JOIN bookings b ON b.id = p.booking_id";

pub async fn list(pool: &SqlitePool, query: &PaymentListQuery) -> Result<Page<Payment>, sqlx::Error> {
    let mut qb = QueryBuilder::new();
    if let Some(booking_id) = query.booking_id {
        qb.add_condition("p.booking_id = ?").bind_i64(booking_id);
    }
    if let Some(method) = query.method {
        qb.add_condition("p.method = ?").bind_text(method.as_str());
    }
    if let Some(from) = query.date_from {
        qb.add_condition("p.paid_at >= ?").bind_date(from);
    }
    if let Some(to) = query.date_to {
        qb.add_condition("p.paid_at <= ?").bind_date(to);
    }
    super::fetch_page(
        pool,
        &qb,
        COLUMNS,
        FROM,
        "p.paid_at DESC, p.id DESC",
        PageRequest::new(query.page, query.per_page),
    )
    .await
}

pub async fn find_by_id(
    db: impl SqliteExecutor<'_>,
    id: i64,
) -> Result<Option<Payment>, sqlx::Error> {
    sqlx::query_as::<_, Payment>(&format!("SELECT {COLUMNS} FROM {FROM} WHERE p.id = ?"))
        .bind(id)
        .fetch_optional(db)
        .await
}

pub async fn list_for_booking(
    db: impl SqliteExecutor<'_>,
    booking_id: i64,
) -> Result<Vec<Payment>, sqlx::Error> {
    sqlx::query_as::<_, Payment>(&format!(
        "SELECT {COLUMNS} FROM {FROM} WHERE p.booking_id = ? ORDER BY p.paid_at, p.id"
    ))
    .bind(booking_id)
    .fetch_all(db)
    .await
}

/// Sum of payments with `from <= paid_at <= to`
pub async fn total_between(
    pool: &SqlitePool,
    from: NaiveDate,
    to: NaiveDate,
) -> Result<f64, sqlx::Error> {
    let amounts: Vec<f64> =
        sqlx::query_scalar("SELECT amount FROM payments WHERE paid_at >= ? AND paid_at <= ?")
            .bind(from)
            .bind(to)
            .fetch_all(pool)
            .await?;
    Ok(pricing::sum_money(amounts))
}

/// Payment columns a handler settles before writing
pub struct PaymentRow<'a> {
    pub amount: f64,
    pub method: PaymentMethod,
    pub reference: Option<&'a str>,
    pub paid_at: NaiveDate,
    pub notes: Option<&'a str>,
}

/// Insert under the next `PAY` code. Returns `(id, payment_code)`.
pub async fn insert(
    conn: &mut SqliteConnection,
    booking_id: i64,
    row: &PaymentRow<'_>,
    received_by: Option<i64>,
) -> Result<(i64, String), sqlx::Error> {
    let code = codes::next_code(
        conn,
        "payments",
        "payment_code",
        PAYMENT,
        shared::util::current_year(),
    )
    .await?;

    let now = shared::util::now_millis();
    let id = sqlx::query_scalar(
        "INSERT INTO payments (payment_code, booking_id, amount, method, reference, paid_at, notes, received_by, created_at, updated_at) \
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?9) RETURNING id",
    )
    .bind(&code)
    .bind(booking_id)
    .bind(row.amount)
    .bind(row.method)
    .bind(row.reference)
    .bind(row.paid_at)
    .bind(row.notes)
    .bind(received_by)
    .bind(now)
    .fetch_one(&mut *conn)
    .await?;
    Ok((id, code))
}

pub async fn update(
    conn: &mut SqliteConnection,
    id: i64,
    row: &PaymentRow<'_>,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        "UPDATE payments SET amount = ?1, method = ?2, reference = ?3, paid_at = ?4, notes = ?5, \
            updated_at = ?6 WHERE id = ?7",
    )
    .bind(row.amount)
    .bind(row.method)
    .bind(row.reference)
    .bind(row.paid_at)
    .bind(row.notes)
    .bind(shared::util::now_millis())
    .bind(id)
    .execute(&mut *conn)
    .await?;
    Ok(())
}

pub async fn delete(conn: &mut SqliteConnection, id: i64) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM payments WHERE id = ?")
        .bind(id)
        .execute(&mut *conn)
        .await?;
    Ok(result.rows_affected() > 0)
}
