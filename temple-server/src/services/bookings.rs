//! Booking checks shared by direct booking and quotation conversion

use chrono::NaiveDate;
use shared::error::{AppError, ErrorCode};
use shared::models::{
    BookingDetail, DEFAULT_PAYMENT_DUE_DAYS, PaymentDueEntry, SETTING_PAYMENT_DUE_DAYS, TimeSlot,
};
use sqlx::{SqliteConnection, SqlitePool};

use super::payment_due;
use crate::db;
use crate::error::ServiceResult;

pub async fn ensure_customer(pool: &SqlitePool, customer_id: i64) -> ServiceResult<()> {
    db::customers::find_by_id(pool, customer_id)
        .await?
        .ok_or_else(|| {
            AppError::new(ErrorCode::CustomerNotFound).with_detail("customer_id", customer_id)
        })?;
    Ok(())
}

/// The hall must exist and be active
pub async fn ensure_hall_bookable(pool: &SqlitePool, hall_id: i64) -> ServiceResult<()> {
    let hall = db::halls::find_by_id(pool, hall_id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::HallNotFound).with_detail("hall_id", hall_id))?;
    if !hall.is_active {
        return Err(AppError::new(ErrorCode::HallInactive)
            .with_detail("hall_id", hall_id)
            .into());
    }
    Ok(())
}

pub fn ensure_not_past(event_date: NaiveDate, today: NaiveDate) -> Result<(), AppError> {
    if event_date < today {
        return Err(AppError::new(ErrorCode::BookingDateInPast)
            .with_detail("event_date", event_date.to_string()));
    }
    Ok(())
}

pub fn slot_taken(
    hall_id: i64,
    event_date: NaiveDate,
    time_slot: TimeSlot,
    booking_code: Option<&str>,
) -> AppError {
    let err = AppError::with_message(
        ErrorCode::BookingSlotTaken,
        format!("Hall is already booked for {event_date} ({time_slot})"),
    )
    .with_detail("hall_id", hall_id)
    .with_detail("event_date", event_date.to_string())
    .with_detail("time_slot", time_slot.as_str());
    match booking_code {
        Some(code) => err.with_detail("booking_code", code),
        None => err,
    }
}

/// Fail when a live booking already holds the slot (or the whole day).
///
/// Run on the writing transaction; the partial unique index still guards the
/// exact-slot case.
pub async fn ensure_slot_free(
    conn: &mut SqliteConnection,
    hall_id: i64,
    event_date: NaiveDate,
    time_slot: TimeSlot,
    exclude_id: Option<i64>,
) -> ServiceResult<()> {
    if let Some(code) =
        db::bookings::slot_conflict(&mut *conn, hall_id, event_date, time_slot, exclude_id).await?
    {
        return Err(slot_taken(hall_id, event_date, time_slot, Some(&code)).into());
    }
    Ok(())
}

/// Booking with items, package, payments and its payment summary
pub async fn load_detail(pool: &SqlitePool, id: i64) -> ServiceResult<BookingDetail> {
    let booking = db::bookings::find_by_id(pool, id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::BookingNotFound).with_detail("id", id))?;
    let items = db::bookings::items(pool, id).await?;
    let dinner_package = db::bookings::dinner_package(pool, id).await?;
    let payments = db::payments::list_for_booking(pool, id).await?;

    let due_days =
        db::system_settings::get_i64(pool, SETTING_PAYMENT_DUE_DAYS, DEFAULT_PAYMENT_DUE_DAYS)
            .await?;
    let payment_summary = payment_due::summarize(
        booking.total_amount,
        booking.paid_amount,
        booking.event_date,
        due_days,
        shared::util::today(),
    );

    Ok(BookingDetail {
        booking,
        items,
        dinner_package,
        payments,
        payment_summary,
    })
}

/// Live bookings whose balance is overdue or falls due within the warning
/// window, earliest due date first. `within_days` further limits the report
/// to events at most that many days away.
pub async fn payments_due(
    pool: &SqlitePool,
    within_days: Option<i64>,
    today: NaiveDate,
) -> ServiceResult<Vec<PaymentDueEntry>> {
    let due_days =
        db::system_settings::get_i64(pool, SETTING_PAYMENT_DUE_DAYS, DEFAULT_PAYMENT_DUE_DAYS)
            .await?;
    let mut entries: Vec<PaymentDueEntry> = db::bookings::with_outstanding_balance(pool)
        .await?
        .into_iter()
        .filter_map(|b| {
            let summary =
                payment_due::summarize(b.total_amount, b.paid_amount, b.event_date, due_days, today);
            let in_range = within_days.is_none_or(|days| summary.days_until_event <= days);
            (payment_due::needs_attention(&summary) && in_range).then(|| PaymentDueEntry {
                booking_id: b.id,
                booking_code: b.booking_code,
                customer_name: b.customer_name,
                hall_name: b.hall_name,
                event_date: b.event_date,
                summary,
            })
        })
        .collect();
    entries.sort_by_key(|e| (e.summary.due_date, e.booking_id));
    Ok(entries)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn test_event_date_today_is_allowed() {
        let today = d(2025, 5, 1);
        assert!(ensure_not_past(today, today).is_ok());
        assert!(ensure_not_past(d(2025, 5, 2), today).is_ok());

        let err = ensure_not_past(d(2025, 4, 30), today).unwrap_err();
        assert_eq!(err.code, ErrorCode::BookingDateInPast);
    }

    #[test]
    fn test_slot_taken_details() {
        let err = slot_taken(3, d(2025, 5, 1), TimeSlot::Evening, Some("BK20250007"));
        assert_eq!(err.code, ErrorCode::BookingSlotTaken);
        let details = err.details.unwrap();
        assert_eq!(details.get("booking_code").unwrap(), "BK20250007");
        assert_eq!(details.get("time_slot").unwrap(), "evening");
    }
}
